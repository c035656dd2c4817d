use grid_astar::config::{Cli, Config};
use grid_astar::render::{format_path, render_grid, render_path};
use grid_astar::scenario::Scenario;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        Config::default()
    }
    .override_from_command_line(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .init();
    if cli.config.is_none() {
        info!("No config file specified, using default config");
    }

    let grid = config.load_grid()?;
    let scenario = config.load_scenario()?;
    info!(
        "Loaded {}x{} grid with {} queries",
        grid.width(),
        grid.height(),
        scenario.queries.len()
    );

    println!("Generated Grid:");
    println!("{}", render_grid(&grid));

    let reports = scenario.run(&grid, config.policy)?;
    for report in &reports {
        println!("\nShortest Path {} -> {}:", report.start, report.goal);
        println!("{}", format_path(&report.path));
        if !report.path.is_empty() {
            assert!(report.path.verify(&grid, report.start, report.goal));
        }
        println!("\nShortest Path Visualized:");
        println!("{}", render_path(&grid, &report.path, config.marker));
    }

    if let Some(output_path) = &config.output_path {
        Scenario::write_report(output_path, &reports)?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
