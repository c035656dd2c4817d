use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::algorithm::FrontierPolicy;
use crate::common::Coordinate;
use crate::map::Grid;
use crate::render::DEFAULT_MARKER;
use crate::scenario::Scenario;

fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got {value:?}"))?;
    let x = x.trim().parse::<i32>().map_err(|err| err.to_string())?;
    let y = y.trim().parse::<i32>().map_err(|err| err.to_string())?;
    Ok(Coordinate::new(x, y))
}

fn parse_dimensions(value: &str) -> Result<[usize; 2], String> {
    let (width, height) = value
        .split_once(',')
        .ok_or_else(|| format!("expected width,height, got {value:?}"))?;
    let width = width.trim().parse::<usize>().map_err(|err| err.to_string())?;
    let height = height.trim().parse::<usize>().map_err(|err| err.to_string())?;
    Ok([width, height])
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "grid_astar",
    about = "Shortest paths on obstacle grids with A* search.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to a MovingAI .map file")]
    pub map_path: Option<String>,

    #[arg(long, help = "Path to a whitespace-separated integer matrix (0 = free)")]
    pub matrix_path: Option<String>,

    #[arg(long, help = "Generate a random grid of width,height", value_parser = parse_dimensions)]
    pub random: Option<[usize; 2]>,

    #[arg(long, help = "Obstacle probability for random grids")]
    pub obstacle_ratio: Option<f64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Start cell as x,y", value_parser = parse_coordinate)]
    pub start: Option<Coordinate>,

    #[arg(long, help = "Goal cell as x,y", value_parser = parse_coordinate)]
    pub goal: Option<Coordinate>,

    #[arg(long, help = "Path to a YAML file listing start/goal queries")]
    pub scenario_path: Option<String>,

    #[arg(long, value_enum, help = "Frontier policy")]
    pub policy: Option<FrontierPolicy>,

    #[arg(long, help = "Value written on path cells when rendering")]
    pub marker: Option<u32>,

    #[arg(long, help = "Path to the JSON report file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Tracing filter, e.g. info or grid_astar=debug")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_path: Option<String>,
    pub matrix_path: Option<String>,
    pub random: Option<[usize; 2]>,
    pub obstacle_ratio: f64,
    pub seed: u64,
    pub start: Coordinate,
    pub goal: Coordinate,
    pub scenario_path: Option<String>,
    pub policy: FrontierPolicy,
    pub marker: u32,
    pub output_path: Option<String>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: None,
            matrix_path: None,
            random: None,
            obstacle_ratio: 0.2,
            seed: 0,
            start: Coordinate::new(0, 0),
            goal: Coordinate::new(7, 7),
            scenario_path: None,
            policy: FrontierPolicy::default(),
            marker: DEFAULT_MARKER,
            output_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = Some(map_path.clone());
        }
        if let Some(matrix_path) = &cli.matrix_path {
            self.matrix_path = Some(matrix_path.clone());
        }
        if let Some(random) = cli.random {
            self.random = Some(random);
        }
        if let Some(obstacle_ratio) = cli.obstacle_ratio {
            self.obstacle_ratio = obstacle_ratio;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(start) = cli.start {
            self.start = start;
        }
        if let Some(goal) = cli.goal {
            self.goal = goal;
        }
        if let Some(scenario_path) = &cli.scenario_path {
            self.scenario_path = Some(scenario_path.clone());
        }
        if let Some(policy) = cli.policy {
            self.policy = policy;
        }
        if let Some(marker) = cli.marker {
            self.marker = marker;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = log_level.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let sources = [
            self.map_path.is_some(),
            self.matrix_path.is_some(),
            self.random.is_some(),
        ];
        if sources.iter().filter(|&&set| set).count() > 1 {
            return Err(anyhow!(
                "Only one of map_path, matrix_path and random may be set"
            ));
        }

        if !(0.0..=1.0).contains(&self.obstacle_ratio) {
            return Err(anyhow!(
                "Obstacle ratio must be within [0, 1], got {}",
                self.obstacle_ratio
            ));
        }

        if let Some([width, height]) = self.random {
            if width == 0 || height == 0 {
                return Err(anyhow!(
                    "Random grid needs positive dimensions, got {width}x{height}"
                ));
            }
        }

        if self.marker == 0 {
            return Err(anyhow!("Marker must be nonzero, 0 denotes a free cell"));
        }
        Ok(())
    }

    /// Builds the grid from whichever source is configured, falling back to the demo grid.
    pub fn load_grid(&self) -> anyhow::Result<Grid> {
        if let Some(map_path) = &self.map_path {
            return Grid::from_map_file(map_path);
        }
        if let Some(matrix_path) = &self.matrix_path {
            return Grid::from_matrix_file(matrix_path);
        }
        if let Some([width, height]) = self.random {
            let mut rng = StdRng::seed_from_u64(self.seed);
            return Grid::random(width, height, self.obstacle_ratio, &mut rng)
                .context("cannot generate random grid");
        }
        Ok(Grid::default_demo())
    }

    pub fn load_scenario(&self) -> anyhow::Result<Scenario> {
        match &self.scenario_path {
            Some(path) => Scenario::load_from_file(path),
            None => Ok(Scenario::single(self.start, self.goal)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_demo() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.load_grid().unwrap(), Grid::default_demo());
        let scenario = config.load_scenario().unwrap();
        assert_eq!(
            scenario,
            Scenario::single(Coordinate::new(0, 0), Coordinate::new(7, 7))
        );
    }

    #[test]
    fn test_read_config_file() {
        let content = std::fs::read_to_string("map_file/test/config.yaml").unwrap();
        let config = Config::from_yaml_str(&content).unwrap();
        assert_eq!(config.matrix_path.as_deref(), Some("map_file/test/demo.txt"));
        assert_eq!(config.policy, FrontierPolicy::BestCost);
        assert_eq!(config.marker, 9);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.load_grid().unwrap(), Grid::default_demo());
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "grid_astar",
            "--start",
            "1,2",
            "--goal",
            "6, 5",
            "--policy",
            "best-cost",
            "--random",
            "12,4",
            "--seed",
            "3",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.start, Coordinate::new(1, 2));
        assert_eq!(config.goal, Coordinate::new(6, 5));
        assert_eq!(config.policy, FrontierPolicy::BestCost);

        let grid = config.load_grid().unwrap();
        assert_eq!((grid.width(), grid.height()), (12, 4));
    }

    #[test]
    fn test_validate_rejects_conflicts() {
        let config = Config {
            map_path: Some("a.map".to_string()),
            matrix_path: Some("a.txt".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            obstacle_ratio: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            marker: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        assert!(Cli::try_parse_from(["grid_astar", "--start", "3"]).is_err());
    }
}
