use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::info;

use crate::algorithm::{find_path_with, FrontierPolicy};
use crate::common::{Coordinate, Path};
use crate::map::Grid;
use crate::stat::Stats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub start: Coordinate,
    pub goal: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub queries: Vec<Query>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryReport {
    pub start: Coordinate,
    pub goal: Coordinate,
    pub path: Path,
    pub cost: Option<usize>, // None when the goal is unreachable
    pub stats: Stats,
}

impl Scenario {
    pub fn single(start: Coordinate, goal: Coordinate) -> Self {
        Scenario {
            queries: vec![Query { start, goal }],
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("cannot open scenario {path}"))?;
        let reader = BufReader::new(file);
        let scenario = serde_yaml::from_reader(reader)
            .with_context(|| format!("error with scenario file: {path}"))?;
        Ok(scenario)
    }

    /// Runs every query as an independent search. Stops at the first invalid endpoint.
    pub fn run(&self, grid: &Grid, policy: FrontierPolicy) -> Result<Vec<QueryReport>> {
        let mut reports = Vec::with_capacity(self.queries.len());
        for (index, query) in self.queries.iter().enumerate() {
            let mut stats = Stats::default();
            let path = find_path_with(grid, query.start, query.goal, policy, &mut stats)
                .with_context(|| format!("query {index} failed"))?;
            stats.print();

            let cost = (!path.is_empty()).then(|| path.cost());
            reports.push(QueryReport {
                start: query.start,
                goal: query.goal,
                path,
                cost,
                stats,
            });
        }
        info!("Finished {} queries", reports.len());
        Ok(reports)
    }

    pub fn write_report(path: &str, reports: &[QueryReport]) -> Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create report {path}"))?;
        let mut writer = io::BufWriter::new(file);
        let json_data = serde_json::to_string_pretty(reports)?;
        writer.write_all(json_data.as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_scenario() {
        let scenario = Scenario::load_from_file("map_file/test/queries.yaml").unwrap();
        assert_eq!(scenario.queries.len(), 3);
        assert_eq!(
            scenario.queries[1],
            Query {
                start: Coordinate::new(7, 0),
                goal: Coordinate::new(0, 7),
            }
        );
    }

    #[test]
    fn test_run_scenario() {
        let scenario = Scenario::load_from_file("map_file/test/queries.yaml").unwrap();
        let grid = Grid::default_demo();
        let reports = scenario.run(&grid, FrontierPolicy::default()).unwrap();

        let costs: Vec<_> = reports.iter().map(|report| report.cost).collect();
        assert_eq!(costs, vec![Some(14), Some(14), Some(7)]);
    }

    #[test]
    fn test_unreachable_and_invalid_queries() {
        let grid = Grid::from_map_file("map_file/test/walled.map").unwrap();

        let reports = Scenario::single(Coordinate::new(0, 0), Coordinate::new(3, 3))
            .run(&grid, FrontierPolicy::BestCost)
            .unwrap();
        assert_eq!(reports[0].cost, None);
        assert!(reports[0].path.is_empty());

        let scenario = Scenario::from_yaml_str(
            "queries:\n  - start: [0, 0]\n    goal: [8, 6]\n  - start: [1, 1]\n    goal: [0, 0]\n",
        )
        .unwrap();
        assert!(scenario.run(&grid, FrontierPolicy::default()).is_err());
    }

    #[test]
    fn test_report_serialization() {
        let grid = Grid::default_demo();
        let reports = Scenario::single(Coordinate::new(2, 2), Coordinate::new(2, 0))
            .run(&grid, FrontierPolicy::default())
            .unwrap();
        let value = serde_json::to_value(&reports).unwrap();
        assert_eq!(value[0]["path"], serde_json::json!([[2, 2], [2, 1], [2, 0]]));
        assert_eq!(value[0]["cost"], serde_json::json!(2));
    }
}
