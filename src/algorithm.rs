mod astar;

pub use astar::{find_path, find_path_with};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::{Coordinate, Path};

/// How the frontier treats a cell that is already waiting in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FrontierPolicy {
    /// Push every discovery; entries for finalized cells are dropped when popped.
    #[default]
    AllowDuplicates,
    /// Push a cell only when it strictly improves its best known cost.
    BestCost,
}

#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) coordinate: Coordinate,
    pub(crate) cost_so_far: usize,
    pub(crate) heuristic: usize,
    pub(crate) predecessor: Option<usize>, // Arena index, None only for the start node
}

impl SearchNode {
    pub(crate) fn priority(&self) -> usize {
        self.cost_so_far + self.heuristic
    }
}

fn construct_path(arena: &[SearchNode], mut current: usize) -> Path {
    let mut steps = vec![arena[current].coordinate];
    while let Some(prev) = arena[current].predecessor {
        debug_assert!(arena[prev].cost_so_far < arena[current].cost_so_far);
        steps.push(arena[prev].coordinate);
        current = prev;
    }
    steps.reverse();
    Path { steps }
}
