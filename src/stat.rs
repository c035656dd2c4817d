use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub stale_pops: usize,
    pub peak_frontier: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Time(microseconds) {:?} Expanded nodes {:?} Generated nodes {:?} Stale pops {:?} Peak frontier {:?}",
            self.time_us, self.expanded_nodes, self.generated_nodes, self.stale_pops, self.peak_frontier
        );
    }
}
