use super::{construct_path, FrontierPolicy, SearchNode};
use crate::common::{Coordinate, Path};
use crate::error::{Endpoint, PathError};
use crate::map::Grid;
use crate::stat::Stats;

use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, instrument, trace};

// Derived ordering compares priority first, then insertion sequence, so among equal
// priorities the earliest pushed entry is popped first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    priority: usize,
    sequence: usize,
    node: usize,
}

/// Shortest 4-connected path from `start` to `goal`, using the default frontier policy.
///
/// Returns `Ok` with an empty path when the goal cannot be reached, and
/// `PathError::InvalidEndpoint` when either endpoint is outside the grid or on an obstacle.
pub fn find_path(grid: &Grid, start: Coordinate, goal: Coordinate) -> Result<Path, PathError> {
    find_path_with(
        grid,
        start,
        goal,
        FrontierPolicy::default(),
        &mut Stats::default(),
    )
}

#[instrument(skip_all, name = "a_star", fields(start = %start, goal = %goal, policy = ?policy), level = "debug")]
pub fn find_path_with(
    grid: &Grid,
    start: Coordinate,
    goal: Coordinate,
    policy: FrontierPolicy,
    stats: &mut Stats,
) -> Result<Path, PathError> {
    grid.check_endpoint(Endpoint::Start, start)?;
    grid.check_endpoint(Endpoint::Goal, goal)?;

    let search_start_time = Instant::now();
    let path = search(grid, start, goal, policy, stats);
    stats.time_us = search_start_time.elapsed().as_micros() as usize;

    if path.is_empty() {
        debug!("cannot find path");
    } else {
        debug!("found path with cost {}", path.cost());
    }
    Ok(path)
}

fn search(
    grid: &Grid,
    start: Coordinate,
    goal: Coordinate,
    policy: FrontierPolicy,
    stats: &mut Stats,
) -> Path {
    let cells = grid.width() * grid.height();
    let mut finalized = vec![false; cells];
    let mut best_cost = vec![usize::MAX; cells];
    let mut arena: Vec<SearchNode> = Vec::new();
    let mut open_list = BTreeSet::new();
    let mut sequence = 0;

    let mut push = |arena: &mut Vec<SearchNode>,
                    open_list: &mut BTreeSet<OpenEntry>,
                    node: SearchNode| {
        let entry = OpenEntry {
            priority: node.priority(),
            sequence,
            node: arena.len(),
        };
        sequence += 1;
        arena.push(node);
        open_list.insert(entry);
    };

    best_cost[grid.index(start)] = 0;
    push(
        &mut arena,
        &mut open_list,
        SearchNode {
            coordinate: start,
            cost_so_far: 0,
            heuristic: start.manhattan_distance(&goal),
            predecessor: None,
        },
    );
    stats.generated_nodes += 1;
    stats.peak_frontier = stats.peak_frontier.max(open_list.len());

    while let Some(current) = open_list.pop_first() {
        let coordinate = arena[current.node].coordinate;
        let current_index = grid.index(coordinate);

        // An older entry for this cell already won.
        if finalized[current_index] {
            stats.stale_pops += 1;
            continue;
        }

        if coordinate == goal {
            return construct_path(&arena, current.node);
        }

        trace!("expand node: {coordinate} priority {}", current.priority);
        finalized[current_index] = true;
        stats.expanded_nodes += 1;

        let tentative_cost = arena[current.node].cost_so_far + 1;
        for neighbor in grid.get_neighbors(coordinate) {
            let neighbor_index = grid.index(neighbor);
            if finalized[neighbor_index] {
                continue;
            }

            if policy == FrontierPolicy::BestCost && tentative_cost >= best_cost[neighbor_index] {
                continue;
            }
            best_cost[neighbor_index] = best_cost[neighbor_index].min(tentative_cost);

            push(
                &mut arena,
                &mut open_list,
                SearchNode {
                    coordinate: neighbor,
                    cost_so_far: tentative_cost,
                    heuristic: neighbor.manhattan_distance(&goal),
                    predecessor: Some(current.node),
                },
            );
            stats.generated_nodes += 1;
        }
        stats.peak_frontier = stats.peak_frontier.max(open_list.len());
    }

    Path::empty()
}
