//! Text rendering of grids and paths for the command line.

use crate::common::Path;
use crate::map::Grid;

pub const DEFAULT_MARKER: u32 = 5;

fn render_rows(rows: &[Vec<u32>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_grid(grid: &Grid) -> String {
    render_rows(grid.rows())
}

/// Copy of the cell values with `marker` written on every path cell.
pub fn overlay_path(grid: &Grid, path: &Path, marker: u32) -> Vec<Vec<u32>> {
    let mut rows = grid.rows().to_vec();
    for step in path {
        if grid.in_bounds(*step) {
            rows[step.y as usize][step.x as usize] = marker;
        }
    }
    rows
}

pub fn render_path(grid: &Grid, path: &Path, marker: u32) -> String {
    render_rows(&overlay_path(grid, path, marker))
}

pub fn format_path(path: &Path) -> String {
    if path.is_empty() {
        return "No path found!".to_string();
    }
    path.iter()
        .map(|step| step.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
