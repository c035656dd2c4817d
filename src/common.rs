use serde::{Deserialize, Serialize};
use std::fmt;

use crate::map::Grid;

/// A grid cell, `x` is the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    pub fn manhattan_distance(&self, other: &Coordinate) -> usize {
        self.x.abs_diff(other.x) as usize + self.y.abs_diff(other.y) as usize
    }

    pub fn is_adjacent(&self, other: &Coordinate) -> bool {
        self.manhattan_distance(other) == 1
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Coordinate {
        Coordinate::new(self.x + dx, self.y + dy)
    }
}

impl From<[i32; 2]> for Coordinate {
    fn from(value: [i32; 2]) -> Self {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [i32; 2] {
    fn from(value: Coordinate) -> Self {
        [value.x, value.y]
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from(value: (i32, i32)) -> Self {
        Coordinate::new(value.0, value.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ordered cells from start to goal inclusive. Empty when no route exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    pub steps: Vec<Coordinate>,
}

impl Path {
    pub fn empty() -> Self {
        Path { steps: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Number of moves, zero for both the trivial and the empty path.
    pub fn cost(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.steps.iter()
    }

    /// Checks the path runs from `start` to `goal` through free, 4-adjacent cells.
    pub fn verify(&self, grid: &Grid, start: Coordinate, goal: Coordinate) -> bool {
        if self.steps.first() != Some(&start) || self.steps.last() != Some(&goal) {
            return false;
        }

        if !self.steps.iter().all(|cell| grid.is_passable(*cell)) {
            return false;
        }

        self.steps
            .windows(2)
            .all(|pair| pair[0].is_adjacent(&pair[1]))
    }
}

impl From<Vec<Coordinate>> for Path {
    fn from(steps: Vec<Coordinate>) -> Self {
        Path { steps }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
