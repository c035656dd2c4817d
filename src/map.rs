use anyhow::Context;
use rand::Rng;
use std::fs;

use crate::common::Coordinate;
use crate::error::{Endpoint, EndpointFault, PathError};

pub const FREE: u32 = 0;
pub const OBSTACLE: u32 = 1;

// Up, right, down, left. This order decides which of several equal-cost paths is returned.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Rectangular obstacle map. `0` is free, anything else blocks movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<u32>>, // Indexed as cells[y][x]
}

impl Grid {
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self, PathError> {
        let width = rows.first().map(Vec::len).ok_or(PathError::EmptyGrid)?;
        if width == 0 {
            return Err(PathError::EmptyGrid);
        }

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(PathError::MalformedGrid {
                row,
                expected: width,
                found,
            });
        }

        Ok(Grid {
            width,
            height: rows.len(),
            cells: rows,
        })
    }

    /// The 8x8 demonstration grid.
    pub fn default_demo() -> Self {
        Grid {
            width: 8,
            height: 8,
            cells: vec![
                vec![0, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 1, 0],
                vec![0, 0, 0, 1, 1, 1, 0, 0],
                vec![0, 0, 1, 1, 1, 1, 0, 0],
                vec![0, 0, 0, 1, 1, 1, 0, 0],
                vec![0, 0, 0, 0, 1, 1, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0, 0, 0],
            ],
        }
    }

    /// Each cell independently becomes an obstacle with probability `obstacle_ratio`,
    /// clamped to `[0, 1]`. NaN is rejected.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        obstacle_ratio: f64,
        rng: &mut R,
    ) -> Result<Self, PathError> {
        if obstacle_ratio.is_nan() {
            return Err(PathError::InvalidObstacleRatio);
        }
        let obstacle_ratio = obstacle_ratio.clamp(0.0, 1.0);
        let rows: Vec<Vec<u32>> = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| {
                        if rng.gen_bool(obstacle_ratio) {
                            OBSTACLE
                        } else {
                            FREE
                        }
                    })
                    .collect()
            })
            .collect();
        Grid::new(rows)
    }

    /// Parses a whitespace-separated integer matrix, one row per line.
    pub fn from_matrix_str(content: &str) -> Result<Self, PathError> {
        let mut rows = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|value| {
                    value.parse::<u32>().map_err(|err| PathError::MapParse {
                        line: index + 1,
                        message: format!("bad cell value {value:?}: {err}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Grid::new(rows)
    }

    pub fn from_matrix_file(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read matrix file {path}"))?;
        Grid::from_matrix_str(&content).with_context(|| format!("error with matrix file: {path}"))
    }

    /// Parses the MovingAI `.map` format: a `type` line, `height N`, `width N`, `map`,
    /// then `height` rows where `.`, `G` and `S` are passable.
    pub fn from_map_str(content: &str) -> Result<Self, PathError> {
        let mut lines = content.lines().enumerate();

        let mut header = |key: &str| -> Result<usize, PathError> {
            let (index, line) = lines.next().ok_or_else(|| PathError::MapParse {
                line: 0,
                message: format!("missing {key} line"),
            })?;
            let mut parts = line.split_whitespace();
            if parts.next() != Some(key) {
                return Err(PathError::MapParse {
                    line: index + 1,
                    message: format!("expected {key}, got {line:?}"),
                });
            }
            match key {
                "type" | "map" => Ok(0),
                _ => parts
                    .next()
                    .and_then(|value| value.parse::<usize>().ok())
                    .ok_or_else(|| PathError::MapParse {
                        line: index + 1,
                        message: format!("{key} needs a numeric value"),
                    }),
            }
        };

        header("type")?;
        let height = header("height")?;
        let width = header("width")?;
        header("map")?;

        let rows: Vec<Vec<u32>> = lines
            .take(height)
            .map(|(_, line)| {
                line.trim_end()
                    .chars()
                    .map(|ch| match ch {
                        '.' | 'G' | 'S' => FREE,
                        _ => OBSTACLE,
                    })
                    .collect()
            })
            .collect();

        if rows.len() != height {
            return Err(PathError::MapParse {
                line: 4 + rows.len(),
                message: format!("expected {height} rows, found {}", rows.len()),
            });
        }

        let grid = Grid::new(rows)?;
        if grid.width != width {
            return Err(PathError::MapParse {
                line: 3,
                message: format!("width header says {width}, rows have {}", grid.width),
            });
        }
        Ok(grid)
    }

    pub fn from_map_file(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read map file {path}"))?;
        Grid::from_map_str(&content).with_context(|| format!("error with map file: {path}"))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    pub fn in_bounds(&self, coordinate: Coordinate) -> bool {
        coordinate.x >= 0
            && coordinate.y >= 0
            && (coordinate.x as usize) < self.width
            && (coordinate.y as usize) < self.height
    }

    pub fn value(&self, coordinate: Coordinate) -> Option<u32> {
        if !self.in_bounds(coordinate) {
            return None;
        }
        Some(self.cells[coordinate.y as usize][coordinate.x as usize])
    }

    pub fn is_passable(&self, coordinate: Coordinate) -> bool {
        self.value(coordinate) == Some(FREE)
    }

    /// Row-major index, only meaningful for in-bounds coordinates.
    pub fn index(&self, coordinate: Coordinate) -> usize {
        coordinate.y as usize * self.width + coordinate.x as usize
    }

    /// Free in-bounds neighbors in up, right, down, left order.
    pub fn get_neighbors(&self, coordinate: Coordinate) -> impl Iterator<Item = Coordinate> + '_ {
        DIRECTIONS
            .into_iter()
            .map(move |(dx, dy)| coordinate.offset(dx, dy))
            .filter(|neighbor| self.is_passable(*neighbor))
    }

    pub fn check_endpoint(
        &self,
        endpoint: Endpoint,
        coordinate: Coordinate,
    ) -> Result<(), PathError> {
        let fault = if !self.in_bounds(coordinate) {
            EndpointFault::OutOfBounds {
                width: self.width,
                height: self.height,
            }
        } else if !self.is_passable(coordinate) {
            EndpointFault::OnObstacle
        } else {
            return Ok(());
        };

        Err(PathError::InvalidEndpoint {
            endpoint,
            coordinate,
            fault,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_map() {
        let grid = Grid::from_map_file("map_file/test/test.map").unwrap();

        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);

        assert!(grid.is_passable(Coordinate::new(0, 0)));
        assert!(!grid.is_passable(Coordinate::new(1, 1)));

        let neighbors: Vec<_> = grid.get_neighbors(Coordinate::new(1, 0)).collect();
        assert_eq!(neighbors, vec![Coordinate::new(2, 0), Coordinate::new(0, 0)]);
    }

    #[test]
    fn test_read_matrix() {
        let grid = Grid::from_matrix_file("map_file/test/demo.txt").unwrap();
        assert_eq!(grid, Grid::default_demo());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::new(vec![vec![0, 0, 0], vec![0, 0], vec![0, 0, 0]]).unwrap_err();
        assert_eq!(
            err,
            PathError::MalformedGrid {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(Grid::new(vec![]).unwrap_err(), PathError::EmptyGrid);
        assert_eq!(Grid::new(vec![vec![]]).unwrap_err(), PathError::EmptyGrid);
    }

    #[test]
    fn test_map_header_mismatch() {
        let content = "type octile\nheight 2\nwidth 3\nmap\n...\n..\n";
        assert!(matches!(
            Grid::from_map_str(content),
            Err(PathError::MalformedGrid { row: 1, .. })
        ));

        let narrow = "type octile\nheight 2\nwidth 4\nmap\n...\n...\n";
        assert_eq!(
            Grid::from_map_str(narrow),
            Err(PathError::MapParse {
                line: 3,
                message: "width header says 4, rows have 3".to_string(),
            })
        );

        let short = "type octile\nheight 3\nwidth 2\nmap\n..\n..\n";
        assert!(matches!(
            Grid::from_map_str(short),
            Err(PathError::MapParse { .. })
        ));
    }

    #[test]
    fn test_nonzero_is_obstacle() {
        let grid = Grid::from_matrix_str("0 7\n2 0\n").unwrap();
        assert!(grid.is_passable(Coordinate::new(0, 0)));
        assert!(!grid.is_passable(Coordinate::new(1, 0)));
        assert!(!grid.is_passable(Coordinate::new(0, 1)));
        assert!(!grid.is_passable(Coordinate::new(5, 5)));
        assert_eq!(grid.value(Coordinate::new(1, 0)), Some(7));
        assert_eq!(grid.value(Coordinate::new(-1, 0)), None);
    }

    #[test]
    fn test_neighbor_order() {
        let grid = Grid::new(vec![vec![0; 3]; 3]).unwrap();
        let neighbors: Vec<_> = grid.get_neighbors(Coordinate::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Coordinate::new(1, 0),
                Coordinate::new(2, 1),
                Coordinate::new(1, 2),
                Coordinate::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_check_endpoint() {
        let grid = Grid::default_demo();
        assert!(grid.check_endpoint(Endpoint::Start, Coordinate::new(0, 0)).is_ok());
        assert_eq!(
            grid.check_endpoint(Endpoint::Goal, Coordinate::new(8, 0)),
            Err(PathError::InvalidEndpoint {
                endpoint: Endpoint::Goal,
                coordinate: Coordinate::new(8, 0),
                fault: EndpointFault::OutOfBounds {
                    width: 8,
                    height: 8
                },
            })
        );
        assert_eq!(
            grid.check_endpoint(Endpoint::Start, Coordinate::new(6, 1)),
            Err(PathError::InvalidEndpoint {
                endpoint: Endpoint::Start,
                coordinate: Coordinate::new(6, 1),
                fault: EndpointFault::OnObstacle,
            })
        );
    }

    #[test]
    fn test_random_rejects_nan_ratio() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            Grid::random(4, 4, f64::NAN, &mut rng),
            Err(PathError::InvalidObstacleRatio)
        );

        let full = Grid::random(4, 4, 3.0, &mut rng).unwrap();
        assert!(full.rows().iter().flatten().all(|&value| value == OBSTACLE));
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Grid::random(10, 6, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = Grid::random(10, 6, 0.3, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.width(), 10);
        assert_eq!(a.height(), 6);
    }
}
