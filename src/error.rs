use thiserror::Error;

use crate::common::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointFault {
    OutOfBounds { width: usize, height: usize },
    OnObstacle,
}

impl std::fmt::Display for EndpointFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndpointFault::OutOfBounds { width, height } => {
                write!(f, "outside the {width}x{height} grid")
            }
            EndpointFault::OnObstacle => write!(f, "on an obstacle cell"),
        }
    }
}

/// Errors surfaced by grid construction and path search.
///
/// An unreachable goal is not an error: it is reported as an empty path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid {endpoint} {coordinate}: {fault}")]
    InvalidEndpoint {
        endpoint: Endpoint,
        coordinate: Coordinate,
        fault: EndpointFault,
    },

    #[error("malformed grid: row {row} has {found} cells, expected {expected}")]
    MalformedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("grid has no cells")]
    EmptyGrid,

    #[error("obstacle ratio must be a number")]
    InvalidObstacleRatio,

    #[error("map parse error at line {line}: {message}")]
    MapParse { line: usize, message: String },
}
