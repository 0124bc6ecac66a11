//! Unified error types for the domain layer
//!
//! Domain operations never panic on bad server data; they return one of these
//! and the caller decides whether it becomes a user-visible notice.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Map rows are not all the same length
    #[error("Ragged map: row {row} has {found} cells, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Generated layout has floor cells unreachable from the start
    #[error("Disconnected layout: {reachable}/{total} floor cells reachable from start")]
    Disconnected { reachable: usize, total: usize },

    /// A position lies outside the map bounds
    #[error("Position ({x},{y}) is outside the {width}x{height} map")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_map_error() {
        let err = DomainError::RaggedMap {
            row: 2,
            expected: 5,
            found: 4,
        };
        assert_eq!(err.to_string(), "Ragged map: row 2 has 4 cells, expected 5");
    }

    #[test]
    fn test_disconnected_error() {
        let err = DomainError::Disconnected {
            reachable: 3,
            total: 5,
        };
        assert_eq!(
            err.to_string(),
            "Disconnected layout: 3/5 floor cells reachable from start"
        );
    }
}
