//! Floor reachability check used to accept or reject generated layouts.
//!
//! A layout is fully connected when every floor cell can be reached from the
//! start position by 4-directional steps over floor cells.

use std::collections::VecDeque;

use crate::error::DomainError;
use crate::value_objects::{Position, TileDefinitions, TileId};

const NEIGHBORS: [(i64, i64); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Result of a reachability sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityReport {
    pub total_floor: usize,
    pub reachable_floor: usize,
}

impl ConnectivityReport {
    pub fn is_connected(&self) -> bool {
        self.reachable_floor == self.total_floor
    }
}

/// Count total and reachable floor cells.
///
/// An empty grid reports zero floor cells. A start outside a non-empty grid
/// is an error. A start that is not floor reaches nothing. When the tile
/// table has no `FLOOR` entry no cell counts as floor.
pub fn check_connectivity<R: AsRef<[TileId]>>(
    map: &[R],
    start: Position,
    tile_defs: &TileDefinitions,
) -> Result<ConnectivityReport, DomainError> {
    let height = map.len();
    let width = map.first().map(|row| row.as_ref().len()).unwrap_or(0);

    if height == 0 || width == 0 {
        return Ok(ConnectivityReport {
            total_floor: 0,
            reachable_floor: 0,
        });
    }

    let (sx, sy) = start
        .to_index()
        .filter(|(x, y)| *x < width && *y < height)
        .ok_or(DomainError::OutOfBounds {
            x: start.x,
            y: start.y,
            width,
            height,
        })?;

    let Some(floor) = tile_defs.floor() else {
        return Ok(ConnectivityReport {
            total_floor: 0,
            reachable_floor: 0,
        });
    };

    let is_floor = |x: usize, y: usize| -> bool {
        map.get(y)
            .and_then(|row| row.as_ref().get(x))
            .is_some_and(|tile| *tile == floor)
    };

    let total_floor = map
        .iter()
        .map(|row| row.as_ref().iter().filter(|tile| **tile == floor).count())
        .sum();

    if !is_floor(sx, sy) {
        return Ok(ConnectivityReport {
            total_floor,
            reachable_floor: 0,
        });
    }

    let mut visited = vec![false; width * height];
    let mut queue = VecDeque::new();
    visited[sy * width + sx] = true;
    queue.push_back((sx, sy));

    let mut reachable_floor = 0;
    while let Some((x, y)) = queue.pop_front() {
        reachable_floor += 1;

        for (dx, dy) in NEIGHBORS {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let idx = ny * width + nx;
            if !visited[idx] && is_floor(nx, ny) {
                visited[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    Ok(ConnectivityReport {
        total_floor,
        reachable_floor,
    })
}

/// `true` when every floor cell is reachable from `start`.
///
/// Zero floor cells is vacuously connected; a start outside the map is not.
pub fn is_fully_connected<R: AsRef<[TileId]>>(
    map: &[R],
    start: Position,
    tile_defs: &TileDefinitions,
) -> bool {
    check_connectivity(map, start, tile_defs)
        .map(|report| report.is_connected())
        .unwrap_or(false)
}

/// Gate for map-generation collaborators: `Ok` only for a fully connected layout.
pub fn ensure_connected<R: AsRef<[TileId]>>(
    map: &[R],
    start: Position,
    tile_defs: &TileDefinitions,
) -> Result<(), DomainError> {
    let report = check_connectivity(map, start, tile_defs)?;
    if report.is_connected() {
        Ok(())
    } else {
        Err(DomainError::Disconnected {
            reachable: report.reachable_floor,
            total: report.total_floor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::DungeonMap;

    const W: TileId = 2;
    const F: TileId = 1;

    fn defs() -> TileDefinitions {
        TileDefinitions::default()
    }

    #[test]
    fn map_without_floor_is_vacuously_connected() {
        let map = vec![vec![W, W], vec![W, W]];
        assert!(is_fully_connected(&map, Position::new(0, 0), &defs()));
    }

    #[test]
    fn single_region_is_connected() {
        let map = vec![
            vec![W, W, W, W],
            vec![W, F, F, W],
            vec![W, W, F, W],
            vec![W, W, W, W],
        ];
        let report = check_connectivity(&map, Position::new(1, 1), &defs()).expect("in bounds");
        assert_eq!(report.total_floor, 3);
        assert_eq!(report.reachable_floor, 3);
        assert!(is_fully_connected(&map, Position::new(1, 1), &defs()));
    }

    #[test]
    fn two_regions_are_disconnected() {
        let map = vec![
            vec![W, W, W, W, W],
            vec![W, F, W, F, W],
            vec![W, W, W, W, W],
        ];
        assert!(!is_fully_connected(&map, Position::new(1, 1), &defs()));
        assert_eq!(
            ensure_connected(&map, Position::new(1, 1), &defs()),
            Err(DomainError::Disconnected {
                reachable: 1,
                total: 2
            })
        );
    }

    #[test]
    fn diagonal_neighbors_do_not_connect() {
        let map = vec![vec![F, W], vec![W, F]];
        assert!(!is_fully_connected(&map, Position::new(0, 0), &defs()));
    }

    #[test]
    fn start_out_of_bounds_is_rejected() {
        let map = vec![vec![F, F]];
        assert!(!is_fully_connected(&map, Position::new(5, 0), &defs()));
        assert!(!is_fully_connected(&map, Position::new(-1, 0), &defs()));
        assert!(matches!(
            ensure_connected(&map, Position::new(0, 3), &defs()),
            Err(DomainError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn start_on_wall_fails_when_floor_exists() {
        let map = vec![vec![W, F, F]];
        assert!(!is_fully_connected(&map, Position::new(0, 0), &defs()));
    }

    #[test]
    fn start_on_wall_passes_when_no_floor_exists() {
        let map = vec![vec![W, W, W]];
        assert!(is_fully_connected(&map, Position::new(0, 0), &defs()));
    }

    #[test]
    fn uses_server_floor_id() {
        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert("FLOOR".to_string(), 9);
        let defs = TileDefinitions::merged_with(&overrides);

        let map = vec![vec![9, 9, 1]];
        assert!(is_fully_connected(&map, Position::new(0, 0), &defs));
    }

    #[test]
    fn works_on_shared_rows() {
        let map = DungeonMap::from_rows(vec![vec![F, F], vec![W, F]]).expect("ok");
        assert!(is_fully_connected(map.rows(), Position::new(0, 0), &defs()));
    }
}
