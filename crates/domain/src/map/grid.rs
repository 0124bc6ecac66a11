//! Rectangular tile grid with per-row structural sharing

use std::sync::Arc;

use crate::error::DomainError;
use crate::value_objects::{Position, TileId};

/// A rectangular grid of tile ids.
///
/// Each row is its own `Arc<[TileId]>`: replacing one cell copies that row
/// only, and every other row of the new map is pointer-equal to the old one.
/// Renderers can use `Arc::ptr_eq` on rows to skip unchanged lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonMap {
    rows: Vec<Arc<[TileId]>>,
    width: usize,
}

impl DungeonMap {
    /// Build a map from raw rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<TileId>>) -> Result<Self, DomainError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != width)
        {
            return Err(DomainError::RaggedMap {
                row,
                expected: width,
                found,
            });
        }

        Ok(Self {
            rows: rows.into_iter().map(Arc::from).collect(),
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn rows(&self) -> &[Arc<[TileId]>] {
        &self.rows
    }

    pub fn get(&self, pos: Position) -> Option<TileId> {
        let (x, y) = pos.to_index()?;
        self.rows.get(y)?.get(x).copied()
    }

    /// A copy of this map with one cell replaced.
    ///
    /// Only the target row is reallocated. Returns an error (and leaves
    /// `self` untouched) when `pos` is out of bounds.
    pub fn with_tile(&self, pos: Position, tile: TileId) -> Result<Self, DomainError> {
        let (x, y) = pos
            .to_index()
            .filter(|(x, y)| *x < self.width && *y < self.rows.len())
            .ok_or(DomainError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.rows.len(),
            })?;

        let mut rows = self.rows.clone();
        let mut new_row = rows[y].to_vec();
        new_row[x] = tile;
        rows[y] = Arc::from(new_row);

        Ok(Self {
            rows,
            width: self.width,
        })
    }

    /// Iterate over `(position, tile)` pairs, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Position, TileId)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, tile)| (Position::new(x as i32, y as i32), *tile))
        })
    }
}

impl AsRef<[Arc<[TileId]>]> for DungeonMap {
    fn as_ref(&self) -> &[Arc<[TileId]>] {
        &self.rows
    }
}
