use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the dungeon grid.
///
/// Signed so that relative moves off the top/left edge (`x - 1` at column 0)
/// are representable; the server is the one that rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by a delta, clamped at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Grid indices `(column, row)` if both coordinates are non-negative.
    pub fn to_index(self) -> Option<(usize, usize)> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        Some((x, y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_coordinates_have_no_index() {
        assert_eq!(Position::new(-1, 0).to_index(), None);
        assert_eq!(Position::new(2, 3).to_index(), Some((2, 3)));
    }

    #[test]
    fn offset_moves_relative() {
        assert_eq!(Position::new(1, 1).offset(0, -1), Position::new(1, 0));
    }

    #[test]
    fn offset_saturates_at_the_edges() {
        assert_eq!(
            Position::new(i32::MAX, i32::MIN).offset(1, -1),
            Position::new(i32::MAX, i32::MIN)
        );
    }
}
