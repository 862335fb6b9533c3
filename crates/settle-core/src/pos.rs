//! Tile positions and the six hex directions.

use std::fmt;

/// A tile position on the grid.
///
/// Signed so that neighbour arithmetic at the map edge can produce
/// out-of-range candidates which are then filtered by a bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Pos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent position in `dir` (not bounds-checked).
    pub fn step(self, dir: Direction) -> Pos {
        let (dx, dy) = dir.offset();
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Offset by an arbitrary delta (not bounds-checked).
    pub fn offset(self, dx: i32, dy: i32) -> Pos {
        Pos::new(self.x + dx, self.y + dy)
    }

    /// Hex distance to `other`.
    ///
    /// Diagonal steps move along `(1,1)` / `(-1,-1)`, so when both deltas
    /// share a sign the distance is the larger delta, otherwise their sum.
    pub fn hex_distance(self, other: Pos) -> u32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        if (dx >= 0) == (dy >= 0) {
            dx.unsigned_abs().max(dy.unsigned_abs())
        } else {
            dx.unsigned_abs() + dy.unsigned_abs()
        }
    }

    /// The direction leading from `self` to an adjacent `other`, if any.
    pub fn direction_to(self, other: Pos) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.offset() == (other.x - self.x, other.y - self.y))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Pos {
    fn from((x, y): (i32, i32)) -> Self {
        Pos::new(x, y)
    }
}

/// One of the six hex directions.
///
/// Iteration order ([`Direction::ALL`]) is fixed and used wherever a
/// deterministic neighbour order matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(0, -1)`
    NorthEast,
    /// `(1, 0)`
    East,
    /// `(1, 1)`
    SouthEast,
    /// `(0, 1)`
    SouthWest,
    /// `(-1, 0)`
    West,
    /// `(-1, -1)`
    NorthWest,
}

impl Direction {
    /// All directions in canonical order.
    pub const ALL: [Direction; 6] = [
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Grid offset `(dx, dy)` of this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::NorthEast => (0, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (0, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The opposite direction.
    pub const fn inverse(self) -> Direction {
        match self {
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
            Direction::NorthWest => Direction::SouthEast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn neighbours_are_at_distance_one() {
        let c = Pos::new(4, 4);
        for d in Direction::ALL {
            assert_eq!(c.hex_distance(c.step(d)), 1, "{d:?}");
        }
    }

    #[test]
    fn anti_diagonal_is_two_steps() {
        assert_eq!(Pos::new(0, 0).hex_distance(Pos::new(1, -1)), 2);
        assert_eq!(Pos::new(0, 0).hex_distance(Pos::new(-3, 2)), 5);
    }

    #[test]
    fn diagonal_distance_is_max_delta() {
        assert_eq!(Pos::new(0, 0).hex_distance(Pos::new(9, 9)), 9);
        assert_eq!(Pos::new(2, 1).hex_distance(Pos::new(7, 3)), 5);
    }

    #[test]
    fn inverse_undoes_step() {
        let p = Pos::new(3, 7);
        for d in Direction::ALL {
            assert_eq!(p.step(d).step(d.inverse()), p);
            assert_eq!(p.direction_to(p.step(d)), Some(d));
        }
        assert_eq!(p.direction_to(p.offset(1, -1)), None);
    }

    proptest! {
        #[test]
        fn distance_is_metric(
            ax in -20i32..20, ay in -20i32..20,
            bx in -20i32..20, by in -20i32..20,
            cx in -20i32..20, cy in -20i32..20,
        ) {
            let a = Pos::new(ax, ay);
            let b = Pos::new(bx, by);
            let c = Pos::new(cx, cy);
            prop_assert_eq!(a.hex_distance(a), 0);
            prop_assert_eq!(a.hex_distance(b), b.hex_distance(a));
            prop_assert!(a.hex_distance(c) <= a.hex_distance(b) + b.hex_distance(c));
        }
    }
}
