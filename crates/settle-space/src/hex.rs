//! Rectangular map with hexagonal connectivity.

use crate::area::MapArea;
use crate::error::SpaceError;
use settle_core::{Direction, Pos};
use smallvec::SmallVec;

/// Cost of one step between adjacent tiles.
pub const STEP_COST: u32 = 2;

/// Heuristic weight per unit of `|dx| + |dy|`.
///
/// A single step changes `|dx| + |dy|` by at most 2, so with
/// `HEURISTIC_UNIT * 2 <= STEP_COST` the heuristic is admissible and
/// consistent.
pub const HEURISTIC_UNIT: u32 = 1;

/// A `width × height` map whose tiles each have six neighbours.
///
/// Tile `(x, y)` lives at flat index `y * width + x`. Neighbour offsets
/// follow [`Direction::ALL`]; the two diagonals run along `(1, 1)` and
/// `(-1, -1)`. Boundary tiles simply have fewer neighbours.
///
/// Canonical ordering is y-then-x: outer loop over rows, inner loop over
/// columns, which is also flat-index order.
///
/// # Examples
///
/// ```
/// use settle_core::Pos;
/// use settle_space::HexSpace;
///
/// let space = HexSpace::new(10, 10).unwrap();
/// assert_eq!(space.tile_count(), 100);
/// assert_eq!(space.neighbours(Pos::new(5, 5)).len(), 6);
/// assert_eq!(space.neighbours(Pos::new(0, 0)).len(), 3);
/// assert_eq!(space.distance(Pos::new(0, 0), Pos::new(9, 9)), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexSpace {
    width: u16,
    height: u16,
}

impl HexSpace {
    /// Maximum dimension size: positions must survive `i16` round trips.
    pub const MAX_DIM: u16 = i16::MAX as u16;

    /// Create a new map with `width * height` tiles.
    ///
    /// Returns `Err(SpaceError::EmptySpace)` if either dimension is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if either exceeds [`Self::MAX_DIM`].
    pub fn new(width: u16, height: u16) -> Result<Self, SpaceError> {
        if width == 0 || height == 0 {
            return Err(SpaceError::EmptySpace);
        }
        if width > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "width",
                value: width as u32,
                max: Self::MAX_DIM as u32,
            });
        }
        if height > Self::MAX_DIM {
            return Err(SpaceError::DimensionTooLarge {
                name: "height",
                value: height as u32,
                max: Self::MAX_DIM as u32,
            });
        }
        Ok(Self { width, height })
    }

    /// Number of columns.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether `pos` lies on the map.
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Whether `pos` lies on the outermost ring of the map.
    pub fn is_edge(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width as i32 - 1 || pos.y == self.height as i32 - 1
    }

    /// Flat index of `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of bounds. Callers validate coordinates
    /// before touching the grid; reaching this panic is a bug.
    #[inline]
    pub fn index(&self, pos: Pos) -> usize {
        assert!(
            self.contains(pos),
            "tile {pos} out of bounds: x in [0, {}), y in [0, {})",
            self.width,
            self.height
        );
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Flat index of `pos`, or `None` when off the map.
    #[inline]
    pub fn try_index(&self, pos: Pos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Position of flat index `index`.
    #[inline]
    pub fn pos_of(&self, index: usize) -> Pos {
        debug_assert!(index < self.tile_count());
        Pos::new(
            (index % self.width as usize) as i32,
            (index / self.width as usize) as i32,
        )
    }

    /// In-bounds neighbours of `pos`, in [`Direction::ALL`] order.
    pub fn neighbours(&self, pos: Pos) -> SmallVec<[Pos; 6]> {
        Direction::ALL
            .into_iter()
            .map(|d| pos.step(d))
            .filter(|p| self.contains(*p))
            .collect()
    }

    /// Hex distance between two positions.
    pub fn distance(&self, a: Pos, b: Pos) -> u32 {
        a.hex_distance(b)
    }

    /// `(|dx| + |dy|) * HEURISTIC_UNIT`.
    pub fn heuristic(&self, a: Pos, b: Pos) -> u32 {
        ((a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()) * HEURISTIC_UNIT
    }

    /// All tiles in canonical (y-then-x) order.
    pub fn canonical_ordering(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.height as i32).flat_map(move |y| (0..self.width as i32).map(move |x| Pos::new(x, y)))
    }

    /// Compile an area shape into its tiles in canonical order.
    pub fn compile_area(&self, area: &MapArea) -> Result<Vec<Pos>, SpaceError> {
        match area {
            MapArea::All => Ok(self.canonical_ordering().collect()),
            MapArea::Disk { center, radius } => {
                self.check_bounds(*center)?;
                Ok(self.compile_disk(*center, *radius))
            }
            MapArea::Rect { min, max } => {
                if min.x > max.x || min.y > max.y {
                    return Err(SpaceError::InvalidArea {
                        reason: format!("rect min {min} > max {max} on some axis"),
                    });
                }
                // Viewports may hang over the map edge; clip instead of failing.
                let x_lo = min.x.max(0);
                let y_lo = min.y.max(0);
                let x_hi = max.x.min(self.width as i32 - 1);
                let y_hi = max.y.min(self.height as i32 - 1);
                let mut tiles = Vec::new();
                for y in y_lo..=y_hi {
                    for x in x_lo..=x_hi {
                        tiles.push(Pos::new(x, y));
                    }
                }
                Ok(tiles)
            }
            MapArea::Coords(list) => {
                for pos in list {
                    self.check_bounds(*pos)?;
                }
                let mut sorted = list.clone();
                sorted.sort_by_key(|p| (p.y, p.x));
                sorted.dedup();
                Ok(sorted)
            }
        }
    }

    fn check_bounds(&self, pos: Pos) -> Result<(), SpaceError> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(SpaceError::CoordOutOfBounds {
                pos,
                bounds: format!("x in [0, {}), y in [0, {})", self.width, self.height),
            })
        }
    }

    fn compile_disk(&self, center: Pos, radius: u32) -> Vec<Pos> {
        // No tile is further than width + height from any other.
        let max_useful = self.width as u32 + self.height as u32;
        let r = radius.min(max_useful) as i32;
        let mut tiles = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let pos = center.offset(dx, dy);
                if self.contains(pos) && center.hex_distance(pos) <= r as u32 {
                    tiles.push(pos);
                }
            }
        }
        tiles
    }
}
