use std::{fmt, ops::Add, str::FromStr};

use glam::{ivec2, IVec2};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::MapError;

/// Cell coordinate inside a region, or a region coordinate inside a realm.
#[derive(
    Copy,
    Clone,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

pub const fn pos(x: i32, y: i32) -> Position {
    Position { x, y }
}

impl Position {
    pub fn manhattan(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<IVec2> for Position {
    fn from(v: IVec2) -> Self {
        pos(v.x, v.y)
    }
}

impl From<Position> for IVec2 {
    fn from(p: Position) -> Self {
        ivec2(p.x, p.y)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        pos(x, y)
    }
}

impl Add<IVec2> for Position {
    type Output = Position;

    fn add(self, rhs: IVec2) -> Self::Output {
        pos(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MapError::InvalidSpec(format!("bad position {s:?}"));
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        Ok(pos(
            x.trim().parse().map_err(|_| err())?,
            y.trim().parse().map_err(|_| err())?,
        ))
    }
}

/// Width and height of a grid, in cells or pixels.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Size { width, height }
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn contains(&self, p: Position) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    /// Whether the position is on the outermost ring of cells.
    pub fn on_border(&self, p: Position) -> bool {
        self.contains(p)
            && (p.x == 0
                || p.y == 0
                || p.x == self.width - 1
                || p.y == self.height - 1)
    }

    /// Iterate cell positions in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| pos(x, y)))
    }
}

impl From<Size> for IVec2 {
    fn from(s: Size) -> Self {
        ivec2(s.width, s.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MapError::InvalidSpec(format!("bad size {s:?}"));
        let (w, h) = s.split_once('x').ok_or_else(err)?;
        Ok(Size::new(
            w.trim().parse().map_err(|_| err())?,
            h.trim().parse().map_err(|_| err())?,
        ))
    }
}

/// Side of a region where an exit can be.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
)]
pub enum Compass {
    N,
    E,
    S,
    W,
}

impl Compass {
    pub fn opposite(self) -> Compass {
        match self {
            Compass::N => Compass::S,
            Compass::E => Compass::W,
            Compass::S => Compass::N,
            Compass::W => Compass::E,
        }
    }

    /// Unit vector pointing towards this side.
    pub fn dir(self) -> IVec2 {
        match self {
            Compass::N => ivec2(0, -1),
            Compass::E => ivec2(1, 0),
            Compass::S => ivec2(0, 1),
            Compass::W => ivec2(-1, 0),
        }
    }

    /// Cell on the edge of a grid of `size` at `offset` along this side.
    ///
    /// Offsets run left to right on north and south sides and top to bottom
    /// on east and west sides.
    pub fn boundary_position(self, offset: i32, size: Size) -> Position {
        match self {
            Compass::N => pos(offset, 0),
            Compass::S => pos(offset, size.height - 1),
            Compass::W => pos(0, offset),
            Compass::E => pos(size.width - 1, offset),
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
