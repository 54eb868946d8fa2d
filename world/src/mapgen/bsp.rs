use std::collections::VecDeque;

use glam::{ivec2, IVec2};
use rand::Rng;

use crate::{MapError, Position, Result, Size};

/// Rectangle of cells inside a region of known size.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct SubRegion {
    pub top_left: Position,
    pub size: Size,
    parent: Size,
}

impl SubRegion {
    pub fn new(parent: Size, top_left: Position, size: Size) -> Self {
        SubRegion {
            top_left,
            size,
            parent,
        }
    }

    /// Sub-region covering the entire parent.
    pub fn whole(parent: Size) -> Self {
        SubRegion::new(parent, Position::default(), parent)
    }

    pub fn parent(&self) -> Size {
        self.parent
    }

    pub fn left(&self) -> i32 {
        self.top_left.x
    }

    pub fn top(&self) -> i32 {
        self.top_left.y
    }

    /// Rightmost column, inclusive.
    pub fn right(&self) -> i32 {
        self.top_left.x + self.size.width - 1
    }

    /// Bottom row, inclusive.
    pub fn bottom(&self) -> i32 {
        self.top_left.y + self.size.height - 1
    }

    /// Center cell, rounded towards the top left.
    pub fn node(&self) -> Position {
        self.top_left + ivec2(self.size.width / 2, self.size.height / 2)
    }

    pub fn contains(&self, p: Position) -> bool {
        (self.left()..=self.right()).contains(&p.x)
            && (self.top()..=self.bottom()).contains(&p.y)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let origin = self.top_left;
        self.size.cells().map(move |p| origin + IVec2::from(p))
    }

    /// Cut along a vertical line into a left and a right part.
    ///
    /// The left part gets `floor(width * ratio)` columns, but both parts
    /// are always at least one column wide.
    pub fn split_horizontally(&self, ratio: f32) -> Result<[SubRegion; 2]> {
        let w = split_extent(self.size.width, ratio)?;
        Ok([
            SubRegion::new(
                self.parent,
                self.top_left,
                Size::new(w, self.size.height),
            ),
            SubRegion::new(
                self.parent,
                self.top_left + ivec2(w, 0),
                Size::new(self.size.width - w, self.size.height),
            ),
        ])
    }

    /// Cut along a horizontal line into a top and a bottom part.
    pub fn split_vertically(&self, ratio: f32) -> Result<[SubRegion; 2]> {
        let h = split_extent(self.size.height, ratio)?;
        Ok([
            SubRegion::new(
                self.parent,
                self.top_left,
                Size::new(self.size.width, h),
            ),
            SubRegion::new(
                self.parent,
                self.top_left + ivec2(0, h),
                Size::new(self.size.width, self.size.height - h),
            ),
        ])
    }
}

fn split_extent(extent: i32, ratio: f32) -> Result<i32> {
    if extent < 2 {
        return Err(MapError::SizeConstraint { extent });
    }
    Ok(((extent as f32 * ratio) as i32).clamp(1, extent - 1))
}

/// Partition an area into `count` sub-regions.
///
/// Splits the oldest unsplit sub-region first, cutting across its longer
/// axis.
pub fn make_sub_regions(
    rng: &mut (impl Rng + ?Sized),
    area: SubRegion,
    count: usize,
) -> Result<Vec<SubRegion>> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut queue = VecDeque::from([area]);
    while queue.len() < count {
        let Some(sub) = queue.pop_front() else {
            break;
        };
        let ratio = rng.gen_range(0.3..=0.7);
        let halves = if sub.size.width < sub.size.height {
            sub.split_vertically(ratio)?
        } else {
            sub.split_horizontally(ratio)?
        };
        queue.extend(halves);
    }

    Ok(queue.into())
}

/// Center nodes of `count` sub-regions spanning the whole region.
pub fn make_nodes(
    rng: &mut (impl Rng + ?Sized),
    size: Size,
    count: usize,
) -> Result<Vec<Position>> {
    Ok(make_sub_regions(rng, SubRegion::whole(size), count)?
        .iter()
        .map(SubRegion::node)
        .collect())
}
