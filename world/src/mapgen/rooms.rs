use rand::Rng;
use util::RngExt;

use crate::{mapgen::SubRegion, pos, Position};

/// How much to pull in a room side that is `d` cells away from the node.
fn shrink(rng: &mut (impl Rng + ?Sized), d: i32, undersize_pc: u32) -> i32 {
    if d < 1 {
        0
    } else if d >= 2 && rng.percent_chance(undersize_pc) {
        rng.gen_range(2..=d)
    } else {
        1
    }
}

/// Grow a room around the node of each sub-region.
///
/// Every side of a room is pulled in from its sub-region's edge by at least
/// one cell unless the node is right at the edge. Rooms never include cells
/// on the outer border of the whole region.
pub fn make_rooms_in_subregions(
    rng: &mut (impl Rng + ?Sized),
    subs: &[SubRegion],
    undersize_pc: u32,
) -> Vec<Vec<Position>> {
    subs.iter()
        .map(|sub| {
            let node = sub.node();
            let mut pull = |d| shrink(rng, d, undersize_pc);
            let left = sub.left() + pull(node.x - sub.left());
            let right = sub.right() - pull(sub.right() - node.x);
            let top = sub.top() + pull(node.y - sub.top());
            let bottom = sub.bottom() - pull(sub.bottom() - node.y);

            let parent = sub.parent();
            (top..=bottom)
                .flat_map(|y| (left..=right).map(move |x| pos(x, y)))
                .filter(|&p| parent.contains(p) && !parent.on_border(p))
                .collect()
        })
        .collect()
}
