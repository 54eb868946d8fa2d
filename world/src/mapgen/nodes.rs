use std::{cmp::Reverse, collections::BinaryHeap};

use glam::ivec2;
use rand::Rng;
use util::{IndexMap, WeightedTable};

use crate::{Compass, Position, Size};

/// Corridors are usually one cell wide, sometimes two.
pub fn default_corridor_widths() -> WeightedTable<i32> {
    WeightedTable::new([(1, 8), (2, 2)])
}

/// Wiggly corridor from `src` to `dest`.
///
/// Alternates runs of random length along the x and y axes until reaching
/// the destination. Corridors wider than 1 are widened towards positive x
/// or y.
pub fn join_two_nodes(
    rng: &mut (impl Rng + ?Sized),
    src: Position,
    dest: Position,
    width: i32,
) -> Vec<Position> {
    let mut path = vec![src];
    let mut p = src;

    while p != dest {
        let (dx, dy) = (dest.x - p.x, dest.y - p.y);
        let horizontal = match (dx, dy) {
            (_, 0) => true,
            (0, _) => false,
            _ => rng.gen_bool(0.5),
        };

        let (remaining, step, side) = if horizontal {
            (dx.abs(), ivec2(dx.signum(), 0), ivec2(0, 1))
        } else {
            (dy.abs(), ivec2(0, dy.signum()), ivec2(1, 0))
        };

        for _ in 0..rng.gen_range(1..=remaining) {
            p = p + step;
            path.push(p);
            path.extend((1..width).map(|k| p + side * k));
        }
    }

    path
}

/// Join a sequence of nodes with corridors of one randomly chosen width.
pub fn join_nodes(
    rng: &mut (impl Rng + ?Sized),
    nodes: &[Position],
    widths: &WeightedTable<i32>,
) -> Vec<Position> {
    let width = *widths.pick(rng);
    let mut path = Vec::new();
    for pair in nodes.windows(2) {
        path.extend(join_two_nodes(rng, pair[0], pair[1], width));
    }
    path
}

/// Connect every exit of a region to its nearest node.
///
/// The corridor runs to the cell just inside the exit and then steps out,
/// so it never runs along the region border.
pub fn join_exits(
    rng: &mut (impl Rng + ?Sized),
    nodes: &[Position],
    exits: &IndexMap<Compass, i32>,
    size: Size,
) -> Vec<Position> {
    let mut path = Vec::new();

    for (&dir, &offset) in exits {
        let exit = dir.boundary_position(offset, size);
        let mut heap: BinaryHeap<_> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| Reverse((n.manhattan(exit), i)))
            .collect();

        let Some(Reverse((_, i))) = heap.pop() else {
            log::warn!("no nodes to connect exit {dir} to");
            break;
        };
        let inside = exit + dir.opposite().dir();
        path.extend(join_two_nodes(rng, nodes[i], inside, 1));
        path.push(exit);
    }

    path
}
