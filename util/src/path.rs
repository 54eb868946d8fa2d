use std::{collections::VecDeque, hash::Hash};

use glam::IVec2;

use crate::{HashSet, DIR_4};

/// Generate a shortest paths map on a grid according to a neighbors function.
///
/// Yields every node reachable from the starts along with its step distance
/// from the nearest start, in nondecreasing order of distance.
pub fn dijkstra_map<'a, T, I>(
    mut neighbors: impl FnMut(&T) -> I + 'a,
    starts: impl IntoIterator<Item = T>,
) -> impl Iterator<Item = (T, usize)> + 'a
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = T>,
{
    let mut edge: VecDeque<(T, usize)> =
        starts.into_iter().map(|s| (s, 0)).collect();
    let mut seen = HashSet::default();

    std::iter::from_fn(move || {
        // FIFO queue, the first pop of a node is along its shortest path.
        while let Some((node, len)) = edge.pop_front() {
            if seen.insert(node.clone()) {
                edge.extend(neighbors(&node).into_iter().map(|n| (n, len + 1)));
                return Some((node, len));
            }
        }
        None
    })
}

/// Return every cell 4-connected to `start` through cells that satisfy
/// `open`.
///
/// The start cell is included only if it is open itself.
pub fn flood_fill_4(
    start: IVec2,
    open: impl Fn(IVec2) -> bool,
) -> HashSet<IVec2> {
    if !open(start) {
        return Default::default();
    }

    dijkstra_map(
        |&p: &IVec2| {
            DIR_4
                .iter()
                .map(move |&d| p + d)
                .filter(|&q| open(q))
                .collect::<Vec<_>>()
        },
        [start],
    )
    .map(|(p, _)| p)
    .collect()
}
