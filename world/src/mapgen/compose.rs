use rand::Rng;
use util::{RngExt, WeightedTable};

use crate::{Position, Region, TileType};

/// Floor tiles a room can be paved with.
pub fn floor_themes() -> WeightedTable<TileType> {
    WeightedTable::new([
        (TileType::StoneFloor, 10),
        (TileType::Wood, 3),
        (TileType::Grass, 2),
        (TileType::Earth, 2),
    ])
}

/// Turn a layout into tiles.
///
/// The whole region becomes solid wall, corridors are dug out to bare floor
/// and rooms are paved with a themed floor that has the odd accent tile in
/// it.
pub fn carve_out_dungeon(
    rng: &mut (impl Rng + ?Sized),
    region: &mut Region,
    corridors: &[Position],
    rooms: &[Vec<Position>],
    accent_one_in: usize,
) {
    let themes = floor_themes();

    region.fill_all(TileType::StoneWall);
    region.clear_nodes(corridors.iter().copied(), None);

    for room in rooms {
        let theme = *themes.pick(rng);
        for &p in room {
            let floor = if rng.one_chance_in(accent_one_in) {
                *themes.pick(rng)
            } else {
                theme
            };
            region.clear_nodes([p], Some(floor));
        }
    }
}
