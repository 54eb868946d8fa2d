use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use strum::EnumIter;
use util::{dice, WeightedTable};

use crate::{
    mapgen::{
        default_corridor_widths, item_drops, join_exits, join_nodes,
        join_two_nodes, make_rooms_in_subregions, make_sub_regions,
        monster_drops, treasure_only, Dropper, Layout, RegionGenerator,
        SubRegion,
    },
    pos, MapGenSettings, Position, Region, Result, Size,
};

/// Region layouts to choose from.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum Design {
    /// One big open room.
    LargeRoom,
    /// A couple of rooms joined by wide corridors.
    BossRegion,
    /// Treasure vault and monster lair inside a ring corridor.
    EnclosedBossChamber,
    /// Many rooms joined into a chain.
    ConnectedRooms,
}

/// Where exits of a large room are led to.
const LARGE_ROOM_NODE: Position = pos(10, 10);

/// Corridors in boss regions tend to be wide.
fn boss_corridor_widths() -> WeightedTable<i32> {
    WeightedTable::new([(1, 2), (2, 10), (3, 2), (4, 1)])
}

/// Rooms and corridors for a chain of rooms over the whole region.
fn chain_of_rooms(
    rng: &mut dyn RngCore,
    region: &Region,
    count: usize,
    widths: &WeightedTable<i32>,
    undersize_pc: u32,
) -> Result<Layout> {
    let whole = SubRegion::whole(region.size());
    let subs = make_sub_regions(rng, whole, count)?;
    let nodes: Vec<Position> = subs.iter().map(SubRegion::node).collect();

    let mut corridors = join_nodes(rng, &nodes, widths);
    corridors.extend(join_exits(rng, &nodes, region.exits(), region.size()));

    Ok(Layout {
        corridors,
        rooms: make_rooms_in_subregions(rng, &subs, undersize_pc),
    })
}

impl RegionGenerator for Design {
    fn name(&self) -> &'static str {
        match self {
            Design::LargeRoom => "LargeRoom",
            Design::BossRegion => "BossRegion",
            Design::EnclosedBossChamber => "EnclosedBossChamber",
            Design::ConnectedRooms => "ConnectedRooms",
        }
    }

    fn layout(
        &self,
        rng: &mut dyn RngCore,
        region: &Region,
        settings: &MapGenSettings,
    ) -> Result<Layout> {
        let (w, h) = (region.width(), region.height());

        match self {
            Design::ConnectedRooms => chain_of_rooms(
                rng,
                region,
                settings.connected_node_count,
                &default_corridor_widths(),
                settings.undersize_pc,
            ),
            Design::BossRegion => chain_of_rooms(
                rng,
                region,
                settings.boss_node_count,
                &boss_corridor_widths(),
                settings.undersize_pc,
            ),
            Design::EnclosedBossChamber => {
                let chamber = SubRegion::new(
                    region.size(),
                    pos(3, 3),
                    Size::new(w - 5, h - 5),
                );
                let ratio = rng.gen_range(0.7..0.9);
                let subs = chamber.split_horizontally(ratio)?;

                let mut nodes = vec![
                    pos(1, 1),
                    pos(w - 2, 1),
                    pos(w - 2, h - 2),
                    pos(1, h - 2),
                ];
                nodes.extend(subs.iter().map(SubRegion::node));

                // Ring corridor around the chamber, then a passage from a
                // corner through both rooms.
                let mut corridors = Vec::new();
                for i in 0..4 {
                    corridors.extend(join_two_nodes(
                        rng,
                        nodes[i],
                        nodes[(i + 1) % 4],
                        2,
                    ));
                }
                corridors.extend(join_two_nodes(rng, nodes[0], nodes[4], 2));
                corridors.extend(join_two_nodes(rng, nodes[4], nodes[5], 2));
                corridors.extend(join_exits(
                    rng,
                    &nodes,
                    region.exits(),
                    region.size(),
                ));

                Ok(Layout {
                    corridors,
                    rooms: make_rooms_in_subregions(rng, &subs, 0),
                })
            }
            Design::LargeRoom => {
                let node = pos(
                    LARGE_ROOM_NODE.x.min(w - 2).max(1),
                    LARGE_ROOM_NODE.y.min(h - 2).max(1),
                );
                let corridors =
                    join_exits(rng, &[node], region.exits(), region.size());
                let interior = SubRegion::new(
                    region.size(),
                    pos(1, 1),
                    Size::new(w - 2, h - 2),
                );

                Ok(Layout {
                    corridors,
                    rooms: vec![interior.cells().collect()],
                })
            }
        }
    }

    fn populate(
        &self,
        rng: &mut dyn RngCore,
        region: &mut Region,
        layout: &Layout,
        settings: &MapGenSettings,
    ) {
        let loot = Dropper::table();
        let (item_p, monster_p) =
            (settings.item_drop_chance, settings.monster_drop_chance);

        match self {
            Design::ConnectedRooms | Design::BossRegion => {
                for room in &layout.rooms {
                    item_drops(rng, room, region, &loot, item_p);
                    monster_drops(
                        rng,
                        room,
                        region,
                        &settings.monsters,
                        monster_p,
                    );
                }
            }
            Design::EnclosedBossChamber => {
                if let Some(vault) = layout.rooms.get(1) {
                    let gold = treasure_only();
                    for _ in 0..20 {
                        item_drops(rng, vault, region, &gold, item_p);
                    }
                    for _ in 0..dice(rng, 3, 2) {
                        item_drops(rng, vault, region, &loot, item_p);
                    }
                }
                if let Some(lair) = layout.rooms.first() {
                    for _ in 0..dice(rng, 3, 3) + 1 {
                        monster_drops(
                            rng,
                            lair,
                            region,
                            &settings.monsters,
                            monster_p,
                        );
                    }
                }
            }
            Design::LargeRoom => {
                for room in &layout.rooms {
                    for _ in 0..4 {
                        item_drops(rng, room, region, &loot, item_p);
                        monster_drops(
                            rng,
                            room,
                            region,
                            &settings.monsters,
                            monster_p,
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use util::srng;

    use super::*;
    use crate::{mapgen::generate_region, Compass};

    fn generate(design: Design, size: Size, seed: u64) -> Region {
        let mut region = Region::new(size);
        generate_region(
            &mut srng(&seed),
            &mut region,
            &design,
            &Default::default(),
        )
        .unwrap();
        region
    }

    #[test]
    fn large_room_is_open() {
        let region = generate(Design::LargeRoom, Size::new(50, 50), 1);

        for y in 1..49 {
            for x in 1..49 {
                assert!(!region.is_solid(pos(x, y)), "wall at {x},{y}");
            }
        }
        let perimeter = region.solid_count();
        assert!(perimeter > 170 && perimeter < 198, "{perimeter}");
    }

    #[test]
    fn large_room_with_exits() {
        let mut region = Region::new(Size::new(50, 50));
        region.set_exit(Compass::N, 20);
        region.set_exit(Compass::E, 30);
        generate_region(
            &mut srng(&2),
            &mut region,
            &Design::LargeRoom,
            &Default::default(),
        )
        .unwrap();

        for (_, p) in region.exit_positions() {
            assert!(!region.is_solid(p));
        }
        assert!(region.solid_count() < 196);
    }

    #[test]
    fn connected_rooms_wall_ratio() {
        let size = Size::new(50, 40);
        for seed in 0..10 {
            let region = generate(Design::ConnectedRooms, size, seed);
            let walls = region.solid_count() as i32;
            assert!(walls < size.area() * 9 / 10);
            assert!(walls > size.area() / 10);
            assert_eq!(region.rooms.count(), 16);
        }
    }

    #[test]
    fn every_design_generates() {
        use strum::IntoEnumIterator;

        for design in Design::iter() {
            for seed in 0..5 {
                let region = generate(design, Size::new(40, 22), seed);
                assert!(region.is_playable());
                assert!(region.name.starts_with(design.name()));
            }
        }
    }

    #[test]
    fn border_is_only_open_at_exits() {
        use strum::IntoEnumIterator;

        let size = Size::new(40, 22);
        for design in Design::iter() {
            for seed in 0..10 {
                for with_exits in [false, true] {
                    let mut region = Region::new(size);
                    if with_exits {
                        region.set_exit(Compass::N, 5);
                        region.set_exit(Compass::E, 12);
                        region.set_exit(Compass::S, 30);
                        region.set_exit(Compass::W, 2);
                    }
                    generate_region(
                        &mut srng(&seed),
                        &mut region,
                        &design,
                        &Default::default(),
                    )
                    .unwrap();

                    let exits: Vec<Position> =
                        region.exit_positions().map(|(_, p)| p).collect();
                    for p in size.cells().filter(|&p| size.on_border(p)) {
                        assert_eq!(
                            region.is_solid(p),
                            !exits.contains(&p),
                            "{design:?} seed {seed} border cell {p}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn boss_chamber_has_vault_and_lair() {
        let region =
            generate(Design::EnclosedBossChamber, Size::new(40, 22), 3);
        assert_eq!(region.rooms.count(), 2);
        // The vault gets at least one round of treasure.
        assert!(!region.visual_effects.is_empty());
    }

    #[test]
    fn tiny_boss_chamber_fails() {
        let mut region = Region::new(Size::new(6, 6));
        let ret = generate_region(
            &mut srng(&0),
            &mut region,
            &Design::EnclosedBossChamber,
            &Default::default(),
        );
        assert!(ret.is_err());
        assert!(!region.is_playable());
    }
}
