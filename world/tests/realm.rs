use glam::{ivec2, IVec2};
use pretty_assertions::assert_eq;
use quickcheck_macros::quickcheck;
use util::{HashSet, WeightedTable};
use world::{
    mapgen::Design, Compass, GroupKind, MapGenSettings, MonsterType, PixelPos,
    Position, Realm, RealmSpec, Size,
};

fn generated(seed: u64, realm_size: Size, region_size: Size) -> Realm {
    let mut realm = Realm::new(&RealmSpec {
        seed,
        realm_size,
        region_size,
        ..Default::default()
    })
    .unwrap();
    realm.generate_map().unwrap();
    realm
}

#[test]
fn exits_line_up_after_generation() {
    let realm = generated(7, Size::new(3, 3), Size::new(40, 22));

    for (coord, region) in realm.regions() {
        assert!(region.is_playable(), "{coord} not generated");

        for (dir, p) in region.exit_positions() {
            assert!(!region.is_solid(p), "{coord}: blocked {dir} exit");
        }

        for dir in [Compass::E, Compass::S] {
            let Some(other) = realm.region(coord + dir.dir()) else {
                continue;
            };
            let (here, there) = (region.exit(dir), other.exit(dir.opposite()));
            assert_eq!(here, there);

            // The exit cells are next to each other across the border.
            let size = region.size();
            let global = |coord: Position, cell: Position| {
                IVec2::from(coord) * IVec2::from(size) + IVec2::from(cell)
            };
            let a = dir.boundary_position(here.unwrap(), size);
            let b = dir.opposite().boundary_position(here.unwrap(), size);
            let next = coord + dir.dir();
            assert_eq!(global(next, b) - global(coord, a), dir.dir());
        }
    }
}

#[test]
fn every_design_is_connected() {
    for design in [
        Design::ConnectedRooms,
        Design::BossRegion,
        Design::EnclosedBossChamber,
        Design::LargeRoom,
    ] {
        for seed in 0..5 {
            let mut realm = Realm::new(&RealmSpec {
                seed,
                realm_size: Size::new(2, 2),
                region_size: Size::new(50, 40),
                mapgen: MapGenSettings {
                    designs: WeightedTable::new([(design, 1)]),
                    ..Default::default()
                },
                ..Default::default()
            })
            .unwrap();
            realm.generate_map().unwrap();

            for (coord, region) in realm.regions() {
                let open: HashSet<Position> = region
                    .size()
                    .cells()
                    .filter(|&p| !region.is_solid(p))
                    .collect();
                let Some(&start) = open.iter().next() else {
                    panic!("{design:?} {coord}: no open cells");
                };
                assert_eq!(
                    region.reachable_from(start),
                    open,
                    "{design:?} {coord} seed {seed} is not connected"
                );
            }
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let a = generated(3, Size::new(2, 2), Size::new(30, 20));
    let b = generated(3, Size::new(2, 2), Size::new(30, 20));

    for ((_, ra), (_, rb)) in a.regions().zip(b.regions()) {
        assert_eq!(ra.name, rb.name);
        assert_eq!(ra.to_ascii(), rb.to_ascii());
    }
}

#[test]
fn built_world_keeps_entities_off_walls() {
    let mut realm = generated(11, Size::new(2, 2), Size::new(40, 22));
    realm.build_world();

    for (coord, region) in realm.regions() {
        assert!(region.monster_eggs.is_empty());
        for e in region.groups.members(GroupKind::All) {
            let pixel = realm.ecs.get::<&PixelPos>(e).unwrap().0;
            assert_eq!(realm.region_coord_from_pixel_position(pixel), coord);
            let cell =
                region.coordinate_from_absolute_position(pixel.x, pixel.y);
            assert!(!region.is_solid(cell), "{e:?} stuck in a wall");
        }
    }
}

#[quickcheck]
fn random_walk_keeps_one_owner(seed: u64, steps: Vec<(i8, i8)>) -> bool {
    let mut realm = Realm::new(&RealmSpec {
        seed,
        realm_size: Size::new(3, 3),
        tile_size: Size::new(4, 4),
        region_size: Size::new(8, 8),
        ..Default::default()
    })
    .unwrap();

    let e = realm
        .spawn_monster(MonsterType::Skeleton, ivec2(40, 40))
        .unwrap();
    let mut at = Position::from(ivec2(1, 1));

    for (dx, dy) in steps {
        let delta = ivec2(dx as i32 % 12, dy as i32 % 12);
        let Ok(next) = realm.move_entity(e, at, delta) else {
            return false;
        };
        at = next;

        let owners: Vec<Position> = realm
            .regions()
            .filter(|(_, r)| r.groups.contains(GroupKind::All, e))
            .map(|(p, _)| p)
            .collect();
        let pixel = realm.ecs.get::<&PixelPos>(e).unwrap().0;
        if owners != [at] || realm.region_coord_from_pixel_position(pixel) != at
        {
            return false;
        }
    }
    true
}
