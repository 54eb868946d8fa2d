use rand::{seq::SliceRandom, Rng};
use strum::IntoEnumIterator;
use util::WeightedTable;

use crate::{ItemKind, MonsterType, Overlay, Position, Region};

/// Kinds of loot a room can drop.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Dropper {
    Treasure,
    Item,
}

impl Dropper {
    /// Default mix of loot.
    pub fn table() -> WeightedTable<Dropper> {
        WeightedTable::new([(Dropper::Treasure, 20), (Dropper::Item, 80)])
    }

    pub fn apply(
        self,
        rng: &mut (impl Rng + ?Sized),
        region: &mut Region,
        p: Position,
    ) {
        let overlay = match self {
            Dropper::Treasure => Overlay::Gold(rng.gen_range(5..=30)),
            Dropper::Item => {
                let kinds: Vec<ItemKind> = ItemKind::iter().collect();
                match kinds.choose(rng) {
                    Some(&item) => Overlay::Item(item),
                    None => return,
                }
            }
        };
        if region.in_bounds(p) {
            region.visual_effects.insert(p, overlay);
        }
    }
}

/// Loot table that only drops gold.
pub fn treasure_only() -> WeightedTable<Dropper> {
    WeightedTable::new([(Dropper::Treasure, 1)])
}

/// Scatter loot in a room.
///
/// Drops keep coming with a chance that starts at `base_p` percent and
/// halves after every drop. Return the number of drops.
pub fn item_drops(
    rng: &mut (impl Rng + ?Sized),
    room: &[Position],
    region: &mut Region,
    table: &WeightedTable<Dropper>,
    base_p: u32,
) -> usize {
    let mut p = base_p;
    let mut n = 0;
    while rng.gen_range(0..=100) <= p {
        p /= 2;
        let Some(&pos) = room.choose(rng) else {
            break;
        };
        table.pick(rng).apply(rng, region, pos);
        n += 1;
    }
    n
}

/// Scatter monster eggs in a room.
///
/// Works like `item_drops`, except that a zero `base_p` never drops
/// anything. Return the number of drops.
pub fn monster_drops(
    rng: &mut (impl Rng + ?Sized),
    room: &[Position],
    region: &mut Region,
    monsters: &WeightedTable<MonsterType>,
    base_p: u32,
) -> usize {
    let mut p = base_p;
    let mut n = 0;
    while rng.gen_range(1..=100) <= p {
        p /= 2;
        let Some(&pos) = room.choose(rng) else {
            break;
        };
        region.place_monster_egg(pos, *monsters.pick(rng));
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use util::srng;

    use super::*;
    use crate::{pos, MapGenSettings, Size};

    fn monsters() -> WeightedTable<MonsterType> {
        MapGenSettings::default().monsters
    }

    #[test]
    fn treasure_drop_adds_one_overlay() {
        let mut region = Region::new(Size::new(10, 10));
        Dropper::Treasure.apply(&mut srng(&1), &mut region, pos(5, 5));
        assert_eq!(region.visual_effects.len(), 1);
        let Some(Overlay::Gold(n)) = region.visual_effect(pos(5, 5)) else {
            panic!("no gold dropped");
        };
        assert!((5..=30).contains(n));
    }

    #[test]
    fn certain_monster_drop() {
        for seed in 0..20 {
            let mut region = Region::new(Size::new(10, 10));
            let n = monster_drops(
                &mut srng(&seed),
                &[pos(0, 0)],
                &mut region,
                &monsters(),
                100,
            );
            assert!(n >= 1);
            // Repeated drops on the same cell leave one egg.
            assert_eq!(region.monster_eggs.len(), 1);
        }
    }

    #[test]
    fn impossible_monster_drop() {
        let mut rng = srng(&2);
        let mut region = Region::new(Size::new(10, 10));
        for _ in 0..100 {
            monster_drops(&mut rng, &[pos(0, 0)], &mut region, &monsters(), 0);
        }
        assert!(region.monster_eggs.is_empty());
    }

    #[test]
    fn drops_stay_in_room() {
        let mut rng = srng(&3);
        let mut region = Region::new(Size::new(10, 10));
        let room = [pos(2, 2), pos(3, 2), pos(4, 2)];
        for _ in 0..50 {
            item_drops(&mut rng, &room, &mut region, &Dropper::table(), 40);
            monster_drops(&mut rng, &room, &mut region, &monsters(), 30);
        }
        assert!(!region.visual_effects.is_empty());
        assert!(!region.monster_eggs.is_empty());
        assert!(region.visual_effects.keys().all(|p| room.contains(p)));
        assert!(region.monster_eggs.keys().all(|p| room.contains(p)));
    }

    #[test]
    fn empty_room_drops_nothing() {
        let mut region = Region::new(Size::new(10, 10));
        let n = item_drops(
            &mut srng(&4),
            &[],
            &mut region,
            &treasure_only(),
            100,
        );
        assert_eq!(n, 0);
        assert!(region.visual_effects.is_empty());
    }
}
