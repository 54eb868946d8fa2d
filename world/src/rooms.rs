use hecs::Entity;
use util::HashMap;

use crate::Position;

/// Index of the rooms in a region and the monsters that live in them.
#[derive(Clone, Debug, Default)]
pub struct Rooms {
    index_by_position: HashMap<Position, usize>,
    monsters_by_index: HashMap<usize, Vec<Entity>>,
    next_index: usize,
}

impl Rooms {
    pub fn count(&self) -> usize {
        self.next_index
    }

    /// Register a room and return its index.
    ///
    /// Cells already claimed by an earlier room are reassigned to the new
    /// one.
    pub fn add_room(&mut self, cells: &[Position]) -> usize {
        let idx = self.next_index;
        for &p in cells {
            self.index_by_position.insert(p, idx);
        }
        self.next_index += 1;
        idx
    }

    pub fn add_rooms(&mut self, rooms: &[Vec<Position>]) {
        for room in rooms {
            self.add_room(room);
        }
    }

    pub fn room_at(&self, p: Position) -> Option<usize> {
        self.index_by_position.get(&p).copied()
    }

    pub fn add_monster(&mut self, room: usize, e: Entity) {
        self.monsters_by_index.entry(room).or_default().push(e);
    }

    /// Forget a monster, return whether it was in any room.
    pub fn remove_monster(&mut self, e: Entity) -> bool {
        let mut found = false;
        for monsters in self.monsters_by_index.values_mut() {
            if let Some(i) = monsters.iter().position(|&m| m == e) {
                monsters.swap_remove(i);
                found = true;
            }
        }
        found
    }

    pub fn monsters_in(&self, room: usize) -> &[Entity] {
        self.monsters_by_index
            .get(&room)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::pos;

    use super::*;

    #[test]
    fn room_index() {
        let mut world = hecs::World::new();
        let (a, b) = (world.spawn(()), world.spawn(()));

        let mut rooms = Rooms::default();
        rooms.add_rooms(&[
            vec![pos(1, 1), pos(2, 1)],
            vec![pos(5, 5)],
        ]);
        assert_eq!(rooms.count(), 2);
        assert_eq!(rooms.room_at(pos(2, 1)), Some(0));
        assert_eq!(rooms.room_at(pos(5, 5)), Some(1));
        assert_eq!(rooms.room_at(pos(3, 3)), None);

        rooms.add_monster(1, a);
        rooms.add_monster(1, b);
        assert_eq!(rooms.monsters_in(1), &[a, b]);
        assert!(rooms.monsters_in(0).is_empty());

        assert!(rooms.remove_monster(a));
        assert!(!rooms.remove_monster(a));
        assert_eq!(rooms.monsters_in(1), &[b]);
    }
}
