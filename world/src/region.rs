use std::{cmp::Reverse, collections::BinaryHeap};

use glam::{ivec2, IVec2};
use hecs::Entity;
use util::{HashSet, IndexMap, DIR_8};

use crate::{
    plane::Plane, pos, Compass, GroupKind, Groups, MapError, Monster,
    MonsterType, Overlay, Pickup, PixelPos, Position, Result, Rooms, Size,
    Speed, TileType, Vitality,
};

/// Default tile size in pixels.
pub const TILE_SIZE: Size = Size::new(32, 32);

/// How far from a solid egg cell a monster may be moved when spawning.
const EGG_SEARCH_RADIUS: i32 = 3;

/// Which point of a cell a pixel position refers to.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Align {
    #[default]
    TopLeft,
    Center,
}

/// One screen-sized partition of the realm.
///
/// Generation fills the tile planes and leaves eggs and pickups to be turned
/// into entities by `build_world`. After that the region tracks which live
/// entities are inside it in `groups`.
#[derive(Clone, Debug)]
pub struct Region {
    pub name: String,
    size: Size,
    tile_size: Size,
    pixel_base: IVec2,
    default_tile: TileType,
    tiles: Plane<TileType>,
    solid_objects: Plane<TileType>,
    pub visual_effects: IndexMap<Position, Overlay>,
    pub monster_eggs: IndexMap<Position, MonsterType>,
    pub rooms: Rooms,
    exits: IndexMap<Compass, i32>,
    pub groups: Groups,
    playable: bool,
}

impl Region {
    pub fn new(size: Size) -> Self {
        Region {
            name: String::new(),
            size,
            tile_size: TILE_SIZE,
            pixel_base: IVec2::ZERO,
            default_tile: TileType::StoneFloor,
            tiles: Plane::new(size),
            solid_objects: Plane::new(size),
            visual_effects: Default::default(),
            monster_eggs: Default::default(),
            rooms: Default::default(),
            exits: Default::default(),
            groups: Default::default(),
            playable: false,
        }
    }

    pub fn with_tile_size(mut self, tile_size: Size) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_pixel_base(mut self, pixel_base: IVec2) -> Self {
        self.pixel_base = pixel_base;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.width
    }

    pub fn height(&self) -> i32 {
        self.size.height
    }

    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    pub fn pixel_base(&self) -> IVec2 {
        self.pixel_base
    }

    pub fn pixel_size(&self) -> Size {
        Size::new(
            self.size.width * self.tile_size.width,
            self.size.height * self.tile_size.height,
        )
    }

    pub fn default_tile(&self) -> TileType {
        self.default_tile
    }

    pub fn is_playable(&self) -> bool {
        self.playable
    }

    pub(crate) fn mark_playable(&mut self) {
        self.playable = true;
    }

    pub fn exits(&self) -> &IndexMap<Compass, i32> {
        &self.exits
    }

    pub fn exit(&self, dir: Compass) -> Option<i32> {
        self.exits.get(&dir).copied()
    }

    pub(crate) fn set_exit(&mut self, dir: Compass, offset: i32) {
        self.exits.insert(dir, offset);
    }

    /// Boundary cells of the exits.
    pub fn exit_positions(
        &self,
    ) -> impl Iterator<Item = (Compass, Position)> + '_ {
        self.exits
            .iter()
            .map(|(&dir, &o)| (dir, dir.boundary_position(o, self.size)))
    }

    pub fn in_bounds(&self, p: Position) -> bool {
        self.size.contains(p)
    }

    /// Base tile of a cell, the default tile if nothing was placed there.
    pub fn tile(&self, p: Position) -> TileType {
        self.tiles.get(p).unwrap_or(self.default_tile)
    }

    pub fn solid_object(&self, p: Position) -> Option<TileType> {
        self.solid_objects.get(p)
    }

    pub fn visual_effect(&self, p: Position) -> Option<&Overlay> {
        self.visual_effects.get(&p)
    }

    pub fn monster_egg(&self, p: Position) -> Option<MonsterType> {
        self.monster_eggs.get(&p).copied()
    }

    pub fn is_solid(&self, p: Position) -> bool {
        self.solid_objects.contains(p)
    }

    pub fn solid_count(&self) -> usize {
        self.solid_objects.len()
    }

    /// Put a tile on the plane it belongs to.
    ///
    /// Solid tiles go to the solid plane, overlay tiles to visual effects
    /// and everything else to the base plane. Out of bounds positions are
    /// ignored.
    pub fn place(&mut self, p: Position, tile: TileType) {
        if !self.in_bounds(p) {
            log::trace!("{}: ignoring {tile} placed at {p}", self.name);
            return;
        }

        if tile.is_solid() {
            self.solid_objects.insert(p, tile);
        } else if tile.layer() > 0 {
            self.visual_effects.insert(p, Overlay::Decoration(tile));
        } else {
            self.tiles.insert(p, tile);
        }
    }

    pub fn place_monster_egg(&mut self, p: Position, kind: MonsterType) {
        if self.in_bounds(p) {
            self.monster_eggs.insert(p, kind);
        }
    }

    pub fn fill(&mut self, top_left: Position, size: Size, tile: TileType) {
        for p in size.cells() {
            self.place(top_left + IVec2::from(p), tile);
        }
    }

    pub fn fill_all(&mut self, tile: TileType) {
        self.fill(Position::default(), self.size, tile);
    }

    /// Remove solid objects from an area.
    pub fn clear_area(&mut self, top_left: Position, size: Size) {
        for p in size.cells() {
            self.solid_objects.remove(top_left + IVec2::from(p));
        }
    }

    /// Remove solid objects from cells and put a replacement tile there.
    ///
    /// With no replacement the cells revert to the default tile.
    pub fn clear_nodes(
        &mut self,
        cells: impl IntoIterator<Item = Position>,
        replacement: Option<TileType>,
    ) {
        for p in cells {
            self.solid_objects.remove(p);
            match replacement {
                Some(tile) => self.place(p, tile),
                None => {
                    self.tiles.remove(p);
                }
            }
        }
    }

    /// Absolute pixel position of a cell.
    pub fn pixel_position(&self, p: Position, align: Align) -> IVec2 {
        let ts = IVec2::from(self.tile_size);
        let offset = match align {
            Align::TopLeft => IVec2::ZERO,
            Align::Center => ts / 2,
        };
        self.pixel_base + IVec2::from(p) * ts + offset
    }

    /// Cell that contains an absolute pixel position.
    ///
    /// The result may be outside the region's bounds.
    pub fn coordinate_from_absolute_position(
        &self,
        x: i32,
        y: i32,
    ) -> Position {
        let rel = ivec2(x, y) - self.pixel_base;
        Position::from(ivec2(
            rel.x.div_euclid(self.tile_size.width),
            rel.y.div_euclid(self.tile_size.height),
        ))
    }

    /// Find the non-solid cell nearest to (x0, y0) in Manhattan distance.
    ///
    /// Search spreads to 8-connected neighbors that are at most
    /// `max_distance` from the origin. Only cells inside the region count as
    /// free. The search never looks further than the farthest corner of the
    /// region, and stays inside the region when starting from inside it.
    pub fn nearest_free_space(
        &self,
        x0: i32,
        y0: i32,
        max_distance: i32,
    ) -> Result<Position> {
        let origin = Position { x: x0, y: y0 };
        let (w, h) = (self.width() - 1, self.height() - 1);
        let farthest = [pos(0, 0), pos(w, 0), pos(0, h), pos(w, h)]
            .into_iter()
            .map(|c| c.manhattan(origin))
            .max()
            .unwrap_or(0);
        let radius = max_distance.min(farthest);
        let inside = self.in_bounds(origin);

        // Ordered by distance, then by discovery order.
        let mut frontier = BinaryHeap::new();
        let mut seen = HashSet::default();
        let mut seq = 0u32;
        frontier.push(Reverse((0, seq, origin)));
        seen.insert(origin);

        while let Some(Reverse((_, _, p))) = frontier.pop() {
            if self.in_bounds(p) && !self.is_solid(p) {
                return Ok(p);
            }

            for d in DIR_8 {
                let q = p + d;
                let dist = q.manhattan(origin);
                if dist > radius || (inside && !self.in_bounds(q)) {
                    continue;
                }
                if seen.insert(q) {
                    seq += 1;
                    frontier.push(Reverse((dist, seq, q)));
                }
            }
        }

        Err(MapError::NoFreeSpace {
            x: x0,
            y: y0,
            max_distance,
        })
    }

    /// Cells reachable from `start` through non-solid cells, moving in four
    /// directions.
    pub fn reachable_from(&self, start: Position) -> HashSet<Position> {
        util::flood_fill_4(start.into(), |p| {
            let p = Position::from(p);
            self.in_bounds(p) && !self.is_solid(p)
        })
        .into_iter()
        .map(Position::from)
        .collect()
    }

    /// Monsters in the room that contains the cell.
    pub fn room_monsters_at(&self, p: Position) -> &[Entity] {
        match self.rooms.room_at(p) {
            Some(room) => self.rooms.monsters_in(room),
            None => &[],
        }
    }

    /// Spawn a monster entity in this region and register it.
    pub fn spawn_monster(
        &mut self,
        ecs: &mut hecs::World,
        kind: MonsterType,
        p: Position,
    ) -> Entity {
        let e = ecs.spawn((
            PixelPos(self.pixel_position(p, Align::Center)),
            Monster(kind),
            Vitality(kind.vitality()),
            Speed(kind.speed()),
        ));
        self.groups.add(e, &[GroupKind::Solid, GroupKind::Monster]);
        if let Some(room) = self.rooms.room_at(p) {
            self.rooms.add_monster(room, e);
        }
        e
    }

    /// Turn monster eggs and pickup overlays into live entities.
    ///
    /// Return the spawned entities.
    pub fn build_world(&mut self, ecs: &mut hecs::World) -> Vec<Entity> {
        let mut ret = Vec::new();

        let eggs: Vec<(Position, MonsterType)> =
            self.monster_eggs.drain(..).collect();
        for (p, kind) in eggs {
            let p = if self.is_solid(p) {
                match self.nearest_free_space(p.x, p.y, EGG_SEARCH_RADIUS) {
                    Ok(p) => p,
                    Err(e) => {
                        log::warn!("{}: dropping {kind} egg: {e}", self.name);
                        continue;
                    }
                }
            } else {
                p
            };
            ret.push(self.spawn_monster(ecs, kind, p));
        }

        let pickups: Vec<(Position, Pickup)> = self
            .visual_effects
            .iter()
            .filter_map(|(&p, o)| match *o {
                Overlay::Item(item) => Some((p, Pickup::Item(item))),
                Overlay::Gold(n) => Some((p, Pickup::Gold(n))),
                Overlay::Decoration(_) => None,
            })
            .collect();
        self.visual_effects.retain(|_, o| !o.is_pickup());

        for (p, pickup) in pickups {
            let pixel = self.pixel_position(p, Align::Center);
            let e = ecs.spawn((PixelPos(pixel), pickup));
            self.groups.add(e, &[GroupKind::Item]);
            ret.push(e);
        }

        log::debug!("{}: spawned {} entities", self.name, ret.len());
        ret
    }

    /// Render the region as text, one character per cell.
    ///
    /// Eggs are drawn over overlays, overlays over solids and solids over
    /// base tiles.
    pub fn to_ascii(&self) -> String {
        let mut ret = String::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Position { x, y };
                let c = if let Some(m) = self.monster_egg(p) {
                    m.glyph()
                } else if let Some(o) = self.visual_effect(p) {
                    o.glyph()
                } else if let Some(t) = self.solid_object(p) {
                    t.glyph()
                } else {
                    self.tile(p).glyph()
                };
                ret.push(c);
            }
            ret.push('\n');
        }
        ret
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn walled(size: Size, open: &[Position]) -> Region {
        let mut region = Region::new(size);
        region.fill_all(TileType::StoneWall);
        region.clear_nodes(open.iter().copied(), None);
        region
    }

    #[test]
    fn planes() {
        let mut region = Region::new(Size::new(10, 10));
        assert_eq!(region.tile(pos(3, 3)), TileType::StoneFloor);

        region.place(pos(3, 3), TileType::StoneWall);
        assert!(region.is_solid(pos(3, 3)));
        assert_eq!(region.tile(pos(3, 3)), TileType::StoneFloor);

        region.place(pos(4, 4), TileType::Water);
        assert!(!region.is_solid(pos(4, 4)));
        assert_eq!(region.tile(pos(4, 4)), TileType::Water);

        region.place(pos(4, 4), TileType::Rubble);
        assert_eq!(region.tile(pos(4, 4)), TileType::Water);
        assert_eq!(
            region.visual_effect(pos(4, 4)),
            Some(&Overlay::Decoration(TileType::Rubble))
        );

        region.place(pos(10, 4), TileType::StoneWall);
        assert_eq!(region.solid_count(), 1);

        region.place_monster_egg(pos(1, 1), MonsterType::Mummy);
        assert_eq!(region.monster_egg(pos(1, 1)), Some(MonsterType::Mummy));
    }

    #[test]
    fn fill_and_clear() {
        let mut region = Region::new(Size::new(4, 4));
        region.fill_all(TileType::StoneWall);
        assert_eq!(region.solid_count(), 16);

        region.clear_area(pos(1, 1), Size::new(2, 2));
        assert_eq!(region.solid_count(), 12);

        region.fill(pos(3, 3), Size::new(2, 2), TileType::Hedge);
        assert_eq!(region.solid_object(pos(3, 3)), Some(TileType::Hedge));
        assert_eq!(region.solid_count(), 12);

        region.clear_nodes([pos(0, 0)], Some(TileType::Wood));
        assert!(!region.is_solid(pos(0, 0)));
        assert_eq!(region.tile(pos(0, 0)), TileType::Wood);

        region.clear_nodes([pos(0, 0)], None);
        assert_eq!(region.tile(pos(0, 0)), TileType::StoneFloor);
    }

    #[test]
    fn pixel_conversion() {
        let region = Region::new(Size::new(10, 10))
            .with_pixel_base(ivec2(64, 0));

        assert_eq!(
            region.pixel_position(pos(1, 2), Align::TopLeft),
            ivec2(96, 64)
        );
        assert_eq!(
            region.pixel_position(pos(1, 2), Align::Center),
            ivec2(112, 80)
        );

        let cell = |x, y| region.coordinate_from_absolute_position(x, y);
        assert_eq!(cell(112, 80), pos(1, 2));
        assert_eq!(cell(96, 64), pos(1, 2));
        assert_eq!(cell(95, 63), pos(0, 1));
        assert_eq!(cell(63, 0), pos(-1, 0));
    }

    #[test]
    fn nearest_free_space_prefers_closer() {
        let region = walled(Size::new(11, 11), &[pos(6, 6), pos(3, 3)]);
        assert_eq!(region.nearest_free_space(5, 5, 5), Ok(pos(6, 6)));
        assert_eq!(region.nearest_free_space(3, 3, 0), Ok(pos(3, 3)));
        assert_eq!(
            region.nearest_free_space(5, 5, 1),
            Err(MapError::NoFreeSpace {
                x: 5,
                y: 5,
                max_distance: 1
            })
        );
    }

    #[test]
    fn nearest_free_space_stays_in_bounds() {
        let region = walled(Size::new(5, 5), &[pos(4, 4)]);
        assert_eq!(region.nearest_free_space(0, 0, 8), Ok(pos(4, 4)));
        // Outside cells are never free even though they have no walls.
        assert!(region.nearest_free_space(-3, 0, 2).is_err());
    }

    #[test]
    fn nearest_free_space_gives_up_at_region_size() {
        let region = walled(Size::new(11, 11), &[]);
        for max_distance in [1_500, 1_000_000, i32::MAX] {
            assert_eq!(
                region.nearest_free_space(5, 5, max_distance),
                Err(MapError::NoFreeSpace {
                    x: 5,
                    y: 5,
                    max_distance
                })
            );
        }
        assert!(region.nearest_free_space(-40, 3, i32::MAX).is_err());

        let region = walled(Size::new(11, 11), &[pos(10, 10)]);
        assert_eq!(region.nearest_free_space(0, 0, i32::MAX), Ok(pos(10, 10)));
        assert_eq!(region.nearest_free_space(-5, -5, 100), Ok(pos(10, 10)));
    }

    #[quickcheck]
    fn nearest_free_space_is_minimal(
        walls: Vec<bool>,
        x: u8,
        y: u8,
        max_distance: u8,
    ) -> bool {
        const W: i32 = 7;
        let size = Size::new(W, W);
        let mut region = Region::new(size);
        for (p, &solid) in size.cells().zip(walls.iter()) {
            if solid {
                region.place(p, TileType::StoneWall);
            }
        }
        // Short inputs test the fully walled case.
        if walls.len() < 10 {
            region.fill_all(TileType::StoneWall);
        }

        let origin = pos(x as i32 % (W + 2) - 1, y as i32 % (W + 2) - 1);
        let max_distance = max_distance as i32 % 12;

        let best = size
            .cells()
            .filter(|&p| !region.is_solid(p))
            .map(|p| p.manhattan(origin))
            .filter(|&d| d <= max_distance)
            .min();

        let found =
            region.nearest_free_space(origin.x, origin.y, max_distance);
        match (found, best) {
            (Ok(p), Some(d)) => {
                region.in_bounds(p)
                    && !region.is_solid(p)
                    && p.manhattan(origin) == d
            }
            (Err(_), None) => true,
            _ => false,
        }
    }

    #[test]
    fn reachability() {
        let region = walled(
            Size::new(6, 6),
            &[pos(1, 1), pos(2, 1), pos(2, 2), pos(4, 4), pos(3, 3)],
        );
        let reach = region.reachable_from(pos(1, 1));
        assert_eq!(reach.len(), 3);
        assert!(!reach.contains(&pos(3, 3)));
        assert!(region.reachable_from(pos(0, 0)).is_empty());
    }

    #[test]
    fn build_world() {
        let mut region = walled(Size::new(8, 8), &[pos(2, 2), pos(3, 2)]);
        region.rooms.add_room(&[pos(2, 2), pos(3, 2)]);
        region.place_monster_egg(pos(2, 2), MonsterType::Skeleton);
        // Egg inside a wall gets moved to the nearest open cell.
        region.place_monster_egg(pos(3, 3), MonsterType::Zombie);
        // No open cells near enough.
        region.place_monster_egg(pos(7, 7), MonsterType::Mummy);
        region.visual_effects.insert(pos(3, 2), Overlay::Gold(12));
        region
            .visual_effects
            .insert(pos(1, 1), Overlay::Decoration(TileType::Rubble));

        let mut ecs = hecs::World::new();
        let spawned = region.build_world(&mut ecs);
        assert_eq!(spawned.len(), 3);
        assert!(region.monster_eggs.is_empty());
        assert_eq!(region.visual_effects.len(), 1);

        assert_eq!(region.groups.count(GroupKind::All), 3);
        assert_eq!(region.groups.count(GroupKind::Monster), 2);
        assert_eq!(region.groups.count(GroupKind::Item), 1);
        assert_eq!(region.room_monsters_at(pos(3, 2)).len(), 2);
        assert!(region.room_monsters_at(pos(5, 5)).is_empty());

        let zombie = spawned[1];
        assert_eq!(
            *ecs.get::<&Monster>(zombie).unwrap(),
            Monster(MonsterType::Zombie)
        );
        assert_eq!(
            ecs.get::<&PixelPos>(zombie).unwrap().0,
            region.pixel_position(pos(3, 2), Align::Center)
        );
    }

    #[test]
    fn ascii() {
        let mut region = walled(Size::new(3, 2), &[pos(1, 0), pos(1, 1)]);
        region.visual_effects.insert(pos(1, 1), Overlay::Gold(1));
        region.place_monster_egg(pos(1, 0), MonsterType::Zombie);
        assert_eq!(region.to_ascii(), "#z#\n#$#\n");
    }
}
