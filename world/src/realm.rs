use glam::{ivec2, IVec2};
use hecs::Entity;
use rand::Rng;
use rayon::prelude::*;
use util::{srng, IndexMap};

use crate::{
    mapgen::{self, Design},
    pos, Align, Awake, Compass, GroupKind, Groups, MapError, MapGenSettings,
    Missile, Monster, MonsterType, PixelPos, Player, Position, RealmSpec,
    Region, Result, Size, Vitality,
};

/// How far from the requested spot the player may be placed.
const PLAYER_SEARCH_RADIUS: i32 = 10;

/// How far from a generator its summons may appear.
const SUMMON_RADIUS: i32 = 3;

const PLAYER_VITALITY: i32 = 20;

/// The whole game world, a grid of regions.
///
/// Entities live in `ecs` and each one is listed in the groups of exactly
/// one region, the one its `PixelPos` is in. Missiles cross regions too
/// quickly to be worth tracking per region and go in the realm-wide
/// `groups`.
pub struct Realm {
    seed: u64,
    size: Size,
    tile_size: Size,
    region_size: Size,
    mapgen: MapGenSettings,
    regions: IndexMap<Position, Region>,
    pub ecs: hecs::World,
    pub groups: Groups,
}

impl Realm {
    /// Allocate every region of the realm and wire up their exits.
    ///
    /// Regions start out unplayable, call `generate_map` to fill them.
    pub fn new(spec: &RealmSpec) -> Result<Self> {
        spec.validate()?;

        let size = spec.realm_size;
        let region_px = spec.region_pixel_size();

        let mut regions = IndexMap::default();
        for coord in size.cells() {
            let base = IVec2::from(coord) * IVec2::from(region_px);
            regions.insert(
                coord,
                Region::new(spec.region_size)
                    .with_tile_size(spec.tile_size)
                    .with_pixel_base(base),
            );
        }

        let mut realm = Realm {
            seed: spec.seed,
            size,
            tile_size: spec.tile_size,
            region_size: spec.region_size,
            mapgen: spec.mapgen.clone(),
            regions,
            ecs: Default::default(),
            groups: Default::default(),
        };
        realm.wire_exits();

        log::info!(
            "allocated {size} realm of {} regions",
            realm.region_size
        );
        Ok(realm)
    }

    /// Connect every region to its east and south neighbours.
    ///
    /// Both sides of a shared border get the same exit offset.
    fn wire_exits(&mut self) {
        let mut rng = srng(&self.seed);
        let (w, h) = (self.region_size.width, self.region_size.height);

        for coord in self.size.cells() {
            let east = coord + ivec2(1, 0);
            if self.contains_region(east) {
                let offset = rng.gen_range(2..h - 2);
                self.link(coord, Compass::E, east, offset);
            }

            let south = coord + ivec2(0, 1);
            if self.contains_region(south) {
                let offset = rng.gen_range(2..w - 2);
                self.link(coord, Compass::S, south, offset);
            }
        }
    }

    fn link(&mut self, a: Position, dir: Compass, b: Position, offset: i32) {
        if let Some(region) = self.regions.get_mut(&a) {
            region.set_exit(dir, offset);
        }
        if let Some(region) = self.regions.get_mut(&b) {
            region.set_exit(dir.opposite(), offset);
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Size of the realm in regions.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn tile_size(&self) -> Size {
        self.tile_size
    }

    pub fn region_size(&self) -> Size {
        self.region_size
    }

    pub fn region_pixel_size(&self) -> Size {
        Size::new(
            self.region_size.width * self.tile_size.width,
            self.region_size.height * self.tile_size.height,
        )
    }

    /// Size of the whole realm in pixels.
    pub fn pixel_size(&self) -> Size {
        let r = self.region_pixel_size();
        Size::new(r.width * self.size.width, r.height * self.size.height)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains_region(&self, coord: Position) -> bool {
        self.size.contains(coord)
    }

    pub fn region(&self, coord: Position) -> Option<&Region> {
        self.regions.get(&coord)
    }

    pub fn region_mut(&mut self, coord: Position) -> Option<&mut Region> {
        self.regions.get_mut(&coord)
    }

    /// Iterate regions in row-major order.
    pub fn regions(&self) -> impl Iterator<Item = (Position, &Region)> {
        self.regions.iter().map(|(&p, r)| (p, r))
    }

    /// Generate every region.
    ///
    /// Regions are generated in parallel, each from its own random stream
    /// so the result does not depend on scheduling. Regions that fail to
    /// generate are left unplayable and the first error is returned.
    pub fn generate_map(&mut self) -> Result<()> {
        let seed = self.seed;
        let settings = &self.mapgen;

        let results: Vec<(Position, Design, Result<()>)> = self
            .regions
            .iter_mut()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(&coord, region)| {
                let mut rng = srng(&(seed, coord));
                let design = *settings.designs.pick(&mut rng);
                let ret = mapgen::generate_region(
                    &mut rng, region, &design, settings,
                );
                (coord, design, ret)
            })
            .collect();

        let mut first_error = None;
        for (coord, design, ret) in results {
            if let Err(e) = ret {
                log::warn!("region {coord}: {design:?} failed: {e}");
                first_error.get_or_insert(e);
            }
        }

        let playable =
            self.regions.values().filter(|r| r.is_playable()).count();
        log::info!("generated {playable}/{} regions", self.regions.len());

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Region coordinate containing a pixel, may be outside the realm.
    pub fn region_coord_from_pixel_position(&self, pixel: IVec2) -> Position {
        let r = self.region_pixel_size();
        pos(pixel.x.div_euclid(r.width), pixel.y.div_euclid(r.height))
    }

    pub fn region_from_pixel_position(&self, pixel: IVec2) -> Result<&Region> {
        self.regions
            .get(&self.region_coord_from_pixel_position(pixel))
            .ok_or(MapError::OutsideRealm {
                x: pixel.x,
                y: pixel.y,
            })
    }

    /// Regions that overlap a region-sized window centered on a pixel.
    ///
    /// These are the regions that need simulating around a viewpoint.
    pub fn neighbouring_regions_from_pixel_position(
        &self,
        pixel: IVec2,
    ) -> Vec<Position> {
        let r = self.region_pixel_size();
        let half = ivec2(r.width / 2, r.height / 2);

        let mut ret = Vec::with_capacity(4);
        for d in [ivec2(-1, -1), ivec2(1, -1), ivec2(-1, 1), ivec2(1, 1)] {
            let coord = self.region_coord_from_pixel_position(pixel + d * half);
            if self.contains_region(coord) && !ret.contains(&coord) {
                ret.push(coord);
            }
        }
        ret
    }

    /// Region whose groups list the entity.
    pub fn owning_region(&self, e: Entity) -> Option<Position> {
        self.regions
            .iter()
            .find(|(_, r)| r.groups.contains(GroupKind::All, e))
            .map(|(&p, _)| p)
    }

    /// Move an entity's group memberships to the region its position is in.
    ///
    /// Return the region the entity is in afterwards. Nothing changes if the
    /// entity has moved outside the realm.
    pub fn update_monster_group(
        &mut self,
        e: Entity,
        from: Position,
    ) -> Result<Position> {
        let pixel = self
            .ecs
            .get::<&PixelPos>(e)
            .map_err(|_| MapError::UnknownEntity(e))?
            .0;

        let to = self.region_coord_from_pixel_position(pixel);
        if !self.regions.contains_key(&to) {
            return Err(MapError::OutsideRealm {
                x: pixel.x,
                y: pixel.y,
            });
        }
        if to == from {
            return Ok(from);
        }

        let source = self
            .regions
            .get_mut(&from)
            .ok_or(MapError::NoSuchRegion(from))?;
        if !source.groups.contains(GroupKind::All, e) {
            return Err(MapError::UnknownEntity(e));
        }
        let kinds = source.groups.remove(e);
        source.rooms.remove_monster(e);

        let dest = self
            .regions
            .get_mut(&to)
            .ok_or(MapError::NoSuchRegion(to))?;
        for k in kinds {
            dest.groups.insert(k, e);
        }
        if self.ecs.satisfies::<&Monster>(e).unwrap_or(false) {
            let cell = dest.coordinate_from_absolute_position(pixel.x, pixel.y);
            if let Some(room) = dest.rooms.room_at(cell) {
                dest.rooms.add_monster(room, e);
            }
        }

        log::trace!("{e:?} moved from region {from} to {to}");
        Ok(to)
    }

    /// Move an entity by a pixel offset and update its region.
    ///
    /// The entity is kept inside the realm.
    pub fn move_entity(
        &mut self,
        e: Entity,
        from: Position,
        delta: IVec2,
    ) -> Result<Position> {
        let max = IVec2::from(self.pixel_size()) - IVec2::ONE;
        {
            let mut pixel = self
                .ecs
                .get::<&mut PixelPos>(e)
                .map_err(|_| MapError::UnknownEntity(e))?;
            pixel.0 = (pixel.0 + delta).clamp(IVec2::ZERO, max);
        }
        self.update_monster_group(e, from)
    }

    /// Turn the eggs and pickups of every region into live entities.
    pub fn build_world(&mut self) -> usize {
        let mut n = 0;
        for region in self.regions.values_mut() {
            n += region.build_world(&mut self.ecs).len();
        }
        log::info!("spawned {n} entities");
        n
    }

    /// Put the player on the free cell nearest to a pixel position.
    pub fn spawn_player(&mut self, pixel: IVec2) -> Result<Entity> {
        let coord = self.region_coord_from_pixel_position(pixel);
        let Some(region) = self.regions.get_mut(&coord) else {
            return Err(MapError::OutsideRealm {
                x: pixel.x,
                y: pixel.y,
            });
        };
        let cell = region.coordinate_from_absolute_position(pixel.x, pixel.y);
        let cell =
            region.nearest_free_space(cell.x, cell.y, PLAYER_SEARCH_RADIUS)?;

        let e = self.ecs.spawn((
            Player,
            PixelPos(region.pixel_position(cell, Align::Center)),
            Vitality(PLAYER_VITALITY),
        ));
        region.groups.add(e, &[GroupKind::Player, GroupKind::Solid]);
        log::debug!("player spawned in region {coord} at {cell}");
        Ok(e)
    }

    /// Spawn a monster in the cell that contains a pixel position.
    pub fn spawn_monster(
        &mut self,
        kind: MonsterType,
        pixel: IVec2,
    ) -> Result<Entity> {
        let coord = self.region_coord_from_pixel_position(pixel);
        let Some(region) = self.regions.get_mut(&coord) else {
            return Err(MapError::OutsideRealm {
                x: pixel.x,
                y: pixel.y,
            });
        };
        let cell = region.coordinate_from_absolute_position(pixel.x, pixel.y);
        Ok(region.spawn_monster(&mut self.ecs, kind, cell))
    }

    /// Spawn a missile into the realm-wide groups.
    pub fn spawn_missile(&mut self, pixel: IVec2) -> Entity {
        let e = self.ecs.spawn((Missile, PixelPos(pixel)));
        self.groups.add(e, &[GroupKind::Missile]);
        e
    }

    /// Have a generator monster spawn its minion next to it.
    ///
    /// Return `None` if the generator can't summon or there is no room.
    pub fn summon(&mut self, generator: Entity) -> Result<Option<Entity>> {
        let (kind, pixel) = {
            let mut query = self
                .ecs
                .query_one::<(&Monster, &PixelPos)>(generator)
                .map_err(|_| MapError::UnknownEntity(generator))?;
            let Some((m, p)) = query.get() else {
                return Err(MapError::UnknownEntity(generator));
            };
            (m.0, p.0)
        };
        let Some(minion) = kind.summons() else {
            return Ok(None);
        };

        let coord = self.region_coord_from_pixel_position(pixel);
        let Some(region) = self.regions.get_mut(&coord) else {
            return Err(MapError::OutsideRealm {
                x: pixel.x,
                y: pixel.y,
            });
        };
        let cell = region.coordinate_from_absolute_position(pixel.x, pixel.y);
        match region.nearest_free_space(cell.x, cell.y, SUMMON_RADIUS) {
            Ok(cell) => {
                let e = region.spawn_monster(&mut self.ecs, minion, cell);
                Ok(Some(e))
            }
            Err(e) => {
                log::debug!("{kind} could not summon: {e}");
                Ok(None)
            }
        }
    }

    /// Wake up the monsters in the room at a pixel position.
    ///
    /// Return the number of monsters woken.
    pub fn wake_room_at(&mut self, pixel: IVec2) -> Result<usize> {
        let region = self.region_from_pixel_position(pixel)?;
        let cell = region.coordinate_from_absolute_position(pixel.x, pixel.y);
        let monsters = region.room_monsters_at(cell).to_vec();

        let mut n = 0;
        for e in monsters {
            if self.ecs.insert_one(e, Awake).is_ok() {
                n += 1;
            }
        }
        Ok(n)
    }
}
