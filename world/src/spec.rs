use serde::{Deserialize, Serialize};
use util::WeightedTable;

use crate::{mapgen::Design, MapError, MonsterType, Result, Size};

/// Smallest region that can hold exits and a room.
const MIN_REGION_SIZE: Size = Size::new(5, 5);

/// Parameters for building a realm.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RealmSpec {
    pub seed: u64,
    /// Realm size in regions.
    pub realm_size: Size,
    /// Tile size in pixels.
    pub tile_size: Size,
    /// Region size in tiles.
    pub region_size: Size,
    pub mapgen: MapGenSettings,
}

impl Default for RealmSpec {
    fn default() -> Self {
        RealmSpec {
            seed: 0,
            realm_size: Size::new(10, 10),
            tile_size: Size::new(32, 32),
            region_size: Size::new(40, 22),
            mapgen: Default::default(),
        }
    }
}

impl RealmSpec {
    pub fn validate(&self) -> Result<()> {
        let positive = |s: Size| s.width > 0 && s.height > 0;

        if !positive(self.realm_size) {
            return Err(MapError::InvalidSpec(format!(
                "realm size {} must be nonzero",
                self.realm_size
            )));
        }
        if !positive(self.tile_size) {
            return Err(MapError::InvalidSpec(format!(
                "tile size {} must be nonzero",
                self.tile_size
            )));
        }
        if self.region_size.width < MIN_REGION_SIZE.width
            || self.region_size.height < MIN_REGION_SIZE.height
        {
            return Err(MapError::InvalidSpec(format!(
                "region size {} is smaller than {MIN_REGION_SIZE}",
                self.region_size
            )));
        }
        if self.mapgen.undersize_pc > 100 {
            return Err(MapError::InvalidSpec(format!(
                "undersize-pc {} is over 100",
                self.mapgen.undersize_pc
            )));
        }
        Ok(())
    }

    /// Size of one region in pixels.
    pub fn region_pixel_size(&self) -> Size {
        Size::new(
            self.region_size.width * self.tile_size.width,
            self.region_size.height * self.tile_size.height,
        )
    }
}

/// Tuning knobs for region generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MapGenSettings {
    /// Number of rooms in a connected rooms region.
    pub connected_node_count: usize,
    /// Number of rooms in a boss region.
    pub boss_node_count: usize,
    /// Percent chance for a room side to shrink by more than one cell.
    pub undersize_pc: u32,
    /// Starting percent chance of item drops in a room.
    pub item_drop_chance: u32,
    /// Starting percent chance of monster drops in a room.
    pub monster_drop_chance: u32,
    /// One in how many room cells get an accent floor.
    pub accent_one_in: usize,
    pub designs: WeightedTable<Design>,
    pub monsters: WeightedTable<MonsterType>,
}

impl Default for MapGenSettings {
    fn default() -> Self {
        MapGenSettings {
            connected_node_count: 16,
            boss_node_count: 2,
            undersize_pc: 50,
            item_drop_chance: 40,
            monster_drop_chance: 30,
            accent_one_in: 20,
            designs: WeightedTable::new([
                (Design::LargeRoom, 1),
                (Design::BossRegion, 2),
                (Design::EnclosedBossChamber, 2),
                (Design::ConnectedRooms, 10),
            ]),
            monsters: WeightedTable::new([
                (MonsterType::Zombie, 50),
                (MonsterType::Skeleton, 50),
                (MonsterType::Mummy, 20),
                (MonsterType::Tigerman, 20),
            ]),
        }
    }
}
