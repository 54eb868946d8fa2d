//! Dungeon realm datatypes and procedural generation.

mod ecs;
pub use ecs::{
    Awake, GroupKind, Groups, Missile, Monster, Pickup, PixelPos, Player,
    Speed, Vitality,
};

mod error;
pub use error::MapError;

mod geom;
pub use geom::{pos, Compass, Position, Size};

pub mod mapgen;

mod plane;

mod realm;
pub use realm::Realm;

mod region;
pub use region::{Align, Region};

mod rooms;
pub use rooms::Rooms;

mod spec;
pub use spec::{MapGenSettings, RealmSpec};

mod tile;
pub use tile::{Filmstrip, ItemKind, MonsterType, Overlay, TileType};

pub type Result<T, E = MapError> = std::result::Result<T, E>;
