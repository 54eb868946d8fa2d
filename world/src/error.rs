use thiserror::Error;

use crate::Position;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MapError {
    #[error("cannot split a sub-region with extent {extent}")]
    SizeConstraint { extent: i32 },
    #[error("pixel position ({x}, {y}) is outside the realm")]
    OutsideRealm { x: i32, y: i32 },
    #[error("no free space within {max_distance} cells of ({x}, {y})")]
    NoFreeSpace { x: i32, y: i32, max_distance: i32 },
    #[error("no region at {0}")]
    NoSuchRegion(Position),
    #[error("invalid realm spec: {0}")]
    InvalidSpec(String),
    #[error("unknown entity {0:?}")]
    UnknownEntity(hecs::Entity),
}
