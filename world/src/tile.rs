use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Reference to a strip of animation frames in a named sprite sheet.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Filmstrip {
    pub sheet: &'static str,
    pub column: u32,
    pub row: u32,
    /// Number of consecutive frames starting from column, row.
    pub frames: u32,
}

impl Filmstrip {
    const fn new(
        sheet: &'static str,
        column: u32,
        row: u32,
        frames: u32,
    ) -> Self {
        Filmstrip {
            sheet,
            column,
            row,
            frames,
        }
    }
}

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
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TileType {
    StoneWall,
    StoneFloor,
    Water,
    Lava,
    Wood,
    Grass,
    Earth,
    Hedge,
    Rubble,
}

use TileType::*;

impl TileType {
    pub fn filmstrip(self) -> Filmstrip {
        match self {
            StoneWall => Filmstrip::new("terrain", 7, 3, 1),
            StoneFloor => Filmstrip::new("terrain", 7, 0, 1),
            Water => Filmstrip::new("liquids", 0, 0, 6),
            Lava => Filmstrip::new("lava", 0, 0, 10),
            Wood => Filmstrip::new("terrain", 0, 4, 2),
            Grass => Filmstrip::new("terrain", 0, 1, 1),
            Earth => Filmstrip::new("terrain", 1, 1, 1),
            Hedge => Filmstrip::new("vegetation", 1, 3, 1),
            Rubble => Filmstrip::new("terrain", 3, 2, 1),
        }
    }

    /// Solid tiles block movement and free-space queries.
    pub fn is_solid(self) -> bool {
        matches!(self, StoneWall | Hedge)
    }

    /// Draw layer, tiles above 0 are overlays on top of the base floor.
    pub fn layer(self) -> u8 {
        match self {
            Rubble => 1,
            _ => 0,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            StoneWall => '#',
            StoneFloor => '.',
            Water => '~',
            Lava => '&',
            Wood => '_',
            Grass => ',',
            Earth => ':',
            Hedge => '%',
            Rubble => ';',
        }
    }
}

/// Sparse decoration or pickup drawn over the base tile of a cell.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Overlay {
    Decoration(TileType),
    Item(ItemKind),
    Gold(u32),
}

impl Overlay {
    /// Pickups turn into live entities when the world is built.
    pub fn is_pickup(&self) -> bool {
        matches!(self, Overlay::Item(_) | Overlay::Gold(_))
    }

    pub fn glyph(&self) -> char {
        match self {
            Overlay::Decoration(t) => t.glyph(),
            Overlay::Item(item) => item.glyph(),
            Overlay::Gold(_) => '$',
        }
    }
}

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
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MonsterType {
    Zombie,
    ZombieGenerator,
    Skeleton,
    Mummy,
    Tigerman,
}

impl MonsterType {
    pub fn vitality(self) -> i32 {
        match self {
            MonsterType::Zombie => 10,
            MonsterType::ZombieGenerator => 100,
            MonsterType::Skeleton => 5,
            MonsterType::Mummy => 30,
            MonsterType::Tigerman => 40,
        }
    }

    /// Movement speed in pixels per tick.
    pub fn speed(self) -> i32 {
        match self {
            MonsterType::Zombie | MonsterType::Mummy => 2,
            MonsterType::ZombieGenerator => 0,
            MonsterType::Skeleton => 4,
            MonsterType::Tigerman => 5,
        }
    }

    /// What a generator monster spawns, if anything.
    pub fn summons(self) -> Option<MonsterType> {
        match self {
            MonsterType::ZombieGenerator => Some(MonsterType::Zombie),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            MonsterType::Zombie => 'z',
            MonsterType::ZombieGenerator => 'Z',
            MonsterType::Skeleton => 's',
            MonsterType::Mummy => 'm',
            MonsterType::Tigerman => 't',
        }
    }
}

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
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ItemKind {
    Arrow,
    Dagger,
    Sword,
    BattleAxe,
    ChainMail,
    LeatherArmour,
    Shortbow,
    Sling,
    Melon,
    Strawberry,
    Pear,
    Lemon,
    Pineapple,
    Carrot,
    Bread,
    Cheese,
    RedPotion,
    OrangePotion,
    YellowPotion,
    BluePotion,
    MagentaPotion,
    GreenPotion,
    GreyPotion,
}

impl ItemKind {
    /// Human-readable name, eg. "battle axe".
    pub fn name(self) -> String {
        self.to_string().replace('-', " ")
    }

    pub fn glyph(self) -> char {
        use ItemKind::*;
        match self {
            Arrow => '/',
            Dagger | Sword | BattleAxe => ')',
            ChainMail | LeatherArmour => '[',
            Shortbow | Sling => '}',
            RedPotion | OrangePotion | YellowPotion | BluePotion
            | MagentaPotion | GreenPotion | GreyPotion => '!',
            _ => '%',
        }
    }
}
