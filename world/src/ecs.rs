//! Entity components and per-region entity bookkeeping.

use derive_more::{Deref, DerefMut};
use glam::IVec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use util::{IndexMap, IndexSet};

use crate::{ItemKind, MonsterType};

/// Absolute pixel position of an entity in the realm.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Default,
    Deref,
    DerefMut,
    Serialize,
    Deserialize,
)]
pub struct PixelPos(pub IVec2);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Monster(pub MonsterType);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Vitality(pub i32);

/// Pixels per tick.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Speed(pub i32);

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Player;

#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Missile;

/// Monster has noticed the player.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Default, Serialize, Deserialize,
)]
pub struct Awake;

/// Something lying on the floor for the player to pick up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pickup {
    Item(ItemKind),
    Gold(u32),
}

/// Update and collision groups an entity can belong to.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
pub enum GroupKind {
    All,
    Player,
    Solid,
    Monster,
    Missile,
    Item,
    Effect,
}

/// Live entity sets of one simulation partition.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Groups(IndexMap<GroupKind, IndexSet<Entity>>);

impl Groups {
    /// Add entity to `All` and the given groups.
    pub fn add(&mut self, e: Entity, kinds: &[GroupKind]) {
        self.insert(GroupKind::All, e);
        for &k in kinds {
            self.insert(k, e);
        }
    }

    pub fn insert(&mut self, kind: GroupKind, e: Entity) -> bool {
        self.0.entry(kind).or_default().insert(e)
    }

    pub fn contains(&self, kind: GroupKind, e: Entity) -> bool {
        self.0.get(&kind).is_some_and(|set| set.contains(&e))
    }

    pub fn members(
        &self,
        kind: GroupKind,
    ) -> impl Iterator<Item = Entity> + '_ {
        self.0.get(&kind).into_iter().flat_map(|set| set.iter().copied())
    }

    pub fn count(&self, kind: GroupKind) -> usize {
        self.0.get(&kind).map_or(0, |set| set.len())
    }

    /// Groups the entity belongs to, in enum order.
    pub fn kinds_of(&self, e: Entity) -> Vec<GroupKind> {
        GroupKind::iter().filter(|&k| self.contains(k, e)).collect()
    }

    /// Remove entity from every group, return the groups it was in.
    pub fn remove(&mut self, e: Entity) -> Vec<GroupKind> {
        let kinds = self.kinds_of(e);
        for k in &kinds {
            if let Some(set) = self.0.get_mut(k) {
                set.shift_remove(&e);
            }
        }
        kinds
    }
}
