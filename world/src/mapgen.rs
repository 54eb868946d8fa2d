//! Procedural region generation.
//!
//! Generation runs in stages. A region is split into sub-regions, each
//! sub-region gets a node at its center, nodes and exits are joined by
//! corridors, rooms are grown around the nodes, the region is carved out of
//! solid rock and finally rooms are stocked with loot and monster eggs.

use rand::RngCore;

use crate::{MapGenSettings, Position, Region, Result};

mod bsp;
pub use bsp::{make_nodes, make_sub_regions, SubRegion};

mod compose;
pub use compose::{carve_out_dungeon, floor_themes};

mod design;
pub use design::Design;

mod nodes;
pub use nodes::{
    default_corridor_widths, join_exits, join_nodes, join_two_nodes,
};

mod populate;
pub use populate::{item_drops, monster_drops, treasure_only, Dropper};

mod rooms;
pub use rooms::make_rooms_in_subregions;

/// Corridor and room cells of a region before carving.
#[derive(Clone, Debug, Default)]
pub struct Layout {
    pub corridors: Vec<Position>,
    pub rooms: Vec<Vec<Position>>,
}

pub trait RegionGenerator {
    fn name(&self) -> &'static str;

    /// Lay out corridors and rooms for the region.
    fn layout(
        &self,
        rng: &mut dyn RngCore,
        region: &Region,
        settings: &MapGenSettings,
    ) -> Result<Layout>;

    /// Stock the carved region with items and monsters.
    fn populate(
        &self,
        rng: &mut dyn RngCore,
        region: &mut Region,
        layout: &Layout,
        settings: &MapGenSettings,
    );
}

/// Run a generator on a fresh region and mark it playable.
///
/// The region is left untouched if layout fails.
pub fn generate_region(
    rng: &mut dyn RngCore,
    region: &mut Region,
    generator: &dyn RegionGenerator,
    settings: &MapGenSettings,
) -> Result<()> {
    if region.is_playable() {
        log::warn!("{}: region already generated, skipping", region.name);
        return Ok(());
    }

    let mut layout = generator.layout(rng, region, settings)?;

    // The outer wall is only broken at exits.
    let size = region.size();
    let exits: Vec<Position> =
        region.exit_positions().map(|(_, p)| p).collect();
    layout
        .corridors
        .retain(|&p| !size.on_border(p) || exits.contains(&p));

    region.rooms.add_rooms(&layout.rooms);
    carve_out_dungeon(
        rng,
        region,
        &layout.corridors,
        &layout.rooms,
        settings.accent_one_in,
    );
    generator.populate(rng, region, &layout, settings);

    region.name = format!("{}-{}", generator.name(), region.pixel_base());
    region.mark_playable();

    log::debug!(
        "{}: {} rooms, {} eggs, {} overlays",
        region.name,
        region.rooms.count(),
        region.monster_eggs.len(),
        region.visual_effects.len()
    );
    Ok(())
}
