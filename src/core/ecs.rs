use bevy_ecs::prelude::*;
use tracing::warn;

use crate::data::feats::load_feat_catalog;
use crate::data::talents::load_talent_catalog;
use crate::systems::eligibility::{
    eligibility_refresh_system, EligibilityBoard, ProgressionLibrary,
};

/// Build the ECS world around a caller-owned content library. The library
/// is plain data; to reload content, replace the resource and re-run the
/// schedule.
pub fn create_world(library: ProgressionLibrary) -> World {
    let mut world = World::new();
    world.insert_resource(library);
    world.insert_resource(EligibilityBoard::default());
    world
}

/// Build the per-tick schedule.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(eligibility_refresh_system);
    schedule
}

/// Load the default content library, degrading to empty collections so a
/// missing file leaves the world usable.
pub fn load_default_library() -> ProgressionLibrary {
    ProgressionLibrary {
        trees: match load_talent_catalog("./assets/data/talent_trees.json") {
            Ok(catalog) => catalog.trees,
            Err(err) => {
                warn!(%err, "failed to load talent catalog");
                Vec::new()
            }
        },
        feats: match load_feat_catalog("./assets/data/feats.json") {
            Ok(catalog) => catalog.feats,
            Err(err) => {
                warn!(%err, "failed to load feat catalog");
                Vec::new()
            }
        },
    }
}
