//! Mirroring state shared by all live instances.
//!
//! Flipping is a property of the node, not of any single instance: every
//! live instance and every newly created one must carry the same per-axis
//! mirror scale. The [`MirrorState`] resource holds the flip flags;
//! [`propagate_mirror`](crate::systems::mirror::propagate_mirror) pushes
//! them to the engine instances.

use bevy_ecs::prelude::Resource;

/// Facade-level flip flags, mapped to a per-axis ±1 mirror scale.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MirrorState {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl MirrorState {
    pub fn scale_x(&self) -> f32 {
        if self.flip_x { -1.0 } else { 1.0 }
    }

    pub fn scale_y(&self) -> f32 {
        if self.flip_y { -1.0 } else { 1.0 }
    }
}
