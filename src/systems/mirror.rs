//! Mirror propagation.
//!
//! Pushes the node-level [`MirrorState`](crate::resources::mirror::MirrorState)
//! to every live instance. Runs on demand (whenever the flip state changes
//! and right after every creation) rather than once per tick, so a newly
//! spawned instance never renders un-mirrored, not even for one frame.
use bevy_ecs::prelude::*;

use crate::components::playback::Playback;
use crate::resources::mirror::MirrorState;

/// Apply the current mirror scale to every live instance.
pub fn propagate_mirror(world: &mut World) {
    let mirror = *world.resource::<MirrorState>();
    let mut query = world.query::<&mut Playback>();
    for mut playback in query.iter_mut(world) {
        playback
            .instance
            .set_mirror_scale(mirror.scale_x(), mirror.scale_y());
    }
}
