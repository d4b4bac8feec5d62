//! Playback completion events.
//!
//! When a one-shot playback finishes, the node fires the owner's completion
//! callback and also triggers a [`PlaybackFinished`] event. Observers are
//! the place to react with world mutations (say, spawning a follow-up
//! animation) because their commands apply after the tick pass completes,
//! never mid-iteration. The completion callback itself only receives the
//! finishing instance and cannot touch the live set.
//!
//! # Example
//!
//! ```ignore
//! node.world_mut().add_observer(
//!     |trigger: On<PlaybackFinished>, mut commands: Commands| {
//!         // The playback entity despawns after this observer runs.
//!         log::info!("finished: {:?}", trigger.event().entity);
//!     },
//! );
//! ```
//!
//! # Related
//!
//! - [`crate::systems::playback::finalize_playback`] – the system that
//!   triggers these events

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

/// Event fired when a one-shot playback completes.
///
/// Triggered on the tick where completion is detected, after the stored
/// completion callback has run and before the entity despawns. Repeat
/// playbacks never produce this event.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlaybackFinished {
    /// The playback entity that finished. Despawned after observers run.
    pub entity: Entity,
}

/// Example observer that logs finished playbacks.
///
/// Register it with `world.add_observer(observe_log_on_finished)` for a
/// quick diagnostic trail, or use it as a template for game-specific
/// completion handling.
pub fn observe_log_on_finished(trigger: On<PlaybackFinished>) {
    debug!("Playback finished: {:?}", trigger.event().entity);
}
