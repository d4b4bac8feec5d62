//! Playback component for live animation instances.
//!
//! Each entity created by the node carries exactly one [`Playback`]
//! component: the engine instance it exclusively owns, the playback mode
//! fixed at creation time, and the completion callback.
//!
//! # How It Works
//!
//! 1. The node spawns an entity with a `Playback` when a play call succeeds
//! 2. The `advance_playback` system advances the instance each tick
//! 3. A `Once` playback whose time-ratio saturates or wraps is tagged with
//!    the [`Finished`] marker
//! 4. `finalize_playback` fires the callback once and despawns the entity
//!
//! # Related
//!
//! - [`crate::systems::playback`] – the systems that drive these components
//! - [`crate::engine::EntityInstance`] – the owned engine handle

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::engine::EntityInstance;

/// Playback mode, fixed at instance-creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Play through once, fire the completion callback, despawn.
    Once,
    /// Loop until explicitly deleted. Never auto-removed.
    Repeat,
}

/// Completion callback, invoked with the completing instance.
///
/// Fires at most once per instance, only for [`PlayMode::Once`], on the
/// tick where completion is detected.
pub type CompleteFn = Box<dyn FnMut(&mut dyn EntityInstance) + Send + Sync>;

/// A live, node-owned animation playback.
#[derive(Component)]
pub struct Playback {
    /// The engine instance, exclusively owned by this component.
    pub instance: Box<dyn EntityInstance>,
    /// Playback mode. Immutable after creation.
    pub mode: PlayMode,
    /// Completion callback. No-op by default.
    pub on_complete: CompleteFn,
}

impl Playback {
    /// One-shot playback with the default no-op callback.
    pub fn once(instance: Box<dyn EntityInstance>) -> Self {
        Self::once_with(instance, Box::new(|_| {}))
    }

    /// One-shot playback with a completion callback.
    pub fn once_with(instance: Box<dyn EntityInstance>, on_complete: CompleteFn) -> Self {
        Self {
            instance,
            mode: PlayMode::Once,
            on_complete,
        }
    }

    /// Looping playback. Runs until explicitly deleted.
    pub fn repeat(instance: Box<dyn EntityInstance>) -> Self {
        Self {
            instance,
            mode: PlayMode::Repeat,
            on_complete: Box::new(|_| {}),
        }
    }
}

/// Marker for a `Once` playback whose completion was detected this tick.
///
/// Inserted by `advance_playback`, consumed by `finalize_playback` in the
/// same tick. Never survives a full tick.
#[derive(Component)]
pub struct Finished;
