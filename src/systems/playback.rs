//! Playback tick systems.
//!
//! The per-tick pass over all live instances, split into two chained
//! systems:
//!
//! - [`advance_playback`] – advances every instance by the tick's delta,
//!   detects completed one-shot playbacks, and renders the rest
//! - [`finalize_playback`] – fires completion callbacks and despawns the
//!   finished entities
//!
//! # System Flow
//!
//! Each tick:
//!
//! 1. `advance_playback` captures the pre-tick time-ratio, advances the
//!    instance by `delta * 1000` milliseconds, and compares ratios
//! 2. A `Once` playback past the completion threshold, or whose ratio
//!    wrapped back toward zero, is tagged [`Finished`] and skips triggers
//!    and rendering for the tick; its lifetime has ended
//! 3. Everything else evaluates triggers, then renders
//! 4. `finalize_playback` runs after the markers have applied: it invokes
//!    each finished playback's callback with the instance, triggers a
//!    [`PlaybackFinished`] event, and despawns the entity
//!
//! Splitting the pass guarantees that every live instance is advanced with
//! the same delta before any completion callback fires, and that removal
//! never touches the container mid-iteration: marker insertion and despawn
//! both go through the command buffer.
//!
//! # Completion Detection
//!
//! The engine exposes no explicit "finished" flag, so completion of a
//! non-looping clip is inferred from the time-ratio: either it sat near the
//! end of the loop on the previous tick (`before > threshold`), or it
//! wrapped past the end during this one (`after < before`). A pathological
//! tick long enough to wrap the ratio past its starting point would be
//! missed; engines that can saturate their ratio at the clip end avoid
//! this entirely.
//!
//! # Related
//!
//! - [`crate::components::playback::Playback`] – per-entity playback state
//! - [`crate::events::playback::PlaybackFinished`] – completion event

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::playback::{Finished, PlayMode, Playback};
use crate::events::playback::PlaybackFinished;
use crate::resources::playbackconfig::PlaybackConfig;
use crate::resources::worldtime::WorldTime;

/// Whether a one-shot playback finished between two ratio observations.
pub(crate) fn completion_reached(before: f32, after: f32, threshold: f32) -> bool {
    before > threshold || after < before
}

/// Advance all live playbacks by the tick's delta and detect completions.
///
/// Contract
/// - Reads [`WorldTime`] for the scaled delta (converted to milliseconds,
///   the unit the engine expects).
/// - Mutates every [`Playback`]'s instance.
/// - Tags completed `Once` playbacks with [`Finished`] via commands; those
///   entities see no trigger evaluation and no render this tick.
pub fn advance_playback(
    time: Res<WorldTime>,
    config: Res<PlaybackConfig>,
    mut query: Query<(Entity, &mut Playback), Without<Finished>>,
    mut commands: Commands,
) {
    let elapsed_ms = time.delta * 1000.0;
    for (entity, mut playback) in query.iter_mut() {
        let before = playback.instance.time_ratio();
        playback.instance.advance(elapsed_ms);
        let after = playback.instance.time_ratio();

        if playback.mode == PlayMode::Once
            && completion_reached(before, after, config.completion_threshold)
        {
            trace!("Playback {:?} finished ({:.3} -> {:.3})", entity, before, after);
            commands.entity(entity).insert(Finished);
        } else {
            playback.instance.evaluate_triggers();
            playback.instance.render();
        }
    }
}

/// Fire completion callbacks and despawn finished playbacks.
///
/// Runs after [`advance_playback`] in the tick schedule. Each callback is
/// invoked exactly once, with the completing instance; the entity is then
/// despawned through the command buffer, so a callback can never observe
/// its own entity as removed.
pub fn finalize_playback(
    mut query: Query<(Entity, &mut Playback), With<Finished>>,
    mut commands: Commands,
) {
    for (entity, mut playback) in query.iter_mut() {
        let Playback {
            instance,
            on_complete,
            ..
        } = &mut *playback;
        (on_complete)(instance.as_mut());
        commands.trigger(PlaybackFinished { entity });
        commands.entity(entity).try_despawn();
    }
}
