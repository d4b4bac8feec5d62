//! The animation node facade.
//!
//! [`AnimationNode`] is the surface a host scene graph talks to. It owns the
//! ECS world holding every live playback, the tick schedule that advances
//! them, and the playback engine that instantiates templates. The host
//! drives it with one `update(dt)` call per tick while the node is active.
//!
//! # Lifecycle
//!
//! 1. Build the node with a boxed [`PlaybackEngine`]
//! 2. `on_activate()` when the host starts delivering ticks
//! 3. `play` / `play_once` / `play_once_with` spawn playbacks; each call
//!    re-applies the current flip state so new instances are mirrored
//!    before their first render
//! 4. `update(dt)` once per tick advances everything, fires completion
//!    callbacks, and despawns finished one-shots
//! 5. `delete_entity` cancels a playback mid-flight and clears the handle
//! 6. `on_deactivate()` when ticks stop; dropping the node releases all
//!    remaining instances
//!
//! All operations are synchronous on the caller's thread. The node requires
//! external serialization if shared across threads.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::playback::{CompleteFn, Playback};
use crate::engine::{EntityInstance, PlaybackEngine};
use crate::resources::mirror::MirrorState;
use crate::resources::playbackconfig::PlaybackConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::mirror::propagate_mirror;
use crate::systems::playback::{advance_playback, finalize_playback};
use crate::systems::time::update_world_time;

/// Scene-node facade over the playback world.
pub struct AnimationNode {
    world: World,
    schedule: Schedule,
    engine: Box<dyn PlaybackEngine>,
    active: bool,
}

impl AnimationNode {
    /// Create a node with default configuration.
    pub fn new(engine: Box<dyn PlaybackEngine>) -> Self {
        Self::with_config(engine, PlaybackConfig::default())
    }

    /// Create a node with explicit configuration.
    pub fn with_config(engine: Box<dyn PlaybackEngine>, config: PlaybackConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default().with_time_scale(config.time_scale));
        world.insert_resource(MirrorState::default());
        world.insert_resource(config);

        let mut schedule = Schedule::default();
        schedule.add_systems((advance_playback, finalize_playback).chain());

        Self {
            world,
            schedule,
            engine,
            active: false,
        }
    }

    /// Start a looping playback. Runs until explicitly deleted.
    ///
    /// Returns `None` if the engine cannot instantiate the template.
    pub fn play(&mut self, template: &str) -> Option<Entity> {
        self.create(template, Playback::repeat)
    }

    /// Start a one-shot playback with the default no-op callback.
    pub fn play_once(&mut self, template: &str) -> Option<Entity> {
        self.create(template, Playback::once)
    }

    /// Start a one-shot playback, invoking `on_complete` with the instance
    /// on the tick its clip finishes.
    pub fn play_once_with(&mut self, template: &str, on_complete: CompleteFn) -> Option<Entity> {
        self.create(template, |instance| Playback::once_with(instance, on_complete))
    }

    fn create(
        &mut self,
        template: &str,
        build: impl FnOnce(Box<dyn EntityInstance>) -> Playback,
    ) -> Option<Entity> {
        let Some(instance) = self.engine.instantiate(template) else {
            warn!("Failed to instantiate template '{}'", template);
            return None;
        };
        let entity = self.world.spawn(build(instance)).id();
        debug!("Created playback {:?} from template '{}'", entity, template);
        // The new instance must carry the current mirror scale before its
        // first render, so this cannot wait for the next tick.
        propagate_mirror(&mut self.world);
        Some(entity)
    }

    /// Cancel a playback and clear the caller's handle.
    ///
    /// Idempotent: a `None` handle, or one whose playback already completed
    /// or was deleted, is a no-op. The handle is always `None` afterwards,
    /// so stale use is structurally prevented.
    pub fn delete_entity(&mut self, handle: &mut Option<Entity>) {
        if let Some(entity) = handle.take() {
            if self.world.get_entity(entity).is_ok() {
                self.world.despawn(entity);
                debug!("Deleted playback {:?}", entity);
            }
        }
    }

    /// Mirror all live and future instances horizontally.
    pub fn set_flipped_x(&mut self, flipped: bool) {
        self.world.resource_mut::<MirrorState>().flip_x = flipped;
        propagate_mirror(&mut self.world);
    }

    /// Mirror all live and future instances vertically.
    pub fn set_flipped_y(&mut self, flipped: bool) {
        self.world.resource_mut::<MirrorState>().flip_y = flipped;
        propagate_mirror(&mut self.world);
    }

    pub fn is_flipped_x(&self) -> bool {
        self.world.resource::<MirrorState>().flip_x
    }

    pub fn is_flipped_y(&self) -> bool {
        self.world.resource::<MirrorState>().flip_y
    }

    /// Begin receiving ticks. Mirrors the host's scene-enter hook.
    pub fn on_activate(&mut self) {
        self.active = true;
    }

    /// Stop receiving ticks. Mirrors the host's scene-exit hook.
    pub fn on_deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance every live playback by `dt` seconds.
    ///
    /// No-op while the node is inactive. The host contract is one call per
    /// logical tick, never concurrent with itself.
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
    }

    /// Number of live playbacks.
    pub fn live_count(&mut self) -> usize {
        let mut query = self.world.query::<&Playback>();
        query.iter(&self.world).count()
    }

    /// The underlying world, for observer registration and inspection.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
