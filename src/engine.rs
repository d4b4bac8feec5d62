//! Playback-engine collaborator contracts.
//!
//! The node does not implement any skeletal-animation math itself. It drives
//! an external engine through two narrow traits:
//!
//! - [`PlaybackEngine`] – produces live [`EntityInstance`] values from a
//!   template name
//! - [`EntityInstance`] – one live, time-advancing playback of an animation
//!   template
//!
//! Both traits are object-safe. Instances are stored as
//! `Box<dyn EntityInstance>` inside ECS component data, which is why that
//! trait carries `Send + Sync`; the engine itself lives on the node and
//! only needs `Send`.

/// One live playback of an animation template.
///
/// The engine owns the skeleton/keyframe math behind this handle; the node
/// only advances it, queries its progress, and asks it to produce side
/// effects (triggers, rendering, mirroring).
pub trait EntityInstance: Send + Sync {
    /// Advance the playback by an elapsed time in milliseconds.
    fn advance(&mut self, elapsed_ms: f32);

    /// Normalized progress within the current loop of the clip, in `[0, 1)`.
    ///
    /// For looping engines the ratio wraps back toward zero at the end of
    /// each loop; the node uses that wrap as its completion signal for
    /// one-shot playbacks.
    fn time_ratio(&self) -> f32;

    /// Evaluate any timeline triggers that became due this tick.
    fn evaluate_triggers(&mut self);

    /// Emit the instance's render side effects for this tick.
    fn render(&mut self);

    /// Set the per-axis mirror scale. The node passes `-1.0` or `1.0` per
    /// axis, never other magnitudes.
    fn set_mirror_scale(&mut self, sx: f32, sy: f32);
}

/// Factory for live entity instances.
///
/// `instantiate` returns `None` when the template name is unknown or the
/// engine cannot produce an instance; the node treats that as a non-fatal
/// creation failure and adds no record.
pub trait PlaybackEngine: Send {
    fn instantiate(&mut self, template: &str) -> Option<Box<dyn EntityInstance>>;
}
