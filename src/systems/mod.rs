//! Node systems.
//!
//! This module groups the ECS systems that advance playback state.
//!
//! Submodules overview
//! - [`mirror`] – push the node's flip state to every live instance
//! - [`playback`] – advance instances, detect one-shot completion, fire
//!   callbacks, despawn finished entities
//! - [`time`] – update simulation time and delta

pub mod mirror;
pub mod playback;
pub mod time;
