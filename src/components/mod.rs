//! ECS components for playback entities.
//!
//! This module groups the component types attached to the entities the node
//! manages. Every live animation is one entity with one component.
//!
//! Submodules overview:
//! - [`playback`] – the owned engine instance, playback mode, and completion
//!   callback of one live animation, plus the internal completion marker

pub mod playback;
