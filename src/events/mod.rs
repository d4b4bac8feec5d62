//! Event types and observers used by the node.
//!
//! Events provide a decoupled way for hosts to react to playback lifecycle
//! changes without coupling to the tick pass itself.
//!
//! Submodules:
//! - [`playback`] – completion notifications for one-shot playbacks

pub mod playback;
