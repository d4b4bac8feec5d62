//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution.
//!
//! Overview
//! - `mirror` – facade-level flip flags applied to every live instance
//! - `playbackconfig` – tick-pass tunables loaded from an INI file
//! - `worldtime` – simulation time and delta

pub mod mirror;
pub mod playbackconfig;
pub mod worldtime;
