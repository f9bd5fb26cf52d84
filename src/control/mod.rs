// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Motion Control
//!
//! Dead-reckoning motion built on wheel encoder ticks.
//!
//! ## Modules
//!
//! - [`geometry`] - Wheel/chassis calibration and tick conversions.
//! - [`motion_controller`] - Blocking straight-drive and in-place-turn controller.
//! - [`trim`] - Right-motor speed offset for straight tracking.

pub mod geometry;
pub mod motion_controller;
pub mod trim;

pub use geometry::Geometry;
pub use motion_controller::{MotionConfig, MotionController, MoveSummary, Ramp};
pub use trim::{Trim, TrimAdvice};
