// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Calibration constants and tuning defaults for the reference Zumo 32U4 chassis.
//!
//! Geometry values come from the Pololu 75:1 HP micro metal gearmotors with the 12 CPR encoder
//! and the stock 39 mm sprockets. Tuning values (`BASE_SPEED`, ramp fractions) are empirical.

/// Encoder ticks per output-shaft rotation (12 CPR × 75.81:1 gearbox).
pub const TICKS_PER_ROTATION: f32 = 909.7;

/// Drive sprocket diameter (mm).
pub const WHEEL_DIAMETER_MM: f32 = 39.0;

/// Distance between track centerlines (mm).
pub const WHEEL_BASE_MM: f32 = 98.0;

/// Full motor command magnitude used for drives and turns.
pub const BASE_SPEED: i16 = 200;

/// Largest magnitude accepted by the motor driver. Commands beyond this are clamped.
pub const MAX_SPEED: i16 = 400;

/// Interval between encoder polls (ms).
pub const CONTROL_PERIOD_MS: u32 = 10;

/// Fraction of `BASE_SPEED` used before the ramp latches to full speed.
pub const RAMP_START_FRACTION: f32 = 0.5;

/// Fraction of the tick target after which the ramp latches to full speed.
pub const RAMP_SWITCH_FRACTION: f32 = 0.25;

/// TRIM adjustment per button press.
pub const TRIM_STEP: i16 = 5;

/// TRIM is clamped to `-TRIM_LIMIT..=TRIM_LIMIT`.
pub const TRIM_LIMIT: i16 = 50;

/// How long the timed motor test runs (ms).
pub const TEST_DURATION_MS: u32 = 2000;
