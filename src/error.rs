// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types for motion requests and controller configuration.

use core::fmt;

/// Error type for `MotionController` operations.
///
/// Every variant raised after the wheels started moving is reported only after a `(0, 0)` stop
/// command has been issued.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MotionError {
    /// Request was NaN or infinite.
    InvalidArgument,
    /// Request magnitude exceeded the configured guard.
    OutOfRange { requested: f32, limit: f32 },
    /// No tick progress within the stall window, or the poll budget ran out.
    Timeout { polls: u32, progress: u32 },
    /// The caller's cancel flag was raised mid-move.
    Cancelled { polls: u32, progress: u32 },
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidArgument => f.write_str("motion request is not a finite number"),
            MotionError::OutOfRange { requested, limit } => {
                write!(f, "motion request {} exceeds limit {}", requested, limit)
            }
            MotionError::Timeout { polls, progress } => {
                write!(f, "motion timed out after {} polls at {} ticks", polls, progress)
            }
            MotionError::Cancelled { polls, progress } => {
                write!(f, "motion cancelled after {} polls at {} ticks", polls, progress)
            }
        }
    }
}

/// Error type for building a `Geometry` or `MotionController`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A geometry input was zero, negative, or not finite.
    InvalidGeometry,
    /// Base speed outside `1..=MAX_SPEED`.
    InvalidSpeed(i16),
    /// Ramp fractions outside `(0, 1]` / `[0, 1)`.
    InvalidRamp,
    /// Control period of zero.
    InvalidPeriod,
    /// Range guard negative or not finite, or a zero-length stall window / poll budget.
    InvalidGuard,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidGeometry => f.write_str("geometry values must be positive and finite"),
            ConfigError::InvalidSpeed(s) => write!(f, "base speed {} out of range", s),
            ConfigError::InvalidRamp => f.write_str("ramp fractions out of range"),
            ConfigError::InvalidPeriod => f.write_str("control period must be nonzero"),
            ConfigError::InvalidGuard => f.write_str("motion guard out of range"),
        }
    }
}
