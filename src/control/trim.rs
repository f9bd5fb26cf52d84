// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Right-motor TRIM offset.
//!
//! Two "identical" gearmotors rarely run at the same speed for the same command, so a robot
//! commanded `(200, 200)` drifts to one side. TRIM is a small signed offset added to the right
//! motor command to cancel that drift.
//!
//! Finding it is manual: run a timed straight drive, watch which way the robot curves, nudge TRIM
//! by [`TRIM_STEP`], repeat.

use crate::config::{MAX_SPEED, TRIM_LIMIT, TRIM_STEP};

/// Which way the current TRIM value corrects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrimAdvice {
    /// Positive TRIM: right motor boosted. Use when the robot curves left.
    BoostRight,
    /// Negative TRIM: left motor effectively boosted. Use when the robot curves right.
    BoostLeft,
    /// No correction.
    Balanced,
}

/// Signed right-motor offset, always within `-TRIM_LIMIT..=TRIM_LIMIT`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Trim {
    value: i16,
}

impl Trim {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    /// Build a TRIM from a stored value, clamped to the valid range.
    pub fn with_value(value: i16) -> Self {
        Self {
            value: value.clamp(-TRIM_LIMIT, TRIM_LIMIT),
        }
    }

    #[inline]
    pub fn value(&self) -> i16 {
        self.value
    }

    /// Raise TRIM by one step. Returns the new value.
    pub fn increase(&mut self) -> i16 {
        self.value = (self.value + TRIM_STEP).clamp(-TRIM_LIMIT, TRIM_LIMIT);
        self.value
    }

    /// Lower TRIM by one step. Returns the new value.
    pub fn decrease(&mut self) -> i16 {
        self.value = (self.value - TRIM_STEP).clamp(-TRIM_LIMIT, TRIM_LIMIT);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0;
    }

    pub fn advice(&self) -> TrimAdvice {
        match self.value {
            v if v > 0 => TrimAdvice::BoostRight,
            v if v < 0 => TrimAdvice::BoostLeft,
            _ => TrimAdvice::Balanced,
        }
    }

    /// Forward test-drive speeds `(left, right)` for a given base speed, clamped to the driver
    /// range.
    pub fn speeds(&self, base_speed: i16) -> (i16, i16) {
        let left = base_speed.clamp(-MAX_SPEED, MAX_SPEED);
        let right = base_speed
            .saturating_add(self.value)
            .clamp(-MAX_SPEED, MAX_SPEED);
        (left, right)
    }

    /// Apply TRIM to the magnitude of a straight-drive command and re-apply direction.
    ///
    /// The trimmed magnitude is floored at zero, so a large negative TRIM can stop the right
    /// wheel but never reverse it.
    pub(crate) fn apply(&self, magnitude: i16, direction: i16) -> i16 {
        if magnitude == 0 || direction == 0 {
            return 0;
        }
        direction * magnitude.saturating_add(self.value).clamp(0, MAX_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_clamps() {
        let mut t = Trim::new();
        assert_eq!(t.increase(), 5);
        assert_eq!(t.increase(), 10);
        assert_eq!(t.decrease(), 5);

        for _ in 0..20 {
            t.increase();
        }
        assert_eq!(t.value(), TRIM_LIMIT);

        for _ in 0..40 {
            t.decrease();
        }
        assert_eq!(t.value(), -TRIM_LIMIT);

        t.reset();
        assert_eq!(t.value(), 0);
    }

    #[test]
    fn advice_follows_sign() {
        assert_eq!(Trim::with_value(15).advice(), TrimAdvice::BoostRight);
        assert_eq!(Trim::with_value(-5).advice(), TrimAdvice::BoostLeft);
        assert_eq!(Trim::new().advice(), TrimAdvice::Balanced);
    }

    #[test]
    fn with_value_clamps() {
        assert_eq!(Trim::with_value(120).value(), TRIM_LIMIT);
        assert_eq!(Trim::with_value(-120).value(), -TRIM_LIMIT);
    }

    #[test]
    fn speeds_clamp_to_driver_range() {
        assert_eq!(Trim::with_value(-20).speeds(200), (200, 180));
        assert_eq!(Trim::with_value(50).speeds(380), (380, 400));
        assert_eq!(Trim::new().speeds(500), (400, 400));
    }

    #[test]
    fn apply_keeps_direction() {
        let t = Trim::with_value(10);
        assert_eq!(t.apply(200, 1), 210);
        assert_eq!(t.apply(200, -1), -210);
        assert_eq!(t.apply(200, 0), 0);
        assert_eq!(t.apply(0, 1), 0);
    }

    #[test]
    fn apply_never_reverses_or_exceeds_range() {
        let t = Trim::with_value(-50);
        assert_eq!(t.apply(20, 1), 0);
        assert_eq!(t.apply(40, -1), 0);
        assert_eq!(t.apply(60, -1), -10);

        assert_eq!(Trim::with_value(50).apply(380, 1), 400);
        assert_eq!(Trim::with_value(50).apply(380, -1), -400);
    }
}
