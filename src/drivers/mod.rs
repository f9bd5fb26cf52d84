// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Drive-Train Drivers
//!
//! This module defines the two hardware seams the motion controller consumes, and (with the
//! `firmware` feature) the board drivers that implement them.
//!
//! ## Traits
//!
//! - [`Motors`] – paired left/right motor speed commands
//! - [`WheelEncoders`] – paired left/right tick counters with reset
//!
//! ## Existing drivers
//!
//! - [`zumo_motors`] – PWM + direction-pin H-bridge pair (DRV8838 style, as on the Zumo)
//! - [`quadrature`] – TIM2/TIM3 timer-based quadrature encoders as a wheel pair

#[cfg(feature = "firmware")]
pub mod quadrature;
#[cfg(feature = "firmware")]
pub mod zumo_motors;

#[cfg(feature = "firmware")]
pub use quadrature::QuadratureEncoders;
#[cfg(feature = "firmware")]
pub use zumo_motors::ZumoMotors;

use crate::config::MAX_SPEED;

/// Left/right motor pair.
///
/// Speeds are signed, positive drives the robot forward. The valid range is
/// `-MAX_SPEED..=MAX_SPEED`; implementations clamp anything outside it.
pub trait Motors {
    fn set_speeds(&mut self, left: i16, right: i16);

    #[inline]
    fn stop(&mut self) {
        self.set_speeds(0, 0);
    }
}

/// Left/right encoder tick counters.
///
/// Counts accumulate continuously from wheel rotation. Resetting zeroes the software view of the
/// counter without disturbing hardware capture.
pub trait WheelEncoders {
    fn reset_left(&mut self);
    fn reset_right(&mut self);

    /// Ticks on the left wheel since the last reset. Does not reset.
    fn read_left(&mut self) -> i32;
    /// Ticks on the right wheel since the last reset. Does not reset.
    fn read_right(&mut self) -> i32;
}

impl<T: Motors + ?Sized> Motors for &mut T {
    #[inline]
    fn set_speeds(&mut self, left: i16, right: i16) {
        (**self).set_speeds(left, right)
    }
}

impl<T: WheelEncoders + ?Sized> WheelEncoders for &mut T {
    #[inline]
    fn reset_left(&mut self) {
        (**self).reset_left()
    }

    #[inline]
    fn reset_right(&mut self) {
        (**self).reset_right()
    }

    #[inline]
    fn read_left(&mut self) -> i32 {
        (**self).read_left()
    }

    #[inline]
    fn read_right(&mut self) -> i32 {
        (**self).read_right()
    }
}

/// Map a signed speed onto a PWM duty in `0..=max_duty`.
///
/// Speeds outside `-MAX_SPEED..=MAX_SPEED` are clamped. Returns `(duty, reverse)`.
pub fn pwm_duty(speed: i16, max_duty: u16) -> (u16, bool) {
    let speed = speed.clamp(-MAX_SPEED, MAX_SPEED);
    let duty = speed.unsigned_abs() as u32 * max_duty as u32 / MAX_SPEED as u32;
    (duty as u16, speed < 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_scales_and_clamps() {
        assert_eq!(pwm_duty(0, 1000), (0, false));
        assert_eq!(pwm_duty(200, 1000), (500, false));
        assert_eq!(pwm_duty(-400, 1000), (1000, true));
        assert_eq!(pwm_duty(i16::MAX, u16::MAX), (u16::MAX, false));
        assert_eq!(pwm_duty(i16::MIN, 800), (800, true));
    }
}
