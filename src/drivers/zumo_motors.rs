// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Paired PWM/DIR H-bridge driver (DRV8838 style, as fitted to the Zumo chassis).
//!
//! Each motor takes one hardware PWM channel for magnitude and one GPIO for direction. Speeds are
//! in `-MAX_SPEED..=MAX_SPEED` and scaled onto the PWM channel's duty range.

use stm32f7xx_hal::{
    gpio::{self, Output, PushPull},
    prelude::*,
};

use crate::drivers::{pwm_duty, Motors};

/// Left/right motor pair driven by hardware PWM plus a direction pin per side.
pub struct ZumoMotors<
    const DL_P: char,
    const DL_N: u8,
    const DR_P: char,
    const DR_N: u8,
    PwmL,
    PwmR,
> {
    pwm_left: PwmL,
    pwm_right: PwmR,
    dir_left: gpio::Pin<DL_P, DL_N, Output<PushPull>>,
    dir_right: gpio::Pin<DR_P, DR_N, Output<PushPull>>,
    flip_left: bool,
    flip_right: bool,
}

impl<const DL_P: char, const DL_N: u8, const DR_P: char, const DR_N: u8, PwmL, PwmR>
    ZumoMotors<DL_P, DL_N, DR_P, DR_N, PwmL, PwmR>
where
    PwmL: _embedded_hal_PwmPin<Duty = u16>,
    PwmR: _embedded_hal_PwmPin<Duty = u16>,
{
    /// Take the PWM channels and direction pins, leaving both motors stopped.
    pub fn new<ModeL, ModeR>(
        mut pwm_left: PwmL,
        mut pwm_right: PwmR,
        dir_left: gpio::Pin<DL_P, DL_N, ModeL>,
        dir_right: gpio::Pin<DR_P, DR_N, ModeR>,
    ) -> Self {
        let mut dir_left = dir_left.into_push_pull_output();
        let mut dir_right = dir_right.into_push_pull_output();
        dir_left.set_low();
        dir_right.set_low();

        pwm_left.set_duty(0);
        pwm_right.set_duty(0);
        pwm_left.enable();
        pwm_right.enable();

        Self {
            pwm_left,
            pwm_right,
            dir_left,
            dir_right,
            flip_left: false,
            flip_right: false,
        }
    }

    /// Reverse the left motor's sense of "forward" (motor wired backwards).
    pub fn flip_left(mut self, flip: bool) -> Self {
        self.flip_left = flip;
        self
    }

    /// Reverse the right motor's sense of "forward".
    pub fn flip_right(mut self, flip: bool) -> Self {
        self.flip_right = flip;
        self
    }
}

impl<const DL_P: char, const DL_N: u8, const DR_P: char, const DR_N: u8, PwmL, PwmR> Motors
    for ZumoMotors<DL_P, DL_N, DR_P, DR_N, PwmL, PwmR>
where
    PwmL: _embedded_hal_PwmPin<Duty = u16>,
    PwmR: _embedded_hal_PwmPin<Duty = u16>,
{
    fn set_speeds(&mut self, left: i16, right: i16) {
        let (duty, reverse) = pwm_duty(left, self.pwm_left.get_max_duty());
        if reverse ^ self.flip_left {
            self.dir_left.set_high();
        } else {
            self.dir_left.set_low();
        }
        self.pwm_left.set_duty(duty);

        let (duty, reverse) = pwm_duty(right, self.pwm_right.get_max_duty());
        if reverse ^ self.flip_right {
            self.dir_right.set_high();
        } else {
            self.dir_right.set_low();
        }
        self.pwm_right.set_duty(duty);
    }
}
