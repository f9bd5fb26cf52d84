// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Left/right wheel encoders on TIM2 and TIM3.
//!
//! The two gearmotors are mounted mirror-image, so one encoder counts down when its wheel drives
//! the robot forward. `invert_*` flips the sign so both count up going forward.

use stm32f7xx_hal::pac;

use crate::drivers::WheelEncoders;
use crate::hw::Encoder;

pub struct QuadratureEncoders {
    left: Encoder<pac::TIM2>,
    right: Encoder<pac::TIM3>,
    invert_left: bool,
    invert_right: bool,
}

impl QuadratureEncoders {
    pub fn new(left: Encoder<pac::TIM2>, right: Encoder<pac::TIM3>) -> Self {
        Self {
            left,
            right,
            invert_left: false,
            invert_right: false,
        }
    }

    pub fn invert_left(mut self, invert: bool) -> Self {
        self.invert_left = invert;
        self
    }

    pub fn invert_right(mut self, invert: bool) -> Self {
        self.invert_right = invert;
        self
    }

    pub fn free(self) -> (Encoder<pac::TIM2>, Encoder<pac::TIM3>) {
        (self.left, self.right)
    }
}

#[inline]
fn oriented(ticks: i32, invert: bool) -> i32 {
    if invert {
        ticks.wrapping_neg()
    } else {
        ticks
    }
}

impl WheelEncoders for QuadratureEncoders {
    fn reset_left(&mut self) {
        self.left.reset();
    }

    fn reset_right(&mut self) {
        self.right.reset();
    }

    fn read_left(&mut self) -> i32 {
        oriented(self.left.count(), self.invert_left)
    }

    fn read_right(&mut self) -> i32 {
        oriented(self.right.count(), self.invert_right)
    }
}
