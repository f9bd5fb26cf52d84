// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin assignments for the STM32F777 drive board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiod, Alternate, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub encoders: EncoderPins,
    pub motors: MotorPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// TIM2 (left) / TIM3 (right) quadrature inputs
pub struct EncoderPins {
    pub left_a: gpioa::PA0<Alternate<1>>,
    pub left_b: gpioa::PA1<Alternate<1>>,

    pub right_a: gpioa::PA6<Alternate<2>>,
    pub right_b: gpioa::PA7<Alternate<2>>,
}

/// PWM + direction for each H-bridge
pub struct MotorPins {
    pub left_pwm: gpiod::PD12<Alternate<2>>,  // TIM4_CH1
    pub right_pwm: gpiod::PD13<Alternate<2>>, // TIM4_CH2
    pub left_dir: gpioa::PA4<Output<PushPull>>,
    pub right_dir: gpiod::PD2<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            encoders: EncoderPins {
                left_a: gpioa.pa0.into_alternate::<1>(),
                left_b: gpioa.pa1.into_alternate::<1>(),
                right_a: gpioa.pa6.into_alternate::<2>(),
                right_b: gpioa.pa7.into_alternate::<2>(),
            },

            motors: MotorPins {
                left_pwm: gpiod.pd12.into_alternate::<2>(),
                right_pwm: gpiod.pd13.into_alternate::<2>(),
                left_dir: gpioa.pa4.into_push_pull_output(),
                right_dir: gpiod.pd2.into_push_pull_output(),
            },
        }
    }
}
