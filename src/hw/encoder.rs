// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Quadrature encoder capture via STM32F7 timers in encoder mode.
//!
//! TIM2 (32-bit) and TIM3 (16-bit) count both edges of both channels. The hardware counter is
//! never written after configuration; [`Encoder::reset`] moves a software origin instead, and
//! [`Encoder::count`] widens wrap-around deltas into a signed 32-bit tick count.
//!
//! `count()` must be called at least once per half counter range of travel (32767 ticks on TIM3,
//! about 4 m on the Zumo) to unwrap correctly.

use stm32f7xx_hal::pac;

/// Program a general-purpose timer for encoder mode 3 and start it.
macro_rules! encoder_mode {
    ($tim:expr, $arr:expr) => {{
        let tim = &$tim;

        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.arr.write(|w| unsafe { w.bits($arr) });

        // Count on both TI1 and TI2
        tim.smcr.modify(|_, w| w.sms().bits(0b011));
        tim.ccmr1_input().modify(|_, w| w.cc1s().ti1().cc2s().ti2());
        tim.ccer.modify(|_, w| {
            w.cc1p()
                .clear_bit()
                .cc2p()
                .clear_bit()
                .cc1e()
                .set_bit()
                .cc2e()
                .set_bit()
        });

        tim.cr1.modify(|_, w| w.cen().set_bit());
    }};
}

/// Timer-backed tick counter with a software zero.
pub struct Encoder<TIM> {
    tim: TIM,
    last_raw: u32,
    count: i32,
}

impl<TIM> Encoder<TIM> {
    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> TIM {
        self.tim
    }

    fn advance(&mut self, raw: u32, delta: i32) -> i32 {
        self.last_raw = raw;
        self.count = self.count.wrapping_add(delta);
        self.count
    }
}

impl Encoder<pac::TIM2> {
    /// Configure TIM2 as a quadrature encoder with full 32-bit range.
    #[allow(unused_unsafe)]
    pub fn tim2(tim2: pac::TIM2) -> Self {
        encoder_mode!(tim2, 0xFFFF_FFFF);
        let last_raw = tim2.cnt.read().cnt().bits();
        Self {
            tim: tim2,
            last_raw,
            count: 0,
        }
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.tim.cnt.read().cnt().bits()
    }

    /// Signed ticks since the last reset.
    pub fn count(&mut self) -> i32 {
        let raw = self.raw();
        let delta = raw.wrapping_sub(self.last_raw) as i32;
        self.advance(raw, delta)
    }

    /// Zero the tick count without touching the hardware counter.
    pub fn reset(&mut self) {
        self.last_raw = self.raw();
        self.count = 0;
    }
}

impl Encoder<pac::TIM3> {
    /// Configure TIM3 as a quadrature encoder with 16-bit range.
    #[allow(unused_unsafe)]
    pub fn tim3(tim3: pac::TIM3) -> Self {
        encoder_mode!(tim3, 0xFFFF);
        let last_raw = tim3.cnt.read().cnt().bits() as u32;
        Self {
            tim: tim3,
            last_raw,
            count: 0,
        }
    }

    #[inline]
    pub fn raw(&self) -> u16 {
        self.tim.cnt.read().cnt().bits()
    }

    /// Signed ticks since the last reset, unwrapped across 16-bit rollover.
    pub fn count(&mut self) -> i32 {
        let raw = self.raw();
        let delta = raw.wrapping_sub(self.last_raw as u16) as i16 as i32;
        self.advance(raw as u32, delta)
    }

    /// Zero the tick count without touching the hardware counter.
    pub fn reset(&mut self) {
        self.last_raw = self.raw() as u32;
        self.count = 0;
    }
}
