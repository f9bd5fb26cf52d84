// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick busy-wait delay exposed through `embedded_hal::delay::DelayNs`.

use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;

pub struct SysTickDelay {
    inner: Delay,
}

impl SysTickDelay {
    /// `sysclk_hz` is the core clock that drives SysTick.
    pub fn new(syst: cortex_m::peripheral::SYST, sysclk_hz: u32) -> Self {
        Self {
            inner: Delay::new(syst, sysclk_hz),
        }
    }

    pub fn free(self) -> cortex_m::peripheral::SYST {
        self.inner.free()
    }
}

impl DelayNs for SysTickDelay {
    fn delay_ns(&mut self, ns: u32) {
        // SysTick resolution is 1 µs here; round up so short waits are never skipped.
        self.inner.delay_us(ns.div_ceil(1_000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.inner.delay_us(us);
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}
