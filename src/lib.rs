// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Zumo Motion Firmware
//!
//! Encoder dead-reckoning for a small two-wheeled tracked robot (Zumo 32U4 geometry), written in
//! Rust. The control core is hardware-independent and runs on the host for testing; the board
//! layer targets an STM32F777 MCU behind the `firmware` feature.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Calibration constants and tuning defaults |
//! | [`control`] | Geometry, TRIM, and the blocking motion controller |
//! | [`drivers`] | `Motors` / `WheelEncoders` seams and board drivers |
//! | `hw` | MCU-level wrappers around timers and USART (`firmware` only) |
//! | [`error`] | Error types |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
#[cfg(feature = "firmware")]
pub mod hw;

pub use control::{Geometry, MotionConfig, MotionController, MoveSummary, Trim};
pub use drivers::{Motors, WheelEncoders};
pub use error::{ConfigError, MotionError};
