// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Encoder dead-reckoning controller for straight drives and in-place turns.
//!
//! The controller owns a [`Motors`] pair, a [`WheelEncoders`] pair, and a delay source. Each
//! motion call resets both encoders, commands open-loop wheel speeds, polls tick progress once
//! per control period, and stops the wheels once the tick target is reached.
//!
//! Speed is open-loop; only distance is closed-loop. Straight drives can optionally ramp: they
//! start at a fraction of base speed and latch to full speed once progress passes a fraction of
//! the target.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut ctrl = MotionController::new(motors, encoders, delay, Geometry::zumo(),
//!                                      MotionConfig::default())?;
//!
//! ctrl.drive_straight(40.0, true)?;
//! ctrl.turn_in_place(90.0)?;
//! ```
//!
//! With no guards configured a stalled wheel blocks the call forever. Set
//! [`MotionConfig::with_stall_timeout`] or [`MotionConfig::with_max_polls`] to bound it, or pass
//! a cancel flag to the `_until` variants.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config;
use crate::control::{Geometry, Trim};
use crate::drivers::{Motors, WheelEncoders};
use crate::error::{ConfigError, MotionError};

/// Two-phase speed profile for straight drives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ramp {
    /// Fraction of base speed commanded before the latch, in `(0, 1]`.
    pub start_fraction: f32,
    /// Fraction of the tick target that progress must exceed to latch full speed, in `[0, 1)`.
    pub switch_fraction: f32,
}

impl Default for Ramp {
    fn default() -> Self {
        Self {
            start_fraction: config::RAMP_START_FRACTION,
            switch_fraction: config::RAMP_SWITCH_FRACTION,
        }
    }
}

/// Tuning and safety limits for a [`MotionController`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub base_speed: i16,
    pub control_period_ms: u32,
    pub ramp: Ramp,

    /// Reject straight drives longer than this (cm).
    pub max_distance_cm: Option<f32>,
    /// Reject turns larger than this (degrees).
    pub max_turn_degrees: Option<f32>,
    /// Abort after this many consecutive polls without tick progress.
    pub stall_timeout_polls: Option<u32>,
    /// Abort after this many polls in total.
    pub max_polls: Option<u32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: config::BASE_SPEED,
            control_period_ms: config::CONTROL_PERIOD_MS,
            ramp: Ramp::default(),
            max_distance_cm: None,
            max_turn_degrees: None,
            stall_timeout_polls: None,
            max_polls: None,
        }
    }
}

impl MotionConfig {
    pub fn with_base_speed(mut self, speed: i16) -> Self {
        self.base_speed = speed;
        self
    }

    pub fn with_control_period_ms(mut self, ms: u32) -> Self {
        self.control_period_ms = ms;
        self
    }

    pub fn with_ramp(mut self, start_fraction: f32, switch_fraction: f32) -> Self {
        self.ramp = Ramp {
            start_fraction,
            switch_fraction,
        };
        self
    }

    pub fn with_max_distance_cm(mut self, cm: f32) -> Self {
        self.max_distance_cm = Some(cm);
        self
    }

    pub fn with_max_turn_degrees(mut self, degrees: f32) -> Self {
        self.max_turn_degrees = Some(degrees);
        self
    }

    pub fn with_stall_timeout(mut self, polls: u32) -> Self {
        self.stall_timeout_polls = Some(polls);
        self
    }

    pub fn with_max_polls(mut self, polls: u32) -> Self {
        self.max_polls = Some(polls);
        self
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_speed <= 0 || self.base_speed > config::MAX_SPEED {
            return Err(ConfigError::InvalidSpeed(self.base_speed));
        }
        if self.control_period_ms == 0 {
            return Err(ConfigError::InvalidPeriod);
        }

        let Ramp {
            start_fraction,
            switch_fraction,
        } = self.ramp;
        if !(start_fraction > 0.0 && start_fraction <= 1.0)
            || !(switch_fraction >= 0.0 && switch_fraction < 1.0)
        {
            return Err(ConfigError::InvalidRamp);
        }

        let bad_limit = |limit: Option<f32>| limit.is_some_and(|l| !(l.is_finite() && l >= 0.0));
        if bad_limit(self.max_distance_cm) || bad_limit(self.max_turn_degrees) {
            return Err(ConfigError::InvalidGuard);
        }
        // A zero window would abort every move before its first poll.
        if self.stall_timeout_polls == Some(0) || self.max_polls == Some(0) {
            return Err(ConfigError::InvalidGuard);
        }

        Ok(())
    }
}

/// Outcome of a completed move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveSummary {
    /// Tick threshold the move ran to.
    pub target_ticks: u32,
    /// Control periods waited before the target was reached.
    pub polls: u32,
    /// Progress measured on the final poll (≥ `target_ticks`).
    pub progress: u32,
}

/// How progress is derived from the two counters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Measure {
    /// Mean of |left| and |right|, for straight drives.
    Average,
    /// |left| only, for turns where both wheels travel equal and opposite arcs.
    LeftOnly,
}

/// A fully resolved move: what to command and when to stop.
#[derive(Copy, Clone, Debug)]
struct Plan {
    target_ticks: u32,
    start: (i16, i16),
    /// Full-speed command and the progress it latches at. `None` if there is no ramp.
    latch: Option<((i16, i16), f32)>,
    measure: Measure,
}

/// Blocking dead-reckoning controller for a differential-drive robot.
pub struct MotionController<M, E, D> {
    motors: M,
    encoders: E,
    delay: D,
    geometry: Geometry,
    config: MotionConfig,
    trim: Trim,
    tests_run: u32,
}

impl<M, E, D> MotionController<M, E, D>
where
    M: Motors,
    E: WheelEncoders,
    D: DelayNs,
{
    /// Create a new controller, validating `config`.
    pub fn new(
        motors: M,
        encoders: E,
        delay: D,
        geometry: Geometry,
        config: MotionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            motors,
            encoders,
            delay,
            geometry,
            config,
            trim: Trim::new(),
            tests_run: 0,
        })
    }

    /// Tear down the controller and return its collaborators.
    pub fn free(self) -> (M, E, D) {
        (self.motors, self.encoders, self.delay)
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    #[inline]
    pub fn trim(&self) -> Trim {
        self.trim
    }

    #[inline]
    pub fn trim_mut(&mut self) -> &mut Trim {
        &mut self.trim
    }

    pub fn set_trim(&mut self, trim: Trim) {
        self.trim = trim;
    }

    /// Number of timed motor tests completed.
    #[inline]
    pub fn tests_run(&self) -> u32 {
        self.tests_run
    }

    /// Drive straight for `distance_cm` (negative reverses). Blocks until the target is reached.
    ///
    /// With `use_ramp`, starts at `ramp.start_fraction` of base speed and latches to full speed
    /// once average progress exceeds `ramp.switch_fraction` of the target.
    pub fn drive_straight(
        &mut self,
        distance_cm: f32,
        use_ramp: bool,
    ) -> Result<MoveSummary, MotionError> {
        let plan = self.plan_straight(distance_cm, use_ramp)?;
        self.execute(plan, None)
    }

    /// Like [`drive_straight`](Self::drive_straight), aborting when `cancel` is raised.
    pub fn drive_straight_until(
        &mut self,
        distance_cm: f32,
        use_ramp: bool,
        cancel: &AtomicBool,
    ) -> Result<MoveSummary, MotionError> {
        let plan = self.plan_straight(distance_cm, use_ramp)?;
        self.execute(plan, Some(cancel))
    }

    /// Spin in place by `degrees` (positive clockwise). Always runs at base speed.
    pub fn turn_in_place(&mut self, degrees: f32) -> Result<MoveSummary, MotionError> {
        let plan = self.plan_turn(degrees)?;
        self.execute(plan, None)
    }

    /// Like [`turn_in_place`](Self::turn_in_place), aborting when `cancel` is raised.
    pub fn turn_in_place_until(
        &mut self,
        degrees: f32,
        cancel: &AtomicBool,
    ) -> Result<MoveSummary, MotionError> {
        let plan = self.plan_turn(degrees)?;
        self.execute(plan, Some(cancel))
    }

    /// Run both motors forward for `duration_ms` with the current TRIM, then stop.
    ///
    /// Open-loop: encoders are not consulted.
    pub fn run_timed(&mut self, duration_ms: u32) {
        let (left, right) = self.trim.speeds(self.config.base_speed);
        info!(
            "motor test: L={} R={} trim={} for {} ms",
            left,
            right,
            self.trim.value(),
            duration_ms
        );

        self.motors.set_speeds(left, right);
        self.delay.delay_ms(duration_ms);
        self.motors.stop();

        self.tests_run += 1;
    }

    fn plan_straight(&self, distance_cm: f32, use_ramp: bool) -> Result<Plan, MotionError> {
        check_request(distance_cm, self.config.max_distance_cm)?;

        let target_ticks = self.geometry.ticks_for_cm(distance_cm);
        let direction = sign(distance_cm);
        let base = self.config.base_speed;
        let full = (direction * base, self.trim.apply(base, direction));

        let (start, latch) = if use_ramp {
            let Ramp {
                start_fraction,
                switch_fraction,
            } = self.config.ramp;
            let slow = (base as f32 * start_fraction) as i16;
            let start = (direction * slow, self.trim.apply(slow, direction));
            (start, Some((full, target_ticks as f32 * switch_fraction)))
        } else {
            (full, None)
        };

        debug!(
            "drive_straight: {} cm -> {} ticks, ramp={}",
            distance_cm, target_ticks, use_ramp
        );

        Ok(Plan {
            target_ticks,
            start,
            latch,
            measure: Measure::Average,
        })
    }

    fn plan_turn(&self, degrees: f32) -> Result<Plan, MotionError> {
        check_request(degrees, self.config.max_turn_degrees)?;

        let target_ticks = self.geometry.ticks_for_degrees(degrees);
        let left = self.config.base_speed * sign(degrees);

        debug!("turn_in_place: {} deg -> {} ticks", degrees, target_ticks);

        Ok(Plan {
            target_ticks,
            start: (left, -left),
            latch: None,
            measure: Measure::LeftOnly,
        })
    }

    fn execute(
        &mut self,
        plan: Plan,
        cancel: Option<&AtomicBool>,
    ) -> Result<MoveSummary, MotionError> {
        // Counters must read zero before the first poll.
        self.encoders.reset_left();
        self.encoders.reset_right();

        let target = plan.target_ticks;
        if target > 0 {
            self.motors.set_speeds(plan.start.0, plan.start.1);
        }

        let mut latch = plan.latch;
        let mut polls: u32 = 0;
        let mut best: u32 = 0;
        let mut idle: u32 = 0;

        loop {
            let progress = self.progress(plan.measure);
            if progress >= target {
                self.motors.stop();
                info!(
                    "move done: {}/{} ticks ({} cm) in {} polls",
                    progress,
                    target,
                    self.geometry.cm_for_ticks(progress),
                    polls
                );
                return Ok(MoveSummary {
                    target_ticks: target,
                    polls,
                    progress,
                });
            }

            if let Some(((left, right), at)) = latch {
                if progress as f32 > at {
                    debug!("ramp latched at {} ticks", progress);
                    self.motors.set_speeds(left, right);
                    latch = None;
                }
            }

            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                self.motors.stop();
                warn!("move cancelled at {}/{} ticks", progress, target);
                return Err(MotionError::Cancelled { polls, progress });
            }

            if progress > best {
                best = progress;
                idle = 0;
            } else if polls > 0 {
                idle += 1;
            }

            if let Some(limit) = self.config.stall_timeout_polls {
                if idle >= limit {
                    self.motors.stop();
                    warn!(
                        "stall: no progress for {} polls at {}/{} ticks",
                        idle, progress, target
                    );
                    return Err(MotionError::Timeout { polls, progress });
                }
            }

            if let Some(max) = self.config.max_polls {
                if polls >= max {
                    self.motors.stop();
                    warn!(
                        "poll budget of {} exhausted at {}/{} ticks",
                        max, progress, target
                    );
                    return Err(MotionError::Timeout { polls, progress });
                }
            }

            self.delay.delay_ms(self.config.control_period_ms);
            polls += 1;
        }
    }

    fn progress(&mut self, measure: Measure) -> u32 {
        match measure {
            Measure::Average => {
                let left = self.encoders.read_left().unsigned_abs() as u64;
                let right = self.encoders.read_right().unsigned_abs() as u64;
                ((left + right) / 2) as u32
            }
            Measure::LeftOnly => self.encoders.read_left().unsigned_abs(),
        }
    }
}

fn check_request(value: f32, limit: Option<f32>) -> Result<(), MotionError> {
    if !value.is_finite() {
        return Err(MotionError::InvalidArgument);
    }
    if let Some(limit) = limit {
        if value.abs() > limit {
            return Err(MotionError::OutOfRange {
                requested: value,
                limit,
            });
        }
    }
    Ok(())
}

#[inline]
fn sign(value: f32) -> i16 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encoders that advance a fixed number of ticks per read of the left counter.
    struct Stepper {
        step: i32,
        left: i32,
        right: i32,
        resets: u32,
    }

    impl WheelEncoders for Stepper {
        fn reset_left(&mut self) {
            self.left = 0;
            self.resets += 1;
        }
        fn reset_right(&mut self) {
            self.right = 0;
        }
        fn read_left(&mut self) -> i32 {
            let v = self.left;
            self.left += self.step;
            v
        }
        fn read_right(&mut self) -> i32 {
            let v = self.right;
            self.right += self.step;
            v
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<(i16, i16)>);

    impl Motors for Recorder {
        fn set_speeds(&mut self, left: i16, right: i16) {
            self.0.push((left, right));
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn controller(step: i32, config: MotionConfig) -> MotionController<Recorder, Stepper, NoDelay> {
        let enc = Stepper {
            step,
            left: 0,
            right: 0,
            resets: 0,
        };
        MotionController::new(Recorder::default(), enc, NoDelay, Geometry::zumo(), config).unwrap()
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(-0.0), 0);
        assert_eq!(sign(3.5), 1);
        assert_eq!(sign(-0.1), -1);
    }

    #[test]
    fn config_validation() {
        assert!(MotionConfig::default().validate().is_ok());
        assert_eq!(
            MotionConfig::default().with_base_speed(0).validate(),
            Err(ConfigError::InvalidSpeed(0))
        );
        assert_eq!(
            MotionConfig::default().with_base_speed(401).validate(),
            Err(ConfigError::InvalidSpeed(401))
        );
        assert_eq!(
            MotionConfig::default().with_control_period_ms(0).validate(),
            Err(ConfigError::InvalidPeriod)
        );
        assert_eq!(
            MotionConfig::default().with_ramp(0.0, 0.25).validate(),
            Err(ConfigError::InvalidRamp)
        );
        assert_eq!(
            MotionConfig::default().with_ramp(0.5, 1.0).validate(),
            Err(ConfigError::InvalidRamp)
        );
    }

    #[test]
    fn guard_validation() {
        assert_eq!(
            MotionConfig::default().with_stall_timeout(0).validate(),
            Err(ConfigError::InvalidGuard)
        );
        assert_eq!(
            MotionConfig::default().with_max_polls(0).validate(),
            Err(ConfigError::InvalidGuard)
        );
        assert_eq!(
            MotionConfig::default().with_max_distance_cm(f32::NAN).validate(),
            Err(ConfigError::InvalidGuard)
        );
        assert_eq!(
            MotionConfig::default().with_max_turn_degrees(f32::INFINITY).validate(),
            Err(ConfigError::InvalidGuard)
        );
        assert_eq!(
            MotionConfig::default().with_max_distance_cm(-1.0).validate(),
            Err(ConfigError::InvalidGuard)
        );
        assert_eq!(
            MotionConfig::default().with_max_turn_degrees(-90.0).validate(),
            Err(ConfigError::InvalidGuard)
        );

        let ok = MotionConfig::default()
            .with_stall_timeout(1)
            .with_max_polls(1)
            .with_max_distance_cm(0.0)
            .with_max_turn_degrees(360.0);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn one_poll_stall_window_lets_healthy_wheels_finish() {
        let mut c = controller(50, MotionConfig::default().with_stall_timeout(1));
        assert!(c.drive_straight(10.0, false).is_ok());
    }

    #[test]
    fn zero_distance_only_stops() {
        let mut c = controller(50, MotionConfig::default());
        let summary = c.drive_straight(0.0, false).unwrap();
        assert_eq!(summary.target_ticks, 0);
        assert_eq!(summary.polls, 0);

        let (motors, enc, _) = c.free();
        assert_eq!(motors.0, [(0, 0)]);
        assert_eq!(enc.resets, 1);
    }

    #[test]
    fn non_finite_request_touches_nothing() {
        let mut c = controller(50, MotionConfig::default());
        assert_eq!(c.drive_straight(f32::NAN, false), Err(MotionError::InvalidArgument));
        assert_eq!(c.turn_in_place(f32::INFINITY), Err(MotionError::InvalidArgument));

        let (motors, enc, _) = c.free();
        assert!(motors.0.is_empty());
        assert_eq!(enc.resets, 0);
    }

    #[test]
    fn turn_commands_opposite_wheels() {
        let mut c = controller(40, MotionConfig::default());
        c.turn_in_place(-45.0).unwrap();
        let (motors, _, _) = c.free();
        assert_eq!(motors.0.first(), Some(&(-200, 200)));
        assert_eq!(motors.0.last(), Some(&(0, 0)));
    }

    #[test]
    fn trim_applies_to_right_wheel_only_when_driving() {
        let mut c = controller(50, MotionConfig::default());
        c.set_trim(Trim::with_value(10));
        c.drive_straight(-5.0, false).unwrap();
        c.turn_in_place(30.0).unwrap();

        let (motors, _, _) = c.free();
        assert_eq!(motors.0[0], (-200, -210));
        assert!(motors.0.contains(&(200, -200)));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let cfg = MotionConfig::default()
            .with_max_distance_cm(100.0)
            .with_max_turn_degrees(360.0);
        let mut c = controller(50, cfg);
        assert_eq!(
            c.drive_straight(-150.0, false),
            Err(MotionError::OutOfRange {
                requested: -150.0,
                limit: 100.0
            })
        );
        assert!(c.turn_in_place(720.0).is_err());
        assert!(c.drive_straight(100.0, false).is_ok());
    }
}
