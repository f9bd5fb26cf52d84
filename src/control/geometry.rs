// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Robot geometry and the tick conversions derived from it.
//!
//! All derived values are computed once in [`Geometry::new`] and never change afterwards.

use core::f32::consts::PI;

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config;
use crate::error::ConfigError;

/// Physical calibration of a two-wheeled chassis.
///
/// Geometry parameters:
/// - `ticks_per_rotation`: encoder ticks per full wheel rotation (after gearing)
/// - `wheel_diameter_mm`: drive wheel diameter
/// - `wheel_base_mm`: distance between the two wheel contact lines
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Geometry {
    ticks_per_rotation: f32,
    wheel_diameter_mm: f32,
    wheel_base_mm: f32,

    ticks_per_cm: f32,
    ticks_per_degree: f32,
}

impl Geometry {
    /// Build a geometry, rejecting zero, negative, or non-finite inputs.
    pub fn new(
        ticks_per_rotation: f32,
        wheel_diameter_mm: f32,
        wheel_base_mm: f32,
    ) -> Result<Self, ConfigError> {
        for v in [ticks_per_rotation, wheel_diameter_mm, wheel_base_mm] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::InvalidGeometry);
            }
        }

        let geometry = Self::derive(ticks_per_rotation, wheel_diameter_mm, wheel_base_mm);

        // Tiny inputs can still underflow the derived values.
        if !(geometry.ticks_per_cm.is_finite() && geometry.ticks_per_cm > 0.0)
            || !(geometry.ticks_per_degree.is_finite() && geometry.ticks_per_degree > 0.0)
        {
            return Err(ConfigError::InvalidGeometry);
        }

        Ok(geometry)
    }

    /// Geometry of the stock Zumo 32U4 (see [`config`]).
    pub fn zumo() -> Self {
        Self::derive(
            config::TICKS_PER_ROTATION,
            config::WHEEL_DIAMETER_MM,
            config::WHEEL_BASE_MM,
        )
    }

    fn derive(ticks_per_rotation: f32, wheel_diameter_mm: f32, wheel_base_mm: f32) -> Self {
        let wheel_circumference_mm = PI * wheel_diameter_mm;
        let ticks_per_cm = ticks_per_rotation / (wheel_circumference_mm / 10.0);

        let turn_circumference_mm = PI * wheel_base_mm;
        let ticks_per_degree =
            (turn_circumference_mm / 360.0) * (ticks_per_rotation / wheel_circumference_mm);

        Self {
            ticks_per_rotation,
            wheel_diameter_mm,
            wheel_base_mm,
            ticks_per_cm,
            ticks_per_degree,
        }
    }

    #[inline]
    pub fn ticks_per_rotation(&self) -> f32 {
        self.ticks_per_rotation
    }

    #[inline]
    pub fn wheel_diameter_mm(&self) -> f32 {
        self.wheel_diameter_mm
    }

    #[inline]
    pub fn wheel_base_mm(&self) -> f32 {
        self.wheel_base_mm
    }

    /// Wheel circumference (mm).
    #[inline]
    pub fn wheel_circumference_mm(&self) -> f32 {
        PI * self.wheel_diameter_mm
    }

    /// Circumference of the circle the wheels trace during an in-place turn (mm).
    #[inline]
    pub fn turn_circumference_mm(&self) -> f32 {
        PI * self.wheel_base_mm
    }

    /// Encoder ticks per centimeter of straight travel.
    #[inline]
    pub fn ticks_per_cm(&self) -> f32 {
        self.ticks_per_cm
    }

    /// Encoder ticks per degree of in-place rotation, measured on one wheel.
    #[inline]
    pub fn ticks_per_degree(&self) -> f32 {
        self.ticks_per_degree
    }

    /// Tick target for a straight move of `cm`. Sign is ignored.
    pub fn ticks_for_cm(&self, cm: f32) -> u32 {
        (cm.abs() * self.ticks_per_cm).round() as u32
    }

    /// Tick target for an in-place turn of `degrees`. Sign is ignored.
    pub fn ticks_for_degrees(&self, degrees: f32) -> u32 {
        (degrees.abs() * self.ticks_per_degree).round() as u32
    }

    /// Convert a tick count back into centimeters of wheel travel.
    pub fn cm_for_ticks(&self, ticks: u32) -> f32 {
        ticks as f32 / self.ticks_per_cm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_values_match_formulas() {
        let g = Geometry::new(909.7, 39.0, 98.0).unwrap();

        let circ = PI * 39.0_f32;
        assert_eq!(g.ticks_per_cm(), 909.7 / (circ / 10.0));
        assert_eq!(
            g.ticks_per_degree(),
            ((PI * 98.0_f32) / 360.0) * (909.7 / circ)
        );
        assert_eq!(g.wheel_circumference_mm(), circ);
    }

    #[test]
    fn reference_robot_ticks_per_cm() {
        let g = Geometry::new(909.7, 39.0, 98.0).unwrap();
        assert!((g.ticks_per_cm() - 74.25).abs() < 0.02);
        assert_eq!(g.ticks_for_cm(40.0), 2970);
        assert_eq!(g.ticks_for_cm(-40.0), 2970);
        assert_eq!(g.ticks_for_cm(0.0), 0);
    }

    #[test]
    fn derived_values_positive_for_positive_inputs() {
        for &(tpr, d, b) in &[(1.0, 1.0, 1.0), (12.0, 32.0, 85.0), (4096.0, 120.0, 400.0)] {
            let g = Geometry::new(tpr, d, b).unwrap();
            assert!(g.ticks_per_cm() > 0.0 && g.ticks_per_cm().is_finite());
            assert!(g.ticks_per_degree() > 0.0 && g.ticks_per_degree().is_finite());
        }
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(Geometry::new(0.0, 39.0, 98.0), Err(ConfigError::InvalidGeometry));
        assert_eq!(Geometry::new(909.7, -1.0, 98.0), Err(ConfigError::InvalidGeometry));
        assert_eq!(Geometry::new(909.7, 39.0, f32::NAN), Err(ConfigError::InvalidGeometry));
        assert_eq!(
            Geometry::new(f32::INFINITY, 39.0, 98.0),
            Err(ConfigError::InvalidGeometry)
        );
    }

    #[test]
    fn ticks_convert_back_to_cm() {
        let g = Geometry::zumo();
        assert_eq!(g.cm_for_ticks(0), 0.0);

        let cm = g.cm_for_ticks(2970);
        assert!((cm - 40.0).abs() < 0.01);
        assert_eq!(g.ticks_for_cm(cm), 2970);
    }

    #[test]
    fn quarter_turn_target() {
        let g = Geometry::zumo();
        let expected = (90.0 * g.ticks_per_degree()).round() as u32;
        assert_eq!(g.ticks_for_degrees(90.0), expected);
        assert_eq!(g.ticks_for_degrees(-90.0), expected);
    }
}
