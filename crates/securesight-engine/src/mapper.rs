//! Time ↔ pixel coordinate mapping.
//!
//! A [`CoordinateMapper`] projects a [`Window`] onto a 1-D pixel [`Axis`].
//! Construction validates the axis, so the projection functions themselves
//! are total: pixels outside the track clamp to the window bounds.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::model::Timestamp;
use crate::window::Window;

/// The host violated a precondition of the coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidState {
    /// The track has not been laid out yet, or has collapsed.
    #[error("Invalid state: axis width must be positive (got {0})")]
    AxisWidth(f64),

    /// The window has no extent to map.
    #[error("Invalid state: window span is zero")]
    EmptyWindow,
}

/// Rendered width of the interactive track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Axis {
    pub pixel_width: f64,
}

impl Axis {
    /// Create an axis of the given width.
    pub fn new(pixel_width: f64) -> Self {
        Self { pixel_width }
    }

    /// Whether the axis can back a mapping (finite and positive).
    pub fn is_ready(&self) -> bool {
        self.pixel_width.is_finite() && self.pixel_width > 0.0
    }

    /// Clamp a pixel position onto the track. NaN lands on the left edge.
    pub fn clamp(&self, px: f64) -> f64 {
        if px.is_nan() || !self.is_ready() {
            return 0.0;
        }
        px.clamp(0.0, self.pixel_width)
    }
}

/// Linear projection between a window and an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    window: Window,
    axis: Axis,
    span_nanos: f64,
}

impl CoordinateMapper {
    /// Create a mapper. Fails if the axis is not ready or the window is empty.
    pub fn new(window: Window, axis: Axis) -> Result<Self, InvalidState> {
        if !axis.is_ready() {
            return Err(InvalidState::AxisWidth(axis.pixel_width));
        }
        let span_nanos = delta_nanos(window.span());
        if span_nanos <= 0.0 {
            return Err(InvalidState::EmptyWindow);
        }
        Ok(Self {
            window,
            axis,
            span_nanos,
        })
    }

    /// The mapped window.
    pub fn window(&self) -> Window {
        self.window
    }

    /// The mapped axis.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Track width in pixels.
    pub fn width(&self) -> f64 {
        self.axis.pixel_width
    }

    /// Pixel offset of `t` from the left edge of the track.
    ///
    /// Not clamped: times outside the window map outside `[0, width]`.
    pub fn time_to_pixel(&self, t: Timestamp) -> f64 {
        delta_nanos(t - self.window.start()) / self.span_nanos * self.axis.pixel_width
    }

    /// Timestamp under pixel `px`, after clamping `px` onto the track.
    pub fn pixel_to_time(&self, px: f64) -> Timestamp {
        let px = self.axis.clamp(px);
        if px <= 0.0 {
            return self.window.start();
        }
        if px >= self.axis.pixel_width {
            return self.window.end();
        }

        #[allow(clippy::cast_possible_truncation)]
        let offset = (px / self.axis.pixel_width * self.span_nanos).round() as i64;
        self.window
            .start()
            .checked_add_signed(TimeDelta::nanoseconds(offset))
            .map_or(self.window.end(), |t| self.window.clamp(t))
    }
}

/// Length of `delta` in nanoseconds, falling back to millisecond precision
/// for spans too long to count in nanoseconds.
#[allow(clippy::cast_precision_loss)]
fn delta_nanos(delta: TimeDelta) -> f64 {
    delta
        .num_nanoseconds()
        .map_or_else(|| delta.num_milliseconds() as f64 * 1e6, |n| n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn day_mapper(width: f64) -> CoordinateMapper {
        let window = Window::new(t0(), t0() + TimeDelta::hours(24)).unwrap();
        CoordinateMapper::new(window, Axis::new(width)).unwrap()
    }

    #[test]
    fn test_rejects_unready_axis() {
        let window = Window::new(t0(), t0() + TimeDelta::hours(1)).unwrap();
        assert_eq!(
            CoordinateMapper::new(window, Axis::new(0.0)),
            Err(InvalidState::AxisWidth(0.0))
        );
        assert!(CoordinateMapper::new(window, Axis::new(-5.0)).is_err());
        assert!(CoordinateMapper::new(window, Axis::new(f64::NAN)).is_err());
        assert!(CoordinateMapper::new(window, Axis::new(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_time_to_pixel_linear() {
        let mapper = day_mapper(1000.0);
        assert!(mapper.time_to_pixel(t0()).abs() < 1e-9);
        assert!((mapper.time_to_pixel(t0() + TimeDelta::hours(12)) - 500.0).abs() < 1e-9);
        assert!((mapper.time_to_pixel(t0() + TimeDelta::hours(24)) - 1000.0).abs() < 1e-9);
        assert!(mapper.time_to_pixel(t0() - TimeDelta::hours(12)) < 0.0);
    }

    #[test]
    fn test_pixel_to_time_clamps() {
        let mapper = day_mapper(1000.0);
        assert_eq!(mapper.pixel_to_time(-50.0), t0());
        assert_eq!(mapper.pixel_to_time(1200.0), t0() + TimeDelta::hours(24));
        assert_eq!(mapper.pixel_to_time(f64::NAN), t0());
        assert_eq!(mapper.pixel_to_time(250.0), t0() + TimeDelta::hours(6));
    }

    #[test]
    fn test_axis_clamp() {
        let axis = Axis::new(300.0);
        assert!((axis.clamp(-1.0)).abs() < f64::EPSILON);
        assert!((axis.clamp(301.0) - 300.0).abs() < f64::EPSILON);
        assert!((axis.clamp(12.5) - 12.5).abs() < f64::EPSILON);
        assert!((Axis::default().clamp(40.0)).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            width in 1.0f64..5000.0,
            span_secs in 1i64..(60 * 60 * 24 * 30),
            fraction in 0.0f64..=1.0,
        ) {
            let window = Window::new(t0(), t0() + TimeDelta::seconds(span_secs)).unwrap();
            let mapper = CoordinateMapper::new(window, Axis::new(width)).unwrap();
            let px = fraction * width;

            let back = mapper.time_to_pixel(mapper.pixel_to_time(px));
            prop_assert!((back - px).abs() <= 1e-6 * width, "px={px} back={back}");
        }

        #[test]
        fn prop_pixel_to_time_stays_in_window(px in -1.0e6f64..1.0e6) {
            let mapper = day_mapper(800.0);
            let t = mapper.pixel_to_time(px);
            prop_assert!(mapper.window().contains(t));
        }
    }
}
