#![forbid(unsafe_code)]

//! Damped spring animation in pixel space.
//!
//! Drives the drag clone back onto its item's resting slot after release.
//! Parameters follow the tension/friction vocabulary of web spring
//! libraries:
//!
//!   a = -tension × (position - target) - friction × velocity
//!
//! - **tension**: restoring force. Higher is snappier.
//! - **friction**: velocity drag. `friction ≈ 2√tension` is critically damped.
//!
//! # Integration
//!
//! Semi-implicit Euler with a 4 ms maximum step; larger frame deltas are
//! subdivided. A spring is at rest once both the displacement and the
//! velocity fall below their thresholds, at which point it snaps exactly onto
//! the target and stays there.

use std::time::Duration;

use crate::geometry::Point;

const MAX_STEP_SECS: f64 = 0.004;

/// Displacement (px) below which the spring may come to rest.
const DEFAULT_REST_THRESHOLD: f64 = 0.01;

/// Speed (px/s) below which the spring may come to rest.
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.05;

const MIN_TENSION: f64 = 0.1;

/// A one-dimensional damped spring.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    tension: f64,
    friction: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring at `initial` heading to `target` with tension 170 and
    /// friction 26.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            tension: 170.0,
            friction: 26.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: initial == target,
        }
    }

    /// Set tension. Clamped to a small positive minimum.
    #[must_use]
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension.max(MIN_TENSION);
        self
    }

    /// Set friction. Clamped to zero.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction.max(0.0);
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.tension * displacement - self.friction * self.velocity;
        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
        {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

/// Two springs moving a point.
#[derive(Debug, Clone)]
pub struct SpringPoint {
    x: Spring,
    y: Spring,
}

impl SpringPoint {
    #[must_use]
    pub fn new(from: Point, to: Point, tension: f64, friction: f64) -> Self {
        Self {
            x: Spring::new(from.x, to.x)
                .with_tension(tension)
                .with_friction(friction),
            y: Spring::new(from.y, to.y)
                .with_tension(tension)
                .with_friction(friction),
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x.position(), self.y.position())
    }

    pub fn advance(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }
}
