// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.  A point c on the complex plane is fed
//! through z → z² + c starting from zero; how many rounds z survives
//! before its magnitude passes the escape radius is the "velocity"
//! used to colour the point.  Points that survive every round are
//! taken to be in the set, which at a finite iteration budget is an
//! approximation, not a proof.

use failure::Fail;
use num::{clamp, Complex};
use std::f64::consts::LN_2;

/// The escape radius used when none is given.
pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

/// Failures of the evaluator.
#[derive(Debug, Fail, PartialEq)]
pub enum MandelbrotError {
    /// No iterations means nothing can be measured.
    #[fail(display = "maximum iterations must be greater than zero")]
    ZeroMaxIterations,

    /// The escape radius is not a positive, finite number.
    #[fail(display = "escape radius must be positive, got {}", _0)]
    InvalidEscapeRadius(f64),

    /// The smoothing formula takes log(log(|z|)), which has no value
    /// once |z| is at most one.
    #[fail(display = "cannot smooth an escape at |z| = {}", _0)]
    SmoothingDomain(f64),
}

/// How the orbit of a point ended.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The orbit left the escape radius during the given iteration,
    /// counting from zero, with z at the given magnitude.
    Escaped {
        /// The iteration z escaped on.
        iteration: u32,
        /// |z| on escape.
        magnitude: f64,
    },
    /// The orbit stayed within the radius for every iteration.
    Bounded,
}

/// An escape count, smoothed or not.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeCount {
    /// The count itself.
    pub value: f64,
    /// Smoothing was asked for but |z| ≤ 1 at escape, so `value` is
    /// the integer count.
    pub fell_back: bool,
}

impl EscapeCount {
    fn exact(value: f64) -> Self {
        EscapeCount {
            value,
            fell_back: false,
        }
    }
}

/// The iteration budget and escape radius for evaluating points.
/// Once set, this object should not be mutable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MandelbrotSet {
    max_iterations: u32,
    escape_radius: f64,
}

impl MandelbrotSet {
    /// Requires a non-zero iteration budget and a positive escape
    /// radius.
    pub fn new(max_iterations: u32, escape_radius: f64) -> Result<Self, MandelbrotError> {
        if max_iterations == 0 {
            return Err(MandelbrotError::ZeroMaxIterations);
        }
        if !(escape_radius.is_finite() && escape_radius > 0.0) {
            return Err(MandelbrotError::InvalidEscapeRadius(escape_radius));
        }
        Ok(MandelbrotSet {
            max_iterations,
            escape_radius,
        })
    }

    /// An evaluator with the default escape radius of 2.
    pub fn with_max_iterations(max_iterations: u32) -> Result<Self, MandelbrotError> {
        MandelbrotSet::new(max_iterations, DEFAULT_ESCAPE_RADIUS)
    }

    /// The iteration budget.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The escape radius.
    pub fn escape_radius(&self) -> f64 {
        self.escape_radius
    }

    /// Run the orbit of c to escape or to the end of the budget.
    pub fn iterate(&self, c: Complex<f64>) -> Escape {
        let mut z = Complex::new(0.0, 0.0);
        for iteration in 0..self.max_iterations {
            z = z * z + c;
            let magnitude = z.norm();
            if magnitude > self.escape_radius {
                return Escape::Escaped {
                    iteration,
                    magnitude,
                };
            }
        }
        Escape::Bounded
    }

    /// The number of iterations c survives, or `max_iterations` if it
    /// never escapes.  With `smooth`, an escaped count is renormalised
    /// to a continuous value `iteration + 1 - log2(ln|z|)`, which may
    /// run a little past `max_iterations - 1`.  Where that formula has
    /// no value (|z| ≤ 1, only possible with a radius below one), the
    /// integer count is returned instead; `measure` reports when that
    /// happens.
    pub fn escape_count(&self, c: Complex<f64>, smooth: bool) -> f64 {
        self.measure(c, smooth).value
    }

    /// The escape count of c along with whether smoothing fell back to
    /// the integer count.
    pub fn measure(&self, c: Complex<f64>, smooth: bool) -> EscapeCount {
        match self.iterate(c) {
            Escape::Bounded => EscapeCount::exact(f64::from(self.max_iterations)),
            Escape::Escaped {
                iteration,
                magnitude,
            } if smooth => match smoothed(iteration, magnitude) {
                Ok(value) => EscapeCount::exact(value),
                Err(_) => EscapeCount {
                    value: f64::from(iteration),
                    fell_back: true,
                },
            },
            Escape::Escaped { iteration, .. } => EscapeCount::exact(f64::from(iteration)),
        }
    }

    /// The smoothed escape count of c, failing with `SmoothingDomain`
    /// instead of falling back to the integer count.
    pub fn smooth_escape_count(&self, c: Complex<f64>) -> Result<f64, MandelbrotError> {
        match self.iterate(c) {
            Escape::Bounded => Ok(f64::from(self.max_iterations)),
            Escape::Escaped {
                iteration,
                magnitude,
            } => smoothed(iteration, magnitude),
        }
    }

    /// The escape count as a fraction of the budget.  With `clamp` the
    /// result is held to [0, 1]; smoothing can otherwise stray
    /// slightly outside it.
    pub fn stability(&self, c: Complex<f64>, smooth: bool, clamp_result: bool) -> f64 {
        self.normalise(self.escape_count(c, smooth), clamp_result)
    }

    /// Turn an escape count into a stability, as `stability` does.
    pub fn normalise(&self, count: f64, clamp_result: bool) -> f64 {
        let value = count / f64::from(self.max_iterations);
        if clamp_result {
            clamp(value, 0.0, 1.0)
        } else {
            value
        }
    }

    /// Whether c never escapes within the budget.
    pub fn contains(&self, c: Complex<f64>) -> bool {
        self.stability(c, false, true) == 1.0
    }
}

fn smoothed(iteration: u32, magnitude: f64) -> Result<f64, MandelbrotError> {
    if magnitude <= 1.0 {
        return Err(MandelbrotError::SmoothingDomain(magnitude));
    }
    Ok(f64::from(iteration) + 1.0 - magnitude.ln().ln() / LN_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn construction_checks_its_arguments() {
        assert_eq!(MandelbrotSet::new(0, 2.0), Err(MandelbrotError::ZeroMaxIterations));
        assert_eq!(
            MandelbrotSet::new(10, 0.0),
            Err(MandelbrotError::InvalidEscapeRadius(0.0))
        );
        let set = MandelbrotSet::with_max_iterations(10).unwrap();
        assert_eq!(set.escape_radius(), 2.0);
        assert_eq!(set.max_iterations(), 10);
    }

    #[test]
    fn origin_is_bounded() {
        let set = MandelbrotSet::with_max_iterations(100).unwrap();
        let c = Complex::new(0.0, 0.0);
        assert_eq!(set.iterate(c), Escape::Bounded);
        assert_eq!(set.escape_count(c, false), 100.0);
        assert_eq!(set.escape_count(c, true), 100.0);
        assert_eq!(set.stability(c, false, true), 1.0);
        assert!(set.contains(c));
    }

    #[test]
    fn two_sits_on_the_radius() {
        // 0² + 2 = 2 is not beyond a radius of 2; it escapes next round.
        let set = MandelbrotSet::with_max_iterations(100).unwrap();
        match set.iterate(Complex::new(2.0, 0.0)) {
            Escape::Escaped { iteration, magnitude } => {
                assert_eq!(iteration, 1);
                assert_eq!(magnitude, 6.0);
            }
            Escape::Bounded => panic!("2 should escape"),
        }
    }

    #[test]
    fn three_escapes_at_once() {
        let set = MandelbrotSet::with_max_iterations(100).unwrap();
        let c = Complex::new(3.0, 0.0);
        assert_eq!(
            set.iterate(c),
            Escape::Escaped {
                iteration: 0,
                magnitude: 3.0
            }
        );
        assert_eq!(set.escape_count(c, false), 0.0);
        assert_eq!(set.stability(c, false, true), 0.0);
        assert!(!set.contains(c));
    }

    #[test]
    fn smoothing_renormalises_the_count() {
        let set = MandelbrotSet::with_max_iterations(100).unwrap();
        let c = Complex::new(3.0, 0.0);
        let expected = 1.0 - 3.0_f64.ln().ln() / LN_2;
        assert!((set.escape_count(c, true) - expected).abs() < 1e-12);
        assert_eq!(set.smooth_escape_count(c), Ok(set.escape_count(c, true)));
    }

    #[test]
    fn smoothing_below_unit_magnitude_falls_back() {
        // With a radius of 0.5, c = 0.75 escapes at once with |z| < 1.
        let set = MandelbrotSet::new(50, 0.5).unwrap();
        let c = Complex::new(0.75, 0.0);
        assert_eq!(set.escape_count(c, true), 0.0);
        assert_eq!(
            set.measure(c, true),
            EscapeCount {
                value: 0.0,
                fell_back: true
            }
        );
        assert!(!set.measure(c, false).fell_back);
        assert!(!MandelbrotSet::with_max_iterations(50).unwrap().measure(c, true).fell_back);
        assert_eq!(
            set.smooth_escape_count(c),
            Err(MandelbrotError::SmoothingDomain(0.75))
        );
    }

    #[test]
    fn unclamped_stability_can_exceed_one() {
        // Escaping on the last iteration with |z| just past the radius
        // smooths to more than max_iterations.
        let set = MandelbrotSet::with_max_iterations(1).unwrap();
        let c = Complex::new(2.1, 0.0);
        let raw = set.stability(c, true, false);
        assert!(raw > 1.0, "{}", raw);
        assert_eq!(set.stability(c, true, true), 1.0);
    }

    #[test]
    fn clamped_stability_stays_in_range() {
        let mut rng = rand::thread_rng();
        for max_iterations in &[1, 7, 64, 300] {
            let set = MandelbrotSet::with_max_iterations(*max_iterations).unwrap();
            for _ in 0..500 {
                let c = Complex::new(rng.gen_range(-3.0, 3.0), rng.gen_range(-3.0, 3.0));
                for smooth in &[false, true] {
                    let s = set.stability(c, *smooth, true);
                    assert!(s >= 0.0 && s <= 1.0, "{} at {}", s, c);
                }
            }
        }
    }

    #[test]
    fn known_members() {
        let set = MandelbrotSet::with_max_iterations(500).unwrap();
        assert!(set.contains(Complex::new(-1.0, 0.0)));
        assert!(set.contains(Complex::new(-0.1, 0.1)));
        assert!(set.contains(Complex::new(0.25, 0.0)));
        assert!(!set.contains(Complex::new(0.5, 0.5)));
        assert!(!set.contains(Complex::new(-2.1, 0.0)));
    }
}
