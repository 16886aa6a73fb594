// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colour handling.  A Gradient is a continuous function from [0, 1]
//! to a colour, interpolated channel by channel through a handful of
//! control colours spread evenly across the interval.  Sampling a
//! gradient gives a discrete palette, and painting picks a palette
//! entry by stability without any further interpolation.

use failure::Fail;
use num::clamp;
use std::str::FromStr;

/// A colour with red, green and blue channels in [0, 1].
pub type Colour = [f64; 3];

/// Failures building or reading palettes.
#[derive(Debug, Fail, PartialEq)]
pub enum PaletteError {
    /// There is nothing to pick a colour from.
    #[fail(display = "palette has no colours")]
    EmptyPalette,

    /// A gradient needs a colour at each end.
    #[fail(display = "gradient needs at least {} colours, got {}", needed, got)]
    NotEnoughColours {
        /// The least number of colours accepted.
        needed: usize,
        /// The number of colours given.
        got: usize,
    },

    /// The interpolation name was not recognised.
    #[fail(display = "unknown interpolation '{}'", _0)]
    UnknownInterpolation(String),
}

/// How channel values are filled in between control colours.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Interpolation {
    /// Straight lines between neighbouring control colours.
    Linear,
    /// A natural cubic spline through every control colour, with zero
    /// curvature at both ends.  This is not scipy's not-a-knot spline,
    /// so colours between the controls differ slightly from it.
    Cubic,
}

impl FromStr for Interpolation {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Interpolation::Linear),
            "cubic" => Ok(Interpolation::Cubic),
            _ => Err(PaletteError::UnknownInterpolation(s.to_string())),
        }
    }
}

/// A continuous colour gradient.  Built once from the control
/// colours, then evaluated as often as needed.
#[derive(Clone, Debug)]
pub struct Gradient {
    colours: Vec<Colour>,
    kind: Interpolation,
    // Per channel, the spline's second derivative at each control
    // colour.  All zero for linear gradients.
    curvature: [Vec<f64>; 3],
}

/// Build a gradient through the given colours, the first at 0 and the
/// last at 1.
pub fn build_gradient(colours: &[Colour], kind: Interpolation) -> Result<Gradient, PaletteError> {
    Gradient::new(colours, kind)
}

impl Gradient {
    /// See `build_gradient`.
    pub fn new(colours: &[Colour], kind: Interpolation) -> Result<Gradient, PaletteError> {
        match colours.len() {
            0 => return Err(PaletteError::EmptyPalette),
            1 => return Err(PaletteError::NotEnoughColours { needed: 2, got: 1 }),
            _ => {}
        }
        let channel = |i: usize| -> Vec<f64> {
            let values: Vec<f64> = colours.iter().map(|c| c[i]).collect();
            match kind {
                Interpolation::Linear => vec![0.0; values.len()],
                Interpolation::Cubic => second_derivatives(&values),
            }
        };
        Ok(Gradient {
            colours: colours.to_vec(),
            kind,
            curvature: [channel(0), channel(1), channel(2)],
        })
    }

    /// The interpolation in use.
    pub fn kind(&self) -> Interpolation {
        self.kind
    }

    /// The colour at `t`.  Parameters outside [0, 1] are taken as the
    /// nearer end, and every channel of the result lies in [0, 1].
    pub fn at(&self, t: f64) -> Colour {
        let last = self.colours.len() - 1;
        let position = clamp(t, 0.0, 1.0) * last as f64;
        let i = (position.floor() as usize).min(last - 1);
        let b = position - i as f64;
        let a = 1.0 - b;

        let mut colour = [0.0; 3];
        for (ch, value) in colour.iter_mut().enumerate() {
            let (y0, y1) = (self.colours[i][ch], self.colours[i + 1][ch]);
            let (m0, m1) = (self.curvature[ch][i], self.curvature[ch][i + 1]);
            let v = a * y0 + b * y1 + ((a * a * a - a) * m0 + (b * b * b - b) * m1) / 6.0;
            *value = clamp(v, 0.0, 1.0);
        }
        colour
    }

    /// A palette of `n` colours taken at 0, 1/n, 2/n and so on.
    pub fn sample(&self, n: usize) -> Vec<Colour> {
        (0..n).map(|i| self.at(i as f64 / n as f64)).collect()
    }
}

/// Second derivatives of the natural cubic spline through `y` at unit
/// spacing, found with the tridiagonal (Thomas) solve.  The ends are
/// held at zero.
fn second_derivatives(y: &[f64]) -> Vec<f64> {
    let n = y.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }
    let mut upper = vec![0.0; n];
    let mut rhs = vec![0.0; n];
    for i in 1..n - 1 {
        let d = 6.0 * (y[i + 1] - 2.0 * y[i] + y[i - 1]);
        let pivot = 4.0 - upper[i - 1];
        upper[i] = 1.0 / pivot;
        rhs[i] = (d - rhs[i - 1]) / pivot;
    }
    for i in (1..n - 1).rev() {
        m[i] = rhs[i] - upper[i] * m[i + 1];
    }
    m
}

/// Convert a palette with channels in [0, 1] to 8-bit channels,
/// truncating: 1.0 maps to 255 and anything just below it to 254.
pub fn denormalise(palette: &[Colour]) -> Vec<[u8; 3]> {
    palette
        .iter()
        .map(|c| {
            [
                (c[0] * 255.0) as u8,
                (c[1] * 255.0) as u8,
                (c[2] * 255.0) as u8,
            ]
        })
        .collect()
}

/// What happens to a stability of exactly 1, which lands one past the
/// end of the palette.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PaletteIndexing {
    /// Hold the index to the last entry.
    Clamp,
    /// Wrap the index around to the first entry.
    Wrap,
}

/// The palette entry for a stability in [0, 1] out of `len` entries.
pub fn palette_index(stability: f64, len: usize, indexing: PaletteIndexing) -> Result<usize, PaletteError> {
    if len == 0 {
        return Err(PaletteError::EmptyPalette);
    }
    // Negative and NaN stabilities saturate to zero.
    let index = (stability * len as f64).floor() as usize;
    Ok(match indexing {
        PaletteIndexing::Clamp => index.min(len - 1) % len,
        PaletteIndexing::Wrap => index % len,
    })
}

/// Pick the palette entry for a stability, holding a stability of 1
/// to the last entry.
pub fn map_stability_to_colour<T: Copy>(stability: f64, palette: &[T]) -> Result<T, PaletteError> {
    map_stability_to_colour_with(stability, palette, PaletteIndexing::Clamp)
}

/// Pick the palette entry for a stability with the given indexing.
pub fn map_stability_to_colour_with<T: Copy>(
    stability: f64,
    palette: &[T],
    indexing: PaletteIndexing,
) -> Result<T, PaletteError> {
    let index = palette_index(stability, palette.len(), indexing)?;
    Ok(palette[index])
}
