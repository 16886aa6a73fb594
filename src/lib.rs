#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal renderer
//!
//! Two unrelated fractals share this crate.  The Koch snowflake is
//! pure geometry: each segment of a line is replaced by a scaled,
//! rotated and translated copy of a four-segment generator, and doing
//! that over and over converges on a curve of infinite length
//! enclosing a finite area.
//!
//! The Mandelbrot set takes a point c on the complex plane and
//! repeatedly squares z and adds c, measuring how quickly z goes to
//! infinity.  That "velocity", normalised to a stability between zero
//! and one, picks a colour from a palette.  Points with no velocity
//! at all make up the black heart of the set.  Painting an image is a
//! matter of mapping each pixel to the complex number it stands for.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;

pub mod geometry;
pub mod koch;
pub mod mandelbrot;
pub mod output;
pub mod paint;
pub mod palette;
pub mod planes;
pub mod plot;

pub use koch::{koch_line, snowflake};
pub use mandelbrot::{Escape, EscapeCount, MandelbrotSet};
pub use paint::{paint, paint_threaded};
pub use palette::{build_gradient, denormalise, map_stability_to_colour, Gradient, Interpolation};
pub use planes::{Canvas, ComplexMapper, Pixel, Viewport};
