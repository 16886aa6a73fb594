// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Primitive operations on line segments and polylines in the plane:
//! measuring a segment, and scaling, rotating and translating a list
//! of points.  These are the affine building blocks used to lay a
//! copy of the Koch generator over an arbitrary segment.
//!
//! We don't need a Point type; a single Complex number is a Point,
//! with the real part as the x-component and the imaginary part as
//! the y-component.

use failure::Fail;
use num::{clamp, Complex};
use std::f64::consts::PI;

/// A point on the Cartesian plane.
pub type Point = Complex<f64>;

/// An ordered list of points describing a path.
pub type Polyline = Vec<Point>;

/// Failures of the segment operations.  A segment whose ends meet has
/// neither a direction nor a length to scale by.
#[derive(Debug, Fail, PartialEq)]
pub enum GeometryError {
    /// The segment starts and ends at the same point.
    #[fail(display = "segment from ({}, {}) has zero length", x, y)]
    DegenerateSegment {
        /// The x-component of the coincident ends.
        x: f64,
        /// The y-component of the coincident ends.
        y: f64,
    },

    /// The polyline has no points at all.
    #[fail(display = "polyline has no points")]
    EmptyPolyline,
}

fn check_segment(p1: Point, p2: Point) -> Result<(), GeometryError> {
    if p1 == p2 {
        return Err(GeometryError::DegenerateSegment { x: p1.re, y: p1.im });
    }
    Ok(())
}

/// The Euclidean distance between two points.
#[inline]
pub fn length(p1: Point, p2: Point) -> f64 {
    (p2 - p1).norm()
}

/// The unsigned angle, in radians within [0, π], between the segment
/// p1→p2 and the positive x-axis.
pub fn angle_to_horizontal(p1: Point, p2: Point) -> Result<f64, GeometryError> {
    check_segment(p1, p2)?;
    let cosine = (p2.re - p1.re) / length(p1, p2);
    Ok(clamp(cosine, -1.0, 1.0).acos())
}

/// The directed angle, in radians within [0, 2π), that carries the
/// positive x-axis onto the segment p1→p2.
pub fn direction(p1: Point, p2: Point) -> Result<f64, GeometryError> {
    let angle = angle_to_horizontal(p1, p2)?;
    if p2.im - p1.im < 0.0 {
        Ok(2.0 * PI - angle)
    } else {
        Ok(angle)
    }
}

/// Scale every point about the origin so that the first and last
/// points end up `desired_length` apart.  Note that this is not a
/// scale about the first point; a line that does not start at the
/// origin will move.
pub fn scale(points: &[Point], desired_length: f64) -> Result<Polyline, GeometryError> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(GeometryError::EmptyPolyline),
    };
    check_segment(first, last)?;
    let factor = desired_length / length(first, last);
    Ok(points.iter().map(|p| p * factor).collect())
}

/// Rotate every point about the origin by the direction of the
/// segment p1→p2.  A line lying along the positive x-axis comes out
/// pointing the same way as the segment.
pub fn rotate(points: &[Point], p1: Point, p2: Point) -> Result<Polyline, GeometryError> {
    let turn = Complex::from_polar(&1.0, &direction(p1, p2)?);
    Ok(points.iter().map(|p| p * turn).collect())
}

/// Shift every point so the origin lands on `new_origin`.
pub fn translate(points: &[Point], new_origin: Point) -> Polyline {
    points.iter().map(|p| p + new_origin).collect()
}
