// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Koch curve.  A segment is replaced by four segments a third
//! its length: the left third, the two sides of an equilateral bump,
//! and the right third.  Doing that again to each of the four, and
//! again, converges on the Koch curve; three of them around a
//! triangle make the snowflake.

use crate::geometry::{length, rotate, scale, translate, GeometryError, Point, Polyline};
use num::Complex;

/// The generator: one segment three units long with a bump peaking
/// at (1.5, √3/2).
pub fn template() -> [Point; 5] {
    [
        Complex::new(0.0, 0.0),
        Complex::new(1.0, 0.0),
        Complex::new(1.5, 3.0_f64.sqrt() / 2.0),
        Complex::new(2.0, 0.0),
        Complex::new(3.0, 0.0),
    ]
}

/// Lay a copy of the generator over the segment start→end.
fn expand_segment(template: &[Point], start: Point, end: Point) -> Result<Polyline, GeometryError> {
    let sized = scale(template, length(start, end))?;
    let turned = rotate(&sized, start, end)?;
    Ok(translate(&turned, start))
}

/// Replace every segment of the polyline with a copy of the
/// generator.  Neighbouring copies share an end point, which is only
/// emitted once.
fn expand(line: &[Point], template: &[Point]) -> Result<Polyline, GeometryError> {
    let mut next: Polyline = Vec::with_capacity((line.len() - 1) * (template.len() - 1) + 1);
    next.extend(line.first());
    for segment in line.windows(2) {
        let copy = expand_segment(template, segment[0], segment[1])?;
        next.extend(copy.into_iter().skip(1));
    }
    Ok(next)
}

/// Expand the segment start→end into a Koch curve of the given order.
/// Order zero is the segment itself; order `k` has `4^k + 1` points
/// and every one of its segments is `3^k` times shorter than the
/// original.
pub fn koch_line(start: Point, end: Point, order: u32) -> Result<Polyline, GeometryError> {
    let template = template();
    (0..order).try_fold(vec![start, end], |line, _| expand(&line, &template))
}

/// The three sides of the snowflake, each a Koch curve of the given
/// order.  The seed triangle has corners (1, 1), (2, 1 + √3) and
/// (3, 1), and is traversed clockwise so the bumps point outward.
pub fn snowflake(order: u32) -> Result<Vec<Polyline>, GeometryError> {
    let corners = [
        Complex::new(1.0, 1.0),
        Complex::new(2.0, 1.0 + 3.0_f64.sqrt()),
        Complex::new(3.0, 1.0),
    ];
    (0..corners.len())
        .map(|i| koch_line(corners[i], corners[(i + 1) % corners.len()], order))
        .collect()
}
