// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Line drawings as SVG.  The polylines are fitted into a square
//! drawing with the y-axis pointing up, the way they would sit on a
//! plot.  A point that is not finite breaks its line in two.

use crate::geometry::{Point, Polyline};
use failure::Fail;
use std::io::{self, Write};

/// Failures writing a plot.
#[derive(Debug, Fail)]
pub enum PlotError {
    /// None of the polylines has a finite point.
    #[fail(display = "nothing to plot")]
    NothingToPlot,

    /// The drawing could not be written out.
    #[fail(display = "{}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for PlotError {
    fn from(err: io::Error) -> Self {
        PlotError::Io(err)
    }
}

const MARGIN: f64 = 0.05;

fn finite(p: &Point) -> bool {
    p.re.is_finite() && p.im.is_finite()
}

/// The lower-left and upper-right corners of every finite point.
fn bounds(lines: &[Polyline]) -> Option<(Point, Point)> {
    lines
        .iter()
        .flat_map(|line| line.iter())
        .filter(|p| finite(p))
        .fold(None, |acc, p| match acc {
            None => Some((*p, *p)),
            Some((lo, hi)) => Some((
                Point::new(lo.re.min(p.re), lo.im.min(p.im)),
                Point::new(hi.re.max(p.re), hi.im.max(p.im)),
            )),
        })
}

/// Write the polylines as an SVG drawing `size` pixels square.
pub fn write_svg<W: Write>(out: &mut W, lines: &[Polyline], size: u32) -> Result<(), PlotError> {
    let (lo, hi) = bounds(lines).ok_or(PlotError::NothingToPlot)?;
    let extent = (hi.re - lo.re).max(hi.im - lo.im);
    let extent = if extent > 0.0 { extent } else { 1.0 };
    let size = f64::from(size);
    let pad = size * MARGIN;
    let k = (size - 2.0 * pad) / extent;

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
        size
    )?;
    for line in lines {
        for run in line.split(|p| !finite(p)).filter(|run| run.len() > 1) {
            let points: Vec<String> = run
                .iter()
                .map(|p| format!("{:.3},{:.3}", pad + (p.re - lo.re) * k, pad + (hi.im - p.im) * k))
                .collect();
            writeln!(
                out,
                r#"  <polyline fill="none" stroke="black" stroke-width="2" points="{}"/>"#,
                points.join(" ")
            )?;
        }
    }
    writeln!(out, "</svg>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn render(lines: &[Polyline], size: u32) -> String {
        let mut out = Vec::new();
        write_svg(&mut out, lines, size).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_polyline_per_line() {
        let lines = vec![
            vec![Complex::new(0.0, 0.0), Complex::new(1.0, 1.0)],
            vec![Complex::new(1.0, 1.0), Complex::new(2.0, 0.0)],
        ];
        let svg = render(&lines, 100);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn y_axis_points_up() {
        let lines = vec![vec![Complex::new(0.0, 0.0), Complex::new(10.0, 10.0)]];
        let svg = render(&lines, 100);
        assert!(svg.contains(r#"points="5.000,95.000 95.000,5.000""#), "{}", svg);
    }

    #[test]
    fn non_finite_points_break_the_line() {
        let lines = vec![vec![
            Complex::new(0.0, 0.0),
            Complex::new(1.0, 0.0),
            Complex::new(std::f64::NAN, 0.0),
            Complex::new(2.0, 0.0),
            Complex::new(3.0, 1.0),
        ]];
        let svg = render(&lines, 100);
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn nothing_to_plot() {
        let mut out = Vec::new();
        match write_svg(&mut out, &[vec![Complex::new(std::f64::INFINITY, 0.0)]], 10) {
            Err(PlotError::NothingToPlot) => {}
            other => panic!("expected NothingToPlot, got {:?}", other),
        }
    }
}
