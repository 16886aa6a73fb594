// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Painting a canvas.  Every pixel is mapped to its complex number,
//! the evaluator rates its stability, and the palette supplies the
//! colour.  Pixels are independent of one another, so the threaded
//! painter hands each worker its own band of rows.

use crate::mandelbrot::MandelbrotSet;
use crate::palette::{map_stability_to_colour, palette_index, PaletteError, PaletteIndexing};
use crate::planes::{Canvas, ComplexMapper, Pixel, PlaneError, Viewport};
use crossbeam::thread::ScopedJoinHandle;
use failure::Fail;
use log::{debug, info, warn};
use std::time::Instant;

/// Failures while painting.
#[derive(Debug, Fail, PartialEq)]
pub enum PaintError {
    /// The palette could not supply a colour.
    #[fail(display = "{}", _0)]
    Palette(#[cause] PaletteError),

    /// A pixel could not be addressed.
    #[fail(display = "{}", _0)]
    Plane(#[cause] PlaneError),

    /// A painting thread panicked.
    #[fail(display = "a painting thread panicked")]
    WorkerPanicked,
}

impl From<PaletteError> for PaintError {
    fn from(err: PaletteError) -> Self {
        PaintError::Palette(err)
    }
}

impl From<PlaneError> for PaintError {
    fn from(err: PlaneError) -> Self {
        PaintError::Plane(err)
    }
}

fn report_fallbacks(fallbacks: usize) {
    if fallbacks > 0 {
        warn!("{} pixels fell back to integer escape counts", fallbacks);
    }
}

/// Paint every pixel of the canvas, one at a time.  Returns the number
/// of pixels whose smoothed count fell back to the integer count.
pub fn paint(
    canvas: &mut Canvas,
    set: &MandelbrotSet,
    palette: &[[u8; 3]],
    smooth: bool,
) -> Result<usize, PaintError> {
    if palette.is_empty() {
        return Err(PaletteError::EmptyPalette.into());
    }
    debug!(
        "painting {:?} with {} colours, {} iterations, smooth: {}",
        canvas.viewport(),
        palette.len(),
        set.max_iterations(),
        smooth
    );
    let started = Instant::now();
    let mut fallbacks = 0;
    for pixel in canvas.pixels() {
        let count = set.measure(canvas.to_complex(pixel), smooth);
        if count.fell_back {
            fallbacks += 1;
        }
        let colour = map_stability_to_colour(set.normalise(count.value, true), palette)?;
        canvas.set_colour(pixel, colour)?;
    }
    info!("painted {} pixels in {:?}", canvas.viewport().len(), started.elapsed());
    report_fallbacks(fallbacks);
    Ok(fallbacks)
}

/// Paint one band of whole rows, starting at row `top`, straight
/// into its slice of the image's RGB bytes.  Returns the band's
/// smoothing fallbacks.
fn paint_band(
    viewport: &Viewport,
    set: &MandelbrotSet,
    palette: &[[u8; 3]],
    smooth: bool,
    top: u32,
    band: &mut [u8],
) -> Result<usize, PaintError> {
    let width = viewport.pixel_width() as usize;
    let mut fallbacks = 0;
    for (i, rgb) in band.chunks_mut(3).enumerate() {
        let pixel = Pixel((i % width) as u32, top + (i / width) as u32);
        let count = set.measure(viewport.to_complex(pixel), smooth);
        if count.fell_back {
            fallbacks += 1;
        }
        let stability = set.normalise(count.value, true);
        let index = palette_index(stability, palette.len(), PaletteIndexing::Clamp)?;
        rgb.copy_from_slice(&palette[index]);
    }
    Ok(fallbacks)
}

/// Paint the canvas on up to `threads` scoped threads, each owning a
/// contiguous band of rows.  The image and the returned fallback count
/// are identical to `paint`'s.
pub fn paint_threaded(
    canvas: &mut Canvas,
    set: &MandelbrotSet,
    palette: &[[u8; 3]],
    smooth: bool,
    threads: usize,
) -> Result<usize, PaintError> {
    if palette.is_empty() {
        return Err(PaletteError::EmptyPalette.into());
    }
    let viewport = *canvas.viewport();
    let height = viewport.pixel_height() as usize;
    let threads = threads.max(1).min(height);
    let rows_per_band = (height + threads - 1) / threads;
    let band_len = rows_per_band * viewport.pixel_width() as usize * 3;
    debug!(
        "painting {:?} on {} threads, {} rows each",
        viewport, threads, rows_per_band
    );

    let started = Instant::now();
    let bands: Vec<&mut [u8]> = canvas.image_mut().chunks_mut(band_len).collect();
    let results: Vec<Result<usize, PaintError>> = crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Result<usize, PaintError>>> = bands
            .into_iter()
            .enumerate()
            .map(|(n, band)| {
                let top = (n * rows_per_band) as u32;
                spawner.spawn(move |_| paint_band(&viewport, set, palette, smooth, top, band))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or(Err(PaintError::WorkerPanicked)))
            .collect()
    })
    .map_err(|_| PaintError::WorkerPanicked)?;

    let fallbacks = results
        .into_iter()
        .collect::<Result<Vec<usize>, PaintError>>()?
        .into_iter()
        .sum();
    info!("painted {} pixels in {:?}", viewport.len(), started.elapsed());
    report_fallbacks(fallbacks);
    Ok(fallbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{build_gradient, denormalise, Interpolation};
    use num::Complex;

    fn palette() -> Vec<[u8; 3]> {
        let gradient = build_gradient(
            &[[0.0, 0.0, 0.2], [1.0, 0.5, 0.0], [1.0, 1.0, 1.0]],
            Interpolation::Linear,
        )
        .unwrap();
        denormalise(&gradient.sample(32))
    }

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas::new(Viewport::new(width, height, Complex::new(-0.5, 0.0), 3.0).unwrap())
    }

    #[test]
    fn inside_gets_the_last_colour() {
        let palette = palette();
        let set = MandelbrotSet::with_max_iterations(64).unwrap();
        let mut canvas = canvas(10, 10);
        paint(&mut canvas, &set, &palette, false).unwrap();
        // The centre pixel sits at -0.5 + 0i, well inside the cardioid.
        assert!((canvas.to_complex(Pixel(5, 5)) - Complex::new(-0.5, 0.0)).norm() < 1e-9);
        assert_eq!(canvas.colour(Pixel(5, 5)), Ok(palette[31]));
        // The corner at -2 + 1.5i escapes at once.
        assert_eq!(canvas.colour(Pixel(0, 0)), Ok(palette[0]));
    }

    #[test]
    fn threaded_matches_single() {
        let palette = palette();
        let set = MandelbrotSet::with_max_iterations(50).unwrap();
        for smooth in &[false, true] {
            let mut single = canvas(23, 11);
            paint(&mut single, &set, &palette, *smooth).unwrap();
            for threads in &[1, 2, 3, 4, 7, 64] {
                let mut threaded = canvas(23, 11);
                paint_threaded(&mut threaded, &set, &palette, *smooth, *threads).unwrap();
                assert_eq!(threaded.image().to_vec(), single.image().to_vec());
            }
        }
    }

    #[test]
    fn smoothing_fallbacks_are_counted() {
        // With a radius of 0.5 much of the view escapes with |z| < 1,
        // where the smoothed count has no value.
        let palette = palette();
        let set = MandelbrotSet::new(50, 0.5).unwrap();
        let viewport = Viewport::new(8, 8, Complex::new(0.75, 0.0), 1.0).unwrap();
        let fell_back = viewport
            .pixels()
            .filter(|p| set.measure(viewport.to_complex(*p), true).fell_back)
            .count();
        assert!(fell_back > 0);

        let mut single = Canvas::new(viewport);
        assert_eq!(paint(&mut single, &set, &palette, true), Ok(fell_back));
        let mut threaded = Canvas::new(viewport);
        assert_eq!(paint_threaded(&mut threaded, &set, &palette, true, 3), Ok(fell_back));
        assert_eq!(threaded.image().to_vec(), single.image().to_vec());

        let mut plain = Canvas::new(viewport);
        assert_eq!(paint(&mut plain, &set, &palette, false), Ok(0));
    }

    #[test]
    fn empty_palette_fails_before_painting() {
        let set = MandelbrotSet::with_max_iterations(10).unwrap();
        let mut canvas = canvas(2, 2);
        let err = PaintError::Palette(PaletteError::EmptyPalette);
        assert_eq!(paint(&mut canvas, &set, &[], false), Err(err));
        let err = PaintError::Palette(PaletteError::EmptyPalette);
        assert_eq!(paint_threaded(&mut canvas, &set, &[], false, 2), Err(err));
    }
}
