// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate fractals;
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{format_err, Error};
use fractals::output::write_ppm;
use fractals::palette::Colour;
use fractals::plot::write_svg;
use fractals::{build_gradient, denormalise, paint, paint_threaded, snowflake};
use fractals::{Canvas, Interpolation, MandelbrotSet, Viewport};
use log::{debug, info};
use num::Complex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

/// Given a string and a separator, returns the two values
/// separated by the separator.
fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_positive(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

const KOCH: &str = "koch";
const MANDELBROT: &str = "mandelbrot";

const OUTPUT: &str = "output";
const ORDER: &str = "order";
const SIZE: &str = "size";
const CENTER: &str = "center";
const WIDTH: &str = "width";
const ITERATIONS: &str = "iterations";
const RADIUS: &str = "radius";
const SMOOTH: &str = "smooth";
const INTERPOLATION: &str = "interpolation";
const COLOURS: &str = "colours";
const THREADS: &str = "threads";

/// Control colours of the Mandelbrot gradient, from fast escapes to
/// the black heart of the set.
const CONTROLS: [Colour; 5] = [
    [0.0, 0.03, 0.39],
    [0.13, 0.42, 0.8],
    [0.93, 1.0, 1.0],
    [1.0, 0.67, 0.0],
    [0.0, 0.0, 0.0],
];

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("fractals")
        .version("0.1.0")
        .about("Koch snowflake and Mandelbrot set renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name(KOCH)
                .about("Draw a Koch snowflake as SVG")
                .arg(
                    Arg::with_name(ORDER)
                        .long(ORDER)
                        .short("n")
                        .takes_value(true)
                        .default_value("4")
                        .validator(|s| {
                            validate_range(
                                &s,
                                0,
                                8,
                                "Could not parse recursion order",
                                "Recursion order must be between 0 and 8",
                            )
                        })
                        .help("Recursion order of the curve"),
                )
                .arg(
                    Arg::with_name(OUTPUT)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output file [default: koch_snowflake_<order>.svg]"),
                )
                .arg(
                    Arg::with_name(SIZE)
                        .long(SIZE)
                        .short("s")
                        .takes_value(true)
                        .default_value("800")
                        .validator(|s| {
                            validate_range(
                                &s,
                                16,
                                16_384,
                                "Could not parse drawing size",
                                "Drawing size must be between 16 and 16384",
                            )
                        })
                        .help("Width and height of the drawing"),
                ),
        )
        .subcommand(
            SubCommand::with_name(MANDELBROT)
                .about("Paint the Mandelbrot set as PPM")
                .arg(
                    Arg::with_name(OUTPUT)
                        .required(true)
                        .long(OUTPUT)
                        .short("o")
                        .takes_value(true)
                        .help("Output file"),
                )
                .arg(
                    Arg::with_name(SIZE)
                        .long(SIZE)
                        .short("s")
                        .takes_value(true)
                        .default_value("512x512")
                        .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                        .help("Size of output image"),
                )
                .arg(
                    Arg::with_name(CENTER)
                        .long(CENTER)
                        .short("c")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .default_value("-0.75,0")
                        .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse centre point"))
                        .help("Centre of the view on the complex plane"),
                )
                .arg(
                    Arg::with_name(WIDTH)
                        .long(WIDTH)
                        .short("w")
                        .takes_value(true)
                        .default_value("3.5")
                        .validator(|s| validate_positive(&s, "View width must be a positive number"))
                        .help("Real width of the view"),
                )
                .arg(
                    Arg::with_name(ITERATIONS)
                        .long(ITERATIONS)
                        .short("i")
                        .takes_value(true)
                        .default_value("256")
                        .validator(|s| {
                            validate_range(
                                &s,
                                1,
                                1_000_000,
                                "Could not parse iteration count",
                                "Iteration count must be between 1 and 1000000",
                            )
                        })
                        .help("Maximum iterations per point"),
                )
                .arg(
                    Arg::with_name(RADIUS)
                        .long(RADIUS)
                        .short("r")
                        .takes_value(true)
                        .default_value("2.0")
                        .validator(|s| validate_positive(&s, "Escape radius must be a positive number"))
                        .help("Escape radius"),
                )
                .arg(
                    Arg::with_name(SMOOTH)
                        .long(SMOOTH)
                        .help("Smooth the escape counts"),
                )
                .arg(
                    Arg::with_name(INTERPOLATION)
                        .long(INTERPOLATION)
                        .takes_value(true)
                        .possible_values(&["linear", "cubic"])
                        .default_value("linear")
                        .help("Interpolation between the palette's control colours"),
                )
                .arg(
                    Arg::with_name(COLOURS)
                        .long(COLOURS)
                        .takes_value(true)
                        .default_value("256")
                        .validator(|s| {
                            validate_range(
                                &s,
                                2,
                                4096,
                                "Could not parse palette size",
                                "Palette size must be between 2 and 4096",
                            )
                        })
                        .help("Number of colours in the palette"),
                )
                .arg(
                    Arg::with_name(THREADS)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .default_value("1")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                max_threads,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", max_threads),
                            )
                        })
                        .help("Number of threads to paint with"),
                ),
        )
        .get_matches()
}

/// Fetch and parse an argument that clap has already validated.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| format_err!("Could not read --{}", name))
}

fn koch(matches: &ArgMatches) -> Result<(), Error> {
    let order: u32 = value(matches, ORDER)?;
    let size: u32 = value(matches, SIZE)?;
    let output = match matches.value_of(OUTPUT) {
        Some(output) => output.to_string(),
        None => format!("koch_snowflake_{}.svg", order),
    };
    debug!("koch snowflake of order {} into {}", order, output);

    let sides = snowflake(order)?;
    let mut file = BufWriter::new(File::create(&output)?);
    write_svg(&mut file, &sides, size)?;
    file.flush()?;
    info!("wrote {}", output);
    Ok(())
}

fn mandelbrot(matches: &ArgMatches) -> Result<(), Error> {
    let output = matches
        .value_of(OUTPUT)
        .ok_or_else(|| format_err!("No output file given"))?;
    let (pixel_width, pixel_height) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<u32>(s, 'x'))
        .ok_or_else(|| format_err!("Error parsing image dimensions"))?;
    let center = matches
        .value_of(CENTER)
        .and_then(parse_complex)
        .ok_or_else(|| format_err!("Error parsing centre point"))?;
    let width: f64 = value(matches, WIDTH)?;
    let iterations: u32 = value(matches, ITERATIONS)?;
    let radius: f64 = value(matches, RADIUS)?;
    let interpolation: Interpolation = matches
        .value_of(INTERPOLATION)
        .unwrap_or("linear")
        .parse()?;
    let colours: usize = value(matches, COLOURS)?;
    let threads: usize = value(matches, THREADS)?;
    let smooth = matches.is_present(SMOOTH);

    let viewport = Viewport::new(pixel_width, pixel_height, center, width)?;
    let set = MandelbrotSet::new(iterations, radius)?;
    let gradient = build_gradient(&CONTROLS, interpolation)?;
    let palette = denormalise(&gradient.sample(colours));

    let mut canvas = Canvas::new(viewport);
    if threads > 1 {
        paint_threaded(&mut canvas, &set, &palette, smooth, threads)?;
    } else {
        paint(&mut canvas, &set, &palette, smooth)?;
    }
    write_ppm(output, canvas.image())?;
    info!("wrote {}", output);
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    let matches = args();
    let result = match matches.subcommand() {
        (KOCH, Some(matches)) => koch(matches),
        (MANDELBROT, Some(matches)) => mandelbrot(matches),
        _ => Err(format_err!("No subcommand given")),
    };

    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_parse_around_the_separator() {
        assert_eq!(parse_pair::<u32>("640x480", 'x'), Some((640, 480)));
        assert_eq!(parse_pair::<u32>("640x", 'x'), None);
        assert_eq!(parse_pair::<u32>("640", 'x'), None);
        assert_eq!(parse_pair::<f64>("0.5,-1", ','), Some((0.5, -1.0)));
    }

    #[test]
    fn complex_numbers_parse() {
        assert_eq!(parse_complex("-0.75,0"), Some(Complex::new(-0.75, 0.0)));
        assert_eq!(parse_complex("-0.75;0"), None);
    }

    #[test]
    fn ranges_are_inclusive() {
        assert!(validate_range("8", 0, 8, "nan", "range").is_ok());
        assert_eq!(validate_range("9", 0, 8, "nan", "range"), Err("range".to_string()));
        assert_eq!(validate_range("x", 0, 8, "nan", "range"), Err("nan".to_string()));
    }

    #[test]
    fn positive_numbers_only() {
        assert!(validate_positive("0.5", "bad").is_ok());
        assert!(validate_positive("0", "bad").is_err());
        assert!(validate_positive("-1", "bad").is_err());
        assert!(validate_positive("inf", "bad").is_err());
    }
}
