//! Initial states and plain-text field I/O.
//!
//! The factories here build normalized wave packets on a lattice of any
//! dimension and record their construction parameters in the field's
//! [`WfInfo`]. Per-axis parameters are named with an axis suffix: `k_x`,
//! `sigma_y`, `start_z`, and so on.
//!
//! Fields can also be read from and written to delimited text. Each line holds
//! one row of `re<delim>im` pairs:
//! - 1D: exactly one pair per line, one line per site.
//! - 2D: an equal, even number of tokens on every line; the line number is the
//!   `x` index and the pair number is the `y` index.
//!
//! Fields read from text are returned as given, without normalization.

use std::{
    fs::File,
    io::{ BufRead, BufReader, BufWriter, Write },
    path::Path,
};
use num_complex::Complex64 as C64;
use num_traits::One;
use crate::{
    LResult,
    error::{ LatticeError, ShapeMismatch },
    field::{ LatticeField, WaveType, WfInfo },
    shape::Boundary,
};

const AXES: [&str; 3] = ["x", "y", "z"];

fn axis_param(base: &str, axis: usize) -> String {
    match AXES.get(axis) {
        Some(a) => format!("{base}_{a}"),
        None => format!("{base}_{axis}"),
    }
}

// fail unless a per-axis parameter list has one entry per lattice axis
fn check_axes<A>(info: &WfInfo, values: &[A]) -> LResult<()> {
    if values.len() != info.ndim() {
        return Err(ShapeMismatch(
            info.extents().to_vec(), vec![values.len()]).into());
    }
    Ok(())
}

// fill a fresh field with `f(coord)` and normalize it
fn build<F>(info: WfInfo, f: F) -> LResult<LatticeField>
where F: Fn(&[usize]) -> C64 + Sync
{
    let mut psi = LatticeField::from_info(info);
    let shape = psi.shape().clone();
    let part = psi.partition;
    part.for_each_mut(&mut psi.data, |i, z| {
        let coord
            = (0..shape.ndim())
            .map(|ax| shape.coord_along(i, ax))
            .collect::<Vec<usize>>();
        *z = f(&coord);
    });
    psi.renormalize()?;
    Ok(psi)
}

/// Plane wave `exp(-i k·x)`, normalized over the lattice.
pub fn free_wave<E>(extents: E, boundary: Boundary, k: &[f64])
    -> LResult<LatticeField>
where E: Into<Vec<usize>>
{
    let mut info = WfInfo::new(extents, boundary, WaveType::FreeWave)?;
    check_axes(&info, k)?;
    for (ax, &kx) in k.iter().enumerate() {
        info = info.with_param(axis_param("k", ax), kx);
    }
    build(info, |x| {
        let phase: f64
            = k.iter().zip(x).map(|(kx, &xk)| kx * xk as f64).sum();
        C64::cis(-phase)
    })
}

/// Gaussian envelope `exp(-Σ (x - x0)² / 4σ²)` on top of [`free_wave`],
/// normalized over the lattice.
///
/// `start` gives the center of the packet and must lie on the lattice.
pub fn gauss<E>(
    extents: E,
    boundary: Boundary,
    k: &[f64],
    sigma: &[f64],
    start: &[usize],
) -> LResult<LatticeField>
where E: Into<Vec<usize>>
{
    let mut info = WfInfo::new(extents, boundary, WaveType::Gauss)?;
    check_axes(&info, k)?;
    check_axes(&info, sigma)?;
    info.shape().flatten(start)?;
    let iter = k.iter().zip(sigma).zip(start).enumerate();
    for (ax, ((&kx, &sx), &x0)) in iter {
        info = info
            .with_param(axis_param("k", ax), kx)
            .with_param(axis_param("sigma", ax), sx)
            .with_param(axis_param("start", ax), x0 as f64);
    }
    build(info, |x| {
        let (phase, env): (f64, f64)
            = k.iter().zip(sigma).zip(start).zip(x)
            .fold((0.0, 0.0), |(ph, en), (((kx, sx), &x0), &xk)| {
                let d = xk as f64 - x0 as f64;
                (ph + kx * xk as f64, en + d * d / (4.0 * sx * sx))
            });
        C64::from_polar((-env).exp(), -phase)
    })
}

/// A single unit amplitude at `start`.
pub fn delta<E>(extents: E, boundary: Boundary, start: &[usize])
    -> LResult<LatticeField>
where E: Into<Vec<usize>>
{
    let mut info = WfInfo::new(extents, boundary, WaveType::Delta)?;
    let idx = info.shape().flatten(start)?;
    for (ax, &x0) in start.iter().enumerate() {
        info = info.with_param(axis_param("start", ax), x0 as f64);
    }
    let mut psi = LatticeField::from_info(info);
    psi.set_flat(idx, C64::one())?;
    Ok(psi)
}

// parse one `re<delim>im` pair; `line` is 1-based for error messages
fn parse_pair(line: usize, re: &str, im: &str) -> LResult<C64> {
    let parse = |s: &str| -> LResult<f64> {
        s.trim().parse::<f64>()
            .map_err(|e| LatticeError::malformed(line, format!("{s:?}: {e}")))
    };
    Ok(C64::new(parse(re)?, parse(im)?))
}

fn parse_row(line: usize, text: &str, delim: char) -> LResult<Vec<C64>> {
    let tokens: Vec<&str> = text.split(delim).collect();
    if tokens.len() % 2 != 0 {
        return Err(LatticeError::malformed(
            line,
            format!("expected re{delim}im pairs; got {} tokens", tokens.len()),
        ));
    }
    tokens.chunks_exact(2)
        .map(|p| parse_pair(line, p[0], p[1]))
        .collect()
}

/// Read a 1D field from delimited text.
pub fn read_delimited_1d<R>(reader: R, delim: char, boundary: Boundary)
    -> LResult<LatticeField>
where R: BufRead
{
    let mut data: Vec<C64> = Vec::new();
    for (k, line) in reader.lines().enumerate() {
        let line = line?;
        let row = parse_row(k + 1, &line, delim)?;
        if row.len() != 1 {
            return Err(LatticeError::malformed(
                k + 1,
                format!("expected a single re{delim}im pair; got {}", row.len()),
            ));
        }
        data.push(row[0]);
    }
    if data.is_empty() {
        return Err(LatticeError::malformed(0, "no data"));
    }
    let info = WfInfo::new([data.len()], boundary, WaveType::Custom)?;
    LatticeField::from_vec(info, data)
}

/// Read a 2D field from delimited text.
pub fn read_delimited_2d<R>(reader: R, delim: char, boundary: Boundary)
    -> LResult<LatticeField>
where R: BufRead
{
    let mut data: Vec<C64> = Vec::new();
    let mut nx: usize = 0;
    let mut ny: Option<usize> = None;
    for (k, line) in reader.lines().enumerate() {
        let line = line?;
        let row = parse_row(k + 1, &line, delim)?;
        match ny {
            None => { ny = Some(row.len()); },
            Some(n) if n != row.len() => {
                return Err(LatticeError::malformed(
                    k + 1,
                    format!("expected {n} pairs to match previous rows; got {}",
                        row.len()),
                ));
            },
            Some(_) => { },
        }
        data.extend(row);
        nx += 1;
    }
    match ny {
        Some(ny) if ny > 0 => {
            let info = WfInfo::new([nx, ny], boundary, WaveType::Custom)?;
            LatticeField::from_vec(info, data)
        },
        _ => Err(LatticeError::malformed(0, "no data")),
    }
}

/// Read a 1D field from a delimited text file.
pub fn from_file_1d<P>(path: P, delim: char, boundary: Boundary)
    -> LResult<LatticeField>
where P: AsRef<Path>
{
    log::debug!("reading 1D field from {}", path.as_ref().display());
    read_delimited_1d(BufReader::new(File::open(path)?), delim, boundary)
}

/// Read a 2D field from a delimited text file.
pub fn from_file_2d<P>(path: P, delim: char, boundary: Boundary)
    -> LResult<LatticeField>
where P: AsRef<Path>
{
    log::debug!("reading 2D field from {}", path.as_ref().display());
    read_delimited_2d(BufReader::new(File::open(path)?), delim, boundary)
}

/// Write a 1D or 2D field as delimited text readable by
/// [`read_delimited_1d`] or [`read_delimited_2d`].
pub fn write_delimited<W>(psi: &LatticeField, mut writer: W, delim: char)
    -> LResult<()>
where W: Write
{
    let per_line
        = match psi.extents() {
            [_] => 1,
            [_, ny] => *ny,
            ext => {
                return Err(LatticeError::Unsupported {
                    what: "delimited text",
                    reason: format!("{}-dimensional field {ext:?}", ext.len()),
                });
            },
        };
    for row in psi.as_slice().chunks(per_line) {
        let line: Vec<String>
            = row.iter()
            .map(|z| format!("{}{delim}{}", z.re, z.im))
            .collect();
        writeln!(writer, "{}", line.join(&delim.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a 1D or 2D field to a delimited text file.
pub fn to_file<P>(psi: &LatticeField, path: P, delim: char) -> LResult<()>
where P: AsRef<Path>
{
    log::debug!("writing field to {}", path.as_ref().display());
    write_delimited(psi, BufWriter::new(File::create(path)?), delim)
}
