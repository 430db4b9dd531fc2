//! STL serialization of baked triangle soups.
//!
//! Binary layout (all little-endian): 80-byte header, `u32` triangle count,
//! then per triangle a normal and three vertices as `f32` triples followed by
//! a `u16` attribute byte count (always 0).
#![forbid(unsafe_code)]

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Write};
use thiserror::Error;

pub const HEADER_LEN: usize = 80;
pub const FACET_LEN: usize = 50;

/// One STL triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Facet {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

#[derive(Debug, Error)]
pub enum StlError {
    #[error("stl data is {0} bytes, shorter than the 84-byte preamble")]
    TooShort(usize),
    #[error("stl declares {expected} bytes but holds {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Exact byte length of a binary STL with `triangles` facets.
pub const fn binary_stl_len(triangles: usize) -> usize {
    HEADER_LEN + 4 + FACET_LEN * triangles
}

fn header(label: &str) -> [u8; HEADER_LEN] {
    let mut h = [0u8; HEADER_LEN];
    let bytes = label.as_bytes();
    // "solid" at the start makes some readers treat the file as ASCII.
    if !bytes.starts_with(b"solid") {
        let n = bytes.len().min(HEADER_LEN);
        h[..n].copy_from_slice(&bytes[..n]);
    }
    h
}

fn write_vec3<W: Write>(w: &mut W, v: [f32; 3]) -> io::Result<()> {
    for c in v {
        w.write_f32::<LittleEndian>(c)?;
    }
    Ok(())
}

/// Triangle count as stored in the preamble.
fn facet_count(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{len} triangles do not fit an stl count"),
        )
    })
}

pub fn write_binary_stl<W: Write>(w: &mut W, label: &str, facets: &[Facet]) -> io::Result<()> {
    let count = facet_count(facets.len())?;
    w.write_all(&header(label))?;
    w.write_u32::<LittleEndian>(count)?;
    for f in facets {
        write_vec3(w, f.normal)?;
        for v in f.vertices {
            write_vec3(w, v)?;
        }
        w.write_u16::<LittleEndian>(0)?;
    }
    Ok(())
}

pub fn binary_stl_bytes(label: &str, facets: &[Facet]) -> io::Result<Vec<u8>> {
    facet_count(facets.len())?;
    let mut out = Vec::with_capacity(binary_stl_len(facets.len()));
    write_binary_stl(&mut out, label, facets)?;
    Ok(out)
}

pub fn write_ascii_stl<W: Write>(w: &mut W, name: &str, facets: &[Facet]) -> io::Result<()> {
    let name = if name.trim().is_empty() { "planet" } else { name.trim() };
    writeln!(w, "solid {name}")?;
    for f in facets {
        let [nx, ny, nz] = f.normal;
        writeln!(w, "  facet normal {nx:e} {ny:e} {nz:e}")?;
        writeln!(w, "    outer loop")?;
        for [x, y, z] in f.vertices {
            writeln!(w, "      vertex {x:e} {y:e} {z:e}")?;
        }
        writeln!(w, "    endloop")?;
        writeln!(w, "  endfacet")?;
    }
    writeln!(w, "endsolid {name}")?;
    Ok(())
}

fn read_vec3(r: &mut &[u8]) -> io::Result<[f32; 3]> {
    Ok([
        r.read_f32::<LittleEndian>()?,
        r.read_f32::<LittleEndian>()?,
        r.read_f32::<LittleEndian>()?,
    ])
}

/// Parses a binary STL, requiring the length to match the declared count exactly.
pub fn read_binary_stl(bytes: &[u8]) -> Result<Vec<Facet>, StlError> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(bytes.len()));
    }
    let mut r = &bytes[HEADER_LEN..];
    let count = r.read_u32::<LittleEndian>()? as usize;
    let expected = binary_stl_len(count);
    if bytes.len() != expected {
        return Err(StlError::LengthMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    let mut facets = Vec::with_capacity(count);
    for _ in 0..count {
        let normal = read_vec3(&mut r)?;
        let vertices = [read_vec3(&mut r)?, read_vec3(&mut r)?, read_vec3(&mut r)?];
        let _attr = r.read_u16::<LittleEndian>()?;
        facets.push(Facet { normal, vertices });
    }
    Ok(facets)
}
