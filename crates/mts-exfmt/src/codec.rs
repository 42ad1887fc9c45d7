//! Little-endian primitive encode/decode shared by all sections.
//!
//! Strings and sequences are prefixed with a `u32` length.  There is no
//! alignment padding and no self-describing schema; each section knows its
//! own layout.

use std::io::{Read, Write};

use mts_core::GeoPoint;

use crate::{ExfmtError, ExfmtResult};

// ── Writers ───────────────────────────────────────────────────────────────────

pub fn write_u8(w: &mut dyn Write, v: u8) -> ExfmtResult<()> {
    w.write_all(&[v])?;
    Ok(())
}

pub fn write_u16(w: &mut dyn Write, v: u16) -> ExfmtResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u32(w: &mut dyn Write, v: u32) -> ExfmtResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u64(w: &mut dyn Write, v: u64) -> ExfmtResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_f32(w: &mut dyn Write, v: f32) -> ExfmtResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_f64(w: &mut dyn Write, v: f64) -> ExfmtResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Sequence length as `u32`.  Longer sequences cannot be represented.
pub fn write_len(w: &mut dyn Write, len: usize, what: &'static str) -> ExfmtResult<()> {
    let len = u32::try_from(len)
        .map_err(|_| ExfmtError::malformed(what, format!("{len} entries exceed the u32 length prefix")))?;
    write_u32(w, len)
}

pub fn write_str(w: &mut dyn Write, s: &str, what: &'static str) -> ExfmtResult<()> {
    write_len(w, s.len(), what)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub fn write_point(w: &mut dyn Write, p: GeoPoint) -> ExfmtResult<()> {
    write_f32(w, p.lat)?;
    write_f32(w, p.lon)
}

/// Length-prefixed polyline or polygon.
pub fn write_points(w: &mut dyn Write, points: &[GeoPoint], what: &'static str) -> ExfmtResult<()> {
    write_len(w, points.len(), what)?;
    points.iter().try_for_each(|&p| write_point(w, p))
}

// ── Readers ───────────────────────────────────────────────────────────────────

pub fn read_u8(r: &mut dyn Read) -> ExfmtResult<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn read_u16(r: &mut dyn Read) -> ExfmtResult<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u32(r: &mut dyn Read) -> ExfmtResult<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_u64(r: &mut dyn Read) -> ExfmtResult<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn read_f32(r: &mut dyn Read) -> ExfmtResult<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

pub fn read_f64(r: &mut dyn Read) -> ExfmtResult<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

pub fn read_len(r: &mut dyn Read) -> ExfmtResult<usize> {
    Ok(read_u32(r)? as usize)
}

pub fn read_str(r: &mut dyn Read, what: &'static str) -> ExfmtResult<String> {
    let len = read_len(r)?;
    let mut buf = Vec::new();
    Read::take(&mut *r, len as u64).read_to_end(&mut buf)?;
    if buf.len() != len {
        return Err(ExfmtError::malformed(what, "string runs past the end of the section"));
    }
    String::from_utf8(buf).map_err(|e| ExfmtError::malformed(what, format!("invalid UTF-8 string: {e}")))
}

pub fn read_point(r: &mut dyn Read) -> ExfmtResult<GeoPoint> {
    let lat = read_f32(r)?;
    let lon = read_f32(r)?;
    Ok(GeoPoint::new(lat, lon))
}

pub fn read_points(r: &mut dyn Read) -> ExfmtResult<Vec<GeoPoint>> {
    let n = read_len(r)?;
    // Capacity is not trusted: a corrupt length must not allocate gigabytes.
    let mut out = Vec::with_capacity(n.min(1024));
    for _ in 0..n {
        out.push(read_point(r)?);
    }
    Ok(out)
}
