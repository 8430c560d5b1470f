//! Temp particle stream files: the on-disk handoff format between this
//! crate and an external output plug-in. One file per `(field-id,
//! coordinate)` pair, named `___ic_temp_NNNNN.bin` where `NNNNN =
//! field_id*100 + coord`, Fortran-style: an 8-byte total-byte-count
//! prefix, the raw array, then the same count repeated as a suffix.

use crate::error::GridError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// The seven particle/gas fields a stream can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    DmMass = 1,
    DmVel = 2,
    DmPos = 3,
    GasVel = 4,
    GasRho = 5,
    GasTemp = 6,
    GasPos = 7,
}

/// One of the three spatial coordinates a vector-valued field is split
/// across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coord {
    X = 0,
    Y = 1,
    Z = 2,
}

/// Values a temp stream can carry; implemented for the two floating
/// widths an output plug-in might expect.
pub trait StreamScalar: Copy {
    const BYTE_WIDTH: usize;
    fn to_le_bytes(self, out: &mut Vec<u8>);
    fn from_le_bytes(bytes: &[u8]) -> Self;
}

impl StreamScalar for f32 {
    const BYTE_WIDTH: usize = 4;
    fn to_le_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
    fn from_le_bytes(bytes: &[u8]) -> Self {
        f32::from_le_bytes(bytes.try_into().unwrap())
    }
}

impl StreamScalar for f64 {
    const BYTE_WIDTH: usize = 8;
    fn to_le_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
    fn from_le_bytes(bytes: &[u8]) -> Self {
        f64::from_le_bytes(bytes.try_into().unwrap())
    }
}

/// The stream index `field_id*100 + coord`, as used in the `NNNNN`
/// filename component.
pub fn stream_index(field: FieldId, coord: Coord) -> u32 {
    field as u32 * 100 + coord as u32
}

/// Builds the conventional `___ic_temp_NNNNN.bin` path for one stream,
/// inside `dir`.
pub fn stream_path(dir: impl AsRef<Path>, field: FieldId, coord: Coord) -> PathBuf {
    dir.as_ref()
        .join(format!("___ic_temp_{:05}.bin", stream_index(field, coord)))
}

/// Writes one temp stream file: `u64 total_bytes; T[N]; u64
/// total_bytes;`. `total_bytes` covers only the `T[N]` payload, not the
/// two length fields themselves.
pub fn write_stream<T: StreamScalar>(path: impl AsRef<Path>, values: &[T]) -> Result<(), GridError> {
    let total_bytes = (values.len() * T::BYTE_WIDTH) as u64;
    let mut buf = Vec::with_capacity(16 + total_bytes as usize);
    buf.extend_from_slice(&total_bytes.to_le_bytes());
    for &v in values {
        v.to_le_bytes(&mut buf);
    }
    buf.extend_from_slice(&total_bytes.to_le_bytes());

    let mut file = std::fs::File::create(path).map_err(|e| GridError::ShapeMismatch(e.to_string()))?;
    file.write_all(&buf).map_err(|e| GridError::ShapeMismatch(e.to_string()))?;
    Ok(())
}

/// Reads back a temp stream file, verifying the leading and trailing
/// length prefixes agree and that the payload divides evenly by
/// `T::BYTE_WIDTH`.
pub fn read_stream<T: StreamScalar>(path: impl AsRef<Path>) -> Result<Vec<T>, GridError> {
    let mut file = std::fs::File::open(path).map_err(|e| GridError::ShapeMismatch(e.to_string()))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .map_err(|e| GridError::ShapeMismatch(e.to_string()))?;

    if buf.len() < 16 {
        return Err(GridError::ShapeMismatch("temp stream file too short".to_string()));
    }
    let header = u64::from_le_bytes(buf[0..8].try_into().unwrap());
    let footer = u64::from_le_bytes(buf[buf.len() - 8..].try_into().unwrap());
    if header != footer {
        return Err(GridError::ShapeMismatch(format!(
            "temp stream length prefix {header} does not match suffix {footer}"
        )));
    }
    let payload = &buf[8..buf.len() - 8];
    if payload.len() as u64 != header {
        return Err(GridError::ShapeMismatch(format!(
            "temp stream declared {header} bytes but payload is {} bytes",
            payload.len()
        )));
    }
    if payload.len() % T::BYTE_WIDTH != 0 {
        return Err(GridError::ShapeMismatch(
            "temp stream payload does not divide evenly by the element width".to_string(),
        ));
    }
    Ok(payload.chunks_exact(T::BYTE_WIDTH).map(T::from_le_bytes).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_index_matches_field_times_hundred_plus_coord() {
        assert_eq!(stream_index(FieldId::DmMass, Coord::X), 100);
        assert_eq!(stream_index(FieldId::GasTemp, Coord::Z), 602);
        assert_eq!(stream_index(FieldId::DmPos, Coord::Y), 301);
    }

    #[test]
    fn round_trips_f32_payload() {
        let dir = std::env::temp_dir();
        let path = stream_path(&dir, FieldId::DmPos, Coord::X);
        let values: Vec<f32> = (0..1000).map(|i| i as f32 * 0.5).collect();
        write_stream(&path, &values).unwrap();
        let loaded: Vec<f32> = read_stream(&path).unwrap();
        assert_eq!(values, loaded);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_truncated_file() {
        let path = std::env::temp_dir().join("___ic_temp_truncated_test.bin");
        std::fs::write(&path, [0u8; 4]).unwrap();
        let err = read_stream::<f32>(&path).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch(_)));
        std::fs::remove_file(&path).ok();
    }
}
