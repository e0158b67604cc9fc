//! Encoded-polyline decoding (precision 1e5).
//!
//! Each coordinate delta is zig-zag encoded, split into 5-bit chunks with a
//! continuation bit (0x20), and offset by 63 into printable ASCII.

use crate::error::{Result, SolveError};

use super::GeoPoint;

const PRECISION: f64 = 1e5;

/// Longest chunk run per value; seven 5-bit chunks cover any coordinate.
const MAX_CHUNKS: usize = 7;

/// Decodes an encoded polyline into coordinates.
///
/// # Examples
///
/// ```
/// use open_route::geo::decode_polyline;
///
/// let points = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
/// assert_eq!(points.len(), 3);
/// assert!((points[0].lat - 38.5).abs() < 1e-9);
/// assert!((points[0].lon + 120.2).abs() < 1e-9);
/// ```
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while index < bytes.len() {
        lat = accumulate(lat, bytes, &mut index)?;
        lon = accumulate(lon, bytes, &mut index)?;
        points.push(GeoPoint::new(lat as f64 / PRECISION, lon as f64 / PRECISION));
    }

    Ok(points)
}

fn accumulate(value: i64, bytes: &[u8], index: &mut usize) -> Result<i64> {
    let start = *index;
    let delta = next_delta(bytes, index)?;
    value
        .checked_add(delta)
        .ok_or(SolveError::InvalidPolyline { offset: start })
}

fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;
    for _ in 0..MAX_CHUNKS {
        let Some(&byte) = bytes.get(*index) else {
            return Err(SolveError::InvalidPolyline { offset: *index });
        };
        let chunk = i64::from(byte) - 63;
        if !(0..64).contains(&chunk) {
            return Err(SolveError::InvalidPolyline { offset: *index });
        }
        *index += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            return Ok(zigzag(result));
        }
    }
    Err(SolveError::InvalidPolyline { offset: *index })
}

fn zigzag(result: i64) -> i64 {
    if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    }
}
