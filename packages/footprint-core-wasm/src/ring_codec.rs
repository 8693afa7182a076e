//! Polygon ring normalization and Well-Known-Text serialization.
//!
//! A ring is a plain sequence of `(lng, lat)` coordinates. Nothing here holds
//! state: every function takes its input by reference and returns a new value,
//! so the drawing layer, the building lookup and the export path can all call
//! into it the same way.
//!
//! Coordinates are written with `f64`'s `Display`, which yields the shortest
//! decimal that parses back to the identical value and never uses exponent
//! notation. That makes `parse_wkt(&to_wkt(r))` exact for finite input.

use geo_types::{Coord, LineString, Polygon};
use serde_json::Value;

use crate::error::{FormatError, InputError};

/// A `(longitude, latitude)` pair in decimal degrees (WGS84).
pub type Point = Coord<f64>;

/// Returns `ring` with its first point appended when first and last differ.
///
/// Comparison is exact on both ordinates. An empty ring stays empty.
pub fn close(ring: &[Point]) -> Vec<Point> {
    let mut closed = ring.to_vec();
    if !is_closed(ring) {
        closed.push(ring[0]);
    }
    closed
}

/// Whether the ring is empty or already has `first == last`.
pub fn is_closed(ring: &[Point]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => first == last,
        _ => true,
    }
}

/// Serializes a ring as `POLYGON ((x y, x y, ...))`, closing it first.
///
/// Returns an empty string for an empty ring.
pub fn to_wkt(ring: &[Point]) -> String {
    if ring.is_empty() {
        return String::new();
    }

    let coord_string = close(ring)
        .iter()
        .map(|c| format!("{} {}", c.x, c.y))
        .collect::<Vec<_>>()
        .join(", ");

    format!("POLYGON (({}))", coord_string)
}

/// Parses a single-ring `POLYGON ((...))` string.
///
/// The keyword is case-insensitive and whitespace around tokens is ignored.
/// The ring is returned exactly as written; no closure is applied.
pub fn parse_wkt(text: &str) -> Result<Vec<Point>, FormatError> {
    let inner = unwrap_polygon(text).ok_or_else(|| FormatError::MissingWrapper {
        text: text.to_string(),
    })?;

    inner
        .split(',')
        .enumerate()
        .map(|(index, pair)| parse_pair(index, pair))
        .collect()
}

// Strips `POLYGON ((` and `))`, returning the coordinate list between them.
fn unwrap_polygon(text: &str) -> Option<&str> {
    let body = text.trim();
    let open = body.find('(')?;
    if !body[..open].trim().eq_ignore_ascii_case("POLYGON") {
        return None;
    }

    let inner = body[open + 1..].trim_start().strip_prefix('(')?;
    let inner = inner.trim_end().strip_suffix(')')?;
    let inner = inner.trim_end().strip_suffix(')')?;

    // Interior rings or stray parentheses are not part of the grammar.
    if inner.contains(&['(', ')'][..]) {
        return None;
    }
    Some(inner)
}

fn parse_pair(index: usize, pair: &str) -> Result<Point, FormatError> {
    let tokens: Vec<&str> = pair.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(FormatError::PairArity {
            index,
            pair: pair.trim().to_string(),
            tokens: tokens.len(),
        });
    }

    let number = |token: &str| {
        token.parse::<f64>().map_err(|_| FormatError::InvalidNumber {
            index,
            token: token.to_string(),
        })
    };

    Ok(Coord {
        x: number(tokens[0])?,
        y: number(tokens[1])?,
    })
}

/// Projects the ring to `[x, y]` pairs as given, without closing it.
pub fn to_raw_list(ring: &[Point]) -> Vec<[f64; 2]> {
    ring.iter().map(|c| [c.x, c.y]).collect()
}

/// Builds a ring from `[x, y, ...]` entries; ordinates past the second are dropped.
pub fn from_raw_list(coords: &[Vec<f64>]) -> Result<Vec<Point>, InputError> {
    coords
        .iter()
        .enumerate()
        .map(|(index, pair)| match pair.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(InputError::BadCoordinate { index }),
        })
        .collect()
}

/// Builds a ring from a flat `[x0, y0, x1, y1, ...]` buffer.
pub fn from_flat(coordinates: &[f64]) -> Result<Vec<Point>, InputError> {
    if coordinates.len() % 2 != 0 {
        return Err(InputError::OddLength(coordinates.len()));
    }
    Ok(coordinates
        .chunks_exact(2)
        .map(|chunk| Coord { x: chunk[0], y: chunk[1] })
        .collect())
}

/// Flattens a ring into `[x0, y0, x1, y1, ...]`.
pub fn to_flat(ring: &[Point]) -> Vec<f64> {
    ring.iter().flat_map(|c| [c.x, c.y]).collect()
}

/// The ring as a hole-free polygon. `geo_types` closes the exterior itself.
pub fn to_polygon(ring: &[Point]) -> Polygon<f64> {
    Polygon::new(LineString::new(ring.to_vec()), vec![])
}

/// Extracts the exterior ring (`coordinates[0]`) from a GeoJSON Feature or
/// Polygon geometry, as emitted by the drawing control or a clicked building.
pub fn ring_from_geojson(value: &Value) -> Result<Vec<Point>, InputError> {
    let geometry = value.get("geometry").unwrap_or(value);

    if geometry.get("type").and_then(Value::as_str) != Some("Polygon") {
        return Err(InputError::MissingField("geometry.type"));
    }

    let exterior = geometry
        .get("coordinates")
        .and_then(|c| c.get(0))
        .and_then(Value::as_array)
        .ok_or(InputError::MissingField("geometry.coordinates"))?;

    exterior
        .iter()
        .enumerate()
        .map(|(index, coord)| {
            let pair = coord.as_array().ok_or(InputError::BadCoordinate { index })?;
            match (
                pair.first().and_then(Value::as_f64),
                pair.get(1).and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => Ok(Coord { x, y }),
                _ => Err(InputError::BadCoordinate { index }),
            }
        })
        .collect()
}
