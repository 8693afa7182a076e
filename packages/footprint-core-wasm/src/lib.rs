use std::fmt::Display;

use js_sys::Float64Array;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

// Create a console module for logging
pub mod console;
pub mod error;
// Ring closure and WKT serialization
pub mod ring_codec;
pub mod bbox_filter;
pub mod config;
// Building footprint lookup glue
pub mod overpass;
pub mod geocode;
// Current drawn/picked polygon
pub mod selection;
mod models;

use bbox_filter::Bbox;
use config::ToolConfig;
use models::{BuildingsResult, SelectionSnapshot};
use ring_codec::Point;
use selection::with_selection;

// Enable better panic messages in console during development
#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

// Use the macro from our console module
#[macro_export]
macro_rules! console_log {
    ($($t:tt)*) => ($crate::console::log(&format!($($t)*)))
}

use std::sync::Once;
static INIT: Once = Once::new();

#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        console_log!("Footprint WASM module initialized");
    });
}

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn flat_ring(coordinates: &[f64]) -> Result<Vec<Point>, JsValue> {
    ring_codec::from_flat(coordinates).map_err(js_error)
}

/// Closes a flat `[x0, y0, x1, y1, ...]` ring.
#[wasm_bindgen]
pub fn close_ring(coordinates: &[f64]) -> Result<Float64Array, JsValue> {
    let ring = flat_ring(coordinates)?;
    let closed = ring_codec::close(&ring);
    Ok(Float64Array::from(ring_codec::to_flat(&closed).as_slice()))
}

/// `POLYGON ((...))` text for a flat ring; empty string for an empty ring.
#[wasm_bindgen]
pub fn ring_to_wkt(coordinates: &[f64]) -> Result<String, JsValue> {
    let ring = flat_ring(coordinates)?;
    Ok(ring_codec::to_wkt(&ring))
}

/// Parses `POLYGON ((...))` into a flat coordinate array.
#[wasm_bindgen]
pub fn parse_wkt(text: &str) -> Result<Float64Array, JsValue> {
    match ring_codec::parse_wkt(text) {
        Ok(ring) => Ok(Float64Array::from(ring_codec::to_flat(&ring).as_slice())),
        Err(err) => {
            crate::console::warn(&format!("WKT parse failed: {}", err));
            Err(js_error(err))
        }
    }
}

/// `[[x, y], ...]` array for a flat ring, unclosed.
#[wasm_bindgen]
pub fn ring_to_raw_list(coordinates: &[f64]) -> Result<JsValue, JsValue> {
    let ring = flat_ring(coordinates)?;
    Ok(to_value(&ring_codec::to_raw_list(&ring))?)
}

/// `[minLng, minLat, maxLng, maxLat]` around a point.
#[wasm_bindgen]
pub fn bbox_around(lng: f64, lat: f64, radius_m: f64) -> Vec<f64> {
    Bbox::around(Point { x: lng, y: lat }, radius_m).as_array().to_vec()
}

/// Resolved tool settings (defaults filled in) for the page to read the
/// Overpass endpoint, geocoding country/limit and search zoom from.
#[wasm_bindgen]
pub fn tool_config(config_json: &str) -> Result<JsValue, JsValue> {
    let config = ToolConfig::from_json(config_json).map_err(js_error)?;
    Ok(to_value(&config)?)
}

/// Overpass QL for buildings near a search hit. `config_json` may be empty.
#[wasm_bindgen]
pub fn build_overpass_query(lng: f64, lat: f64, config_json: &str) -> Result<String, JsValue> {
    let config = ToolConfig::from_json(config_json).map_err(js_error)?;
    Ok(overpass::building_query(
        Point { x: lng, y: lat },
        config.search_radius_m,
        config.overpass_timeout_s,
    ))
}

/// Turns an Overpass response into a GeoJSON FeatureCollection (as a JSON
/// string) restricted to the search area around `(lng, lat)`.
#[wasm_bindgen]
pub fn parse_overpass_buildings(
    response_json: &str,
    lng: f64,
    lat: f64,
    config_json: &str,
) -> Result<String, JsValue> {
    let config = ToolConfig::from_json(config_json).map_err(js_error)?;
    let footprints = overpass::parse_buildings(response_json).map_err(js_error)?;
    let parsed = footprints.len();

    let bbox = Bbox::around(Point { x: lng, y: lat }, config.search_radius_m);
    let footprints = overpass::within_bbox(footprints, &bbox);
    console_log!(
        "Parsed {} building footprints, {} within search area",
        parsed,
        footprints.len()
    );

    let result = BuildingsResult {
        count: footprints.len(),
        feature_collection: overpass::to_feature_collection(&footprints),
    };
    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize buildings: {}", e)))
}

/// `{ center: {x, y}, place_name }` for the best match, or `undefined`.
#[wasm_bindgen]
pub fn parse_geocode_response(response_json: &str) -> Result<JsValue, JsValue> {
    let hit = geocode::first_hit(response_json).map_err(js_error)?;
    if hit.is_none() {
        console_log!("Geocoding returned no features");
    }
    Ok(to_value(&hit)?)
}

/// Sets the selection from a drawn or clicked GeoJSON polygon feature and
/// returns its WKT.
#[wasm_bindgen]
pub fn selection_set_from_feature(feature_json: &str) -> Result<String, JsValue> {
    let feature: serde_json::Value = serde_json::from_str(feature_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid feature JSON: {}", e)))?;
    let ring = ring_codec::ring_from_geojson(&feature).map_err(js_error)?;
    console_log!("Selection set from feature with {} vertices", ring.len());
    Ok(with_selection(|s| {
        s.set_ring(ring);
        s.wkt().to_string()
    }))
}

/// Sets the selection from a flat ring and returns its WKT.
#[wasm_bindgen]
pub fn selection_set_ring(coordinates: &[f64]) -> Result<String, JsValue> {
    let ring = flat_ring(coordinates)?;
    console_log!("Selection set from flat ring with {} vertices", ring.len());
    Ok(with_selection(|s| {
        s.set_ring(ring);
        s.wkt().to_string()
    }))
}

/// Drops the current selection (draw delete / clear all). Returns whether a
/// ring was selected before the call.
#[wasm_bindgen]
pub fn selection_clear() -> bool {
    let cleared = with_selection(|s| s.clear());
    if cleared {
        console_log!("Selection cleared");
    }
    cleared
}

#[wasm_bindgen]
pub fn selection_set_show_raw(show_raw: bool) {
    with_selection(|s| s.set_show_raw(show_raw));
}

#[wasm_bindgen]
pub fn selection_state() -> Result<JsValue, JsValue> {
    let snapshot = with_selection(|s| SelectionSnapshot::from(&*s));
    Ok(to_value(&snapshot)?)
}

/// `{ format: "wkt" | "raw", text }` for the clipboard, or `undefined`
/// when nothing is selected.
#[wasm_bindgen]
pub fn selection_export() -> Result<JsValue, JsValue> {
    let export = with_selection(|s| s.export());
    Ok(to_value(&export)?)
}

// Get information about WASM module capabilities
#[wasm_bindgen]
pub fn get_wasm_info() -> String {
    serde_json::to_string(&serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "export_formats": ["wkt", "raw"],
        "coordinate_format": "shortest round-trip decimal",
    }))
    .unwrap_or_else(|_| "{}".to_string())
}
