//! Exercises the JS-facing exports. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use footprint_core_wasm::*;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn test_start_is_reentrant() {
    start();
    start();
}

#[wasm_bindgen_test]
fn test_close_ring() {
    let closed = close_ring(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
    assert_eq!(closed.to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    assert!(close_ring(&[0.0, 0.0, 1.0]).is_err());
}

#[wasm_bindgen_test]
fn test_wkt_exports() {
    let wkt = ring_to_wkt(&[-2.5, 53.4, -2.4, 53.4, -2.4, 53.5]).unwrap();
    assert_eq!(wkt, "POLYGON ((-2.5 53.4, -2.4 53.4, -2.4 53.5, -2.5 53.4))");
    assert_eq!(ring_to_wkt(&[]).unwrap(), "");

    let parsed = parse_wkt("POLYGON ((0 0, 1 0, 1 1, 0 0))").unwrap();
    assert_eq!(parsed.to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0]);

    let err = parse_wkt("POLYGON ((a b, 3 4))").unwrap_err();
    assert!(err.as_string().unwrap().contains("\"a\""));
}

#[wasm_bindgen_test]
fn test_raw_list_export() {
    let raw = ring_to_raw_list(&[0.0, 1.0, 2.0, 3.0]).unwrap();
    let pairs: Vec<[f64; 2]> = serde_wasm_bindgen::from_value(raw).unwrap();
    assert_eq!(pairs, vec![[0.0, 1.0], [2.0, 3.0]]);
}

#[wasm_bindgen_test]
fn test_overpass_exports() {
    let query = build_overpass_query(-2.45, 53.45, r#"{"searchRadiusM": 50}"#).unwrap();
    assert!(query.contains("(around:50,53.45,-2.45)"));

    let response = r#"{"elements": [{"type": "way", "id": 7, "geometry": [
        {"lat": 53.45, "lon": -2.45}, {"lat": 53.45, "lon": -2.4499}, {"lat": 53.4501, "lon": -2.4499}
    ]}]}"#;
    let json = parse_overpass_buildings(response, -2.45, 53.45, "").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["count"], 1);
    assert_eq!(value["feature_collection"]["features"][0]["properties"]["building"], "yes");
}

#[wasm_bindgen_test]
fn test_selection_flow() {
    let feature = r#"{"type": "Feature", "properties": {}, "geometry": {
        "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
    }}"#;
    let wkt = selection_set_from_feature(feature).unwrap();
    assert_eq!(wkt, "POLYGON ((0 0, 1 0, 1 1, 0 0))");

    let export = selection_export().unwrap();
    let export: footprint_core_wasm::selection::Export = serde_wasm_bindgen::from_value(export).unwrap();
    assert_eq!(export.text, wkt);

    assert!(selection_clear());
    assert!(!selection_clear());
    assert!(selection_export().unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn test_selection_set_ring_and_state() {
    let wkt = selection_set_ring(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0]).unwrap();
    assert_eq!(wkt, "POLYGON ((0 0, 2 0, 2 2, 0 0))");

    let state: serde_json::Value =
        serde_wasm_bindgen::from_value(selection_state().unwrap()).unwrap();
    assert_eq!(state["vertex_count"].as_f64(), Some(3.0));
    assert_eq!(state["wkt"], wkt);
    assert_eq!(state["display_text"], wkt);
    assert_eq!(state["show_raw"], false);

    selection_set_show_raw(true);
    let state: serde_json::Value =
        serde_wasm_bindgen::from_value(selection_state().unwrap()).unwrap();
    assert_eq!(state["show_raw"], true);
    let shown: Vec<[f64; 2]> =
        serde_json::from_str(state["display_text"].as_str().unwrap()).unwrap();
    assert_eq!(shown, vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0]]);
    selection_set_show_raw(false);

    // Odd-length buffers are rejected and leave the selection alone
    let err = selection_set_ring(&[0.0, 0.0, 1.0]).unwrap_err();
    assert!(err.as_string().unwrap().contains("odd length 3"));
    let state: serde_json::Value =
        serde_wasm_bindgen::from_value(selection_state().unwrap()).unwrap();
    assert_eq!(state["vertex_count"].as_f64(), Some(3.0));

    assert!(selection_clear());
}

#[wasm_bindgen_test]
fn test_bbox_around_export() {
    let bbox = bbox_around(0.0, 0.0, 100.0);
    assert_eq!(bbox.len(), 4);
    assert!(bbox[0] < 0.0 && bbox[1] < 0.0 && bbox[2] > 0.0 && bbox[3] > 0.0);
    assert_eq!(bbox_around(10.0, 20.0, 0.0), vec![10.0, 20.0, 10.0, 20.0]);
}

#[wasm_bindgen_test]
fn test_parse_geocode_response_export() {
    let hit = parse_geocode_response(
        r#"{"features": [{"place_name": "Salford, United Kingdom", "center": [-2.2927, 53.4875]}]}"#,
    )
    .unwrap();
    let hit: serde_json::Value = serde_wasm_bindgen::from_value(hit).unwrap();
    assert_eq!(hit["center"]["x"], -2.2927);
    assert_eq!(hit["center"]["y"], 53.4875);
    assert_eq!(hit["place_name"], "Salford, United Kingdom");

    assert!(parse_geocode_response(r#"{"features": []}"#).unwrap().is_undefined());
    assert!(parse_geocode_response("not json").is_err());
}

#[wasm_bindgen_test]
fn test_tool_config_export() {
    let config: serde_json::Value =
        serde_wasm_bindgen::from_value(tool_config(r#"{"geocodeCountry": "IE"}"#).unwrap()).unwrap();
    assert_eq!(config["geocodeCountry"], "IE");
    assert_eq!(config["geocodeLimit"].as_f64(), Some(1.0));
    assert_eq!(config["searchZoom"], 18.0);
    assert_eq!(config["overpassEndpoint"], "https://overpass-api.de/api/interpreter");
    assert!(tool_config(r#"{"searchRadiusM": -1}"#).is_err());
}
