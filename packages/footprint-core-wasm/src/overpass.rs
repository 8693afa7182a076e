// Building footprints from an OpenStreetMap Overpass lookup.
//
// The page runs the HTTP request itself; this module writes the query text and
// turns the JSON answer into closed footprint rings.
use std::collections::HashMap;

use geo::GeodesicArea;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::bbox_filter::{ring_intersects_bbox, Bbox};
use crate::error::InputError;
use crate::ring_codec::{self, Point};

const DEFAULT_BUILDING_TAG: &str = "yes";

// Raw `[out:json]` response shape. Only ways carry a top-level geometry with `out geom`.
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    geometry: Vec<Option<OverpassNode>>,
}

#[derive(Debug, Deserialize)]
struct OverpassNode {
    lat: f64,
    lon: f64,
}

/// A building outline returned by the lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub id: u64,
    /// Value of the OSM `building` tag.
    pub building: String,
    /// Closed ring of `(lon, lat)` vertices.
    pub ring: Vec<Point>,
}

impl Footprint {
    /// Ground area in square metres on the WGS84 ellipsoid.
    pub fn area_m2(&self) -> f64 {
        ring_codec::to_polygon(&self.ring).geodesic_area_unsigned()
    }
}

/// Overpass QL selecting building ways and relations within `radius_m` of `center`.
pub fn building_query(center: Point, radius_m: f64, timeout_s: u32) -> String {
    let around = format!("(around:{},{},{})", radius_m, center.y, center.x);
    format!(
        "[out:json][timeout:{timeout_s}];\n(\n  way[\"building\"]{around};\n  relation[\"building\"]{around};\n);\nout geom;"
    )
}

/// Parses an Overpass `out geom` response into closed footprints.
///
/// Relations and ways without geometry are skipped. A response without
/// `elements` yields no footprints.
pub fn parse_buildings(json: &str) -> Result<Vec<Footprint>, InputError> {
    let response: OverpassResponse = serde_json::from_str(json)?;

    let footprints = response
        .elements
        .into_iter()
        .filter(|element| element.kind == "way")
        .filter_map(|element| {
            let vertices: Vec<Point> = element
                .geometry
                .iter()
                .flatten()
                .map(|node| Point { x: node.lon, y: node.lat })
                .collect();
            if vertices.is_empty() {
                return None;
            }

            let building = element
                .tags
                .get("building")
                .cloned()
                .unwrap_or_else(|| DEFAULT_BUILDING_TAG.to_string());

            Some(Footprint {
                id: element.id,
                building,
                ring: ring_codec::close(&vertices),
            })
        })
        .collect();

    Ok(footprints)
}

/// Keeps footprints that touch `bbox`, including across the antimeridian.
pub fn within_bbox(footprints: Vec<Footprint>, bbox: &Bbox) -> Vec<Footprint> {
    let pieces = bbox.wrapped();
    footprints
        .into_iter()
        .filter(|footprint| pieces.iter().any(|piece| ring_intersects_bbox(&footprint.ring, piece)))
        .collect()
}

/// GeoJSON FeatureCollection for the map's footprint layer.
pub fn to_feature_collection(footprints: &[Footprint]) -> Value {
    let features: Vec<Value> = footprints
        .iter()
        .map(|footprint| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": footprint.id,
                    "building": footprint.building,
                    "area_m2": footprint.area_m2(),
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [ring_codec::to_raw_list(&footprint.ring)],
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "version": 0.6,
        "elements": [
            {
                "type": "way",
                "id": 101,
                "tags": { "building": "house" },
                "geometry": [
                    { "lat": 0.0, "lon": 0.0 },
                    { "lat": 0.0, "lon": 0.0001 },
                    { "lat": 0.0001, "lon": 0.0001 },
                    { "lat": 0.0001, "lon": 0.0 },
                    { "lat": 0.0, "lon": 0.0 }
                ]
            },
            {
                "type": "way",
                "id": 102,
                "geometry": [
                    { "lat": 1.0, "lon": 1.0 },
                    { "lat": 1.0, "lon": 1.001 },
                    { "lat": 1.001, "lon": 1.001 }
                ]
            },
            {
                "type": "relation",
                "id": 900,
                "tags": { "building": "yes" },
                "members": []
            },
            { "type": "way", "id": 103, "tags": { "building": "shed" } }
        ]
    }"#;

    #[test]
    fn test_building_query() {
        let query = building_query(Point { x: -2.45, y: 53.45 }, 100.0, 25);
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("way[\"building\"](around:100,53.45,-2.45);"));
        assert!(query.contains("relation[\"building\"](around:100,53.45,-2.45);"));
        assert!(query.ends_with("out geom;"));
    }

    #[test]
    fn test_parse_buildings_keeps_ways_with_geometry() {
        let footprints = parse_buildings(RESPONSE).unwrap();
        assert_eq!(footprints.len(), 2);
        assert_eq!(footprints[0].id, 101);
        assert_eq!(footprints[0].building, "house");
        assert_eq!(footprints[1].building, "yes");
    }

    #[test]
    fn test_parse_buildings_closes_without_duplicating() {
        let footprints = parse_buildings(RESPONSE).unwrap();
        // Already closed in OSM: no extra vertex
        assert_eq!(footprints[0].ring.len(), 5);
        // Open way gets closed
        assert_eq!(footprints[1].ring.len(), 4);
        assert_eq!(footprints[1].ring.first(), footprints[1].ring.last());
        assert_eq!(footprints[1].ring[1], Point { x: 1.001, y: 1.0 });
    }

    #[test]
    fn test_parse_buildings_edge_cases() {
        assert!(parse_buildings("{}").unwrap().is_empty());
        assert!(parse_buildings(r#"{"elements": []}"#).unwrap().is_empty());
        assert!(matches!(parse_buildings("<html>"), Err(InputError::Json(_))));
    }

    #[test]
    fn test_area() {
        let footprints = parse_buildings(RESPONSE).unwrap();
        let area = footprints[0].area_m2();
        // ~11.06 m x ~11.13 m at the equator
        assert!(area > 120.0 && area < 126.0, "area = {}", area);
    }

    #[test]
    fn test_within_bbox() {
        let footprints = parse_buildings(RESPONSE).unwrap();
        let bbox = Bbox::around(Point { x: 0.0, y: 0.0 }, 100.0);
        let nearby = within_bbox(footprints, &bbox);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id, 101);
    }

    #[test]
    fn test_within_bbox_across_antimeridian() {
        let json = r#"{"elements": [{
            "type": "way", "id": 55, "tags": { "building": "hut" },
            "geometry": [
                { "lat": 0.0, "lon": -179.9999 },
                { "lat": 0.0, "lon": -179.9998 },
                { "lat": 0.0001, "lon": -179.9998 },
                { "lat": 0.0001, "lon": -179.9999 }
            ]
        }]}"#;
        let footprints = parse_buildings(json).unwrap();
        // Search hit just west of the date line; the hut is ~70 m east of it
        let bbox = Bbox::around(Point { x: 179.9995, y: 0.0 }, 100.0);
        let nearby = within_bbox(footprints, &bbox);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id, 55);
    }

    #[test]
    fn test_feature_collection() {
        let footprints = parse_buildings(RESPONSE).unwrap();
        let collection = to_feature_collection(&footprints);
        assert_eq!(collection["type"], "FeatureCollection");
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["id"], 101);
        assert_eq!(features[0]["properties"]["building"], "house");
        assert_eq!(features[0]["geometry"]["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(features[1]["geometry"]["coordinates"][0][1][0], 1.001);
    }
}
