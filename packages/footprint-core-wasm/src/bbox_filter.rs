// Bounding boxes around a search centre and footprint-vs-box tests.
use serde::{Deserialize, Serialize};

use crate::ring_codec::Point;

// WGS84 semi-major axis in metres
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Bbox {
    /// Box covering `radius_m` metres in every direction from `center`.
    ///
    /// Uses a spherical earth; the longitude span widens with latitude. A
    /// non-positive or non-finite radius collapses to the centre point.
    pub fn around(center: Point, radius_m: f64) -> Self {
        let radius_m = if radius_m.is_finite() && radius_m > 0.0 { radius_m } else { 0.0 };
        let metres_per_degree = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

        let dlat = radius_m / metres_per_degree;
        // cos() stays positive for |lat| < 90; clamp so the poles don't divide by zero
        let cos_lat = center.y.to_radians().cos().max(1e-12);
        let dlng = (dlat / cos_lat).min(180.0);

        Bbox {
            min_lng: center.x - dlng,
            min_lat: (center.y - dlat).max(-90.0),
            max_lng: center.x + dlng,
            max_lat: (center.y + dlat).min(90.0),
        }
    }

    /// `[minLng, minLat, maxLng, maxLat]`, the order map widgets expect.
    pub fn as_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }

    /// The box split at the antimeridian into pieces inside `[-180, 180]`.
    ///
    /// `around` can return `min_lng < -180` or `max_lng > 180` near the
    /// date line; footprint coordinates never leave `[-180, 180]`, so tests
    /// against them must use the wrapped pieces.
    pub fn wrapped(&self) -> Vec<Bbox> {
        if self.max_lng - self.min_lng >= 360.0 {
            return vec![Bbox { min_lng: -180.0, max_lng: 180.0, ..*self }];
        }
        if self.min_lng < -180.0 {
            vec![
                Bbox { min_lng: self.min_lng + 360.0, max_lng: 180.0, ..*self },
                Bbox { min_lng: -180.0, ..*self },
            ]
        } else if self.max_lng > 180.0 {
            vec![
                Bbox { max_lng: 180.0, ..*self },
                Bbox { min_lng: -180.0, max_lng: self.max_lng - 360.0, ..*self },
            ]
        } else {
            vec![*self]
        }
    }
}

// Function to check if a point is inside a bounding box
pub fn point_in_bbox(point: &Point, bbox: &Bbox) -> bool {
    point.x >= bbox.min_lng
        && point.x <= bbox.max_lng
        && point.y >= bbox.min_lat
        && point.y <= bbox.max_lat
}

// Function to check if a footprint ring intersects with a bounding box
pub fn ring_intersects_bbox(ring: &[Point], bbox: &Bbox) -> bool {
    if ring.is_empty() {
        return false;
    }

    // 1. Quick rejection when the ring's own bounds don't overlap
    let mut poly_min = Point { x: f64::INFINITY, y: f64::INFINITY };
    let mut poly_max = Point { x: f64::NEG_INFINITY, y: f64::NEG_INFINITY };
    for p in ring {
        poly_min.x = poly_min.x.min(p.x);
        poly_min.y = poly_min.y.min(p.y);
        poly_max.x = poly_max.x.max(p.x);
        poly_max.y = poly_max.y.max(p.y);
    }
    if poly_max.x < bbox.min_lng
        || poly_min.x > bbox.max_lng
        || poly_max.y < bbox.min_lat
        || poly_min.y > bbox.max_lat
    {
        return false;
    }

    // 2. Any vertex inside the box
    if ring.iter().any(|p| point_in_bbox(p, bbox)) {
        return true;
    }

    let corners = [
        Point { x: bbox.min_lng, y: bbox.min_lat },
        Point { x: bbox.max_lng, y: bbox.min_lat },
        Point { x: bbox.max_lng, y: bbox.max_lat },
        Point { x: bbox.min_lng, y: bbox.max_lat },
    ];

    // 3. Any ring edge crossing any box edge
    let n = ring.len();
    for i in 0..n {
        let p1 = &ring[i];
        let p2 = &ring[(i + 1) % n];
        for j in 0..corners.len() {
            let q1 = &corners[j];
            let q2 = &corners[(j + 1) % corners.len()];
            if line_segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    // 4. Box entirely inside the ring
    corners.iter().any(|corner| is_point_in_ring(corner, ring))
}

// Helper function to check if two line segments intersect
fn line_segments_intersect(p1: &Point, p2: &Point, p3: &Point, p4: &Point) -> bool {
    let d1 = direction(p3, p4, p1);
    let d2 = direction(p3, p4, p2);
    let d3 = direction(p1, p2, p3);
    let d4 = direction(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Colinear touching
    (d1 == 0.0 && is_point_on_segment(p3, p4, p1))
        || (d2 == 0.0 && is_point_on_segment(p3, p4, p2))
        || (d3 == 0.0 && is_point_on_segment(p1, p2, p3))
        || (d4 == 0.0 && is_point_on_segment(p1, p2, p4))
}

fn direction(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    (p3.x - p1.x) * (p2.y - p1.y) - (p2.x - p1.x) * (p3.y - p1.y)
}

fn is_point_on_segment(p1: &Point, p2: &Point, p: &Point) -> bool {
    p.x >= p1.x.min(p2.x) && p.x <= p1.x.max(p2.x) && p.y >= p1.y.min(p2.y) && p.y <= p1.y.max(p2.y)
}

// Ray casting; the ring need not be closed
fn is_point_in_ring(point: &Point, ring: &[Point]) -> bool {
    let mut inside = false;
    let n = ring.len();

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let crosses = ((a.y > point.y) != (b.y > point.y))
            && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x);
        if crosses {
            inside = !inside;
        }
    }

    inside
}
