// Picks the search hit out of a forward-geocoding response.
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::ring_codec::Point;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    center: Option<Vec<f64>>,
    #[serde(default)]
    place_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeHit {
    /// `(lng, lat)` of the best match.
    pub center: Point,
    pub place_name: String,
}

/// First feature's centre and place name, or `None` when nothing matched.
pub fn first_hit(json: &str) -> Result<Option<GeocodeHit>, InputError> {
    let response: GeocodeResponse = serde_json::from_str(json)?;

    let Some(feature) = response.features.into_iter().next() else {
        return Ok(None);
    };

    match feature.center.as_deref() {
        Some([lng, lat, ..]) => Ok(Some(GeocodeHit {
            center: Point { x: *lng, y: *lat },
            place_name: feature.place_name,
        })),
        _ => Err(InputError::MissingField("features[0].center")),
    }
}
