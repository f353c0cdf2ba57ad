use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Rectangle used to limit which vessels AisHub returns, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundingBox {
    pub latmin: f64,
    pub latmax: f64,
    pub lonmin: f64,
    pub lonmax: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Position {
        Position {
            latitude,
            longitude,
        }
    }
}
