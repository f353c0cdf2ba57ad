use std::f64::consts::PI;

use snafu::ensure;

use crate::{BoundingBox, Position, Result, error::error::InvalidPositionSnafu};

pub static DEFAULT_BOX_SIZE_KM: f64 = 10.0;

static METERS_PER_NAUTICAL_MILE: f64 = 1852.0;
static NAUTICAL_MILES_PER_RADIAN: f64 = 180.0 * 60.0 / PI;

// Bearings (radians) that produce each extreme of the box. They are not the
// four compass points, but the resulting box is what AisHub has always been
// queried with.
static MIN_LONGITUDE_BEARING: f64 = 4.5;
static MAX_LONGITUDE_BEARING: f64 = 1.5;
static MAX_LATITUDE_BEARING: f64 = 0.0;
static MIN_LATITUDE_BEARING: f64 = 3.0;

/// Computes the box AisHub is queried with around `observer`.
///
/// `diameter_km` spans the box, a missing or non-positive diameter falls back
/// to [`DEFAULT_BOX_SIZE_KM`]. The box is not clamped, near the poles or the
/// antimeridian `latmin <= latmax` and `lonmin <= lonmax` might not hold.
pub fn compute_bounding_box(observer: &Position, diameter_km: Option<f64>) -> Result<BoundingBox> {
    ensure!(
        observer.latitude.is_finite() && observer.longitude.is_finite(),
        InvalidPositionSnafu {
            latitude: observer.latitude,
            longitude: observer.longitude,
        }
    );

    let diameter_km = diameter_km
        .filter(|d| *d > 0.0)
        .unwrap_or(DEFAULT_BOX_SIZE_KM);
    let radius = diameter_km * 1000.0 / 2.0;

    let min_lon = destination(observer, MIN_LONGITUDE_BEARING, radius);
    let max_lon = destination(observer, MAX_LONGITUDE_BEARING, radius);
    let max_lat = destination(observer, MAX_LATITUDE_BEARING, radius);
    let min_lat = destination(observer, MIN_LATITUDE_BEARING, radius);

    Ok(BoundingBox {
        latmin: min_lat.latitude,
        latmax: max_lat.latitude,
        lonmin: min_lon.longitude,
        lonmax: max_lon.longitude,
    })
}

/// Great-circle destination reached from `start` after `distance` meters on
/// `bearing` radians.
pub fn destination(start: &Position, bearing: f64, distance: f64) -> Position {
    let dist = distance / METERS_PER_NAUTICAL_MILE / NAUTICAL_MILES_PER_RADIAN;
    let heading = 2.0 * PI - bearing;

    let lat1 = start.latitude.to_radians();
    let lon1 = start.longitude.to_radians();

    let lat = (lat1.sin() * dist.cos() + lat1.cos() * dist.sin() * heading.cos()).asin();
    let dlon = (heading.sin() * dist.sin() * lat1.cos()).atan2(dist.cos() - lat1.sin() * lat.sin());
    let lon = floored_mod(lon1 - dlon + PI, 2.0 * PI) - PI;

    Position {
        latitude: lat.to_degrees(),
        longitude: lon.to_degrees(),
    }
}

fn floored_mod(x: f64, y: f64) -> f64 {
    x - y * (x / y).floor()
}
