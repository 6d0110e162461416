use crate::domain::model::{Coordinate, Place};

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // rounding can push h a hair past 1.0 for antipodal points
    let c = 2.0 * h.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Orders `places` nearest first relative to `origin`. Equal distances keep input order.
pub fn sort_by_distance(places: &[Place], origin: Coordinate) -> Vec<Place> {
    let mut keyed: Vec<(f64, &Place)> = places
        .iter()
        .map(|place| (distance_km(&origin, &place.coordinate), place))
        .collect();

    // sort_by is stable; total_cmp keeps NaN from breaking the ordering
    keyed.sort_by(|(da, _), (db, _)| da.total_cmp(db));

    keyed.into_iter().map(|(_, place)| place.clone()).collect()
}
