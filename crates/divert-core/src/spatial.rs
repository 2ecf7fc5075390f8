//! Spatial math for diversion planning: great-circle distances and the
//! local planar frame used by the airspace graph.

/// Mean earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance between two points in nautical miles (Haversine).
///
/// Used whenever an absolute distance is reported to the caller (route
/// length, fuel estimates). Graph construction uses the planar frame below.
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_NM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Project geographic coordinates into a local planar frame (NM east, NM
/// north) with an equirectangular approximation.
///
/// All projections within one planning run must share the same
/// `ref_lat` so node coordinates are mutually comparable.
pub fn project(lat: f64, lon: f64, ref_lat: f64) -> (f64, f64) {
    let x = lon.to_radians() * EARTH_RADIUS_NM * ref_lat.to_radians().cos();
    let y = lat.to_radians() * EARTH_RADIUS_NM;
    (x, y)
}

/// Exact inverse of [`project`] for the same reference latitude.
pub fn unproject(x: f64, y: f64, ref_lat: f64) -> (f64, f64) {
    let cos_ref = ref_lat.to_radians().cos();
    let lat = (y / EARTH_RADIUS_NM).to_degrees();
    let lon = (x / (EARTH_RADIUS_NM * cos_ref)).to_degrees();
    (lat, lon)
}

/// Euclidean distance in the planar frame.
pub fn planar_distance_nm(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Minimum distance from a point to a line segment, all in the planar frame.
pub fn distance_to_segment_nm(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (px, py) = (p.0 - a.0, p.1 - a.1);
    let (sx, sy) = (b.0 - a.0, b.1 - a.1);

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq < 1e-12 {
        // Segment is essentially a point
        return (px * px + py * py).sqrt();
    }

    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);
    let dx = px - t * sx;
    let dy = py - t * sy;
    (dx * dx + dy * dy).sqrt()
}
