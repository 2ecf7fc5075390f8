//! End-to-end diversion scenarios over the North Atlantic.

use std::sync::Arc;

use chrono::{Duration, Utc};
use divert_core::{
    avoidance_buffer_nm, project, AircraftState, Airfield, AirfieldWeather, ApproachCategory,
    DiversionPlanner, FailureContext, HazardCategory, HazardSeverity, HazardZone, PerformanceTable,
    PlanError, PlannerConfig, ReferenceData,
};

fn mid_atlantic_a350() -> AircraftState {
    AircraftState {
        lat: 55.0,
        lon: -30.0,
        altitude_ft: 38000.0,
        ground_speed_kt: 480.0,
        heading_deg: 270.0,
        aircraft_type: "A350-1000".to_string(),
        flight_number: Some("TST100".to_string()),
        registration: Some("G-XWBA".to_string()),
        fuel_remaining_kg: 45000.0,
        fuel_flow_kg_hr: 6800.0,
        passenger_count: 310,
        observed_at: Utc::now(),
    }
}

fn airfield(
    icao: &str,
    name: &str,
    lat: f64,
    lon: f64,
    runway_m: f64,
    fire_category: u8,
) -> Airfield {
    Airfield {
        icao: icao.to_string(),
        name: name.to_string(),
        lat,
        lon,
        elevation_ft: 100.0,
        longest_runway_m: runway_m,
        fuel_available: true,
        customs_available: true,
        emergency_services: true,
        approach_category: ApproachCategory::Cat2,
        fire_category,
        maintenance_capability: true,
        accepted_types: None,
        weather: Some(AirfieldWeather {
            visibility_m: 8000.0,
            ceiling_ft: 2000.0,
        }),
    }
}

fn north_atlantic_alternates() -> Vec<Airfield> {
    vec![
        airfield("EINN", "Shannon", 52.702, -8.925, 3199.0, 9),
        airfield("BIKF", "Keflavik", 63.985, -22.605, 3065.0, 8),
        airfield("CYQX", "Gander", 48.937, -54.568, 3109.0, 9),
    ]
}

/// Severe cell sitting on the direct line from the aircraft to Keflavik,
/// the nearest of the three alternates.
fn severe_cell(expires_at: chrono::DateTime<chrono::Utc>) -> HazardZone {
    HazardZone {
        id: "sigmet-convective-1".to_string(),
        polygon: vec![
            [60.5, -26.3],
            [59.5, -24.8],
            [58.5, -26.3],
            [59.5, -27.8],
        ],
        severity: HazardSeverity::Severe,
        category: HazardCategory::Weather,
        expires_at,
        wind_speed_kt: Some(65.0),
        visibility_m: Some(800.0),
        ceiling_ft: Some(400.0),
    }
}

fn planner() -> DiversionPlanner {
    let reference = Arc::new(ReferenceData::new(
        north_atlantic_alternates(),
        PerformanceTable::default(),
    ));
    DiversionPlanner::new(reference, PlannerConfig::default())
}

/// Planar distance from a waypoint to the raw (unbuffered) hazard ring.
fn distance_to_ring_nm(lat: f64, lon: f64, hazard: &HazardZone, ref_lat: f64) -> f64 {
    let p = project(lat, lon, ref_lat);
    let ring: Vec<(f64, f64)> = hazard
        .polygon
        .iter()
        .map(|v| project(v[0], v[1], ref_lat))
        .collect();
    let mut min = f64::INFINITY;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        // point-segment distance
        let (px, py) = (p.0 - a.0, p.1 - a.1);
        let (sx, sy) = (b.0 - a.0, b.1 - a.1);
        let len_sq = sx * sx + sy * sy;
        let t = if len_sq < 1e-12 {
            0.0
        } else {
            ((px * sx + py * sy) / len_sq).clamp(0.0, 1.0)
        };
        let dx = px - t * sx;
        let dy = py - t * sy;
        min = min.min((dx * dx + dy * dy).sqrt());
    }
    min
}

#[test]
fn severe_cell_is_avoided_by_its_buffer() {
    let now = Utc::now();
    let hazard = severe_cell(now + Duration::hours(3));
    let plan = planner()
        .plan(
            &mid_atlantic_a350(),
            &[hazard.clone()],
            &FailureContext::default(),
            now,
        )
        .expect("feasible diversion");

    // All three alternates are reachable; the lowest-score candidate wins,
    // which at these distances is Keflavik.
    assert_eq!(plan.candidates.len(), 3);
    assert_eq!(plan.candidates_failed, 0);
    assert_eq!(plan.route.airfield_icao, "BIKF");
    for pair in plan.candidates.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }

    // Interior waypoints keep at least the severe buffer from the raw
    // polygon. The endpoints are the true aircraft/airfield positions, far
    // from the cell.
    let buffer = avoidance_buffer_nm(HazardSeverity::Severe);
    assert_eq!(buffer, 20.0);
    for wp in &plan.route.waypoints {
        let clearance = distance_to_ring_nm(wp.lat, wp.lon, &hazard, 55.0);
        assert!(
            clearance >= buffer - 1e-6,
            "waypoint ({:.3}, {:.3}) only {:.1} NM from the cell",
            wp.lat,
            wp.lon,
            clearance
        );
    }

    // Suitability triage runs independently and covers every airfield.
    assert_eq!(plan.alternates.len(), 3);
    for pair in plan.alternates.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn expired_hazard_allows_the_direct_route() {
    let now = Utc::now();
    let active = severe_cell(now + Duration::hours(3));
    let expired = severe_cell(now - Duration::hours(1));

    let with_hazard = planner()
        .plan(
            &mid_atlantic_a350(),
            &[active],
            &FailureContext::default(),
            now,
        )
        .expect("feasible with hazard");
    let without = planner()
        .plan(
            &mid_atlantic_a350(),
            &[expired],
            &FailureContext::default(),
            now,
        )
        .expect("feasible without hazard");

    assert_eq!(without.route.airfield_icao, "BIKF");
    assert!(
        without.route.distance_nm <= with_hazard.route.distance_nm + 1e-6,
        "direct {:.1} NM vs avoided {:.1} NM",
        without.route.distance_nm,
        with_hazard.route.distance_nm
    );

    // The unobstructed route is close to the great-circle distance.
    let direct = divert_core::haversine_nm(55.0, -30.0, 63.985, -22.605);
    assert!(without.route.distance_nm < direct * 1.1);
}

#[test]
fn unknown_aircraft_type_completes_with_default_profile() {
    let now = Utc::now();
    let mut state = mid_atlantic_a350();
    state.aircraft_type = "YX-UNKNOWN".to_string();

    let plan = planner()
        .plan(&state, &[], &FailureContext::default(), now)
        .expect("planning must not abort on an unknown type");
    assert!(plan.route.used_default_profile);
    assert!(plan.route.fuel_required_kg > 0.0);
}

#[test]
fn total_hazard_coverage_is_fatal() {
    let now = Utc::now();
    let blanket = HazardZone {
        id: "ash-plume".to_string(),
        polygon: vec![
            [85.0, -100.0],
            [85.0, 30.0],
            [20.0, 30.0],
            [20.0, -100.0],
        ],
        severity: HazardSeverity::Extreme,
        category: HazardCategory::Volcanic,
        expires_at: now + Duration::hours(12),
        wind_speed_kt: None,
        visibility_m: None,
        ceiling_ft: None,
    };

    let err = planner()
        .plan(
            &mid_atlantic_a350(),
            &[blanket],
            &FailureContext::default(),
            now,
        )
        .expect_err("nothing is reachable");
    assert!(matches!(
        err,
        PlanError::NoFeasibleDiversion { candidates: 3 }
    ));
}

#[test]
fn fuel_and_eta_come_from_the_performance_profile() {
    let now = Utc::now();
    let plan = planner()
        .plan(&mid_atlantic_a350(), &[], &FailureContext::default(), now)
        .unwrap();
    let route = &plan.route;

    // Time and fuel are consistent with distance at cruise performance
    // (refinement may only improve on the coarse estimate).
    let coarse_time = route.distance_nm / 488.0;
    assert!(route.flight_time_hr <= coarse_time * 1.01);
    assert!(route.fuel_required_kg <= mid_atlantic_a350().fuel_remaining_kg);
    assert!(route.eta > now);
}
