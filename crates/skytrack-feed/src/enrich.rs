//! Raw record enrichment
//!
//! Turns raw receiver records into [`AircraftRecord`]s: applies the distance
//! limit, fills documented defaults for missing data and merges in the type
//! table classification.

use crate::client::FeedPayload;
use skytrack_classify::TypeLookup;
use skytrack_core::snapshot::Snapshot;
use skytrack_core::types::{AircraftRecord, RawAircraft, RawAltitude, UNKNOWN_AIRCRAFT, UNKNOWN_TAIL};

/// Keeps aircraft within `limit_mi`. A limit of zero disables filtering;
/// otherwise aircraft without a range are dropped too.
pub fn apply_distance_limit(aircraft: Vec<RawAircraft>, limit_mi: f64) -> Vec<RawAircraft> {
    if limit_mi <= 0.0 {
        return aircraft;
    }
    aircraft
        .into_iter()
        .filter(|raw| raw.r_dst.is_some_and(|d| d <= limit_mi))
        .collect()
}

/// Builds the enriched record for one raw aircraft.
pub fn enrich(raw: RawAircraft, types: &TypeLookup) -> AircraftRecord {
    let type_code = raw.type_code.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let info = types.describe(type_code);

    let description = if info.is_enhanced(type_code) {
        info.description.clone()
    } else {
        raw.desc
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AIRCRAFT.to_string())
    };

    let (altitude_ft, on_ground) = match &raw.alt_baro {
        Some(RawAltitude::Feet(ft)) => (ft.round() as i64, false),
        Some(RawAltitude::Label(label)) => (0, label.eq_ignore_ascii_case("ground")),
        None => (0, false),
    };

    AircraftRecord {
        hex: raw.hex.unwrap_or_default(),
        tail: raw.registration.unwrap_or_else(|| UNKNOWN_TAIL.to_string()),
        flight: raw
            .flight
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),

        aircraft_type: raw.type_code,
        description,
        category: info.category,
        weight_class: info.weight_class,
        engine_count: info.engine_count,
        engine_type: info.engine_type,
        operator: raw.operator,
        year: raw.year,

        latitude: raw.lat,
        longitude: raw.lon,
        distance_mi: raw.r_dst.map(round_tenth),
        direction: raw.r_dir,

        altitude_ft,
        on_ground,
        altitude_geom_ft: raw.alt_geom.map(|a| a.round() as i64),
        speed_kts: raw.gs.unwrap_or(0.0).round(),
        heading: raw.track,
        vertical_rate_fpm: raw.baro_rate.map_or(0, |r| r.round() as i64),

        squawk: raw.squawk,
        emergency: raw.emergency.unwrap_or_else(|| "none".to_string()),
        nav_altitude: raw.nav_altitude_mcp.map(|a| a.round() as i64),
        nav_heading: raw.nav_heading,

        icao_category: raw.category,
        messages: raw.messages.unwrap_or(0),
        seen: raw.seen.unwrap_or(0.0),
        rssi: raw.rssi,
        raw_type_desc: info.raw_desc,
        raw_weight_class: info.raw_wtc.unwrap_or_else(|| "L".to_string()),
    }
}

/// Filters, enriches and orders one payload into a snapshot.
pub fn build_snapshot(payload: FeedPayload, types: &TypeLookup, distance_limit_mi: f64) -> Snapshot {
    let aircraft = apply_distance_limit(payload.aircraft, distance_limit_mi)
        .into_iter()
        .map(|raw| enrich(raw, types))
        .collect();

    Snapshot::new(aircraft, payload.now, payload.messages)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytrack_core::types::{AircraftCategory, EngineCount, WeightClass};

    fn raw(hex: &str, r_dst: Option<f64>) -> RawAircraft {
        RawAircraft {
            hex: Some(hex.to_string()),
            r_dst,
            ..Default::default()
        }
    }

    fn lookup() -> TypeLookup {
        TypeLookup::bundled().unwrap()
    }

    #[test]
    fn test_distance_limit() {
        let aircraft = vec![raw("none", None), raw("far", Some(60.0)), raw("near", Some(10.0))];
        let kept = apply_distance_limit(aircraft, 50.0);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].hex.as_deref(), Some("near"));
    }

    #[test]
    fn test_distance_limit_boundary_is_inclusive() {
        let kept = apply_distance_limit(vec![raw("edge", Some(50.0))], 50.0);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_no_distance_limit_keeps_everything() {
        let aircraft = vec![raw("none", None), raw("far", Some(600.0))];
        assert_eq!(apply_distance_limit(aircraft, 0.0).len(), 2);
    }

    #[test]
    fn test_enrich_defaults() {
        let record = enrich(RawAircraft::default(), &lookup());
        assert_eq!(record.hex, "");
        assert_eq!(record.tail, "Unknown");
        assert_eq!(record.flight, None);
        assert_eq!(record.description, UNKNOWN_AIRCRAFT);
        assert_eq!(record.altitude_ft, 0);
        assert!(!record.on_ground);
        assert_eq!(record.speed_kts, 0.0);
        assert_eq!(record.vertical_rate_fpm, 0);
        assert_eq!(record.emergency, "none");
        assert_eq!(record.messages, 0);
        assert_eq!(record.seen, 0.0);
        assert_eq!(record.raw_type_desc, "");
        assert_eq!(record.weight_class, WeightClass::Light);
        assert_eq!(record.raw_weight_class, "L");
        assert_eq!(record.distance_mi, None);
    }

    #[test]
    fn test_enrich_full_record() {
        let raw = RawAircraft {
            hex: Some("a1b2c3".to_string()),
            registration: Some("N12345".to_string()),
            flight: Some("UAL123  ".to_string()),
            type_code: Some("B738".to_string()),
            alt_baro: Some(RawAltitude::Feet(35000.0)),
            gs: Some(452.6),
            baro_rate: Some(-1216.0),
            r_dst: Some(12.345),
            squawk: Some("1200".to_string()),
            ..Default::default()
        };

        let record = enrich(raw, &lookup());
        assert_eq!(record.tail, "N12345");
        assert_eq!(record.flight.as_deref(), Some("UAL123"));
        assert_eq!(record.identifier(), "UAL123");
        assert_eq!(record.description, "Boeing 737-800 (2-engine jet)");
        assert_eq!(record.category, AircraftCategory::Landplane);
        assert_eq!(record.weight_class, WeightClass::Medium);
        assert_eq!(record.engine_count, EngineCount::Count(2));
        assert_eq!(record.altitude_ft, 35000);
        assert_eq!(record.speed_kts, 453.0);
        assert_eq!(record.vertical_rate_fpm, -1216);
        assert_eq!(record.distance_mi, Some(12.3));
        assert_eq!(record.raw_type_desc, "2JP");
        assert_eq!(record.raw_weight_class, "M");
    }

    #[test]
    fn test_enrich_ground_altitude() {
        let raw = RawAircraft {
            alt_baro: Some(RawAltitude::Label("ground".to_string())),
            ..Default::default()
        };
        let record = enrich(raw, &lookup());
        assert_eq!(record.altitude_ft, 0);
        assert!(record.on_ground);
    }

    #[test]
    fn test_description_falls_back_to_feed() {
        let raw = RawAircraft {
            type_code: Some("ZZZZ".to_string()),
            desc: Some("Experimental homebuilt".to_string()),
            ..Default::default()
        };
        assert_eq!(enrich(raw, &lookup()).description, "Experimental homebuilt");

        let raw = RawAircraft {
            type_code: Some("ZZZZ".to_string()),
            ..Default::default()
        };
        assert_eq!(enrich(raw, &lookup()).description, UNKNOWN_AIRCRAFT);
    }

    #[test]
    fn test_description_with_empty_table() {
        let raw = RawAircraft {
            type_code: Some("B738".to_string()),
            desc: Some("BOEING 737-800".to_string()),
            ..Default::default()
        };
        assert_eq!(enrich(raw, &TypeLookup::empty()).description, "BOEING 737-800");
    }

    #[test]
    fn test_build_snapshot_orders_and_filters() {
        let payload = FeedPayload {
            aircraft: vec![
                raw("mid", Some(8.0)),
                raw("none", None),
                raw("far", Some(60.0)),
                raw("near", Some(1.2)),
            ],
            now: Some(1700000000.0),
            messages: 99,
        };

        let snapshot = build_snapshot(payload.clone(), &lookup(), 0.0);
        let order: Vec<&str> = snapshot.aircraft().iter().map(|a| a.hex.as_str()).collect();
        assert_eq!(order, vec!["near", "mid", "far", "none"]);
        assert_eq!(snapshot.total_messages, 99);
        assert_eq!(snapshot.last_update, Some(1700000000.0));

        let limited = build_snapshot(payload, &lookup(), 50.0);
        let order: Vec<&str> = limited.aircraft().iter().map(|a| a.hex.as_str()).collect();
        assert_eq!(order, vec!["near", "mid"]);
    }
}
