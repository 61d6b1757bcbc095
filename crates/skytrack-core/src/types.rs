//! Core types for the SkyTrack aircraft tracker.
//!
//! This module defines the aircraft data model: the raw record as the
//! receiver reports it, the enriched [`AircraftRecord`] published in each
//! snapshot, and the small classification enums decoded from the aircraft
//! type table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Description used when nothing is known about an aircraft's type.
pub const UNKNOWN_AIRCRAFT: &str = "Unknown aircraft";

/// Tail number used when the feed has no registration.
pub const UNKNOWN_TAIL: &str = "Unknown";

/// Engine count or special configuration, from position 0 of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineCount {
    /// A numbered engine count (0-9)
    Count(u8),
    Amphibian,
    Balloon,
    Gyrocopter,
    Helicopter,
    Glider,
    Rotorcraft,
    Seaplane,
    #[default]
    Unknown,
}

impl EngineCount {
    /// Parse from a single descriptor character
    #[inline]
    pub const fn from_char(c: char) -> Self {
        match c {
            '0'..='9' => EngineCount::Count(c as u8 - b'0'),
            'A' => EngineCount::Amphibian,
            'B' => EngineCount::Balloon,
            'G' => EngineCount::Gyrocopter,
            'H' => EngineCount::Helicopter,
            'L' => EngineCount::Glider,
            'R' => EngineCount::Rotorcraft,
            'S' => EngineCount::Seaplane,
            _ => EngineCount::Unknown,
        }
    }

    /// Returns the numeric engine count, if this is one
    #[inline]
    pub const fn count(&self) -> Option<u8> {
        match self {
            EngineCount::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for EngineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCount::Count(n) => write!(f, "{}", n),
            EngineCount::Amphibian => write!(f, "Amphibian"),
            EngineCount::Balloon => write!(f, "Balloon"),
            EngineCount::Gyrocopter => write!(f, "Gyrocopter"),
            EngineCount::Helicopter => write!(f, "Helicopter"),
            EngineCount::Glider => write!(f, "Glider"),
            EngineCount::Rotorcraft => write!(f, "Rotorcraft"),
            EngineCount::Seaplane => write!(f, "Seaplane"),
            EngineCount::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for EngineCount {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<u8>() {
            return Ok(EngineCount::Count(n));
        }
        Ok(match s {
            "Amphibian" => EngineCount::Amphibian,
            "Balloon" => EngineCount::Balloon,
            "Gyrocopter" => EngineCount::Gyrocopter,
            "Helicopter" => EngineCount::Helicopter,
            "Glider" => EngineCount::Glider,
            "Rotorcraft" => EngineCount::Rotorcraft,
            "Seaplane" => EngineCount::Seaplane,
            _ => EngineCount::Unknown,
        })
    }
}

// Serialized as its display text so "2" and "Helicopter" share one field.
impl Serialize for EngineCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EngineCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Engine type, from position 1 of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EngineType {
    Piston,
    Turboprop,
    Jet,
    Electric,
    Rocket,
    #[default]
    Unknown,
}

impl EngineType {
    /// Parse from a single descriptor character
    #[inline]
    pub const fn from_char(c: char) -> Self {
        match c {
            'P' => EngineType::Piston,
            'T' => EngineType::Turboprop,
            'J' => EngineType::Jet,
            'E' => EngineType::Electric,
            'R' => EngineType::Rocket,
            _ => EngineType::Unknown,
        }
    }
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineType::Piston => write!(f, "Piston"),
            EngineType::Turboprop => write!(f, "Turboprop"),
            EngineType::Jet => write!(f, "Jet"),
            EngineType::Electric => write!(f, "Electric"),
            EngineType::Rocket => write!(f, "Rocket"),
            EngineType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Airframe category, from position 2 of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AircraftCategory {
    Landplane,
    Seaplane,
    Amphibian,
    Helicopter,
    Gyrocopter,
    Tiltrotor,
    #[default]
    Unknown,
}

impl AircraftCategory {
    /// Parse from a single descriptor character
    #[inline]
    pub const fn from_char(c: char) -> Self {
        match c {
            'P' => AircraftCategory::Landplane,
            'S' => AircraftCategory::Seaplane,
            'A' => AircraftCategory::Amphibian,
            'H' => AircraftCategory::Helicopter,
            'G' => AircraftCategory::Gyrocopter,
            'T' => AircraftCategory::Tiltrotor,
            _ => AircraftCategory::Unknown,
        }
    }
}

impl fmt::Display for AircraftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AircraftCategory::Landplane => write!(f, "Landplane"),
            AircraftCategory::Seaplane => write!(f, "Seaplane"),
            AircraftCategory::Amphibian => write!(f, "Amphibian"),
            AircraftCategory::Helicopter => write!(f, "Helicopter"),
            AircraftCategory::Gyrocopter => write!(f, "Gyrocopter"),
            AircraftCategory::Tiltrotor => write!(f, "Tiltrotor"),
            AircraftCategory::Unknown => write!(f, "Unknown"),
        }
    }
}

/// ICAO wake turbulence category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightClass {
    Light,
    Medium,
    Heavy,
    #[default]
    Unknown,
}

impl WeightClass {
    /// Parse from the type table's `wtc` code
    pub fn from_code(code: &str) -> Self {
        match code {
            "L" => WeightClass::Light,
            "M" => WeightClass::Medium,
            "H" => WeightClass::Heavy,
            _ => WeightClass::Unknown,
        }
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightClass::Light => write!(f, "Light"),
            WeightClass::Medium => write!(f, "Medium"),
            WeightClass::Heavy => write!(f, "Heavy"),
            WeightClass::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Barometric altitude as the receiver reports it: feet, or the literal "ground".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAltitude {
    Feet(f64),
    Label(String),
}

/// One aircraft exactly as it appears in the receiver's `aircraft.json`.
///
/// Every field is optional; the receiver omits whatever it has not decoded yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAircraft {
    #[serde(default)]
    pub hex: Option<String>,
    /// Registration
    #[serde(default, rename = "r")]
    pub registration: Option<String>,
    #[serde(default)]
    pub flight: Option<String>,
    /// ICAO type designator
    #[serde(default, rename = "t")]
    pub type_code: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default, rename = "ownOp")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,

    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Range from the receiver in miles
    #[serde(default)]
    pub r_dst: Option<f64>,
    /// Bearing from the receiver
    #[serde(default)]
    pub r_dir: Option<f64>,

    #[serde(default)]
    pub alt_baro: Option<RawAltitude>,
    #[serde(default)]
    pub alt_geom: Option<f64>,
    #[serde(default)]
    pub gs: Option<f64>,
    #[serde(default)]
    pub track: Option<f64>,
    #[serde(default)]
    pub baro_rate: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub squawk: Option<String>,
    #[serde(default)]
    pub emergency: Option<String>,
    #[serde(default)]
    pub nav_altitude_mcp: Option<f64>,
    #[serde(default)]
    pub nav_heading: Option<f64>,

    /// ICAO emitter category (A1, A3, ...)
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub messages: Option<u64>,
    #[serde(default)]
    pub seen: Option<f64>,
    #[serde(default)]
    pub rssi: Option<f64>,
}

/// Accepts a string or a number for fields the receiver is inconsistent about.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// An enriched aircraft record, immutable for the lifetime of one snapshot.
///
/// Every field is always present. Data the receiver did not report is
/// replaced by a documented default or an explicit `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftRecord {
    // identity
    pub hex: String,
    pub tail: String,
    pub flight: Option<String>,

    // classification
    pub aircraft_type: Option<String>,
    pub description: String,
    pub category: AircraftCategory,
    pub weight_class: WeightClass,
    pub engine_count: EngineCount,
    pub engine_type: EngineType,
    pub operator: Option<String>,
    pub year: Option<String>,

    // position
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub distance_mi: Option<f64>,
    pub direction: Option<f64>,

    // flight data
    pub altitude_ft: i64,
    pub on_ground: bool,
    pub altitude_geom_ft: Option<i64>,
    pub speed_kts: f64,
    pub heading: Option<f64>,
    pub vertical_rate_fpm: i64,

    // navigation
    pub squawk: Option<String>,
    pub emergency: String,
    pub nav_altitude: Option<i64>,
    pub nav_heading: Option<f64>,

    // technical
    pub icao_category: Option<String>,
    pub messages: u64,
    pub seen: f64,
    pub rssi: Option<f64>,
    pub raw_type_desc: String,
    pub raw_weight_class: String,
}

impl AircraftRecord {
    /// Name to show people: callsign if known, otherwise the tail number.
    pub fn identifier(&self) -> &str {
        self.flight.as_deref().unwrap_or(&self.tail)
    }

    /// Case-insensitive hex comparison
    pub fn has_hex(&self, hex: &str) -> bool {
        !self.hex.is_empty() && self.hex.eq_ignore_ascii_case(hex.trim())
    }

    /// Returns the emergency squawk kind, if the aircraft is squawking one.
    pub fn emergency_squawk(&self) -> Option<EmergencySquawk> {
        self.squawk.as_deref().and_then(EmergencySquawk::from_code)
    }
}

/// The three transponder codes reserved for emergencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencySquawk {
    /// 7500
    Hijack,
    /// 7600
    RadioFailure,
    /// 7700
    General,
}

impl EmergencySquawk {
    /// Matches exact codes only; "7700 " or "770" do not qualify.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "7500" => Some(EmergencySquawk::Hijack),
            "7600" => Some(EmergencySquawk::RadioFailure),
            "7700" => Some(EmergencySquawk::General),
            _ => None,
        }
    }

    /// The transponder code
    pub const fn code(&self) -> &'static str {
        match self {
            EmergencySquawk::Hijack => "7500",
            EmergencySquawk::RadioFailure => "7600",
            EmergencySquawk::General => "7700",
        }
    }
}

impl fmt::Display for EmergencySquawk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmergencySquawk::Hijack => write!(f, "HIJACK"),
            EmergencySquawk::RadioFailure => write!(f, "RADIO FAILURE"),
            EmergencySquawk::General => write!(f, "GENERAL EMERGENCY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_count_from_char() {
        assert_eq!(EngineCount::from_char('2'), EngineCount::Count(2));
        assert_eq!(EngineCount::from_char('H'), EngineCount::Helicopter);
        assert_eq!(EngineCount::from_char('L'), EngineCount::Glider);
        assert_eq!(EngineCount::from_char('C'), EngineCount::Unknown);
        assert_eq!(EngineCount::from_char('x'), EngineCount::Unknown);
    }

    #[test]
    fn test_engine_count_serialization() {
        let json = serde_json::to_string(&EngineCount::Count(4)).unwrap();
        assert_eq!(json, "\"4\"");

        let json = serde_json::to_string(&EngineCount::Balloon).unwrap();
        assert_eq!(json, "\"Balloon\"");

        let parsed: EngineCount = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(parsed, EngineCount::Count(2));

        let parsed: EngineCount = serde_json::from_str("\"garbage\"").unwrap();
        assert_eq!(parsed, EngineCount::Unknown);
    }

    #[test]
    fn test_descriptor_enums() {
        assert_eq!(EngineType::from_char('J'), EngineType::Jet);
        assert_eq!(EngineType::from_char('Q'), EngineType::Unknown);
        assert_eq!(AircraftCategory::from_char('P'), AircraftCategory::Landplane);
        assert_eq!(AircraftCategory::from_char('T'), AircraftCategory::Tiltrotor);
        assert_eq!(AircraftCategory::from_char('Z'), AircraftCategory::Unknown);
        assert_eq!(WeightClass::from_code("M"), WeightClass::Medium);
        assert_eq!(WeightClass::from_code("J"), WeightClass::Unknown);
    }

    #[test]
    fn test_emergency_squawk() {
        assert_eq!(EmergencySquawk::from_code("7700"), Some(EmergencySquawk::General));
        assert_eq!(EmergencySquawk::from_code("7600"), Some(EmergencySquawk::RadioFailure));
        assert_eq!(EmergencySquawk::from_code("7500"), Some(EmergencySquawk::Hijack));
        assert_eq!(EmergencySquawk::from_code("7701"), None);
        assert_eq!(EmergencySquawk::from_code("1200"), None);
        assert_eq!(EmergencySquawk::General.to_string(), "GENERAL EMERGENCY");
    }

    #[test]
    fn test_raw_aircraft_parsing() {
        let json = r#"{
            "hex": "a1b2c3",
            "r": "N12345",
            "flight": "UAL123  ",
            "t": "B738",
            "alt_baro": 35000,
            "gs": 452.3,
            "squawk": "1200",
            "r_dst": 12.34,
            "year": 2004
        }"#;

        let raw: RawAircraft = serde_json::from_str(json).unwrap();
        assert_eq!(raw.hex.as_deref(), Some("a1b2c3"));
        assert_eq!(raw.registration.as_deref(), Some("N12345"));
        assert_eq!(raw.type_code.as_deref(), Some("B738"));
        assert_eq!(raw.alt_baro, Some(RawAltitude::Feet(35000.0)));
        assert_eq!(raw.year.as_deref(), Some("2004"));
        assert_eq!(raw.lat, None);
    }

    #[test]
    fn test_raw_aircraft_ground_altitude() {
        let raw: RawAircraft = serde_json::from_str(r#"{"hex": "abc123", "alt_baro": "ground"}"#).unwrap();
        assert_eq!(raw.alt_baro, Some(RawAltitude::Label("ground".to_string())));
    }

    #[test]
    fn test_raw_aircraft_empty_object() {
        let raw: RawAircraft = serde_json::from_str("{}").unwrap();
        assert_eq!(raw, RawAircraft::default());
    }
}
