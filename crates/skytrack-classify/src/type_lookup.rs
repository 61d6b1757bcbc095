//! Aircraft type table lookup.
//!
//! Maps ICAO type designators (`B738`, `C172`, ...) to a friendly description
//! and the classification decoded from the table's packed descriptor. The
//! table is loaded once and never changes afterwards.

use crate::descriptor::TypeDescriptor;
use serde::{Deserialize, Serialize};
use skytrack_core::config::TypeDbConfig;
use skytrack_core::error::{ConfigError, ParseError, Result};
use skytrack_core::types::{AircraftCategory, EngineCount, EngineType, WeightClass, UNKNOWN_AIRCRAFT};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

static BUNDLED_TYPES: &str = include_str!("../data/aircraft_types.json");

/// Friendly names for well-known type designators.
const FRIENDLY_NAMES: &[(&str, &str)] = &[
    ("A320", "Airbus A320"),
    ("A321", "Airbus A321"),
    ("A330", "Airbus A330"),
    ("A340", "Airbus A340"),
    ("A350", "Airbus A350"),
    ("A380", "Airbus A380"),
    ("B737", "Boeing 737"),
    ("B738", "Boeing 737-800"),
    ("B739", "Boeing 737-900"),
    ("B744", "Boeing 747-400"),
    ("B748", "Boeing 747-8"),
    ("B752", "Boeing 757-200"),
    ("B763", "Boeing 767-300"),
    ("B772", "Boeing 777-200"),
    ("B773", "Boeing 777-300"),
    ("B77W", "Boeing 777-300ER"),
    ("B788", "Boeing 787-8"),
    ("B789", "Boeing 787-9"),
    ("C130", "Lockheed C-130 Hercules"),
    ("C135", "Boeing C-135"),
    ("C17", "Boeing C-17 Globemaster III"),
    ("KC135", "Boeing KC-135 Stratotanker"),
    ("KC10", "McDonnell Douglas KC-10 Extender"),
    ("KC46", "Boeing KC-46 Pegasus"),
    ("F16", "General Dynamics F-16 Fighting Falcon"),
    ("F15", "McDonnell Douglas F-15 Eagle"),
    ("F18", "McDonnell Douglas F/A-18 Hornet"),
    ("F22", "Lockheed Martin F-22 Raptor"),
    ("F35", "Lockheed Martin F-35 Lightning II"),
    ("C172", "Cessna 172 Skyhawk"),
    ("C182", "Cessna 182 Skylane"),
    ("C206", "Cessna 206 Stationair"),
    ("PA28", "Piper PA-28 Cherokee"),
    ("P28A", "Piper PA-28 Cherokee"),
    ("BE20", "Beechcraft King Air"),
    ("BE35", "Beechcraft Bonanza"),
    ("UH60", "Sikorsky UH-60 Black Hawk"),
    ("CH47", "Boeing CH-47 Chinook"),
    ("AH64", "Boeing AH-64 Apache"),
];

/// One row of the type table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEntry {
    /// Packed descriptor, e.g. "2JP"
    #[serde(default)]
    pub desc: String,
    /// Wake turbulence category code (L, M, H)
    #[serde(default)]
    pub wtc: Option<String>,
}

/// Classification of one type designator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub description: String,
    pub category: AircraftCategory,
    pub weight_class: WeightClass,
    pub engine_count: EngineCount,
    pub engine_type: EngineType,
    /// Descriptor as stored in the table ("" when unknown)
    pub raw_desc: String,
    /// Weight code as stored in the table
    pub raw_wtc: Option<String>,
}

impl TypeInfo {
    /// The "nothing known" result.
    pub fn unknown() -> Self {
        Self::bare(UNKNOWN_AIRCRAFT.to_string())
    }

    fn bare(description: String) -> Self {
        Self {
            description,
            category: AircraftCategory::Unknown,
            weight_class: WeightClass::Light,
            engine_count: EngineCount::Unknown,
            engine_type: EngineType::Unknown,
            raw_desc: String::new(),
            raw_wtc: None,
        }
    }

    /// True when the description says more than the bare type code.
    pub fn is_enhanced(&self, type_code: Option<&str>) -> bool {
        if self.description == UNKNOWN_AIRCRAFT {
            return false;
        }
        match type_code {
            Some(code) => !self.description.eq_ignore_ascii_case(code.trim()),
            None => true,
        }
    }
}

/// Immutable aircraft type table.
#[derive(Debug, Clone, Default)]
pub struct TypeLookup {
    types: HashMap<String, TypeEntry>,
}

impl TypeLookup {
    /// An empty table; every lookup yields the unknown sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_TYPES)
    }

    /// Parses a table from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, TypeEntry> = serde_json::from_str(json).map_err(ParseError::from)?;
        let types = parsed
            .into_iter()
            .map(|(code, entry)| (code.trim().to_uppercase(), entry))
            .collect();
        Ok(Self { types })
    }

    /// Loads a table from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&contents)
    }

    /// Loads the configured table.
    ///
    /// A table that fails to load leaves the lookup empty, so every aircraft
    /// falls back to the description the receiver reports.
    pub fn load(config: &TypeDbConfig) -> Self {
        let result = match &config.path {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        };

        match result {
            Ok(lookup) => {
                info!(types = lookup.len(), "Loaded aircraft type table");
                lookup
            }
            Err(e) => {
                match &config.path {
                    Some(path) => warn!(path = %path.display(), error = %e, "Failed to load aircraft type table"),
                    None => error!(error = %e, "Bundled aircraft type table is invalid"),
                }
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Raw table row for a designator.
    pub fn entry(&self, type_code: &str) -> Option<&TypeEntry> {
        self.types.get(&type_code.trim().to_uppercase())
    }

    /// Describes a type designator.
    pub fn describe(&self, type_code: Option<&str>) -> TypeInfo {
        let code = match type_code.map(str::trim) {
            Some(code) if !code.is_empty() && !self.types.is_empty() => code.to_uppercase(),
            _ => return TypeInfo::unknown(),
        };

        let Some(entry) = self.types.get(&code) else {
            return TypeInfo::bare(code);
        };

        let descriptor = TypeDescriptor::parse(&entry.desc);
        let name = friendly_name(&code).unwrap_or(&code);
        let description = match descriptor.engine_summary() {
            Some(engines) => format!("{} ({})", name, engines),
            None => name.to_string(),
        };

        TypeInfo {
            description,
            category: descriptor.category,
            weight_class: entry.wtc.as_deref().map_or(WeightClass::Light, WeightClass::from_code),
            engine_count: descriptor.engine_count,
            engine_type: descriptor.engine_type,
            raw_desc: entry.desc.clone(),
            raw_wtc: entry.wtc.clone(),
        }
    }
}

fn friendly_name(code: &str) -> Option<&'static str> {
    FRIENDLY_NAMES
        .iter()
        .find(|(designator, _)| *designator == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use skytrack_core::error::TrackerError;
    use std::io::Write;

    fn bundled() -> TypeLookup {
        TypeLookup::bundled().unwrap()
    }

    #[test]
    fn test_bundled_table_loads() {
        let lookup = bundled();
        assert!(lookup.len() > 100);
        assert!(lookup.entry("b738").is_some());
    }

    #[test]
    fn test_describe_b738() {
        let info = bundled().describe(Some("B738"));
        assert_eq!(info.category, AircraftCategory::Landplane);
        assert_eq!(info.weight_class, WeightClass::Medium);
        assert_eq!(info.engine_count, EngineCount::Count(2));
        assert_eq!(info.engine_type, EngineType::Jet);
        assert_eq!(info.description, "Boeing 737-800 (2-engine jet)");
        assert_eq!(info.raw_desc, "2JP");
        assert_eq!(info.raw_wtc.as_deref(), Some("M"));
    }

    #[test]
    fn test_describe_is_case_insensitive() {
        let lookup = bundled();
        assert_eq!(lookup.describe(Some("b738")), lookup.describe(Some("B738")));
    }

    #[test]
    fn test_describe_single_engine() {
        let info = bundled().describe(Some("C172"));
        assert_eq!(info.description, "Cessna 172 Skyhawk (Single-engine piston)");
        assert_eq!(info.weight_class, WeightClass::Light);
    }

    #[test]
    fn test_describe_helicopter_has_no_engine_summary() {
        let info = bundled().describe(Some("UH60"));
        assert_eq!(info.description, "Sikorsky UH-60 Black Hawk");
        assert_eq!(info.category, AircraftCategory::Helicopter);
    }

    #[test]
    fn test_describe_known_code_without_friendly_name() {
        let info = bundled().describe(Some("SR22"));
        assert_eq!(info.description, "SR22 (Single-engine piston)");
    }

    #[test]
    fn test_describe_missing_code() {
        let info = bundled().describe(Some("ZZZZ"));
        assert_eq!(info.description, "ZZZZ");
        assert_eq!(info.category, AircraftCategory::Unknown);
        assert_eq!(info.weight_class, WeightClass::Light);
        assert!(!info.is_enhanced(Some("ZZZZ")));
    }

    #[test]
    fn test_describe_absent_code() {
        assert_eq!(bundled().describe(None), TypeInfo::unknown());
        assert_eq!(bundled().describe(Some("  ")), TypeInfo::unknown());
    }

    #[test]
    fn test_empty_table_gives_sentinel() {
        let info = TypeLookup::empty().describe(Some("B738"));
        assert_eq!(info.description, UNKNOWN_AIRCRAFT);
        assert!(!info.is_enhanced(Some("B738")));
    }

    #[test]
    fn test_entry_without_descriptor() {
        let lookup = TypeLookup::from_json(r#"{"GLID": {"wtc": "L"}}"#).unwrap();
        let info = lookup.describe(Some("GLID"));
        assert_eq!(info.description, "GLID");
        assert_eq!(info.weight_class, WeightClass::Light);
        assert_eq!(info.engine_count, EngineCount::Unknown);
    }

    #[test]
    fn test_missing_wtc_defaults_to_light() {
        let lookup = TypeLookup::from_json(r#"{"GLID": {"desc": "1PP"}}"#).unwrap();
        let info = lookup.describe(Some("GLID"));
        assert_eq!(info.weight_class, WeightClass::Light);
        assert_eq!(info.raw_wtc, None);
        assert_eq!(TypeInfo::unknown().weight_class, WeightClass::Light);
    }

    #[test]
    fn test_unknown_weight_code() {
        let lookup = TypeLookup::from_json(r#"{"TEST": {"desc": "2JP", "wtc": "J"}}"#).unwrap();
        assert_eq!(lookup.describe(Some("TEST")).weight_class, WeightClass::Unknown);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"c17": {{"desc": "4JP", "wtc": "H"}}}}"#).unwrap();

        let lookup = TypeLookup::from_file(file.path()).unwrap();
        assert_eq!(lookup.len(), 1);
        let info = lookup.describe(Some("C17"));
        assert_eq!(info.description, "Boeing C-17 Globemaster III (4-engine jet)");
        assert_eq!(info.weight_class, WeightClass::Heavy);
    }

    #[test]
    fn test_load_falls_back_to_empty() {
        let config = TypeDbConfig {
            path: Some("/nonexistent/types.json".into()),
        };
        assert!(TypeLookup::load(&config).is_empty());
        assert!(!TypeLookup::load(&TypeDbConfig::default()).is_empty());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = TypeLookup::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, TrackerError::Parse(ParseError::JsonError { line: 1, .. })));
    }
}
