//! Packed aircraft type descriptor parser
//!
//! The type table describes each ICAO type designator with a three character
//! descriptor:
//!
//! Descriptor Format: [engine count][engine type][category]
//! Example: 2JP
//!   engine count: '2' (two engines)
//!   engine type: 'J' (jet)
//!   category: 'P' (landplane)
//!
//! Position 0 may also hold a letter for airframes without a conventional
//! engine count (H helicopter, L glider, B balloon, ...). Unrecognised or
//! missing positions decode to `Unknown` without affecting the others.

use skytrack_core::types::{AircraftCategory, EngineCount, EngineType};

/// A decoded type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeDescriptor {
    pub engine_count: EngineCount,
    pub engine_type: EngineType,
    pub category: AircraftCategory,
}

impl TypeDescriptor {
    /// Parse a packed descriptor string
    ///
    /// # Examples
    /// ```
    /// use skytrack_classify::descriptor::TypeDescriptor;
    /// use skytrack_core::types::{AircraftCategory, EngineCount, EngineType};
    ///
    /// let desc = TypeDescriptor::parse("2JP");
    /// assert_eq!(desc.engine_count, EngineCount::Count(2));
    /// assert_eq!(desc.engine_type, EngineType::Jet);
    /// assert_eq!(desc.category, AircraftCategory::Landplane);
    /// ```
    #[inline]
    pub fn parse(desc: &str) -> Self {
        let mut chars = desc.chars();

        let engine_count = chars.next().map_or(EngineCount::Unknown, EngineCount::from_char);
        let engine_type = chars.next().map_or(EngineType::Unknown, EngineType::from_char);
        let category = chars.next().map_or(AircraftCategory::Unknown, AircraftCategory::from_char);

        TypeDescriptor {
            engine_count,
            engine_type,
            category,
        }
    }

    /// Engine summary such as "2-engine jet" or "Single-engine piston".
    ///
    /// Only produced for fixed-wing types with a numeric engine count and a
    /// known engine type.
    pub fn engine_summary(&self) -> Option<String> {
        if self.category == AircraftCategory::Helicopter || self.engine_type == EngineType::Unknown {
            return None;
        }

        let count = self.engine_count.count()?;
        let engine_type = self.engine_type.to_string().to_lowercase();
        if count > 1 {
            Some(format!("{}-engine {}", count, engine_type))
        } else {
            Some(format!("Single-engine {}", engine_type))
        }
    }
}
