//! Notification payloads
//!
//! Pure construction of the notifications the engine sends: title, body,
//! icon, colour, deep link and priority. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use serde_json::json;
use skytrack_classify::DetectionReason;
use skytrack_core::config::UnitSystem;
use skytrack_core::types::{AircraftCategory, AircraftRecord, EmergencySquawk};
use std::fmt;

/// Vertical rate above which an aircraft counts as climbing or descending.
const TREND_THRESHOLD_FPM: i64 = 500;

/// Manufacturers whose aircraft get the light aircraft emoji.
const LIGHT_AIRCRAFT_MAKERS: &[&str] = &["CESSNA", "PIPER", "BEECH", "CIRRUS"];

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Military,
    Proximity,
    Emergency,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Military => "military",
            NotificationKind::Proximity => "proximity",
            NotificationKind::Emergency => "emergency",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
}

/// A notification ready to be delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    /// Hex code of the aircraft the notification is about
    pub hex: String,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub color: String,
    /// Deep link opened from the notification
    pub url: String,
    pub priority: Priority,
}

impl Notification {
    /// The JSON body delivered to the notification endpoint.
    pub fn payload(&self) -> serde_json::Value {
        let mut data = json!({
            "notification_icon": self.icon,
            "color": self.color,
            "clickAction": self.url,
            "actions": [
                {
                    "action": "URI",
                    "title": "🗺️ View on ADSB Tracker",
                    "uri": self.url,
                }
            ],
        });

        if self.priority == Priority::High {
            data["ttl"] = json!(0);
            data["priority"] = json!("high");
        }

        json!({
            "title": self.title,
            "message": self.message,
            "data": data,
        })
    }
}

/// Builds notification text for one deployment's units and deep link.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    units: UnitSystem,
    external_url: String,
}

impl MessageFormatter {
    pub fn new(units: UnitSystem, external_url: impl Into<String>) -> Self {
        Self {
            units,
            external_url: external_url.into(),
        }
    }

    pub fn external_url(&self) -> &str {
        &self.external_url
    }

    /// A military aircraft appeared.
    pub fn military(&self, aircraft: &AircraftRecord, reasons: &[DetectionReason]) -> Notification {
        let mut message = format!(
            "🪖 {} at {}ft {} {} away\nType: {}\nSpeed: {:.0}kts",
            aircraft.identifier(),
            format_thousands(aircraft.altitude_ft),
            trend_arrow(aircraft.vertical_rate_fpm),
            self.units.format_distance(aircraft.distance_mi),
            aircraft.description,
            aircraft.speed_kts,
        );

        if let Some(flight) = &aircraft.flight {
            message.push_str(&format!("\nCallsign: {}", flight));
        }

        if !reasons.is_empty() {
            let reasons: Vec<String> = reasons.iter().map(ToString::to_string).collect();
            message.push_str(&format!("\nDetected by: {}", reasons.join(", ")));
        }

        self.build(
            NotificationKind::Military,
            aircraft,
            "🪖 MILITARY AIRCRAFT DETECTED",
            message,
            "mdi:airplane-shield",
            "green",
            Priority::Normal,
        )
    }

    /// A new aircraft became the closest low aircraft.
    pub fn proximity(&self, aircraft: &AircraftRecord) -> Notification {
        let mut message = format!(
            "{} {} at {}ft {} {} away\n{} • {:.0}kts",
            proximity_emoji(aircraft),
            aircraft.identifier(),
            format_thousands(aircraft.altitude_ft),
            trend_arrow(aircraft.vertical_rate_fpm),
            self.units.format_distance(aircraft.distance_mi),
            aircraft.description,
            aircraft.speed_kts,
        );

        if let Some(flight) = &aircraft.flight {
            message.push_str(&format!("\nFlight: {}", flight));
        }

        if let Some(operator) = aircraft.operator.as_deref().filter(|op| *op != "Unknown") {
            message.push_str(&format!("\nOperator: {}", operator));
        }

        self.build(
            NotificationKind::Proximity,
            aircraft,
            "✈️ LOW AIRCRAFT OVERHEAD",
            message,
            "mdi:airplane-alert",
            "red",
            Priority::Normal,
        )
    }

    /// An aircraft is squawking an emergency code.
    pub fn emergency(&self, aircraft: &AircraftRecord, squawk: EmergencySquawk) -> Notification {
        let message = format!(
            "{} squawking {} ({}) at {}",
            aircraft.identifier(),
            squawk.code(),
            squawk,
            self.units.format_distance(aircraft.distance_mi),
        );

        self.build(
            NotificationKind::Emergency,
            aircraft,
            "⚠️ EMERGENCY SQUAWK",
            message,
            "mdi:alert",
            "red",
            Priority::High,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        &self,
        kind: NotificationKind,
        aircraft: &AircraftRecord,
        title: &str,
        message: String,
        icon: &str,
        color: &str,
        priority: Priority,
    ) -> Notification {
        Notification {
            kind,
            hex: aircraft.hex.clone(),
            title: title.to_string(),
            message,
            icon: icon.to_string(),
            color: color.to_string(),
            url: self.external_url.clone(),
            priority,
        }
    }
}

/// Arrow showing whether the aircraft is climbing, descending or level.
pub fn trend_arrow(vertical_rate_fpm: i64) -> &'static str {
    if vertical_rate_fpm > TREND_THRESHOLD_FPM {
        "↗️"
    } else if vertical_rate_fpm < -TREND_THRESHOLD_FPM {
        "↘️"
    } else {
        "→"
    }
}

fn proximity_emoji(aircraft: &AircraftRecord) -> &'static str {
    let description = aircraft.description.to_uppercase();
    let is_helicopter = aircraft.category == AircraftCategory::Helicopter
        || description.contains("HELICOPTER")
        || aircraft.aircraft_type.as_deref().is_some_and(|t| t.starts_with('H'));
    let is_light = LIGHT_AIRCRAFT_MAKERS.iter().any(|maker| description.contains(maker));

    if is_helicopter {
        "🚁"
    } else if aircraft.vertical_rate_fpm > TREND_THRESHOLD_FPM {
        "🛫"
    } else if aircraft.vertical_rate_fpm < -TREND_THRESHOLD_FPM {
        "🛬"
    } else if is_light {
        "🛩️"
    } else {
        "✈️"
    }
}

/// Formats an integer with comma thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
