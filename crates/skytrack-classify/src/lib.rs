//! # SkyTrack Classify
//!
//! Aircraft classification for the SkyTrack tracker.
//!
//! - **TypeLookup**: Maps ICAO type designators to a friendly description,
//!   airframe category, weight class and engine configuration using a
//!   bundled type table.
//! - **MilitaryRegistry**: Recognises military airframes by hex code using a
//!   remote reference document, cached for a day and downloaded by at most
//!   one task at a time.
//!
//! ## Example
//!
//! ```
//! use skytrack_classify::TypeLookup;
//!
//! let lookup = TypeLookup::bundled().unwrap();
//! let info = lookup.describe(Some("B738"));
//! assert!(info.description.contains("Boeing 737-800"));
//! ```

pub mod descriptor;
pub mod military;
pub mod type_lookup;

pub use descriptor::TypeDescriptor;
pub use military::{DetectionReason, LoadOutcome, MilitaryEntry, MilitaryRegistry, RefreshOutcome, RegistryPhase, RegistryStatus};
pub use type_lookup::{TypeInfo, TypeLookup};
