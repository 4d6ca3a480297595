//! Pattern Rule Tables
//!
//! Static, versioned tables mapping textual patterns to legal categories:
//! - `objection`: objection grounds, base ruling probabilities, templates
//! - `motion`: per-kind motion outcome patterns and ruling text
//! - `charges`: criminal/civil charge types with burden, elements, defenses
//!
//! The tables are declarative data; the matching algorithms live in the
//! engines that consume them (`objection`, `motion`, `intake`). Regexes are
//! compiled once on first use and cached for the process lifetime.

pub mod charges;
pub mod motion;
pub mod objection;

/// Version stamp for persisted rulings — bump when table contents change.
pub const RULES_VERSION: u32 = 1;
