//! Shared data structures for the wellbore geometry engine
//!
//! This module defines the core model types:
//! - WellboreSection / SectionType: the ordered telescoping casing program
//! - DrillStringComponent / ComponentKind / JetSet: the drill string
//! - SurveyPoint: directional survey stations
//! - Diagnostic / ValidationReport: categorized validation findings
//!
//! No entity holds a reference to its neighbor; adjacency is always
//! resolved by sort position at calculation time, never cached, so a
//! reorder can never leave a stale pointer behind.

mod diagnostic;
mod drill_string;
mod survey;
mod wellbore;

pub use diagnostic::*;
pub use drill_string::*;
pub use survey::*;
pub use wellbore::*;
