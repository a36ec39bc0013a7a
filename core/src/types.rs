//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for a staff member within one roster.
pub type StaffId = String;

/// A capability a roster must keep covered: a specialty tag or a credential.
pub type Capability = String;

/// Zero-based day offset within an analysis period.
pub type DayIndex = u32;
