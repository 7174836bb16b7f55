//! Domain layer - ride booking vocabulary and rules.
//!
//! Free of I/O: everything here is pure data and validation.

pub mod foundation;
pub mod trip;
