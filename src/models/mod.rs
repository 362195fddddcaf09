//! Data models for teams, members and match availability.
//!
//! Domain models serialize with the same camelCase names Spond uses on the wire.

mod availability;
mod member;
mod spond;
mod team;

pub use availability::*;
pub use member::*;
pub use spond::*;
pub use team::*;
