//! Sources of raw Spond records and the dump sink for them.
//!
//! Sources yield records one at a time, in order; the caller normalizes each record
//! completely before asking for the next.

mod directory;
mod dumper;
mod spond_api;

pub use directory::*;
pub use dumper::*;
pub use spond_api::*;
