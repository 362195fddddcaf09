//! Store module.
//!
//! The repository is the only source of truth for ingested data during one run.
//! Sinks read it exclusively through `get_teams`, `get_team_members` and
//! `get_team_availabilities`.

mod repository;

pub use repository::*;
