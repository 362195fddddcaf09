//! Regex filters over a named string field of a model.

use std::fmt;

use regex::Regex;

use crate::errors::AppError;
use crate::models::{MatchAvailability, Team};

/// Default team filter for the hosted sheet: numbered men's teams.
pub const DEFAULT_TEAM_PATTERN: &str = "M[0-9].*";
/// Default exclusion for the hosted sheet: training sessions.
pub const DEFAULT_EXCLUDED_MATCH_PATTERN: &str = ".*[T|t]raining";

/// Keeps items whose field matches (or, negated, does not match) a pattern.
///
/// The pattern is unanchored; a match anywhere in the field counts.
pub struct FieldFilter<T> {
    field: &'static str,
    extract: fn(&T) -> &str,
    regex: Regex,
    negate: bool,
}

impl<T> FieldFilter<T> {
    fn build(
        field: &'static str,
        extract: fn(&T) -> &str,
        pattern: &str,
        negate: bool,
    ) -> Result<Self, AppError> {
        Ok(Self {
            field,
            extract,
            regex: Regex::new(pattern)?,
            negate,
        })
    }

    pub fn test(&self, item: &T) -> bool {
        self.regex.is_match((self.extract)(item)) != self.negate
    }
}

impl<T> fmt::Debug for FieldFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = if self.negate { "!~" } else { "~" };
        write!(f, "{} {} /{}/", self.field, op, self.regex.as_str())
    }
}

impl FieldFilter<Team> {
    pub fn name_matches(pattern: &str) -> Result<Self, AppError> {
        Self::build("name", |team| team.name.as_str(), pattern, false)
    }
}

impl FieldFilter<MatchAvailability> {
    pub fn heading_not_matches(pattern: &str) -> Result<Self, AppError> {
        Self::build("heading", |a| a.heading.as_str(), pattern, true)
    }
}

/// Team and match filters applied by a sink. `None` keeps everything.
#[derive(Debug, Default)]
pub struct Selection {
    pub teams: Option<FieldFilter<Team>>,
    pub matches: Option<FieldFilter<MatchAvailability>>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selection from optional command line patterns.
    pub fn from_patterns(
        team_pattern: Option<&str>,
        excluded_match_pattern: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            teams: team_pattern.map(FieldFilter::<Team>::name_matches).transpose()?,
            matches: excluded_match_pattern
                .map(FieldFilter::<MatchAvailability>::heading_not_matches)
                .transpose()?,
        })
    }

    pub fn keep_team(&self, team: &Team) -> bool {
        self.teams.as_ref().map_or(true, |f| f.test(team))
    }

    pub fn keep_match(&self, availability: &MatchAvailability) -> bool {
        self.matches.as_ref().map_or(true, |f| f.test(availability))
    }
}
