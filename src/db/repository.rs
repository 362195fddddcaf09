//! In-memory repository for teams, members and match availability.
//!
//! All writes are upserts keyed by id. Nothing is ever deleted.

use std::collections::{HashMap, HashSet};

use crate::errors::AppError;
use crate::models::{MatchAvailability, Member, MemberRef, Team};

/// Member ids associated with a team, kept in first-seen order without duplicates.
#[derive(Debug, Default, Clone)]
struct Membership {
    order: Vec<String>,
    ids: HashSet<String>,
}

impl Membership {
    fn insert(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            self.order.push(id.to_string());
        }
    }
}

/// Repository for all ingested data. One instance lives for one invocation.
#[derive(Debug, Default, Clone)]
pub struct Repository {
    teams_by_id: HashMap<String, Team>,
    members_by_id: HashMap<String, Member>,
    members_by_team: HashMap<String, Membership>,
    availabilities_by_team: HashMap<String, HashMap<String, MatchAvailability>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== TEAM OPERATIONS ====================

    /// Insert or replace a team and add the referenced members to its membership.
    ///
    /// Resolved members overwrite the stored member record; unresolved ids only
    /// join the membership.
    pub fn upsert_team(&mut self, team: &Team, team_members: &[MemberRef]) {
        self.teams_by_id.insert(team.id.clone(), team.clone());

        let membership = self.members_by_team.entry(team.id.clone()).or_default();
        for member in team_members {
            if let MemberRef::Resolved(resolved) = member {
                self.members_by_id
                    .insert(resolved.id.clone(), resolved.clone());
            }
            membership.insert(member.id());
        }
    }

    /// List all teams, unordered.
    pub fn get_teams(&self) -> Vec<Team> {
        self.teams_by_id.values().cloned().collect()
    }

    /// Membership of a team, each id resolved against the member table when possible.
    pub fn get_team_members(&self, team_id: &str) -> Result<Vec<MemberRef>, AppError> {
        let membership = self
            .members_by_team
            .get(team_id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;

        Ok(membership
            .order
            .iter()
            .map(|id| match self.members_by_id.get(id) {
                Some(member) => MemberRef::Resolved(member.clone()),
                None => MemberRef::Unresolved(id.clone()),
            })
            .collect())
    }

    // ==================== AVAILABILITY OPERATIONS ====================

    /// Insert or replace the snapshot for `(team.id, availability.match_id)`.
    ///
    /// Membership is not checked here; callers upsert the team first.
    pub fn upsert_availability(&mut self, team: &Team, availability: MatchAvailability) {
        self.availabilities_by_team
            .entry(team.id.clone())
            .or_default()
            .insert(availability.match_id.clone(), availability);
    }

    /// All snapshots for a team, unordered.
    pub fn get_team_availabilities(
        &self,
        team_id: &str,
    ) -> Result<Vec<MatchAvailability>, AppError> {
        match self.availabilities_by_team.get(team_id) {
            Some(by_match) => Ok(by_match.values().cloned().collect()),
            None if self.teams_by_id.contains_key(team_id) => Ok(Vec::new()),
            None => Err(AppError::NotFound(format!("Team {} not found", team_id))),
        }
    }
}
