//! Normalizes raw Spond records into repository state.
//!
//! One record is fully validated before anything is written, then each subgroup is
//! committed as a team upsert followed by an availability upsert.

use std::collections::HashMap;

use serde_json::Value;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{
    MatchAvailability, MatchInfo, Member, MemberRef, RawResponses, RawSpond, Team,
};

/// Result of normalizing one raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record has no subgroups (e.g. a draft event); nothing was written
    Skipped,
    /// Snapshots were committed for these team ids
    Committed { teams: Vec<String> },
}

/// Normalize one raw record and commit it to the repository.
///
/// Records without `recipients.group.subGroups` are skipped before the rest of the
/// record is parsed, so a malformed draft never fails a run.
pub fn process_spond(repo: &mut Repository, raw: &Value) -> Result<Outcome, AppError> {
    if !raw
        .pointer("/recipients/group/subGroups")
        .is_some_and(Value::is_array)
    {
        tracing::debug!(spond_id = ?raw.get("id"), "Skipping spond without subgroups");
        return Ok(Outcome::Skipped);
    }

    let spond: RawSpond = serde_json::from_value(raw.clone())?;
    process_raw_spond(repo, &spond)
}

/// Same as [`process_spond`] for an already deserialized record.
pub fn process_raw_spond(repo: &mut Repository, spond: &RawSpond) -> Result<Outcome, AppError> {
    let Some(sub_groups) = spond.sub_groups() else {
        tracing::debug!(spond_id = ?spond.id, "Skipping spond without subgroups");
        return Ok(Outcome::Skipped);
    };
    if sub_groups.is_empty() {
        return Ok(Outcome::Committed { teams: Vec::new() });
    }

    let match_id = spond
        .id
        .clone()
        .ok_or_else(|| AppError::InvalidRecord("Spond has subgroups but no id".to_string()))?;
    let lists = ResponseLists::from_raw(&match_id, spond.responses.as_ref())?;

    // Record scoped; never carried over to the next record
    let members_by_id: HashMap<&str, Member> = spond
        .members()
        .iter()
        .map(|m| {
            (
                m.id.as_str(),
                Member::new(m.id.clone(), m.first_name.clone(), m.last_name.clone()),
            )
        })
        .collect();

    let match_info = spond.match_info.as_ref().map(|info| MatchInfo {
        team_name: info.team_name.clone(),
        opponent_name: info.opponent_name.clone(),
        match_type: info.match_type.clone(),
    });

    let mut teams = Vec::with_capacity(sub_groups.len());
    for group in sub_groups {
        let team = Team::new(group.id.clone(), group.name.clone());

        let availability = MatchAvailability {
            match_id: match_id.clone(),
            subgroup_id: group.id.clone(),
            heading: spond.heading.clone().unwrap_or_default(),
            match_info: match_info.clone(),
            date: spond.start_timestamp.clone().unwrap_or_default(),
            accepted_ids: lists.accepted.clone(),
            declined_ids: lists.declined.clone(),
            unanswered_ids: lists.unanswered.clone(),
            waiting_list_ids: lists.waiting_list.clone(),
            unconfirmed_ids: lists.unconfirmed.clone(),
        };

        let team_members: Vec<MemberRef> = availability
            .all_member_ids()
            .map(|id| match members_by_id.get(id.as_str()) {
                Some(member) => MemberRef::Resolved(member.clone()),
                None => MemberRef::Unresolved(id.clone()),
            })
            .collect();

        repo.upsert_team(&team, &team_members);
        repo.upsert_availability(&team, availability);

        tracing::debug!(
            spond_id = %match_id,
            team = %team.name,
            members = team_members.len(),
            "Committed availability"
        );
        teams.push(team.id);
    }

    Ok(Outcome::Committed { teams })
}

/// The five response lists, all required once a record has subgroups.
struct ResponseLists {
    accepted: Vec<String>,
    declined: Vec<String>,
    unanswered: Vec<String>,
    waiting_list: Vec<String>,
    unconfirmed: Vec<String>,
}

impl ResponseLists {
    fn from_raw(match_id: &str, responses: Option<&RawResponses>) -> Result<Self, AppError> {
        let responses = responses.ok_or_else(|| {
            AppError::InvalidRecord(format!("Spond {} has no responses", match_id))
        })?;

        let required = |list: &Option<Vec<String>>, field: &str| {
            list.clone().ok_or_else(|| {
                AppError::InvalidRecord(format!(
                    "Spond {} is missing responses.{}",
                    match_id, field
                ))
            })
        };

        Ok(Self {
            accepted: required(&responses.accepted_ids, "acceptedIds")?,
            declined: required(&responses.declined_ids, "declinedIds")?,
            unanswered: required(&responses.unanswered_ids, "unansweredIds")?,
            waiting_list: required(&responses.waitinglist_ids, "waitinglistIds")?,
            unconfirmed: required(&responses.unconfirmed_ids, "unconfirmedIds")?,
        })
    }
}
