//! Per-team sheet layout shared by the workbook and Google Sheets writers.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::db::Repository;
use crate::errors::AppError;
use crate::filters::Selection;
use crate::models::{AvailabilityStatus, MatchAvailability, MemberRef, Team};
use crate::ordering::{sort_availabilities, sort_members, sort_teams};

/// Ordered content of one team's sheet.
#[derive(Debug, Clone)]
pub struct TeamSheet {
    pub team: Team,
    /// Members in display order
    pub members: Vec<MemberRef>,
    /// Selected matches in column order
    pub availabilities: Vec<MatchAvailability>,
    row_by_member: HashMap<String, usize>,
}

impl TeamSheet {
    fn new(
        team: Team,
        mut members: Vec<MemberRef>,
        mut availabilities: Vec<MatchAvailability>,
    ) -> Self {
        sort_members(&mut members);
        sort_availabilities(&mut availabilities);

        let row_by_member = members
            .iter()
            .enumerate()
            .map(|(row, member)| (member.id().to_string(), row))
            .collect();

        Self {
            team,
            members,
            availabilities,
            row_by_member,
        }
    }

    /// Position of a member in `members`.
    pub fn member_row(&self, member_id: &str) -> Option<usize> {
        self.row_by_member.get(member_id).copied()
    }

    /// Status per member (aligned with `members`) for one match.
    pub fn status_column(&self, availability: &MatchAvailability) -> Vec<Option<AvailabilityStatus>> {
        let mut column = vec![None; self.members.len()];

        for (status, ids) in availability.statuses() {
            for id in ids {
                match self.member_row(id) {
                    Some(row) => column[row] = Some(status),
                    None => tracing::warn!(
                        team = %self.team.name,
                        match_id = %availability.match_id,
                        member_id = %id,
                        "Status for a member outside the team"
                    ),
                }
            }
        }

        column
    }
}

/// Build the sheets for every selected team, teams ordered by name.
///
/// Reads the repository only through its public query operations.
pub fn build_team_sheets(
    repo: &Repository,
    selection: &Selection,
) -> Result<Vec<TeamSheet>, AppError> {
    let mut teams: Vec<Team> = repo
        .get_teams()
        .into_iter()
        .filter(|team| selection.keep_team(team))
        .collect();
    sort_teams(&mut teams);

    let mut sheets = Vec::with_capacity(teams.len());
    for team in teams {
        let members = repo.get_team_members(&team.id)?;
        let availabilities = repo
            .get_team_availabilities(&team.id)?
            .into_iter()
            .filter(|a| selection.keep_match(a))
            .collect();
        sheets.push(TeamSheet::new(team, members, availabilities));
    }

    Ok(sheets)
}

fn spreadsheet_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn parse_timestamp(date: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Spreadsheet serial date (fractional days since 1899-12-30, UTC).
pub fn serial_date(date: &str) -> Option<f64> {
    let elapsed = parse_timestamp(date)? - spreadsheet_epoch();
    Some(elapsed.num_milliseconds() as f64 / 86_400_000.0)
}

/// Whole days since 1899-12-30, as Google Sheets stores a date.
pub fn serial_day(date: &str) -> Option<i64> {
    let elapsed = parse_timestamp(date)? - spreadsheet_epoch();
    Some(elapsed.num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;

    fn availability(match_id: &str, date: &str, heading: &str) -> MatchAvailability {
        MatchAvailability {
            match_id: match_id.to_string(),
            subgroup_id: "T1".to_string(),
            heading: heading.to_string(),
            match_info: None,
            date: date.to_string(),
            accepted_ids: vec!["m2".to_string()],
            declined_ids: vec!["m1".to_string()],
            unanswered_ids: vec![],
            waiting_list_ids: vec![],
            unconfirmed_ids: vec!["x9".to_string()],
        }
    }

    fn repo() -> Repository {
        let mut repo = Repository::new();
        let m1 = Team::new("T1", "M1s");
        let l1 = Team::new("T2", "Ladies");
        let members = vec![
            MemberRef::Unresolved("x9".to_string()),
            Member::new("m2", "Zoe", "Adams").into(),
            Member::new("m1", "Amy", "Zed").into(),
        ];
        repo.upsert_team(&m1, &members);
        repo.upsert_team(&l1, &members);
        repo.upsert_availability(&m1, availability("B", "2024-05-01T10:00:00Z", "League"));
        repo.upsert_availability(&m1, availability("A", "2024-04-01T10:00:00Z", "League"));
        repo.upsert_availability(&m1, availability("C", "2024-04-15T10:00:00Z", "Training"));
        repo
    }

    #[test]
    fn test_sheets_are_ordered_and_filtered() {
        let selection = Selection::from_patterns(None, Some("Training")).unwrap();
        let sheets = build_team_sheets(&repo(), &selection).unwrap();

        let names: Vec<&str> = sheets.iter().map(|s| s.team.name.as_str()).collect();
        assert_eq!(names, vec!["Ladies", "M1s"]);

        let m1 = &sheets[1];
        let ids: Vec<&str> = m1.members.iter().map(MemberRef::id).collect();
        assert_eq!(ids, vec!["m1", "m2", "x9"]);

        let matches: Vec<&str> = m1
            .availabilities
            .iter()
            .map(|a| a.match_id.as_str())
            .collect();
        assert_eq!(matches, vec!["A", "B"]);
        assert!(sheets[0].availabilities.is_empty());
    }

    #[test]
    fn test_status_column_aligns_with_members() {
        let sheets = build_team_sheets(&repo(), &Selection::all()).unwrap();
        let m1 = sheets.iter().find(|s| s.team.id == "T1").unwrap();

        let column = m1.status_column(&m1.availabilities[0]);
        assert_eq!(
            column,
            vec![
                Some(AvailabilityStatus::Declined),
                Some(AvailabilityStatus::Accepted),
                Some(AvailabilityStatus::Unconfirmed),
            ]
        );
        assert_eq!(m1.member_row("x9"), Some(2));
        assert_eq!(m1.member_row("nobody"), None);
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(serial_day("1900-01-01T00:00:00Z"), Some(2));
        assert_eq!(serial_day("2024-01-01T18:00:00Z"), Some(45292));
        assert_eq!(serial_date("2024-01-01T12:00:00Z"), Some(45292.5));
        assert_eq!(serial_day("2024-01-01T12:00:00.000"), Some(45292));
        assert_eq!(serial_day("next tuesday"), None);
    }
}
