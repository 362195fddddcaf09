//! Match availability snapshot for one team and one match.

use serde::{Deserialize, Serialize};

/// Response status of a member for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityStatus {
    Accepted,
    Declined,
    Unanswered,
    Unconfirmed,
    Waitlist,
}

impl AvailabilityStatus {
    /// Cell value written to the workbook file.
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Accepted => "ACCEPTED",
            AvailabilityStatus::Declined => "DECLINED",
            AvailabilityStatus::Unanswered => "UNANSWERED",
            AvailabilityStatus::Unconfirmed => "UNCONFIRMED",
            AvailabilityStatus::Waitlist => "WAITLIST",
        }
    }

    /// Cell value written to the hosted Google Sheet.
    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityStatus::Accepted => "Accepted",
            AvailabilityStatus::Declined => "Declined",
            AvailabilityStatus::Unanswered => "Unanswered",
            AvailabilityStatus::Unconfirmed => "Unconfirmed",
            AvailabilityStatus::Waitlist => "Wait list",
        }
    }
}

/// Match details carried by Spond events flagged as matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
}

/// One response snapshot for a (team, match) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAvailability {
    pub match_id: String,
    pub subgroup_id: String,
    pub heading: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_info: Option<MatchInfo>,
    pub date: String,
    pub accepted_ids: Vec<String>,
    pub declined_ids: Vec<String>,
    pub unanswered_ids: Vec<String>,
    pub waiting_list_ids: Vec<String>,
    pub unconfirmed_ids: Vec<String>,
}

impl MatchAvailability {
    /// Opponent name for match events, the heading for everything else.
    pub fn opponent_label(&self) -> &str {
        match &self.match_info {
            Some(info) => info.opponent_name.as_deref().unwrap_or_default(),
            None => &self.heading,
        }
    }

    pub fn match_type(&self) -> Option<&str> {
        self.match_info
            .as_ref()
            .and_then(|info| info.match_type.as_deref())
    }

    /// Every referenced id: accepted, declined, unanswered, waiting list, unconfirmed.
    pub fn all_member_ids(&self) -> impl Iterator<Item = &String> {
        self.accepted_ids
            .iter()
            .chain(&self.declined_ids)
            .chain(&self.unanswered_ids)
            .chain(&self.waiting_list_ids)
            .chain(&self.unconfirmed_ids)
    }

    /// Status lists in cell-writing order. A later list wins for an id listed twice.
    pub fn statuses(&self) -> [(AvailabilityStatus, &[String]); 5] {
        [
            (AvailabilityStatus::Accepted, &self.accepted_ids[..]),
            (AvailabilityStatus::Declined, &self.declined_ids[..]),
            (AvailabilityStatus::Unanswered, &self.unanswered_ids[..]),
            (AvailabilityStatus::Unconfirmed, &self.unconfirmed_ids[..]),
            (AvailabilityStatus::Waitlist, &self.waiting_list_ids[..]),
        ]
    }

    /// Status for one member, applying the same precedence as the sheet writers.
    pub fn status_of(&self, member_id: &str) -> Option<AvailabilityStatus> {
        self.statuses()
            .into_iter()
            .filter(|(_, ids)| ids.iter().any(|id| id == member_id))
            .map(|(status, _)| status)
            .last()
    }
}
