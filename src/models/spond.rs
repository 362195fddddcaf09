//! Wire types for raw Spond event records.
//!
//! Every field is optional here; the normalizer decides what a record must carry.

use serde::Deserialize;

/// One Spond event as returned by the `/sponds` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpond {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub start_timestamp: Option<String>,
    #[serde(default)]
    pub match_info: Option<RawMatchInfo>,
    #[serde(default)]
    pub recipients: Option<RawRecipients>,
    #[serde(default)]
    pub responses: Option<RawResponses>,
}

impl RawSpond {
    /// Subgroups the event was sent to, if any were assigned.
    pub fn sub_groups(&self) -> Option<&[RawSubGroup]> {
        self.recipients
            .as_ref()
            .and_then(|r| r.group.as_ref())
            .and_then(|g| g.sub_groups.as_deref())
    }

    /// Roster entries of the recipient group.
    pub fn members(&self) -> &[RawMember] {
        self.recipients
            .as_ref()
            .and_then(|r| r.group.as_ref())
            .and_then(|g| g.members.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecipients {
    #[serde(default)]
    pub group: Option<RawGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    #[serde(default)]
    pub members: Option<Vec<RawMember>>,
    #[serde(default)]
    pub sub_groups: Option<Vec<RawSubGroup>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMember {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSubGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response id lists. Note the upstream spelling `waitinglistIds`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponses {
    #[serde(default)]
    pub accepted_ids: Option<Vec<String>>,
    #[serde(default)]
    pub declined_ids: Option<Vec<String>>,
    #[serde(default)]
    pub unanswered_ids: Option<Vec<String>>,
    #[serde(default, rename = "waitinglistIds")]
    pub waitinglist_ids: Option<Vec<String>>,
    #[serde(default)]
    pub unconfirmed_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchInfo {
    /// Older dumps carry the misspelled `teeamName`.
    #[serde(default, alias = "teeamName")]
    pub team_name: Option<String>,
    #[serde(default)]
    pub opponent_name: Option<String>,
    #[serde(default, rename = "type")]
    pub match_type: Option<String>,
}
