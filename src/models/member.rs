//! Member model and the resolved/unresolved member reference.

use serde::{Deserialize, Serialize};

/// A group member whose name is known from a roster payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", as shown in the member column of every sheet.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A reference to a team member.
///
/// Status lists only carry ids. An id is `Resolved` when a roster entry for it was seen,
/// otherwise it stays a bare `Unresolved` id. A resolved member is never demoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Resolved(Member),
    Unresolved(String),
}

impl MemberRef {
    /// The member id, regardless of resolution state.
    pub fn id(&self) -> &str {
        match self {
            MemberRef::Resolved(member) => &member.id,
            MemberRef::Unresolved(id) => id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            MemberRef::Resolved(member) => member.display_name(),
            MemberRef::Unresolved(id) => id.clone(),
        }
    }
}

impl From<Member> for MemberRef {
    fn from(member: Member) -> Self {
        MemberRef::Resolved(member)
    }
}
