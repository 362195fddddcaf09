//! Sort orders shared by every sink.
//!
//! Both sinks use these so identical repository contents render identically.

use std::cmp::Ordering;

use crate::models::{MatchAvailability, MemberRef, Team};

/// Locale-style string comparison.
///
/// Letters compare case-insensitively first, then lowercase sorts before uppercase,
/// then plain code point order decides.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    let folded = left
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    let case = left
        .chars()
        .map(|c| c.is_uppercase())
        .cmp(right.chars().map(|c| c.is_uppercase()));
    if case != Ordering::Equal {
        return case;
    }

    left.cmp(right)
}

/// Resolved members by first then last name; unresolved ids after them, by id.
pub fn member_order(left: &MemberRef, right: &MemberRef) -> Ordering {
    match (left, right) {
        (MemberRef::Unresolved(a), MemberRef::Unresolved(b)) => locale_compare(a, b),
        (MemberRef::Unresolved(_), MemberRef::Resolved(_)) => Ordering::Greater,
        (MemberRef::Resolved(_), MemberRef::Unresolved(_)) => Ordering::Less,
        (MemberRef::Resolved(a), MemberRef::Resolved(b)) => {
            locale_compare(&a.first_name, &b.first_name)
                .then_with(|| locale_compare(&a.last_name, &b.last_name))
        }
    }
}

/// By the `date` string, compared lexically rather than as a parsed date.
pub fn availability_order(left: &MatchAvailability, right: &MatchAvailability) -> Ordering {
    locale_compare(&left.date, &right.date)
}

pub fn team_order(left: &Team, right: &Team) -> Ordering {
    locale_compare(&left.name, &right.name)
}

pub fn sort_members(members: &mut [MemberRef]) {
    members.sort_by(member_order);
}

pub fn sort_availabilities(availabilities: &mut [MatchAvailability]) {
    availabilities.sort_by(availability_order);
}

pub fn sort_teams(teams: &mut [Team]) {
    teams.sort_by(team_order);
}
