//! Pure membership rules: every invariant the coordinator enforces,
//! free of SQL and HTTP so it can be unit-tested directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base58 alphabet used by wallet addresses (no 0, O, I, l).
const BASE58: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Wallet address length bounds (base58-encoded 32-byte key).
pub const WALLET_MIN_LEN: usize = 32;
pub const WALLET_MAX_LEN: usize = 44;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("team name is required")]
    EmptyTeamName,
    #[error("a team needs between {min} and {max} members")]
    TeamSizeOutOfBounds { min: usize, max: usize },
    #[error("invalid wallet address: {0}")]
    BadWallet(String),
    #[error("duplicate member wallet: {0}")]
    DuplicateMember(String),
    #[error("cannot leave a team after accepting an invite")]
    AlreadyAccepted,
}

/// Per-member status embedded on the team roster; also the invite state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Pending,
    Accepted,
    Rejected,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Pending => "pending",
            MemberStatus::Accepted => "accepted",
            MemberStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MemberStatus::Pending),
            "accepted" => Some(MemberStatus::Accepted),
            "rejected" => Some(MemberStatus::Rejected),
            _ => None,
        }
    }
}

/// Display status of a team, derived on read and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamVerification {
    Verified,
    Unverified,
}

/// True if `addr` looks like a base58-encoded wallet address.
pub fn is_valid_wallet(addr: &str) -> bool {
    (WALLET_MIN_LEN..=WALLET_MAX_LEN).contains(&addr.len())
        && addr.chars().all(|c| BASE58.contains(c))
}

/// Validate a create-team request: non-empty name, 5–10 members, every
/// wallet well-formed and unique within the roster. Client-side checks
/// are repeated here; the server is the authority.
pub fn validate_new_team(
    name: &str,
    member_wallets: &[&str],
    min: usize,
    max: usize,
) -> Result<(), RuleViolation> {
    if name.trim().is_empty() {
        return Err(RuleViolation::EmptyTeamName);
    }
    if member_wallets.len() < min || member_wallets.len() > max {
        return Err(RuleViolation::TeamSizeOutOfBounds { min, max });
    }
    for (i, wallet) in member_wallets.iter().enumerate() {
        if !is_valid_wallet(wallet) {
            return Err(RuleViolation::BadWallet((*wallet).to_string()));
        }
        if member_wallets[..i].contains(wallet) {
            return Err(RuleViolation::DuplicateMember((*wallet).to_string()));
        }
    }
    Ok(())
}

/// Roster status seeded at creation: the creator's own entry is accepted
/// up front, everyone else starts pending.
pub fn seed_member_status(member_wallet: &str, creator_wallet: &str) -> MemberStatus {
    if member_wallet == creator_wallet {
        MemberStatus::Accepted
    } else {
        MemberStatus::Pending
    }
}

/// Gate an invite transition. Accepting is a one-way door: an accepted
/// invite can never flip to rejected. Any other re-settlement is allowed;
/// the accept side effects are add-if-absent, so replays are harmless.
pub fn invite_transition(
    current: MemberStatus,
    requested: MemberStatus,
) -> Result<(), RuleViolation> {
    match (current, requested) {
        (MemberStatus::Accepted, MemberStatus::Rejected) => Err(RuleViolation::AlreadyAccepted),
        _ => Ok(()),
    }
}

/// Whether `wallet` may act for the team (roster member or creator).
pub fn is_team_principal(created_by: &str, member_wallets: &[&str], wallet: &str) -> bool {
    created_by == wallet || member_wallets.contains(&wallet)
}

/// Whether admitting another team would overflow the tournament.
pub fn tournament_has_capacity(enrolled: usize, capacity: i64) -> bool {
    (enrolled as i64) < capacity
}

/// One team per wallet per tournament: true if `wallet` already appears
/// in any enrolled roster, as creator or member.
pub fn wallet_in_any_roster<'a, I>(rosters: I, wallet: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
{
    rosters
        .into_iter()
        .any(|(created_by, members)| is_team_principal(created_by, &members, wallet))
}

/// Derived verified/unverified display status: unverified while any
/// member's embedded status is pending or missing.
pub fn team_verification<'a, I>(member_statuses: I) -> TeamVerification
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let all_accepted = member_statuses
        .into_iter()
        .all(|s| s == Some(MemberStatus::Accepted.as_str()));
    if all_accepted {
        TeamVerification::Verified
    } else {
        TeamVerification::Unverified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_shape() {
        assert!(is_valid_wallet("AEnb3z3o8NoVH5r7ppVWXw2DCu84S8n1L5MsP1Hp"));
        assert!(!is_valid_wallet("short"));
        assert!(!is_valid_wallet("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl")); // excluded chars
    }

    #[test]
    fn accepted_is_final() {
        assert_eq!(
            invite_transition(MemberStatus::Accepted, MemberStatus::Rejected),
            Err(RuleViolation::AlreadyAccepted)
        );
        assert!(invite_transition(MemberStatus::Accepted, MemberStatus::Accepted).is_ok());
    }
}
