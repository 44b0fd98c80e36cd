use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

/// User as the API presents it: identity plus the joined team-id set and
/// stored (never consumed) notifications.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
    pub teams: Vec<Uuid>,
    pub notifications: Vec<serde_json::Value>,
}

#[derive(Debug, FromRow)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub twitter_link: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, FromRow, Serialize)]
pub struct TeamMemberRow {
    #[serde(skip)]
    pub team_id: Uuid,
    #[serde(rename = "id")]
    pub member_id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
    pub status: String,
}

/// Team aggregate: the row plus its value-owned, ordered roster.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<TeamMemberRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl Team {
    pub fn assemble(row: TeamRow, members: Vec<TeamMemberRow>) -> Self {
        Team {
            id: row.id,
            name: row.name,
            members,
            twitter_link: row.twitter_link,
            banner_url: row.banner_url,
            created_at: row.created_at,
            created_by: row.created_by,
        }
    }

    pub fn member_wallets(&self) -> Vec<&str> {
        self.members
            .iter()
            .map(|m| m.wallet_address.as_str())
            .collect()
    }
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    pub id: Uuid,
    pub team_id: Uuid,
    /// Denormalized for display; deliberately stale across team renames.
    pub team_name: String,
    pub wallet_address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub teams: Vec<Uuid>,
    pub start_date: DateTime<Utc>,
    pub status: String,
}

#[derive(Debug, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bracket {
    pub id: Uuid,
    pub teams: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}
