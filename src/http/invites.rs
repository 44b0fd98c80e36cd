//! Invite lifecycle (create / respond / pending list)

use actix_web::{get, patch, post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::invite_repo;
use crate::error::ApiError;
use crate::rules::{self, MemberStatus};

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInviteReq {
    pub team_id: Uuid,
    pub team_name: String,
    pub wallet_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondReq {
    pub invite_id: Uuid,
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingParams {
    pub wallet_address: String,
}

//////////////////////////////////////////////////
// Handlers
//////////////////////////////////////////////////

/// POST /api/invites
#[post("/invites")]
pub async fn create(
    info: web::Json<CreateInviteReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    if info.team_name.trim().is_empty() {
        return Err(ApiError::BadRequest("team name is required".into()));
    }
    if !rules::is_valid_wallet(&info.wallet_address) {
        return Err(ApiError::BadRequest("a valid wallet address is required".into()));
    }

    let invite = invite_repo::create_invite(&db, info.team_id, &info.team_name, &info.wallet_address)
        .await?
        .ok_or_else(|| ApiError::Conflict("invite already exists".into()))?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Invite created successfully",
        "inviteId": invite.id,
        "invite": invite,
    })))
}

/// PATCH /api/invites — accept or reject.
#[patch("/invites")]
pub async fn respond(
    info: web::Json<RespondReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let requested = match MemberStatus::parse(&info.status) {
        Some(s @ (MemberStatus::Accepted | MemberStatus::Rejected)) => s,
        _ => {
            return Err(ApiError::BadRequest(
                r#"status must be either "accepted" or "rejected""#.into(),
            ))
        }
    };

    let invite = invite_repo::fetch_invite(&db, info.invite_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("invite not found".into()))?;

    let current = MemberStatus::parse(&invite.status).unwrap_or(MemberStatus::Pending);
    rules::invite_transition(current, requested)?;

    match requested {
        MemberStatus::Accepted => invite_repo::accept_invite(&db, &invite).await?,
        _ => invite_repo::reject_invite(&db, invite.id).await?,
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Invite {}", requested.as_str()),
    })))
}

/// GET /api/invites?walletAddress= — pending invites for a wallet.
#[get("/invites")]
pub async fn pending(
    web::Query(params): web::Query<PendingParams>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    if params.wallet_address.is_empty() {
        return Err(ApiError::BadRequest("wallet address is required".into()));
    }

    let invites = invite_repo::pending_for_wallet(&db, &params.wallet_address).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "invites": invites })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(respond).service(pending);
}
