//! Wallet authentication (JWT access + Redis-held refresh tokens).
//!
//! `connect` resolves a claimed wallet address to a session: the address
//! shape is validated server-side and the user record is created on first
//! contact. Challenge-response signature verification against the wallet's
//! public key would slot in here before token issuance.

use actix_web::{get, post, web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use redis::{AsyncCommands, Client as RedisClient};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::env;
use uuid::Uuid;

use crate::config::settings;
use crate::db::{invite_repo, user_repo};
use crate::error::ApiError;
use crate::rules;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub wallet_address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // wallet address
    exp: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Mint a signed access token carrying the wallet address.
pub fn issue_access_token(
    wallet: &str,
    secret: &[u8],
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::seconds(ttl_secs)).timestamp() as usize;
    let claims = Claims {
        sub: wallet.to_string(),
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// Decode an access token back to its wallet address.
pub fn decode_wallet(token: &str, secret: &[u8]) -> Option<String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};
    decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .ok()
        .map(|d| d.claims.sub)
}

//////////////////////////////////////////////////
// ─────────────  WalletAuth extractor  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use actix_web::{
        dev::Payload, error::ErrorUnauthorized, FromRequest, HttpRequest, Result as ActixResult,
    };
    use futures_util::future::{ready, Ready};
    use std::env;

    /// Extracts and validates a Bearer JWT, exposing the wallet address.
    #[derive(Debug, Clone)]
    pub struct WalletAuth {
        pub wallet: String,
    }

    impl FromRequest for WalletAuth {
        type Error = actix_web::Error;
        type Future = Ready<ActixResult<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = (|| {
                // Expect:  Authorization: Bearer <JWT>
                let hdr = req
                    .headers()
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| ErrorUnauthorized("missing Authorization header"))?;

                let token = hdr
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| ErrorUnauthorized("malformed Authorization header"))?;

                let secret =
                    env::var("JWT_SECRET").map_err(|_| ErrorUnauthorized("server mis-config"))?;
                let wallet = super::decode_wallet(token, secret.as_bytes())
                    .ok_or_else(|| ErrorUnauthorized("invalid / expired token"))?;

                Ok(WalletAuth { wallet })
            })();

            ready(res)
        }
    }
}
pub use extractor::WalletAuth; // <-- makes path crate::http::auth::WalletAuth work

//////////////////////////////////////////////////
// POST /api/auth/connect
//////////////////////////////////////////////////
#[post("/auth/connect")]
pub async fn connect(
    info: web::Json<ConnectRequest>,
    db: web::Data<PgPool>,
    redis: web::Data<RedisClient>,
) -> Result<HttpResponse, ApiError> {
    if !rules::is_valid_wallet(&info.wallet_address) {
        return Err(ApiError::BadRequest("a valid wallet address is required".into()));
    }

    // Users come into existence on first connect.
    let user = user_repo::upsert_user(&db, &info.wallet_address).await?;
    let user = user_repo::profile(&db, user).await?;
    let invites = invite_repo::pending_for_wallet(&db, &info.wallet_address).await?;

    let secret = env::var("JWT_SECRET")
        .map_err(|_| ApiError::Internal(anyhow::anyhow!("JWT_SECRET must be set")))?;
    let access_token =
        issue_access_token(&info.wallet_address, secret.as_bytes(), settings().access_ttl)
            .map_err(|e| ApiError::Internal(e.into()))?;

    // Refresh token lives in Redis only.
    let refresh_token = Uuid::new_v4().to_string();
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let key = format!("refresh:{refresh_token}");
    let _: () = conn
        .set_ex(&key, &info.wallet_address, settings().refresh_ttl)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": user,
        "invites": invites,
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "expiresIn": settings().access_ttl,
    })))
}

//////////////////////////////////////////////////
// POST /api/auth/refresh
//////////////////////////////////////////////////
#[post("/auth/refresh")]
pub async fn refresh(
    info: web::Json<RefreshRequest>,
    redis: web::Data<RedisClient>,
) -> Result<HttpResponse, ApiError> {
    // Consume the old refresh token → wallet address.
    let mut conn = redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    let key = format!("refresh:{}", info.refresh_token);
    let wallet: String = match conn.get::<_, Option<String>>(&key).await {
        Ok(Some(w)) => {
            let _: () = conn.del(&key).await.unwrap_or(());
            w
        }
        Ok(None) => return Err(ApiError::Unauthorized("invalid refresh token".into())),
        Err(e) => return Err(ApiError::Internal(e.into())),
    };

    let secret = env::var("JWT_SECRET")
        .map_err(|_| ApiError::Internal(anyhow::anyhow!("JWT_SECRET must be set")))?;
    let access_token = issue_access_token(&wallet, secret.as_bytes(), settings().access_ttl)
        .map_err(|e| ApiError::Internal(e.into()))?;

    // Mint a replacement refresh token.
    let new_refresh = Uuid::new_v4().to_string();
    let key = format!("refresh:{new_refresh}");
    let _: () = conn
        .set_ex(&key, &wallet, settings().refresh_ttl)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token,
        refresh_token: new_refresh,
        expires_in: settings().access_ttl,
    }))
}

//////////////////////////////////////////////////
// GET /api/auth/me
//////////////////////////////////////////////////
#[get("/auth/me")]
pub async fn me(auth: WalletAuth, db: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let user = user_repo::fetch_by_wallet(&db, &auth.wallet)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    let user = user_repo::profile(&db, user).await?;
    let invites = invite_repo::pending_for_wallet(&db, &auth.wallet).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user": user,
        "invites": invites,
    })))
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(connect).service(refresh).service(me);
}
