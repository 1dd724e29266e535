use anyhow::Context;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{
    dto::{LoginRequest, PublicUser, SignupRequest},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::NewUser,
};
use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_LEN: usize = 6;

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

// bcrypt is CPU bound; keep it off the async workers.
async fn hash_off_thread(password: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("hash task")?
}

async fn verify_off_thread(password: String, hash: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("verify task")?
}

/// A user together with the session token issued for them.
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

pub async fn signup(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: SignupRequest,
) -> ApiResult<Session> {
    let (Some(name), Some(email), Some(password)) = (
        required(req.name),
        required(req.email),
        required(req.password),
    ) else {
        return Err(ApiError::Validation(
            "Name, email, and password are required".into(),
        ));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(ApiError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict(
            "User already exists with this email".into(),
        ));
    }

    let password_hash = hash_off_thread(password).await?;
    let user = users
        .create(NewUser {
            name,
            email,
            password_hash,
        })
        .await?;

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Session {
        user: user.into(),
        token,
    })
}

pub async fn login(users: &dyn UserStore, keys: &JwtKeys, req: LoginRequest) -> ApiResult<Session> {
    let (Some(email), Some(password)) = (required(req.email), required(req.password)) else {
        return Err(ApiError::Validation(
            "Email and password are required".into(),
        ));
    };

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::invalid_credentials());
    };

    match verify_off_thread(password, user.password_hash.clone()).await {
        Ok(true) => {}
        Ok(false) => {
            warn!(user_id = %user.id, "login invalid password");
            return Err(ApiError::invalid_credentials());
        }
        Err(e) => {
            error!(user_id = %user.id, error = ?e, "stored password hash unusable");
            return Err(ApiError::invalid_credentials());
        }
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Session {
        user: user.into(),
        token,
    })
}

pub async fn current_user(users: &dyn UserStore, user_id: Uuid) -> ApiResult<PublicUser> {
    match users.find_by_id(user_id).await? {
        Some(user) => Ok(user.into()),
        None => {
            warn!(user_id = %user_id, "session for unknown user");
            Err(ApiError::not_authenticated())
        }
    }
}
