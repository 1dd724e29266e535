use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::CookieJar, WithRejection};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MeResponse, SignupRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services::{self, Session},
        session::{clear_session, session_cookie},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

fn respond(state: &AppState, jar: CookieJar, session: Session) -> (CookieJar, Json<AuthResponse>) {
    let jar = jar.add(session_cookie(session.token, state.config.secure_cookies));
    (
        jar,
        Json(AuthResponse {
            success: true,
            user: session.user,
        }),
    )
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<SignupRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let keys = JwtKeys::from_ref(&state);
    let session = services::signup(state.users.as_ref(), &keys, payload).await?;
    Ok(respond(&state, jar, session))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let keys = JwtKeys::from_ref(&state);
    let session = services::login(state.users.as_ref(), &keys, payload).await?;
    Ok(respond(&state, jar, session))
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    info!("session cookie cleared");
    (clear_session(jar), Json(json!({ "success": true })))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id, email = %auth.email))]
pub async fn get_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<MeResponse>> {
    let user = services::current_user(state.users.as_ref(), auth.id).await?;
    Ok(Json(MeResponse { user }))
}

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, cookie, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn session_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn signup_then_duplicate_conflicts() {
        let app = build_app(AppState::fake());
        let body = json!({ "name": "Ana", "email": "ana@x.com", "password": "secret1" });

        let (status, cookie, json) = send(&app, post_json("/api/auth/signup", body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["email"], "ana@x.com");
        assert_eq!(json["user"]["name"], "Ana");
        assert!(json["user"].get("password").is_none());
        assert!(json["user"].get("passwordHash").is_none());
        assert!(json["user"].get("password_hash").is_none());

        let cookie = cookie.expect("session cookie");
        assert!(cookie.starts_with("auth-token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(!cookie.contains("Secure"));

        let (status, _, json) = send(&app, post_json("/api/auth/signup", body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn signup_accepts_single_label_domain() {
        let app = build_app(AppState::fake());
        let (status, cookie, json) = send(
            &app,
            post_json(
                "/api/auth/signup",
                json!({ "name": "Ana", "email": "ana@localhost", "password": "secret1" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["email"], "ana@localhost");
        assert!(cookie.is_some());
    }

    #[tokio::test]
    async fn signup_rejects_short_password_and_missing_fields() {
        let app = build_app(AppState::fake());
        let (status, cookie, _) = send(
            &app,
            post_json(
                "/api/auth/signup",
                json!({ "name": "Ana", "email": "ana@x.com", "password": "12345" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(cookie.is_none());

        let (status, _, _) = send(
            &app,
            post_json("/api/auth/signup", json!({ "email": "ana@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = build_app(AppState::fake());
        let req = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn login_wrong_password_then_success() {
        let app = build_app(AppState::fake());
        send(
            &app,
            post_json(
                "/api/auth/signup",
                json!({ "name": "Ana", "email": "ana@x.com", "password": "secret1" }),
            ),
        )
        .await;

        let (status, cookie, wrong) = send(
            &app,
            post_json("/api/auth/login", json!({ "email": "ana@x.com", "password": "wrong" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(cookie.is_none());

        let (status, _, unknown) = send(
            &app,
            post_json("/api/auth/login", json!({ "email": "who@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);

        let (status, cookie, json) = send(
            &app,
            post_json("/api/auth/login", json!({ "email": "ana@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["email"], "ana@x.com");
        assert!(cookie.unwrap().starts_with("auth-token="));
    }

    #[tokio::test]
    async fn login_missing_fields_is_bad_request() {
        let app = build_app(AppState::fake());
        let (status, _, _) =
            send(&app, post_json("/api/auth/login", json!({ "email": "ana@x.com" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn me_requires_session_and_logout_clears_cookie() {
        let app = build_app(AppState::fake());
        let (_, cookie, _) = send(
            &app,
            post_json(
                "/api/auth/signup",
                json!({ "name": "Ana", "email": "ana@x.com", "password": "secret1" }),
            ),
        )
        .await;
        let session = session_pair(&cookie.unwrap());

        let (status, _, _) = send(&app, Request::get("/api/auth/me").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = Request::get("/api/auth/me")
            .header(header::COOKIE, &session)
            .body(Body::empty())
            .unwrap();
        let (status, _, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["user"]["name"], "Ana");

        let req = Request::post("/api/auth/logout")
            .header(header::COOKIE, &session)
            .body(Body::empty())
            .unwrap();
        let (status, cookie, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        let cleared = cookie.expect("removal cookie");
        assert!(cleared.starts_with("auth-token="));
        assert!(cleared.contains("Max-Age=0"));
    }
}
