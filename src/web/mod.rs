use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_sessions::{
    Expiry, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::{Config, Ctx, web::routes::Route};

mod bill;
mod csrf;
mod error;
pub mod page;
pub mod routes;
pub mod session;
mod templates;
mod user;

#[cfg(test)]
mod test_util;

pub type Result<T> = std::result::Result<T, error::Error>;

pub const SESSION_EXPIRATION_SEC: i64 = 60 * 30; // 30 min
pub const USER: &str = "user";
pub const CSRF_TOKEN: &str = "csrf_token";

pub fn router(ctx: Ctx, cfg: &Config) -> Router {
    let sessions = SessionManagerLayer::new(ctx.session_store.clone())
        .with_secure(cfg.cookie_secure)
        .with_domain(cfg.domain.clone())
        .with_same_site(SameSite::Strict)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRATION_SEC,
        )))
        .with_http_only(true);

    let web = Router::new()
        .nest_service(
            "/static",
            ServeDir::new(format!("{}/static", env!("CARGO_MANIFEST_DIR"))),
        )
        .route("/health", get(health))
        .route(Route::Login.path(), get(user::login))
        .route("/login", post(user::do_login))
        .route("/logout", get(user::logout))
        .route(Route::Bills.path(), get(bill::ssr::list))
        .route(routes::NEW_BILL_ACTION, post(bill::ssr::click_new_bill))
        .route(
            Route::NewBill.path(),
            get(bill::ssr::new_bill).post(bill::ssr::create_bill),
        )
        .layer(sessions);
    Router::new().merge(web).with_state(ctx)
}

async fn health() -> Result<&'static str> {
    Ok("OK")
}
