use axum::{
    Form,
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::error;

mod data;

use crate::web::{
    Result, USER,
    csrf::{gen_csrf, verify_csrf},
    error::Error,
    routes::Route,
    session::{SessionUser, UserType},
    templates::{HtmlTemplate, LoginTemplate},
    user::data::LoginData,
};

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session))]
pub async fn login(session: Session) -> Result<impl IntoResponse> {
    tracing::debug!("login called");
    Ok(HtmlTemplate(LoginTemplate {
        layout: None,
        csrf_token: gen_csrf(&session).await.map_err(|_| Error::Internal)?,
    }))
}

/// Signs an employee in. Credentials are not checked here; the session only
/// records who is using the pages.
#[tracing::instrument(level = tracing::Level::DEBUG, skip(session, payload))]
pub async fn do_login(session: Session, Form(payload): Form<LoginData>) -> Result<impl IntoResponse> {
    tracing::debug!("do login called");
    verify_csrf(&payload.csrf_token, &session)
        .await
        .map_err(|_| Error::Forbidden)?;
    if !payload.validate() {
        return Err(Error::BadRequest("invalid payload".to_string()));
    }

    session
        .insert(
            USER,
            SessionUser {
                user_type: UserType::Employee,
                email: payload.email.trim().to_owned(),
            },
        )
        .await
        .map_err(|e| {
            error!("error putting user in session: {e}");
            Error::Internal
        })?;

    Ok(Redirect::to(Route::Bills.path()).into_response())
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    tracing::debug!("logout called");
    session.delete().await.map_err(|e| {
        error!("Error logging out: {e}");
        Error::Internal
    })?;
    Ok(Redirect::to(Route::Login.path()))
}
