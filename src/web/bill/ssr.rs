use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::error;

use crate::{
    Ctx,
    web::{
        Result,
        bill::{
            container::{Bills, PageState},
            data::{EXPENSE_TYPES, NewBillClick, NewBillData},
        },
        csrf::verify_csrf,
        error::Error,
        page::{Document, EyeIcon, VerticalLayout},
        routes::{RedirectNavigator, Route},
        session::SessionContext,
        templates::{HtmlTemplate, NewBillTemplate},
    },
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Id of the bill whose proof is shown in the modal
    pub proof: Option<String>,
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(ctx, session))]
pub async fn list(
    State(ctx): State<Ctx>,
    session: SessionContext,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    session.require_employee()?;

    let mut bills = Bills::new(
        Document::new(Route::Bills),
        Arc::new(RedirectNavigator::default()),
        Some(ctx.bill_store.clone()),
        session,
    );
    let status = match bills.load(ctx.config.fetch_timeout()).await {
        PageState::Errored(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };

    if let Some(id) = query.proof
        && matches!(bills.state(), PageState::Loaded(_))
    {
        let icon = bills
            .bills()
            .iter()
            .find(|b| b.id == id)
            .and_then(EyeIcon::for_bill)
            .ok_or_else(|| Error::NotFound("no proof for this bill".to_string()))?;
        bills.handle_click_icon_eye(&icon);
    }

    let html = bills.render().map_err(|e| {
        error!("Error rendering bills page: {e}");
        Error::Internal
    })?;
    Ok((status, Html(html)))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session, raw_session, payload))]
pub async fn click_new_bill(
    session: SessionContext,
    raw_session: Session,
    Form(payload): Form<NewBillClick>,
) -> Result<impl IntoResponse> {
    session.require_employee()?;
    verify_csrf(&payload.csrf_token, &raw_session)
        .await
        .map_err(|_| Error::Forbidden)?;

    let navigator = Arc::new(RedirectNavigator::default());
    let bills = Bills::new(
        Document::new(Route::Bills),
        navigator.clone(),
        None,
        session,
    );
    bills.handle_click_new_bill();

    let target = navigator
        .target()
        .and_then(|path| Route::from_path(&path))
        .unwrap_or(Route::Bills);
    Ok(Redirect::to(target.path()))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(session))]
pub async fn new_bill(session: SessionContext) -> Result<impl IntoResponse> {
    session.require_employee()?;
    Ok(HtmlTemplate(NewBillTemplate {
        layout: Some(VerticalLayout::new(Route::NewBill)),
        csrf_token: session.csrf_token().to_owned(),
        expense_types: EXPENSE_TYPES,
        error: None,
    }))
}

#[tracing::instrument(level = tracing::Level::DEBUG, skip(ctx, session, raw_session, payload))]
pub async fn create_bill(
    State(ctx): State<Ctx>,
    session: SessionContext,
    raw_session: Session,
    Form(payload): Form<NewBillData>,
) -> Result<impl IntoResponse> {
    let user = session.require_employee()?;
    verify_csrf(&payload.csrf_token, &raw_session)
        .await
        .map_err(|_| Error::Forbidden)?;

    let Some(bill) = payload.into_bill(&user.email) else {
        let page = NewBillTemplate {
            layout: Some(VerticalLayout::new(Route::NewBill)),
            csrf_token: session.csrf_token().to_owned(),
            expense_types: EXPENSE_TYPES,
            error: Some("Formulaire invalide".to_string()),
        };
        return Ok((StatusCode::BAD_REQUEST, HtmlTemplate(page)).into_response());
    };

    ctx.bill_store.add_bill(&bill).await.map_err(|e| {
        error!("Error creating bill {}: {e}", bill.id);
        Error::Internal
    })?;
    tracing::info!("bill {} created by {}", bill.id, user.email);

    Ok(Redirect::to(Route::Bills.path()).into_response())
}
