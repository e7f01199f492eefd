use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::web::{
    bill::data::BillForList,
    page::{ProofModal, VerticalLayout},
    routes::Route,
};

use super::error::Error;

pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Error rendering template: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error rendering template",
                )
                    .into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub layout: Option<VerticalLayout>,
    pub error: &'a str,
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    pub layout: Option<VerticalLayout>,
    pub refresh_secs: u64,
}

#[derive(Template)]
#[template(path = "bills.html")]
pub struct BillsTemplate<'a> {
    pub layout: Option<VerticalLayout>,
    pub csrf_token: &'a str,
    pub bills: Vec<BillForList>,
    pub modal: Option<&'a ProofModal>,
}

#[derive(Template)]
#[template(path = "new_bill.html")]
pub struct NewBillTemplate {
    pub layout: Option<VerticalLayout>,
    pub csrf_token: String,
    pub expense_types: &'static [&'static str],
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Option<VerticalLayout>,
    pub csrf_token: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let response = match self {
            Error::Unauthorized => return Redirect::to(Route::Login.path()).into_response(),
            Error::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("Internal Server Error"),
            ),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Forbidden => (StatusCode::FORBIDDEN, String::from("Forbidden")),
        };

        (
            response.0,
            HtmlTemplate(ErrorTemplate {
                layout: None,
                error: &response.1,
            }),
        )
            .into_response()
    }
}
