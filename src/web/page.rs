//! Per-visit page model: which route is shown, the employee side bar,
//! and the proof modal opened from a bill's eye icon.

use url::Url;

use crate::{
    db::bill::{Bill, proof_file_name},
    web::routes::Route,
};

/// The page a container works on during one visit
#[derive(Debug, Clone)]
pub struct Document {
    route: Route,
    modal: Option<ProofModal>,
}

impl Document {
    pub fn new(route: Route) -> Self {
        Self { route, modal: None }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn modal(&self) -> Option<&ProofModal> {
        self.modal.as_ref()
    }

    /// Opens `modal`, replacing whatever modal was open
    pub fn show_modal(&mut self, modal: ProofModal) {
        self.modal = Some(modal);
    }
}

/// Side bar shown to employees, highlighting the icon of the current route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalLayout {
    active: Route,
}

impl VerticalLayout {
    pub fn new(active: Route) -> Self {
        Self { active }
    }

    pub fn bills_active(&self) -> bool {
        self.active == Route::Bills
    }

    pub fn new_bill_active(&self) -> bool {
        self.active == Route::NewBill
    }
}

/// The eye control of a bill row. Only bills with a proof get one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyeIcon {
    pub bill_id: String,
    pub bill_url: String,
}

impl EyeIcon {
    pub fn for_bill(bill: &Bill) -> Option<Self> {
        bill.file_url.as_ref().map(|url| Self {
            bill_id: bill.id.clone(),
            bill_url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofKind {
    Image,
    Pdf,
}

/// Modal previewing a bill's supporting document ("Justificatif")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofModal {
    pub url: String,
    pub file_name: String,
    pub kind: ProofKind,
}

impl ProofModal {
    pub fn new(bill_url: &str) -> Self {
        let path = Url::parse(bill_url)
            .map(|u| u.path().to_owned())
            .unwrap_or_else(|_| bill_url.split(['?', '#']).next().unwrap_or_default().to_owned());
        let file_name = proof_file_name(&path).unwrap_or_default().to_owned();
        let kind = if path.to_ascii_lowercase().ends_with(".pdf") {
            ProofKind::Pdf
        } else {
            ProofKind::Image
        };
        Self {
            url: bill_url.to_owned(),
            file_name,
            kind,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.kind == ProofKind::Pdf
    }
}
