use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    db::bill::{Bill, BillStore},
    web::{
        bill::view::{BillsViewState, PageFrame, bills_ui},
        error::FetchError,
        page::{Document, EyeIcon, ProofModal, VerticalLayout},
        routes::{Navigate, Route},
        session::SessionContext,
    },
};

/// Where a bills page visit stands
#[derive(Debug, Clone, PartialEq)]
pub enum PageState {
    Idle,
    Loading,
    Loaded(Vec<Bill>),
    Errored(FetchError),
}

/// Drives the bills page: fetches bills, reacts to the new-bill button and the eye icons.
/// One instance per page visit.
pub struct Bills {
    document: Document,
    navigator: Arc<dyn Navigate>,
    store: Option<Arc<dyn BillStore>>,
    session: SessionContext,
    state: PageState,
}

impl Bills {
    pub fn new(
        document: Document,
        navigator: Arc<dyn Navigate>,
        store: Option<Arc<dyn BillStore>>,
        session: SessionContext,
    ) -> Self {
        Self {
            document,
            navigator,
            store,
            session,
            state: PageState::Idle,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn handle_click_new_bill(&self) {
        self.navigator.navigate(Route::NewBill.path());
    }

    pub fn handle_click_icon_eye(&mut self, icon: &EyeIcon) {
        debug!("showing proof of bill {}", icon.bill_id);
        self.document.show_modal(ProofModal::new(&icon.bill_url));
    }

    /// Bills as the store has them. Without a store there is nothing to show.
    pub async fn get_bills(&self) -> Result<Vec<Bill>, FetchError> {
        let Some(store) = &self.store else {
            return Ok(vec![]);
        };
        store.list_bills().await.map_err(FetchError::from)
    }

    /// Fetches the bills, giving the store `patience` to answer. The page stays
    /// in `Loading` when it does not.
    pub async fn load(&mut self, patience: Duration) -> &PageState {
        self.state = PageState::Loading;
        match tokio::time::timeout(patience, self.get_bills()).await {
            Ok(Ok(bills)) => self.state = PageState::Loaded(bills),
            Ok(Err(e)) => {
                warn!("Error fetching bills: {e}");
                self.state = PageState::Errored(e);
            }
            Err(_) => debug!("bill store did not answer within {patience:?}"),
        }
        &self.state
    }

    /// Bills of the loaded page, if any
    pub fn bills(&self) -> &[Bill] {
        match &self.state {
            PageState::Loaded(bills) => bills.as_slice(),
            _ => &[],
        }
    }

    pub fn render(&self) -> askama::Result<String> {
        let state = match &self.state {
            PageState::Idle | PageState::Loading => BillsViewState::Loading,
            PageState::Loaded(bills) => BillsViewState::Data(bills),
            PageState::Errored(e) => BillsViewState::Error(e.message()),
        };
        let frame = PageFrame {
            layout: self
                .session
                .is_employee()
                .then(|| VerticalLayout::new(self.document.route())),
            csrf_token: self.session.csrf_token(),
            modal: self.document.modal(),
        };
        bills_ui(state, frame)
    }
}
