use askama::Template;

use crate::{
    db::bill::Bill,
    web::{
        bill::data::BillForList,
        page::{ProofModal, VerticalLayout},
        templates::{BillsTemplate, ErrorTemplate, LoadingTemplate},
    },
};

/// Seconds before the loading page asks for the bills again
pub const LOADING_REFRESH_SECS: u64 = 1;

/// What the bills page has to show
#[derive(Debug, Clone, Copy)]
pub enum BillsViewState<'a> {
    Data(&'a [Bill]),
    Loading,
    Error(&'a str),
}

/// Surroundings of the bills view: side bar, open modal and the session's form token
#[derive(Debug, Clone, Copy, Default)]
pub struct PageFrame<'a> {
    pub layout: Option<VerticalLayout>,
    pub csrf_token: &'a str,
    pub modal: Option<&'a ProofModal>,
}

/// Renders the bills page. Bills are listed most recent first.
pub fn bills_ui(state: BillsViewState<'_>, frame: PageFrame<'_>) -> askama::Result<String> {
    match state {
        BillsViewState::Loading => LoadingTemplate {
            layout: frame.layout,
            refresh_secs: LOADING_REFRESH_SECS,
        }
        .render(),
        BillsViewState::Error(error) => ErrorTemplate {
            layout: frame.layout,
            error,
        }
        .render(),
        BillsViewState::Data(bills) => {
            let mut sorted: Vec<&Bill> = bills.iter().collect();
            sorted.sort_by(|a, b| b.date.cmp(&a.date));
            BillsTemplate {
                layout: frame.layout,
                csrf_token: frame.csrf_token,
                bills: sorted.into_iter().map(BillForList::from).collect(),
                modal: frame.modal,
            }
            .render()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::fixtures,
        web::{routes::Route, test_util::*},
    };

    #[test]
    fn bills_are_ordered_from_latest_to_earliest() {
        let bills = fixtures::bills();
        let html = bills_ui(BillsViewState::Data(&bills), PageFrame::default()).expect("render");
        let dates = texts(&html, r#"[data-testid="bill-date"]"#);
        assert_eq!(
            dates,
            vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]
        );
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn loading_shows_only_the_indicator() {
        let html = bills_ui(BillsViewState::Loading, PageFrame::default()).expect("render");
        assert_eq!(texts(&html, "#loading"), vec!["Loading..."]);
        assert!(texts(&html, r#"[data-testid="bill-row"]"#).is_empty());
        assert!(texts(&html, r#"[data-testid="btn-new-bill"]"#).is_empty());
    }

    #[test]
    fn error_shows_label_and_message() {
        let html = bills_ui(
            BillsViewState::Error("some error message"),
            PageFrame::default(),
        )
        .expect("render");
        assert_eq!(texts(&html, ".content-title"), vec!["Erreur"]);
        assert_eq!(
            texts(&html, r#"[data-testid="error-message"]"#),
            vec!["some error message"]
        );
    }

    #[test]
    fn eye_icons_carry_proof_urls() {
        let bills = fixtures::bills();
        let html = bills_ui(BillsViewState::Data(&bills), PageFrame::default()).expect("render");
        let urls = attrs(&html, r#"[data-testid="icon-eye"]"#, "data-bill-url");
        assert_eq!(urls.len(), 4);
        let latest = bills
            .iter()
            .max_by_key(|b| b.date)
            .and_then(|b| b.file_url.as_ref())
            .expect("latest bill has a proof");
        assert_eq!(urls[0], latest.as_str());
        assert_eq!(texts(&html, r#"[data-testid="btn-new-bill"]"#).len(), 1);
    }

    #[test]
    fn bill_without_proof_has_no_eye_icon() {
        let mut bills = fixtures::bills();
        bills[0].file_url = None;
        let html = bills_ui(BillsViewState::Data(&bills), PageFrame::default()).expect("render");
        assert_eq!(texts(&html, r#"[data-testid="bill-row"]"#).len(), 4);
        assert_eq!(texts(&html, r#"[data-testid="icon-eye"]"#).len(), 3);
    }

    #[test]
    fn empty_list_keeps_new_bill_button() {
        let html = bills_ui(BillsViewState::Data(&[]), PageFrame::default()).expect("render");
        assert!(texts(&html, r#"[data-testid="bill-row"]"#).is_empty());
        assert_eq!(texts(&html, r#"[data-testid="btn-new-bill"]"#).len(), 1);
    }

    #[test]
    fn frame_adds_layout_and_modal() {
        let bills = fixtures::bills();
        let modal = ProofModal::new("https://proofs.test.tld/2024/ticket.pdf");
        let frame = PageFrame {
            layout: Some(VerticalLayout::new(Route::Bills)),
            csrf_token: "t0k3n",
            modal: Some(&modal),
        };
        let html = bills_ui(BillsViewState::Data(&bills), frame).expect("render");
        assert_eq!(texts(&html, ".modal-title"), vec!["Justificatif"]);
        assert_eq!(
            attrs(&html, r#"[data-testid="proof-pdf"]"#, "data"),
            vec!["https://proofs.test.tld/2024/ticket.pdf"]
        );
        assert!(has_class(&html, r#"[data-testid="icon-window"]"#, "active-icon"));
        assert!(!has_class(&html, r#"[data-testid="icon-mail"]"#, "active-icon"));
        assert_eq!(
            attrs(&html, r#"form input[name="csrf_token"]"#, "value"),
            vec!["t0k3n"]
        );
    }
}
