//! Canonical bill dataset, used to seed the in-memory store and by tests.

use chrono::NaiveDate;
use url::Url;

use crate::db::bill::{Bill, BillStatus};

const STORAGE: &str = "https://test.storage.tld/v0/b/billable-677b6.appspot.com/o/justificatifs";

#[allow(clippy::too_many_arguments)]
fn bill(
    id: &str,
    bill_type: &str,
    name: &str,
    (y, m, d): (i32, u32, u32),
    amount: f64,
    vat: &str,
    status: BillStatus,
    commentary: &str,
    comment_admin: &str,
    file_name: &str,
    token: &str,
) -> Bill {
    Bill {
        id: id.to_owned(),
        email: "a@a".to_owned(),
        bill_type: bill_type.to_owned(),
        name: name.to_owned(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        amount,
        vat: vat.to_owned(),
        pct: 20,
        commentary: commentary.to_owned(),
        file_url: Url::parse(&format!("{STORAGE}%2F{file_name}?alt=media&token={token}")).ok(),
        file_name: Some(file_name.to_owned()),
        status,
        comment_admin: Some(comment_admin.to_owned()),
    }
}

/// Four bills, deliberately not stored in date order
pub fn bills() -> Vec<Bill> {
    vec![
        bill(
            "47qAXb6fIm2zOKkLzMro",
            "Hôtel et logement",
            "encore",
            (2004, 4, 4),
            400.0,
            "80",
            BillStatus::Pending,
            "séminaire billed",
            "ok",
            "preview-facture-free-201801-pdf-1.jpg",
            "c1640e12-a24b-4b11-ae52-529112e9602a",
        ),
        bill(
            "BeKy5Mo4jkmdfPGYpTxZ",
            "Transports",
            "test1",
            (2001, 1, 1),
            100.0,
            "",
            BillStatus::Refused,
            "plop",
            "en fait non",
            "1592770761.jpeg",
            "7685cd61-c112-42bc-9929-8a799bb82d8b",
        ),
        bill(
            "UIUZtnPQvnbFnB0ozvJh",
            "Services en ligne",
            "test3",
            (2003, 3, 3),
            300.0,
            "60",
            BillStatus::Accepted,
            "",
            "bon bah d'accord",
            "facture-client-php-exportee-dans-document-pdf-enregistre-sur-disque-dur.png",
            "571d34cb-9c8f-430a-af52-66221cae1da3",
        ),
        bill(
            "qcCK3SzECmaZAGRrHjaC",
            "Restaurants et bars",
            "test2",
            (2002, 2, 2),
            200.0,
            "40",
            BillStatus::Refused,
            "test2",
            "pas la bonne facture",
            "preview-facture-free-201801-pdf-1.jpg",
            "4df6ed2c-12c8-42a2-b013-346c1346f732",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn four_bills_with_unique_ids_and_proofs() {
        let bills = bills();
        assert_eq!(bills.len(), 4);
        let ids: HashSet<_> = bills.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        assert!(bills.iter().all(|b| b.file_url.is_some()));
    }
}
