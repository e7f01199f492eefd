use std::{fmt, str::FromStr};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use url::Url;
use uuid::Uuid;

use crate::db::PostgresStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    /// Label shown to employees
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refusé",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(anyhow!("unknown bill status: {other}")),
        }
    }
}

/// An expense report line, as handed out by the bill store
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub vat: String,
    pub pct: u32,
    #[serde(default)]
    pub commentary: String,
    pub file_url: Option<Url>,
    pub file_name: Option<String>,
    pub status: BillStatus,
    pub comment_admin: Option<String>,
}

impl Bill {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        email: String,
        bill_type: String,
        name: String,
        date: NaiveDate,
        amount: f64,
        vat: String,
        pct: u32,
        commentary: String,
        file_url: Option<Url>,
    ) -> Self {
        let file_name = file_url
            .as_ref()
            .and_then(|u| proof_file_name(u.path()))
            .map(str::to_owned);
        Self {
            id: Uuid::new_v4().simple().to_string(),
            email,
            bill_type,
            name,
            date,
            amount,
            vat,
            pct,
            commentary,
            file_url,
            file_name,
            status: BillStatus::Pending,
            comment_admin: None,
        }
    }
}

/// File name of a proof from its URL path. Storage paths may carry an
/// encoded folder separator (`justificatifs%2Ffacture.jpg`).
pub fn proof_file_name(path: &str) -> Option<&str> {
    path.rsplit('/')
        .next()?
        .rsplit("%2F")
        .next()?
        .rsplit("%2f")
        .next()
        .filter(|name| !name.is_empty())
}

#[async_trait]
pub trait BillStore: Send + Sync {
    async fn list_bills(&self) -> Result<Vec<Bill>, anyhow::Error>;
    async fn add_bill(&self, bill: &Bill) -> Result<(), anyhow::Error>;
}

#[async_trait]
impl BillStore for PostgresStore {
    async fn list_bills(&self) -> Result<Vec<Bill>, anyhow::Error> {
        let rows = self
            .pool
            .get()
            .await?
            .query(
                "SELECT id, email, bill_type, name, date, amount, vat, pct, commentary, file_url, file_name, status, comment_admin FROM bills ORDER BY date DESC",
                &[],
            )
            .await?;

        rows.iter().map(row_to_bill).collect()
    }

    async fn add_bill(&self, bill: &Bill) -> Result<(), anyhow::Error> {
        let pct = i32::try_from(bill.pct)?;
        self.pool
            .get()
            .await?
            .execute(
                r#"INSERT INTO bills
                        (id, email, bill_type, name, date, amount, vat, pct, commentary, file_url, file_name, status, comment_admin)
                    VALUES
                        ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
                &[
                    &bill.id,
                    &bill.email,
                    &bill.bill_type,
                    &bill.name,
                    &bill.date,
                    &bill.amount,
                    &bill.vat,
                    &pct,
                    &bill.commentary,
                    &bill.file_url.as_ref().map(|u| u.to_string()),
                    &bill.file_name,
                    &bill.status.as_str(),
                    &bill.comment_admin,
                ],
            )
            .await?;
        Ok(())
    }
}

fn row_to_bill(row: &Row) -> Result<Bill, anyhow::Error> {
    let file_url = row
        .get::<usize, Option<String>>(9)
        .map(|u| Url::parse(&u))
        .transpose()?;
    let pct: i32 = row.get(7);

    Ok(Bill {
        id: row.get(0),
        email: row.get(1),
        bill_type: row.get(2),
        name: row.get(3),
        date: row.get(4),
        amount: row.get(5),
        vat: row.get(6),
        pct: u32::try_from(pct)?,
        commentary: row.get(8),
        file_url,
        file_name: row.get(10),
        status: BillStatus::from_str(&row.get::<usize, String>(11))?,
        comment_admin: row.get(12),
    })
}
