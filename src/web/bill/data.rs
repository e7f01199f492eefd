use chrono::NaiveDate;
use serde::Deserialize;
use url::Url;

use crate::{db::bill::Bill, web::page::EyeIcon};

pub const EXPENSE_TYPES: &[&str] = &[
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

#[derive(Debug, Clone)]
pub struct BillForList {
    pub id: String,
    pub bill_type: String,
    pub name: String,
    pub date: String,
    pub amount: String,
    pub status: String,
    pub eye: Option<EyeIcon>,
}

impl From<&Bill> for BillForList {
    fn from(bill: &Bill) -> Self {
        Self {
            id: bill.id.clone(),
            bill_type: bill.bill_type.clone(),
            name: bill.name.clone(),
            date: format_date(&bill.date),
            amount: format_amount(bill.amount),
            status: bill.status.label().to_owned(),
            eye: EyeIcon::for_bill(bill),
        }
    }
}

pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn format_amount(amount: f64) -> String {
    format!("{amount} €")
}

/// Body of the new-bill button's form
#[derive(Debug, Clone, Deserialize)]
pub struct NewBillClick {
    #[serde(default)]
    pub csrf_token: String,
}

/// New-bill form fields. Missing fields come in empty so that `validate`
/// decides on every submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewBillData {
    pub expense_type: String,
    pub expense_name: String,
    pub date: String,
    pub amount: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
    pub file_url: String,
    pub csrf_token: String,
}

/// Default VAT percentage when the form leaves it empty
const DEFAULT_PCT: u32 = 20;

impl NewBillData {
    pub fn validate(&self) -> bool {
        if !EXPENSE_TYPES.contains(&self.expense_type.as_str()) {
            return false;
        }
        if self.expense_name.len() > 100 || self.commentary.len() > 1000 {
            return false;
        }
        if self.parse_date().is_none() || self.parse_amount().is_none() {
            return false;
        }
        if !self.pct.trim().is_empty() && self.parse_pct().is_none() {
            return false;
        }
        if !self.vat.trim().is_empty() && self.vat.trim().parse::<u32>().is_err() {
            return false;
        }
        if !self.file_url.trim().is_empty() && self.parse_file_url().is_none() {
            return false;
        }
        true
    }

    /// Builds a pending bill for `email`; `None` if the payload does not validate
    pub fn into_bill(self, email: &str) -> Option<Bill> {
        if !self.validate() {
            return None;
        }
        let date = self.parse_date()?;
        let amount = self.parse_amount()?;
        let pct = self.parse_pct().unwrap_or(DEFAULT_PCT);
        let file_url = self.parse_file_url();
        Some(Bill::new(
            email.to_owned(),
            self.expense_type,
            self.expense_name.trim().to_owned(),
            date,
            amount,
            self.vat.trim().to_owned(),
            pct,
            self.commentary,
            file_url,
        ))
    }

    fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    fn parse_amount(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite() && *a > 0.0)
    }

    fn parse_pct(&self) -> Option<u32> {
        self.pct.trim().parse::<u32>().ok().filter(|p| *p <= 100)
    }

    fn parse_file_url(&self) -> Option<Url> {
        Url::parse(self.file_url.trim())
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
    }
}
