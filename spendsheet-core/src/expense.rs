//! Expense record type produced by the ingestion pipeline

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder used when a row has no name
pub const UNNAMED: &str = "Unnamed";
/// Placeholder used when a row has no category
pub const OTHER_CATEGORY: &str = "Other";
/// Placeholder used when a row has no shop
pub const NO_SHOP: &str = "-";

/// One spending record from the sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    /// 1-based position among data rows; stable only within one fetch
    pub id: usize,
    /// Date cell exactly as it appeared in the sheet
    pub date: String,
    /// Calendar date the row was booked on
    pub parsed_date: NaiveDate,
    pub name: String,
    pub amount: f64,
    pub category: String,
    pub shop: String,
}

impl Expense {
    /// Create an Expense, substituting placeholders for empty text fields
    pub fn new(
        id: usize,
        date: impl Into<String>,
        parsed_date: NaiveDate,
        name: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        shop: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date: date.into(),
            parsed_date,
            name: or_placeholder(name.into(), UNNAMED),
            amount,
            category: or_placeholder(category.into(), OTHER_CATEGORY),
            shop: or_placeholder(shop.into(), NO_SHOP),
        }
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}
