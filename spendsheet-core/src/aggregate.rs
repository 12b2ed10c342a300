//! Totals over the active view

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Expense;

/// Spend summed over one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    /// YYYY-MM-DD
    pub date: String,
    pub total: f64,
}

/// Sum of amounts; 0 for an empty view
pub fn total_spent(view: &[Expense]) -> f64 {
    view.iter().map(|e| e.amount).sum()
}

/// Per-day sums, ascending by date.
pub fn daily_spending(view: &[Expense]) -> Vec<DailyTotal> {
    // NaiveDate keys sort chronologically
    let mut by_day = BTreeMap::new();
    for e in view {
        *by_day.entry(e.parsed_date).or_insert(0.0) += e.amount;
    }

    by_day
        .into_iter()
        .map(|(day, total)| DailyTotal {
            date: day.format("%Y-%m-%d").to_string(),
            total,
        })
        .collect()
}
