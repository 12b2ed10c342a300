//! Filter engine: date range AND category over the full collection.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{end_of_day, start_of_day};
use crate::Expense;

/// Sentinel value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

/// Inclusive date range. Time of day on either bound is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl DateRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// Range covering whole calendar days `from..=to`
    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: start_of_day(from),
            to: start_of_day(to),
        }
    }

    /// Bounds stretched to the start of `from`'s day and the end of `to`'s day.
    pub fn normalized(&self) -> (NaiveDateTime, NaiveDateTime) {
        (start_of_day(self.from.date()), end_of_day(self.to.date()))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        let (from, to) = self.normalized();
        let at = start_of_day(day);
        at >= from && at <= to
    }
}

/// Selected category: everything, or one exact label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Map a UI selection to a filter; `"all"` is the sentinel.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(selection.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn as_selection(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(c) => c,
        }
    }
}

/// Current filter settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// `None` means no date filter
    pub date_range: Option<DateRange>,
    pub category: CategoryFilter,
}

impl FilterState {
    pub fn matches(&self, expense: &Expense) -> bool {
        let in_range = self
            .date_range
            .map_or(true, |range| range.contains(expense.parsed_date));
        in_range && self.category.matches(&expense.category)
    }
}

/// Recompute the active view from the full collection.
pub fn apply_filters(expenses: &[Expense], state: &FilterState) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|e| state.matches(e))
        .cloned()
        .collect()
}
