//! In-memory expense store: the fetched collection plus its derived views.
//!
//! Refreshes are generation-tagged. Every refresh takes a `RefreshTicket`;
//! only the most recently issued ticket may replace the collection, so a slow
//! response that lands after a newer one is discarded.

use chrono::{NaiveDate, NaiveDateTime};
use spendsheet_core::time::month_bounds;
use spendsheet_core::{
    CategoryFilter, DailyTotal, DateRange, Expense, FilterState, apply_filters,
    daily_spending, extract_categories, total_spent,
};
use spendsheet_ingest::{looks_like_html, parse_expenses};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::source::SheetSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last refresh failed; the previous collection is still served
    Failed(String),
}

/// Issued by `begin_refresh`, redeemed by `complete_refresh`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// What a completed refresh did to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Collection replaced with `count` expenses
    Applied { count: usize },
    /// Fetch failed; collection left untouched
    Failed,
    /// A newer refresh was started; response ignored
    Stale,
}

#[derive(Debug, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    categories: Vec<String>,
    filter: FilterState,
    active: Vec<Expense>,
    state: LoadState,
    generation: u64,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a collection, in the `Ready` state
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        let mut store = Self::new();
        store.replace_expenses(expenses);
        store.state = LoadState::Ready;
        store
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn active_view(&self) -> &[Expense] {
        &self.active
    }

    pub fn total_spent(&self) -> f64 {
        total_spent(&self.active)
    }

    pub fn daily_spending(&self) -> Vec<DailyTotal> {
        daily_spending(&self.active)
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    /// Select a category; `"all"` clears the category filter.
    pub fn set_category(&mut self, category: &str) {
        self.filter.category = CategoryFilter::from_selection(category);
        self.recompute_view();
    }

    pub fn set_date_range(&mut self, from: NaiveDateTime, to: NaiveDateTime) {
        self.filter.date_range = Some(DateRange::new(from, to));
        self.recompute_view();
    }

    pub fn clear_date_range(&mut self) {
        self.filter.date_range = None;
        self.recompute_view();
    }

    /// Start a refresh. Any ticket issued earlier becomes stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        RefreshTicket(self.generation)
    }

    /// Apply a fetch result for `ticket`.
    ///
    /// Transport failures keep the current collection. An empty or HTML body
    /// empties it.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: Result<String>,
    ) -> RefreshOutcome {
        if ticket.0 != self.generation {
            warn!(
                ticket = ticket.0,
                latest = self.generation,
                "discarding response from superseded refresh"
            );
            return RefreshOutcome::Stale;
        }

        match fetched {
            Ok(body) => {
                if looks_like_html(&body) {
                    warn!("sheet returned an HTML page instead of CSV");
                }
                let expenses = parse_expenses(&body);
                let count = expenses.len();
                self.replace_expenses(expenses);
                self.state = LoadState::Ready;
                info!(
                    expenses = count,
                    categories = self.categories.len(),
                    "sheet refreshed"
                );
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                warn!(error = %e, "sheet refresh failed; keeping previous data");
                self.state = LoadState::Failed(e.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    /// Fetch, decode, rebuild and re-filter in one step.
    pub async fn refresh(&mut self, source: &dyn SheetSource) -> RefreshOutcome {
        let ticket = self.begin_refresh();
        let fetched = source.fetch().await;
        self.complete_refresh(ticket, fetched)
    }

    /// On first use, default the range to the month containing `today` and load.
    ///
    /// Does nothing when the collection is already populated.
    pub async fn initialize_default_range(
        &mut self,
        source: &dyn SheetSource,
        today: NaiveDate,
    ) -> Option<RefreshOutcome> {
        if !self.expenses.is_empty() {
            debug!("collection already loaded; keeping current range");
            return None;
        }
        let (first, last) = month_bounds(today);
        let range = DateRange::days(first, last);
        self.set_date_range(range.from, range.to);
        Some(self.refresh(source).await)
    }

    fn replace_expenses(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
        self.categories = extract_categories(&self.expenses);
        self.recompute_view();
    }

    fn recompute_view(&mut self) {
        self.active = apply_filters(&self.expenses, &self.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    const SHEET: &str = "Tanggal,Name,Total,Jenis\n\
                         01/01/2025,Coffee,Rp 15.000,Food\n\
                         02/01/2025,Bus,Rp 3.500,Transport\n";

    #[test]
    fn test_new_store_is_idle_and_empty() {
        let store = ExpenseStore::new();
        assert_eq!(store.load_state(), &LoadState::Idle);
        assert!(!store.is_loading());
        assert!(store.expenses().is_empty());
        assert_eq!(store.total_spent(), 0.0);
    }

    #[test]
    fn test_loading_flag_spans_the_fetch() {
        let mut store = ExpenseStore::new();
        let ticket = store.begin_refresh();
        assert!(store.is_loading());
        let outcome = store.complete_refresh(ticket, Ok(SHEET.to_string()));
        assert_eq!(outcome, RefreshOutcome::Applied { count: 2 });
        assert!(!store.is_loading());
        assert_eq!(store.categories(), ["Food", "Transport"]);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut store = ExpenseStore::new();
        let first = store.begin_refresh();
        let second = store.begin_refresh();

        assert_eq!(
            store.complete_refresh(second, Ok(SHEET.to_string())),
            RefreshOutcome::Applied { count: 2 }
        );
        assert_eq!(
            store.complete_refresh(first, Ok(String::new())),
            RefreshOutcome::Stale
        );
        assert_eq!(store.expenses().len(), 2);
        assert_eq!(store.load_state(), &LoadState::Ready);
    }

    #[test]
    fn test_older_completion_does_not_end_newer_loading() {
        let mut store = ExpenseStore::new();
        let first = store.begin_refresh();
        let _second = store.begin_refresh();
        store.complete_refresh(first, Ok(SHEET.to_string()));
        assert!(store.is_loading());
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_data() {
        let mut store = ExpenseStore::new();
        let t = store.begin_refresh();
        store.complete_refresh(t, Ok(SHEET.to_string()));

        let t = store.begin_refresh();
        let outcome = store.complete_refresh(t, Err(FetchError::Status { status: 500 }));
        assert_eq!(outcome, RefreshOutcome::Failed);
        assert_eq!(store.expenses().len(), 2);
        assert!(!store.is_loading());
        assert!(matches!(store.load_state(), LoadState::Failed(msg) if msg.contains("500")));
    }

    #[test]
    fn test_filters_rederive_from_full_collection() {
        let mut store = ExpenseStore::with_expenses(parse_expenses(SHEET));
        store.set_category("Food");
        assert_eq!(store.active_view().len(), 1);
        store.set_category("Transport");
        assert_eq!(store.active_view().len(), 1);
        assert_eq!(store.active_view()[0].name, "Bus");
        store.set_category("all");
        assert_eq!(store.active_view().len(), 2);
        assert_eq!(store.total_spent(), 18500.0);
    }
}
