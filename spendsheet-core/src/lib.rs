//! spendsheet-core: expense records and the views derived from them

pub mod aggregate;
pub mod catalog;
pub mod expense;
pub mod filter;
pub mod time;

pub use aggregate::{DailyTotal, daily_spending, total_spent};
pub use catalog::extract_categories;
pub use expense::{Expense, NO_SHOP, OTHER_CATEGORY, UNNAMED};
pub use filter::{ALL_CATEGORIES, CategoryFilter, DateRange, FilterState, apply_filters};
