//! spendsheet-sync: fetch the sheet and keep the expense store current

pub mod error;
pub mod source;
pub mod store;

pub use error::FetchError;
pub use source::{HttpSheetSource, SheetSource, SheetUrl, StaticSheetSource};
pub use store::{ExpenseStore, LoadState, RefreshOutcome, RefreshTicket};
