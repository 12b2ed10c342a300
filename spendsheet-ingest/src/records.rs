//! Turn decoded sheet rows into typed expenses.

use spendsheet_core::Expense;
use tracing::debug;

use crate::decode::decode_csv;
use crate::normalize::{normalize_amount, normalize_date};
use crate::types::{DecodedSheet, Header, RawRow};

const DATE_COLUMNS: &[&str] = &["date", "tanggal"];
const NAME_COLUMNS: &[&str] = &["name", "nama"];
const TOTAL_COLUMNS: &[&str] = &["total", "totalprice", "amount"];
const CATEGORY_COLUMNS: &[&str] = &["category", "jenis", "kategori"];
const SHOP_COLUMNS: &[&str] = &["shop", "toko", "store"];

/// Column index for each logical field, resolved once per sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub name: Option<usize>,
    pub total: Option<usize>,
    pub category: Option<usize>,
    pub shop: Option<usize>,
}

impl ColumnMap {
    pub fn from_header(header: &Header) -> Self {
        Self {
            date: header.position_of(DATE_COLUMNS),
            name: header.position_of(NAME_COLUMNS),
            total: header.position_of(TOTAL_COLUMNS),
            category: header.position_of(CATEGORY_COLUMNS),
            shop: header.position_of(SHOP_COLUMNS),
        }
    }

    fn get<'a>(&self, row: &'a RawRow, column: Option<usize>) -> &'a str {
        column.and_then(|i| row.cell(i)).unwrap_or("")
    }

    /// Build one expense, or `None` when the date cell does not parse.
    pub fn build(&self, row: &RawRow) -> Option<Expense> {
        let date = self.get(row, self.date);
        let parsed_date = normalize_date(date)?;

        Some(Expense::new(
            row.line,
            date,
            parsed_date,
            self.get(row, self.name),
            normalize_amount(self.get(row, self.total)),
            self.get(row, self.category),
            self.get(row, self.shop),
        ))
    }
}

/// Map every decoded row to an expense, skipping rows without a usable date.
pub fn build_expenses(sheet: &DecodedSheet) -> Vec<Expense> {
    let columns = ColumnMap::from_header(&sheet.header);
    if columns.date.is_none() && !sheet.rows.is_empty() {
        debug!(header = ?sheet.header.columns, "no date column; every row will be dropped");
    }

    let expenses: Vec<Expense> = sheet.rows.iter().filter_map(|row| columns.build(row)).collect();

    let undated = sheet.rows.len() - expenses.len();
    if undated > 0 {
        debug!(dropped = undated, "dropped rows with unparseable dates");
    }
    expenses
}

/// Decode a raw CSV payload and build its expenses.
pub fn parse_expenses(text: &str) -> Vec<Expense> {
    build_expenses(&decode_csv(text))
}
