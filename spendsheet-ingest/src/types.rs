use serde::{Deserialize, Serialize};

/// Normalized header row: trimmed, lower-cased, `#` removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub columns: Vec<String>,
}

impl Header {
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            columns: cells.into_iter().map(|c| normalize_key(c.as_ref())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the first column matching any of `names` (already lower-case)
    pub fn position_of(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.columns.iter().position(|c| c == name))
    }
}

/// Lookup key for a header cell
pub fn normalize_key(cell: &str) -> String {
    cell.replace('#', "").trim().to_lowercase()
}

/// One data line of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based position among data lines
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// Output of the CSV decoder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSheet {
    pub header: Header,
    pub rows: Vec<RawRow>,
}

impl DecodedSheet {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
