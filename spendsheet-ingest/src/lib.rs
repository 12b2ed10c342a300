//! spendsheet-ingest: sheet CSV decoding, value normalization and record building.

pub mod decode;
pub mod normalize;
pub mod records;
pub mod types;

pub use decode::{decode_csv, looks_like_html};
pub use normalize::{normalize_amount, normalize_date};
pub use records::{ColumnMap, build_expenses, parse_expenses};
pub use types::{DecodedSheet, Header, RawRow};
