//! CSV decoder for published sheet exports.
//!
//! Expected shape (Google Sheets "publish to web" / gviz CSV):
//!   Tanggal,Name,Total,Jenis,Shop
//!   01/01/2025,Coffee,"Rp 15.000",Food,Kopi Kenangan
//!
//! Decoding is best-effort and line by line: blank lines and rows shorter
//! than the header are dropped, and an HTML error page decodes to an empty
//! sheet.

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::types::{DecodedSheet, Header, RawRow};

// Only the start of the body is inspected when sniffing for HTML
const SNIFF_LEN: usize = 1024;

/// True when the payload is an HTML page rather than CSV.
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text
        .trim_start()
        .chars()
        .take(SNIFF_LEN)
        .collect::<String>()
        .to_lowercase();
    head.starts_with('<') || head.contains("<!doctype html") || head.contains("<html")
}

fn clean_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}

/// Comma split with every quote removed
fn plain_split(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.replace('"', "").trim().to_string())
        .collect()
}

/// Decode one physical line. A bad quote only costs its own line.
fn split_line(line: &str) -> Vec<String> {
    if line.matches('"').count() % 2 == 1 {
        return plain_split(line);
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    match rdr.records().next() {
        Some(Ok(record)) => record.iter().map(clean_cell).collect(),
        Some(Err(e)) => {
            debug!(error = %e, "unreadable CSV line, splitting on commas");
            plain_split(line)
        }
        None => Vec::new(),
    }
}

/// Split a sheet export into its header and data rows.
pub fn decode_csv(text: &str) -> DecodedSheet {
    if text.trim().is_empty() {
        debug!("empty payload");
        return DecodedSheet::default();
    }
    if looks_like_html(text) {
        debug!("payload is HTML, not CSV");
        return DecodedSheet::default();
    }

    let mut header: Option<Header> = None;
    let mut rows = Vec::new();
    let mut line = 0usize;
    let mut short = 0usize;

    for raw in text.lines() {
        if raw.trim().is_empty() {
            continue;
        }
        let cells = split_line(raw);

        let Some(width) = header.as_ref().map(Header::len) else {
            header = Some(Header::from_cells(&cells));
            continue;
        };

        line += 1;
        if cells.len() < width {
            short += 1;
            continue;
        }
        rows.push(RawRow { line, cells });
    }

    if short > 0 {
        debug!(dropped = short, "dropped rows shorter than the header");
    }

    DecodedSheet {
        header: header.unwrap_or_default(),
        rows,
    }
}
