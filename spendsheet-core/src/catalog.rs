//! Distinct category list derived from the full expense collection

use std::collections::BTreeSet;

use crate::Expense;

/// Collect non-empty categories, deduplicated and sorted ascending.
pub fn extract_categories(expenses: &[Expense]) -> Vec<String> {
    expenses
        .iter()
        .map(|e| e.category.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn expense(id: usize, category: &str) -> Expense {
        let mut e = Expense::new(
            id,
            "01/01/2025",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            "x",
            1.0,
            "placeholder",
            "",
        );
        e.category = category.to_string();
        e
    }

    #[test]
    fn test_categories_sorted_and_deduplicated() {
        let data = vec![
            expense(1, "Transport"),
            expense(2, "Food"),
            expense(3, "Transport"),
            expense(4, "Bills"),
        ];
        assert_eq!(extract_categories(&data), vec!["Bills", "Food", "Transport"]);
    }

    #[test]
    fn test_empty_categories_skipped() {
        let data = vec![expense(1, ""), expense(2, "Food")];
        assert_eq!(extract_categories(&data), vec!["Food"]);
        assert!(extract_categories(&[]).is_empty());
    }

    #[test]
    fn test_case_variants_are_distinct() {
        let data = vec![expense(1, "food"), expense(2, "Food")];
        assert_eq!(extract_categories(&data), vec!["Food", "food"]);
    }
}
