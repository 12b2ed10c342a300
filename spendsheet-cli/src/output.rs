//! Terminal rendering of store views

use spendsheet_core::{DailyTotal, Expense};

/// Format an amount the way the sheet writes it: `Rp 12.500,50`
pub fn format_rupiah(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}Rp {grouped}")
    } else {
        format!("{sign}Rp {grouped},{frac:02}")
    }
}

pub fn print_expenses(expenses: &[Expense], limit: usize) {
    for e in expenses.iter().take(limit) {
        println!(
            "#{:<4} {} | {:<12} | {:<24} | {:>16} | {}",
            e.id,
            e.parsed_date.format("%Y-%m-%d"),
            e.category,
            e.name,
            format_rupiah(e.amount),
            e.shop
        );
    }
    if expenses.len() > limit {
        println!("... {} more", expenses.len() - limit);
    }
}

pub fn print_daily(days: &[DailyTotal]) {
    for d in days {
        println!("{}  {:>16}", d.date, format_rupiah(d.total));
    }
}
