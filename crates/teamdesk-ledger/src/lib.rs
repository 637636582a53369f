//! Ledger engine: chronological running balance over cashflow entries,
//! optionally restricted to one category first.
//!
//! The balance is a pure function of the input sequence and is
//! recomputed in full on every read. Callers reverse the result for
//! most-recent-first display; the attached balances stay correct
//! because they were computed in chronological order.

use serde::Serialize;
use teamdesk_types::{CashflowEntry, Category};

/// Category restriction for a ledger view. `All` is the unfiltered
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parses a `?cat=` query value. Absent, `all`, and unrecognized
    /// values all mean unfiltered.
    pub fn parse(value: Option<&str>) -> CategoryFilter {
        match value.and_then(Category::parse) {
            Some(category) => CategoryFilter::Only(category),
            None => CategoryFilter::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

/// An entry with its running balance attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalancedEntry {
    #[serde(flatten)]
    pub entry: CashflowEntry,
    pub balance: i64,
}

/// Restricts entries to the filter's category. Applied BEFORE balance
/// computation so per-category running balances are independent of
/// other categories' entries.
pub fn filter_by_category(entries: Vec<CashflowEntry>, filter: CategoryFilter) -> Vec<CashflowEntry> {
    match filter {
        CategoryFilter::All => entries,
        CategoryFilter::Only(category) => entries
            .into_iter()
            .filter(|e| e.category == category)
            .collect(),
    }
}

/// Strict left-to-right scan: each output entry carries the cumulative
/// sum of `amount` over itself and all prior entries. Input must
/// already be sorted ascending by `(transaction_date, id)`.
pub fn with_running_balance(entries: Vec<CashflowEntry>) -> Vec<BalancedEntry> {
    let mut balance = 0i64;
    entries
        .into_iter()
        .map(|entry| {
            balance += entry.amount;
            BalancedEntry { entry, balance }
        })
        .collect()
}
