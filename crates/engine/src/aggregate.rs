//! Derived figures for the views: totals, category buckets, filtered lists.
//!
//! Every function here is a pure transformation of an entry snapshot. None of
//! them fail: an amount the server sent as garbage counts as zero, and a
//! missing category is the `""` bucket.

use std::collections::HashMap;

use api_types::entry::{Entry, EntryKind};

use crate::MoneyCents;

/// Number of entries per type shown on the dashboard.
pub const RECENT_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
    /// `income - expense`.
    pub balance: MoneyCents,
}

impl Totals {
    pub fn for_kind(&self, kind: EntryKind) -> MoneyCents {
        match kind {
            EntryKind::Income => self.income,
            EntryKind::Expense => self.expense,
        }
    }
}

/// A category-level subtotal, one slice of a chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryBucket {
    pub name: String,
    pub value: MoneyCents,
}

impl CategoryBucket {
    /// Percentage of `total` this bucket represents, truncated; 0 for a
    /// non-positive total.
    pub fn share_of(&self, total: MoneyCents) -> u16 {
        if total.cents() <= 0 {
            return 0;
        }
        let pct = (self.value.cents() as f64 / total.cents() as f64) * 100.0;
        pct.clamp(0.0, 100.0) as u16
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl EntryFilter {
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Income => entry.kind == EntryKind::Income,
            Self::Expense => entry.kind == EntryKind::Expense,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Cycles All → Income → Expense → All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Income,
            Self::Income => Self::Expense,
            Self::Expense => Self::All,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Latest,
    Oldest,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            Self::Latest => "Sort by Date - Latest",
            Self::Oldest => "Sort by Date - Oldest",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Latest => Self::Oldest,
            Self::Oldest => Self::Latest,
        }
    }
}

/// Amount of one entry in cents; missing or non-numeric amounts count as zero.
pub fn entry_amount(entry: &Entry) -> MoneyCents {
    entry
        .amount
        .map(MoneyCents::from_major)
        .unwrap_or_default()
}

pub fn compute_totals(entries: &[Entry]) -> Totals {
    let mut totals = Totals::default();
    for entry in entries {
        match entry.kind {
            EntryKind::Income => totals.income += entry_amount(entry),
            EntryKind::Expense => totals.expense += entry_amount(entry),
        }
    }
    totals.balance = totals.income - totals.expense;
    totals
}

/// Sum of the amounts of every entry of `kind`.
pub fn type_total(entries: &[Entry], kind: EntryKind) -> MoneyCents {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(entry_amount)
        .sum()
}

/// Groups the entries of `kind` by category, in first-seen order.
pub fn category_buckets(entries: &[Entry], kind: EntryKind) -> Vec<CategoryBucket> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<CategoryBucket> = Vec::new();

    for entry in entries.iter().filter(|entry| entry.kind == kind) {
        let amount = entry_amount(entry);
        match index.get(entry.category.as_str()) {
            Some(&pos) => buckets[pos].value += amount,
            None => {
                index.insert(entry.category.as_str(), buckets.len());
                buckets.push(CategoryBucket {
                    name: entry.category.clone(),
                    value: amount,
                });
            }
        }
    }

    buckets
}

/// Entries matching `filter`, stably sorted by date according to `order`.
pub fn filter_and_sort(entries: &[Entry], filter: EntryFilter, order: SortOrder) -> Vec<&Entry> {
    let mut view: Vec<&Entry> = entries.iter().filter(|e| filter.matches(e)).collect();
    // `sort_by` is stable: equal dates keep their input order in both directions.
    match order {
        SortOrder::Latest => view.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => view.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    view
}

/// The `limit` most recent entries of `kind`, latest first.
pub fn recent_by_type(entries: &[Entry], kind: EntryKind, limit: usize) -> Vec<&Entry> {
    let filter = match kind {
        EntryKind::Income => EntryFilter::Income,
        EntryKind::Expense => EntryFilter::Expense,
    };
    let mut view = filter_and_sort(entries, filter, SortOrder::Latest);
    view.truncate(limit);
    view
}
