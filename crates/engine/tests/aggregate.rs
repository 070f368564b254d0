use api_types::entry::{Entry, EntryKind};
use chrono::NaiveDate;

use engine::{
    MoneyCents,
    aggregate::{
        CategoryBucket, EntryFilter, RECENT_LIMIT, SortOrder, Totals, category_buckets,
        compute_totals, filter_and_sort, recent_by_type, type_total,
    },
};

fn entry(title: &str, kind: EntryKind, amount: f64, category: &str, date: &str) -> Entry {
    Entry {
        id: Some(format!("id-{title}")),
        kind,
        title: title.to_string(),
        amount: Some(amount),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        category: category.to_string(),
        paid_via: None,
        notes: None,
    }
}

fn worked_example() -> Vec<Entry> {
    vec![
        entry("salary", EntryKind::Income, 500.0, "Salary", "2024-01-05"),
        entry("lunch", EntryKind::Expense, 120.0, "Food", "2024-01-06"),
        entry("snacks", EntryKind::Expense, 80.0, "Food", "2024-01-01"),
    ]
}

/// A mixed list with repeated dates and odd amounts.
fn mixed() -> Vec<Entry> {
    let mut entries = vec![
        entry("a", EntryKind::Expense, 10.10, "Food", "2024-03-02"),
        entry("b", EntryKind::Income, 1000.0, "Salary", "2024-03-01"),
        entry("c", EntryKind::Expense, 0.20, "Travel", "2024-03-02"),
        entry("d", EntryKind::Expense, 99.99, "Food", "2024-02-28"),
        entry("e", EntryKind::Income, 0.01, "Other", "2024-03-02"),
        entry("f", EntryKind::Expense, 5.0, "Shopping", "2024-03-02"),
        entry("g", EntryKind::Income, 42.42, "Salary", "2024-01-15"),
    ];
    entries.push(Entry {
        amount: None,
        ..entry("h", EntryKind::Expense, 0.0, "", "2024-03-03")
    });
    entries
}

fn titles(view: &[&Entry]) -> Vec<String> {
    view.iter().map(|e| e.title.clone()).collect()
}

#[test]
fn worked_example_matches() {
    let entries = worked_example();

    assert_eq!(
        compute_totals(&entries),
        Totals {
            income: MoneyCents::new(500_00),
            expense: MoneyCents::new(200_00),
            balance: MoneyCents::new(300_00),
        }
    );

    assert_eq!(
        category_buckets(&entries, EntryKind::Expense),
        vec![CategoryBucket {
            name: "Food".to_string(),
            value: MoneyCents::new(200_00),
        }]
    );

    let dates: Vec<String> = filter_and_sort(&entries, EntryFilter::All, SortOrder::Latest)
        .iter()
        .map(|e| e.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2024-01-06", "2024-01-05", "2024-01-01"]);
}

#[test]
fn balance_is_exact_for_cent_amounts() {
    let entries = mixed();
    let totals = compute_totals(&entries);
    assert_eq!(totals.income.cents(), 1000_00 + 1 + 42_42);
    assert_eq!(totals.expense.cents(), 10_10 + 20 + 99_99 + 5_00);
    assert_eq!(totals.income - totals.expense, totals.balance);
}

#[test]
fn buckets_sum_to_type_totals() {
    let entries = mixed();
    let totals = compute_totals(&entries);
    for kind in [EntryKind::Income, EntryKind::Expense] {
        let sum: MoneyCents = category_buckets(&entries, kind)
            .iter()
            .map(|b| b.value)
            .sum();
        assert_eq!(sum, totals.for_kind(kind));
        assert_eq!(sum, type_total(&entries, kind));
    }
}

#[test]
fn missing_category_gets_its_own_bucket() {
    let buckets = category_buckets(&mixed(), EntryKind::Expense);
    let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Travel", "Shopping", ""]);
    assert_eq!(buckets[3].value, MoneyCents::ZERO);
}

#[test]
fn filter_all_keeps_everything_in_date_order() {
    let entries = mixed();

    let latest = filter_and_sort(&entries, EntryFilter::All, SortOrder::Latest);
    assert_eq!(latest.len(), entries.len());
    assert!(latest.windows(2).all(|w| w[0].date >= w[1].date));

    let oldest = filter_and_sort(&entries, EntryFilter::All, SortOrder::Oldest);
    assert_eq!(oldest.len(), entries.len());
    assert!(oldest.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn filter_by_type_keeps_only_that_type() {
    let entries = mixed();
    let income = filter_and_sort(&entries, EntryFilter::Income, SortOrder::Latest);
    assert_eq!(titles(&income), vec!["e", "b", "g"]);

    let expense = filter_and_sort(&entries, EntryFilter::Expense, SortOrder::Oldest);
    assert!(expense.iter().all(|e| e.kind == EntryKind::Expense));
    assert_eq!(expense.len(), 5);
}

#[test]
fn equal_dates_keep_input_order() {
    let entries = mixed();
    // a, c, e, f all fall on 2024-03-02.
    let latest = filter_and_sort(&entries, EntryFilter::All, SortOrder::Latest);
    assert_eq!(titles(&latest), vec!["h", "a", "c", "e", "f", "b", "d", "g"]);

    let oldest = filter_and_sort(&entries, EntryFilter::All, SortOrder::Oldest);
    assert_eq!(titles(&oldest), vec!["g", "d", "b", "a", "c", "e", "f", "h"]);
}

#[test]
fn input_is_left_untouched() {
    let entries = mixed();
    let before = entries.clone();
    let _ = filter_and_sort(&entries, EntryFilter::Expense, SortOrder::Oldest);
    let _ = recent_by_type(&entries, EntryKind::Income, 2);
    assert_eq!(entries, before);
}

#[test]
fn recent_income_is_a_capped_latest_first_subset() {
    let mut entries = mixed();
    for day in 10..=16 {
        entries.push(entry(
            &format!("extra{day}"),
            EntryKind::Income,
            1.0,
            "Other",
            &format!("2024-04-{day}"),
        ));
    }

    let recent = recent_by_type(&entries, EntryKind::Income, RECENT_LIMIT);
    assert_eq!(recent.len(), RECENT_LIMIT);
    assert!(recent.iter().all(|e| e.kind == EntryKind::Income));
    assert!(recent.windows(2).all(|w| w[0].date >= w[1].date));
    assert_eq!(recent[0].title, "extra16");
    assert!(recent.iter().all(|r| entries.iter().any(|e| e == *r)));
}

#[test]
fn recent_returns_everything_when_short() {
    let entries = worked_example();
    let recent = recent_by_type(&entries, EntryKind::Expense, RECENT_LIMIT);
    assert_eq!(titles(&recent), vec!["lunch", "snacks"]);
}
