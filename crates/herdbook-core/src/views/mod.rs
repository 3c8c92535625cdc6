//! Read-only projections of a [`Snapshot`](crate::state::Snapshot) for the
//! history, infirmary and location screens.

mod herd;
mod history;

pub use herd::*;
pub use history::*;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Records sharing a calendar year, newest first within the group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearGroup<T> {
    pub year: i32,
    pub items: Vec<T>,
}

/// Group `(date, item)` pairs by year: newest year first, newest date first
/// inside a year. Pairs with an unparseable date are dropped.
fn group_by_year<T>(dated: Vec<(String, T)>) -> Vec<YearGroup<T>> {
    let mut dated: Vec<(NaiveDate, T)> = dated
        .into_iter()
        .filter_map(|(date, item)| {
            NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .ok()
                .map(|date| (date, item))
        })
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut groups: Vec<YearGroup<T>> = Vec::new();
    for (date, item) in dated {
        match groups.last_mut() {
            Some(group) if group.year == date.year() => group.items.push(item),
            _ => groups.push(YearGroup {
                year: date.year(),
                items: vec![item],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_year() {
        let groups = group_by_year(vec![
            ("2023-06-01".to_string(), "b"),
            ("2024-01-15".to_string(), "c"),
            ("not a date".to_string(), "x"),
            ("2023-11-30".to_string(), "a"),
            ("2024-03-02".to_string(), "d"),
        ]);

        assert_eq!(
            groups,
            vec![
                YearGroup {
                    year: 2024,
                    items: vec!["d", "c"]
                },
                YearGroup {
                    year: 2023,
                    items: vec!["a", "b"]
                },
            ]
        );
    }

    #[test]
    fn test_group_empty() {
        assert!(group_by_year::<u8>(Vec::new()).is_empty());
    }
}
