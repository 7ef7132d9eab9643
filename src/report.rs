use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// One bucket of an aggregation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GroupTotal {
    pub key: String,
    pub total: i64,
}

/// Groups documents by a key and sums a numeric field over each group.
/// Buckets appear in first-seen order, so ties later sorted by total keep
/// the order the documents were fetched in.
pub fn group_sum<T>(
    docs: &[T],
    key: impl Fn(&T) -> String,
    value: impl Fn(&T) -> i64,
) -> Vec<GroupTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, i64> = HashMap::new();

    for doc in docs {
        let k = key(doc);
        if !totals.contains_key(&k) {
            order.push(k.clone());
        }
        *totals.entry(k).or_insert(0) += value(doc);
    }

    order
        .into_iter()
        .map(|key| {
            let total = totals[&key];
            GroupTotal { key, total }
        })
        .collect()
}

pub fn group_count<T>(docs: &[T], key: impl Fn(&T) -> String) -> Vec<GroupTotal> {
    group_sum(docs, key, |_| 1)
}

/// Largest groups first; stable, so equal totals keep insertion order.
pub fn top_n(mut groups: Vec<GroupTotal>, n: usize) -> Vec<GroupTotal> {
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(n);
    groups
}

/// Calendar-day histogram, oldest day first.
pub fn per_day<T>(docs: &[T], date: impl Fn(&T) -> DateTime<Utc>) -> Vec<GroupTotal> {
    let mut groups = group_count(docs, |doc| date(doc).format("%Y-%m-%d").to_string());
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Order {
        item: String,
        quantity: i64,
        at: DateTime<Utc>,
    }

    fn order(item: &str, quantity: i64, day: u32) -> Order {
        Order {
            item: item.to_string(),
            quantity,
            at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn counts_group_in_first_seen_order() {
        let orders = vec![order("tea", 1, 1), order("samosa", 1, 1), order("tea", 1, 2)];

        let report = group_count(&orders, |o| o.item.clone());
        assert_eq!(
            report,
            vec![
                GroupTotal { key: "tea".into(), total: 2 },
                GroupTotal { key: "samosa".into(), total: 1 },
            ]
        );
    }

    #[test]
    fn sums_a_numeric_field() {
        let orders = vec![order("tea", 2, 1), order("tea", 3, 2), order("samosa", 5, 1)];

        let report = group_sum(&orders, |o| o.item.clone(), |o| o.quantity);
        assert_eq!(report[0], GroupTotal { key: "tea".into(), total: 5 });
        assert_eq!(report[1], GroupTotal { key: "samosa".into(), total: 5 });
    }

    #[test]
    fn top_n_breaks_ties_by_insertion_order() {
        let groups = vec![
            GroupTotal { key: "a".into(), total: 2 },
            GroupTotal { key: "b".into(), total: 5 },
            GroupTotal { key: "c".into(), total: 2 },
            GroupTotal { key: "d".into(), total: 1 },
        ];

        let top = top_n(groups, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].key, "b");
        // a and c tie at 2; a was seen first
        assert_eq!(top[1].key, "a");
        assert_eq!(top[2].key, "c");
    }

    #[test]
    fn per_day_sorts_by_calendar_day() {
        let orders = vec![order("tea", 1, 3), order("tea", 1, 1), order("tea", 1, 3)];

        let report = per_day(&orders, |o| o.at);
        assert_eq!(
            report,
            vec![
                GroupTotal { key: "2024-03-01".into(), total: 1 },
                GroupTotal { key: "2024-03-03".into(), total: 2 },
            ]
        );
    }
}
