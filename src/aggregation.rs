// Frequency counts over activity records
//
// Grouping is on the raw stored strings. Only empty values are rewritten,
// to UNKNOWN_LABEL; case and surrounding whitespace are kept as entered.
use indexmap::IndexMap;
use tracing::trace;

use crate::models::{ActionCount, ActivityRecord, CategoryActionCount, CategoryCount};

/// Placeholder label for an empty category or action
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default number of entries shown by summary cards
pub const DEFAULT_TOP_N: usize = 5;

pub fn label_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        UNKNOWN_LABEL
    } else {
        value
    }
}

/// Count labels in first-seen order, then stable-sort by descending count
fn tally<'a, I>(labels: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    // sort_by is stable, so ties keep insertion order
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

pub fn count_by_category(records: &[ActivityRecord]) -> Vec<CategoryCount> {
    let counts = tally(records.iter().map(|r| label_or_unknown(&r.category)));
    trace!("{} distinct categories", counts.len());

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

pub fn count_by_action(records: &[ActivityRecord]) -> Vec<ActionCount> {
    let counts = tally(records.iter().map(|r| label_or_unknown(&r.action)));
    trace!("{} distinct actions", counts.len());

    counts
        .into_iter()
        .map(|(action, count)| ActionCount {
            action: action.to_string(),
            count,
        })
        .collect()
}

pub fn count_by_category_action(records: &[ActivityRecord]) -> Vec<CategoryActionCount> {
    // Keyed on the pair itself, so labels containing separators stay intact
    let mut counts: IndexMap<(&str, &str), usize> = IndexMap::new();
    for record in records {
        let key = (
            label_or_unknown(&record.category),
            label_or_unknown(&record.action),
        );
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    sorted
        .into_iter()
        .map(|((category, action), count)| CategoryActionCount {
            category: category.to_string(),
            action: action.to_string(),
            count,
        })
        .collect()
}

/// First `n` items of an already sorted slice, or all of them if there are fewer
pub fn take_top<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, &str)]) -> Vec<ActivityRecord> {
        pairs
            .iter()
            .map(|(c, a)| ActivityRecord::untimed(*c, *a))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(count_by_category(&[]).is_empty());
        assert!(count_by_action(&[]).is_empty());
        assert!(count_by_category_action(&[]).is_empty());
    }

    #[test]
    fn test_count_by_category_sorted() {
        let recs = records(&[("OB", "PROCESS"), ("OB", "PROCESS"), ("ACCOUNT", "EMAIL")]);
        let counts = count_by_category(&recs);
        assert_eq!(
            counts,
            vec![
                CategoryCount {
                    category: "OB".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "ACCOUNT".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let recs = records(&[
            ("IB", "WC"),
            ("ACCOUNT", "SMS"),
            ("OB", "EMAIL"),
            ("ACCOUNT", "ENDO"),
            ("OB", "PROCESS"),
        ]);
        let labels: Vec<_> = count_by_category(&recs)
            .into_iter()
            .map(|c| c.category)
            .collect();
        // ACCOUNT and OB both have 2; ACCOUNT was seen first
        assert_eq!(labels, vec!["ACCOUNT", "OB", "IB"]);

        let actions: Vec<_> = count_by_action(&recs).into_iter().map(|c| c.action).collect();
        assert_eq!(actions, vec!["WC", "SMS", "EMAIL", "ENDO", "PROCESS"]);
    }

    #[test]
    fn test_empty_fields_become_unknown() {
        let recs = records(&[("", "")]);
        assert_eq!(count_by_category(&recs)[0].category, UNKNOWN_LABEL);
        assert_eq!(count_by_action(&recs)[0].action, UNKNOWN_LABEL);

        let pairs = count_by_category_action(&recs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].category, UNKNOWN_LABEL);
        assert_eq!(pairs[0].action, UNKNOWN_LABEL);
        assert_eq!(pairs[0].count, 1);
    }

    #[test]
    fn test_grouping_is_not_normalized() {
        let recs = records(&[("ib", " process "), ("IB", "PROCESS")]);
        let categories = count_by_category(&recs);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "ib");

        let actions = count_by_action(&recs);
        assert_eq!(actions[0].action, " process ");
    }

    #[test]
    fn test_pair_keys_with_underscores_stay_intact() {
        let recs = records(&[("TEAM_A", "CALL_BACK"), ("TEAM_A", "CALL_BACK")]);
        let pairs = count_by_category_action(&recs);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].category, "TEAM_A");
        assert_eq!(pairs[0].action, "CALL_BACK");
        assert_eq!(pairs[0].count, 2);
    }

    #[test]
    fn test_counts_sum_to_record_count_and_descend() {
        let recs = records(&[
            ("ACCOUNT", "EMAIL"),
            ("OB", "PROCESS"),
            ("OB", "PROCESS"),
            ("OB", "PROCESS"),
            ("TEAM'S DEV", "MEETING"),
            ("ACCOUNT", "ENDO"),
            ("", "PROCESS"),
            ("ACCOUNT", ""),
            ("ACCOUNT", "SMS"),
            ("ACCOUNT", "EMAIL"),
        ]);

        let by_category = count_by_category(&recs);
        let by_action = count_by_action(&recs);
        let by_pair = count_by_category_action(&recs);

        assert_eq!(by_category.iter().map(|c| c.count).sum::<usize>(), recs.len());
        assert_eq!(by_action.iter().map(|c| c.count).sum::<usize>(), recs.len());
        assert_eq!(by_pair.iter().map(|c| c.count).sum::<usize>(), recs.len());

        assert!(by_category.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(by_action.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(by_pair.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let recs = records(&[("OB", "WC"), ("IB", "WC"), ("OB", "WC")]);
        assert_eq!(count_by_category(&recs), count_by_category(&recs));
        assert_eq!(count_by_action(&recs), count_by_action(&recs));
        assert_eq!(count_by_category_action(&recs), count_by_category_action(&recs));
    }

    #[test]
    fn test_take_top() {
        let short = vec![3, 2, 1];
        assert_eq!(take_top(&short, DEFAULT_TOP_N), vec![3, 2, 1]);

        let long: Vec<usize> = (1..=10).rev().collect();
        assert_eq!(take_top(&long, DEFAULT_TOP_N), vec![10, 9, 8, 7, 6]);

        assert!(take_top(&long, 0).is_empty());
    }
}
