// Category x action cross-tabulation for stacked charts
use indexmap::{IndexMap, IndexSet};

use crate::aggregation::label_or_unknown;
use crate::models::{ActivityRecord, CrossTab, CrossTabRow};

/// Build one sparse row per category, in the order categories first appear.
///
/// `categories` and `actions` are the distinct labels in first-seen order;
/// renderers use them as the axis and stacking-series order.
pub fn build_cross_tab(records: &[ActivityRecord]) -> CrossTab {
    let mut categories: IndexSet<&str> = IndexSet::new();
    let mut actions: IndexSet<&str> = IndexSet::new();
    let mut matrix: IndexMap<&str, IndexMap<&str, usize>> = IndexMap::new();

    for record in records {
        let category = label_or_unknown(&record.category);
        let action = label_or_unknown(&record.action);

        categories.insert(category);
        actions.insert(action);

        *matrix
            .entry(category)
            .or_default()
            .entry(action)
            .or_insert(0) += 1;
    }

    let rows = matrix
        .into_iter()
        .map(|(category, counts)| CrossTabRow {
            category: category.to_string(),
            actions: counts
                .into_iter()
                .map(|(action, count)| (action.to_string(), count))
                .collect(),
        })
        .collect();

    CrossTab {
        rows,
        categories: categories.into_iter().map(str::to_string).collect(),
        actions: actions.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::UNKNOWN_LABEL;
    use std::collections::HashSet;

    fn records(pairs: &[(&str, &str)]) -> Vec<ActivityRecord> {
        pairs
            .iter()
            .map(|(c, a)| ActivityRecord::untimed(*c, *a))
            .collect()
    }

    #[test]
    fn test_empty_cross_tab() {
        let tab = build_cross_tab(&[]);
        assert!(tab.is_empty());
        assert!(tab.categories.is_empty());
        assert!(tab.actions.is_empty());
    }

    #[test]
    fn test_rows_are_sparse() {
        let tab = build_cross_tab(&records(&[
            ("OB", "PROCESS"),
            ("ACCOUNT", "EMAIL"),
            ("OB", "PROCESS"),
            ("OB", "WC"),
        ]));

        assert_eq!(tab.categories, vec!["OB", "ACCOUNT"]);
        assert_eq!(tab.actions, vec!["PROCESS", "EMAIL", "WC"]);

        let ob = tab.row("OB").unwrap();
        assert_eq!(ob.get("PROCESS"), 2);
        assert_eq!(ob.get("WC"), 1);
        assert!(!ob.actions.contains_key("EMAIL"));

        let account = tab.row("ACCOUNT").unwrap();
        assert_eq!(account.actions.len(), 1);
        assert_eq!(account.get("EMAIL"), 1);
    }

    #[test]
    fn test_labels_are_distinct_and_cover_every_record() {
        let recs = records(&[
            ("ACCOUNT", "EMAIL"),
            ("", "EMAIL"),
            ("ACCOUNT", ""),
            ("TEAM'S DEV", "MEETING"),
            ("ACCOUNT", "EMAIL"),
        ]);
        let tab = build_cross_tab(&recs);

        let cat_set: HashSet<_> = tab.categories.iter().collect();
        let act_set: HashSet<_> = tab.actions.iter().collect();
        assert_eq!(cat_set.len(), tab.categories.len());
        assert_eq!(act_set.len(), tab.actions.len());

        for r in &recs {
            let category = label_or_unknown(&r.category).to_string();
            let action = label_or_unknown(&r.action).to_string();
            assert!(tab.categories.contains(&category));
            assert!(tab.actions.contains(&action));
            assert!(tab.row(&category).unwrap().get(&action) >= 1);
        }

        let total: usize = tab.rows.iter().map(|r| r.total()).sum();
        assert_eq!(total, recs.len());
        assert!(tab.categories.iter().any(|c| c == UNKNOWN_LABEL));
    }

    #[test]
    fn test_row_serializes_flat() {
        let tab = build_cross_tab(&records(&[("OB", "PROCESS"), ("OB", "WC")]));
        let json = serde_json::to_value(&tab.rows[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"category": "OB", "PROCESS": 1, "WC": 1})
        );
    }
}
