// Activity records and the shapes derived from them
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::NamedCounters;

/// One logged (category, action) event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub category: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ActivityRecord {
    /// Create a record stamped with a fresh id and the current time
    pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            action: action.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a record without a timestamp
    pub fn untimed(category: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            ..Self::new(category, action)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCount {
    pub action: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryActionCount {
    pub category: String,
    pub action: String,
    pub count: usize,
}

/// Anything that carries a frequency, so top-N and chart code can share logic
pub trait Counted {
    fn label(&self) -> String;
    fn count(&self) -> usize;
}

impl Counted for CategoryCount {
    fn label(&self) -> String {
        self.category.clone()
    }

    fn count(&self) -> usize {
        self.count
    }
}

impl Counted for ActionCount {
    fn label(&self) -> String {
        self.action.clone()
    }

    fn count(&self) -> usize {
        self.count
    }
}

impl Counted for CategoryActionCount {
    fn label(&self) -> String {
        format!("{} / {}", self.category, self.action)
    }

    fn count(&self) -> usize {
        self.count
    }
}

/// One stacked-chart row: a category plus counts for the actions seen under it.
///
/// Sparse: actions never observed for this category are absent, not zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTabRow {
    pub category: String,
    #[serde(flatten)]
    pub actions: IndexMap<String, usize>,
}

impl CrossTabRow {
    pub fn get(&self, action: &str) -> usize {
        self.actions.get(action).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.actions.values().sum()
    }
}

/// Category x action matrix plus its axis labels in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    pub rows: Vec<CrossTabRow>,
    pub categories: Vec<String>,
    pub actions: Vec<String>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, category: &str) -> Option<&CrossTabRow> {
        self.rows.iter().find(|r| r.category == category)
    }
}

/// Every derived view of one snapshot of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub total_records: usize,
    pub category_counts: Vec<CategoryCount>,
    pub action_counts: Vec<ActionCount>,
    pub category_action_counts: Vec<CategoryActionCount>,
    pub cross_tab: CrossTab,
    pub counters: NamedCounters,
}

impl ActivityReport {
    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }
}
