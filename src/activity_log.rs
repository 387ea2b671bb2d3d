// In-memory activity log for one session
//
// Every change is followed by a full recompute in report(); nothing is cached
// between calls.
use tracing::{debug, info};

use crate::aggregation::{count_by_action, count_by_category, count_by_category_action};
use crate::classifier::classify;
use crate::crosstab::build_cross_tab;
use crate::error::{Result, TallyError};
use crate::importer;
use crate::models::{ActivityRecord, ActivityReport};

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    records: Vec<ActivityRecord>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add records after the existing ones
    pub fn append(&mut self, records: Vec<ActivityRecord>) {
        self.records.extend(records);
    }

    /// Parse tab-separated text and append the result, returning how many were added
    pub fn import_text(&mut self, text: &str) -> Result<usize> {
        let records = importer::import(text)?;
        let added = records.len();
        self.append(records);
        debug!("Log now holds {} records", self.records.len());
        Ok(added)
    }

    /// Drop every record, returning how many were removed
    pub fn clear(&mut self) -> Result<usize> {
        if self.records.is_empty() {
            return Err(TallyError::NothingToClear);
        }

        let removed = self.records.len();
        self.records.clear();
        info!("All data has been cleared ({} records)", removed);
        Ok(removed)
    }

    /// Recompute every derived view from the current records
    pub fn report(&self) -> ActivityReport {
        build_report(&self.records)
    }
}

pub fn build_report(records: &[ActivityRecord]) -> ActivityReport {
    ActivityReport {
        total_records: records.len(),
        category_counts: count_by_category(records),
        action_counts: count_by_action(records),
        category_action_counts: count_by_category_action(records),
        cross_tab: build_cross_tab(records),
        counters: classify(records),
    }
}
