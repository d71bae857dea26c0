use std::collections::{BTreeMap, BTreeSet};

use crate::config::FieldConfig;
use crate::form::FieldKey;

#[derive(Clone, Default)]
pub(crate) struct FieldRecord {
    pub(crate) config: FieldConfig,
    pub(crate) touched: bool,
}

#[derive(Default)]
pub(crate) struct FieldRegistry {
    records: BTreeMap<FieldKey, FieldRecord>,
}

impl FieldRegistry {
    pub(crate) fn record(&mut self, selector: FieldKey, config: Option<FieldConfig>) {
        let record = self.records.entry(selector).or_default();
        record.config = config.unwrap_or_default();
    }

    pub(crate) fn mark_touched(&mut self, selector: FieldKey) {
        self.records.entry(selector).or_default().touched = true;
    }

    pub(crate) fn get(&self, selector: FieldKey) -> Option<&FieldRecord> {
        self.records.get(&selector)
    }

    pub(crate) fn list(&self, touched_only: bool) -> Vec<(FieldKey, FieldRecord)> {
        self.records
            .iter()
            .filter(|(_, record)| !touched_only || record.touched)
            .map(|(selector, record)| (*selector, record.clone()))
            .collect()
    }

    pub(crate) fn touched_keys(&self) -> BTreeSet<FieldKey> {
        self.records
            .iter()
            .filter(|(_, record)| record.touched)
            .map(|(selector, _)| *selector)
            .collect()
    }
}
