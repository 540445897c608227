use std::collections::{BTreeMap, BTreeSet};

use crate::config::ConfigStore;
use crate::data::filter::{
    bad_signals, good_signals, Comparator, FilterCondition, FilterRequest, MAX_CONDITIONS,
    FILTERABLE_COLUMNS,
};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a source is loaded).
    pub table: Option<Table>,

    /// Filter form contents, edited in place until applied.
    pub draft: Vec<FilterCondition>,

    /// Result of the last applied filter request (good signals only, or the
    /// unfiltered table after a rejected request).
    pub filtered: Option<Table>,

    /// Rows below the quality threshold, computed from the unfiltered table.
    pub bad: Option<Table>,

    /// Columns included when exporting the filtered table.
    pub export_columns: BTreeSet<String>,

    /// Persisted named configurations.
    pub store: ConfigStore,
    pub configs: BTreeMap<String, Vec<FilterCondition>>,

    /// Name field for saving the current draft.
    pub config_name: String,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::with_store(ConfigStore::default())
    }
}

impl AppState {
    pub fn with_store(store: ConfigStore) -> Self {
        let configs = store.load().unwrap_or_else(|e| {
            log::warn!("Failed to load filter configurations: {e}");
            BTreeMap::new()
        });
        AppState {
            table: None,
            draft: vec![default_condition()],
            filtered: None,
            bad: None,
            export_columns: BTreeSet::new(),
            store,
            configs,
            config_name: String::new(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded table: reset results, classify bad signals,
    /// select every column for export.
    pub fn set_table(&mut self, table: Table) {
        self.export_columns = table.column_names.iter().cloned().collect();
        self.filtered = None;
        self.status_message = None;

        match bad_signals(&table) {
            Ok(bad) => {
                log::info!(
                    "Loaded {} signals ({} below threshold)",
                    table.len(),
                    bad.len()
                );
                self.bad = Some(bad);
            }
            Err(e) => {
                log::error!("Signal classification failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.bad = None;
            }
        }
        self.table = Some(table);
    }

    /// Run the current draft against the loaded table. A rejected request
    /// (bad value or unknown column) falls back to the unfiltered table and
    /// reports the offending condition.
    pub fn apply_filters(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let request = FilterRequest::new(self.draft.clone());
        match request.apply(table) {
            Ok(result) => {
                log::info!(
                    "Filter request kept {} of {} signals",
                    result.len(),
                    table.len()
                );
                self.filtered = Some(result);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Filter request rejected: {e}");
                self.filtered = Some(table.clone());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Grow or shrink the draft to `n` conditions, keeping existing entries.
    pub fn resize_draft(&mut self, n: usize) {
        let n = n.clamp(1, MAX_CONDITIONS);
        self.draft.resize_with(n, default_condition);
    }

    /// Append the current draft to the store under `config_name`.
    pub fn save_config(&mut self) {
        let name = self.config_name.trim().to_string();
        match self.store.save(&name, &self.draft) {
            Ok(()) => {
                self.configs.insert(name.clone(), self.draft.clone());
                self.status_message = Some(format!("Configuration '{name}' saved."));
            }
            Err(e) => {
                log::error!("Saving configuration failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Replace the draft with a stored configuration.
    pub fn load_config(&mut self, name: &str) {
        if let Some(conditions) = self.configs.get(name) {
            self.draft = conditions.clone();
            self.status_message = Some(format!("Configuration '{name}' loaded."));
        }
    }

    /// The filtered table restricted to the export column selection.
    pub fn export_table(&self) -> Option<Table> {
        let filtered = self.filtered.as_ref()?;
        let columns: Vec<String> = filtered
            .column_names
            .iter()
            .filter(|c| self.export_columns.contains(*c))
            .cloned()
            .collect();
        Some(filtered.select_columns(&columns))
    }

    /// Good signals of the unfiltered table, for the overview panel.
    pub fn good(&self) -> Option<Table> {
        self.table.as_ref().and_then(|t| good_signals(t).ok())
    }
}

fn default_condition() -> FilterCondition {
    FilterCondition::new(FILTERABLE_COLUMNS[0], Comparator::Eq, "")
}
