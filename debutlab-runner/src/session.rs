//! Session: explicit run state around a loaded canonical table.
//!
//! The session holds what the explorer needs between interactions: the
//! canonical table (built once per load, shared read-only), the criteria most
//! recently submitted, and the outcome of the last run. Nothing runs until the
//! first trigger; after that every submitted criteria change re-executes the
//! pure pipeline from the canonical table until the session is reset. The
//! newest run replaces the previous outcome.

use std::sync::Arc;

use tracing::{debug, info};

use debutlab_core::{
    run_pipeline, Annotation, CanonicalTable, Criteria, CriteriaOptions, DisplayOptions,
    Highlight, Normalizer, PresentationTable,
};

use crate::config::AppConfig;
use crate::data_loader::{load_table, LoadError, LoadedTable, RawSource};
use crate::export::{export_csv, ExportArtifact, ExportError, ExportOptions};

/// One interaction: the criteria to hold, and whether the user asked to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRequest {
    pub criteria: Criteria,
    pub triggered: bool,
}

impl RunRequest {
    /// Criteria with the run trigger set.
    pub fn run(criteria: Criteria) -> Self {
        Self {
            criteria,
            triggered: true,
        }
    }

    /// Criteria held without running.
    pub fn hold(criteria: Criteria) -> Self {
        Self {
            criteria,
            triggered: false,
        }
    }
}

/// What the presentation layer receives for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub table: PresentationTable,
    /// Highlights keyed by row position.
    pub annotation: Annotation,
    pub row_count: usize,
}

impl RunOutcome {
    fn new(table: PresentationTable) -> Self {
        Self {
            annotation: table.annotation(),
            row_count: table.row_count(),
            table,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    loaded: LoadedTable,
    display: DisplayOptions,
    export: ExportOptions,
    criteria: Criteria,
    /// Set by the first triggered request, cleared by `reset`.
    triggered: bool,
    outcome: Option<RunOutcome>,
}

impl Session {
    pub fn new(loaded: LoadedTable, display: DisplayOptions, export: ExportOptions) -> Self {
        Self {
            loaded,
            display,
            export,
            criteria: Criteria::default(),
            triggered: false,
            outcome: None,
        }
    }

    /// Load the canonical table from `source` using the configured normalizer.
    ///
    /// Fails without producing a session when the data cannot be loaded.
    pub fn load(source: &dyn RawSource, config: &AppConfig) -> Result<Self, LoadError> {
        let normalizer = Normalizer::new(config.normalizer.clone());
        let loaded = load_table(source, &normalizer)?;
        Ok(Self::new(loaded, config.display, config.export.clone()))
    }

    pub fn canonical(&self) -> &CanonicalTable {
        &self.loaded.table
    }

    /// Shared handle to the canonical table.
    pub fn canonical_arc(&self) -> Arc<CanonicalTable> {
        Arc::clone(&self.loaded.table)
    }

    pub fn dataset_hash(&self) -> &str {
        &self.loaded.dataset_hash
    }

    pub fn source(&self) -> &str {
        &self.loaded.source
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    /// Whether a run has been triggered since load or the last reset.
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Selectable values for each filter dimension.
    pub fn options(&self) -> CriteriaOptions {
        CriteriaOptions::from_table(&self.loaded.table)
    }

    /// Hold the request's criteria and run the pipeline if this request or
    /// an earlier one since the last reset carried the trigger.
    pub fn submit(&mut self, request: RunRequest) -> Option<&RunOutcome> {
        self.criteria = request.criteria;
        self.triggered |= request.triggered;
        if !self.triggered {
            debug!("criteria held; waiting for run trigger");
            return None;
        }

        let table = run_pipeline(&self.loaded.table, &self.criteria, &self.display);
        let outcome = RunOutcome::new(table);
        info!(
            rows = outcome.row_count,
            increased = outcome.annotation.count(Highlight::Increased),
            decreased = outcome.annotation.count(Highlight::Decreased),
            "run complete"
        );
        self.outcome = Some(outcome);
        self.outcome.as_ref()
    }

    /// Discard run state and criteria, keeping the canonical table.
    pub fn reset(&mut self) {
        self.criteria = Criteria::default();
        self.triggered = false;
        self.outcome = None;
        debug!("session reset");
    }

    /// Serialize the current presentation table.
    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        let outcome = self.outcome.as_ref().ok_or(ExportError::NothingToExport)?;
        let artifact = export_csv(&outcome.table, &self.export)?;
        info!(
            file = artifact.file_name,
            bytes = artifact.bytes.len(),
            rows = outcome.row_count,
            "exported results"
        );
        Ok(artifact)
    }
}
