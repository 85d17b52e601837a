//! Editing session: one schema bound to one open document.

use std::collections::BTreeMap;
use std::sync::Arc;

use form_engine_core::config::EngineConfig;
use form_engine_core::editor::{editor_contract, EditorContract};
use form_engine_core::error::FormError;
use form_engine_core::form::{FormSnapshot, FormState};
use form_engine_core::layout::{split_into_columns, Column};
use form_engine_core::schema::{DependencyIndex, Schema};
use serde_json::Value;
use tokio::sync::mpsc;

use crate::collaborator::{DocumentFetch, SchemaSource};
use crate::resolver::{DependencyResolver, FetchOutcome, FetchPlan, Resolution, MAX_CHAIN_DEPTH};
use crate::Result;

/// A finished fetch reported back by its task.
#[derive(Debug)]
struct FetchReport {
    plan: FetchPlan,
    /// Chain depth: 0 for user commits, +1 per fetched value landing in a link
    depth: usize,
    outcome: FetchOutcome,
}

/// Form state, schema and resolver for one document.
///
/// Fetches run as spawned tasks and report back over a channel, so the form
/// stays editable while they are in flight. Results are applied by
/// [`drain_results`](Self::drain_results) or [`settle`](Self::settle).
/// Sessions share nothing; two open documents never see each other's state.
pub struct FormSession {
    schema: Arc<Schema>,
    state: FormState,
    resolver: Arc<DependencyResolver>,
    report_tx: mpsc::UnboundedSender<FetchReport>,
    report_rx: mpsc::UnboundedReceiver<FetchReport>,
    in_flight: usize,
}

impl FormSession {
    /// Creates a session for a new document over an already loaded schema.
    pub fn new(schema: Schema, fetcher: Arc<dyn DocumentFetch>, config: EngineConfig) -> Self {
        for problem in schema.check_integrity() {
            tracing::warn!("Schema '{}': {}", schema.entity_type, problem);
        }
        let index = Arc::new(DependencyIndex::build(&schema));
        let state = FormState::for_schema(&schema, &index).with_config(config.clone());
        let resolver = Arc::new(DependencyResolver::new(index, fetcher, &config));
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        Self {
            schema: Arc::new(schema),
            state,
            resolver,
            report_tx,
            report_rx,
            in_flight: 0,
        }
    }

    /// Loads the schema for `entity_type` and opens a session for a new document.
    pub async fn open(
        source: &dyn SchemaSource,
        entity_type: &str,
        fetcher: Arc<dyn DocumentFetch>,
        config: EngineConfig,
    ) -> Result<Self> {
        let schema = source
            .get_schema(entity_type)
            .await
            .map_err(|e| FormError::SchemaUnavailable {
                entity_type: entity_type.to_string(),
                reason: e.to_string(),
            })?;
        tracing::info!(
            "Opened {} form with {} fields",
            entity_type,
            schema.data_fields().count()
        );
        Ok(Self::new(schema, fetcher, config))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Column layout for rendering.
    pub fn columns(&self) -> Vec<Column<'_>> {
        split_into_columns(&self.schema)
    }

    /// Editor contract for a field.
    pub fn editor(&self, field_name: &str) -> Option<EditorContract> {
        self.schema.get(field_name).map(editor_contract)
    }

    /// Commits a value and starts the fetches it triggers.
    ///
    /// Returns immediately; fetched values land on a later
    /// [`drain_results`](Self::drain_results) or [`settle`](Self::settle).
    /// Must be called from within a Tokio runtime.
    ///
    /// # Returns
    /// The fetches started by this commit.
    pub fn set_value(&mut self, field_name: &str, value: Value) -> Vec<FetchPlan> {
        self.state.set_value(field_name, value);
        self.dispatch_triggers(0)
    }

    /// Number of fetches whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Applies every fetch result that has already arrived, without waiting.
    ///
    /// # Returns
    /// Transient notices for fetches that failed. Field-scoped problems are
    /// recorded in the form state instead.
    pub fn drain_results(&mut self) -> Vec<FormError> {
        let mut notices = Vec::new();
        while let Ok(report) = self.report_rx.try_recv() {
            notices.extend(self.receive(report));
        }
        notices
    }

    /// Waits for every in-flight fetch, including chained ones, and applies
    /// the results. Also starts fetches for link commits queued directly on
    /// the state.
    pub async fn settle(&mut self) -> Vec<FormError> {
        let mut notices = self.drain_results();
        self.dispatch_triggers(0);
        while self.in_flight > 0 {
            let Some(report) = self.report_rx.recv().await else {
                break;
            };
            notices.extend(self.receive(report));
        }
        notices
    }

    pub fn validate(&mut self) -> BTreeMap<String, String> {
        self.state.validate(&self.schema)
    }

    pub fn commit(&self) -> FormSnapshot {
        self.state.commit()
    }

    /// Replaces the values with a loaded (or reloaded) document.
    pub fn load_document<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.state.reset(values);
    }

    fn receive(&mut self, report: FetchReport) -> Option<FormError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let resolution = self
            .resolver
            .apply(&mut self.state, &report.plan, report.outcome);
        self.dispatch_triggers(report.depth + 1);
        match resolution {
            Resolution::Failed(e) => Some(e),
            _ => None,
        }
    }

    fn dispatch_triggers(&mut self, depth: usize) -> Vec<FetchPlan> {
        let triggers = self.state.take_triggers();
        if triggers.is_empty() {
            return Vec::new();
        }
        if depth >= MAX_CHAIN_DEPTH {
            tracing::warn!(
                "Fetch bindings still chaining after {} rounds; dropping {} link commits",
                MAX_CHAIN_DEPTH,
                triggers.len()
            );
            return Vec::new();
        }

        let mut plans = Vec::new();
        for trigger in triggers {
            // Superseded before it was even sent.
            if self.state.value(&trigger.field_name) != Some(&trigger.value) {
                continue;
            }
            let Some(plan) = self.resolver.plan(&trigger) else {
                continue;
            };
            self.spawn_fetch(plan.clone(), depth);
            plans.push(plan);
        }
        plans
    }

    fn spawn_fetch(&mut self, plan: FetchPlan, depth: usize) {
        let resolver = Arc::clone(&self.resolver);
        let report_tx = self.report_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let outcome = resolver.fetch(&plan).await;
            // Send fails only once the session is dropped.
            let _ = report_tx.send(FetchReport {
                plan,
                depth,
                outcome,
            });
        });
    }
}
