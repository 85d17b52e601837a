//! Dependency resolver for fetch bindings.
//!
//! A commit to a link field becomes a [`FetchPlan`]: one batched read of every
//! remote field its dependents need. Results are applied only while the link
//! field still holds the value that triggered the fetch, so a slow response
//! for an older value is dropped on arrival.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use form_engine_core::config::EngineConfig;
use form_engine_core::error::FormError;
use form_engine_core::form::{is_empty_value, FormState, SourceCommit};
use form_engine_core::schema::DependencyIndex;
use serde_json::Value;

use crate::collaborator::{DocumentFetch, FetchError};

/// Rounds of chained link fetches handled by one `resolve_pending` call.
pub(crate) const MAX_CHAIN_DEPTH: usize = 8;

/// Remote field values, or why they could not be read.
pub type FetchOutcome = Result<HashMap<String, Value>, FetchError>;

/// One batched fetch for a link field commit.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    /// Link field that was committed
    pub source_field: String,
    /// Entity type the link points at
    pub entity_type: String,
    /// Entity named by the committed value
    pub entity_id: String,
    /// Value the link held when the plan was made
    pub triggering_value: Value,
    /// Remote fields to read, deduplicated, in schema order
    pub remote_fields: Vec<String>,
}

/// Outcome of applying a fetch result.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Dependents were written (`updated`) or deliberately left alone (`kept`)
    Applied {
        updated: Vec<String>,
        kept: Vec<String>,
    },
    /// The link value changed while the fetch was in flight
    Stale,
    /// The linked entity does not exist; recorded as an error on the link field
    TargetNotFound,
    /// Fetch failed; dependents keep their values
    Failed(FormError),
}

/// Keeps fetch-bound fields in sync with their link fields.
pub struct DependencyResolver {
    index: Arc<DependencyIndex>,
    fetcher: Arc<dyn DocumentFetch>,
    timeout: Duration,
}

impl DependencyResolver {
    /// Creates a resolver over a prebuilt dependency index.
    pub fn new(
        index: Arc<DependencyIndex>,
        fetcher: Arc<dyn DocumentFetch>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            index,
            fetcher,
            timeout: config.fetch_timeout(),
        }
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// Builds the fetch for a link commit.
    ///
    /// # Returns
    /// `None` when the field has no dependents or the value names no entity
    /// (empty, or not a string/number). Dependents are left untouched then.
    pub fn plan(&self, commit: &SourceCommit) -> Option<FetchPlan> {
        let dependents = self.index.dependents(&commit.field_name);
        let first = dependents.first()?;
        if is_empty_value(&commit.value) {
            return None;
        }
        let entity_id = match &commit.value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let mut remote_fields: Vec<String> = Vec::with_capacity(dependents.len());
        for binding in dependents {
            if !remote_fields.contains(&binding.remote_field_name) {
                remote_fields.push(binding.remote_field_name.clone());
            }
        }

        Some(FetchPlan {
            source_field: commit.field_name.clone(),
            entity_type: first.target_entity_type.clone(),
            entity_id,
            triggering_value: commit.value.clone(),
            remote_fields,
        })
    }

    /// Issues the batched read for a plan. Does not touch any form state.
    pub async fn fetch(&self, plan: &FetchPlan) -> FetchOutcome {
        tracing::debug!(
            "Fetching {:?} of {} '{}' for {}",
            plan.remote_fields,
            plan.entity_type,
            plan.entity_id,
            plan.source_field
        );
        let request =
            self.fetcher
                .get_field_values(&plan.entity_type, &plan.entity_id, &plan.remote_fields);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    /// Applies a fetch result to the form state.
    ///
    /// Discards the result if the link field no longer holds the triggering
    /// value. On failure no dependent is touched.
    pub fn apply(
        &self,
        state: &mut FormState,
        plan: &FetchPlan,
        outcome: FetchOutcome,
    ) -> Resolution {
        if state.value(&plan.source_field) != Some(&plan.triggering_value) {
            tracing::debug!(
                "Discarding stale fetch for {} = '{}'",
                plan.source_field,
                plan.entity_id
            );
            return Resolution::Stale;
        }

        let fetched = match outcome {
            Ok(fetched) => fetched,
            Err(FetchError::NotFound { entity_type, name }) => {
                tracing::warn!("{} '{}' not found for {}", entity_type, name, plan.source_field);
                state.set_error(
                    plan.source_field.clone(),
                    format!("{} '{}' not found", entity_type, name),
                );
                return Resolution::TargetNotFound;
            }
            Err(e) => {
                tracing::warn!("Fetch for {} failed: {}", plan.source_field, e);
                return Resolution::Failed(FormError::DependencyFetch(e.to_string()));
            }
        };

        let mut updated = Vec::new();
        let mut kept = Vec::new();
        for binding in self.index.dependents(&plan.source_field) {
            let Some(value) = fetched.get(&binding.remote_field_name) else {
                kept.push(binding.destination_field.clone());
                continue;
            };
            if binding.if_empty_only && !state.is_empty(&binding.destination_field) {
                kept.push(binding.destination_field.clone());
                continue;
            }
            state.set_value(binding.destination_field.clone(), value.clone());
            updated.push(binding.destination_field.clone());
        }
        Resolution::Applied { updated, kept }
    }

    /// Drains the state's queued link commits and resolves them in order,
    /// including commits produced by fetched values landing in link fields.
    ///
    /// Holds the state for the whole call. [`FormSession`](crate::FormSession)
    /// runs fetches as spawned tasks instead so the form stays editable.
    pub async fn resolve_pending(&self, state: &mut FormState) -> Vec<Resolution> {
        let mut resolutions = Vec::new();
        for _ in 0..MAX_CHAIN_DEPTH {
            let triggers = state.take_triggers();
            if triggers.is_empty() {
                return resolutions;
            }
            for trigger in triggers {
                // Superseded before it was even sent.
                if state.value(&trigger.field_name) != Some(&trigger.value) {
                    continue;
                }
                let Some(plan) = self.plan(&trigger) else {
                    continue;
                };
                let outcome = self.fetch(&plan).await;
                resolutions.push(self.apply(state, &plan, outcome));
            }
        }
        if state.has_pending_triggers() {
            tracing::warn!(
                "Fetch bindings still chaining after {} rounds; leaving the rest queued",
                MAX_CHAIN_DEPTH
            );
        }
        resolutions
    }
}
