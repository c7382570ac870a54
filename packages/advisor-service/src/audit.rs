//! Best-effort durability for pipeline runs.
//!
//! Every write here reports a [`PersistOutcome`] instead of failing the caller. Failures are
//! logged and folded into the run's audit event.

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use advisor_storage::models::{RecommendationRunRow, RunEventRow, SuitabilityProfileRow};

use crate::{ClientStore, StorablePayload};

const CLIENT_SCOPE_HEX_CHARS: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistOutcome {
	Written,
	Skipped,
	Failed { reason: String },
}
impl PersistOutcome {
	pub fn failure(&self) -> Option<&str> {
		match self {
			Self::Failed { reason } => Some(reason),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceReport {
	pub profile_upsert: PersistOutcome,
	pub payload: PersistOutcome,
	pub event: PersistOutcome,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub payload_ref: Option<Uuid>,
}

/// One immutable record of a pipeline invocation.
#[derive(Clone, Debug)]
pub struct AuditEvent {
	pub event_id: Uuid,
	pub timestamp: OffsetDateTime,
	pub agent_id: String,
	pub run_id: Uuid,
	pub client_id_scope: String,
	pub input_summary: Value,
	pub success: bool,
	pub error_message: Option<String>,
	pub explanation_summary: Option<String>,
	pub data_sources_used: Vec<String>,
	pub choice_criteria: Vec<String>,
	pub input_validation_passed: bool,
	pub guardrail_triggered: bool,
	pub payload_ref: Option<Uuid>,
}
impl AuditEvent {
	/// A failed run. Callers fill in whatever context they still have.
	pub fn failed(
		agent_id: &str,
		run_id: Uuid,
		client_id: &str,
		input_summary: Value,
		input_validation_passed: bool,
		error_message: String,
	) -> Self {
		Self {
			event_id: Uuid::new_v4(),
			timestamp: OffsetDateTime::now_utc(),
			agent_id: agent_id.to_string(),
			run_id,
			client_id_scope: client_id_scope(client_id),
			input_summary,
			success: false,
			error_message: Some(error_message),
			explanation_summary: None,
			data_sources_used: Vec::new(),
			choice_criteria: Vec::new(),
			input_validation_passed,
			guardrail_triggered: false,
			payload_ref: None,
		}
	}

	fn to_row(&self) -> RunEventRow {
		RunEventRow {
			event_id: self.event_id,
			occurred_at: self.timestamp,
			agent_id: self.agent_id.clone(),
			run_id: self.run_id,
			client_id_scope: self.client_id_scope.clone(),
			input_summary: self.input_summary.clone(),
			success: self.success,
			error_message: self.error_message.clone(),
			explanation_summary: self.explanation_summary.clone(),
			data_sources_used: self.data_sources_used.clone(),
			choice_criteria: self.choice_criteria.clone(),
			input_validation_passed: self.input_validation_passed,
			guardrail_triggered: self.guardrail_triggered,
			payload_ref: self.payload_ref,
		}
	}
}

/// Stable, non-reversible scope for a client identifier.
pub fn client_id_scope(client_id: &str) -> String {
	let digest = blake3::hash(client_id.trim().as_bytes()).to_hex();

	digest[..CLIENT_SCOPE_HEX_CHARS].to_string()
}

pub fn input_summary(sections_present: &[&str]) -> Value {
	serde_json::json!({ "sectionsPresent": sections_present })
}

pub async fn persist_event(store: &dyn ClientStore, event: &AuditEvent) -> PersistOutcome {
	match store.insert_run_event(&event.to_row()).await {
		Ok(()) => PersistOutcome::Written,
		Err(err) => {
			tracing::warn!(
				run_id = %event.run_id,
				event_id = %event.event_id,
				error = %err,
				"Failed to persist audit event."
			);

			PersistOutcome::Failed { reason: err.to_string() }
		},
	}
}

/// Stores the payload and returns the reference to put on the audit event.
pub async fn persist_agent_two_payload(
	store: &dyn ClientStore,
	payload: &StorablePayload,
) -> (PersistOutcome, Option<Uuid>) {
	let body = match serde_json::to_value(payload) {
		Ok(body) => body,
		Err(err) => {
			tracing::warn!(run_id = %payload.run_id, error = %err, "Failed to encode payload.");

			return (PersistOutcome::Failed { reason: err.to_string() }, None);
		},
	};
	let row = RecommendationRunRow {
		id: Uuid::new_v4(),
		run_id: payload.run_id,
		created_at: payload.created_at,
		client_id: payload.client_id.clone(),
		payload: body,
	};

	match store.insert_recommendation_run(&row).await {
		Ok(()) => (PersistOutcome::Written, Some(row.id)),
		Err(err) => {
			tracing::warn!(run_id = %payload.run_id, error = %err, "Failed to persist payload.");

			(PersistOutcome::Failed { reason: err.to_string() }, None)
		},
	}
}

pub async fn upsert_client_suitability_profile(
	store: &dyn ClientStore,
	row: Option<&SuitabilityProfileRow>,
) -> PersistOutcome {
	let Some(row) = row else {
		return PersistOutcome::Skipped;
	};

	match store.upsert_client_suitability_profile(row).await {
		Ok(()) => PersistOutcome::Written,
		Err(err) => {
			tracing::warn!(
				client_id = row.client_account_number.as_str(),
				error = %err,
				"Failed to upsert client suitability profile."
			);

			PersistOutcome::Failed { reason: err.to_string() }
		},
	}
}
