use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use advisor_domain::{
	BestInterestSummary, ChangeSet, MergedProfile, Recommendation, build_explanation, changes,
	merge_profile, rank_candidates, selection_sentence, validate_changes,
};

use crate::{
	AdvisorService, ComparisonService, Error, FinalEAppOutput, Result, StorablePayload,
	audit::{self, AuditEvent, PersistOutcome, PersistenceReport},
	catalog::{self, SOURCE_POLICY_PRODUCTS},
	context::{DEGRADED_PREFIX, SOURCE_STORE_PRODUCTS},
	payload::{self, PayloadParts},
	profile_rows,
};

pub const SOURCE_COMPARISON: &str = "comparison_service";

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
	#[serde(default = "empty_changes")]
	pub changes: Value,
	pub client_id: String,
	#[serde(default)]
	pub alert_id: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationOutput {
	pub run_id: Uuid,
	pub client_id: String,
	pub recommendations: Vec<Recommendation>,
	pub explanation: String,
	pub reasons_to_switch: Vec<String>,
	pub choice_criteria: Vec<String>,
	pub missing_data: Vec<String>,
	pub compliance_notes: Vec<String>,
	pub merged_profile_summary: MergedProfile,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comparison_result: Option<Value>,
	pub best_interest_summary: BestInterestSummary,
	pub final_eapp_output: FinalEAppOutput,
	pub storable_payload: StorablePayload,
	pub persistence: PersistenceReport,
}

impl AdvisorService {
	/// Validates, merges, ranks, explains, and persists one recommendation run.
	///
	/// Validation and unknown-client errors abort the run. Persistence failures never do; they
	/// are reported in `persistence` and on the audit event.
	pub async fn generate_product_recommendations(
		&self,
		req: RecommendationRequest,
	) -> Result<RecommendationOutput> {
		let run_id = Uuid::new_v4();
		let client_id = req.client_id.trim();

		if client_id.is_empty() {
			return Err(Error::InvalidRequest { message: "clientId must be non-empty.".to_string() });
		}

		tracing::info!(run_id = %run_id, client_id, "Generating product recommendations.");

		let changes = match validate_changes(&req.changes) {
			Ok(changes) => changes,
			Err(err) => {
				let summary = audit::input_summary(&raw_sections(&req.changes));
				let event = AuditEvent::failed(
					&self.cfg.recommendations.agent_id,
					run_id,
					client_id,
					summary,
					false,
					err.to_string(),
				);

				audit::persist_event(self.store.as_ref(), &event).await;

				return Err(err.into());
			},
		};
		let summary = audit::input_summary(&changes.sections_present());
		let client = match self.lookup_client(client_id).await {
			Ok(client) => client,
			Err(err @ Error::NotFound { .. }) => return Err(err),
			Err(err) => return Err(self.fail_run(run_id, client_id, summary, err).await),
		};
		let context = match self.aggregate_context(client).await {
			Ok(context) => context,
			Err(err) => return Err(self.fail_run(run_id, client_id, summary, err).await),
		};
		let store_state = profile_rows::store_profile_state(context.suitability_profile.as_ref());
		let merged = merge_profile(&changes, &store_state, &context.external_profile_state());
		let upsert_row = if changes.has_suitability_changes() || changes.has_client_profile_changes()
		{
			profile_rows::upsert_row(
				&context.client.client_account_number,
				context.suitability_profile.as_ref(),
				&changes,
			)
		} else {
			None
		};
		let profile_upsert =
			audit::upsert_client_suitability_profile(self.store.as_ref(), upsert_row.as_ref()).await;
		let mut compliance_notes = context.source_notes.clone();
		let mut data_sources = context.data_sources.clone();
		let comparison_result = self
			.compare_alert(
				req.alert_id.as_deref(),
				client_id,
				&changes,
				&merged,
				&mut compliance_notes,
				&mut data_sources,
			)
			.await;

		let (candidates, catalog_source) = catalog::candidates(&context);
		let unused_catalog = if catalog_source == SOURCE_POLICY_PRODUCTS {
			SOURCE_STORE_PRODUCTS
		} else {
			SOURCE_POLICY_PRODUCTS
		};

		data_sources.retain(|source| source != unused_catalog);

		let recommendations = rank_candidates(&merged, candidates, self.max_recommendations());
		let current = catalog::current_product(&context);
		let mut explanation =
			build_explanation(&merged, current.as_ref(), &recommendations, &compliance_notes);

		let selection = selection_sentence(&recommendations, changes.customer_selection.as_ref());

		if let Some(sentence) = selection.as_deref() {
			explanation.explanation.push(' ');
			explanation.explanation.push_str(sentence);
		}

		let created_at = OffsetDateTime::now_utc();
		let storable_payload = payload::assemble(PayloadParts {
			run_id,
			created_at,
			client_id,
			client_name: &context.client.client_name,
			agent_id: &self.cfg.recommendations.agent_id,
			input_summary: &summary,
			merged: &merged,
			recommendations: &recommendations,
			explanation: &explanation,
			compliance_notes: &compliance_notes,
			data_sources_used: &data_sources,
			comparison_result: comparison_result.as_ref(),
			selection: changes.customer_selection.as_ref(),
			selection_sentence: selection.as_deref(),
		});
		let (payload_outcome, payload_ref) =
			audit::persist_agent_two_payload(self.store.as_ref(), &storable_payload).await;
		let event = AuditEvent {
			event_id: Uuid::new_v4(),
			timestamp: created_at,
			agent_id: self.cfg.recommendations.agent_id.clone(),
			run_id,
			client_id_scope: audit::client_id_scope(client_id),
			input_summary: summary,
			success: true,
			error_message: persistence_errors(&profile_upsert, &payload_outcome),
			explanation_summary: Some(explanation.explanation.clone()),
			data_sources_used: data_sources,
			choice_criteria: explanation.choice_criteria.clone(),
			input_validation_passed: true,
			guardrail_triggered: !explanation.missing_data.is_empty(),
			payload_ref,
		};
		let event_outcome = audit::persist_event(self.store.as_ref(), &event).await;

		tracing::info!(
			run_id = %run_id,
			client_id,
			recommendations = recommendations.len(),
			"Product recommendations generated."
		);

		Ok(RecommendationOutput {
			run_id,
			client_id: client_id.to_string(),
			recommendations,
			explanation: explanation.explanation,
			reasons_to_switch: explanation.reasons_to_switch,
			choice_criteria: explanation.choice_criteria,
			missing_data: explanation.missing_data,
			compliance_notes,
			merged_profile_summary: merged,
			comparison_result,
			best_interest_summary: storable_payload.best_interest_summary.clone(),
			final_eapp_output: storable_payload.final_eapp_output.clone(),
			storable_payload,
			persistence: PersistenceReport {
				profile_upsert,
				payload: payload_outcome,
				event: event_outcome,
				payload_ref,
			},
		})
	}

	async fn fail_run(&self, run_id: Uuid, client_id: &str, summary: Value, err: Error) -> Error {
		let event = AuditEvent::failed(
			&self.cfg.recommendations.agent_id,
			run_id,
			client_id,
			summary,
			true,
			err.to_string(),
		);

		audit::persist_event(self.store.as_ref(), &event).await;

		err
	}

	/// Runs the comparison side-branch when an alert is named and a service is configured.
	/// An empty response attaches no result. Failures degrade to no result, a compliance note,
	/// and a degraded data-source entry.
	async fn compare_alert(
		&self,
		alert_id: Option<&str>,
		client_id: &str,
		changes: &ChangeSet,
		merged: &MergedProfile,
		compliance_notes: &mut Vec<String>,
		data_sources: &mut Vec<String>,
	) -> Option<Value> {
		let alert_id = alert_id.map(str::trim).filter(|id| !id.is_empty())?;
		let Some(comparison) = self.comparison.as_deref() else {
			tracing::debug!(alert_id, "Comparison requested without a configured comparison service.");

			return None;
		};

		match push_and_compare(comparison, alert_id, client_id, changes, merged).await {
			Ok(Value::Null) => {
				tracing::debug!(alert_id, "Comparison service returned no result.");
				data_sources.push(SOURCE_COMPARISON.to_string());

				None
			},
			Ok(result) => {
				data_sources.push(SOURCE_COMPARISON.to_string());

				Some(result)
			},
			Err(err) => {
				tracing::warn!(alert_id, error = %err, "Comparison service call failed.");
				data_sources.push(format!("{DEGRADED_PREFIX}{SOURCE_COMPARISON}"));
				compliance_notes.push(format!(
					"Comparison for alert {alert_id} could not be completed, so no comparison result is attached."
				));

				None
			},
		}
	}
}

async fn push_and_compare(
	comparison: &dyn ComparisonService,
	alert_id: &str,
	client_id: &str,
	changes: &ChangeSet,
	merged: &MergedProfile,
) -> Result<Value> {
	if changes.has_client_profile_changes() {
		let profile = to_json(&merged.client_profile)?;

		comparison.save_client_profile(client_id, &profile).await?;
	}
	if changes.has_suitability_changes() {
		let suitability = to_json(&merged.suitability)?;

		comparison.save_suitability(alert_id, &suitability).await?;
	}

	comparison.compare(alert_id).await
}

fn to_json<T>(value: &T) -> Result<Value>
where
	T: Serialize,
{
	serde_json::to_value(value).map_err(|err| Error::InvalidRequest { message: err.to_string() })
}

fn persistence_errors(profile_upsert: &PersistOutcome, payload: &PersistOutcome) -> Option<String> {
	let failures = [("profile upsert", profile_upsert), ("payload save", payload)]
		.into_iter()
		.filter_map(|(label, outcome)| outcome.failure().map(|reason| format!("{label} failed: {reason}")))
		.collect::<Vec<_>>();

	if failures.is_empty() { None } else { Some(failures.join("; ")) }
}

/// Known sections present in a payload that failed validation.
fn raw_sections(payload: &Value) -> Vec<&'static str> {
	let Some(root) = payload.as_object() else {
		return Vec::new();
	};

	[
		changes::SECTION_SUITABILITY,
		changes::SECTION_CLIENT_GOALS,
		changes::SECTION_CLIENT_PROFILE,
		changes::SECTION_CUSTOMER_SELECTION,
	]
	.into_iter()
	.filter(|section| root.get(*section).is_some_and(|value| !value.is_null()))
	.collect()
}

fn empty_changes() -> Value {
	Value::Object(Default::default())
}
