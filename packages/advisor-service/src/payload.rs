use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use advisor_domain::{
	BestInterestSummary, CustomerSelection, Explanation, MergedProfile, Recommendation,
	best_interest_summary,
};

use crate::{
	catalog::SOURCE_POLICY_PRODUCTS,
	context::{
		DEGRADED_PREFIX, SOURCE_STORE_CLIENT, SOURCE_STORE_CONTRACTS, SOURCE_STORE_PRODUCTS,
		SOURCE_STORE_SUITABILITY,
	},
	recommendations::SOURCE_COMPARISON,
};

const CUSTOMER_ACKNOWLEDGMENT: &str =
	"Customer acknowledgment of the recommendations and conflicts is obtained at the point of sale.";

/// Durable projection of one run, stored verbatim and referenced by its audit event.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorablePayload {
	pub run_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub client_id: String,
	pub agent_id: String,
	pub input_summary: Value,
	pub merged_profile: MergedProfile,
	pub recommendations: Vec<Recommendation>,
	pub explanation: String,
	pub reasons_to_switch: Vec<String>,
	pub choice_criteria: Vec<String>,
	pub missing_data: Vec<String>,
	pub compliance_notes: Vec<String>,
	pub data_sources_used: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub comparison_result: Option<Value>,
	pub electronic_application_payload: ElectronicApplicationPayload,
	pub best_interest_summary: BestInterestSummary,
	pub final_eapp_output: FinalEAppOutput,
}

/// The record handed to the e-application flow once the advisor proceeds.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalEAppOutput {
	pub run_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub client_id: String,
	pub best_interest_summary: BestInterestSummary,
	pub recommendations_with_explainability: Vec<ExplainedProduct>,
	pub reasons_to_switch: Vec<String>,
	pub electronic_application_payload: ElectronicApplicationPayload,
	pub customer_acknowledgment: String,
}

/// A ranked product with the features a reviewer needs and why it matched.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainedProduct {
	pub identifier: String,
	pub name: String,
	pub carrier: String,
	pub rate: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub term: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_period: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub free_withdrawal: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub guaranteed_min_rate: Option<String>,
	pub match_reason: String,
	pub rank: u32,
}
impl From<&Recommendation> for ExplainedProduct {
	fn from(rec: &Recommendation) -> Self {
		Self {
			identifier: rec.product.product_id.clone(),
			name: rec.product.name.clone(),
			carrier: rec.product.carrier.clone(),
			rate: rec.product.rate,
			term: rec.product.term.clone(),
			surrender_period: rec.product.surrender_period.clone(),
			free_withdrawal: rec.product.free_withdrawal.clone(),
			guaranteed_min_rate: rec.product.guaranteed_min_rate.clone(),
			match_reason: rec.match_reason.clone(),
			rank: rec.rank,
		}
	}
}

/// What downstream application submission needs: the applicant and the chosen products.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicApplicationPayload {
	pub run_id: Uuid,
	pub client_id: String,
	pub client_name: String,
	pub applicant: MergedProfile,
	pub selected_products: Vec<SelectedProduct>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub selection_notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
	pub identifier: String,
	pub name: String,
	pub carrier: String,
	pub rate: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub term: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_period: Option<String>,
	pub rank: u32,
}
impl From<&Recommendation> for SelectedProduct {
	fn from(rec: &Recommendation) -> Self {
		Self {
			identifier: rec.product.product_id.clone(),
			name: rec.product.name.clone(),
			carrier: rec.product.carrier.clone(),
			rate: rec.product.rate,
			term: rec.product.term.clone(),
			surrender_period: rec.product.surrender_period.clone(),
			rank: rec.rank,
		}
	}
}

pub(crate) struct PayloadParts<'a> {
	pub(crate) run_id: Uuid,
	pub(crate) created_at: OffsetDateTime,
	pub(crate) client_id: &'a str,
	pub(crate) client_name: &'a str,
	pub(crate) agent_id: &'a str,
	pub(crate) input_summary: &'a Value,
	pub(crate) merged: &'a MergedProfile,
	pub(crate) recommendations: &'a [Recommendation],
	pub(crate) explanation: &'a Explanation,
	pub(crate) compliance_notes: &'a [String],
	pub(crate) data_sources_used: &'a [String],
	pub(crate) comparison_result: Option<&'a Value>,
	pub(crate) selection: Option<&'a CustomerSelection>,
	pub(crate) selection_sentence: Option<&'a str>,
}

pub(crate) fn assemble(parts: PayloadParts<'_>) -> StorablePayload {
	let PayloadParts {
		run_id,
		created_at,
		client_id,
		client_name,
		agent_id,
		input_summary,
		merged,
		recommendations,
		explanation,
		compliance_notes,
		data_sources_used,
		comparison_result,
		selection,
		selection_sentence,
	} = parts;
	let sources =
		data_sources_used.iter().filter_map(|source| source_label(source)).collect::<Vec<_>>();
	let best_interest = best_interest_summary(merged, explanation, &sources, selection_sentence);
	let electronic_application_payload = ElectronicApplicationPayload {
		run_id,
		client_id: client_id.to_string(),
		client_name: client_name.to_string(),
		applicant: merged.clone(),
		selected_products: selected_products(recommendations, selection),
		selection_notes: selection.and_then(|selection| selection.notes.clone()),
	};
	let final_eapp_output = FinalEAppOutput {
		run_id,
		created_at,
		client_id: client_id.to_string(),
		best_interest_summary: best_interest.clone(),
		recommendations_with_explainability: picked(recommendations, selection)
			.into_iter()
			.map(ExplainedProduct::from)
			.collect(),
		reasons_to_switch: explanation.reasons_to_switch.clone(),
		electronic_application_payload: electronic_application_payload.clone(),
		customer_acknowledgment: CUSTOMER_ACKNOWLEDGMENT.to_string(),
	};

	StorablePayload {
		run_id,
		created_at,
		client_id: client_id.to_string(),
		agent_id: agent_id.to_string(),
		input_summary: input_summary.clone(),
		merged_profile: merged.clone(),
		recommendations: recommendations.to_vec(),
		explanation: explanation.explanation.clone(),
		reasons_to_switch: explanation.reasons_to_switch.clone(),
		choice_criteria: explanation.choice_criteria.clone(),
		missing_data: explanation.missing_data.clone(),
		compliance_notes: compliance_notes.to_vec(),
		data_sources_used: data_sources_used.to_vec(),
		comparison_result: comparison_result.cloned(),
		electronic_application_payload,
		best_interest_summary: best_interest,
		final_eapp_output,
	}
}

/// The customer's picks when they name ranked products, otherwise every ranked product.
pub fn selected_products(
	recommendations: &[Recommendation],
	selection: Option<&CustomerSelection>,
) -> Vec<SelectedProduct> {
	picked(recommendations, selection).into_iter().map(SelectedProduct::from).collect()
}

fn picked<'a>(
	recommendations: &'a [Recommendation],
	selection: Option<&CustomerSelection>,
) -> Vec<&'a Recommendation> {
	let picked = selection
		.map(|selection| {
			recommendations
				.iter()
				.filter(|rec| selection.selected_product_ids.contains(&rec.product.product_id))
				.collect::<Vec<_>>()
		})
		.unwrap_or_default();

	if picked.is_empty() { recommendations.iter().collect() } else { picked }
}

/// Reader-facing name of a data-source tag. Degraded upstreams are left out.
fn source_label(source: &str) -> Option<String> {
	if source.starts_with(DEGRADED_PREFIX) {
		return None;
	}

	let label = match source {
		SOURCE_STORE_CLIENT => "client record",
		SOURCE_STORE_SUITABILITY => "client suitability profile",
		SOURCE_STORE_CONTRACTS => "current contract summary",
		SOURCE_STORE_PRODUCTS => "product catalog",
		SOURCE_POLICY_PRODUCTS => "available product catalog",
		SOURCE_COMPARISON => "product comparison",
		"policy_source:policyData" => "in-force policy data",
		"policy_source:suitabilityData" => "external suitability data",
		"policy_source:clientProfiles" => "external client profile",
		"policy_source:notifications" => "advisor notifications",
		other => other,
	};

	Some(label.to_string())
}
