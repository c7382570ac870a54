use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::merge::MergedProfile;

const OBJECTIVE_PREVIEW_CHARS: usize = 80;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
	#[serde(rename = "identifier")]
	pub product_id: String,
	pub name: String,
	pub carrier: String,
	pub rate: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub term: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub premium_bonus: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_period: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_charge: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub free_withdrawal: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub guaranteed_min_rate: Option<String>,
	#[serde(default)]
	pub riders: Vec<String>,
	#[serde(default)]
	pub features: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub liquidity: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub risk_profile: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
	#[serde(flatten)]
	pub product: ProductCandidate,
	pub match_reason: String,
	pub rank: u32,
}

/// Orders candidates by rate (highest first), then carrier, then product identifier, keeps at
/// most `max_recommendations`, and assigns 1-based ranks.
///
/// Candidates without a rate sort after every rated candidate.
pub fn rank_candidates(
	profile: &MergedProfile,
	mut candidates: Vec<ProductCandidate>,
	max_recommendations: usize,
) -> Vec<Recommendation> {
	candidates.sort_by(compare_candidates);
	candidates.truncate(max_recommendations);

	candidates
		.into_iter()
		.enumerate()
		.map(|(idx, product)| {
			let match_reason = match_reason(profile, &product);

			Recommendation { product, match_reason, rank: idx as u32 + 1 }
		})
		.collect()
}

/// Profile attributes the rationale was built from, in a fixed order.
pub fn choice_criteria(profile: &MergedProfile) -> Vec<String> {
	profile_facts(profile).into_iter().map(|(criterion, _)| criterion.to_string()).collect()
}

pub fn match_reason(profile: &MergedProfile, product: &ProductCandidate) -> String {
	let facts = profile_facts(profile);

	if facts.is_empty() {
		return match product.rate {
			Some(rate) => format!(
				"Ranked on rate alone ({}); no risk tolerance, time horizon, liquidity, or objectives are on file.",
				format_rate(rate)
			),
			None => "Listed from the product catalog; no rate or profile attributes are available to rank on."
				.to_string(),
		};
	}

	let mut parts = facts
		.into_iter()
		.map(|(criterion, value)| format!("{criterion}: {value}"))
		.collect::<Vec<_>>();

	if let (Some(risk), Some(product_risk)) =
		(profile.suitability.risk_tolerance.as_deref(), product.risk_profile.as_deref())
		&& risk_aligned(risk, product_risk)
	{
		parts.push(format!("product risk profile {product_risk} fits"));
	}

	format!("Matched to the client profile on {}.", parts.join("; "))
}

/// Parses rates such as `"4.25%"`, `"4.25"`, or `" 4 % "`.
pub fn parse_rate(raw: &str) -> Option<f64> {
	let trimmed = raw.trim().trim_end_matches('%').trim();

	if trimmed.is_empty() {
		return None;
	}

	trimmed.parse::<f64>().ok().filter(|rate| rate.is_finite())
}

pub fn format_rate(rate: f64) -> String {
	format!("{rate:.2}%")
}

fn compare_candidates(left: &ProductCandidate, right: &ProductCandidate) -> Ordering {
	let by_rate = match (left.rate, right.rate) {
		(Some(l), Some(r)) => r.total_cmp(&l),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	};

	by_rate
		.then_with(|| left.carrier.cmp(&right.carrier))
		.then_with(|| left.product_id.cmp(&right.product_id))
}

pub(crate) fn profile_facts(profile: &MergedProfile) -> Vec<(&'static str, String)> {
	let suitability = &profile.suitability;
	let mut facts = Vec::new();

	if let Some(risk) = non_blank(suitability.risk_tolerance.as_deref()) {
		facts.push(("risk tolerance", risk.to_string()));
	}
	if let Some(horizon) = non_blank(suitability.time_horizon.as_deref()) {
		facts.push(("time horizon", horizon.to_string()));
	}
	if let Some(liquidity) = non_blank(suitability.liquidity_needs.as_deref()) {
		facts.push(("liquidity needs", liquidity.to_string()));
	}
	if let Some(objectives) = non_blank(profile.objectives()) {
		facts.push(("financial objectives", preview(objectives)));
	}
	if let Some(holding) = non_blank(profile.client_goals.expected_holding_period.as_deref()) {
		facts.push(("expected holding period", holding.to_string()));
	}

	facts
}

fn risk_aligned(risk: &str, product_risk: &str) -> bool {
	let risk = risk.to_lowercase();
	let product_risk = product_risk.to_lowercase();

	product_risk.contains(&risk) || risk.contains(&product_risk)
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

fn preview(text: &str) -> String {
	if text.chars().count() <= OBJECTIVE_PREVIEW_CHARS {
		return text.to_string();
	}

	let head = text.chars().take(OBJECTIVE_PREVIEW_CHARS).collect::<String>();

	format!("{head}...")
}
