use serde::{Deserialize, Serialize};

use crate::{
	changes::CustomerSelection,
	merge::MergedProfile,
	recommend::{self, Recommendation},
};

/// The contract the client holds today, as far as the store or external source knows it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProduct {
	pub name: String,
	pub carrier: String,
	pub rate: Option<f64>,
	#[serde(default)]
	pub riders: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub free_withdrawal: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_remaining: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
	pub explanation: String,
	pub reasons_to_switch: Vec<String>,
	pub choice_criteria: Vec<String>,
	pub missing_data: Vec<String>,
}

/// Renders why the top recommendation is proposed and how it contrasts with the current
/// contract on rate, riders, and liquidity, in that order.
///
/// `notes` are compliance notes raised earlier in the run (degraded sources, failed
/// comparisons) and are appended verbatim.
pub fn build_explanation(
	profile: &MergedProfile,
	current: Option<&CurrentProduct>,
	recommendations: &[Recommendation],
	notes: &[String],
) -> Explanation {
	let missing_data = profile.missing_data();
	let mut choice_criteria = vec!["rate".to_string()];

	choice_criteria.extend(recommend::choice_criteria(profile));

	let Some(top) = recommendations.first() else {
		let mut explanation = String::from(
			"No alternative products were available for this client, so no switch is proposed.",
		);

		append_context(&mut explanation, profile, &missing_data, notes);

		return Explanation { explanation, reasons_to_switch: Vec::new(), choice_criteria, missing_data };
	};
	let product = &top.product;
	let rate = product.rate.map(recommend::format_rate).unwrap_or_else(|| "an unpublished rate".to_string());
	let mut explanation = format!(
		"{} from {} is the top choice at {rate}, ranked first of {} alternatives. {}",
		product.name,
		product.carrier,
		recommendations.len(),
		top.match_reason
	);

	append_context(&mut explanation, profile, &missing_data, notes);

	let reasons_to_switch = match current {
		Some(current) => vec![
			rate_reason(current, top),
			rider_reason(current, top),
			liquidity_reason(current, top),
		],
		None => vec![
			"No current contract is on file, so the rate cannot be contrasted.".to_string(),
			"No current contract is on file, so riders cannot be contrasted.".to_string(),
			"No current contract is on file, so liquidity cannot be contrasted.".to_string(),
		],
	};

	Explanation { explanation, reasons_to_switch, choice_criteria, missing_data }
}

/// Describes the customer's pick among the ranked products, if they made one.
pub fn selection_sentence(
	recommendations: &[Recommendation],
	selection: Option<&CustomerSelection>,
) -> Option<String> {
	let selection = selection?;

	if selection.selected_product_ids.is_empty() {
		return None;
	}

	let names = selection
		.selected_product_ids
		.iter()
		.filter_map(|id| recommendations.iter().find(|rec| &rec.product.product_id == id))
		.map(|rec| format!("{} ({})", rec.product.name, rec.product.carrier))
		.collect::<Vec<_>>();
	let mut sentence = if names.is_empty() {
		format!(
			"The customer selected {}, which is not among the ranked recommendations.",
			selection.selected_product_ids.join(", ")
		)
	} else {
		format!("The customer selected {}.", names.join(", "))
	};

	if let Some(notes) = selection.notes.as_deref().map(str::trim).filter(|notes| !notes.is_empty()) {
		sentence.push_str(&format!(" Selection notes: {notes}"));
	}

	Some(sentence)
}

fn rate_reason(current: &CurrentProduct, top: &Recommendation) -> String {
	match (current.rate, top.product.rate) {
		(Some(now), Some(next)) if next > now => format!(
			"Rate: {} offers {} versus {} on the current contract, {:.2} points higher.",
			top.product.name,
			recommend::format_rate(next),
			recommend::format_rate(now),
			next - now
		),
		(Some(now), Some(next)) => format!(
			"Rate: {} offers {}, which does not exceed the current {}.",
			top.product.name,
			recommend::format_rate(next),
			recommend::format_rate(now)
		),
		(None, Some(next)) => format!(
			"Rate: {} offers {}; the current contract rate is not on file.",
			top.product.name,
			recommend::format_rate(next)
		),
		(_, None) => format!("Rate: {} has no published rate to compare.", top.product.name),
	}
}

fn rider_reason(current: &CurrentProduct, top: &Recommendation) -> String {
	let added = top
		.product
		.riders
		.iter()
		.filter(|rider| !current.riders.iter().any(|held| held.eq_ignore_ascii_case(rider)))
		.cloned()
		.collect::<Vec<_>>();

	if added.is_empty() {
		format!("Riders: {} adds no riders beyond the current contract.", top.product.name)
	} else {
		format!("Riders: {} adds {}.", top.product.name, added.join(", "))
	}
}

fn liquidity_reason(current: &CurrentProduct, top: &Recommendation) -> String {
	let offered = top.product.free_withdrawal.as_deref().unwrap_or("not stated");
	let held = current.free_withdrawal.as_deref().unwrap_or("not stated");
	let mut reason = format!("Liquidity: free withdrawal {offered} versus {held} today");

	if let Some(remaining) = current.surrender_remaining.as_deref() {
		reason.push_str(&format!(", with {remaining} left on the current surrender schedule"));
	}
	if let Some(period) = top.product.surrender_period.as_deref() {
		reason.push_str(&format!("; the new surrender period is {period}"));
	}

	reason.push('.');

	reason
}

fn append_context(
	explanation: &mut String,
	profile: &MergedProfile,
	missing_data: &[String],
	notes: &[String],
) {
	if !missing_data.is_empty() {
		explanation.push_str(&format!(" Missing profile data ({})", missing_data.join(", ")));

		if recommend::profile_facts(profile).is_empty() {
			explanation.push_str("; the rationale rests on rate alone");
		}

		explanation.push('.');
	}
	for note in notes {
		explanation.push(' ');
		explanation.push_str(note);
	}
}
