use serde::{Deserialize, Serialize};

use crate::{explain::Explanation, merge::MergedProfile, recommend::non_blank};

const CHARACTERISTICS_PREVIEW: usize = 6;

/// The five parts of the best-interest record kept with every run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestInterestSummary {
	pub prudential_standards: String,
	pub conflict_management: String,
	pub transparency: String,
	pub documentation: String,
	pub ongoing_duty: String,
}

/// Profile attributes that justify the assessment, rendered as `label: value`.
pub fn profile_characteristics(profile: &MergedProfile) -> Vec<String> {
	let suitability = &profile.suitability;
	let goals = &profile.client_goals;
	let finances = &profile.client_profile;

	[
		("risk tolerance", suitability.risk_tolerance.as_deref()),
		("time horizon", suitability.time_horizon.as_deref()),
		("liquidity needs", suitability.liquidity_needs.as_deref()),
		("objectives", suitability.client_objectives.as_deref()),
		("financial objectives", goals.financial_objectives.as_deref()),
		("distribution plan", goals.distribution_plan.as_deref()),
		("expected holding period", goals.expected_holding_period.as_deref()),
		("gross income", finances.gross_income.as_deref()),
		("household net worth", finances.household_net_worth.as_deref()),
		("household liquid assets", finances.household_liquid_assets.as_deref()),
		("tax bracket", finances.tax_bracket.as_deref()),
	]
	.into_iter()
	.filter_map(|(label, value)| non_blank(value).map(|value| format!("{label}: {value}")))
	.collect()
}

/// Builds the best-interest record from the merged profile and the finished explanation.
///
/// `sources` are reader-facing names of the data consulted. When the customer picked products,
/// `selection` leads the prudential, conflict, and transparency parts and is recorded in the
/// documentation part.
pub fn best_interest_summary(
	profile: &MergedProfile,
	explanation: &Explanation,
	sources: &[String],
	selection: Option<&str>,
) -> BestInterestSummary {
	let characteristics = profile_characteristics(profile);
	let narrative = if characteristics.is_empty() {
		"Client profile characteristics were considered where provided.".to_string()
	} else {
		format!(
			"Client profile characteristics used to justify the assessment: {}.",
			characteristics.join("; ")
		)
	};
	let sources = if sources.is_empty() {
		"product catalog and client profile".to_string()
	} else {
		sources.join(", ")
	};
	let criteria = if explanation.choice_criteria.is_empty() {
		"product match".to_string()
	} else {
		explanation.choice_criteria.join(", ")
	};
	let characteristics_list = if characteristics.is_empty() {
		"suitability and goals".to_string()
	} else {
		characteristics.join(", ")
	};
	let characteristics_preview = if characteristics.is_empty() {
		"suitability and goals".to_string()
	} else if characteristics.len() > CHARACTERISTICS_PREVIEW {
		format!("{}...", characteristics[..CHARACTERISTICS_PREVIEW].join(", "))
	} else {
		characteristics.join(", ")
	};
	let prudential_standards = format!(
		"Reasonable diligence was applied to the customer's financial situation, needs, and objectives. \
		{narrative} Available products were investigated from the {sources}. \
		Alternatives were compared on: {criteria}. Summary: {}",
		explanation.explanation
	);
	let conflict_management = "Material conflicts of interest are identified in firm disclosures. \
		Compensation structures are disclosed, and conflicts are eliminated where possible or disclosed in writing. \
		The products presented were ranked from the client profile and product data; no incentive favored a particular product."
		.to_string();
	let transparency = format!(
		"Conflicts of interest and compensation are disclosed in writing before the transaction. \
		Alternatives considered appear in the ranked products and the reasons to switch. \
		The client profile characteristics behind the assessment ({characteristics_preview}) are recorded in the merged profile. \
		Each product carries its rate, term, surrender period, free withdrawal, and guaranteed minimum with a match reason."
	);
	let mut documentation = format!(
		"Customer information and analysis are recorded in the merged profile and input summary, \
		including the characteristics behind the assessment: {characteristics_list}. \
		The basis for the products presented is recorded in the explanation, data sources, choice criteria, and each match reason. "
	);

	if selection.is_some() {
		documentation.push_str(
			"The customer's selection is recorded here and in the selected products sent to the e-application. ",
		);
	}

	documentation.push_str(
		"Run records (run id, timestamp, payload) are retained for at least six years. \
		Customer acknowledgment is obtained at the point of sale.",
	);

	let ongoing_duty = "The firm monitors accounts and the products presented for continued suitability, \
		reviews changing circumstances and market conditions, and refreshes recommendations when the client profile changes."
		.to_string();
	let lead = |text: String| match selection {
		Some(sentence) => format!("{sentence} {text}"),
		None => text,
	};

	BestInterestSummary {
		prudential_standards: lead(prudential_standards),
		conflict_management: lead(conflict_management),
		transparency: lead(transparency),
		documentation,
		ongoing_duty,
	}
}
