use serde::{Deserialize, Serialize};

use crate::{
	changes::{ChangeSet, ClientGoals, ClientProfile, Suitability},
	recommend::non_blank,
};

/// Fields the recommendation rationale depends on. Missing ones are reported back to the
/// advisor instead of being filled with placeholders.
pub const COMPARISON_FIELDS: [&str; 4] = [
	"suitability.riskTolerance",
	"suitability.timeHorizon",
	"suitability.liquidityNeeds",
	"suitability.clientObjectives",
];

/// One layer of known client state, either from the store or from the external source.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileState {
	pub suitability: Suitability,
	pub client_goals: ClientGoals,
	pub client_profile: ClientProfile,
}

/// The effective state after applying a change set over the store and external layers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedProfile {
	pub suitability: Suitability,
	pub client_goals: ClientGoals,
	pub client_profile: ClientProfile,
}
impl MergedProfile {
	pub fn objectives(&self) -> Option<&str> {
		non_blank(self.suitability.client_objectives.as_deref())
			.or(non_blank(self.client_goals.financial_objectives.as_deref()))
	}

	/// Comparison fields that are absent or blank, in [`COMPARISON_FIELDS`] order.
	pub fn missing_data(&self) -> Vec<String> {
		let suitability = &self.suitability;
		let present = [
			non_blank(suitability.risk_tolerance.as_deref()).is_some(),
			non_blank(suitability.time_horizon.as_deref()).is_some(),
			non_blank(suitability.liquidity_needs.as_deref()).is_some(),
			self.objectives().is_some(),
		];

		COMPARISON_FIELDS
			.iter()
			.zip(present)
			.filter(|(_, present)| !present)
			.map(|(field, _)| (*field).to_string())
			.collect()
	}
}

/// Picks each field from the change set first, then the store, then the external source.
///
/// Merging is per field, so a change to one field never clears its siblings.
pub fn merge_profile(
	changes: &ChangeSet,
	store: &ProfileState,
	external: &ProfileState,
) -> MergedProfile {
	let empty_suitability = Suitability::default();
	let empty_goals = ClientGoals::default();
	let empty_profile = ClientProfile::default();

	MergedProfile {
		suitability: merge_suitability(
			changes.suitability.as_ref().unwrap_or(&empty_suitability),
			&store.suitability,
			&external.suitability,
		),
		client_goals: merge_client_goals(
			changes.client_goals.as_ref().unwrap_or(&empty_goals),
			&store.client_goals,
			&external.client_goals,
		),
		client_profile: merge_client_profile(
			changes.client_profile.as_ref().unwrap_or(&empty_profile),
			&store.client_profile,
			&external.client_profile,
		),
	}
}

macro_rules! layered {
	($ty:ident, $change:expr, $store:expr, $external:expr, [$($field:ident),+ $(,)?]) => {
		$ty { $($field: pick(&$change.$field, &$store.$field, &$external.$field)),+ }
	};
}

fn merge_suitability(change: &Suitability, store: &Suitability, external: &Suitability) -> Suitability {
	layered!(
		Suitability,
		change,
		store,
		external,
		[
			client_objectives,
			risk_tolerance,
			time_horizon,
			liquidity_needs,
			tax_considerations,
			guaranteed_income,
			rate_expectations,
			surrender_timeline,
			living_benefits,
			advisor_eligibility,
			score,
			is_prefilled,
			secondary_objective,
			withdrawal_horizon,
			current_income_need,
			age,
			state,
		]
	)
}

fn merge_client_goals(change: &ClientGoals, store: &ClientGoals, external: &ClientGoals) -> ClientGoals {
	layered!(
		ClientGoals,
		change,
		store,
		external,
		[
			financial_objectives,
			distribution_plan,
			owned_assets,
			time_to_first_distribution,
			expected_holding_period,
			source_of_funds,
			employment_status,
		]
	)
}

fn merge_client_profile(
	change: &ClientProfile,
	store: &ClientProfile,
	external: &ClientProfile,
) -> ClientProfile {
	layered!(
		ClientProfile,
		change,
		store,
		external,
		[
			resides_in_nursing_home,
			has_long_term_care_insurance,
			has_medicare_supplemental,
			gross_income,
			disposable_income,
			tax_bracket,
			household_liquid_assets,
			monthly_living_expenses,
			total_annuity_value,
			household_net_worth,
			anticipate_expense_increase,
			anticipate_income_decrease,
			anticipate_liquid_asset_decrease,
			apply_to_means_tested_benefits,
		]
	)
}

fn pick<T>(change: &Option<T>, store: &Option<T>, external: &Option<T>) -> Option<T>
where
	T: Clone,
{
	change.as_ref().or(store.as_ref()).or(external.as_ref()).cloned()
}
