//! Translation between stored suitability rows and the typed client profile.

use advisor_domain::{ChangeSet, ClientProfile, ProfileState, Suitability};
use advisor_storage::models::SuitabilityProfileRow;

/// The store's contribution to the merge.
pub fn store_profile_state(row: Option<&SuitabilityProfileRow>) -> ProfileState {
	let Some(row) = row else {
		return ProfileState::default();
	};

	ProfileState {
		suitability: Suitability {
			risk_tolerance: row.risk_tolerance.clone(),
			time_horizon: row.investment_horizon.clone(),
			liquidity_needs: row.liquidity_importance.clone(),
			client_objectives: row.primary_objective.clone(),
			secondary_objective: row.secondary_objective.clone(),
			withdrawal_horizon: row.withdrawal_horizon.clone(),
			current_income_need: row.current_income_need.clone(),
			age: row.age.map(i64::from),
			state: row.state.clone(),
			..Default::default()
		},
		client_profile: ClientProfile {
			gross_income: row.annual_income_range.clone(),
			household_net_worth: row.net_worth_range.clone(),
			household_liquid_assets: row.liquid_net_worth_range.clone(),
			tax_bracket: row.tax_bracket.clone(),
			..Default::default()
		},
		..Default::default()
	}
}

/// Builds the row to upsert: the existing row with every mapped column the change set names
/// overwritten. Returns `None` when the change set touches no mapped column.
pub fn upsert_row(
	client_id: &str,
	existing: Option<&SuitabilityProfileRow>,
	changes: &ChangeSet,
) -> Option<SuitabilityProfileRow> {
	let mut row = existing.cloned().unwrap_or_else(|| SuitabilityProfileRow {
		client_account_number: client_id.to_string(),
		..Default::default()
	});
	let mut touched = false;

	if let Some(suitability) = changes.suitability.as_ref() {
		touched |= overwrite(&mut row.risk_tolerance, &suitability.risk_tolerance);
		touched |= overwrite(&mut row.investment_horizon, &suitability.time_horizon);
		touched |= overwrite(&mut row.liquidity_importance, &suitability.liquidity_needs);
		touched |= overwrite(&mut row.primary_objective, &suitability.client_objectives);
		touched |= overwrite(&mut row.secondary_objective, &suitability.secondary_objective);
		touched |= overwrite(&mut row.withdrawal_horizon, &suitability.withdrawal_horizon);
		touched |= overwrite(&mut row.current_income_need, &suitability.current_income_need);
		touched |= overwrite(&mut row.state, &suitability.state);
		touched |= overwrite(&mut row.age, &suitability.age.and_then(|age| i32::try_from(age).ok()));
	}
	if let Some(profile) = changes.client_profile.as_ref() {
		touched |= overwrite(&mut row.annual_income_range, &profile.gross_income);
		touched |= overwrite(&mut row.net_worth_range, &profile.household_net_worth);
		touched |= overwrite(&mut row.liquid_net_worth_range, &profile.household_liquid_assets);
		touched |= overwrite(&mut row.tax_bracket, &profile.tax_bracket);
	}

	touched.then_some(row)
}

fn overwrite<T>(column: &mut Option<T>, change: &Option<T>) -> bool
where
	T: Clone,
{
	match change {
		Some(value) => {
			*column = Some(value.clone());

			true
		},
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_store_columns_onto_profile_fields() {
		let row = SuitabilityProfileRow {
			client_account_number: "ACCT-1".to_string(),
			investment_horizon: Some("7-10 years".to_string()),
			net_worth_range: Some("1M-2M".to_string()),
			age: Some(67),
			..Default::default()
		};
		let state = store_profile_state(Some(&row));

		assert_eq!(state.suitability.time_horizon.as_deref(), Some("7-10 years"));
		assert_eq!(state.suitability.age, Some(67));
		assert_eq!(state.client_profile.household_net_worth.as_deref(), Some("1M-2M"));
	}

	#[test]
	fn upsert_keeps_existing_columns() {
		let existing = SuitabilityProfileRow {
			client_account_number: "ACCT-1".to_string(),
			risk_tolerance: Some("conservative".to_string()),
			tax_bracket: Some("22%".to_string()),
			..Default::default()
		};
		let changes = ChangeSet {
			suitability: Some(Suitability {
				risk_tolerance: Some("moderate".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let row = upsert_row("ACCT-1", Some(&existing), &changes).expect("Row should be built.");

		assert_eq!(row.risk_tolerance.as_deref(), Some("moderate"));
		assert_eq!(row.tax_bracket.as_deref(), Some("22%"));
	}

	#[test]
	fn unmapped_changes_skip_the_upsert() {
		let changes = ChangeSet {
			suitability: Some(Suitability {
				rate_expectations: Some("above 4%".to_string()),
				..Default::default()
			}),
			client_profile: Some(ClientProfile {
				monthly_living_expenses: Some("4000".to_string()),
				..Default::default()
			}),
			..Default::default()
		};

		assert!(upsert_row("ACCT-1", None, &changes).is_none());
	}
}
