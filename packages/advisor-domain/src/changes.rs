use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SECTION_SUITABILITY: &str = "suitability";
pub const SECTION_CLIENT_GOALS: &str = "clientGoals";
pub const SECTION_CLIENT_PROFILE: &str = "clientProfile";
pub const SECTION_CUSTOMER_SELECTION: &str = "customerSelection";

const AGE_RANGE: RangeInclusive<i64> = 0..=150;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid change payload at {field}: expected {expected}.")]
pub struct ValidationError {
	pub field: String,
	pub expected: String,
}
impl ValidationError {
	pub fn new(field: impl Into<String>, expected: impl Into<String>) -> Self {
		Self { field: field.into(), expected: expected.into() }
	}
}

/// A partial update submitted by the caller. A missing section means "no change requested".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub suitability: Option<Suitability>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_goals: Option<ClientGoals>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_profile: Option<ClientProfile>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub customer_selection: Option<CustomerSelection>,
}
impl ChangeSet {
	pub fn has_suitability_changes(&self) -> bool {
		self.suitability.as_ref().map(|section| !section.is_empty()).unwrap_or(false)
	}

	pub fn has_client_goals_changes(&self) -> bool {
		self.client_goals.as_ref().map(|section| !section.is_empty()).unwrap_or(false)
	}

	pub fn has_client_profile_changes(&self) -> bool {
		self.client_profile.as_ref().map(|section| !section.is_empty()).unwrap_or(false)
	}

	/// Section names carrying at least one field, in payload order.
	pub fn sections_present(&self) -> Vec<&'static str> {
		let mut sections = Vec::new();

		if self.has_suitability_changes() {
			sections.push(SECTION_SUITABILITY);
		}
		if self.has_client_goals_changes() {
			sections.push(SECTION_CLIENT_GOALS);
		}
		if self.has_client_profile_changes() {
			sections.push(SECTION_CLIENT_PROFILE);
		}
		if self
			.customer_selection
			.as_ref()
			.map(|selection| !selection.selected_product_ids.is_empty())
			.unwrap_or(false)
		{
			sections.push(SECTION_CUSTOMER_SELECTION);
		}

		sections
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suitability {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_objectives: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub risk_tolerance: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_horizon: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub liquidity_needs: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tax_considerations: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub guaranteed_income: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rate_expectations: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub surrender_timeline: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub living_benefits: Option<Vec<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub advisor_eligibility: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_prefilled: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secondary_objective: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub withdrawal_horizon: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub current_income_need: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub age: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
}
impl Suitability {
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	/// Best-effort read of suitability data received from the external policy source.
	pub fn from_external(value: &Value) -> Self {
		match value.as_object() {
			Some(object) =>
				Self::read(&FieldReader::lenient(SECTION_SUITABILITY, object)).unwrap_or_default(),
			None => Self::default(),
		}
	}

	fn read(reader: &FieldReader<'_>) -> Result<Self, ValidationError> {
		Ok(Self {
			client_objectives: reader.string("clientObjectives")?,
			risk_tolerance: reader.string("riskTolerance")?,
			time_horizon: reader.string("timeHorizon")?,
			liquidity_needs: reader.string("liquidityNeeds")?,
			tax_considerations: reader.string("taxConsiderations")?,
			guaranteed_income: reader.string("guaranteedIncome")?,
			rate_expectations: reader.string("rateExpectations")?,
			surrender_timeline: reader.string("surrenderTimeline")?,
			living_benefits: reader.string_list("livingBenefits")?,
			advisor_eligibility: reader.string("advisorEligibility")?,
			score: reader.integer("score")?,
			is_prefilled: reader.boolean("isPrefilled")?,
			secondary_objective: reader.string("secondaryObjective")?,
			withdrawal_horizon: reader.string("withdrawalHorizon")?,
			current_income_need: reader.string("currentIncomeNeed")?,
			age: reader.integer_within("age", AGE_RANGE)?,
			state: reader.string("state")?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientGoals {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub financial_objectives: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distribution_plan: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub owned_assets: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub time_to_first_distribution: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub expected_holding_period: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source_of_funds: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub employment_status: Option<String>,
}
impl ClientGoals {
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	pub fn from_external(value: &Value) -> Self {
		match value.as_object() {
			Some(object) =>
				Self::read(&FieldReader::lenient(SECTION_CLIENT_GOALS, object)).unwrap_or_default(),
			None => Self::default(),
		}
	}

	fn read(reader: &FieldReader<'_>) -> Result<Self, ValidationError> {
		Ok(Self {
			financial_objectives: reader.string("financialObjectives")?,
			distribution_plan: reader.string("distributionPlan")?,
			owned_assets: reader.string("ownedAssets")?,
			time_to_first_distribution: reader.string("timeToFirstDistribution")?,
			expected_holding_period: reader.string("expectedHoldingPeriod")?,
			source_of_funds: reader.string("sourceOfFunds")?,
			employment_status: reader.string("employmentStatus")?,
		})
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub resides_in_nursing_home: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub has_long_term_care_insurance: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub has_medicare_supplemental: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gross_income: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub disposable_income: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tax_bracket: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub household_liquid_assets: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub monthly_living_expenses: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub total_annuity_value: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub household_net_worth: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub anticipate_expense_increase: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub anticipate_income_decrease: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub anticipate_liquid_asset_decrease: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub apply_to_means_tested_benefits: Option<String>,
}
impl ClientProfile {
	pub fn is_empty(&self) -> bool {
		self == &Self::default()
	}

	pub fn from_external(value: &Value) -> Self {
		match value.as_object() {
			Some(object) => Self::read(&FieldReader::lenient(SECTION_CLIENT_PROFILE, object))
				.unwrap_or_default(),
			None => Self::default(),
		}
	}

	fn read(reader: &FieldReader<'_>) -> Result<Self, ValidationError> {
		Ok(Self {
			resides_in_nursing_home: reader.string("residesInNursingHome")?,
			has_long_term_care_insurance: reader.string("hasLongTermCareInsurance")?,
			has_medicare_supplemental: reader.string("hasMedicareSupplemental")?,
			gross_income: reader.string("grossIncome")?,
			disposable_income: reader.string("disposableIncome")?,
			tax_bracket: reader.string("taxBracket")?,
			household_liquid_assets: reader.string("householdLiquidAssets")?,
			monthly_living_expenses: reader.string("monthlyLivingExpenses")?,
			total_annuity_value: reader.string("totalAnnuityValue")?,
			household_net_worth: reader.string("householdNetWorth")?,
			anticipate_expense_increase: reader.string("anticipateExpenseIncrease")?,
			anticipate_income_decrease: reader.string("anticipateIncomeDecrease")?,
			anticipate_liquid_asset_decrease: reader.string("anticipateLiquidAssetDecrease")?,
			apply_to_means_tested_benefits: reader.string("applyToMeansTestedBenefits")?,
		})
	}
}

/// Products the customer picked from a previous run, carried into the e-application.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSelection {
	pub selected_product_ids: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub notes: Option<String>,
}
impl CustomerSelection {
	fn read(reader: &FieldReader<'_>) -> Result<Self, ValidationError> {
		Ok(Self {
			selected_product_ids: reader.string_list("selectedProductIds")?.unwrap_or_default(),
			notes: reader.string("notes")?,
		})
	}
}

/// Validates a raw change payload.
///
/// Unknown keys are ignored at every level. `null` and whitespace-only strings are treated as
/// omission. A known key holding the wrong JSON type fails with its dotted path.
pub fn validate_changes(payload: &Value) -> Result<ChangeSet, ValidationError> {
	let Some(root) = payload.as_object() else {
		return Err(ValidationError::new("$", "object"));
	};
	let suitability = section(root, SECTION_SUITABILITY)?
		.map(|object| Suitability::read(&FieldReader::strict(SECTION_SUITABILITY, object)))
		.transpose()?;
	let client_goals = section(root, SECTION_CLIENT_GOALS)?
		.map(|object| ClientGoals::read(&FieldReader::strict(SECTION_CLIENT_GOALS, object)))
		.transpose()?;
	let client_profile = section(root, SECTION_CLIENT_PROFILE)?
		.map(|object| ClientProfile::read(&FieldReader::strict(SECTION_CLIENT_PROFILE, object)))
		.transpose()?;
	let customer_selection = section(root, SECTION_CUSTOMER_SELECTION)?
		.map(|object| {
			CustomerSelection::read(&FieldReader::strict(SECTION_CUSTOMER_SELECTION, object))
		})
		.transpose()?;

	Ok(ChangeSet { suitability, client_goals, client_profile, customer_selection })
}

fn section<'a>(
	root: &'a Map<String, Value>,
	key: &str,
) -> Result<Option<&'a Map<String, Value>>, ValidationError> {
	match root.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Object(object)) => Ok(Some(object)),
		Some(_) => Err(ValidationError::new(key, "object")),
	}
}

struct FieldReader<'a> {
	section: &'static str,
	object: &'a Map<String, Value>,
	strict: bool,
}
impl<'a> FieldReader<'a> {
	fn strict(section: &'static str, object: &'a Map<String, Value>) -> Self {
		Self { section, object, strict: true }
	}

	fn lenient(section: &'static str, object: &'a Map<String, Value>) -> Self {
		Self { section, object, strict: false }
	}

	fn string(&self, key: &str) -> Result<Option<String>, ValidationError> {
		match self.object.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
			Some(Value::String(raw)) => Ok(Some(raw.clone())),
			Some(Value::Number(number)) if !self.strict => Ok(Some(number.to_string())),
			Some(_) => self.mismatch(key, "string"),
		}
	}

	fn string_list(&self, key: &str) -> Result<Option<Vec<String>>, ValidationError> {
		let items = match self.object.get(key) {
			None | Some(Value::Null) => return Ok(None),
			Some(Value::Array(items)) => items,
			Some(_) => return self.mismatch(key, "array of strings"),
		};
		let mut out = Vec::with_capacity(items.len());

		for item in items {
			match item.as_str() {
				Some(raw) => out.push(raw.to_string()),
				None if self.strict =>
					return Err(ValidationError::new(self.path(key), "array of strings")),
				None => {},
			}
		}

		Ok(Some(out))
	}

	fn integer(&self, key: &str) -> Result<Option<i64>, ValidationError> {
		match self.object.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Number(number)) => match number.as_i64() {
				Some(value) => Ok(Some(value)),
				None => self.mismatch(key, "integer"),
			},
			Some(Value::String(raw)) if !self.strict => Ok(raw.trim().parse().ok()),
			Some(_) => self.mismatch(key, "integer"),
		}
	}

	fn integer_within(
		&self,
		key: &str,
		range: RangeInclusive<i64>,
	) -> Result<Option<i64>, ValidationError> {
		match self.integer(key)? {
			Some(value) if !range.contains(&value) => self.mismatch(
				key,
				&format!("integer within {}..={}", range.start(), range.end()),
			),
			value => Ok(value),
		}
	}

	fn boolean(&self, key: &str) -> Result<Option<bool>, ValidationError> {
		match self.object.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(Value::Bool(value)) => Ok(Some(*value)),
			Some(_) => self.mismatch(key, "boolean"),
		}
	}

	fn mismatch<T>(&self, key: &str, expected: &str) -> Result<Option<T>, ValidationError> {
		if self.strict { Err(ValidationError::new(self.path(key), expected)) } else { Ok(None) }
	}

	fn path(&self, key: &str) -> String {
		format!("{}.{key}", self.section)
	}
}
