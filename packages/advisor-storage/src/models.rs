use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ClientRow {
	pub client_account_number: String,
	pub client_name: String,
	pub external_customer_id: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, sqlx::FromRow)]
pub struct SuitabilityProfileRow {
	pub client_account_number: String,
	pub age: Option<i32>,
	pub state: Option<String>,
	pub risk_tolerance: Option<String>,
	pub primary_objective: Option<String>,
	pub secondary_objective: Option<String>,
	pub liquidity_importance: Option<String>,
	pub investment_horizon: Option<String>,
	pub withdrawal_horizon: Option<String>,
	pub current_income_need: Option<String>,
	pub annual_income_range: Option<String>,
	pub net_worth_range: Option<String>,
	pub liquid_net_worth_range: Option<String>,
	pub tax_bracket: Option<String>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct ContractSummaryRow {
	pub contract_id: String,
	pub client_account_number: String,
	pub carrier: String,
	pub product_name: String,
	pub contract_value: Option<f64>,
	pub current_rate: Option<f64>,
	pub riders: Vec<String>,
	pub free_withdrawal: Option<String>,
	pub surrender_remaining: Option<String>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct ProductRow {
	pub product_id: String,
	pub carrier: String,
	pub product_name: String,
	pub product_type: Option<String>,
	pub current_fixed_rate: Option<f64>,
	pub guaranteed_minimum_rate: Option<f64>,
	pub premium_bonus: Option<String>,
	pub cdsc_years: Option<i32>,
	pub surrender_charge: Option<String>,
	pub free_withdrawal_percent: Option<f64>,
	pub riders: Vec<String>,
	pub key_benefits: Vec<String>,
	pub liquidity: Option<String>,
	pub risk_profile: Option<String>,
	pub compliance_notes: Option<String>,
}

/// One append-only row per pipeline run.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct RunEventRow {
	pub event_id: Uuid,
	pub occurred_at: OffsetDateTime,
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

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct RecommendationRunRow {
	pub id: Uuid,
	pub run_id: Uuid,
	pub created_at: OffsetDateTime,
	pub client_id: String,
	pub payload: Value,
}
