use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{
		ClientRow, ContractSummaryRow, ProductRow, RecommendationRunRow, RunEventRow,
		SuitabilityProfileRow,
	},
};

pub async fn fetch_client(db: &Db, client_account_number: &str) -> Result<Option<ClientRow>> {
	let row = sqlx::query_as::<_, ClientRow>(
		"\
SELECT client_account_number, client_name, external_customer_id, created_at
FROM clients
WHERE client_account_number = $1",
	)
	.bind(client_account_number)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn fetch_suitability_profile(
	db: &Db,
	client_account_number: &str,
) -> Result<Option<SuitabilityProfileRow>> {
	let row = sqlx::query_as::<_, SuitabilityProfileRow>(
		"\
SELECT
	client_account_number,
	age,
	state,
	risk_tolerance,
	primary_objective,
	secondary_objective,
	liquidity_importance,
	investment_horizon,
	withdrawal_horizon,
	current_income_need,
	annual_income_range,
	net_worth_range,
	liquid_net_worth_range,
	tax_bracket
FROM client_suitability_profiles
WHERE client_account_number = $1",
	)
	.bind(client_account_number)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

/// Contracts held by the client, largest contract value first.
pub async fn fetch_contract_summary(
	db: &Db,
	client_account_number: &str,
) -> Result<Vec<ContractSummaryRow>> {
	let rows = sqlx::query_as::<_, ContractSummaryRow>(
		"\
SELECT
	contract_id,
	client_account_number,
	carrier,
	product_name,
	contract_value,
	current_rate,
	riders,
	free_withdrawal,
	surrender_remaining
FROM contract_summary
WHERE client_account_number = $1
ORDER BY contract_value DESC NULLS LAST, contract_id ASC",
	)
	.bind(client_account_number)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Products currently approved for sale.
pub async fn fetch_products(db: &Db) -> Result<Vec<ProductRow>> {
	let rows = sqlx::query_as::<_, ProductRow>(
		"\
SELECT
	product_id,
	carrier,
	product_name,
	product_type,
	current_fixed_rate,
	guaranteed_minimum_rate,
	premium_bonus,
	cdsc_years,
	surrender_charge,
	free_withdrawal_percent,
	riders,
	key_benefits,
	liquidity,
	risk_profile,
	compliance_notes
FROM products
WHERE can_sell = true
ORDER BY current_fixed_rate DESC NULLS LAST, product_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Insert-or-update keyed by client account number. Concurrent writers for the same client
/// resolve as last write wins.
pub async fn upsert_client_suitability_profile(db: &Db, row: &SuitabilityProfileRow) -> Result<()> {
	if row.client_account_number.trim().is_empty() {
		return Err(Error::InvalidArgument(
			"client_account_number must be non-empty for a suitability upsert.".to_string(),
		));
	}

	upsert_client_suitability_profile_exec(&db.pool, row).await
}

pub async fn insert_run_event(db: &Db, event: &RunEventRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO agent_run_events (
	event_id,
	occurred_at,
	agent_id,
	run_id,
	client_id_scope,
	input_summary,
	success,
	error_message,
	explanation_summary,
	data_sources_used,
	choice_criteria,
	input_validation_passed,
	guardrail_triggered,
	payload_ref
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(event.event_id)
	.bind(event.occurred_at)
	.bind(event.agent_id.as_str())
	.bind(event.run_id)
	.bind(event.client_id_scope.as_str())
	.bind(&event.input_summary)
	.bind(event.success)
	.bind(event.error_message.as_deref())
	.bind(event.explanation_summary.as_deref())
	.bind(&event.data_sources_used)
	.bind(&event.choice_criteria)
	.bind(event.input_validation_passed)
	.bind(event.guardrail_triggered)
	.bind(event.payload_ref)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_recommendation_run(db: &Db, run: &RecommendationRunRow) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO agent_two_recommendation_runs (id, run_id, created_at, client_id, payload)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(run.id)
	.bind(run.run_id)
	.bind(run.created_at)
	.bind(run.client_id.as_str())
	.bind(&run.payload)
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn fetch_run_events(db: &Db, run_id: Uuid) -> Result<Vec<RunEventRow>> {
	let rows = sqlx::query_as::<_, RunEventRow>(
		"\
SELECT
	event_id,
	occurred_at,
	agent_id,
	run_id,
	client_id_scope,
	input_summary,
	success,
	error_message,
	explanation_summary,
	data_sources_used,
	choice_criteria,
	input_validation_passed,
	guardrail_triggered,
	payload_ref
FROM agent_run_events
WHERE run_id = $1
ORDER BY occurred_at ASC",
	)
	.bind(run_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

async fn upsert_client_suitability_profile_exec<'e, E>(
	executor: E,
	row: &SuitabilityProfileRow,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO client_suitability_profiles (
	client_account_number,
	age,
	state,
	risk_tolerance,
	primary_objective,
	secondary_objective,
	liquidity_importance,
	investment_horizon,
	withdrawal_horizon,
	current_income_need,
	annual_income_range,
	net_worth_range,
	liquid_net_worth_range,
	tax_bracket,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now())
ON CONFLICT (client_account_number) DO UPDATE
SET
	age = EXCLUDED.age,
	state = EXCLUDED.state,
	risk_tolerance = EXCLUDED.risk_tolerance,
	primary_objective = EXCLUDED.primary_objective,
	secondary_objective = EXCLUDED.secondary_objective,
	liquidity_importance = EXCLUDED.liquidity_importance,
	investment_horizon = EXCLUDED.investment_horizon,
	withdrawal_horizon = EXCLUDED.withdrawal_horizon,
	current_income_need = EXCLUDED.current_income_need,
	annual_income_range = EXCLUDED.annual_income_range,
	net_worth_range = EXCLUDED.net_worth_range,
	liquid_net_worth_range = EXCLUDED.liquid_net_worth_range,
	tax_bracket = EXCLUDED.tax_bracket,
	updated_at = now()",
	)
	.bind(row.client_account_number.as_str())
	.bind(row.age)
	.bind(row.state.as_deref())
	.bind(row.risk_tolerance.as_deref())
	.bind(row.primary_objective.as_deref())
	.bind(row.secondary_objective.as_deref())
	.bind(row.liquidity_importance.as_deref())
	.bind(row.investment_horizon.as_deref())
	.bind(row.withdrawal_horizon.as_deref())
	.bind(row.current_income_need.as_deref())
	.bind(row.annual_income_range.as_deref())
	.bind(row.net_worth_range.as_deref())
	.bind(row.liquid_net_worth_range.as_deref())
	.bind(row.tax_bracket.as_deref())
	.execute(executor)
	.await?;

	Ok(())
}
