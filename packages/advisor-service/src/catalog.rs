//! Candidate products and the client's current contract, normalized from either source.

use serde_json::Value;

use advisor_domain::{CurrentProduct, ProductCandidate, format_rate, parse_rate};
use advisor_storage::models::{ContractSummaryRow, ProductRow};

use crate::{Context, context::SOURCE_STORE_PRODUCTS};

pub const SOURCE_POLICY_PRODUCTS: &str = "policy_source:productOptions";

/// The external catalog when it yields at least one usable product, otherwise the store
/// catalog, along with the data source label used.
pub fn candidates(context: &Context) -> (Vec<ProductCandidate>, &'static str) {
	let external =
		context.product_options.iter().filter_map(from_product_option).collect::<Vec<_>>();

	if !external.is_empty() {
		return (external, SOURCE_POLICY_PRODUCTS);
	}

	(context.products.iter().map(from_product_row).collect(), SOURCE_STORE_PRODUCTS)
}

/// Normalizes one product option. Options without an identifier are dropped.
pub fn from_product_option(option: &Value) -> Option<ProductCandidate> {
	let product_id = ["productId", "ID", "productCode"]
		.into_iter()
		.find_map(|key| text(option.get(key)))?;

	Some(ProductCandidate {
		product_id,
		name: text(option.get("name"))
			.or_else(|| text(option.get("productName")))
			.unwrap_or_else(|| "Unknown".to_string()),
		carrier: text(option.get("carrier"))
			.or_else(|| text(option.get("carrierCode")))
			.unwrap_or_default(),
		rate: rate(option.get("rate")).or_else(|| rate(attribute(option, "rate"))),
		term: text(option.get("term")),
		premium_bonus: text(option.get("premiumBonus")),
		surrender_period: text(option.get("surrenderPeriod")),
		surrender_charge: text(option.get("surrenderCharge")),
		free_withdrawal: text(option.get("freeWithdrawal")),
		guaranteed_min_rate: text(option.get("guaranteedMinRate")),
		riders: strings(option.get("riders")),
		features: strings(option.get("features")),
		liquidity: text(option.get("liquidity")),
		risk_profile: text(option.get("riskProfile")).or_else(|| text(attribute(option, "riskProfile"))),
	})
}

pub fn from_product_row(row: &ProductRow) -> ProductCandidate {
	ProductCandidate {
		product_id: row.product_id.clone(),
		name: row.product_name.clone(),
		carrier: row.carrier.clone(),
		rate: row.current_fixed_rate.or(row.guaranteed_minimum_rate),
		term: row.product_type.clone(),
		premium_bonus: row.premium_bonus.clone(),
		surrender_period: row.cdsc_years.map(|years| format!("{years} years")),
		surrender_charge: row.surrender_charge.clone(),
		free_withdrawal: row.free_withdrawal_percent.map(format_rate),
		guaranteed_min_rate: row.guaranteed_minimum_rate.map(format_rate),
		riders: row.riders.clone(),
		features: row.key_benefits.clone(),
		liquidity: row.liquidity.clone(),
		risk_profile: row.risk_profile.clone(),
	}
}

/// The largest stored contract, else the first external policy with a parseable current rate.
pub fn current_product(context: &Context) -> Option<CurrentProduct> {
	if let Some(contract) = context.contract_summary.first() {
		return Some(from_contract(contract));
	}

	context.policies.iter().find_map(from_policy)
}

fn from_contract(row: &ContractSummaryRow) -> CurrentProduct {
	CurrentProduct {
		name: row.product_name.clone(),
		carrier: row.carrier.clone(),
		rate: row.current_rate,
		riders: row.riders.clone(),
		free_withdrawal: row.free_withdrawal.clone(),
		surrender_remaining: row.surrender_remaining.clone(),
	}
}

fn from_policy(policy: &Value) -> Option<CurrentProduct> {
	let rate = rate(policy.get("currentRate"))?;
	let features = policy.get("features");

	Some(CurrentProduct {
		name: text(policy.get("productName"))
			.or_else(|| text(policy.pointer("/productSnapshot/name")))
			.unwrap_or_else(|| "Current contract".to_string()),
		carrier: text(policy.get("carrier")).unwrap_or_default(),
		rate: Some(rate),
		riders: strings(policy.get("riders")),
		free_withdrawal: text(features.and_then(|features| features.get("withdrawalAllowance"))),
		surrender_remaining: text(features.and_then(|features| features.get("surrenderCharge"))),
	})
}

fn attribute<'v>(option: &'v Value, name: &str) -> Option<&'v Value> {
	option.get("attributes")?.as_array()?.iter().find_map(|attribute| {
		let key = attribute.get("name").or_else(|| attribute.get("key"))?.as_str()?;

		if key.trim().eq_ignore_ascii_case(name) {
			attribute.get("value").or_else(|| attribute.get("val"))
		} else {
			None
		}
	})
}

fn text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::String(raw) => Some(raw.trim()).filter(|raw| !raw.is_empty()).map(str::to_string),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn rate(value: Option<&Value>) -> Option<f64> {
	match value? {
		Value::String(raw) => parse_rate(raw),
		Value::Number(number) => number.as_f64(),
		_ => None,
	}
}

fn strings(value: Option<&Value>) -> Vec<String> {
	value
		.and_then(Value::as_array)
		.map(|items| items.iter().filter_map(|item| text(Some(item))).collect())
		.unwrap_or_default()
}
