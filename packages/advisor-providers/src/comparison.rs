use std::time::Duration;

use reqwest::{Client, Method};
use serde_json::Value;

use crate::Result;

pub async fn save_client_profile(
	cfg: &advisor_config::Comparison,
	client_id: &str,
	profile: &Value,
) -> Result<()> {
	send(cfg, Method::PUT, &["clients", client_id, "profile"], Some(profile)).await?;

	Ok(())
}

pub async fn save_suitability(
	cfg: &advisor_config::Comparison,
	alert_id: &str,
	suitability: &Value,
) -> Result<()> {
	send(cfg, Method::PUT, &["alerts", alert_id, "suitability"], Some(suitability)).await?;

	Ok(())
}

/// Runs the comparison for an alert and returns the service's JSON result.
pub async fn run_comparison(cfg: &advisor_config::Comparison, alert_id: &str) -> Result<Value> {
	send(cfg, Method::POST, &["alerts", alert_id, "compare"], None).await
}

async fn send(
	cfg: &advisor_config::Comparison,
	method: Method,
	segments: &[&str],
	body: Option<&Value>,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, segments)?;

	tracing::debug!(method = %method, url = %url, "Calling comparison service.");

	let mut req = client.request(method, url).headers(crate::default_headers_map(&cfg.default_headers)?);

	if let Some(body) = body {
		req = req.json(body);
	}

	let res = req.send().await?.error_for_status()?;
	let bytes = res.bytes().await?;

	parse_body(&bytes)
}

fn parse_body(bytes: &[u8]) -> Result<Value> {
	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	Ok(serde_json::from_slice(bytes)?)
}
