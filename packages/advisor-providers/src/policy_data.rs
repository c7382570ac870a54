use std::time::Duration;

use reqwest::{
	Client,
	header::{HeaderName, HeaderValue},
};
use serde_json::Value;

use crate::{Error, Result};

/// Fetches one resource list for a customer from the policy data API.
///
/// The API answers either with a bare array or with an object wrapping the array under
/// `response_key`.
pub async fn fetch_resource(
	cfg: &advisor_config::PolicySourceRemote,
	path: &str,
	response_key: &str,
	customer_id: &str,
) -> Result<Vec<Value>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, path);
	let mut headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;

	headers.insert(
		HeaderName::from_bytes(crate::USER_ID_HEADER.as_bytes())?,
		HeaderValue::from_str(customer_id)?,
	);

	let res = client.get(url).headers(headers).query(&[("persona", "agent")]).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_resource_response(json, response_key)
}

fn parse_resource_response(json: Value, response_key: &str) -> Result<Vec<Value>> {
	match json {
		Value::Array(items) => Ok(items),
		Value::Object(mut object) => match object.remove(response_key) {
			Some(Value::Array(items)) => Ok(items),
			Some(Value::Null) | None => Ok(Vec::new()),
			Some(_) => Err(Error::InvalidResponse {
				message: format!("Policy data field {response_key:?} must be an array."),
			}),
		},
		_ => Err(Error::InvalidResponse {
			message: "Policy data response must be an array or an object.".to_string(),
		}),
	}
}
