pub mod comparison;
pub mod policy_data;

mod error;

pub use error::{Error, Result};

use reqwest::{
	Url,
	header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

pub const USER_ID_HEADER: &str = "UserID";

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = default_headers_map(default_headers)?;

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(headers)
}

pub fn default_headers_map(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, HeaderValue::from_str(raw)?);
	}

	Ok(headers)
}

/// Joins `segments` onto `api_base`, percent-encoding each one.
pub fn endpoint(api_base: &str, segments: &[&str]) -> Result<Url> {
	let mut url = Url::parse(api_base).map_err(|err| Error::InvalidConfig {
		message: format!("Invalid api_base {api_base:?}: {err}."),
	})?;

	{
		let mut path = url.path_segments_mut().map_err(|_| Error::InvalidConfig {
			message: format!("api_base {api_base:?} cannot carry a path."),
		})?;

		path.pop_if_empty();
		path.extend(segments);
	}

	Ok(url)
}
