mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Comparison, Config, PolicySource, PolicySourcePaths, PolicySourceRemote, Postgres,
	Recommendations, Service, Storage, default_max_recommendations,
};

use std::{fs, path::Path};

pub const POLICY_SOURCE_MODES: [&str; 3] = ["remote", "fixture", "off"];

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.recommendations.max_recommendations == 0 {
		return Err(Error::Validation {
			message: "recommendations.max_recommendations must be greater than zero.".to_string(),
		});
	}
	if cfg.recommendations.agent_id.trim().is_empty() {
		return Err(Error::Validation {
			message: "recommendations.agent_id must be non-empty.".to_string(),
		});
	}

	let mode = cfg.policy_source.mode.as_str();

	if !POLICY_SOURCE_MODES.contains(&mode) {
		return Err(Error::Validation {
			message: "policy_source.mode must be one of remote, fixture, or off.".to_string(),
		});
	}
	if mode == "fixture" && cfg.policy_source.fixture_path.is_none() {
		return Err(Error::Validation {
			message: "policy_source.fixture_path is required when policy_source.mode is fixture."
				.to_string(),
		});
	}
	if mode == "remote" {
		let Some(remote) = cfg.policy_source.remote.as_ref() else {
			return Err(Error::Validation {
				message: "policy_source.remote is required when policy_source.mode is remote."
					.to_string(),
			});
		};

		if remote.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "policy_source.remote.api_base must be non-empty.".to_string(),
			});
		}
		if remote.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: "policy_source.remote.api_key must be non-empty.".to_string(),
			});
		}
		if remote.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "policy_source.remote.timeout_ms must be greater than zero.".to_string(),
			});
		}

		for (label, path) in [
			("policies", &remote.paths.policies),
			("product_options", &remote.paths.product_options),
			("suitability", &remote.paths.suitability),
			("client_profile", &remote.paths.client_profile),
			("notifications", &remote.paths.notifications),
		] {
			if !path.starts_with('/') {
				return Err(Error::Validation {
					message: format!("policy_source.remote.paths.{label} must start with '/'."),
				});
			}
		}
	}
	if let Some(comparison) = cfg.comparison.as_ref() {
		if comparison.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "comparison.api_base must be non-empty.".to_string(),
			});
		}
		if comparison.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "comparison.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.policy_source.mode = cfg.policy_source.mode.trim().to_ascii_lowercase();

	if cfg
		.policy_source
		.fixture_path
		.as_deref()
		.map(|path| path.as_os_str().is_empty())
		.unwrap_or(false)
	{
		cfg.policy_source.fixture_path = None;
	}
	if cfg.comparison.as_ref().map(|comparison| comparison.api_base.trim().is_empty()).unwrap_or(false)
	{
		cfg.comparison = None;
	}
	if let Some(remote) = cfg.policy_source.remote.as_mut() {
		remote.api_base = remote.api_base.trim_end_matches('/').to_string();
	}
	if let Some(comparison) = cfg.comparison.as_mut() {
		comparison.api_base = comparison.api_base.trim_end_matches('/').to_string();
	}
}
