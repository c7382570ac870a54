use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub policy_source: PolicySource,
	pub comparison: Option<Comparison>,
	#[serde(default)]
	pub recommendations: Recommendations,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct PolicySource {
	/// One of "remote", "fixture", or "off".
	pub mode: String,
	/// Required when mode is "fixture". JSON keyed by customer identifier.
	pub fixture_path: Option<PathBuf>,
	/// Required when mode is "remote".
	pub remote: Option<PolicySourceRemote>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PolicySourceRemote {
	pub api_base: String,
	pub api_key: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
	#[serde(default)]
	pub paths: PolicySourcePaths,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PolicySourcePaths {
	pub policies: String,
	pub product_options: String,
	pub suitability: String,
	pub client_profile: String,
	pub notifications: String,
}
impl Default for PolicySourcePaths {
	fn default() -> Self {
		Self {
			policies: "/puddle/policyData".to_string(),
			product_options: "/puddle/productOption".to_string(),
			suitability: "/puddle/suitabilityData".to_string(),
			client_profile: "/puddle/profiles".to_string(),
			notifications: "/puddle/notifications".to_string(),
		}
	}
}

/// Optional comparison service. Leaving the section out disables the comparison side-branch.
#[derive(Clone, Debug, Deserialize)]
pub struct Comparison {
	pub api_base: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Recommendations {
	pub max_recommendations: u32,
	pub agent_id: String,
}
impl Default for Recommendations {
	fn default() -> Self {
		Self { max_recommendations: default_max_recommendations(), agent_id: default_agent_id() }
	}
}

pub fn default_max_recommendations() -> u32 {
	5
}

fn default_agent_id() -> String {
	"agent_two".to_string()
}
