use std::{collections::HashMap, fs, path::Path, sync::Arc};

use serde_json::{Map, Value};

use advisor_config::{PolicySourcePaths, PolicySourceRemote};
use advisor_providers::policy_data;

use crate::{BoxFuture, Error, PolicySource, Result};

/// Fixture entry used for customers without their own entry.
pub const FIXTURE_FALLBACK_KEY: &str = "*";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyResource {
	Policies,
	ProductOptions,
	Suitability,
	ClientProfile,
	Notifications,
}
impl PolicyResource {
	/// Fetch order used by the context aggregator.
	pub const ALL: [Self; 5] = [
		Self::Policies,
		Self::ProductOptions,
		Self::Suitability,
		Self::ClientProfile,
		Self::Notifications,
	];

	/// Key under which the API and fixtures wrap the resource list.
	pub fn response_key(self) -> &'static str {
		match self {
			Self::Policies => "policyData",
			Self::ProductOptions => "productOptions",
			Self::Suitability => "suitabilityData",
			Self::ClientProfile => "clientProfiles",
			Self::Notifications => "notifications",
		}
	}

	pub fn path(self, paths: &PolicySourcePaths) -> &str {
		match self {
			Self::Policies => &paths.policies,
			Self::ProductOptions => &paths.product_options,
			Self::Suitability => &paths.suitability,
			Self::ClientProfile => &paths.client_profile,
			Self::Notifications => &paths.notifications,
		}
	}
}

pub struct RemotePolicySource {
	cfg: PolicySourceRemote,
}
impl RemotePolicySource {
	pub fn new(cfg: PolicySourceRemote) -> Self {
		Self { cfg }
	}
}
impl PolicySource for RemotePolicySource {
	fn fetch<'a>(
		&'a self,
		resource: PolicyResource,
		customer_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>> {
		Box::pin(async move {
			let path = resource.path(&self.cfg.paths);

			Ok(policy_data::fetch_resource(&self.cfg, path, resource.response_key(), customer_id)
				.await?)
		})
	}
}

/// In-memory policy data loaded from a JSON document shaped as
/// `{ "<customer id>": { "policyData": [...], "productOptions": [...], ... } }`.
#[derive(Debug, Default)]
pub struct FixturePolicySource {
	customers: HashMap<String, Map<String, Value>>,
}
impl FixturePolicySource {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path).map_err(|err| Error::InvalidRequest {
			message: format!("Failed to read policy source fixture at {path:?}: {err}."),
		})?;
		let value = serde_json::from_str(&raw).map_err(|err| Error::InvalidRequest {
			message: format!("Failed to parse policy source fixture at {path:?}: {err}."),
		})?;

		Self::from_value(value)
	}

	pub fn from_value(value: Value) -> Result<Self> {
		let Value::Object(root) = value else {
			return Err(Error::InvalidRequest {
				message: "Policy source fixture must be a JSON object keyed by customer id."
					.to_string(),
			});
		};
		let mut customers = HashMap::with_capacity(root.len());

		for (customer_id, entry) in root {
			let Value::Object(entry) = entry else {
				return Err(Error::InvalidRequest {
					message: format!("Policy source fixture entry {customer_id:?} must be an object."),
				});
			};

			customers.insert(customer_id, entry);
		}

		Ok(Self { customers })
	}

	fn resource(&self, resource: PolicyResource, customer_id: &str) -> Vec<Value> {
		self.customers
			.get(customer_id)
			.or_else(|| self.customers.get(FIXTURE_FALLBACK_KEY))
			.and_then(|entry| entry.get(resource.response_key()))
			.and_then(Value::as_array)
			.cloned()
			.unwrap_or_default()
	}
}
impl PolicySource for FixturePolicySource {
	fn fetch<'a>(
		&'a self,
		resource: PolicyResource,
		customer_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>> {
		let items = self.resource(resource, customer_id);

		Box::pin(async move { Ok(items) })
	}
}

/// Picks the policy source implementation named by `policy_source.mode`.
pub fn from_config(cfg: &advisor_config::PolicySource) -> Result<Option<Arc<dyn PolicySource>>> {
	match cfg.mode.as_str() {
		"remote" => {
			let Some(remote) = cfg.remote.clone() else {
				return Err(Error::InvalidRequest {
					message: "policy_source.remote is required in remote mode.".to_string(),
				});
			};

			Ok(Some(Arc::new(RemotePolicySource::new(remote))))
		},
		"fixture" => {
			let Some(path) = cfg.fixture_path.as_deref() else {
				return Err(Error::InvalidRequest {
					message: "policy_source.fixture_path is required in fixture mode.".to_string(),
				});
			};

			Ok(Some(Arc::new(FixturePolicySource::load(path)?)))
		},
		_ => Ok(None),
	}
}
