use serde_json::Value;

use advisor_config::Comparison;
use advisor_providers::comparison;

use crate::{BoxFuture, ComparisonService, Result};

pub struct RemoteComparison {
	cfg: Comparison,
}
impl RemoteComparison {
	pub fn new(cfg: Comparison) -> Self {
		Self { cfg }
	}
}
impl ComparisonService for RemoteComparison {
	fn save_client_profile<'a>(
		&'a self,
		client_id: &'a str,
		profile: &'a Value,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			Ok(comparison::save_client_profile(&self.cfg, client_id, profile).await?)
		})
	}

	fn save_suitability<'a>(
		&'a self,
		alert_id: &'a str,
		suitability: &'a Value,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			Ok(comparison::save_suitability(&self.cfg, alert_id, suitability).await?)
		})
	}

	fn compare<'a>(&'a self, alert_id: &'a str) -> BoxFuture<'a, Result<Value>> {
		Box::pin(async move { Ok(comparison::run_comparison(&self.cfg, alert_id).await?) })
	}
}
