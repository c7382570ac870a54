pub mod audit;
pub mod catalog;
pub mod comparison;
pub mod context;
pub mod payload;
pub mod policy_source;
pub mod profile_rows;
pub mod recommendations;
pub mod store;
pub mod time_serde;

mod error;

pub use audit::{AuditEvent, PersistOutcome, PersistenceReport};
pub use comparison::RemoteComparison;
pub use context::{ClientRecord, Context};
pub use error::{Error, Result};
pub use payload::{
	ElectronicApplicationPayload, ExplainedProduct, FinalEAppOutput, SelectedProduct,
	StorablePayload,
};
pub use policy_source::{FixturePolicySource, PolicyResource, RemotePolicySource};
pub use recommendations::{RecommendationOutput, RecommendationRequest};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use advisor_config::Config;
use advisor_storage::{
	db::Db,
	models::{
		ClientRow, ContractSummaryRow, ProductRow, RecommendationRunRow, RunEventRow,
		SuitabilityProfileRow,
	},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read and write access to the relational store.
pub trait ClientStore
where
	Self: Send + Sync,
{
	fn fetch_client<'a>(&'a self, client_id: &'a str) -> BoxFuture<'a, Result<Option<ClientRow>>>;

	fn fetch_suitability_profile<'a>(
		&'a self,
		client_id: &'a str,
	) -> BoxFuture<'a, Result<Option<SuitabilityProfileRow>>>;

	fn fetch_contract_summary<'a>(
		&'a self,
		client_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<ContractSummaryRow>>>;

	fn fetch_products<'a>(&'a self) -> BoxFuture<'a, Result<Vec<ProductRow>>>;

	fn upsert_client_suitability_profile<'a>(
		&'a self,
		row: &'a SuitabilityProfileRow,
	) -> BoxFuture<'a, Result<()>>;

	fn insert_run_event<'a>(&'a self, event: &'a RunEventRow) -> BoxFuture<'a, Result<()>>;

	fn insert_recommendation_run<'a>(
		&'a self,
		run: &'a RecommendationRunRow,
	) -> BoxFuture<'a, Result<()>>;
}

/// Read-only policy, product, suitability, and profile data keyed by external customer id.
pub trait PolicySource
where
	Self: Send + Sync,
{
	fn fetch<'a>(
		&'a self,
		resource: PolicyResource,
		customer_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<Value>>>;
}

/// Remote comparison of saved client snapshots for a renewal alert.
pub trait ComparisonService
where
	Self: Send + Sync,
{
	fn save_client_profile<'a>(
		&'a self,
		client_id: &'a str,
		profile: &'a Value,
	) -> BoxFuture<'a, Result<()>>;

	fn save_suitability<'a>(
		&'a self,
		alert_id: &'a str,
		suitability: &'a Value,
	) -> BoxFuture<'a, Result<()>>;

	fn compare<'a>(&'a self, alert_id: &'a str) -> BoxFuture<'a, Result<Value>>;
}

pub struct AdvisorService {
	pub cfg: Config,
	pub store: Arc<dyn ClientStore>,
	pub policy_source: Option<Arc<dyn PolicySource>>,
	pub comparison: Option<Arc<dyn ComparisonService>>,
}
impl AdvisorService {
	/// Wires the Postgres store with the policy source and comparison service named by `cfg`.
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let policy_source = policy_source::from_config(&cfg.policy_source)?;
		let comparison = cfg
			.comparison
			.clone()
			.map(|comparison| Arc::new(RemoteComparison::new(comparison)) as Arc<dyn ComparisonService>);

		Ok(Self { cfg, store: Arc::new(db), policy_source, comparison })
	}

	pub fn with_collaborators(
		cfg: Config,
		store: Arc<dyn ClientStore>,
		policy_source: Option<Arc<dyn PolicySource>>,
		comparison: Option<Arc<dyn ComparisonService>>,
	) -> Self {
		Self { cfg, store, policy_source, comparison }
	}

	pub(crate) fn max_recommendations(&self) -> usize {
		self.cfg.recommendations.max_recommendations as usize
	}
}
