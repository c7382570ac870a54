use std::sync::Arc;

use advisor_service::AdvisorService;
use advisor_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AdvisorService>,
}
impl AppState {
	pub async fn new(config: advisor_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = AdvisorService::new(config, db)?;

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: AdvisorService) -> Self {
		Self { service: Arc::new(service) }
	}
}
