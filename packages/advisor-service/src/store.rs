use advisor_storage::{
	db::Db,
	models::{
		ClientRow, ContractSummaryRow, ProductRow, RecommendationRunRow, RunEventRow,
		SuitabilityProfileRow,
	},
	queries,
};

use crate::{BoxFuture, ClientStore, Result};

impl ClientStore for Db {
	fn fetch_client<'a>(&'a self, client_id: &'a str) -> BoxFuture<'a, Result<Option<ClientRow>>> {
		Box::pin(async move { Ok(queries::fetch_client(self, client_id).await?) })
	}

	fn fetch_suitability_profile<'a>(
		&'a self,
		client_id: &'a str,
	) -> BoxFuture<'a, Result<Option<SuitabilityProfileRow>>> {
		Box::pin(async move { Ok(queries::fetch_suitability_profile(self, client_id).await?) })
	}

	fn fetch_contract_summary<'a>(
		&'a self,
		client_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<ContractSummaryRow>>> {
		Box::pin(async move { Ok(queries::fetch_contract_summary(self, client_id).await?) })
	}

	fn fetch_products<'a>(&'a self) -> BoxFuture<'a, Result<Vec<ProductRow>>> {
		Box::pin(async move { Ok(queries::fetch_products(self).await?) })
	}

	fn upsert_client_suitability_profile<'a>(
		&'a self,
		row: &'a SuitabilityProfileRow,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::upsert_client_suitability_profile(self, row).await?) })
	}

	fn insert_run_event<'a>(&'a self, event: &'a RunEventRow) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::insert_run_event(self, event).await?) })
	}

	fn insert_recommendation_run<'a>(
		&'a self,
		run: &'a RecommendationRunRow,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::insert_recommendation_run(self, run).await?) })
	}
}
