use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use advisor_domain::{ClientGoals, ClientProfile, ProfileState, Suitability};
use advisor_storage::models::{ClientRow, ContractSummaryRow, ProductRow, SuitabilityProfileRow};

use crate::{AdvisorService, Error, PolicyResource, Result};

pub const SOURCE_STORE_CLIENT: &str = "store:clients";
pub const SOURCE_STORE_SUITABILITY: &str = "store:client_suitability_profiles";
pub const SOURCE_STORE_CONTRACTS: &str = "store:contract_summary";
pub const SOURCE_STORE_PRODUCTS: &str = "store:products";
/// Prefix marking an upstream that was consulted but failed.
pub const DEGRADED_PREFIX: &str = "degraded:";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
	pub client_account_number: String,
	pub client_name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub external_customer_id: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl ClientRecord {
	/// Identifier used against the external policy source.
	pub fn customer_id(&self) -> &str {
		self.external_customer_id
			.as_deref()
			.filter(|id| !id.trim().is_empty())
			.unwrap_or(&self.client_account_number)
	}
}
impl From<ClientRow> for ClientRecord {
	fn from(row: ClientRow) -> Self {
		Self {
			client_account_number: row.client_account_number,
			client_name: row.client_name,
			external_customer_id: row.external_customer_id,
			created_at: row.created_at,
		}
	}
}

/// Read-only snapshot of everything known about one client, rebuilt on every request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
	pub client: ClientRecord,
	pub suitability_profile: Option<SuitabilityProfileRow>,
	pub contract_summary: Vec<ContractSummaryRow>,
	pub products: Vec<ProductRow>,
	pub policies: Vec<Value>,
	pub product_options: Vec<Value>,
	pub suitability_data: Vec<Value>,
	pub client_profiles: Vec<Value>,
	pub notifications: Vec<Value>,
	pub data_sources: Vec<String>,
	/// Upstream degradations worth surfacing to the advisor.
	pub source_notes: Vec<String>,
}
impl Context {
	/// The external source's contribution to the merge.
	pub fn external_profile_state(&self) -> ProfileState {
		let suitability =
			self.suitability_data.first().map(Suitability::from_external).unwrap_or_default();
		let (client_profile, client_goals) = match self.client_profiles.first() {
			Some(profile) => (
				ClientProfile::from_external(profile),
				ClientGoals::from_external(profile.get("clientGoals").unwrap_or(profile)),
			),
			None => Default::default(),
		};

		ProfileState { suitability, client_goals, client_profile }
	}
}

#[derive(Default)]
struct ExternalData {
	policies: Vec<Value>,
	product_options: Vec<Value>,
	suitability_data: Vec<Value>,
	client_profiles: Vec<Value>,
	notifications: Vec<Value>,
	data_sources: Vec<String>,
	source_notes: Vec<String>,
}
impl ExternalData {
	fn slot(&mut self, resource: PolicyResource) -> &mut Vec<Value> {
		match resource {
			PolicyResource::Policies => &mut self.policies,
			PolicyResource::ProductOptions => &mut self.product_options,
			PolicyResource::Suitability => &mut self.suitability_data,
			PolicyResource::ClientProfile => &mut self.client_profiles,
			PolicyResource::Notifications => &mut self.notifications,
		}
	}
}

impl AdvisorService {
	/// Read-only view of the context the pipeline would act on.
	pub async fn get_current_database_context(&self, client_id: &str) -> Result<Context> {
		let client = self.lookup_client(client_id).await?;

		self.aggregate_context(client).await
	}

	pub(crate) async fn lookup_client(&self, client_id: &str) -> Result<ClientRecord> {
		let client_id = client_id.trim();

		if client_id.is_empty() {
			return Err(Error::InvalidRequest { message: "clientId must be non-empty.".to_string() });
		}

		match self.store.fetch_client(client_id).await? {
			Some(row) => Ok(row.into()),
			None => Err(Error::NotFound { message: format!("Client {client_id:?} does not exist.") }),
		}
	}

	/// Store reads and external reads run concurrently and are joined before returning. Store
	/// failures abort; external failures degrade to empty data with a note.
	pub(crate) async fn aggregate_context(&self, client: ClientRecord) -> Result<Context> {
		let account = client.client_account_number.as_str();
		let store_reads = async {
			tokio::try_join!(
				self.store.fetch_suitability_profile(account),
				self.store.fetch_contract_summary(account),
				self.store.fetch_products(),
			)
		};
		let (store, external) = tokio::join!(store_reads, self.fetch_external(client.customer_id()));
		let (suitability_profile, contract_summary, products) = store?;
		let mut data_sources = vec![SOURCE_STORE_CLIENT.to_string()];

		if suitability_profile.is_some() {
			data_sources.push(SOURCE_STORE_SUITABILITY.to_string());
		}
		if !contract_summary.is_empty() {
			data_sources.push(SOURCE_STORE_CONTRACTS.to_string());
		}
		if !products.is_empty() {
			data_sources.push(SOURCE_STORE_PRODUCTS.to_string());
		}

		data_sources.extend(external.data_sources);

		Ok(Context {
			client,
			suitability_profile,
			contract_summary,
			products,
			policies: external.policies,
			product_options: external.product_options,
			suitability_data: external.suitability_data,
			client_profiles: external.client_profiles,
			notifications: external.notifications,
			data_sources,
			source_notes: external.source_notes,
		})
	}

	async fn fetch_external(&self, customer_id: &str) -> ExternalData {
		let mut external = ExternalData::default();
		let Some(source) = self.policy_source.as_ref() else {
			tracing::debug!(customer_id, "No policy source configured; using store data only.");

			return external;
		};

		for resource in PolicyResource::ALL {
			match source.fetch(resource, customer_id).await {
				Ok(items) => {
					external.data_sources.push(format!("policy_source:{}", resource.response_key()));
					*external.slot(resource) = items;
				},
				Err(err) if resource == PolicyResource::Notifications => {
					tracing::debug!(customer_id, error = %err, "Notifications unavailable.");
				},
				Err(err) => {
					tracing::warn!(
						customer_id,
						resource = resource.response_key(),
						error = %err,
						"Policy source fetch failed; continuing without it."
					);
					external.data_sources.push(format!(
						"{DEGRADED_PREFIX}policy_source:{}",
						resource.response_key()
					));
					external.source_notes.push(format!(
						"External {} data was unavailable; results rely on stored data.",
						resource.response_key()
					));
				},
			}
		}

		external
	}
}
