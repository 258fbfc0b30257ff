//! HTTP client for a PostgREST-style scenario table (e.g. Supabase).

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::error::StoreError;
use super::store::{NewScenario, ScenarioId, ScenarioRecord, ScenarioStore};
use super::types::GraphSnapshot;
use crate::config::StoreConfig;

/// Scenario store reached over REST.
///
/// One request per operation, no retries. Name lookups are ordered by `id`
/// ascending so "first match" is stable.
#[derive(Clone, Debug)]
pub struct RestScenarioStore {
	http: Client,
	endpoint: String,
	api_key: String,
}

impl RestScenarioStore {
	/// A client for `config`'s scenario table.
	pub fn new(config: &StoreConfig) -> Self {
		Self {
			http: Client::new(),
			endpoint: table_endpoint(&config.url, &config.table),
			api_key: config.api_key.clone(),
		}
	}

	/// The table URL every request targets.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
		request
			.header("apikey", &self.api_key)
			.header("Authorization", format!("Bearer {}", self.api_key))
	}

	fn insert_request(&self, scenario: &NewScenario) -> RequestBuilder {
		self.authorize(self.http.post(&self.endpoint))
			.header("Prefer", "return=representation")
			.json(std::slice::from_ref(scenario))
	}

	fn select_request(&self, name: &str) -> RequestBuilder {
		self.authorize(self.http.get(&self.endpoint))
			.query(&[("name", eq(name)), ("select", "*".into()), ("order", "id.asc".into())])
	}

	fn update_request(&self, id: &ScenarioId, snapshot: &GraphSnapshot) -> RequestBuilder {
		self.authorize(self.http.patch(&self.endpoint))
			.query(&[("id", eq(id))])
			.header("Prefer", "return=representation")
			.json(snapshot)
	}
}

/// `{url}/rest/v1/{table}` with any trailing slash on `url` removed.
pub fn table_endpoint(url: &str, table: &str) -> String {
	format!("{}/rest/v1/{}", url.trim_end_matches('/'), table)
}

/// PostgREST equality filter value.
fn eq(value: impl std::fmt::Display) -> String {
	format!("eq.{value}")
}

async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
	let status = response.status();
	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		return Err(StoreError::Status {
			status: status.as_u16(),
			body,
		});
	}
	response
		.json::<T>()
		.await
		.map_err(|e| StoreError::Decode(e.to_string()))
}

/// The single row echoed back by an insert.
async fn read_inserted(response: Response) -> Result<ScenarioRecord, StoreError> {
	let rows: Vec<ScenarioRecord> = read_rows(response).await?;
	rows.into_iter()
		.next()
		.ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
}

fn transport(e: reqwest::Error) -> StoreError {
	StoreError::Transport(e.to_string())
}

#[async_trait(?Send)]
impl ScenarioStore for RestScenarioStore {
	async fn insert(&self, scenario: NewScenario) -> Result<ScenarioRecord, StoreError> {
		debug!("POST {} name={}", self.endpoint, scenario.name);
		let response = self
			.insert_request(&scenario)
			.send()
			.await
			.map_err(transport)?;
		read_inserted(response).await
	}

	async fn select_by_name(&self, name: &str) -> Result<Vec<ScenarioRecord>, StoreError> {
		debug!("GET {} name={}", self.endpoint, name);
		let response = self
			.select_request(name)
			.send()
			.await
			.map_err(transport)?;
		read_rows(response).await
	}

	async fn update(
		&self,
		id: &ScenarioId,
		snapshot: &GraphSnapshot,
	) -> Result<Vec<ScenarioRecord>, StoreError> {
		debug!("PATCH {} id={}", self.endpoint, id);
		let response = self
			.update_request(id, snapshot)
			.send()
			.await
			.map_err(transport)?;
		read_rows(response).await
	}
}
