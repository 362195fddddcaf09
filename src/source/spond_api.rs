//! Live feed of raw records from the Spond API.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;

/// Events requested per page.
const PAGE_SIZE: usize = 100;

/// Spond login credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email_or_phone_number: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from a JSON file `{"emailOrPhoneNumber": .., "password": ..}`.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            AppError::Config(format!(
                "Invalid credentials file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn login_body(&self) -> Value {
        if self.email_or_phone_number.contains('@') {
            json!({ "email": self.email_or_phone_number, "password": self.password })
        } else {
            json!({ "phoneNumber": self.email_or_phone_number, "password": self.password })
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    login_token: String,
}

#[derive(Debug, Deserialize)]
struct GroupSummary {
    id: String,
    #[serde(default)]
    name: String,
}

/// Logged in Spond API session.
pub struct SpondClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SpondClient {
    /// Log in and return a client holding the session token.
    pub async fn login(
        base_url: &str,
        timeout: Duration,
        credentials: &Credentials,
    ) -> Result<Self, AppError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        tracing::info!("Logging in to Spond");
        let response = client
            .post(format!("{}/login", base_url))
            .json(&credentials.login_body())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Spond login failed: {}",
                response.status()
            )));
        }

        let login: LoginResponse = response.json().await?;
        tracing::info!("Log in to Spond complete");

        Ok(Self {
            client,
            base_url,
            token: login.login_token,
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, AppError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Http(format!(
                "Spond request {} failed: {}",
                path,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Resolve a group id from its display name.
    pub async fn find_group(&self, group_name: &str) -> Result<String, AppError> {
        let groups: Vec<GroupSummary> = serde_json::from_value(self.get_json("/groups", &[]).await?)?;

        groups
            .into_iter()
            .find(|g| g.name == group_name)
            .map(|g| g.id)
            .ok_or_else(|| AppError::NotFound(format!("Spond group {} not found", group_name)))
    }

    /// Page through every event of a group, oldest first, handing each raw record to
    /// `handler` in the order received. Returns the number of records handled.
    pub async fn for_each_spond<F>(&self, group_name: &str, mut handler: F) -> Result<usize, AppError>
    where
        F: FnMut(&Value) -> Result<(), AppError>,
    {
        tracing::info!(group = group_name, "Navigating to group");
        let group_id = self.find_group(group_name).await?;

        let mut seen: HashSet<String> = HashSet::new();
        let mut min_start: Option<String> = None;
        let mut handled = 0;

        loop {
            let mut query = vec![
                ("groupId", group_id.clone()),
                ("max", PAGE_SIZE.to_string()),
                ("orderBy", "startTimestamp".to_string()),
                ("order", "asc".to_string()),
                ("includeHidden", "true".to_string()),
                ("addProfileInfo", "true".to_string()),
            ];
            if let Some(start) = &min_start {
                query.push(("minStartTimestamp", start.clone()));
            }

            let page = match self.get_json("/sponds", &query).await? {
                Value::Array(items) => items,
                other => {
                    return Err(AppError::Http(format!(
                        "Unexpected /sponds payload: {}",
                        other
                    )))
                }
            };
            let page_len = page.len();
            let mut fresh = 0;

            for spond in &page {
                let Some(id) = spond.get("id").and_then(Value::as_str) else {
                    continue;
                };
                if !seen.insert(id.to_string()) {
                    continue;
                }
                fresh += 1;
                handler(spond)?;
                handled += 1;
            }

            tracing::info!(received = page_len, new = fresh, "Processed sponds page");

            if page_len < PAGE_SIZE || fresh == 0 {
                break;
            }
            min_start = page
                .last()
                .and_then(|s| s.get("startTimestamp"))
                .and_then(Value::as_str)
                .map(str::to_string);
            if min_start.is_none() {
                break;
            }
        }

        Ok(handled)
    }
}
