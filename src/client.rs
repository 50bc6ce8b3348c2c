use crate::error::{AppError, AppResult, ErrorKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrgUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub added_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: Option<String>,
    pub created_at: Option<i64>,
    pub archived_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceAccount {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedApiKey {
    pub id: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedServiceAccount {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub created_at: Option<i64>,
    /// One-time secret; only ever present in the create response.
    pub api_key: Option<CreatedApiKey>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminKey {
    pub id: String,
    pub name: Option<String>,
    pub redacted_value: Option<String>,
    pub created_at: Option<i64>,
    pub last_used_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectApiKey {
    pub id: String,
    pub name: Option<String>,
    pub redacted_value: Option<String>,
    pub created_at: Option<i64>,
    pub last_used_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimit {
    pub id: String,
    pub model: Option<String>,
    pub max_requests_per_1_minute: Option<i64>,
    pub max_tokens_per_1_minute: Option<i64>,
    pub max_requests_per_1_day: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RateLimitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_requests_per_1_minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens_per_1_minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_requests_per_1_day: Option<i64>,
}

impl RateLimitUpdate {
    pub fn is_empty(&self) -> bool {
        self.max_requests_per_1_minute.is_none()
            && self.max_tokens_per_1_minute.is_none()
            && self.max_requests_per_1_day.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Result of a delete call. A 404 means the resource is already gone, which
/// is the end state the caller wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

/// The slice of the organization API the rotation engine consumes. Kept as a
/// trait so the engine can be exercised against an in-memory double.
pub trait RotationApi {
    fn list_service_accounts(&self, project_id: &str, limit: u32) -> AppResult<Vec<ServiceAccount>>;
    fn create_service_account(
        &self,
        project_id: &str,
        name: &str,
    ) -> AppResult<CreatedServiceAccount>;
    fn delete_service_account(
        &self,
        project_id: &str,
        account_id: &str,
    ) -> AppResult<DeleteOutcome>;
}

#[derive(Debug, Clone, Copy)]
pub enum UsageEndpoint {
    Completions,
    Embeddings,
}

impl UsageEndpoint {
    fn path(self) -> &'static str {
        match self {
            UsageEndpoint::Completions => "usage/completions",
            UsageEndpoint::Embeddings => "usage/embeddings",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsQuery {
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub group_by: Vec<String>,
    pub project_ids: Vec<String>,
    pub models: Vec<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    pub limit: u32,
    pub after: Option<String>,
    pub before: Option<String>,
    pub effective_at_gte: Option<i64>,
    pub effective_at_lte: Option<i64>,
    pub event_types: Vec<String>,
    pub project_ids: Vec<String>,
    pub actor_emails: Vec<String>,
}

/// Synchronous client for the organization-management API. One request at a
/// time; no retries beyond what the transport does on its own.
#[derive(Debug)]
pub struct HttpAdminClient {
    agent: ureq::Agent,
    base_url: String,
    admin_key: String,
}

impl HttpAdminClient {
    pub fn from_env(admin_key: Option<String>, api_url: Option<String>) -> AppResult<Self> {
        let admin_key = admin_key
            .or_else(|| std::env::var("ORG_ADMIN_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::config("admin key is required (use --admin-key or ORG_ADMIN_KEY)")
            })?;
        let base_url = api_url
            .or_else(|| std::env::var("ORG_ADMIN_API_URL").ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                AppError::config("API base URL is required (use --api-url or ORG_ADMIN_API_URL)")
            })?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .build();
        Ok(Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn get(&self, path: &str, query: &[(&str, String)], kind: ErrorKind) -> AppResult<Value> {
        let url = self.url(path);
        info!(%url, "GET");
        let mut request = self.agent.get(&url).set(
            "Authorization",
            &format!("Bearer {}", self.admin_key),
        );
        for (key, value) in query {
            request = request.query(key, value);
        }
        let response = request.call().map_err(|err| http_error(kind, &url, err))?;
        read_json(response, &url)
    }

    fn post(&self, path: &str, body: Option<&Value>, kind: ErrorKind) -> AppResult<Value> {
        let url = self.url(path);
        info!(%url, "POST");
        debug!(body = ?body, "request body");
        let request = self.agent.post(&url).set(
            "Authorization",
            &format!("Bearer {}", self.admin_key),
        );
        let response = match body {
            Some(body) => request.send_json(body.clone()),
            None => request.call(),
        }
        .map_err(|err| http_error(kind, &url, err))?;
        read_json(response, &url)
    }

    fn delete(&self, path: &str) -> AppResult<DeleteOutcome> {
        let url = self.url(path);
        info!(%url, "DELETE");
        let result = self
            .agent
            .delete(&url)
            .set("Authorization", &format!("Bearer {}", self.admin_key))
            .call();
        match result {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(ureq::Error::Status(404, _)) => Ok(DeleteOutcome::AlreadyAbsent),
            Err(err) => Err(http_error(ErrorKind::Mutation, &url, err)),
        }
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let value = self.get(path, query, ErrorKind::Fetch)?;
        let page: Page<T> = serde_json::from_value(value)
            .map_err(|e| AppError::fetch(format!("unexpected response from {path}: {e}")))?;
        Ok(page.data)
    }

    pub fn list_users(&self, limit: u32) -> AppResult<Vec<OrgUser>> {
        self.get_page("users", &[("limit", limit.to_string())])
    }

    pub fn list_projects(&self, include_archived: bool, limit: u32) -> AppResult<Vec<Project>> {
        self.get_page(
            "projects",
            &[
                ("include_archived", include_archived.to_string()),
                ("limit", limit.to_string()),
            ],
        )
    }

    pub fn create_project(&self, name: &str) -> AppResult<Project> {
        let value = self.post(
            "projects",
            Some(&serde_json::json!({ "name": name })),
            ErrorKind::Mutation,
        )?;
        decode_record(value, "projects")
    }

    pub fn archive_project(&self, project_id: &str) -> AppResult<Project> {
        let value = self.post(
            &format!("projects/{project_id}/archive"),
            None,
            ErrorKind::Mutation,
        )?;
        decode_record(value, "projects/archive")
    }

    pub fn list_admin_keys(&self, limit: u32) -> AppResult<Vec<AdminKey>> {
        self.get_page("admin_api_keys", &[("limit", limit.to_string())])
    }

    pub fn list_project_api_keys(
        &self,
        project_id: &str,
        limit: u32,
    ) -> AppResult<Vec<ProjectApiKey>> {
        self.get_page(
            &format!("projects/{project_id}/api_keys"),
            &[("limit", limit.to_string())],
        )
    }

    pub fn get_project_api_key(&self, project_id: &str, key_id: &str) -> AppResult<ProjectApiKey> {
        let value = self.get(
            &format!("projects/{project_id}/api_keys/{key_id}"),
            &[],
            ErrorKind::Fetch,
        )?;
        decode_record(value, "api_keys")
    }

    pub fn delete_project_api_key(
        &self,
        project_id: &str,
        key_id: &str,
    ) -> AppResult<DeleteOutcome> {
        self.delete(&format!("projects/{project_id}/api_keys/{key_id}"))
    }

    pub fn get_service_account(
        &self,
        project_id: &str,
        account_id: &str,
    ) -> AppResult<ServiceAccount> {
        let value = self.get(
            &format!("projects/{project_id}/service_accounts/{account_id}"),
            &[],
            ErrorKind::Fetch,
        )?;
        decode_record(value, "service_accounts")
    }

    pub fn list_rate_limits(&self, project_id: &str, limit: u32) -> AppResult<Vec<RateLimit>> {
        self.get_page(
            &format!("projects/{project_id}/rate_limits"),
            &[("limit", limit.to_string())],
        )
    }

    pub fn update_rate_limit(
        &self,
        project_id: &str,
        rate_limit_id: &str,
        update: &RateLimitUpdate,
    ) -> AppResult<RateLimit> {
        let body = serde_json::to_value(update)
            .map_err(|e| AppError::internal(format!("encode rate limit update: {e}")))?;
        let value = self.post(
            &format!("projects/{project_id}/rate_limits/{rate_limit_id}"),
            Some(&body),
            ErrorKind::Mutation,
        )?;
        decode_record(value, "rate_limits")
    }

    pub fn usage(&self, endpoint: UsageEndpoint, query: &AnalyticsQuery) -> AppResult<Value> {
        self.get(endpoint.path(), &analytics_params(query, true), ErrorKind::Fetch)
    }

    pub fn costs(&self, query: &AnalyticsQuery) -> AppResult<Value> {
        self.get("costs", &analytics_params(query, false), ErrorKind::Fetch)
    }

    pub fn audit_logs(&self, query: &AuditQuery) -> AppResult<Value> {
        let mut params: Vec<(&str, String)> = vec![("limit", query.limit.to_string())];
        if let Some(after) = &query.after {
            params.push(("after", after.clone()));
        }
        if let Some(before) = &query.before {
            params.push(("before", before.clone()));
        }
        if let Some(gte) = query.effective_at_gte {
            params.push(("effective_at[gte]", gte.to_string()));
        }
        if let Some(lte) = query.effective_at_lte {
            params.push(("effective_at[lte]", lte.to_string()));
        }
        for event_type in &query.event_types {
            params.push(("event_types[]", event_type.clone()));
        }
        for project_id in &query.project_ids {
            params.push(("project_ids[]", project_id.clone()));
        }
        for email in &query.actor_emails {
            params.push(("actor_emails[]", email.clone()));
        }
        self.get("audit_logs", &params, ErrorKind::Fetch)
    }
}

impl RotationApi for HttpAdminClient {
    fn list_service_accounts(&self, project_id: &str, limit: u32) -> AppResult<Vec<ServiceAccount>> {
        self.get_page(
            &format!("projects/{project_id}/service_accounts"),
            &[("limit", limit.to_string())],
        )
    }

    fn create_service_account(
        &self,
        project_id: &str,
        name: &str,
    ) -> AppResult<CreatedServiceAccount> {
        let value = self.post(
            &format!("projects/{project_id}/service_accounts"),
            Some(&serde_json::json!({ "name": name })),
            ErrorKind::Mutation,
        )?;
        decode_record(value, "service_accounts")
    }

    fn delete_service_account(
        &self,
        project_id: &str,
        account_id: &str,
    ) -> AppResult<DeleteOutcome> {
        self.delete(&format!("projects/{project_id}/service_accounts/{account_id}"))
    }
}

fn analytics_params(query: &AnalyticsQuery, with_models: bool) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = vec![
        ("start_time", query.start_time.to_string()),
        ("limit", query.limit.to_string()),
    ];
    if let Some(end_time) = query.end_time {
        params.push(("end_time", end_time.to_string()));
    }
    for group in &query.group_by {
        params.push(("group_by", group.clone()));
    }
    for project_id in &query.project_ids {
        params.push(("project_ids", project_id.clone()));
    }
    if with_models {
        for model in &query.models {
            params.push(("models", model.clone()));
        }
    }
    params
}

fn decode_record<T: DeserializeOwned>(value: Value, context: &str) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::fetch(format!("unexpected response from {context}: {e}")))
}

fn read_json(response: ureq::Response, url: &str) -> AppResult<Value> {
    let status = response.status();
    debug!(%url, status, "response");
    response
        .into_json::<Value>()
        .map_err(|e| AppError::fetch(format!("invalid JSON from {url}: {e}")))
}

fn http_error(kind: ErrorKind, url: &str, err: ureq::Error) -> AppError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let body = body.trim();
            error!(%url, code, body, "request failed");
            if code == 404 {
                return AppError::not_found(format!("{url} returned 404: {body}"));
            }
            AppError::new(kind, format!("{url} returned HTTP {code}: {body}"))
        }
        ureq::Error::Transport(transport) => {
            error!(%url, error = %transport, "transport failure");
            AppError::new(kind, format!("request to {url} failed: {transport}"))
        }
    }
}
