// ABOUTME: HTTP client for the LLC backend, bearer-token authenticated
// ABOUTME: Covers auth, record CRUD, multipart submission, token-scoped reviews

use reqwest::{multipart, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use llc_core::{DeploymentProcessing, LlcRecord, UserProfile, WorkflowStatus};
use llc_forms::SubmissionParts;

use crate::error::{LlcError, LlcResult};
use crate::session::Session;

/// Client configuration. `api_url` serves JSON endpoints, `backend_url`
/// serves uploaded files and generated documents.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub backend_url: String,
}

/// Payload for account creation.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Review step verdict sent to the decision endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewVerdict {
    Approve,
    Reject,
}

impl ReviewVerdict {
    fn action(&self) -> &'static str {
        match self {
            ReviewVerdict::Approve => "approve",
            ReviewVerdict::Reject => "reject",
        }
    }
}

/// Main client for LLC backend operations
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    api_url: String,
    backend_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> LlcResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlcError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
            access_token: None,
        })
    }

    /// Set the bearer token after sign-in or session restore.
    pub fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Public URL of an uploaded file or generated document.
    pub fn file_url(&self, storage_path: &str) -> String {
        format!("{}/{}", self.backend_url, storage_path.trim_start_matches('/'))
    }

    fn auth_header(&self) -> LlcResult<String> {
        let token = self
            .access_token
            .as_ref()
            .ok_or_else(|| LlcError::auth("Not signed in"))?;
        Ok(format!("Bearer {}", token))
    }

    /// Pull the backend's error message out of a failed response.
    async fn error_from(response: reqwest::Response, fallback: &str) -> LlcError {
        let status = response.status();
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("{fallback} ({status})"));
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlcError::Authentication(message),
            StatusCode::NOT_FOUND => LlcError::NotFound(message),
            _ => LlcError::Api(message),
        }
    }

    // ---- auth ----

    /// Sign in and return the session to persist.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> LlcResult<Session> {
        let url = format!("{}/auth/signin", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Sign in failed").await);
        }
        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| LlcError::InvalidResponse(e.to_string()))?;
        self.access_token = Some(auth.token.clone());
        Ok(Session {
            token: auth.token,
            user: auth.user,
        })
    }

    /// Create an account. The backend signs the new user straight in.
    pub async fn sign_up(&mut self, request: &SignupRequest) -> LlcResult<Session> {
        let url = format!("{}/auth/signup", self.api_url);
        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Sign up failed").await);
        }
        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| LlcError::InvalidResponse(e.to_string()))?;
        self.access_token = Some(auth.token.clone());
        Ok(Session {
            token: auth.token,
            user: auth.user,
        })
    }

    // ---- records ----

    /// List records, optionally restricted to one workflow status.
    pub async fn list_records(
        &self,
        status: Option<WorkflowStatus>,
    ) -> LlcResult<Vec<LlcRecord>> {
        let url = format!("{}/llc", self.api_url);
        let mut request = self
            .http_client
            .get(&url)
            .header("Authorization", self.auth_header()?);
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        let response = request.send().await?;

        match response.status() {
            StatusCode::OK => response
                .json::<Vec<LlcRecord>>()
                .await
                .map_err(|e| LlcError::InvalidResponse(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(LlcError::SessionExpired),
            _ => Err(Self::error_from(response, "Failed to load records").await),
        }
    }

    pub async fn get_record(&self, id: i64) -> LlcResult<LlcRecord> {
        let url = format!("{}/llc/{}", self.api_url, id);
        let response = self
            .http_client
            .get(&url)
            .header("Authorization", self.auth_header()?)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response
                .json::<LlcRecord>()
                .await
                .map_err(|e| LlcError::InvalidResponse(e.to_string())),
            StatusCode::NOT_FOUND => Err(LlcError::NotFound(format!("Record {} not found", id))),
            StatusCode::UNAUTHORIZED => Err(LlcError::SessionExpired),
            _ => Err(Self::error_from(response, "Failed to load record").await),
        }
    }

    pub async fn delete_record(&self, id: i64) -> LlcResult<()> {
        let url = format!("{}/llc/{}", self.api_url, id);
        let response = self
            .http_client
            .delete(&url)
            .header("Authorization", self.auth_header()?)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            StatusCode::NOT_FOUND => Err(LlcError::NotFound(format!("Record {} not found", id))),
            StatusCode::UNAUTHORIZED => Err(LlcError::SessionExpired),
            _ => Err(Self::error_from(response, "Delete failed").await),
        }
    }

    fn multipart_form(parts: SubmissionParts) -> multipart::Form {
        let mut form = multipart::Form::new()
            .text("llc", parts.record_json)
            .text("rootCauses", parts.root_causes_json)
            .text("delete", parts.delete_json);
        for file in parts.files {
            let part = multipart::Part::bytes(file.bytes).file_name(file.filename);
            form = form.part(file.part_name, part);
        }
        form
    }

    /// Create a record from an assembled multipart payload.
    pub async fn create_record(&self, parts: SubmissionParts) -> LlcResult<LlcRecord> {
        let url = format!("{}/llc", self.api_url);
        let response = self
            .http_client
            .post(&url)
            .header("Authorization", self.auth_header()?)
            .multipart(Self::multipart_form(parts))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => response
                .json::<LlcRecord>()
                .await
                .map_err(|e| LlcError::InvalidResponse(e.to_string())),
            StatusCode::UNAUTHORIZED => Err(LlcError::SessionExpired),
            _ => Err(Self::error_from(response, "Save failed").await),
        }
    }

    /// Update a rejected record. The backend re-checks the edit gate.
    pub async fn update_record(&self, id: i64, parts: SubmissionParts) -> LlcResult<LlcRecord> {
        let url = format!("{}/llc/{}", self.api_url, id);
        let response = self
            .http_client
            .put(&url)
            .header("Authorization", self.auth_header()?)
            .multipart(Self::multipart_form(parts))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => response
                .json::<LlcRecord>()
                .await
                .map_err(|e| LlcError::InvalidResponse(e.to_string())),
            StatusCode::FORBIDDEN => Err(LlcError::NotEditable(format!(
                "Record {} is not open for edits",
                id
            ))),
            StatusCode::NOT_FOUND => Err(LlcError::NotFound(format!("Record {} not found", id))),
            StatusCode::UNAUTHORIZED => Err(LlcError::SessionExpired),
            _ => Err(Self::error_from(response, "Save failed").await),
        }
    }

    // ---- token-scoped reviews ----
    // These endpoints authenticate with the emailed link token, not the
    // session bearer token.

    pub async fn pm_review_fetch(&self, id: i64, token: &str) -> LlcResult<LlcRecord> {
        self.review_fetch(format!("{}/llc/{}/pm-review", self.api_url, id), token)
            .await
    }

    pub async fn pm_review_decide(
        &self,
        id: i64,
        token: &str,
        verdict: ReviewVerdict,
        reason: &str,
    ) -> LlcResult<()> {
        self.review_decide(
            format!("{}/llc/{}/pm-review/decision", self.api_url, id),
            token,
            verdict,
            reason,
        )
        .await
    }

    pub async fn final_review_fetch(&self, id: i64, token: &str) -> LlcResult<LlcRecord> {
        self.review_fetch(format!("{}/llc/{}/final-review", self.api_url, id), token)
            .await
    }

    pub async fn final_review_decide(
        &self,
        id: i64,
        token: &str,
        verdict: ReviewVerdict,
        reason: &str,
    ) -> LlcResult<()> {
        self.review_decide(
            format!("{}/llc/{}/final-review/decision", self.api_url, id),
            token,
            verdict,
            reason,
        )
        .await
    }

    pub async fn dep_review_fetch(
        &self,
        processing_id: i64,
        token: &str,
    ) -> LlcResult<DeploymentProcessing> {
        let url = format!(
            "{}/dep-processing/{}/review",
            self.api_url, processing_id
        );
        let response = self
            .http_client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Failed to load deployment").await);
        }
        response
            .json::<DeploymentProcessing>()
            .await
            .map_err(|e| LlcError::InvalidResponse(e.to_string()))
    }

    pub async fn dep_review_decide(
        &self,
        processing_id: i64,
        token: &str,
        verdict: ReviewVerdict,
        reason: &str,
    ) -> LlcResult<()> {
        self.review_decide(
            format!(
                "{}/dep-processing/{}/review/decision",
                self.api_url, processing_id
            ),
            token,
            verdict,
            reason,
        )
        .await
    }

    async fn review_fetch(&self, url: String, token: &str) -> LlcResult<LlcRecord> {
        let response = self
            .http_client
            .get(&url)
            .query(&[("token", token)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Failed to load record").await);
        }
        response
            .json::<LlcRecord>()
            .await
            .map_err(|e| LlcError::InvalidResponse(e.to_string()))
    }

    async fn review_decide(
        &self,
        url: String,
        token: &str,
        verdict: ReviewVerdict,
        reason: &str,
    ) -> LlcResult<()> {
        // Reasons only travel with rejections.
        let reason = match verdict {
            ReviewVerdict::Reject => reason,
            ReviewVerdict::Approve => "",
        };
        let response = self
            .http_client
            .post(&url)
            .json(&json!({
                "token": token,
                "action": verdict.action(),
                "reason": reason,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response, "Action failed").await);
        }
        Ok(())
    }
}
