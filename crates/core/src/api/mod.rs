pub mod error;

pub use error::ApiError;

use crate::config::Settings;
use crate::domain::analysis::{AskOutcome, ClientAnalysis, GroupAnalysis};
use crate::domain::evaluation::{ApplicantForm, EvaluationReport};
use crate::domain::portfolio::{
    BusinessTypePerformance, ClientRecord, ClientSummary, GroupRecord, GroupSummary,
    InsightsReport, RiskReport, StatsSnapshot, UploadReport,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOP_LIMIT: u32 = 10;
const DEFAULT_RISK_THRESHOLD: u32 = 3;

/// Dataset extensions the upload endpoint accepts, matched case-insensitively.
const DATASET_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

/// Typed façade over the portfolio analysis service.
///
/// One instance holds one base address and one pooled HTTP client; it keeps
/// no other state, so it can be shared freely and operations may run
/// concurrently. Each operation is a single request: no retries, no caching,
/// and every failure folds into [`ApiError`].
#[derive(Debug, Clone)]
pub struct AnalysisApi {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let timeout = Duration::from_secs(
            settings
                .analysis_api_timeout_secs
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        Self::with_timeout(settings.base_url(), timeout)
    }

    fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Free-text question against the conversational endpoint.
    pub async fn ask(&self, question: &str) -> Result<AskOutcome, ApiError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::Validation("question must be non-empty".to_string()));
        }

        tracing::debug!(chars = question.len(), "asking analysis service");
        self.fetch_json(
            self.http
                .post(self.url("/api/ask"))
                .json(&json!({ "question": question })),
        )
        .await
    }

    /// Uploads a portfolio dataset. The extension is checked locally, before
    /// any request is sent.
    pub async fn upload_dataset(
        &self,
        filename: &str,
        contents: Vec<u8>,
    ) -> Result<UploadReport, ApiError> {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) if DATASET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) => {
                ext.to_ascii_lowercase()
            }
            _ => {
                return Err(ApiError::Validation(format!(
                    "unsupported dataset file {filename:?}; expected one of: {}",
                    DATASET_EXTENSIONS.join(", ")
                )))
            }
        };

        let part = Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str(dataset_mime(&ext))
            .map_err(|e| ApiError::transport(format!("invalid upload mime type: {e}")))?;
        let form = Form::new().part("file", part);

        tracing::info!(filename, "uploading dataset");
        let envelope: UploadEnvelope = self
            .fetch_json(self.http.post(self.url("/api/upload")).multipart(form))
            .await?;

        Ok(UploadReport {
            message: envelope.message,
            stats: envelope.stats,
        })
    }

    /// Portfolio statistics, or `None` while no dataset has been loaded.
    /// The empty state is a real answer, not an error.
    pub async fn get_stats(&self) -> Result<Option<StatsSnapshot>, ApiError> {
        let text = self.fetch_text(self.http.get(self.url("/api/stats"))).await?;
        let text = text.trim();
        if text.is_empty() || text == "null" {
            return Ok(None);
        }

        let envelope: StatsEnvelope = decode(text)?;
        Ok(envelope.stats)
    }

    pub async fn get_insights(&self) -> Result<InsightsReport, ApiError> {
        let envelope: InsightsEnvelope = self
            .fetch_json(self.http.get(self.url("/api/analyze/insights")))
            .await?;
        Ok(envelope.insights)
    }

    /// Top clients, best first. The service's ordering is preserved; the
    /// sequence position is the rank.
    pub async fn get_top_clients(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<ClientSummary>, ApiError> {
        let limit = positive(limit, DEFAULT_TOP_LIMIT, "limit")?;
        let envelope: TopClientsEnvelope = self
            .fetch_json(
                self.http
                    .get(self.url("/api/analyze/top-clients"))
                    .query(&[("limit", limit)]),
            )
            .await?;
        Ok(envelope.top_clients)
    }

    pub async fn get_top_groups(&self, limit: Option<u32>) -> Result<Vec<GroupSummary>, ApiError> {
        let limit = positive(limit, DEFAULT_TOP_LIMIT, "limit")?;
        let envelope: TopGroupsEnvelope = self
            .fetch_json(
                self.http
                    .get(self.url("/api/analyze/top-groups"))
                    .query(&[("limit", limit)]),
            )
            .await?;
        Ok(envelope.top_groups)
    }

    /// Clients whose overdue count exceeds the threshold.
    pub async fn get_risk_analysis(&self, threshold: Option<u32>) -> Result<RiskReport, ApiError> {
        let threshold = positive(threshold, DEFAULT_RISK_THRESHOLD, "threshold")?;
        let envelope: RiskEnvelope = self
            .fetch_json(
                self.http
                    .get(self.url("/api/analyze/risk-analysis"))
                    .query(&[("threshold", threshold)]),
            )
            .await?;
        Ok(envelope.risk_analysis)
    }

    pub async fn get_business_performance(
        &self,
    ) -> Result<Vec<BusinessTypePerformance>, ApiError> {
        let envelope: BusinessEnvelope = self
            .fetch_json(self.http.get(self.url("/api/analyze/business-performance")))
            .await?;
        Ok(envelope.business_performance)
    }

    pub async fn analyze_client(&self, client_name: &str) -> Result<ClientAnalysis, ApiError> {
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(ApiError::Validation(
                "client name must be non-empty".to_string(),
            ));
        }

        self.fetch_json(
            self.http
                .post(self.url("/api/analyze/client"))
                .json(&json!({ "client_name": client_name })),
        )
        .await
    }

    pub async fn analyze_group(&self, group_name: &str) -> Result<GroupAnalysis, ApiError> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(ApiError::Validation(
                "group name must be non-empty".to_string(),
            ));
        }

        self.fetch_json(
            self.http
                .post(self.url("/api/analyze/group"))
                .json(&json!({ "group_name": group_name })),
        )
        .await
    }

    /// Paged client listing with optional name search.
    pub async fn list_clients(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        search: Option<&str>,
    ) -> Result<Vec<ClientRecord>, ApiError> {
        let envelope: ClientsEnvelope = self
            .fetch_json(
                self.http
                    .get(self.url("/api/clients"))
                    .query(&paging_query(limit, offset, search)),
            )
            .await?;
        Ok(envelope.clients)
    }

    pub async fn list_groups(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
        search: Option<&str>,
    ) -> Result<Vec<GroupRecord>, ApiError> {
        let envelope: GroupsEnvelope = self
            .fetch_json(
                self.http
                    .get(self.url("/api/groups"))
                    .query(&paging_query(limit, offset, search)),
            )
            .await?;
        Ok(envelope.groups)
    }

    /// Submits the applicant form with the PDF bank statement and returns the
    /// service's verdict. Form fields and the statement type are checked
    /// locally before anything is sent.
    pub async fn evaluate_applicant(
        &self,
        form: &ApplicantForm,
        statement_filename: &str,
        statement: Vec<u8>,
    ) -> Result<EvaluationReport, ApiError> {
        form.validate()
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        if !statement_filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(ApiError::Validation(format!(
                "bank statement {statement_filename:?} must be a PDF"
            )));
        }

        let part = Part::bytes(statement)
            .file_name(statement_filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ApiError::transport(format!("invalid upload mime type: {e}")))?;
        let multipart = Form::new()
            .text("applicantName", form.applicant_name.clone())
            .text("businessType", form.business_type.clone())
            .text("businessAge", form.business_age.to_string())
            .text("monthlyIncome", form.monthly_income.to_string())
            .text("rentAmount", form.rent_amount.to_string())
            .part("bankStatement", part);

        tracing::info!(applicant = %form.applicant_name, "submitting applicant evaluation");
        let envelope: EvaluationEnvelope = self
            .fetch_json(self.http.post(self.url("/api/evaluate")).multipart(multipart))
            .await?;

        envelope
            .data
            .ok_or_else(|| ApiError::transport("evaluation response carries no data".to_string()))
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.fetch_json(self.http.get(self.url("/health"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let text = self.fetch_text(req).await?;
        decode(&text)
    }

    /// Sends the request and folds every failure into [`ApiError`].
    ///
    /// An error status with a JSON object body keeps that body verbatim; any
    /// other failure becomes a transport message.
    async fn fetch_text(&self, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let res = req
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("request failed: {e}")))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::warn!(http_status = %status, "analysis service returned an error status");
            return Err(match serde_json::from_str::<Value>(&text) {
                Ok(body) if body.is_object() => ApiError::Server {
                    status: status.as_u16(),
                    body,
                },
                _ => ApiError::transport(format!("HTTP {status}: {}", text.trim())),
            });
        }

        Ok(text)
    }
}

/// Health probe answer; the only operation outside the `/api` prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str::<T>(text)
        .map_err(|e| ApiError::transport(format!("failed to decode response body: {e}")))
}

fn positive(value: Option<u32>, default: u32, what: &str) -> Result<u32, ApiError> {
    match value {
        Some(0) => Err(ApiError::Validation(format!(
            "{what} must be a positive integer"
        ))),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

fn paging_query(
    limit: Option<u32>,
    offset: Option<u32>,
    search: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
    if let Some(search) = search {
        let search = search.trim();
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
    }
    query
}

fn dataset_mime(ext: &str) -> &'static str {
    match ext {
        "csv" => "text/csv",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/vnd.ms-excel",
    }
}

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    stats: Option<StatsSnapshot>,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    stats: Option<StatsSnapshot>,
}

#[derive(Debug, Deserialize)]
struct InsightsEnvelope {
    insights: InsightsReport,
}

#[derive(Debug, Deserialize)]
struct TopClientsEnvelope {
    #[serde(default)]
    top_clients: Vec<ClientSummary>,
}

#[derive(Debug, Deserialize)]
struct TopGroupsEnvelope {
    #[serde(default)]
    top_groups: Vec<GroupSummary>,
}

#[derive(Debug, Deserialize)]
struct RiskEnvelope {
    risk_analysis: RiskReport,
}

#[derive(Debug, Deserialize)]
struct BusinessEnvelope {
    #[serde(default)]
    business_performance: Vec<BusinessTypePerformance>,
}

#[derive(Debug, Deserialize)]
struct ClientsEnvelope {
    #[serde(default)]
    clients: Vec<ClientRecord>,
}

#[derive(Debug, Deserialize)]
struct GroupsEnvelope {
    #[serde(default)]
    groups: Vec<GroupRecord>,
}

#[derive(Debug, Deserialize)]
struct EvaluationEnvelope {
    #[serde(default)]
    data: Option<EvaluationReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dataset_extension_check_matches_service_rules() {
        for name in ["book.csv", "book.CSV", "ledger.xlsx", "old.xls", ".csv"] {
            assert!(
                matches!(name.rsplit_once('.'), Some((_, ext))
                    if DATASET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())),
                "expected {name:?} to be accepted"
            );
        }
        for name in ["book.txt", "book", "book.csv.gpg", "archive.zip"] {
            assert!(
                !matches!(name.rsplit_once('.'), Some((_, ext))
                    if DATASET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())),
                "expected {name:?} to be rejected"
            );
        }
    }

    #[test]
    fn positive_rejects_zero_and_applies_default() {
        assert_eq!(positive(None, 10, "limit").unwrap(), 10);
        assert_eq!(positive(Some(5), 10, "limit").unwrap(), 5);
        assert!(matches!(
            positive(Some(0), 10, "limit"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn paging_query_skips_blank_search() {
        let query = paging_query(Some(20), None, Some("   "));
        assert_eq!(query, vec![("limit", "20".to_string())]);

        let query = paging_query(None, Some(40), Some("Akello"));
        assert_eq!(
            query,
            vec![
                ("offset", "40".to_string()),
                ("search", "Akello".to_string())
            ]
        );
    }

    #[test]
    fn decode_failure_is_a_transport_error() {
        let res = decode::<StatsEnvelope>("not json at all");
        assert!(matches!(res, Err(ApiError::Transport(_))));
    }

    #[test]
    fn stats_envelope_treats_null_stats_as_absent() {
        let envelope: StatsEnvelope =
            serde_json::from_value(json!({"success": true, "stats": null})).unwrap();
        assert!(envelope.stats.is_none());
    }

    #[test]
    fn url_joins_without_doubled_slash() {
        let api = AnalysisApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.url("/api/stats"), "http://localhost:5000/api/stats");
    }
}
