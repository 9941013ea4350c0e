use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

// ---------------------------------------------------------------------------
// Root config  (one per scope: ~/.config/kyc-desk/config.toml or .kyc-desk/config.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootConfig {
    pub current_backend: Option<String>,
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

/// Sequencer timing overrides; unset values fall back to the built-in cadence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    pub phase_interval_ms: Option<u64>,
    pub reveal_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

pub fn merge_root_config(global: RootConfig, local: RootConfig) -> RootConfig {
    RootConfig {
        current_backend: local.current_backend.or(global.current_backend),
        workflow: WorkflowSettings {
            phase_interval_ms: local
                .workflow
                .phase_interval_ms
                .or(global.workflow.phase_interval_ms),
            reveal_interval_ms: local
                .workflow
                .reveal_interval_ms
                .or(global.workflow.reveal_interval_ms),
            request_timeout_secs: local
                .workflow
                .request_timeout_secs
                .or(global.workflow.request_timeout_secs),
        },
    }
}

// ---------------------------------------------------------------------------
// Backend profile  (.kyc-desk/backends/<name>.toml)
// ---------------------------------------------------------------------------

/// Connection settings for one analysis backend.
///
/// ```toml
/// url = "http://localhost:8000"
/// timeout_secs = 120
/// insecure_tls = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub insecure_tls: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_secs: default_timeout_secs(),
            insecure_tls: false,
        }
    }
}

pub fn default_timeout_secs() -> u64 {
    120
}

// ---------------------------------------------------------------------------
// Agent workflow  (POST /agents/orchestrate)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub full_name: String,
    pub kyc_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residency_country: Option<String>,
}

impl WorkflowRequest {
    pub fn new(full_name: impl Into<String>, kyc_notes: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            kyc_notes: kyc_notes.into(),
            nationality: None,
            residency_country: None,
        }
    }
}

/// One executed phase of the backend pipeline, in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub agent_name: String,
    #[serde(default)]
    pub agent_role: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
    /// Seconds.
    #[serde(default)]
    pub execution_time: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag_details: Option<RagDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub final_result: FinalResult,
    pub workflow_execution: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<WorkflowMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    pub compliance_decision: ComplianceDecision,
}

/// The decision object is produced by a language model, so every field is kept
/// as raw JSON and read through the tolerant accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceDecision {
    #[serde(skip_serializing_if = "Value::is_null")]
    pub compliance_status: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub confidence_score: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub risk_score: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub approval_tier: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub decision_breakdown: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub pep_flag: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub sanctions_flag: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub recommended_actions: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub rationale: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved,
    ReviewRequired,
    Rejected,
}

impl ComplianceDecision {
    pub fn status(&self) -> String {
        loose_text(&self.compliance_status).unwrap_or_default()
    }

    pub fn outcome(&self) -> DecisionOutcome {
        match self.status().trim() {
            "Approved" => DecisionOutcome::Approved,
            "Review Required" => DecisionOutcome::ReviewRequired,
            _ => DecisionOutcome::Rejected,
        }
    }

    /// Confidence as a fraction in `0..=1`.
    pub fn confidence(&self) -> Option<f64> {
        loose_number(&self.confidence_score)
    }

    /// Risk on a `0..=100` scale.
    pub fn risk(&self) -> Option<f64> {
        loose_number(&self.risk_score)
    }

    pub fn approval_tier_or_default(&self) -> String {
        loose_text(&self.approval_tier)
            .filter(|tier| !tier.trim().is_empty())
            .unwrap_or_else(|| "Level 1 (Automated)".to_string())
    }

    /// Factor/assessment pairs; non-string assessments come back as compact JSON.
    pub fn breakdown(&self) -> Vec<(String, String)> {
        match &self.decision_breakdown {
            Value::Object(map) => map
                .iter()
                .map(|(factor, assessment)| {
                    (factor.clone(), loose_text(assessment).unwrap_or_default())
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn is_pep(&self) -> bool {
        loose_flag(&self.pep_flag)
    }

    pub fn is_sanctioned(&self) -> bool {
        loose_flag(&self.sanctions_flag)
    }

    pub fn recommended_actions(&self) -> Vec<String> {
        match &self.recommended_actions {
            Value::Array(items) => items.iter().filter_map(loose_text).collect(),
            other => loose_text(other).into_iter().collect(),
        }
    }

    pub fn rationale(&self) -> String {
        loose_text(&self.rationale).unwrap_or_default()
    }
}

fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn loose_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => {
            let text = text.trim();
            text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("yes")
        }
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagDetails {
    pub query: String,
    pub retrieved_cases: usize,
    pub relevance_scores: Vec<f64>,
    pub cases: Vec<RagCase>,
}

impl RagDetails {
    /// Mean of the relevance scores; `None` when the backend returned none.
    pub fn average_relevance(&self) -> Option<f64> {
        if self.relevance_scores.is_empty() {
            return None;
        }
        let sum: f64 = self.relevance_scores.iter().sum();
        Some(sum / self.relevance_scores.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RagCase {
    pub case_id: String,
    pub client_name: String,
    pub client_type: String,
    pub risk_level: String,
    pub outcome: String,
    pub summary: String,
    pub jurisdictions: Vec<String>,
    pub relevance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowMetadata {
    pub total_execution_time: f64,
    pub agents_used: u32,
    pub rag_retrievals: u32,
    pub tool_calls: u32,
}

// ---------------------------------------------------------------------------
// Clients and KYC
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycAnalysisRequest {
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residency_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_of_wealth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_activity: Option<String>,
    pub kyc_notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: u64,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub residency_country: Option<String>,
    pub source_of_wealth: Option<String>,
    pub business_activity: Option<String>,
    #[serde(default)]
    pub pep_flag: bool,
    #[serde(default)]
    pub sanctions_flag: bool,
    pub risk_score: Option<String>,
    pub risk_rationale: Option<String>,
    pub kyc_summary: Option<String>,
    pub raw_kyc_notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListItem {
    pub id: u64,
    pub full_name: String,
    pub nationality: Option<String>,
    pub risk_score: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<ClientListItem>,
    pub total: usize,
}

/// One versioned KYC review of a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KycRecord {
    pub id: u64,
    pub client_id: u64,
    #[serde(default = "first_version")]
    pub version: u32,
    pub risk_score: Option<String>,
    pub risk_rationale: Option<String>,
    pub kyc_summary: Option<String>,
    #[serde(default)]
    pub pep_flag: bool,
    #[serde(default)]
    pub sanctions_flag: bool,
    pub cdd_conclusion: Option<String>,
    #[serde(default)]
    pub edd_required: bool,
    pub review_date: Option<String>,
    pub next_review_date: Option<String>,
    pub raw_kyc_notes: Option<String>,
    pub created_at: String,
    pub created_by: Option<String>,
}

fn first_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInsights {
    pub client_id: u64,
    pub client_name: String,
    pub insights: InsightSections,
    pub generated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSections {
    pub profile_overview: Vec<String>,
    pub risk_compliance_view: Vec<String>,
    pub suggested_rm_actions: Vec<String>,
    pub next_best_actions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Risk alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysisRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    pub activity_log: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: u64,
    pub client_id: Option<u64>,
    pub severity: String,
    pub risk_tags: Option<Vec<String>>,
    pub summary: String,
    pub next_steps: Option<String>,
    pub raw_activity_log: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlertListItem {
    pub id: u64,
    pub client_id: Option<u64>,
    pub client_name: Option<String>,
    pub severity: String,
    pub risk_tags: Option<Vec<String>>,
    pub summary: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAlertListResponse {
    pub alerts: Vec<RiskAlertListItem>,
    pub total: usize,
}

/// Entry of the open-alerts work queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertQueueItem {
    pub id: u64,
    pub client_id: Option<u64>,
    pub client_name: Option<String>,
    pub severity: String,
    pub status: String,
    pub priority: String,
    pub summary: String,
    pub sla_due_date: Option<String>,
    pub assigned_to: Option<String>,
    pub risk_tags: Option<Vec<String>>,
    pub created_at: String,
    #[serde(default)]
    pub is_overdue: bool,
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: u64,
    pub alert_id: Option<u64>,
    pub client_id: Option<u64>,
    pub client_name: Option<String>,
    pub case_type: String,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    pub investigation_notes: Option<String>,
    pub conclusion: Option<String>,
    pub sar_status: Option<String>,
    pub sar_filed_date: Option<String>,
    pub sar_reference: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    pub case_type: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigation_notes: Option<String>,
}

pub fn default_priority() -> String {
    "Medium".to_string()
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investigation_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sar_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sar_filed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sar_reference: Option<String>,
}

impl CaseUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: u64,
    pub high_risk_clients: u64,
    pub open_risk_alerts: u64,
    pub recent_kyc_analyses: u64,
    #[serde(default)]
    pub open_cases: Option<u64>,
    #[serde(default)]
    pub new_alerts_today: Option<u64>,
    #[serde(default)]
    pub new_alerts_7days: Option<u64>,
    #[serde(default)]
    pub kyc_uptodate_percentage: Option<f64>,
    #[serde(default)]
    pub kyc_upcoming_reviews: Option<u64>,
}

// ---------------------------------------------------------------------------
// Query filters
// ---------------------------------------------------------------------------

/// Query parameters; unset filters are left off the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaseFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

// ---------------------------------------------------------------------------
// URLs and names
// ---------------------------------------------------------------------------

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Joins the backend base URL and an endpoint starting with `/`.
pub fn api_url(base: &str, endpoint: &str) -> Result<String> {
    let base = normalize_base_url(base);
    if base.is_empty() {
        bail!("backend URL is empty");
    }
    if !base.starts_with("http://") && !base.starts_with("https://") {
        bail!("backend URL must start with http:// or https://: {base}");
    }
    let endpoint = endpoint.trim_start_matches('/');
    Ok(format!("{base}/{endpoint}"))
}

pub fn validate_backend_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("backend name cannot be empty");
    }
    if name.contains('/') || name.contains('\\') {
        bail!("backend name cannot contain path separators");
    }
    if name == "." || name == ".." {
        bail!("invalid backend name");
    }

    Ok(())
}
