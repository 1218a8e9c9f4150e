use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answer to a free-text question.
///
/// `answer` is always renderable on its own; `intent`/`entity` say how the
/// service routed the question, and `data` carries the structured payload
/// behind the prose when one exists. Lookup misses come back with
/// `success = false` and name suggestions instead of an error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskOutcome {
    #[serde(default = "default_true")]
    pub success: bool,
    pub answer: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,

    #[serde(other)]
    Unknown,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Unknown
    }
}

/// Per-client analysis: the profile the service resolved, its narrative
/// assessment and the derived risk level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientAnalysis {
    pub client_info: ClientProfile,
    #[serde(default)]
    pub ai_analysis: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    #[serde(default)]
    pub loan_amount: f64,
    #[serde(default)]
    pub business: String,
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub overdue_count: u64,
    /// Already scaled to 0..100 by the service.
    #[serde(default)]
    pub repayment_rate: f64,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub loan_officer: String,
    #[serde(default)]
    pub disbursement_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAnalysis {
    pub group_info: GroupProfile,
    #[serde(default)]
    pub top_members: Vec<GroupMember>,
    #[serde(default)]
    pub ai_analysis: String,
    #[serde(default)]
    pub group_risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupProfile {
    pub name: String,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub total_overdue: u64,
    #[serde(default)]
    pub total_loan_amount: f64,
    #[serde(default)]
    pub avg_loan_amount: f64,
    #[serde(default)]
    pub avg_repayment_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub loan_amount: f64,
}
