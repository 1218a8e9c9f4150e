use serde::{Deserialize, Serialize};

/// Aggregate portfolio metrics as served by the stats endpoint.
///
/// A snapshot is replaced wholesale on every fetch; it is never merged with a
/// previous one. All fields default so the reduced form returned after an
/// upload parses with the same type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub total_clients: u64,
    #[serde(default)]
    pub total_groups: u64,
    #[serde(default)]
    pub total_loan_officers: u64,
    #[serde(default)]
    pub total_loans: u64,
    #[serde(default)]
    pub average_loan_amount: f64,
    #[serde(default)]
    pub average_client_score: f64,
    #[serde(default)]
    pub total_loan_portfolio: f64,
    #[serde(default)]
    pub clients_with_overdue: u64,
}

/// Outcome of a dataset upload: the service's message plus the stats it
/// computed from the fresh dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReport {
    pub message: String,
    pub stats: Option<StatsSnapshot>,
}

/// One row of the top-clients ranking. Position in the returned sequence is
/// the rank; the backend's order is preserved as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub loan_amount: f64,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub overdue_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_name: String,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub member_count: u64,
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
pub struct HighRiskClient {
    pub name: String,
    #[serde(default)]
    pub overdue_count: u64,
    #[serde(default)]
    pub loan_amount: f64,
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub loan_officer: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(default)]
    pub high_risk_clients: Vec<HighRiskClient>,
    #[serde(default)]
    pub total_high_risk: u64,
    #[serde(default)]
    pub total_at_risk_amount: f64,
    #[serde(default)]
    pub overdue_threshold: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessTypePerformance {
    pub business_type: String,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub client_count: u64,
    #[serde(default)]
    pub total_loan_amount: f64,
}

/// Combined quick-insights payload: top performers, risk posture and the
/// basic stats in one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsReport {
    #[serde(default)]
    pub top_clients: Vec<ClientSummary>,
    #[serde(default)]
    pub top_groups: Vec<GroupSummary>,
    #[serde(default)]
    pub risk_analysis: RiskReport,
    #[serde(default)]
    pub top_business_types: Vec<BusinessTypePerformance>,
    #[serde(default)]
    pub basic_stats: StatsSnapshot,
}

/// One row of the paged client listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub loan_officer: Option<String>,
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub loan_amount: f64,
    #[serde(default)]
    pub overdue_count: u64,
}

/// One row of the paged group listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    #[serde(default)]
    pub avg_score: f64,
    #[serde(default)]
    pub member_count: u64,
    #[serde(default)]
    pub total_overdue: u64,
    #[serde(default)]
    pub total_loan_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_snapshot_parses_full_payload() {
        let v = json!({
            "total_clients": 42,
            "total_groups": 5,
            "total_loan_officers": 3,
            "total_loans": 100,
            "average_loan_amount": 50_000.0,
            "average_client_score": 71.4,
            "total_loan_portfolio": 5_000_000.0,
            "clients_with_overdue": 7
        });

        let stats: StatsSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(stats.total_clients, 42);
        assert_eq!(stats.total_loans, 100);
        assert_eq!(stats.total_loan_portfolio, 5_000_000.0);
    }

    #[test]
    fn stats_snapshot_accepts_reduced_upload_form() {
        // The upload response carries only the four headline counters.
        let v = json!({
            "total_clients": 42,
            "total_groups": 5,
            "total_loans": 100,
            "total_loan_portfolio": 5_000_000.0
        });

        let stats: StatsSnapshot = serde_json::from_value(v).unwrap();
        assert_eq!(stats.total_clients, 42);
        assert_eq!(stats.average_client_score, 0.0);
    }

    #[test]
    fn client_summary_tolerates_missing_optional_fields() {
        let v = json!({"name": "Akello Grace", "score": 92.5, "loan_amount": 800_000.0});

        let summary: ClientSummary = serde_json::from_value(v).unwrap();
        assert_eq!(summary.name, "Akello Grace");
        assert_eq!(summary.group, None);
        assert_eq!(summary.overdue_count, 0);
    }

    #[test]
    fn risk_report_parses_threshold_and_rows() {
        let v = json!({
            "high_risk_clients": [
                {"name": "Okot Peter", "overdue_count": 6, "loan_amount": 300_000.0,
                 "performance_score": 35.0, "group": "Gulu A", "loan_officer": "J. Abonyo"}
            ],
            "total_high_risk": 1,
            "total_at_risk_amount": 300_000.0,
            "overdue_threshold": 3
        });

        let report: RiskReport = serde_json::from_value(v).unwrap();
        assert_eq!(report.total_high_risk, 1);
        assert_eq!(report.overdue_threshold, Some(3));
        assert_eq!(report.high_risk_clients[0].overdue_count, 6);
    }
}
