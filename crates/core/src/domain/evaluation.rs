use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Manually entered applicant details submitted alongside the bank statement.
#[derive(Debug, Clone)]
pub struct ApplicantForm {
    pub applicant_name: String,
    pub business_type: String,
    /// Years the business has been operating.
    pub business_age: f64,
    pub monthly_income: f64,
    pub rent_amount: f64,
}

impl ApplicantForm {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.applicant_name.trim().is_empty(),
            "applicant name must be non-empty"
        );
        ensure!(
            !self.business_type.trim().is_empty(),
            "business type must be non-empty"
        );
        ensure!(
            self.business_age.is_finite() && self.business_age >= 0.0,
            "business age must be zero or more years (got {})",
            self.business_age
        );
        ensure!(
            self.monthly_income.is_finite() && self.monthly_income >= 0.0,
            "monthly income must be zero or more (got {})",
            self.monthly_income
        );
        ensure!(
            self.rent_amount.is_finite() && self.rent_amount >= 0.0,
            "rent amount must be zero or more (got {})",
            self.rent_amount
        );
        Ok(())
    }
}

/// Evaluation verdict for one applicant. CamelCase on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    #[serde(default)]
    pub applicant_name: String,
    #[serde(default)]
    pub business_type: String,
    pub metrics: FinancialMetrics,
    pub validation: IncomeValidation,
    pub loan_prediction: LoanPrediction,
}

/// Figures extracted from the uploaded bank statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    #[serde(default)]
    pub total_credit: f64,
    #[serde(default)]
    pub total_debit: f64,
    #[serde(default)]
    pub average_monthly_balance: f64,
}

/// Cross-check of declared income against statement activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeValidation {
    #[serde(default)]
    pub income_match: bool,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPrediction {
    pub is_eligible: bool,
    #[serde(default)]
    pub suggested_amount: f64,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_form() -> ApplicantForm {
        ApplicantForm {
            applicant_name: "Namono Betty".to_string(),
            business_type: "Produce stall".to_string(),
            business_age: 3.0,
            monthly_income: 450_000.0,
            rent_amount: 120_000.0,
        }
    }

    #[test]
    fn form_accepts_sane_values() {
        assert!(sample_form().validate().is_ok());
    }

    #[test]
    fn form_rejects_blank_name_and_negative_income() {
        let mut form = sample_form();
        form.applicant_name = "   ".to_string();
        assert!(form.validate().is_err());

        let mut form = sample_form();
        form.monthly_income = -1.0;
        assert!(form.validate().is_err());
    }

    #[test]
    fn evaluation_report_parses_camel_case_wire_shape() {
        let v = json!({
            "applicantName": "Namono Betty",
            "businessType": "Produce stall",
            "metrics": {
                "totalCredit": 1_350_000.0,
                "totalDebit": 900_000.0,
                "averageMonthlyBalance": 280_000.0
            },
            "validation": {
                "incomeMatch": true,
                "status": "Verified",
                "message": "Income vs Credit validation: Matched"
            },
            "loanPrediction": {
                "isEligible": true,
                "suggestedAmount": 840_000.0,
                "reason": "Applicant meets financial and stability criteria."
            }
        });

        let report: EvaluationReport = serde_json::from_value(v).unwrap();
        assert!(report.loan_prediction.is_eligible);
        assert_eq!(report.metrics.average_monthly_balance, 280_000.0);
        assert_eq!(report.validation.status, "Verified");
    }
}
