use sente_core::api::ApiError;
use sente_core::domain::analysis::{AskOutcome, ClientAnalysis, GroupAnalysis};
use sente_core::domain::evaluation::EvaluationReport;
use sente_core::domain::portfolio::{
    BusinessTypePerformance, ClientRecord, ClientSummary, GroupRecord, GroupSummary,
    InsightsReport, RiskReport, StatsSnapshot, UploadReport,
};

/// Rows shown for listings that can run long (risk clients, listings).
const MAX_LISTED_ROWS: usize = 10;

/// One inline failure line; suggestions from the error body ride along.
pub fn report_error(err: &ApiError) {
    eprintln!("request failed: {err}");
    let suggestions = err.suggestions();
    if !suggestions.is_empty() {
        eprintln!("  did you mean: {}", suggestions.join(", "));
    }
}

pub fn ask_outcome(outcome: &AskOutcome) {
    println!("{}", outcome.answer.trim());
    if !outcome.success && !outcome.suggestions.is_empty() {
        println!("  did you mean: {}", outcome.suggestions.join(", "));
    }
}

pub fn upload_report(report: &UploadReport) {
    println!("{}", report.message);
    if let Some(stats) = &report.stats {
        println!(
            "  {} clients, {} groups, {} loans, portfolio {}",
            stats.total_clients,
            stats.total_groups,
            stats.total_loans,
            ugx(stats.total_loan_portfolio)
        );
    }
}

pub fn stats(stats: &StatsSnapshot) {
    println!("Portfolio statistics");
    println!("  Clients:            {}", stats.total_clients);
    println!("  Groups:             {}", stats.total_groups);
    println!("  Loan officers:      {}", stats.total_loan_officers);
    println!("  Loans:              {}", stats.total_loans);
    println!("  Portfolio:          {}", ugx(stats.total_loan_portfolio));
    println!("  Average loan:       {}", ugx(stats.average_loan_amount));
    println!("  Average score:      {}", score(stats.average_client_score));
    println!("  Clients overdue:    {}", stats.clients_with_overdue);
}

pub fn empty_state() {
    println!("No dataset loaded yet. Upload one with `sente upload <file>`.");
}

pub fn top_clients(top: &[ClientSummary]) {
    if top.is_empty() {
        println!("No clients to rank yet.");
        return;
    }

    println!("Top clients");
    for (i, client) in top.iter().enumerate() {
        println!(
            "  {}. {}: {} (loan {})",
            i + 1,
            client.name,
            score(client.score),
            ugx(client.loan_amount)
        );
    }
}

pub fn top_groups(top: &[GroupSummary]) {
    if top.is_empty() {
        println!("No groups to rank yet.");
        return;
    }

    println!("Top groups");
    for (i, group) in top.iter().enumerate() {
        println!(
            "  {}. {}: {} ({} members, loans {})",
            i + 1,
            group.group_name,
            score(group.avg_score),
            group.member_count,
            ugx(group.total_loan_amount)
        );
    }
}

pub fn risk(report: &RiskReport) {
    if report.total_high_risk == 0 {
        println!("No high-risk clients detected.");
        return;
    }

    println!("Risk analysis");
    println!("  High-risk clients:  {}", report.total_high_risk);
    println!("  At-risk amount:     {}", ugx(report.total_at_risk_amount));
    if let Some(threshold) = report.overdue_threshold {
        println!("  Overdue threshold:  > {threshold}");
    }
    for client in report.high_risk_clients.iter().take(MAX_LISTED_ROWS) {
        println!(
            "  - {}: {} overdue (loan {})",
            client.name,
            client.overdue_count,
            ugx(client.loan_amount)
        );
    }
    if report.high_risk_clients.len() > MAX_LISTED_ROWS {
        println!(
            "  ... and {} more",
            report.high_risk_clients.len() - MAX_LISTED_ROWS
        );
    }
}

pub fn insights(report: &InsightsReport) {
    top_clients(&report.top_clients);
    println!();
    top_groups(&report.top_groups);
    println!();
    risk(&report.risk_analysis);
    println!();
    if !report.top_business_types.is_empty() {
        business(&report.top_business_types);
        println!();
    }
    stats(&report.basic_stats);
}

pub fn business(rows: &[BusinessTypePerformance]) {
    if rows.is_empty() {
        println!("No business-type data yet.");
        return;
    }

    println!("Business performance");
    for (i, row) in rows.iter().enumerate() {
        println!(
            "  {}. {}: {} ({} clients, loans {})",
            i + 1,
            row.business_type,
            score(row.avg_score),
            row.client_count,
            ugx(row.total_loan_amount)
        );
    }
}

pub fn client_list(rows: &[ClientRecord]) {
    if rows.is_empty() {
        println!("No matching clients.");
        return;
    }

    for row in rows {
        println!(
            "{}: {} (loan {}, {} overdue, group {})",
            row.name,
            score(row.performance_score),
            ugx(row.loan_amount),
            row.overdue_count,
            row.group.as_deref().unwrap_or("-")
        );
    }
    println!("({} shown)", rows.len());
}

pub fn group_list(rows: &[GroupRecord]) {
    if rows.is_empty() {
        println!("No matching groups.");
        return;
    }

    for row in rows {
        println!(
            "{}: {} ({} members, {} overdue, loans {})",
            row.name,
            score(row.avg_score),
            row.member_count,
            row.total_overdue,
            ugx(row.total_loan_amount)
        );
    }
    println!("({} shown)", rows.len());
}

pub fn client_analysis(analysis: &ClientAnalysis) {
    let info = &analysis.client_info;
    println!("Analysis for {}", info.name);
    println!("  Score:          {}", score(info.performance_score));
    println!("  Loan:           {}", ugx(info.loan_amount));
    println!("  Business:       {}", info.business);
    println!("  Repayment rate: {:.1}%", info.repayment_rate);
    println!("  Overdue count:  {}", info.overdue_count);
    println!("  Risk level:     {}", analysis.risk_level.as_str());
    if !analysis.ai_analysis.is_empty() {
        println!();
        println!("{}", analysis.ai_analysis.trim());
    }
}

pub fn group_analysis(analysis: &GroupAnalysis) {
    let info = &analysis.group_info;
    println!("Analysis for {}", info.name);
    println!("  Members:        {}", info.member_count);
    println!("  Average score:  {}", score(info.avg_score));
    println!("  Total loans:    {}", ugx(info.total_loan_amount));
    println!("  Overdue count:  {}", info.total_overdue);
    println!("  Risk level:     {}", analysis.group_risk_level.as_str());
    if !analysis.top_members.is_empty() {
        println!("  Top performers:");
        for member in &analysis.top_members {
            println!("    - {}: {}", member.name, score(member.score));
        }
    }
    if !analysis.ai_analysis.is_empty() {
        println!();
        println!("{}", analysis.ai_analysis.trim());
    }
}

pub fn evaluation(report: &EvaluationReport) {
    println!("Evaluation for {}", report.applicant_name);
    println!("  Validation:     {} ({})", report.validation.status, report.validation.message);
    println!("  Total credit:   {}", ugx(report.metrics.total_credit));
    println!("  Total debit:    {}", ugx(report.metrics.total_debit));
    println!(
        "  Avg balance:    {}",
        ugx(report.metrics.average_monthly_balance)
    );
    if report.loan_prediction.is_eligible {
        println!(
            "  Eligible for a loan up to {}",
            ugx(report.loan_prediction.suggested_amount)
        );
    } else {
        println!("  Not eligible");
    }
    println!("  {}", report.loan_prediction.reason);
}

/// Amounts are whole shillings with thousands separators, matching how the
/// service itself phrases them in answers.
fn ugx(amount: f64) -> String {
    let negative = amount < 0.0;
    let whole = amount.abs().round() as u64;
    let sign = if negative { "-" } else { "" };
    format!("{sign}{} UGX", group_thousands(whole))
}

fn score(value: f64) -> String {
    format!("{value:.1}/100")
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(5_000_000), "5,000,000");
        assert_eq!(group_thousands(123_456_789), "123,456,789");
    }

    #[test]
    fn ugx_rounds_and_signs() {
        assert_eq!(ugx(5_000_000.4), "5,000,000 UGX");
        assert_eq!(ugx(-1_500.0), "-1,500 UGX");
        assert_eq!(ugx(0.0), "0 UGX");
    }

    #[test]
    fn score_keeps_one_decimal() {
        assert_eq!(score(92.55), "92.6/100");
        assert_eq!(score(71.0), "71.0/100");
    }
}
