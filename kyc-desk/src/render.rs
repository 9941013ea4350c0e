// ─────────────────────────────────────────────────────────────
// Terminal rendering for backend payloads and workflow progress.
// ─────────────────────────────────────────────────────────────

use crate::domain::{
    AlertQueueItem, Case, Client, ClientInsights, ClientListResponse, ComplianceDecision,
    DashboardStats, DecisionOutcome, KycRecord, RiskAlert, RiskAlertListResponse, WorkflowResult,
    WorkflowStep,
};
use crate::workflow::Phase;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

pub const SEP: &str = "────────────────────────────────────────────────────────";
pub const SEP_THIN: &str = "┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄┄";

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize payload")?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Formats a 0..1 fraction as a percentage with `decimals` places.
pub fn percent(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Colour for a Low/Medium/High/Critical label.
pub fn level_colour(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "low" => GREEN,
        "medium" => YELLOW,
        "high" | "critical" => RED,
        _ => WHITE,
    }
}

pub fn outcome_colour(outcome: DecisionOutcome) -> &'static str {
    match outcome {
        DecisionOutcome::Approved => GREEN,
        DecisionOutcome::ReviewRequired => YELLOW,
        DecisionOutcome::Rejected => RED,
    }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}

fn header(title: &str) {
    println!(
        "{CYAN}{SEP}{RESET}\n\
         {BOLD}{WHITE}  ▸ {title}{RESET}\n\
         {CYAN}{SEP}{RESET}"
    );
}

fn field(label: &str, value: &str) {
    println!("{DIM}  {label:<18}{RESET}{WHITE}{value}{RESET}");
}

fn bullet_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{CYAN}{SEP_THIN}{RESET}");
    println!("{BOLD}  {title}{RESET}");
    for item in items {
        println!("  • {item}");
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

pub fn print_client(client: &Client) {
    header(&format!("CLIENT #{}  {}", client.id, client.full_name));
    field("date of birth", or_dash(client.date_of_birth.as_deref()));
    field("nationality", or_dash(client.nationality.as_deref()));
    field("residency", or_dash(client.residency_country.as_deref()));
    field("source of wealth", or_dash(client.source_of_wealth.as_deref()));
    field("business", or_dash(client.business_activity.as_deref()));
    field("PEP", yes_no(client.pep_flag));
    field("sanctions", yes_no(client.sanctions_flag));
    if let Some(risk) = client.risk_score.as_deref() {
        println!(
            "{DIM}  {:<18}{RESET}{}{BOLD}{risk}{RESET}",
            "risk",
            level_colour(risk)
        );
    }
    field("updated", &client.updated_at);
    if let Some(summary) = client.kyc_summary.as_deref() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{}", summary.trim());
    }
    if let Some(rationale) = client.risk_rationale.as_deref() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{DIM}{}{RESET}", rationale.trim());
    }
}

pub fn print_client_list(list: &ClientListResponse) {
    if list.clients.is_empty() {
        println!("no clients");
        return;
    }
    for client in &list.clients {
        let risk = client.risk_score.as_deref().unwrap_or("-");
        println!(
            "{:>5}  {:<32} {:<16} {}{risk}{RESET}",
            client.id,
            client.full_name,
            or_dash(client.nationality.as_deref()),
            level_colour(risk)
        );
    }
    println!("{DIM}{} total{RESET}", list.total);
}

pub fn print_insights(insights: &ClientInsights) {
    header(&format!("INSIGHTS  {}", insights.client_name));
    let sections = &insights.insights;
    bullet_section("Profile overview", &sections.profile_overview);
    bullet_section("Risk & compliance", &sections.risk_compliance_view);
    bullet_section("Suggested RM actions", &sections.suggested_rm_actions);
    bullet_section("Next best actions", &sections.next_best_actions);
    println!("{DIM}  generated {}{RESET}", insights.generated_at);
}

pub fn print_kyc_history(records: &[KycRecord]) {
    if records.is_empty() {
        println!("no KYC records");
        return;
    }
    for record in records {
        let risk = record.risk_score.as_deref().unwrap_or("-");
        println!(
            "v{:<3} {}  risk {}{risk}{RESET}  PEP {}  sanctions {}  EDD {}",
            record.version,
            record.created_at,
            level_colour(risk),
            yes_no(record.pep_flag),
            yes_no(record.sanctions_flag),
            yes_no(record.edd_required),
        );
        if let Some(conclusion) = record.cdd_conclusion.as_deref() {
            println!("{DIM}     {conclusion}{RESET}");
        }
    }
}

// ---------------------------------------------------------------------------
// Risk & alerts
// ---------------------------------------------------------------------------

pub fn print_risk_alert(alert: &RiskAlert) {
    header(&format!("ALERT #{}", alert.id));
    println!(
        "{DIM}  {:<18}{RESET}{}{BOLD}{}{RESET}",
        "severity",
        level_colour(&alert.severity),
        alert.severity
    );
    if let Some(client_id) = alert.client_id {
        field("client", &client_id.to_string());
    }
    if let Some(tags) = alert.risk_tags.as_ref().filter(|t| !t.is_empty()) {
        field("tags", &tags.join(", "));
    }
    field("created", &alert.created_at);
    println!("{CYAN}{SEP_THIN}{RESET}");
    println!("{}", alert.summary.trim());
    if let Some(next) = alert.next_steps.as_deref() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{BOLD}  Next steps{RESET}");
        println!("{}", next.trim());
    }
}

pub fn print_risk_alerts(alerts: &[RiskAlert]) {
    if alerts.is_empty() {
        println!("no alerts");
        return;
    }
    for alert in alerts {
        println!(
            "{:>5}  {}{:<9}{RESET} {}",
            alert.id,
            level_colour(&alert.severity),
            alert.severity,
            alert.summary
        );
    }
}

pub fn print_risk_alert_list(list: &RiskAlertListResponse) {
    if list.alerts.is_empty() {
        println!("no alerts");
        return;
    }
    for alert in &list.alerts {
        println!(
            "{:>5}  {}{:<9}{RESET} {:<24} {}",
            alert.id,
            level_colour(&alert.severity),
            alert.severity,
            or_dash(alert.client_name.as_deref()),
            alert.summary
        );
    }
    println!("{DIM}{} total{RESET}", list.total);
}

pub fn print_alert_queue(items: &[AlertQueueItem]) {
    if items.is_empty() {
        println!("alert queue is empty");
        return;
    }
    for item in items {
        let overdue = if item.is_overdue {
            format!("  {RED}{BOLD}OVERDUE{RESET}")
        } else {
            String::new()
        };
        println!(
            "{:>5}  {}{:<9}{RESET} {:<8} {:<12} due {}  {}{overdue}",
            item.id,
            level_colour(&item.severity),
            item.severity,
            item.priority,
            item.status,
            or_dash(item.sla_due_date.as_deref()),
            or_dash(item.assigned_to.as_deref()),
        );
        println!("{DIM}       {}{RESET}", item.summary);
    }
}

// ---------------------------------------------------------------------------
// Cases
// ---------------------------------------------------------------------------

pub fn print_case(case: &Case) {
    header(&format!("CASE #{}  {}", case.id, case.case_type));
    field("status", &case.status);
    println!(
        "{DIM}  {:<18}{RESET}{}{}{RESET}",
        "priority",
        level_colour(&case.priority),
        case.priority
    );
    field("client", or_dash(case.client_name.as_deref()));
    field("assigned to", or_dash(case.assigned_to.as_deref()));
    if let Some(alert_id) = case.alert_id {
        field("alert", &alert_id.to_string());
    }
    field("SAR status", or_dash(case.sar_status.as_deref()));
    if let Some(reference) = case.sar_reference.as_deref() {
        field("SAR reference", reference);
    }
    field("created", &case.created_at);
    field("updated", &case.updated_at);
    if let Some(closed) = case.closed_at.as_deref() {
        field("closed", closed);
    }
    if let Some(notes) = case.investigation_notes.as_deref() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{}", notes.trim());
    }
    if let Some(conclusion) = case.conclusion.as_deref() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{BOLD}  Conclusion{RESET}");
        println!("{}", conclusion.trim());
    }
}

pub fn print_case_list(cases: &[Case]) {
    if cases.is_empty() {
        println!("no cases");
        return;
    }
    for case in cases {
        println!(
            "{:>5}  {:<24} {:<14} {}{:<8}{RESET} {}",
            case.id,
            case.case_type,
            case.status,
            level_colour(&case.priority),
            case.priority,
            or_dash(case.client_name.as_deref()),
        );
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub fn print_dashboard(stats: &DashboardStats) {
    header("DASHBOARD");
    field("clients", &stats.total_clients.to_string());
    field("high risk", &stats.high_risk_clients.to_string());
    field("open alerts", &stats.open_risk_alerts.to_string());
    field("recent analyses", &stats.recent_kyc_analyses.to_string());
    if let Some(open_cases) = stats.open_cases {
        field("open cases", &open_cases.to_string());
    }
    if let Some(new_today) = stats.new_alerts_today {
        field("new alerts today", &new_today.to_string());
    }
    if let Some(uptodate) = stats.kyc_uptodate_percentage {
        field("KYC up to date", &format!("{uptodate:.1}%"));
    }
    if let Some(upcoming) = stats.kyc_upcoming_reviews {
        field("upcoming reviews", &upcoming.to_string());
    }
    println!("{CYAN}{SEP}{RESET}");
}

/// Fallback for payloads without a fixed shape.
pub fn print_value(title: &str, value: &Value) -> Result<()> {
    header(title);
    print_json(value)
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

pub fn print_workflow_banner(client: &str, url: &str) {
    println!(
        "\n{CYAN}{SEP}{RESET}\n\
         {BOLD}{WHITE}  ▸ MULTI-AGENT WORKFLOW{RESET}\n\
         {CYAN}{SEP}{RESET}\n\
         {DIM}  client   {RESET}{WHITE}{client}{RESET}\n\
         {DIM}  backend  {RESET}{WHITE}{url}{RESET}\n\
         {CYAN}{SEP_THIN}{RESET}"
    );
}

pub fn print_phase(phase: Phase) {
    println!(
        "{BLUE}  [{}/{}]{RESET} {}",
        phase.index(),
        Phase::ALL.len(),
        phase.status_line()
    );
}

pub fn print_response_received(steps: usize) {
    println!("{GREEN}  ✓ response received{RESET} {DIM}({steps} agent steps){RESET}");
}

pub fn print_step(index: usize, step: &WorkflowStep) {
    println!("{CYAN}{SEP_THIN}{RESET}");
    println!(
        "{BOLD}{WHITE}  {}. {}{RESET}  {DIM}{}  {:.2}s  {}{RESET}",
        index + 1,
        step.agent_name,
        step.agent_role,
        step.execution_time,
        step.status
    );
    if !step.tools_used.is_empty() {
        println!("{DIM}     tools: {}{RESET}", step.tools_used.join(", "));
    }

    if let Some(rag) = &step.rag_details {
        println!(
            "{DIM}     retrieved {} similar cases{RESET}",
            rag.retrieved_cases
        );
        for case in &rag.cases {
            println!(
                "     {BLUE}{:>6}{RESET}  {} {DIM}({}, {}){RESET}",
                percent(case.relevance, 1),
                case.client_name,
                case.risk_level,
                case.outcome
            );
        }
        if let Some(avg) = rag.average_relevance() {
            println!("{DIM}     avg relevance: {}{RESET}", percent(avg, 1));
        }
    }

    for call in step.tool_calls.iter().flatten() {
        println!("{YELLOW}     ⚙ {}{RESET}", call.tool);
        if let Some(confidence) = call.output.get("confidence_score").and_then(Value::as_f64) {
            println!("{DIM}       confidence {}{RESET}", percent(confidence, 1));
        }
    }
}

pub fn print_decision(decision: &ComplianceDecision) {
    let status = decision.status();
    println!("\n{CYAN}{SEP}{RESET}");
    println!(
        "{BOLD}{}  ▸ {}{RESET}",
        outcome_colour(decision.outcome()),
        or_dash(Some(status.as_str()))
    );
    println!("{CYAN}{SEP}{RESET}");
    let confidence = decision.confidence().map(|c| percent(c, 0));
    field("confidence", or_dash(confidence.as_deref()));
    let risk = decision.risk().map(|r| format!("{r}/100"));
    field("risk score", or_dash(risk.as_deref()));
    field("approval tier", &decision.approval_tier_or_default());
    field("PEP", yes_no(decision.is_pep()));
    field("sanctions", yes_no(decision.is_sanctioned()));

    let breakdown = decision.breakdown();
    if !breakdown.is_empty() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{BOLD}  Breakdown{RESET}");
        for (factor, assessment) in &breakdown {
            println!("{DIM}  {factor:<24}{RESET}{assessment}");
        }
    }
    bullet_section("Recommended actions", &decision.recommended_actions());
    let rationale = decision.rationale();
    if !rationale.trim().is_empty() {
        println!("{CYAN}{SEP_THIN}{RESET}");
        println!("{}", rationale.trim());
    }
    println!("{CYAN}{SEP}{RESET}\n");
}

/// Run metadata and the final decision; steps are printed when the response arrives.
pub fn print_workflow_summary(result: &WorkflowResult) {
    if let Some(meta) = &result.metadata {
        println!(
            "{DIM}  {:.2}s total  {} agents  {} RAG retrievals  {} tool calls{RESET}",
            meta.total_execution_time, meta.agents_used, meta.rag_retrievals, meta.tool_calls
        );
    }
    print_decision(&result.final_result.compliance_decision);
}

pub fn print_workflow_error(reason: &str) {
    println!("{RED}{BOLD}  ✗ workflow failed:{RESET} {reason}");
}
