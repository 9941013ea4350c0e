use kyc_desk::domain::{
    AlertFilter, CaseCreate, CaseFilter, CaseUpdate, ComplianceDecision, DashboardStats,
    DecisionOutcome, KycRecord, RagDetails, RootConfig, WorkflowRequest, WorkflowSettings,
    api_url, merge_root_config, validate_backend_name,
};
use kyc_desk::workflow::{Phase, SequencerConfig, WorkflowState};
use serde_json::json;
use std::time::Duration;

#[test]
fn decision_outcome_follows_compliance_status() {
    let decision = |status: &str| ComplianceDecision {
        compliance_status: json!(status),
        ..ComplianceDecision::default()
    };
    assert_eq!(decision("Approved").outcome(), DecisionOutcome::Approved);
    assert_eq!(
        decision("Review Required").outcome(),
        DecisionOutcome::ReviewRequired
    );
    assert_eq!(decision("Rejected").outcome(), DecisionOutcome::Rejected);
    assert_eq!(decision("").outcome(), DecisionOutcome::Rejected);
}

#[test]
fn approval_tier_defaults_to_automated() {
    let mut decision = ComplianceDecision::default();
    assert_eq!(decision.approval_tier_or_default(), "Level 1 (Automated)");
    decision.approval_tier = json!("Level 3 (Senior)");
    assert_eq!(decision.approval_tier_or_default(), "Level 3 (Senior)");
}

#[test]
fn partial_decision_payload_uses_defaults() {
    let decision: ComplianceDecision =
        serde_json::from_value(json!({"compliance_status": "Approved"})).unwrap();
    assert_eq!(decision.confidence(), None);
    assert!(decision.recommended_actions().is_empty());
    assert!(!decision.is_pep());
    assert_eq!(
        serde_json::to_value(&decision).unwrap(),
        json!({"compliance_status": "Approved"})
    );
}

#[test]
fn decision_tolerates_off_type_fields() {
    let decision: ComplianceDecision = serde_json::from_value(json!({
        "compliance_status": "Review Required",
        "confidence_score": "0.7",
        "risk_score": "15",
        "approval_tier": null,
        "decision_breakdown": {
            "kyc_data": {"status": "Pass"},
            "pep": "Indirect exposure",
            "score": 3
        },
        "pep_flag": "yes",
        "sanctions_flag": 0,
        "recommended_actions": ["Request source of funds", {"step": "EDD"}],
        "rationale": null
    }))
    .unwrap();

    assert_eq!(decision.outcome(), DecisionOutcome::ReviewRequired);
    assert_eq!(decision.confidence(), Some(0.7));
    assert_eq!(decision.risk(), Some(15.0));
    assert_eq!(decision.approval_tier_or_default(), "Level 1 (Automated)");
    assert_eq!(
        decision.breakdown(),
        vec![
            ("kyc_data".to_string(), r#"{"status":"Pass"}"#.to_string()),
            ("pep".to_string(), "Indirect exposure".to_string()),
            ("score".to_string(), "3".to_string()),
        ]
    );
    assert!(decision.is_pep());
    assert!(!decision.is_sanctioned());
    assert_eq!(
        decision.recommended_actions(),
        vec!["Request source of funds", r#"{"step":"EDD"}"#]
    );
    assert_eq!(decision.rationale(), "");
}

#[test]
fn unreadable_scores_are_absent() {
    let decision: ComplianceDecision = serde_json::from_value(json!({
        "risk_score": "High",
        "decision_breakdown": "all clear",
        "compliance_status": 42
    }))
    .unwrap();
    assert_eq!(decision.risk(), None);
    assert!(decision.breakdown().is_empty());
    assert_eq!(decision.status(), "42");
    assert_eq!(decision.outcome(), DecisionOutcome::Rejected);
}

#[test]
fn average_relevance_ignores_missing_scores() {
    let empty = RagDetails::default();
    assert_eq!(empty.average_relevance(), None);

    let rag = RagDetails {
        relevance_scores: vec![0.5, 1.0],
        ..RagDetails::default()
    };
    assert_eq!(rag.average_relevance(), Some(0.75));
}

#[test]
fn filters_serialize_only_set_fields() {
    assert_eq!(serde_json::to_value(CaseFilter::default()).unwrap(), json!({}));
    assert_eq!(
        serde_json::to_value(AlertFilter {
            severity: None,
            client_id: Some(7),
        })
        .unwrap(),
        json!({"client_id": 7})
    );
}

#[test]
fn api_url_joins_and_validates() {
    assert_eq!(
        api_url("http://localhost:8000/", "/agents/orchestrate").unwrap(),
        "http://localhost:8000/agents/orchestrate"
    );
    assert_eq!(
        api_url("https://kyc.example/base", "api/cases").unwrap(),
        "https://kyc.example/base/api/cases"
    );
    assert!(api_url("", "/api").is_err());
    assert!(api_url("localhost:8000", "/api").is_err());
}

#[test]
fn backend_names_reject_path_tricks() {
    assert!(validate_backend_name("staging").is_ok());
    assert!(validate_backend_name("").is_err());
    assert!(validate_backend_name("..").is_err());
    assert!(validate_backend_name("a\\b").is_err());
}

#[test]
fn case_update_sends_only_set_fields() {
    let update = CaseUpdate {
        status: Some("Closed".to_string()),
        conclusion: Some("No SAR".to_string()),
        ..CaseUpdate::default()
    };
    assert!(!update.is_empty());
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({"status": "Closed", "conclusion": "No SAR"})
    );
    assert!(CaseUpdate::default().is_empty());
}

#[test]
fn case_create_priority_defaults_to_medium() {
    let create: CaseCreate =
        serde_json::from_value(json!({"case_type": "AML Investigation"})).unwrap();
    assert_eq!(create.priority, "Medium");
    assert_eq!(
        serde_json::to_value(&create).unwrap(),
        json!({"case_type": "AML Investigation", "priority": "Medium"})
    );
}

#[test]
fn workflow_request_omits_unset_location_fields() {
    let mut request = WorkflowRequest::new("Jane Doe", "notes");
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"full_name": "Jane Doe", "kyc_notes": "notes"})
    );
    request.residency_country = Some("Switzerland".to_string());
    assert_eq!(
        serde_json::to_value(&request).unwrap()["residency_country"],
        "Switzerland"
    );
}

#[test]
fn kyc_record_version_defaults_to_one() {
    let record: KycRecord = serde_json::from_value(json!({
        "id": 1,
        "client_id": 7,
        "risk_score": null,
        "risk_rationale": null,
        "kyc_summary": null,
        "cdd_conclusion": null,
        "review_date": null,
        "next_review_date": null,
        "raw_kyc_notes": null,
        "created_at": "2024-05-01T10:00:00",
        "created_by": null
    }))
    .unwrap();
    assert_eq!(record.version, 1);
    assert!(!record.edd_required);
}

#[test]
fn dashboard_stats_accept_the_legacy_shape() {
    let stats: DashboardStats = serde_json::from_value(json!({
        "total_clients": 12,
        "high_risk_clients": 3,
        "open_risk_alerts": 5,
        "recent_kyc_analyses": 4
    }))
    .unwrap();
    assert_eq!(stats.total_clients, 12);
    assert!(stats.open_cases.is_none());
    assert!(stats.kyc_uptodate_percentage.is_none());
}

#[test]
fn local_root_config_wins_field_by_field() {
    let global = RootConfig {
        current_backend: Some("prod".to_string()),
        workflow: WorkflowSettings {
            phase_interval_ms: Some(2000),
            reveal_interval_ms: Some(600),
            request_timeout_secs: None,
        },
    };
    let local = RootConfig {
        current_backend: None,
        workflow: WorkflowSettings {
            phase_interval_ms: Some(100),
            ..WorkflowSettings::default()
        },
    };

    let merged = merge_root_config(global, local);
    assert_eq!(merged.current_backend.as_deref(), Some("prod"));
    assert_eq!(merged.workflow.phase_interval_ms, Some(100));
    assert_eq!(merged.workflow.reveal_interval_ms, Some(600));
    assert_eq!(merged.workflow.request_timeout_secs, None);
}

#[test]
fn sequencer_config_applies_overrides() {
    let config = SequencerConfig::from_settings(&WorkflowSettings {
        phase_interval_ms: Some(250),
        reveal_interval_ms: None,
        request_timeout_secs: Some(30),
    });
    assert_eq!(config.phase_interval, Duration::from_millis(250));
    assert_eq!(config.reveal_interval, Duration::from_millis(300));
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
fn phases_are_numbered_one_to_four() {
    let indices: Vec<u8> = Phase::ALL.iter().map(|p| p.index()).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(Phase::from_index(3), Some(Phase::ComplianceOfficer));
    assert_eq!(Phase::from_index(0), None);
    assert_eq!(Phase::from_index(5), None);
    assert_eq!(
        Phase::RiskAssessor.status_line(),
        "Risk Assessor retrieving similar cases..."
    );
    assert_eq!(Phase::FinalDecision.to_string(), "4/4 Final Decision");
}

#[test]
fn workflow_state_classification() {
    assert!(WorkflowState::Pending.is_in_flight());
    assert!(WorkflowState::Revealing.is_in_flight());
    assert!(!WorkflowState::Done.is_in_flight());
    assert!(WorkflowState::Done.is_terminal());
    assert!(WorkflowState::Error.is_terminal());
    assert!(!WorkflowState::Idle.is_terminal());
    assert_eq!(WorkflowState::default(), WorkflowState::Idle);
}
