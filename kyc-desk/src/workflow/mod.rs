//! Progress sequencing for the multi-agent KYC workflow.
//!
//! One submission races a fixed four-phase progress ticker against a single
//! `POST /agents/orchestrate` call, then paces the reveal of the returned
//! execution trace.

use crate::domain::{WorkflowRequest, WorkflowResult, WorkflowSettings};
use crate::error::ApiError;
use std::fmt;
use std::time::Duration;

mod sequencer;

pub use sequencer::Sequencer;

#[async_trait::async_trait]
pub trait Orchestrator: Send + Sync {
    async fn orchestrate(&self, request: &WorkflowRequest) -> Result<WorkflowResult, ApiError>;
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

/// Display-only progress phases shown while the request is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    KycAnalyst = 1,
    RiskAssessor = 2,
    ComplianceOfficer = 3,
    FinalDecision = 4,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::KycAnalyst,
        Phase::RiskAssessor,
        Phase::ComplianceOfficer,
        Phase::FinalDecision,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.index() == index)
    }

    pub fn agent(self) -> &'static str {
        match self {
            Phase::KycAnalyst => "KYC Analyst",
            Phase::RiskAssessor => "Risk Assessor",
            Phase::ComplianceOfficer => "Compliance Officer",
            Phase::FinalDecision => "Final Decision",
        }
    }

    pub fn status_line(self) -> &'static str {
        match self {
            Phase::KycAnalyst => "KYC Analyst extracting entities...",
            Phase::RiskAssessor => "Risk Assessor retrieving similar cases...",
            Phase::ComplianceOfficer => "Compliance Officer checking databases...",
            Phase::FinalDecision => "Finalizing decision report...",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.index(), Phase::ALL.len(), self.agent())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Pending,
    Revealing,
    Done,
    Error,
}

impl WorkflowState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, WorkflowState::Pending | WorkflowState::Revealing)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Done | WorkflowState::Error)
    }
}

/// Snapshot of one run as a consuming view would render it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowView {
    pub run: u64,
    pub state: WorkflowState,
    pub phase: Option<Phase>,
    pub revealed: Option<usize>,
    pub result: Option<WorkflowResult>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    Submitted,
    Phase(Phase),
    ResponseReceived { steps: usize },
    Revealed(usize),
    Completed,
    Failed(String),
    Dismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerUpdate {
    pub run: u64,
    pub event: SequencerEvent,
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    pub phase_interval: Duration,
    pub reveal_interval: Duration,
    pub request_timeout: Duration,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            phase_interval: Duration::from_millis(1000),
            reveal_interval: Duration::from_millis(300),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl SequencerConfig {
    pub fn from_settings(settings: &WorkflowSettings) -> Self {
        let defaults = Self::default();
        Self {
            phase_interval: settings
                .phase_interval_ms
                .map_or(defaults.phase_interval, Duration::from_millis),
            reveal_interval: settings
                .reveal_interval_ms
                .map_or(defaults.reveal_interval, Duration::from_millis),
            request_timeout: settings
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
        }
    }
}
