use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kyc-desk",
    version,
    about = "Terminal client for the KYC compliance analysis backend"
)]
pub struct Cli {
    /// Backend profile name; defaults to the active profile from config
    #[arg(long, global = true)]
    pub backend: Option<String>,
    /// Backend base URL; overrides the profile and KYC_DESK_API_URL
    #[arg(long, global = true)]
    pub url: Option<String>,
    /// Print response payloads as pretty JSON
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configured backend profiles
    Backend {
        #[command(subcommand)]
        command: BackendCommands,
    },
    /// Run KYC analysis on a client
    Kyc {
        #[command(subcommand)]
        command: KycCommands,
    },
    /// Browse client records
    Clients {
        #[command(subcommand)]
        command: ClientCommands,
    },
    /// Transaction surveillance and risk alerts
    Risk {
        #[command(subcommand)]
        command: RiskCommands,
    },
    /// Investigation case management
    Cases {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Alert triage queue
    Alerts {
        #[command(subcommand)]
        command: AlertCommands,
    },
    /// Show dashboard statistics
    Dashboard,
    /// Multi-agent compliance workflow
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

// ---------------------------------------------------------------------------
// backend
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum BackendCommands {
    /// Add or update a backend profile
    Add(BackendAddArgs),
    /// List configured backend profiles
    List,
    /// Set active backend profile
    Use(BackendUseArgs),
    /// Remove a backend profile
    Remove(BackendRemoveArgs),
}

#[derive(Args)]
pub struct BackendAddArgs {
    /// Profile name used in local configuration
    pub name: String,
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long)]
    pub url: String,
    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = crate::domain::default_timeout_secs())]
    pub timeout_secs: u64,
    /// Skip TLS certificate validation for this backend
    #[arg(long)]
    pub insecure_tls: bool,
    /// Set as current active backend
    #[arg(long)]
    pub r#use: bool,
    /// Write to ~/.config/kyc-desk instead of .kyc-desk
    #[arg(long)]
    pub global: bool,
}

#[derive(Args)]
pub struct BackendUseArgs {
    /// Profile name
    pub name: String,
    /// Update ~/.config/kyc-desk instead of .kyc-desk
    #[arg(long)]
    pub global: bool,
}

#[derive(Args)]
pub struct BackendRemoveArgs {
    /// Profile name
    pub name: String,
    /// Remove from ~/.config/kyc-desk instead of .kyc-desk
    #[arg(long)]
    pub global: bool,
}

// ---------------------------------------------------------------------------
// kyc / clients
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum KycCommands {
    /// Analyze free-form KYC notes and store the client
    Analyze(KycAnalyzeArgs),
}

#[derive(Args)]
pub struct KycAnalyzeArgs {
    /// Client full name
    #[arg(long)]
    pub name: String,
    #[command(flatten)]
    pub notes: NotesArgs,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub nationality: Option<String>,
    /// Country of residency
    #[arg(long)]
    pub residency: Option<String>,
    /// Declared source of wealth
    #[arg(long)]
    pub wealth: Option<String>,
    /// Business activity description
    #[arg(long)]
    pub business: Option<String>,
}

/// KYC notes given inline or read from a file.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct NotesArgs {
    /// KYC notes text
    #[arg(long)]
    pub notes: Option<String>,
    /// Read KYC notes from a file
    #[arg(long)]
    pub notes_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List all clients
    List,
    /// Show one client record
    Show(ClientIdArgs),
    /// Show generated insights for a client
    Insights(ClientIdArgs),
    /// Show KYC record versions for a client
    KycHistory(ClientIdArgs),
    /// Show risk alerts raised for a client
    Alerts(ClientIdArgs),
    /// Show investigation cases for a client
    Cases(ClientIdArgs),
    /// Show the activity timeline for a client
    Activity(ClientIdArgs),
}

#[derive(Args)]
pub struct ClientIdArgs {
    /// Client id
    pub id: u64,
}

// ---------------------------------------------------------------------------
// risk / alerts
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum RiskCommands {
    /// Analyze an activity log for suspicious patterns
    Scan(RiskScanArgs),
    /// List risk alerts
    Alerts(RiskAlertsArgs),
}

#[derive(Args)]
pub struct RiskScanArgs {
    #[command(flatten)]
    pub log: ActivityLogArgs,
    /// Client the activity belongs to
    #[arg(long)]
    pub client_id: Option<u64>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ActivityLogArgs {
    /// Activity log text
    #[arg(long)]
    pub log: Option<String>,
    /// Read the activity log from a file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct RiskAlertsArgs {
    /// Only alerts of this severity (Low, Medium, High, Critical)
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub client_id: Option<u64>,
}

#[derive(Subcommand)]
pub enum AlertCommands {
    /// List open alerts ordered by SLA due date
    Open(AlertQueueArgs),
}

#[derive(Args)]
pub struct AlertQueueArgs {
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub severity: Option<String>,
    #[arg(long)]
    pub assigned_to: Option<String>,
}

// ---------------------------------------------------------------------------
// cases
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum CaseCommands {
    /// List cases
    List(CaseListArgs),
    /// Show one case
    Show(CaseIdArgs),
    /// Open a new case
    Create(CaseCreateArgs),
    /// Update fields on an existing case
    Update(CaseUpdateArgs),
}

#[derive(Args)]
pub struct CaseListArgs {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub assigned_to: Option<String>,
}

#[derive(Args)]
pub struct CaseIdArgs {
    /// Case id
    pub id: u64,
}

#[derive(Args)]
pub struct CaseCreateArgs {
    /// Case type, e.g. AML Investigation
    #[arg(long)]
    pub case_type: String,
    #[arg(long, default_value = "Medium")]
    pub priority: String,
    /// Alert that triggered the case
    #[arg(long)]
    pub alert_id: Option<u64>,
    #[arg(long)]
    pub client_id: Option<u64>,
    #[arg(long)]
    pub assigned_to: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct CaseUpdateArgs {
    /// Case id
    pub id: u64,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub assigned_to: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub conclusion: Option<String>,
    #[arg(long)]
    pub sar_status: Option<String>,
    #[arg(long)]
    pub sar_filed_date: Option<String>,
    #[arg(long)]
    pub sar_reference: Option<String>,
}

// ---------------------------------------------------------------------------
// agents
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AgentCommands {
    /// Run the multi-agent workflow and follow its progress
    Run(AgentRunArgs),
    /// Describe the backend's agent workflow
    Info,
}

#[derive(Args)]
pub struct AgentRunArgs {
    /// Client full name
    #[arg(long)]
    pub name: String,
    #[command(flatten)]
    pub notes: NotesArgs,
    #[arg(long)]
    pub nationality: Option<String>,
    /// Country of residency
    #[arg(long)]
    pub residency: Option<String>,
}
