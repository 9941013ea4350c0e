use clap::Parser;
use kyc_desk::cli::{
    AgentCommands, BackendCommands, CaseCommands, Cli, ClientCommands, Commands, RiskCommands,
};
use std::path::PathBuf;

#[test]
fn parse_agents_run_with_inline_notes() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "agents",
        "run",
        "--name",
        "Jane Doe",
        "--notes",
        "Swiss resident",
        "--nationality",
        "Swiss",
    ]);
    assert!(!cli.json);
    assert!(cli.backend.is_none());
    match cli.command {
        Commands::Agents {
            command: AgentCommands::Run(args),
        } => {
            assert_eq!(args.name, "Jane Doe");
            assert_eq!(args.notes.notes.as_deref(), Some("Swiss resident"));
            assert!(args.notes.notes_file.is_none());
            assert_eq!(args.nationality.as_deref(), Some("Swiss"));
            assert!(args.residency.is_none());
        }
        _ => panic!("expected agents run command"),
    }
}

#[test]
fn parse_agents_run_accepts_notes_file() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "agents",
        "run",
        "--name",
        "Jane Doe",
        "--notes-file",
        "notes.txt",
    ]);
    match cli.command {
        Commands::Agents {
            command: AgentCommands::Run(args),
        } => {
            assert_eq!(args.notes.notes_file, Some(PathBuf::from("notes.txt")));
        }
        _ => panic!("expected agents run command"),
    }
}

#[test]
fn notes_are_required_exactly_once() {
    assert!(Cli::try_parse_from(["kyc-desk", "agents", "run", "--name", "Jane Doe"]).is_err());
    assert!(
        Cli::try_parse_from([
            "kyc-desk",
            "kyc",
            "analyze",
            "--name",
            "Jane Doe",
            "--notes",
            "x",
            "--notes-file",
            "y.txt",
        ])
        .is_err()
    );
}

#[test]
fn global_options_work_after_the_subcommand() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "dashboard",
        "--json",
        "--backend",
        "staging",
        "--url",
        "http://localhost:9000",
    ]);
    assert!(cli.json);
    assert_eq!(cli.backend.as_deref(), Some("staging"));
    assert_eq!(cli.url.as_deref(), Some("http://localhost:9000"));
    assert!(matches!(cli.command, Commands::Dashboard));
}

#[test]
fn parse_backend_add_defaults() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "backend",
        "add",
        "local",
        "--url",
        "http://localhost:8000",
    ]);
    match cli.command {
        Commands::Backend {
            command: BackendCommands::Add(args),
        } => {
            assert_eq!(args.name, "local");
            assert_eq!(args.timeout_secs, 120);
            assert!(!args.insecure_tls);
            assert!(!args.r#use);
            assert!(!args.global);
        }
        _ => panic!("expected backend add command"),
    }
}

#[test]
fn parse_client_subcommands_take_an_id() {
    let cli = Cli::parse_from(["kyc-desk", "clients", "kyc-history", "42"]);
    match cli.command {
        Commands::Clients {
            command: ClientCommands::KycHistory(args),
        } => assert_eq!(args.id, 42),
        _ => panic!("expected clients kyc-history command"),
    }

    assert!(Cli::try_parse_from(["kyc-desk", "clients", "show", "abc"]).is_err());
}

#[test]
fn parse_risk_scan_with_client() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "risk",
        "scan",
        "--log-file",
        "activity.log",
        "--client-id",
        "7",
    ]);
    match cli.command {
        Commands::Risk {
            command: RiskCommands::Scan(args),
        } => {
            assert_eq!(args.client_id, Some(7));
            assert_eq!(args.log.log_file, Some(PathBuf::from("activity.log")));
            assert!(args.log.log.is_none());
        }
        _ => panic!("expected risk scan command"),
    }
}

#[test]
fn parse_case_create_and_update() {
    let cli = Cli::parse_from([
        "kyc-desk",
        "cases",
        "create",
        "--case-type",
        "AML Investigation",
        "--alert-id",
        "3",
    ]);
    match cli.command {
        Commands::Cases {
            command: CaseCommands::Create(args),
        } => {
            assert_eq!(args.case_type, "AML Investigation");
            assert_eq!(args.priority, "Medium");
            assert_eq!(args.alert_id, Some(3));
        }
        _ => panic!("expected cases create command"),
    }

    let cli = Cli::parse_from([
        "kyc-desk",
        "cases",
        "update",
        "11",
        "--status",
        "Closed",
        "--sar-status",
        "Filed",
    ]);
    match cli.command {
        Commands::Cases {
            command: CaseCommands::Update(args),
        } => {
            assert_eq!(args.id, 11);
            assert_eq!(args.status.as_deref(), Some("Closed"));
            assert_eq!(args.sar_status.as_deref(), Some("Filed"));
            assert!(args.priority.is_none());
        }
        _ => panic!("expected cases update command"),
    }
}
