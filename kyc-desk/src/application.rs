use crate::api::ApiClient;
use crate::cli::{
    ActivityLogArgs, AgentCommands, AgentRunArgs, AlertCommands, AlertQueueArgs, BackendAddArgs,
    BackendCommands, BackendRemoveArgs, BackendUseArgs, CaseCommands, CaseCreateArgs,
    CaseListArgs, CaseUpdateArgs, Cli, ClientCommands, Commands, KycAnalyzeArgs, KycCommands,
    NotesArgs, RiskAlertsArgs, RiskCommands, RiskScanArgs,
};
use crate::config::{API_URL_ENV, ConfigScope, ConfigStore};
use crate::domain::{
    AlertFilter, BackendConfig, CaseCreate, CaseFilter, CaseUpdate, DEFAULT_API_URL,
    KycAnalysisRequest, QueueFilter, RiskAnalysisRequest, WorkflowRequest, WorkflowResult,
    normalize_base_url, validate_backend_name,
};
use crate::render;
use crate::workflow::{Sequencer, SequencerConfig, SequencerEvent};
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::new();
    let Cli {
        backend,
        url,
        json,
        command,
    } = cli;

    match command {
        Commands::Backend { command } => match command {
            BackendCommands::Add(args) => cmd_backend_add(&store, args)?,
            BackendCommands::List => cmd_backend_list(&store)?,
            BackendCommands::Use(args) => cmd_backend_use(&store, args)?,
            BackendCommands::Remove(args) => cmd_backend_remove(&store, args)?,
        },
        Commands::Kyc { command } => {
            let api = connect(&store, backend, url)?;
            match command {
                KycCommands::Analyze(args) => cmd_kyc_analyze(&api, args, json).await?,
            }
        }
        Commands::Clients { command } => {
            let api = connect(&store, backend, url)?;
            cmd_clients(&api, command, json).await?;
        }
        Commands::Risk { command } => {
            let api = connect(&store, backend, url)?;
            match command {
                RiskCommands::Scan(args) => cmd_risk_scan(&api, args, json).await?,
                RiskCommands::Alerts(args) => cmd_risk_alerts(&api, args, json).await?,
            }
        }
        Commands::Cases { command } => {
            let api = connect(&store, backend, url)?;
            match command {
                CaseCommands::List(args) => cmd_cases_list(&api, args, json).await?,
                CaseCommands::Show(args) => {
                    let case = api.case(args.id).await?;
                    emit(json, &case, render::print_case)?;
                }
                CaseCommands::Create(args) => cmd_cases_create(&api, args, json).await?,
                CaseCommands::Update(args) => cmd_cases_update(&api, args, json).await?,
            }
        }
        Commands::Alerts { command } => {
            let api = connect(&store, backend, url)?;
            match command {
                AlertCommands::Open(args) => cmd_alerts_open(&api, args, json).await?,
            }
        }
        Commands::Dashboard => {
            let api = connect(&store, backend, url)?;
            let stats = api.dashboard_stats().await?;
            emit(json, &stats, render::print_dashboard)?;
        }
        Commands::Agents { command } => {
            let api = connect(&store, backend, url)?;
            cmd_agents(&store, api, command, json).await?;
        }
    }

    Ok(())
}

/// Resolves the backend profile and builds a client for it.
fn connect(
    store: &ConfigStore,
    backend: Option<String>,
    url: Option<String>,
) -> Result<ApiClient> {
    let env_url = Some(envmnt::get_or(API_URL_ENV, "")).filter(|v| !v.trim().is_empty());
    let resolved = store.resolve_backend(backend, url, env_url)?;
    tracing::debug!(
        backend = resolved.name.as_deref().unwrap_or("default"),
        url = %resolved.config.url,
        "resolved backend"
    );
    Ok(ApiClient::new(&resolved.config)?)
}

async fn cmd_agents(
    store: &ConfigStore,
    api: ApiClient,
    command: AgentCommands,
    json: bool,
) -> Result<()> {
    match command {
        AgentCommands::Run(args) => {
            let settings = store.settings()?;
            let config = SequencerConfig::from_settings(&settings.workflow);
            cmd_agents_run(api, config, args, json).await
        }
        AgentCommands::Info => {
            let info = api.workflow_info().await?;
            if json {
                render::print_json(&info)
            } else {
                render::print_value("AGENT WORKFLOW", &info)
            }
        }
    }
}

fn emit<T: serde::Serialize + ?Sized>(
    json: bool,
    value: &T,
    print: impl FnOnce(&T),
) -> Result<()> {
    if json {
        render::print_json(value)
    } else {
        print(value);
        Ok(())
    }
}

fn read_text(inline: Option<String>, file: Option<PathBuf>, what: &str) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("failed to read {what} from {}", path.display())),
        (None, None) => bail!("{what} are required"),
    }
}

fn read_notes(notes: NotesArgs) -> Result<String> {
    read_text(notes.notes, notes.notes_file, "KYC notes")
}

fn read_activity_log(log: ActivityLogArgs) -> Result<String> {
    read_text(log.log, log.log_file, "activity log contents")
}

// ---------------------------------------------------------------------------
// backend
// ---------------------------------------------------------------------------

fn cmd_backend_add(store: &ConfigStore, args: BackendAddArgs) -> Result<()> {
    validate_backend_name(&args.name)?;
    let scope = ConfigScope::from_global_flag(args.global);

    let backend = BackendConfig {
        url: normalize_base_url(&args.url),
        timeout_secs: args.timeout_secs,
        insecure_tls: args.insecure_tls,
    };
    store.save_profile(scope, &args.name, &backend)?;

    if args.r#use || store.settings()?.current_backend.is_none() {
        let mut settings = store.scope_settings(scope)?;
        settings.current_backend = Some(args.name.clone());
        store.save_settings(scope, &settings)?;
    }

    println!("backend '{}' saved", args.name);
    Ok(())
}

fn cmd_backend_list(store: &ConfigStore) -> Result<()> {
    let settings = store.settings()?;
    let current = settings.current_backend.as_deref();

    let profiles = store.profiles()?;
    if profiles.is_empty() {
        println!("no backends configured; using {DEFAULT_API_URL}");
        return Ok(());
    }

    for profile in profiles {
        let marker = if Some(profile.name.as_str()) == current {
            "*"
        } else {
            " "
        };
        let tls = if profile.config.insecure_tls {
            ", insecure tls"
        } else {
            ""
        };

        println!(
            "{} {} -> {} ({}, {}s timeout{})",
            marker,
            profile.name,
            profile.config.url,
            profile.scope.label(),
            profile.config.timeout_secs,
            tls
        );
    }

    Ok(())
}

fn cmd_backend_use(store: &ConfigStore, args: BackendUseArgs) -> Result<()> {
    validate_backend_name(&args.name)?;
    let scope = ConfigScope::from_global_flag(args.global);
    if store.profile(&args.name, Some(scope))?.is_none() {
        bail!("backend '{}' does not exist in {} config", args.name, scope.label());
    }

    let mut settings = store.scope_settings(scope)?;
    settings.current_backend = Some(args.name.clone());
    store.save_settings(scope, &settings)?;

    println!("active backend set to '{}'", args.name);
    Ok(())
}

fn cmd_backend_remove(store: &ConfigStore, args: BackendRemoveArgs) -> Result<()> {
    validate_backend_name(&args.name)?;
    let scope = ConfigScope::from_global_flag(args.global);
    store.remove_profile(scope, &args.name)?;

    let mut settings = store.scope_settings(scope)?;
    if settings.current_backend.as_deref() == Some(args.name.as_str()) {
        settings.current_backend = None;
        store.save_settings(scope, &settings)?;
    }

    println!("backend '{}' removed", args.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// kyc / clients
// ---------------------------------------------------------------------------

async fn cmd_kyc_analyze(api: &ApiClient, args: KycAnalyzeArgs, json: bool) -> Result<()> {
    let request = KycAnalysisRequest {
        full_name: args.name,
        date_of_birth: args.dob,
        nationality: args.nationality,
        residency_country: args.residency,
        source_of_wealth: args.wealth,
        business_activity: args.business,
        kyc_notes: read_notes(args.notes)?,
    };
    let client = api.analyze_kyc(&request).await?;
    emit(json, &client, render::print_client)
}

async fn cmd_clients(api: &ApiClient, command: ClientCommands, json: bool) -> Result<()> {
    match command {
        ClientCommands::List => {
            let list = api.clients().await?;
            emit(json, &list, render::print_client_list)
        }
        ClientCommands::Show(args) => {
            let client = api.client(args.id).await?;
            emit(json, &client, render::print_client)
        }
        ClientCommands::Insights(args) => {
            let insights = api.client_insights(args.id).await?;
            emit(json, &insights, render::print_insights)
        }
        ClientCommands::KycHistory(args) => {
            let records = api.client_kyc_history(args.id).await?;
            emit(json, records.as_slice(), render::print_kyc_history)
        }
        ClientCommands::Alerts(args) => {
            let alerts = api.client_alerts(args.id).await?;
            emit(json, alerts.as_slice(), render::print_risk_alerts)
        }
        ClientCommands::Cases(args) => {
            let cases = api.client_cases(args.id).await?;
            emit(json, cases.as_slice(), render::print_case_list)
        }
        ClientCommands::Activity(args) => {
            let activity = api.client_activity(args.id).await?;
            if json {
                render::print_json(&activity)
            } else {
                render::print_value(&format!("ACTIVITY  client #{}", args.id), &activity)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// risk / alerts
// ---------------------------------------------------------------------------

async fn cmd_risk_scan(api: &ApiClient, args: RiskScanArgs, json: bool) -> Result<()> {
    let request = RiskAnalysisRequest {
        client_id: args.client_id,
        activity_log: read_activity_log(args.log)?,
    };
    let alert = api.analyze_risk(&request).await?;
    emit(json, &alert, render::print_risk_alert)
}

async fn cmd_risk_alerts(api: &ApiClient, args: RiskAlertsArgs, json: bool) -> Result<()> {
    let filter = AlertFilter {
        severity: args.severity,
        client_id: args.client_id,
    };
    let list = api.risk_alerts(&filter).await?;
    emit(json, &list, render::print_risk_alert_list)
}

async fn cmd_alerts_open(api: &ApiClient, args: AlertQueueArgs, json: bool) -> Result<()> {
    let filter = QueueFilter {
        priority: args.priority,
        severity: args.severity,
        assigned_to: args.assigned_to,
    };
    let queue = api.open_alerts(&filter).await?;
    emit(json, queue.as_slice(), render::print_alert_queue)
}

// ---------------------------------------------------------------------------
// cases
// ---------------------------------------------------------------------------

async fn cmd_cases_list(api: &ApiClient, args: CaseListArgs, json: bool) -> Result<()> {
    let filter = CaseFilter {
        status: args.status,
        priority: args.priority,
        assigned_to: args.assigned_to,
    };
    let cases = api.cases(&filter).await?;
    emit(json, cases.as_slice(), render::print_case_list)
}

async fn cmd_cases_create(api: &ApiClient, args: CaseCreateArgs, json: bool) -> Result<()> {
    let create = CaseCreate {
        alert_id: args.alert_id,
        client_id: args.client_id,
        case_type: args.case_type,
        priority: args.priority,
        assigned_to: args.assigned_to,
        investigation_notes: args.notes,
    };
    let case = api.create_case(&create).await?;
    emit(json, &case, render::print_case)
}

async fn cmd_cases_update(api: &ApiClient, args: CaseUpdateArgs, json: bool) -> Result<()> {
    let update = CaseUpdate {
        status: args.status,
        priority: args.priority,
        assigned_to: args.assigned_to,
        investigation_notes: args.notes,
        conclusion: args.conclusion,
        sar_status: args.sar_status,
        sar_filed_date: args.sar_filed_date,
        sar_reference: args.sar_reference,
    };
    if update.is_empty() {
        bail!("nothing to update; pass at least one field");
    }
    let case = api.update_case(args.id, &update).await?;
    emit(json, &case, render::print_case)
}

// ---------------------------------------------------------------------------
// agents
// ---------------------------------------------------------------------------

async fn cmd_agents_run(
    api: ApiClient,
    config: SequencerConfig,
    args: AgentRunArgs,
    json: bool,
) -> Result<()> {
    let mut request = WorkflowRequest::new(args.name, read_notes(args.notes)?);
    request.nationality = args.nationality;
    request.residency_country = args.residency;

    if !json {
        render::print_workflow_banner(&request.full_name, api.base_url());
    }

    let (mut sequencer, mut events) = Sequencer::new(Arc::new(api), config);
    let run = sequencer.submit(request)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut result: Option<WorkflowResult> = None;
    loop {
        tokio::select! {
            update = events.recv() => {
                let Some(update) = update else {
                    bail!("workflow sequencer stopped unexpectedly");
                };
                if update.run != run {
                    continue;
                }
                match update.event {
                    SequencerEvent::Phase(phase) => {
                        // Phase ticks stop being shown once the real trace arrives.
                        if !json && result.is_none() {
                            render::print_phase(phase);
                        }
                    }
                    SequencerEvent::ResponseReceived { steps } => {
                        result = sequencer.snapshot().result;
                        if let (false, Some(result)) = (json, result.as_ref()) {
                            render::print_response_received(steps);
                            for (index, step) in result.workflow_execution.iter().enumerate() {
                                render::print_step(index, step);
                            }
                        }
                    }
                    SequencerEvent::Revealed(count) => {
                        tracing::trace!(run, count, "reveal tick");
                    }
                    SequencerEvent::Completed => {
                        let Some(result) = result.as_ref() else {
                            bail!("workflow completed without a result");
                        };
                        if json {
                            render::print_json(result)?;
                        } else {
                            render::print_workflow_summary(result);
                        }
                        return Ok(());
                    }
                    SequencerEvent::Failed(reason) => {
                        if !json {
                            render::print_workflow_error(&reason);
                        }
                        bail!("workflow run failed: {reason}");
                    }
                    SequencerEvent::Submitted | SequencerEvent::Dismissed => {}
                }
            }
            signal = &mut ctrl_c => {
                signal.context("failed to listen for Ctrl-C")?;
                sequencer.dismiss();
                if !json {
                    println!("\nworkflow dismissed");
                }
                return Ok(());
            }
        }
    }
}
