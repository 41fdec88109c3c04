mod api;
mod config;
mod consts;
mod controller;
mod error_classifier;
mod events;
mod handlers;
mod logging;
mod page;
mod pretty;
mod service;
mod types;
mod view;

use crate::api::{ApiClient, DashboardApi};
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::{DEFAULT_QUANTIZATION_LEVEL, SERVER_URL_ENV};
use crate::controller::{ActiveElement, Panel, PanelLoads, unless_cancelled};
use crate::events::{Notifications, Severity};
use crate::page::{ContainerId, Page};
use crate::pretty::{print_cmd_error, print_cmd_info, print_cmd_success};
use crate::service::{ServiceAction, ServiceManager, SystemRunner};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, long_about = None)]
/// Dashboard client for the model quantization server
struct Args {
    /// Base URL of the server. Overrides the config file.
    #[arg(long, global = true, env = SERVER_URL_ENV)]
    server_url: Option<String>,

    /// Path to the config file. Defaults to ~/.quant-dash/config.json
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show GPU availability and memory
    GpuInfo,
    /// Recommend quantization levels for a model
    Analyze {
        /// Model id, or "custom" together with --custom-model
        model: String,
        /// Model id used when MODEL is "custom"
        #[arg(long, value_name = "MODEL")]
        custom_model: Option<String>,
        /// Append the full list of quantization options
        #[arg(long)]
        all_options: bool,
    },
    /// Analyze the server's list of popular models
    Popular,
    /// Start quantizing a model
    Quantize {
        model: String,
        #[arg(long, default_value = DEFAULT_QUANTIZATION_LEVEL)]
        level: String,
    },
    /// List every quantization option for a model
    Options { model: String },
    /// List quantized models on the server
    Quantized,
    /// List models in the server's cache
    Models,
    /// Show models loaded into memory
    Loaded,
    /// Load a model into memory
    Load { model: String },
    /// Unload a model from memory
    Unload { model: String },
    /// Check that the server is up
    Health,
    /// Render the whole dashboard as a standalone HTML page
    Dashboard {
        /// Panel active on load
        #[arg(long, default_value = "gpu")]
        panel: Panel,
        /// Further panels to switch to, in order
        #[arg(long = "switch-to", value_name = "PANEL")]
        switch_to: Vec<Panel>,
        /// Model to analyze into the analysis panel
        #[arg(long)]
        model: Option<String>,
        /// Write the page here instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Manage the server's Windows service
    Service {
        #[command(subcommand)]
        action: ServiceCommand,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ServiceCommand {
    /// Register the service with daily log rotation
    Install,
    Start,
    Stop,
    Restart,
    Status,
    /// Unregister the service
    Remove,
}

impl From<ServiceCommand> for ServiceAction {
    fn from(command: ServiceCommand) -> Self {
        match command {
            ServiceCommand::Install => ServiceAction::Install,
            ServiceCommand::Start => ServiceAction::Start,
            ServiceCommand::Stop => ServiceAction::Stop,
            ServiceCommand::Restart => ServiceAction::Restart,
            ServiceCommand::Status => ServiceAction::Status,
            ServiceCommand::Remove => ServiceAction::Remove,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a config file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Store the server URL in the config file
    SetServerUrl { url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_path()?,
    };
    let mut config = Config::load_or_default(&config_path)
        .map_err(|e| format!("Failed to load config {}: {}", config_path.display(), e))?;
    if let Some(url) = &args.server_url {
        config.server_url = url.clone();
    }

    match args.command {
        Command::Service { action } => run_service(&config, action.into()),
        Command::Config { action } => run_config(&config_path, config, action),
        command => {
            let api = ApiClient::new(&config.server_url)?;
            run_dashboard_command(&api, command).await
        }
    }
}

async fn run_dashboard_command(
    api: &dyn DashboardApi,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    let mut page = Page::new(Panel::Gpu);
    let (id, rendered) = match command {
        Command::GpuInfo => {
            let (target, _) = page.target(ContainerId::GpuInfo);
            (ContainerId::GpuInfo, handlers::load_gpu_info(api, target).await)
        }
        Command::Analyze {
            model,
            custom_model,
            all_options,
        } => {
            let model = handlers::selected_model(&model, custom_model.as_deref().unwrap_or(""));
            let (target, notes) = page.target(ContainerId::AnalysisResult);
            let analysis = handlers::analyze_model(api, model, target, notes).await;
            if all_options {
                if let Some(analysis) = &analysis {
                    let best = analysis.best_recommendation.level.as_str();
                    handlers::append_more_options(api, model, Some(best), target, notes).await;
                }
            }
            (ContainerId::AnalysisResult, analysis.is_some())
        }
        Command::Popular => {
            let (target, notes) = page.target(ContainerId::PopularModels);
            handlers::analyze_popular_models(api, target, notes).await;
            (ContainerId::PopularModels, true)
        }
        Command::Quantize { model, level } => {
            let (target, notes) = page.target(ContainerId::QuantizeResult);
            handlers::start_quantization(api, &model, &level, target, notes).await;
            (ContainerId::QuantizeResult, true)
        }
        Command::Options { model } => {
            let (target, notes) = page.target(ContainerId::AnalysisResult);
            handlers::append_more_options(api, &model, None, target, notes).await;
            (ContainerId::AnalysisResult, true)
        }
        Command::Quantized => {
            let (target, _) = page.target(ContainerId::QuantizedModels);
            let ok = handlers::load_quantized_models(api, target).await;
            (ContainerId::QuantizedModels, ok)
        }
        Command::Models => {
            let (target, notes) = page.target(ContainerId::ModelList);
            handlers::load_model_list(api, target, notes).await;
            (ContainerId::ModelList, true)
        }
        Command::Loaded => {
            let (target, _) = page.target(ContainerId::LoadedModels);
            let ok = handlers::load_loaded_models(api, target).await;
            (ContainerId::LoadedModels, ok)
        }
        Command::Load { model } => {
            let (target, notes) = page.target(ContainerId::ModelAction);
            handlers::load_model_into_memory(api, &model, target, notes).await;
            (ContainerId::ModelAction, true)
        }
        Command::Unload { model } => {
            let (target, notes) = page.target(ContainerId::ModelAction);
            handlers::unload_model_from_memory(api, &model, target, notes).await;
            (ContainerId::ModelAction, true)
        }
        Command::Health => {
            let (target, _) = page.target(ContainerId::ServerStatus);
            let outcome = handlers::check_health(api, target).await;
            if outcome == handlers::HealthCheck::Unreachable {
                pretty::print_unreachable_hint(api.base_url());
            }
            (ContainerId::ServerStatus, outcome == handlers::HealthCheck::Healthy)
        }
        Command::Dashboard {
            panel,
            switch_to,
            model,
            out,
        } => return render_dashboard(api, panel, switch_to, model, out.as_deref()).await,
        Command::Service { .. } | Command::Config { .. } => {
            unreachable!("handled before the client is built")
        }
    };

    let container = page.container(id);
    if !container.is_empty() {
        println!("{}", container.html());
    }
    print_notifications(&page.notifications);

    if !rendered || page.notifications.has_errors() {
        return Err(Box::from(format!("{} could not be loaded", id)));
    }
    Ok(())
}

/// Runs the initial panel load, each requested tab switch and an optional
/// analysis, then writes the whole page.
async fn render_dashboard(
    api: &dyn DashboardApi,
    panel: Panel,
    switch_to: Vec<Panel>,
    model: Option<String>,
    out: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut page = Page::new(panel);
    let mut loads = PanelLoads::with_parent(shutdown.clone());

    {
        let (target, _) = page.target(ContainerId::ServerStatus);
        if handlers::check_health(api, target).await == handlers::HealthCheck::Unreachable {
            pretty::print_unreachable_hint(api.base_url());
        }
    }

    if let Some(action) = page.tabs.initial_load() {
        let token = loads.begin(panel);
        unless_cancelled(&token, handlers::run_load_action(api, action, &mut page)).await;
    }

    for next in switch_to {
        if let Some(action) = page.tabs.switch_tab(next, ActiveElement::tab_button(next)) {
            let token = loads.begin(next);
            unless_cancelled(&token, handlers::run_load_action(api, action, &mut page)).await;
        }
    }

    if let Some(model) = model {
        let token = loads.begin(Panel::Analyze);
        let (target, notes) = page.target(ContainerId::AnalysisResult);
        unless_cancelled(&token, handlers::analyze_model(api, &model, target, notes)).await;
    }

    if shutdown.is_cancelled() {
        print_cmd_info!("Interrupted, writing what was loaded so far");
    }
    loads.cancel_all();
    print_notifications(&page.notifications);

    let now = Instant::now();
    page.notifications.prune(now);
    let html = page.render_document(api.base_url(), now);
    match out {
        Some(path) => {
            std::fs::write(path, html)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            print_cmd_success!(format!("Dashboard written to {}", path.display()));
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn print_notifications(notes: &Notifications) {
    if notes.is_empty() {
        return;
    }
    log::debug!("{} notification(s) raised", notes.len());
    for note in notes.all() {
        match note.severity {
            Severity::Error => {
                print_cmd_error!(note.msg);
            }
            Severity::Success => {
                print_cmd_success!(note.msg);
            }
            Severity::Info => {
                print_cmd_info!(note.msg);
            }
        }
    }
}

fn run_service(config: &Config, action: ServiceAction) -> Result<(), Box<dyn Error>> {
    log::debug!(
        "Service {} via {}",
        config.service.name,
        config.service.nssm_path
    );
    let manager = ServiceManager::new(SystemRunner, config.service.clone());
    match manager.run(action) {
        Ok(message) => {
            print_cmd_success!(message);
            Ok(())
        }
        Err(e) => {
            print_cmd_error!(format!("Service {} failed", action), "{}", e);
            Err(e.into())
        }
    }
}

fn run_config(
    config_path: &Path,
    config: Config,
    action: ConfigCommand,
) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                return Err(Box::from(format!(
                    "{} already exists. Use --force to replace it.",
                    config_path.display()
                )));
            }
            config
                .save(config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!(format!("Config written to {}", config_path.display()));
            Ok(())
        }
        ConfigCommand::SetServerUrl { url } => {
            let mut stored = Config::load_or_default(config_path)?;
            stored.server_url = url;
            stored
                .save(config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!(format!("Server URL set to {}", stored.server_url));
            Ok(())
        }
    }
}
