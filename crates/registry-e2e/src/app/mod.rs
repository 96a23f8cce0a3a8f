#![expect(clippy::print_stdout, reason = "CLI output is emitted here")]
#![expect(clippy::print_stderr, reason = "CLI output is emitted here")]

//! CLI application layer and composition root wiring.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;
use tracing::debug;
use tracing::info;

pub mod commands;
pub mod error;

use crate::adapters::Presenter;
use crate::adapters::StubToolServer;
use crate::adapters::ToolServerSystem;
use crate::adapters::create_presenter;
use crate::app::commands::CatalogueArgs;
use crate::app::commands::Cli;
use crate::app::commands::Commands;
use crate::app::commands::RunArgs;
use crate::app::error::AppError;
use crate::app::error::exit_code_for_report;
use crate::app::error::exit_codes;
use crate::common::color_init;
use crate::common::telemetry;
use crate::common::telemetry::LogSettings;
use crate::domain::CaseFilter;
use crate::domain::Catalogue;
use crate::domain::QueryCategory;
use crate::infra::HarnessConfig;
use crate::infra::StubRegistry;
use crate::infra::ipc::IpcTransport;
use crate::infra::ipc::RpcClientConfig;
use crate::infra::ipc::StdioTransport;
use crate::infra::ipc::TcpTransport;
use crate::usecases::AbortHandle;
use crate::usecases::RunSuiteUseCase;
use crate::usecases::RunSuiteUseCaseImpl;
use crate::usecases::ports::SystemUnderTestHandle;

const PROGRAM_NAME: &str = "registry-e2e";

/// Where the cases of a run are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Stub,
    Server(String),
    Tcp(String),
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Stub => f.write_str("stub registry"),
            Target::Server(command) => write!(f, "stdio:{}", command),
            Target::Tcp(addr) => write!(f, "tcp:{}", addr),
        }
    }
}

impl Target {
    /// Explicit flags win; otherwise the environment, otherwise the stub.
    fn resolve(args: &RunArgs, config: &HarnessConfig) -> Target {
        if args.stub {
            Target::Stub
        } else if let Some(command) = &args.server {
            Target::Server(command.clone())
        } else if let Some(addr) = &args.tcp {
            Target::Tcp(addr.clone())
        } else if let Some(command) = config.server_command() {
            Target::Server(command.to_string())
        } else if let Some(addr) = config.tcp_addr() {
            Target::Tcp(addr.to_string())
        } else {
            Target::Stub
        }
    }
}

pub struct Application;

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Application {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self) -> Result<i32> {
        let cli = match Cli::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = if err.use_stderr() {
                    exit_codes::USAGE
                } else {
                    exit_codes::SUCCESS
                };
                err.print().context("failed to print usage")?;
                return Ok(code);
            }
        };

        let _telemetry = telemetry::init_tracing(&LogSettings::from_env(cli.verbose));
        color_init(cli.no_color);
        let format = cli.effective_format();
        debug!(command = ?cli.command, format = ?format, "CLI command parsed");

        let presenter = create_presenter(format);
        match self.execute(&cli, presenter.as_ref()) {
            Ok(code) => Ok(code),
            Err(err) => {
                presenter.present_error(&format!("{:#}", err));
                Ok(exit_code_for_error(&err))
            }
        }
    }

    fn execute(&self, cli: &Cli, presenter: &dyn Presenter) -> Result<i32> {
        match &cli.command {
            Commands::Run(args) => self.handle_run(args, presenter),
            Commands::List { source, groups } => {
                let catalogue = load_catalogue(source)?;
                let filter = CaseFilter {
                    groups: groups.clone(),
                    cases: Vec::new(),
                };
                presenter.present_catalogue(&catalogue.select(&filter));
                Ok(exit_codes::SUCCESS)
            }
            Commands::Export { source } => {
                let catalogue = load_catalogue(source)?;
                let value = catalogue.to_json_value().map_err(AppError::from)?;
                let json =
                    serde_json::to_string_pretty(&value).context("failed to encode catalogue")?;
                println!("{}", json);
                Ok(exit_codes::SUCCESS)
            }
            Commands::ServeStub => {
                let stdin = io::stdin();
                let stdout = io::stdout();
                StubToolServer::new()
                    .serve(stdin.lock(), stdout.lock())
                    .context("stub tool server I/O failed")?;
                Ok(exit_codes::SUCCESS)
            }
            Commands::Completions { shell } => {
                let mut cmd = Cli::command();
                generate(*shell, &mut cmd, PROGRAM_NAME, &mut io::stdout());
                Ok(exit_codes::SUCCESS)
            }
        }
    }

    fn handle_run(&self, args: &RunArgs, presenter: &dyn Presenter) -> Result<i32> {
        let mut config = HarnessConfig::from_env();
        if let Some(secs) = args.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if args.strict {
            config = config.with_strict(true);
        }
        if args.parallel {
            config = config.with_parallel(true);
        }

        let catalogue = load_catalogue(&args.source)?;
        let catalogue = select_cases(&catalogue, &args.groups, &args.cases)?;

        let target = Target::resolve(args, &config);
        let system = connect_system(&target, &config)
            .map_err(AppError::from)
            .with_context(|| format!("failed to reach system under test {}", target))?;
        info!(
            system = system.name(),
            cases = catalogue.case_count(),
            "Running catalogue"
        );

        let abort = AbortHandle::new();
        #[cfg(unix)]
        let _signals = crate::infra::signal_handler::SignalHandler::setup(&abort)
            .map_err(AppError::Signal)?;

        let use_case = RunSuiteUseCaseImpl::new(system);
        let report = use_case.execute(&catalogue, &config.run_options(abort.clone()));
        presenter.present_report(&report);

        let interrupted = abort.is_aborted();
        if interrupted {
            presenter.present_info("Interrupted; partial report above");
        }
        Ok(exit_code_for_report(&report, interrupted))
    }
}

fn load_catalogue(source: &CatalogueArgs) -> Result<Catalogue> {
    let catalogue = match source.catalogue.as_deref() {
        Some(path) => load_catalogue_file(path)?,
        None => Catalogue::builtin().clone(),
    };
    Ok(catalogue)
}

fn load_catalogue_file(path: &Path) -> Result<Catalogue> {
    Catalogue::from_json_file(path)
        .map_err(AppError::from)
        .with_context(|| format!("failed to load catalogue {}", path.display()))
}

fn select_cases(
    catalogue: &Catalogue,
    groups: &[QueryCategory],
    cases: &[String],
) -> Result<Catalogue, AppError> {
    let filter = CaseFilter {
        groups: groups.to_vec(),
        cases: cases.to_vec(),
    };
    let selected = catalogue.select(&filter);
    if selected.case_count() == 0 {
        return Err(AppError::EmptySelection);
    }
    Ok(selected)
}

fn connect_system(
    target: &Target,
    config: &HarnessConfig,
) -> Result<SystemUnderTestHandle, crate::infra::ipc::ClientError> {
    let rpc_config = rpc_config(config);
    let transport: Box<dyn IpcTransport> = match target {
        Target::Stub => return Ok(Arc::new(StubRegistry::new())),
        Target::Server(command) => Box::new(StdioTransport::parse(command)?),
        Target::Tcp(addr) => {
            Box::new(TcpTransport::new(addr.clone()).with_connect_timeout(config.timeout()))
        }
    };
    let system = ToolServerSystem::connect(transport.as_ref(), rpc_config)?;
    Ok(Arc::new(system))
}

/// Every socket operation is bounded by the per-case timeout.
fn rpc_config(config: &HarnessConfig) -> RpcClientConfig {
    RpcClientConfig::default()
        .with_read_timeout(config.timeout())
        .with_write_timeout(config.timeout())
}

fn find_error<T: std::error::Error + 'static>(error: &anyhow::Error) -> Option<&T> {
    error.chain().find_map(|source| source.downcast_ref::<T>())
}

fn exit_code_for_error(error: &anyhow::Error) -> i32 {
    match find_error::<AppError>(error) {
        Some(app_error) => app_error.exit_code(),
        None => exit_codes::CASES_FAILED,
    }
}
