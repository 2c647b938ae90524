//! Command-line entry point for the ConectaHC client.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use conectahc::cli::{self, CliArgs, CommandStatus};
use conectahc::config::ClientSettings;
use conectahc::domain::ports::FixtureCredentialVerifier;
use conectahc::inbound::state::{AppState, AppStatePorts};
use conectahc::outbound::remote::SimulatedConsultationRemote;
use conectahc::outbound::storage::FileClientStorage;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(CommandStatus::Success) => ExitCode::SUCCESS,
        Ok(CommandStatus::Failure) => ExitCode::FAILURE,
        Err(error) => {
            let mut stderr = io::stderr().lock();
            drop(writeln!(stderr, "conectahc: {error}"));
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> io::Result<CommandStatus> {
    let settings = ClientSettings::load_from_iter([std::ffi::OsString::from("conectahc")])
        .map_err(|error| io::Error::other(format!("load configuration: {error}")))?;
    init_tracing(settings.json_logs);

    let storage_dir = args.storage_dir.unwrap_or_else(|| settings.storage_dir());
    let storage_dir = Utf8PathBuf::from_path_buf(storage_dir).map_err(|path| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("storage directory is not valid UTF-8: {}", path.display()),
        )
    })?;
    let latency = args
        .latency_ms
        .map_or_else(|| settings.latency(), Duration::from_millis);

    let clock = Arc::new(DefaultClock);
    let storage = Arc::new(
        FileClientStorage::open(&storage_dir, clock.clone())
            .map_err(|error| io::Error::other(error.to_string()))?,
    );
    let state = AppState::new(
        AppStatePorts {
            verifier: Arc::new(FixtureCredentialVerifier),
            profiles: storage.clone(),
            cookies: storage,
            remote: Arc::new(SimulatedConsultationRemote::new(latency)),
        },
        clock,
    );

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    let mut stdout = io::stdout().lock();
    runtime.block_on(cli::run(&state, args.command, &mut stdout))
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
