//! SCORM launch bridge CLI.
//!
//! # Usage
//!
//! ```bash
//! # Checksum an LMS would attach to a launch
//! scorm-bridge checksum --package-id pkg-1 --student-id 42 --student-name "Jane Doe"
//!
//! # Verify a checksum received with a launch request
//! scorm-bridge verify --package-id pkg-1 --student-id 42 --student-name "Jane Doe" \
//!     --checksum ZsiiiWnOWe/kp8dKf1ktfPDghS4=
//!
//! # Replay content events through a full launch
//! scorm-bridge dry-run --launch-url https://lms.example/launch --package-id pkg-1 \
//!     --student-id 42 --student-name "Jane Doe" --events events.jsonl
//! ```

use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use scorm_bridge_cli::{CliError, DryRunOptions, SystemEnv, commands, read_events, run_dry_run};
use scorm_bridge_core::{BridgeConfig, OriginPolicy, RetryPolicy};
use scorm_bridge_proto::DEFAULT_FRAME_NAME;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// SCORM launch bridge tooling
#[derive(Parser, Debug)]
#[command(name = "scorm-bridge")]
#[command(about = "SCORM 1.2 launch bridge: checksums, launch forms and dry runs")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the launch checksum for a learner
    Checksum(IdentityArgs),

    /// Exit successfully only if the checksum matches
    Verify {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Checksum received with the launch
        #[arg(long)]
        checksum: String,
    },

    /// Print the launch frame and auto-submitting form
    Form {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Launch against an in-process host API and replay content events
    DryRun {
        #[command(flatten)]
        launch: LaunchArgs,

        #[command(flatten)]
        identity: IdentityArgs,

        /// JSON lines file of events to replay
        #[arg(long)]
        events: Option<PathBuf>,

        /// Make LMSInitialize fail
        #[arg(long)]
        init_fails: bool,
    },
}

#[derive(Args, Debug)]
struct IdentityArgs {
    /// Content package ID (the checksum key)
    #[arg(long)]
    package_id: String,

    /// Learner ID
    #[arg(long)]
    student_id: String,

    /// Learner display name
    #[arg(long)]
    student_name: String,
}

#[derive(Args, Debug)]
struct LaunchArgs {
    /// URL the launch form posts to
    #[arg(long)]
    launch_url: String,

    /// Page inside the package
    #[arg(long)]
    page_id: Option<String>,

    /// Name of the content frame
    #[arg(long, default_value = DEFAULT_FRAME_NAME)]
    frame_name: String,

    /// Accept messages only from the launch URL's exact origin
    #[arg(long)]
    exact_origin: bool,

    /// Locate attempts before giving up
    #[arg(long, default_value_t = RetryPolicy::default().max_attempts)]
    max_attempts: u32,

    /// Delay between locate attempts, in milliseconds
    #[arg(long, default_value_t = RetryPolicy::default().interval_ms)]
    retry_interval_ms: u64,
}

impl LaunchArgs {
    fn config(&self, package_id: &str) -> BridgeConfig {
        let policy =
            if self.exact_origin { OriginPolicy::ExactOrigin } else { OriginPolicy::Prefix };

        BridgeConfig {
            launch_url: self.launch_url.clone(),
            package_id: package_id.to_string(),
            page_id: self.page_id.clone(),
            frame_name: self.frame_name.clone(),
            origin_policy: policy,
            locator: RetryPolicy {
                max_attempts: self.max_attempts,
                interval_ms: self.retry_interval_ms,
            },
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // Output goes to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match run(cli.command).await {
        Ok(output) => write!(std::io::stdout().lock(), "{output}").map_err(CliError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            let _ = writeln!(std::io::stderr().lock(), "error: {e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(command: Command) -> Result<String, CliError> {
    let output = match command {
        Command::Checksum(id) => {
            let checksum = commands::checksum(&id.package_id, &id.student_id, &id.student_name)?;
            format!("{checksum}\n")
        },
        Command::Verify { identity: id, checksum } => {
            commands::verify(&id.package_id, &id.student_id, &id.student_name, &checksum)?;
            "ok\n".to_string()
        },
        Command::Form { launch, identity: id } => {
            let config = launch.config(&id.package_id);
            commands::render_form(&config, &id.student_id, &id.student_name)?
        },
        Command::DryRun { launch, identity: id, events, init_fails } => {
            let events = match events {
                Some(path) => read_events(&path)?,
                None => Vec::new(),
            };
            let options = DryRunOptions {
                config: launch.config(&id.package_id),
                student_id: id.student_id,
                student_name: id.student_name,
                init_fails,
            };

            tracing::info!(launch_url = %options.config.launch_url, "starting dry run");
            run_dry_run(SystemEnv::new(), &options, events).await?.to_string()
        },
    };

    Ok(output)
}
