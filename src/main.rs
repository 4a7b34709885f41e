use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use coveralls_submit::cli;
use coveralls_submit::config::{Config, COVERALLS_JOBS_URL};
use coveralls_submit::git::ProcessEnv;
use coveralls_submit::upload::UreqTransport;
use coveralls_submit::vcs::GitCli;

/// coveralls-submit — Convert coverage reports to the Coveralls job format and upload them.
#[derive(Parser)]
#[command(name = "coveralls-submit", version, about)]
struct Cli {
    /// CI job identifier sent as `service_job_id`.
    #[arg(long, global = true, env = "COVERALLS_SERVICE_JOB_ID", default_value = "")]
    service_job_id: String,

    /// CI service name sent as `service_name`.
    #[arg(
        long,
        global = true,
        env = "COVERALLS_SERVICE_NAME",
        default_value = "coveralls-submit"
    )]
    service_name: String,

    /// Repository token sent as `repo_token`.
    #[arg(
        long,
        global = true,
        env = "COVERALLS_REPO_TOKEN",
        default_value = "",
        hide_env_values = true
    )]
    repo_token: String,

    /// Directory under which the payload is written (in a `tmp` subdirectory).
    #[arg(long, global = true, env = "COVERALLS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Jobs API URL.
    #[arg(long, global = true, env = "COVERALLS_ENDPOINT", default_value = COVERALLS_JOBS_URL)]
    endpoint: String,

    /// Run git commands in this directory instead of the current one.
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a coverage report and upload it.
    Submit {
        /// Path to the coverage report JSON.
        report: PathBuf,
    },

    /// Convert a coverage report and print the path of the payload file.
    Convert {
        /// Path to the coverage report JSON.
        report: PathBuf,
    },

    /// Upload an already converted payload file.
    Upload {
        /// Path to the payload JSON.
        payload: PathBuf,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            service_job_id: self.service_job_id.clone(),
            service_name: self.service_name.clone(),
            repo_token: self.repo_token.clone(),
            output_dir: self.output_dir.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    fn vcs(&self) -> GitCli {
        match self.repo {
            Some(ref dir) => GitCli::in_dir(dir),
            None => GitCli::new(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let out = match cli.command {
        Commands::Submit { ref report } => cli::cmd_submit(
            report,
            &config,
            &cli.vcs(),
            &ProcessEnv,
            &UreqTransport::new(),
        )?,
        Commands::Convert { ref report } => {
            cli::cmd_convert(report, &config, &cli.vcs(), &ProcessEnv)?
        }
        Commands::Upload { ref payload } => {
            cli::cmd_upload(payload, &config, &UreqTransport::new())?
        }
    };
    print!("{out}");
    Ok(())
}
