//! skiff CLI
//!
//! Runs a command on a remote host or copies files and directory trees to
//! and from it over SSH.

use std::io::Read;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;

use skiff_exec::params::SshParams;

mod ops;
mod output;
mod vault;

#[derive(Parser)]
#[command(name = "skiff")]
#[command(about = "Remote command execution and secure copy over SSH", long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Remote host name or address
    #[arg(long)]
    host: String,

    /// SSH port (default 22)
    #[arg(long)]
    port: Option<u16>,

    /// Remote username
    #[arg(long)]
    user: String,

    /// Password; required unless a private key is given
    #[arg(long, env = "SKIFF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Private key: literal PEM material or a path to a key file
    #[arg(long, env = "SKIFF_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Passphrase for the private key
    #[arg(long, env = "SKIFF_KEY_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,
}

impl ConnectionArgs {
    fn into_params(self) -> SshParams {
        SshParams {
            hostname: self.host,
            port: self.port,
            username: self.user,
            password: self.password,
            private_key: self.private_key,
            private_key_passphrase: self.passphrase,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a command on the remote host and print its stdout
    Exec {
        /// Command line to run remotely
        command: String,

        /// Also fail on any non-zero exit code
        #[arg(long)]
        strict: bool,
    },
    /// Copy a local file or directory tree to the remote host
    Upload {
        local_path: String,

        /// Remote destination; an existing directory receives the source
        /// under its own name
        remote_path: Option<String>,
    },
    /// Copy a remote file or directory tree to the local filesystem
    Download {
        remote_path: String,

        /// Local destination, defaults to the current directory
        local_path: Option<String>,
    },
    /// Upload secret content read from stdin as a file on the remote host
    UploadSecret {
        /// Remote destination
        remote_path: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let params = cli.connection.into_params();

    match cli.command {
        Commands::Exec { command, strict } => {
            let stdout = ops::execute_command(&params, &command, strict).await?;
            print!("{stdout}");
        }
        Commands::Upload {
            local_path,
            remote_path,
        } => {
            let receipt =
                ops::secure_copy_to_remote_host(&params, &local_path, remote_path.as_deref())
                    .await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Commands::Download {
            remote_path,
            local_path,
        } => {
            let receipt =
                ops::secure_copy_from_remote_host(&params, &remote_path, local_path.as_deref())
                    .await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Commands::UploadSecret { remote_path } => {
            let mut secret = String::new();
            std::io::stdin().read_to_string(&mut secret)?;
            let receipt = ops::secure_copy_from_vault_to_remote_host(
                &params,
                &secret,
                remote_path.as_deref(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
    }

    Ok(())
}
