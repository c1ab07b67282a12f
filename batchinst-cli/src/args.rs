use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Download and install the applications listed in a config file
#[derive(Parser)]
#[command(version)]
pub(crate) struct Args {
    /// install all configured applications without prompting
    #[arg(long)]
    pub(crate) auto: bool,

    /// application list, one `name;url;command[;uninstall]` entry per line
    #[arg(
        short,
        long,
        env = "BATCHINST_CONFIG",
        default_value = "installer_config.txt"
    )]
    pub(crate) config: PathBuf,

    /// log of installed applications
    #[arg(short, long, env = "BATCHINST_LOG", default_value = "install_log.txt")]
    pub(crate) log_file: PathBuf,

    /// directory installers are downloaded to
    #[arg(short, long, env = "BATCHINST_DOWNLOADS", default_value = "downloads")]
    pub(crate) download_dir: PathBuf,

    /// delete the downloaded installer after a successful uninstall
    #[arg(long)]
    pub(crate) purge: bool,

    #[arg(value_enum, short, long, global = true, default_value_t = Format::Table)]
    pub(crate) format: Format,

    #[command(subcommand)]
    pub(crate) action: Option<Action>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Format {
    Table,
    Json,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// List configured applications
    List,
    /// List installed applications
    Installed,
    /// Install a single application
    Install {
        /// number of the application as shown by `list`
        number: usize,
    },
    /// Uninstall an application
    Uninstall {
        /// name of the application as shown by `installed`
        name: String,
    },
}
