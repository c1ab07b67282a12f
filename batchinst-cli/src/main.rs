mod args;
mod download;
mod handler;
mod installer;
mod menu;
mod runner;
mod session;
mod uninstaller;
mod utils;

#[cfg(test)]
mod test_utils;

use std::io::{BufRead, Write};

use args::*;

use batchinst_common::{AppConfig, InstallLog};
use clap::{error::ErrorKind, CommandFactory, Parser};
use color_eyre::Result;
use download::{Download, HttpDownloader};
use session::Session;

fn main() -> Result<()> {
    install_tracing();
    color_eyre::install()?;
    let args = Args::parse();

    if args.auto && args.action.is_some() {
        Args::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--auto cannot be combined with a subcommand",
            )
            .exit();
    }

    let config = AppConfig::load(&args.config)?;
    let log = InstallLog::new(&args.log_file);
    let session = Session::new(
        config,
        log,
        HttpDownloader::new(&args.download_dir),
        args.purge,
    );

    let mode = if args.auto {
        Mode::Auto
    } else {
        args.action.map_or(Mode::Interactive, Mode::Action)
    };
    run(
        mode,
        args.format,
        &session,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout().lock(),
    )
}

#[derive(Debug)]
enum Mode {
    Auto,
    Interactive,
    Action(Action),
}

fn run<D: Download>(
    mode: Mode,
    format: Format,
    session: &Session<D>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match mode {
        Mode::Auto => {
            tracing::info!("auto-install mode activated");
            session.installer.install_all(&session.config)?;
            Ok(())
        }
        Mode::Interactive => menu::run(session, input, out),
        Mode::Action(action) => handle(action, format, session),
    }
}

fn handle<D: Download>(action: Action, format: Format, session: &Session<D>) -> Result<()> {
    match action {
        Action::List => handler::apps::list(&session.config, format),
        Action::Installed => handler::installed::list(&session.log, format),
        Action::Install { number } => handler::apps::install(session, number),
        Action::Uninstall { name } => handler::installed::uninstall(session, &name),
    }
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}
