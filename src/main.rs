use clap::Parser;
use termlite::app;
use termlite::cli::Cli;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "termlite=info,termlite_core=info,termlite_gtk4=info";

fn main() -> glib::ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match cli.to_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("termlite: {err}");
            return glib::ExitCode::FAILURE;
        }
    };

    let shell = std::env::var("SHELL").ok();
    let argv = cli.argv(shell.as_deref());
    tracing::debug!(?argv, "starting");

    app::run(config, argv)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
