//! Questionnaire binary entry point

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use questionnaire::{
    cli::{self, Cli, Commands},
    config::Config,
    form_tui::App,
    submit::SubmitFormat,
};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "questionnaire=info");
    }

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    init_logging(&config, cli.cli);

    info!("Starting questionnaire...");

    // Handle CLI mode - print output and exit without TUI
    if cli.cli {
        if let Some(command) = cli.command {
            return handle_cli_command(command, &config);
        } else {
            eprintln!("Error: CLI mode requires a command");
            std::process::exit(1);
        }
    }

    if let Some(command) = &cli.command {
        command.check_tui_options()?;
    }
    let mut app = App::new(config.clone())?;

    // Replay startup events before taking over the terminal
    if let Some(Commands::Apply { ops, .. }) = &cli.command {
        if let Err(e) = app.replay_startup(ops) {
            error!("Startup events failed: {}", e);
            app.set_error(e.to_string());
        }
    }

    // Setup terminal for TUI mode
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors that occurred during execution
    match result {
        Ok(_) => {
            info!(submissions = app.submissions, "Questionnaire exited successfully");
        }
        Err(e) => {
            error!("Questionnaire encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Log to the configured file; CLI mode also logs to stderr
fn init_logging(config: &Config, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let directory = config
        .log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = config
        .log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("questionnaire.log"));
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

/// Handle CLI mode commands - print output and exit
fn handle_cli_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Apply { ops, format, compact } => {
            let mut sink = config.submit_sink()?;
            let editor = cli::print_applied(
                &ops,
                sink.as_mut(),
                io::stdout(),
                format.unwrap_or(SubmitFormat::Json),
                !compact,
            )
            .context("Failed to apply form events")?;
            info!(events = ops.len(), fields = editor.len(), "Printed form state");
        }
    }

    Ok(())
}
