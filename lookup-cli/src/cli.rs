use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use lookup_core::{
    Config, HttpRecordSource, LookupController, NewWeatherRecord, RecordSource,
    controller::PLACEHOLDER, render,
};
use tracing::{debug, warn};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Look up stored weather records")]
pub struct Cli {
    /// Base URL of the weather record service; overrides the config file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prompt for IDs and show each record (default).
    Interactive,

    /// Show the weather record stored under an ID.
    Show {
        /// Record identifier, used verbatim.
        id: String,
    },

    /// Store a new weather record and print its ID.
    Submit {
        /// Date of the observation, e.g. "2024-01-01".
        #[arg(long)]
        date: String,

        /// Location name passed to the weather provider.
        #[arg(long)]
        location: String,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Persist the base URL of the weather record service.
    Configure {
        /// e.g. "http://localhost:8000".
        url: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { base_url, command } = self;

        match command.unwrap_or(Command::Interactive) {
            Command::Configure { url } => {
                let config = reconfigure(Config::load(), &url)?;
                let path = config.save()?;
                println!("Saved base URL {} to {}", config.endpoint(), path.display());
                Ok(())
            }
            Command::Interactive => interactive(connect(Config::load(), base_url)?).await,
            Command::Show { id } => show(connect(Config::load(), base_url)?, id).await,
            Command::Submit { date, location, notes } => {
                let source = connect(Config::load(), base_url)?;
                let created = source
                    .create(&NewWeatherRecord { date, location, notes })
                    .await
                    .map_err(|e| anyhow!(e.user_message()))?;
                println!("Created weather record: {}", created.id);
                Ok(())
            }
        }
    }
}

/// Apply a new base URL. A broken config file is replaced rather than fixed.
fn reconfigure(loaded: anyhow::Result<Config>, url: &str) -> anyhow::Result<Config> {
    let mut config = loaded.unwrap_or_else(|err| {
        warn!(error = %format!("{err:#}"), "ignoring unreadable config file");
        Config::default()
    });
    config.set_base_url(url)?;
    Ok(config)
}

/// Build the HTTP source, letting `--base-url` win over the config file.
/// With `--base-url` set, an unreadable config file is not fatal.
fn connect(
    loaded: anyhow::Result<Config>,
    base_url: Option<String>,
) -> anyhow::Result<Arc<HttpRecordSource>> {
    let mut config = match (loaded, &base_url) {
        (Ok(config), _) => config,
        (Err(err), Some(_)) => {
            warn!(error = %format!("{err:#}"), "ignoring unreadable config file");
            Config::default()
        }
        (Err(err), None) => {
            return Err(err.context("Hint: fix or rewrite it with `weather-lookup configure <URL>`"));
        }
    };

    if let Some(url) = base_url {
        config.set_base_url(&url).context("Invalid --base-url")?;
    }

    debug!(endpoint = config.endpoint(), "using weather record service");
    Ok(Arc::new(HttpRecordSource::new(config.endpoint())))
}

async fn show(source: Arc<HttpRecordSource>, id: String) -> anyhow::Result<()> {
    let controller = LookupController::new(source);
    controller.set_lookup_id(id);
    controller.lookup().await;

    let state = controller.state();
    if let Some(err) = &state.error {
        bail!("{err}");
    }

    print_lines(&render::render_state(&state));
    Ok(())
}

/// Lookup form loop: one prompt per attempt until the user cancels.
async fn interactive(source: Arc<HttpRecordSource>) -> anyhow::Result<()> {
    let controller = LookupController::new(source);

    loop {
        let input = match Text::new("Weather ID:")
            .with_placeholder(PLACEHOLDER)
            .with_help_message("Esc to quit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to read weather ID"),
        };

        controller.set_lookup_id(input);

        if !controller.can_submit() {
            println!("{} is disabled until an ID is entered.", controller.trigger_label());
            continue;
        }

        let mut updates = controller.subscribe();
        let lookup = controller.lookup();
        tokio::pin!(lookup);

        loop {
            tokio::select! {
                () = &mut lookup => break,
                Ok(()) = updates.changed() => {
                    if updates.borrow_and_update().loading {
                        println!("{}", controller.trigger_label());
                    }
                }
            }
        }

        print_lines(&render::render_state(&controller.state()));
        println!();
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
