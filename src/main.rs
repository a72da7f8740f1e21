use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use osm_fixtures::{
    ClosureFetcher, EntityRef, FetchError, FetchSettings, Kind, OsmClient, SettingsError,
};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Download an OSM entity and its references as XML fixtures",
    long_about = None
)]
struct Cli {
    /// Entity kind: node, way or relation
    #[arg(value_name = "KIND")]
    kind: Kind,

    /// Entity identifier
    #[arg(value_name = "IDENTIFIER")]
    identifier: u64,

    /// JSON settings file; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory the records are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Base URL of the API server
    #[arg(long, env = "OSM_API_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Only fetch the requested entity
    #[arg(long)]
    no_recursive: bool,

    /// Also follow relation members
    #[arg(long)]
    follow_members: bool,

    /// Fail on error responses instead of storing their body
    #[arg(long)]
    strict: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl Cli {
    fn settings(&self) -> Result<FetchSettings, SettingsError> {
        let mut settings = match &self.config {
            Some(path) => FetchSettings::from_json_file(path)?,
            None => FetchSettings::default(),
        };
        if let Some(output_dir) = &self.output_dir {
            settings.output_dir = output_dir.clone();
        }
        if let Some(base_url) = &self.base_url {
            settings.base_url = base_url.clone();
        }
        if self.no_recursive {
            settings.recursive = false;
        }
        if self.follow_members {
            settings.follow_members = true;
        }
        if self.strict {
            settings.reject_error_status = true;
        }
        if self.timeout.is_some() {
            settings.timeout_secs = self.timeout;
        }
        Ok(settings)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let settings = cli.settings()?;
    let root = EntityRef::new(cli.kind, cli.identifier);
    info!(
        %root,
        output_dir = %settings.output_dir.display(),
        base_url = %settings.base_url,
        "fetching"
    );

    let client = OsmClient::from_settings(&settings);
    let fetcher = ClosureFetcher::from_settings(client, &settings);
    let report = fetcher.fetch(root, settings.recursive)?;

    let errors = report.error_responses().count();
    if errors > 0 {
        info!(errors, "some records hold error responses");
    }
    Ok(())
}
