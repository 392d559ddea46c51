//! QA Assistant CLI - generate test cases and bug reports with an LLM

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use qa_assistant::ai::{
    profile, CompletionProvider, DirectProvider, GenerationParams, RelayProvider,
};
use qa_assistant::config::{AppConfig, BackendMode, ConfigSource, Settings};
use qa_assistant::credentials::{CredentialStore, KeyringStore};
use qa_assistant::generator::generate;
use qa_assistant::prompt::TaskKind;

#[derive(Parser)]
#[command(
    name = "qa-assistant",
    version,
    about = "AI-assisted test case and bug report generator"
)]
struct Cli {
    /// URL or path of the configuration document (overrides settings)
    #[arg(long, global = true, value_name = "URL|PATH")]
    config: Option<String>,
    /// Route this call through the relay script backend
    #[arg(long, global = true)]
    relay: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the API key used by the direct provider backend
    SetKey { key: String },
    /// Save the relay script identifier
    SetScriptId { id: String },
    /// Generate test cases from a feature description
    Testcase { description: String },
    /// Generate a bug report from a problem description
    Bugreport { description: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = Settings::load()?;
    let client = reqwest::Client::new();
    let source = config_source(&settings, cli.config.as_deref());

    match cli.command {
        Command::SetKey { key } => {
            // Validation depends on the active provider, which the
            // configuration document decides
            let config = AppConfig::fetch(&client, source.as_ref()).await;
            let mut store = CredentialStore::api_key(
                Box::new(KeyringStore::new()),
                config.api.default_provider.clone(),
            );
            store.save(key.trim())?;
            println!("API key saved");
        }
        Command::SetScriptId { id } => {
            let mut store = CredentialStore::relay_script(Box::new(KeyringStore::new()));
            store.save(id.trim())?;
            println!("Relay script id saved");
        }
        Command::Testcase { description } => {
            run_generation(
                &client,
                &settings,
                source.as_ref(),
                cli.relay,
                TaskKind::TestCase,
                &description,
            )
            .await?;
        }
        Command::Bugreport { description } => {
            run_generation(
                &client,
                &settings,
                source.as_ref(),
                cli.relay,
                TaskKind::BugReport,
                &description,
            )
            .await?;
        }
    }

    Ok(())
}

async fn run_generation(
    client: &reqwest::Client,
    settings: &Settings,
    source: Option<&ConfigSource>,
    force_relay: bool,
    task: TaskKind,
    description: &str,
) -> Result<()> {
    let config = AppConfig::fetch(client, source).await;

    let provider = build_provider(settings, &config, force_relay)?;
    let text = generate(&config, provider.as_ref(), task, description).await?;
    println!("{text}");
    Ok(())
}

fn build_provider(
    settings: &Settings,
    config: &AppConfig,
    force_relay: bool,
) -> Result<Box<dyn CompletionProvider>> {
    if force_relay || settings.backend.mode == BackendMode::Relay {
        let mut store = CredentialStore::relay_script(Box::new(KeyringStore::new()));
        store.load()?;
        return Ok(Box::new(RelayProvider::new(
            settings.backend.relay_base_url.clone(),
            store.current(),
        )));
    }

    let name = &config.api.default_provider;
    let profile =
        profile(name).with_context(|| format!("unknown provider '{name}' in configuration"))?;
    let mut store = CredentialStore::api_key(Box::new(KeyringStore::new()), name.clone());
    store.load()?;
    Ok(Box::new(DirectProvider::new(
        profile.clone(),
        GenerationParams::from_config(&config.api),
        store.current(),
    )))
}

fn config_source(settings: &Settings, override_raw: Option<&str>) -> Option<ConfigSource> {
    if let Some(raw) = override_raw {
        return Some(ConfigSource::parse(raw));
    }
    if let Some(url) = &settings.document.url {
        return Some(ConfigSource::Url(url.clone()));
    }
    settings
        .document
        .path
        .as_ref()
        .map(|path| ConfigSource::File(path.clone()))
}
