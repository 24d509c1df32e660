use crate::actions::{Executor, LogSpeaker, SpeakSink};
use crate::agent::{Event, MirrorAgent};
use crate::cli::{Cli, Command};
use crate::config::ConfigStore;
use crate::fetch::{ApiNinjasClient, FinnhubClient, NewsApiClient, OpenWeatherClient};
use crate::modes;
use crate::snapshot::SnapshotBuilder;
use crate::state::{AgentStateHandle, WidgetStateStore};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

/// Speak sink for the CLI: the response goes to stdout, where the user is.
struct StdoutSpeaker;

impl SpeakSink for StdoutSpeaker {
    fn speak(&self, text: &str) {
        println!("{text}");
    }
}

fn config_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.config {
        return Ok(path.clone());
    }
    if let Ok(path) = std::env::var("LOOKINGGLASS_CONFIG") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(ConfigStore::default_path()?)
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let store = Arc::new(ConfigStore::open(config_path(&cli)?)?);
    let widget_state = WidgetStateStore::new();
    let agent_state = AgentStateHandle::new();

    let http = reqwest::Client::new();
    let weather = Arc::new(OpenWeatherClient::new(http.clone(), store.clone()));
    let stocks = Arc::new(FinnhubClient::new(http.clone(), store.clone()));
    let news = Arc::new(NewsApiClient::new(http.clone(), store.clone()));
    let quotes = Arc::new(ApiNinjasClient::new(http, store.clone()));

    let speaker: Arc<dyn SpeakSink> = match cli.command {
        Command::Say { .. } => Arc::new(StdoutSpeaker),
        _ => Arc::new(LogSpeaker),
    };
    let executor = Arc::new(Executor::new(
        store.clone(),
        widget_state,
        agent_state.clone(),
        quotes,
        speaker,
    ));
    let snapshots = Arc::new(SnapshotBuilder::new(
        store.clone(),
        agent_state.clone(),
        weather,
        stocks,
        news,
    ));
    let agent = MirrorAgent::new(agent_state.clone(), executor.clone(), snapshots.clone());

    match cli.command {
        Command::Say { text } => {
            agent.user_spoke(&text).await;
        }
        Command::Wake { source } => {
            agent.handle_event(Event::wake(source)).await;
        }
        Command::Snapshot => {
            let snapshot = snapshots.snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Mode { mode } => {
            let mode = modes::parse_mode(&mode)?;
            let doc = modes::apply_mode(&store, mode)?;
            agent_state.set_mode(mode);
            println!("os mode: {}", doc.os_mode);
        }
        Command::Action { kind, payload } => {
            let payload: Value =
                serde_json::from_str(&payload).context("payload is not valid JSON")?;
            let outcome = executor.execute_raw(&kind, payload).await?;
            println!("{outcome}");
        }
        Command::Config => {
            let doc = store.load()?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}
