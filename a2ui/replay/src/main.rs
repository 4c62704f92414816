//! A2UI Replay - Feed a Message Log Through the Engine
//!
//! Reads a newline-delimited log of server message batches, applies it
//! through the single-writer reducer queue, optionally raises actions and
//! value edits, then prints every surface as a text outline followed by the
//! messages that would have been sent back to the producer.
//!
//! # Usage
//!
//! ```bash
//! # Replay a log
//! a2ui-replay session.jsonl
//!
//! # Edit a value, then click a button
//! a2ui-replay session.jsonl --set 's1:/passengers=2' --action s1:search:search-flights
//!
//! # Forward actions without the data-model snapshot
//! a2ui-replay session.jsonl --no-attach
//!
//! # Verbose logging
//! RUST_LOG=a2ui_core=debug a2ui-replay session.jsonl
//! ```
//!
//! # Log Format
//!
//! One JSON document per line: a single message object or an array of
//! messages forming one batch. Blank lines and lines starting with `#` are
//! skipped.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

use a2ui_core::config::{load_config, load_config_from_path, ConfigOverrides};
use a2ui_core::{
    decode_batch, spawn_reducer, ActionRequest, ClientMessage, Engine, EngineHandle, Inbound,
    Presenter, ServerMessage, SurfaceId, SurfaceView,
};

use render::TextPresenter;

/// A2UI Replay - apply a message log and print the resulting surfaces
#[derive(Parser, Debug)]
#[command(name = "a2ui-replay")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Message log (one batch per line)
    #[arg(value_name = "FILE")]
    log: PathBuf,

    /// Raise an action after replay: SURFACE:COMPONENT:ACTION
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    actions: Vec<String>,

    /// Edit a bound value after replay: SURFACE:PATH=JSON
    #[arg(short = 's', long = "set", value_name = "EDIT")]
    sets: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "A2UI_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Do not attach the data model to forwarded actions
    #[arg(long)]
    no_attach: bool,
}

/// Parse `SURFACE:COMPONENT:ACTION`
fn parse_action(arg: &str) -> Result<ActionRequest> {
    let mut parts = arg.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(surface), Some(component), Some(action))
            if !surface.is_empty() && !component.is_empty() && !action.is_empty() =>
        {
            Ok(ActionRequest::new(surface, component, action))
        }
        _ => Err(anyhow!(
            "Invalid action {arg:?}: expected SURFACE:COMPONENT:ACTION"
        )),
    }
}

/// Parse `SURFACE:PATH=JSON`; a value that is not JSON is taken as a string
fn parse_set(arg: &str) -> Result<Inbound> {
    let (surface, rest) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid value edit {arg:?}: expected SURFACE:PATH=JSON"))?;
    let (path, raw) = rest
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid value edit {arg:?}: missing '='"))?;
    if surface.is_empty() {
        return Err(anyhow!("Invalid value edit {arg:?}: empty surface id"));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok(Inbound::ValueChange {
        surface_id: SurfaceId::new(surface),
        path: path.to_string(),
        value,
    })
}

/// Read the log into batches, skipping lines that do not decode
async fn read_batches(path: &Path) -> Result<Vec<Vec<ServerMessage>>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read message log: {}", path.display()))?;

    let mut batches = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match decode_batch(line) {
            Ok(batch) => batches.push(batch),
            Err(e) => warn!(line = index + 1, error = %e, "Skipping undecodable line"),
        }
    }
    Ok(batches)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("a2ui_replay=info".parse()?)
                .add_directive("a2ui_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone()))
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };
    let mut overrides = ConfigOverrides::new();
    if args.no_attach {
        overrides = overrides.with_attach_data_model(false);
    }
    overrides.apply(&mut config);
    info!(
        source = %config.source(),
        attach_data_model = config.attach_data_model,
        "Configuration loaded"
    );

    let requests = args
        .actions
        .iter()
        .map(|arg| parse_action(arg).map(Inbound::Action))
        .collect::<Result<Vec<_>>>()?;
    let edits = args
        .sets
        .iter()
        .map(|arg| parse_set(arg))
        .collect::<Result<Vec<_>>>()?;

    let batches = read_batches(&args.log).await?;
    info!(batches = batches.len(), path = %args.log.display(), "Replaying message log");

    let handle = EngineHandle::new(Engine::new(config));
    let (tx, out_rx, reducer) = spawn_reducer(handle.clone());
    let collector = tokio::spawn(collect(out_rx));

    for batch in batches {
        tx.send(Inbound::Batch(batch))
            .await
            .context("Reducer queue closed")?;
    }
    for inbound in edits.into_iter().chain(requests) {
        tx.send(inbound).await.context("Reducer queue closed")?;
    }
    drop(tx);

    reducer.await.context("Reducer task failed")?;
    let forwarded = collector.await.context("Collector task failed")?;

    let engine = handle.read();
    let registry = engine.registry();
    let mut presenter = TextPresenter::new();
    for id in registry.ids() {
        if let Some(surface) = registry.get(id.as_str()) {
            presenter.present(&SurfaceView::new(surface));
        }
    }
    print!("{}", presenter.finish());

    if let Some(active) = registry.active_id() {
        println!("active: {active}");
    }

    for entry in engine.chat().entries() {
        println!("chat [{:?}] {}", entry.role, entry.content);
    }

    for message in forwarded {
        println!("-> {}", message.to_json()?);
    }

    Ok(())
}

async fn collect(mut out_rx: mpsc::Receiver<ClientMessage>) -> Vec<ClientMessage> {
    let mut forwarded = Vec::new();
    while let Some(message) = out_rx.recv().await {
        forwarded.push(message);
    }
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_action() {
        let request = parse_action("s1:search:search-flights").unwrap();
        assert_eq!(request, ActionRequest::new("s1", "search", "search-flights"));

        let with_colon = parse_action("s1:card:select:7").unwrap();
        assert_eq!(with_colon.action, "select:7");

        assert!(parse_action("s1:search").is_err());
        assert!(parse_action("::x").is_err());
    }

    #[test]
    fn test_parse_set() {
        let Inbound::ValueChange {
            surface_id,
            path,
            value,
        } = parse_set("s1:/pax=2").unwrap()
        else {
            panic!("expected value change")
        };
        assert_eq!(surface_id.as_str(), "s1");
        assert_eq!(path, "/pax");
        assert_eq!(value, json!(2));

        let Inbound::ValueChange { value, .. } = parse_set("s1:/to=NRT").unwrap() else {
            panic!("expected value change")
        };
        assert_eq!(value, json!("NRT"));

        assert!(parse_set("s1/pax=2").is_err());
        assert!(parse_set("s1:/pax").is_err());
    }

    #[tokio::test]
    async fn test_read_batches_skips_noise() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# recorded session").unwrap();
        writeln!(file, r#"{{"createSurface": {{"surfaceId": "s1"}}}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(
            file,
            r#"[{{"deleteSurface": {{"surfaceId": "s1"}}}}, {{"assistantMessage": "bye"}}]"#
        )
        .unwrap();

        let batches = read_batches(file.path()).await.unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].len(), 2);
    }

    #[tokio::test]
    async fn test_missing_log_is_an_error() {
        let result = read_batches(Path::new("/definitely/not/here.jsonl")).await;
        assert!(result.is_err());
    }
}
