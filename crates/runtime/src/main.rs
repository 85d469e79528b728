//! Headless timeline player.
//!
//! Loads the demo session, plays it for a few seconds against logging media
//! and prints the final snapshot as JSON.
//!
//! Usage: `isound-headless [PRESETS] [--seconds N] [--fast]`

use anyhow::Context;
use isound_core::EditorConfig;
use isound_project::load_library_or_builtin;
use isound_runtime::{Editor, EditorCommand, LoggingMedia, load_demo_tracks};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PLAY_SECONDS: u64 = 3;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let mut presets: Option<PathBuf> = None;
    let mut seconds = DEFAULT_PLAY_SECONDS;
    let mut fast = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" => {
                let value = args.next().context("--seconds needs a value")?;
                seconds = value
                    .parse()
                    .with_context(|| format!("invalid --seconds value '{value}'"))?;
            }
            "--fast" => fast = true,
            _ => presets = Some(PathBuf::from(arg)),
        }
    }

    let config = EditorConfig::load();
    let library = load_library_or_builtin(presets.as_deref())?;

    let (editor, handle) = Editor::new(&config, LoggingMedia::new())?;
    let task = tokio::spawn(editor.run());

    let loader = load_demo_tracks(&handle, &library);
    loader.await.context("demo loader panicked")?;

    if fast {
        handle.send(EditorCommand::ToggleSpeed)?;
    }
    handle.send(EditorCommand::Play)?;
    log::info!("Playing for {seconds}s");
    tokio::time::sleep(Duration::from_secs(seconds)).await;

    handle.shutdown()?;
    let session = task.await.context("editor task panicked")?;
    log::info!("Stopped at {}ms", session.current_time());

    let snapshot = handle.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
