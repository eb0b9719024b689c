mod config;
mod console;
mod script;

use blockspeak_audio::CliSpeechOutput;
use blockspeak_core::{
    spawn_poller, Announcer, Describer, EditorEvent, HelpDialog, ListenerSet, NavigationWatcher,
    PaletteWatcher, SettingsDialog, SpeechOutput,
};
use config::{OutputKind, ScreenReaderConfig};
use console::ConsoleOutput;
use script::{sample_workspace, script, ScriptedHost, Step};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "info,blockspeak_core=info,screen_reader=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(target: "screen_reader", "Starting scripted screen reader session");

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = ScreenReaderConfig::load();

    let output: Arc<dyn SpeechOutput> = match cfg.output {
        OutputKind::Cli => {
            let cli = CliSpeechOutput::new(cfg.tts.clone());
            if cli.is_available() {
                Arc::new(cli)
            } else {
                warn!(target: "screen_reader", "No TTS engine available; printing speech to the console");
                Arc::new(ConsoleOutput::default())
            }
        }
        OutputKind::Console => Arc::new(ConsoleOutput::default()),
    };
    let announcer = Announcer::start(output, cfg.scheduler.clone(), cfg.speech.clone());

    let describer = Arc::new(Describer::new(Arc::new(sample_workspace())));
    let host = Arc::new(ScriptedHost::new());

    // Pollers: cursor and palette
    let cursor = spawn_poller(
        NavigationWatcher::new(host.clone(), describer.clone()),
        announcer.clone(),
        cfg.watcher.poll_interval,
    );
    let palette = spawn_poller(
        PaletteWatcher::new(host.clone()),
        announcer.clone(),
        cfg.watcher.palette_poll_interval,
    );

    // Listeners: host events arrive over a channel
    let listeners = ListenerSet::standard(describer.clone(), announcer.clone());
    let (events_tx, events_rx) = mpsc::channel::<EditorEvent>(64);
    let listener_task = listeners.spawn(events_rx);

    let mut help = HelpDialog::new(announcer.clone());
    let mut settings = SettingsDialog::new(
        announcer.clone(),
        describer.clone(),
        cfg.speech.clone(),
        cfg.tts.voices.clone(),
    );

    let run = async {
        for step in script() {
            match step {
                Step::Move(location) => host.move_to(location),
                Step::Focus(focus) => host.set_focus(focus),
                Step::Palette(state) => host.set_palette(state),
                Step::Event(event) => {
                    if events_tx.send(event).await.is_err() {
                        warn!(target: "screen_reader", "Listener task stopped; event dropped");
                    }
                }
                Step::DeleteAll(ids) => {
                    let _bulk = listeners.bulk_delete();
                    for id in ids {
                        listeners.dispatch(&EditorEvent::BlockDeleted { ids: vec![id] });
                    }
                }
                Step::Help => {
                    help.open();
                    tokio::time::sleep(cfg.step_delay * 4).await;
                    help.close();
                }
                Step::Settings => {
                    settings.open();
                    tokio::time::sleep(cfg.step_delay * 3).await;
                    settings.focus_next();
                    tokio::time::sleep(cfg.step_delay).await;
                    settings.increase();
                    tokio::time::sleep(cfg.step_delay).await;
                    settings.apply();
                }
            }
            tokio::time::sleep(cfg.step_delay).await;
        }
    };

    tokio::select! {
        _ = run => info!(target: "screen_reader", "Script finished"),
        _ = tokio::signal::ctrl_c() => info!(target: "screen_reader", "Interrupted"),
    }

    // Let the last utterance play out, then tear down
    tokio::time::sleep(cfg.step_delay * 2).await;
    cursor.dispose();
    palette.dispose();
    drop(events_tx);
    if let Err(e) = listener_task.await {
        warn!(target: "screen_reader", error = %e, "Listener task ended abnormally");
    }
    let snap = announcer.snapshot().await;
    info!(
        target: "screen_reader",
        speaking = ?snap.speaking,
        pending = ?snap.pending,
        "Shutting down"
    );
    Ok(())
}
