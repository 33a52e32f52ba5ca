use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use engine_logging::engine_warn;
use reachprobe_core::{candidates_for_host, update, AppState, Msg};

use super::config::{load_config, AppConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging;
use super::render::TranscriptPrinter;

const TICK: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let loaded = load_config(&config_path)?;
    let config = loaded.clone().unwrap_or_else(AppConfig::default);

    if let Err(err) = logging::initialize(&config.log_settings()) {
        engine_warn!("{}; logging to the terminal only", err);
    }
    if loaded.is_none() {
        engine_warn!("config {:?} not found, using defaults", config_path);
    }

    let candidates = candidates_for_host(&config.host)?;
    let mut effects = EffectRunner::new(config.probe_settings())?;
    let mut printer = TranscriptPrinter::new(io::stdout());

    let mut state = AppState::new(candidates);
    state = dispatch(state, Msg::Tick, &effects, &mut printer)?;
    state = dispatch(state, Msg::TestClicked, &effects, &mut printer)?;
    while state.view().running {
        let msg = effects.poll(TICK).unwrap_or(Msg::Tick);
        state = dispatch(state, msg, &effects, &mut printer)?;
    }
    dispatch(state, Msg::ScreenClosed, &effects, &mut printer)?;

    effects.shutdown();
    Ok(())
}

fn dispatch<W: Write>(
    state: AppState,
    msg: Msg,
    effects: &EffectRunner,
    printer: &mut TranscriptPrinter<W>,
) -> io::Result<AppState> {
    let (mut state, new_effects) = update(state, msg);
    effects.enqueue(new_effects);
    if state.consume_dirty() {
        printer.render(&state.view())?;
    }
    Ok(state)
}
