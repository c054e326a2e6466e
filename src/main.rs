//! Artillery Duel headless runner
//!
//! Plays an all-AI match with a fixed-step loop and logs the result.
//! Usage: `artillery-duel [match-config.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use artillery_duel::audio::{AudioDispatcher, LogAudioSink};
    use artillery_duel::consts::*;
    use artillery_duel::sim::{GameState, MatchOutcome, RoundPhase, TickInput, WeaponCatalog, tick};
    use artillery_duel::{EngineTuning, MatchConfig, WeaponInventory};

    env_logger::init();
    log::info!("Artillery Duel (headless) starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => MatchConfig::load_or_default(path),
        None => MatchConfig::default(),
    };
    config.human_player = false;

    let mut state = GameState::new(
        config,
        EngineTuning::default(),
        WeaponCatalog::default(),
        WeaponInventory::unlimited_base(),
    );
    let mut audio = AudioDispatcher::new(LogAudioSink);
    let input = TickInput::default();

    // Pretend to render at 30 fps
    const FRAME_DT: f32 = 1.0 / 30.0;
    const MAX_FRAMES: u32 = 30 * 60 * 10;

    let mut accumulator = 0.0;
    let mut frames = 0;
    while state.phase != RoundPhase::MatchOver && frames < MAX_FRAMES {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }
        audio.dispatch(&state.drain_events());
        frames += 1;
    }

    match state.outcome {
        Some(MatchOutcome::Winner(id)) => {
            println!("{:?} wins after {} rounds ({:.1}s)", id, state.round, state.time)
        }
        Some(MatchOutcome::Draw) => println!("Draw after {} rounds", state.round),
        None => println!("No result after {} rounds", state.round),
    }
    for tank in &state.tanks {
        println!(
            "  {:?}: health {:.0}, killed by {:?}",
            tank.id,
            tank.health,
            tank.killed_by()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm
}
