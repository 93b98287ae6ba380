use advance_rally::Game;

#[cfg(not(feature = "display"))]
use advance_rally::clock::{FreeRunningVBlank, VBlank};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run();
}

#[cfg(feature = "display")]
fn run() {
    if let Err(e) = advance_rally::display::run(Game::new()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

// Without a display the binary runs a bounded headless demo: the opponent
// plays an absent player for ten seconds of simulated time.
#[cfg(not(feature = "display"))]
fn run() {
    const TICKS: u64 = 600;

    let mut game = Game::new();
    let mut vblank = FreeRunningVBlank::new();
    while vblank.ticks() < TICKS {
        vblank.wait();
        game.tick();
    }

    let scores = game.scores();
    println!(
        "after {TICKS} ticks: player {} cpu {}",
        scores.player, scores.cpu
    );
}
