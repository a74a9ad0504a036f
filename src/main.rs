//! ACM Challenge entry point
//!
//! Headless native run: the catch phase plays itself in idle mode, then the
//! puzzle is played from stdin, one cell index (0-8) per line. `q` or EOF
//! quits.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use acm_challenge::consts::*;
use acm_challenge::view::FrameView;
use acm_challenge::{ControllerInput, Environment, GameConfig, LocalGame, Phase};

fn environment_from_env() -> Environment {
    match std::env::var("ACM_CHALLENGE_ENV") {
        Ok(value) => Environment::from_str(&value).unwrap_or_else(|| {
            eprintln!("Unknown ACM_CHALLENGE_ENV '{}', using development", value);
            Environment::Development
        }),
        Err(_) => Environment::Development,
    }
}

fn seed_from_env() -> Option<u64> {
    let value = std::env::var("ACM_CHALLENGE_SEED").ok()?;
    match value.parse() {
        Ok(seed) => Some(seed),
        Err(e) => {
            log::warn!("Ignoring ACM_CHALLENGE_SEED '{}': {}", value, e);
            None
        }
    }
}

fn print_board(frame: &FrameView) {
    let Some(puzzle) = &frame.puzzle else {
        return;
    };
    for row in puzzle.cells.chunks(GRID_SIZE) {
        let line: Vec<String> = row
            .iter()
            .map(|&label| {
                if label == BLANK {
                    ".".to_string()
                } else {
                    (label + 1).to_string()
                }
            })
            .collect();
        println!("  {}", line.join(" "));
    }
    println!(
        "Moves: {}  Progress: {}% ({}/{} tiles)",
        puzzle.moves,
        puzzle.progress_percent,
        puzzle.correct_tiles,
        CELL_COUNT - 1
    );
}

fn run_catch_phase(game: &mut LocalGame) {
    while game.phase() == Phase::Catch && !game.controller().is_lost() {
        game.set_input(ControllerInput {
            idle_mode: true,
            ..Default::default()
        });
        game.update(SIM_DT);
    }

    let frame = game.frame();
    println!(
        "Catch phase: {}/{} caught, {} missed, score {}",
        frame.items_caught, frame.total_to_catch, frame.items_missed, frame.score
    );
}

fn run_puzzle(game: &mut LocalGame) -> io::Result<()> {
    if let Some(half) = &game.frame().reward_half_a {
        println!("First half: {}", half);
    }
    if let Err(e) = game.start_puzzle() {
        log::warn!("Could not start puzzle: {}", e);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print_board(&game.frame());
        print!("Move (0-8, q to quit): ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            game.quit();
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            game.quit();
            break;
        }
        let Ok(index) = line.parse::<usize>() else {
            println!("Not a cell index: {}", line);
            continue;
        };
        match game.select_cell(index) {
            Ok(()) if game.phase() == Phase::Complete => {
                print_board(&game.frame());
                if let Some(reward) = &game.frame().full_reward {
                    println!("Solved! Reward: {}", reward);
                }
                break;
            }
            Ok(()) => {}
            Err(e) => println!("{}", e),
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let environment = environment_from_env();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(environment.default_log_filter()),
    )
    .init();
    log::info!("ACM Challenge starting ({})", environment.as_str());

    let config_path = std::env::var_os("ACM_CHALLENGE_CONFIG").map(PathBuf::from);
    let mut config = GameConfig::load_or_default(config_path.as_deref());
    config.environment = environment;

    let mut game = LocalGame::new(config, seed_from_env());
    run_catch_phase(&mut game);

    match game.phase() {
        Phase::Puzzle => run_puzzle(&mut game)?,
        _ => {
            if let Some(reason) = game.frame().lost {
                println!("Catch phase lost: {:?}. Only a perfect run unlocks the puzzle.", reason);
            }
        }
    }

    if game.phase() == Phase::Abandoned {
        log::info!("Session abandoned");
    }
    Ok(())
}
