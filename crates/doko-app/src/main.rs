use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use doko_app::controller::GameController;
use doko_app::logging::init_logging;
use doko_app::session::{Session, ThinkingDelays};
use doko_bot::BotDifficulty;
use doko_core::game::state::{GameConfig, Phase, PlayOutcome};
use doko_core::model::rank::RankSet;
use doko_core::model::seat::Seat;
use doko_core::model::suit::Suit;
use doko_core::model::team::Team;

/// Headless Doppelkopf trainer: plays full games with the learner's
/// seat driven by the Medium heuristic, printing tricks, hints and the
/// final score.
#[derive(Debug, Parser)]
#[command(name = "doko-trainer", about = "Headless Doppelkopf training games")]
struct Cli {
    /// RNG seed for the deal; random when omitted.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Bot difficulty: easy, medium or hard. Falls back to the
    /// DOKO_BOT_DIFFICULTY environment variable.
    #[arg(long)]
    difficulty: Option<String>,

    /// Deck size: 48 (with nines) or 40 (without).
    #[arg(long, default_value_t = 48)]
    deck: usize,

    /// Number of games to play back to back.
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Keep the tier-dependent thinking pauses instead of playing
    /// instantly.
    #[arg(long)]
    realtime: bool,

    /// Write the final game state as JSON.
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(tracing::Level::INFO);

    let difficulty = match cli.difficulty.as_deref() {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "easy" => BotDifficulty::Easy,
            "medium" | "normal" => BotDifficulty::Medium,
            "hard" => BotDifficulty::Hard,
            other => anyhow::bail!("unknown difficulty {other:?}"),
        },
        None => BotDifficulty::from_env(),
    };
    let rank_set = match cli.deck {
        48 => RankSet::WithNines,
        40 => RankSet::WithoutNines,
        other => anyhow::bail!("deck must be 48 or 40, not {other}"),
    };
    let config = GameConfig {
        rank_set,
        trump_suit: Suit::Diamonds,
    };
    let delays = if cli.realtime {
        ThinkingDelays::standard()
    } else {
        ThinkingDelays::none()
    };

    for game_index in 0..cli.games {
        let seed = cli.seed.map(|seed| seed + u64::from(game_index));
        let controller = GameController::new(
            ["Nora", "Emil", "Sina", "Willi"].map(String::from),
            config,
            Seat::South,
            difficulty,
            seed,
        );
        println!("== Game {} ==", game_index + 1);
        run_game(&Session::new(controller, delays), cli.export.as_deref()).await?;
    }

    Ok(())
}

async fn run_game(session: &Session, export: Option<&std::path::Path>) -> anyhow::Result<()> {
    let status = session.with_controller(|ctrl| ctrl.status_text()).await;
    println!("  {status}");
    loop {
        for bot_move in session.advance_bots().await? {
            println!("  {} plays {}", bot_move.seat, bot_move.card);
            if let PlayOutcome::TrickCompleted { winner, points } =
                bot_move.outcome
            {
                println!("  -> trick to {winner} ({points} points)");
            }
            if let Some(hint) = bot_move.post_hint {
                println!("  [hint] {}: {}", hint.title, hint.message);
            }
        }

        let (playing, card) = session
            .with_controller(|ctrl| {
                let playing = matches!(ctrl.state().phase(), Phase::Playing);
                (playing, playing.then(|| ctrl.legal_moves()[0]))
            })
            .await;
        if !playing {
            break;
        }

        // The learner's seat plays its first legal card in headless mode.
        let report = session.submit_human(card.expect("playing implies a move")).await?;
        println!("  South plays {}", report.card);
        if let Some(hint) = report.pre_hint {
            println!("  [hint] {}: {}", hint.title, hint.message);
        }
        if let PlayOutcome::TrickCompleted { winner, points } =
            report.outcome
        {
            println!("  -> trick to {winner} ({points} points)");
        }
        if let Some(hint) = report.post_hint {
            println!("  [hint] {}: {}", hint.title, hint.message);
        }
    }

    session
        .with_controller(|ctrl| {
            let result = ctrl.result().expect("finished game has a result").clone();
            let winning_points = match result.winner {
                Team::Re => result.re_points,
                Team::Kontra => result.kontra_points,
            };
            println!(
                "  Result: {} wins with {} (Re {} / Kontra {}), game value {}",
                result.winner, winning_points, result.re_points, result.kontra_points,
                result.game_value,
            );
            for bonus in &result.bonuses {
                println!("  Bonus: {bonus}");
            }
            for achievement in &result.achievements {
                println!(
                    "  Achievement: {} for {} (trick {})",
                    achievement.kind,
                    achievement.team,
                    achievement.trick_index + 1
                );
            }
        })
        .await;

    if let Some(path) = export {
        let json = session.with_controller(|ctrl| ctrl.export_json()).await?;
        std::fs::write(path, json)
            .with_context(|| format!("writing final state to {}", path.display()))?;
        println!("  Final state written to {}", path.display());
    }

    Ok(())
}
