use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{BoardSnapshot, EventLog, GameEvent, GameSession, GameStats, PieceSeed};
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution as _, weighted::WeightedIndex},
};
use rand_pcg::Pcg32;
use serde::Serialize;
use tracing::info;

use crate::util::JsonOutput;

/// Relative weights of the random inputs, in `GameEvent::ALL` order.
const EVENT_WEIGHTS: [u32; 6] = [3, 3, 2, 2, 6, 1];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Board width in cells
    #[arg(long, default_value_t = 10)]
    width: i32,
    /// Board height in cells
    #[arg(long, default_value_t = 20)]
    height: i32,
    /// Piece seed as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Stop after this many events even if the game is not over
    #[arg(long, default_value_t = 10000)]
    max_events: usize,
    /// Include the full event log in the report
    #[arg(long)]
    include_events: bool,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    events_handled: usize,
    stats: GameStats,
    snapshot: BoardSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<EventLog>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        width,
        height,
        seed,
        max_events,
        include_events,
        output,
    } = arg;

    anyhow::ensure!(
        *width > 0 && *height > 0,
        "board dimensions must be positive, got {width}x{height}"
    );

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut session = GameSession::with_seed(*width, *height, seed);
    // Inputs derive from the piece seed so a report can be reproduced.
    let [a, b, c, d, e, f, g, h, ..] = seed.to_bytes();
    let mut input_rng = Pcg32::seed_from_u64(u64::from_le_bytes([a, b, c, d, e, f, g, h]));
    let event_index = WeightedIndex::new(EVENT_WEIGHTS).context("Invalid event weights")?;

    while !session.is_game_over() && session.event_log().len() < *max_events {
        let event = random_event(&event_index, &mut input_rng);
        session
            .handle(event)
            .with_context(|| format!("Failed to handle {event:?}"))?;
    }

    info!(
        seed = %seed,
        events = session.event_log().len(),
        score = session.board().score(),
        game_over = session.is_game_over(),
        "simulation finished"
    );

    let report = SimulationReport {
        seed,
        events_handled: session.event_log().len(),
        stats: session.stats().clone(),
        snapshot: session.board().snapshot(),
        events: include_events.then(|| session.event_log().clone()),
    };
    JsonOutput::create(output.as_deref())?.write_json(&report)
}

fn random_event<R>(event_index: &WeightedIndex<u32>, rng: &mut R) -> GameEvent
where
    R: Rng,
{
    GameEvent::ALL[event_index.sample(rng)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_event_covers_all_events() {
        let event_index = WeightedIndex::new(EVENT_WEIGHTS).unwrap();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(random_event(&event_index, &mut rng));
        }
        assert_eq!(seen.len(), GameEvent::ALL.len());
    }

    #[test]
    fn test_random_event_follows_weights() {
        let event_index = WeightedIndex::new(EVENT_WEIGHTS).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut counts = [0_usize; 6];
        for _ in 0..6000 {
            let event = random_event(&event_index, &mut rng);
            let slot = GameEvent::ALL.iter().position(|e| *e == event).unwrap();
            counts[slot] += 1;
        }
        let tick = GameEvent::ALL.iter().position(|e| *e == GameEvent::Tick).unwrap();
        let hard_drop = GameEvent::ALL.iter().position(|e| *e == GameEvent::HardDrop).unwrap();
        assert!(counts[tick] > 3 * counts[hard_drop], "{counts:?}");
    }
}
