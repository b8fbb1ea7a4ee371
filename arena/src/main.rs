mod config;
mod match_loop;
mod remote_agent;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tokio::runtime::Handle;
use uttt_common::games::SessionRng;
use uttt_common::move_log::MoveLogWriter;
use uttt_common::ultimate_tictactoe::{MinimaxAgent, MoveProvider, Player, RandomAgent};
use uttt_common::{log, logger};

use config::ArenaConfig;
use match_loop::Arena;
use remote_agent::RemoteAgent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    Minimax,
    Random,
    Remote,
}

#[derive(Parser)]
#[command(name = "uttt_arena")]
struct Args {
    #[arg(long, value_enum, default_value_t = AgentKind::Minimax)]
    x: AgentKind,

    #[arg(long, value_enum, default_value_t = AgentKind::Random)]
    o: AgentKind,

    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Seeds the random agents; omitted means a fresh seed per run.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "uttt_arena_config.yaml")]
    config: PathBuf,

    /// Appends one JSON record per move to this file.
    #[arg(long)]
    move_log: Option<PathBuf>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn session_rng(seed: Option<u64>, offset: u64) -> SessionRng {
    match seed {
        Some(seed) => SessionRng::new(seed.wrapping_add(offset)),
        None => SessionRng::from_random(),
    }
}

fn build_agent(
    kind: AgentKind,
    player: Player,
    config: &ArenaConfig,
    rng: SessionRng,
    runtime: &Handle,
) -> Box<dyn MoveProvider> {
    match kind {
        AgentKind::Minimax => Box::new(MinimaxAgent::new(
            player,
            config.search.evaluator(),
            config.search.limits(),
        )),
        AgentKind::Random => Box::new(RandomAgent::new(rng)),
        AgentKind::Remote => Box::new(RemoteAgent::new(
            config.server_address.clone(),
            config.request_timeout(),
            config.search.time_budget_ms.min(u32::MAX as u64) as u32,
            runtime.clone(),
        )),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Arena".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = config::get_config_manager(&args.config).get_config()?;
    let runtime = Handle::current();

    let x = build_agent(args.x, Player::X, &config, session_rng(args.seed, 0), &runtime);
    let o = build_agent(args.o, Player::O, &config, session_rng(args.seed, 1), &runtime);
    let fallback_agent = RandomAgent::new(session_rng(args.seed, 2));
    let move_log = args.move_log.map(MoveLogWriter::open).transpose()?;
    if let Some(writer) = &move_log {
        log!("Appending move records to {}", writer.path().display());
    }

    log!(
        "Playing {} game(s): {} as X, {} as O, fallback {:?}",
        args.games,
        x.name(),
        o.name(),
        config.fallback
    );

    let mut arena = Arena::new(x, o, config.fallback, fallback_agent, move_log);
    let games = args.games;
    let summary = tokio::task::spawn_blocking(move || arena.run(games)).await??;

    log!("{}", summary);

    Ok(())
}
