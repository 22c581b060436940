//! Command line front end for the legality engine.
//!
//! Usage:
//!   cargo run --release -- moves --fen "<FEN>"
//!   cargo run --release -- play e2 e4 e7 e5 --promote q
//!   cargo run --release -- perft --depth 4 --parallel
//!   cargo run --release -- random --plies 200 --seed 7

use std::cmp::max;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

use chess_legality::perft::{divide, perft, perft_parallel};
use chess_legality::{Color, GameState, Move, Promotion, Status};

#[derive(Parser, Debug)]
#[command(name = "chess_legality")]
#[command(about = "Check, play and count legal chess moves")]
struct Cli {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone, Copy)]
struct GlobalOpts {
    /// Log at debug level or finer
    #[arg(global = true, long, default_value_t = false)]
    debug: bool,

    /// Log level
    #[arg(global = true, long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every legal move in a position
    Moves {
        /// Position to start from, the initial position if omitted
        #[arg(long)]
        fen: Option<String>,
    },
    /// Play a sequence of moves given as squares, e.g. `e2 e4 e7 e5`
    Play {
        squares: Vec<String>,

        #[arg(long)]
        fen: Option<String>,

        /// Piece pawns promote to
        #[arg(long, default_value = "q")]
        promote: Promotion,
    },
    /// Count leaf nodes of the legal move tree
    Perft {
        #[arg(short, long, default_value_t = 3)]
        depth: u8,

        #[arg(long)]
        fen: Option<String>,

        /// Split the root moves over all cores
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Print the count below each root move
        #[arg(long, default_value_t = false)]
        divide: bool,
    },
    /// Play random legal moves until the game ends
    Random {
        #[arg(short, long, default_value_t = 200)]
        plies: usize,

        /// Seed for a reproducible game
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        fen: Option<String>,
    },
}

fn init_logging(global_opts: GlobalOpts) -> Result<()> {
    let log_level = if global_opts.debug {
        max(LevelFilter::Debug, global_opts.log_level)
    } else {
        global_opts.log_level
    };

    let mut config_builder = simplelog::ConfigBuilder::new();
    config_builder.set_time_level(LevelFilter::Off);
    config_builder.set_thread_level(LevelFilter::Off);
    config_builder.set_target_level(LevelFilter::Off);
    config_builder.set_location_level(LevelFilter::Off);

    TermLogger::init(
        log_level,
        config_builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn load(fen: Option<&str>) -> Result<GameState> {
    match fen {
        Some(fen) => GameState::from_fen(fen).wrap_err("could not read the starting position"),
        None => Ok(GameState::new()),
    }
}

fn report(state: &GameState) -> Option<Status> {
    let status = state.status();
    match status {
        Some(Status::Checkmate(winner)) => println!("checkmate, {winner} wins"),
        Some(Status::Stalemate) => println!("stalemate"),
        None if state.in_check() => println!("{} is in check", state.side_to_move()),
        None => {}
    }
    status
}

fn list_moves(fen: Option<&str>) -> Result<()> {
    let state = load(fen)?;
    state.draw_to_terminal();
    let moves = state.legal_moves();
    println!("{} legal moves for {}", moves.len(), state.side_to_move());
    for mv in &moves {
        println!("{mv}");
    }
    report(&state);
    Ok(())
}

fn play(squares: &[String], fen: Option<&str>, promote: Promotion) -> Result<()> {
    if squares.len() % 2 != 0 {
        bail!("moves are pairs of squares, got {} squares", squares.len());
    }
    let mut state = load(fen)?;
    for (from, to) in squares.iter().tuples() {
        let mv: Move = format!("{from} {to}").parse()?;
        let Some(piece) = state.board().piece_at(mv.from) else {
            bail!("no piece on {} in {}", mv.from, state.to_fen());
        };
        let mut provider = promote;
        state = state
            .try_apply_move(mv, &mut provider)
            .wrap_err_with(|| format!("cannot play {mv} in {}", state.to_fen()))?;
        println!("{}", mv.to_human(&piece));
        state.draw_to_terminal();
        if report(&state).is_some() {
            break;
        }
    }
    println!("{}", state.to_fen());
    Ok(())
}

fn run_perft(depth: u8, fen: Option<&str>, parallel: bool, split: bool) -> Result<()> {
    let state = load(fen)?;
    let now = Instant::now();
    if split {
        let mut total = 0;
        for (mv, nodes) in divide(&state, depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("total: {total}");
    } else {
        let nodes = if parallel {
            perft_parallel(&state, depth)
        } else {
            perft(&state, depth)
        };
        println!("perft({depth}) = {nodes}");
    }
    println!("elapsed: {:.3}s", now.elapsed().as_secs_f32());
    Ok(())
}

fn random_game(plies: usize, seed: Option<u64>, fen: Option<&str>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut state = load(fen)?;
    for ply in 1..=plies {
        let moves = state.legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        let mut provider = |_: Color| Promotion::ALL[rng.gen_range(0..Promotion::ALL.len())];
        state = state.apply_move(mv, &mut provider);
        println!("ply {ply}: {mv}");
        if report(&state).is_some() {
            break;
        }
    }
    state.draw_to_terminal();
    println!("{}", state.to_fen());
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();
    init_logging(args.global_opts)?;
    log::debug!("Parsed arguments: {args:?}");

    match args.command {
        Commands::Moves { fen } => list_moves(fen.as_deref()),
        Commands::Play {
            squares,
            fen,
            promote,
        } => play(&squares, fen.as_deref(), promote),
        Commands::Perft {
            depth,
            fen,
            parallel,
            divide,
        } => run_perft(depth, fen.as_deref(), parallel, divide),
        Commands::Random { plies, seed, fen } => random_game(plies, seed, fen.as_deref()),
    }
}
