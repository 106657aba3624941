// Folha - ferramentas de linha de comando: perft, busca a profundidade fixa e bench

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folha::engine::{divide, parallel_divide, perft};
use folha::moves::init_magic_bitboards;
use folha::search::{score_to_uci, Search, SearchConfig, SearchLimits};
use folha::{GameHistory, Position, STARTPOS_FEN};
use std::io::Write;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ativa logs de depuração
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Conta as folhas da árvore de lances legais
    Perft {
        #[arg(long, default_value = STARTPOS_FEN)]
        fen: String,
        #[arg(short = 'n', long, default_value_t = 5)]
        depth: u32,
        /// Mostra a contagem por lance da raiz
        #[arg(long)]
        divide: bool,
        /// Threads para o divide paralelo (0 = todos os núcleos)
        #[arg(long, default_value_t = 1)]
        threads: usize,
    },
    /// Procura o melhor lance
    Search {
        #[arg(long, default_value = STARTPOS_FEN)]
        fen: String,
        #[arg(short = 'n', long, default_value_t = 8)]
        depth: i32,
        /// Tempo máximo em milissegundos
        #[arg(long)]
        movetime: Option<u64>,
        #[arg(long, default_value_t = 128)]
        hash: usize,
    },
    /// Busca a profundidade fixa num conjunto de posições e soma os nós
    Bench {
        #[arg(short = 'n', long, default_value_t = 6)]
        depth: i32,
    },
}

const BENCH_POSITIONS: [&str; 6] = [
    STARTPOS_FEN,
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
];

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn parse_fen(fen: &str) -> Result<Position> {
    Position::from_fen(fen).with_context(|| format!("FEN inválido: {}", fen))
}

fn run_perft(fen: &str, depth: u32, show_divide: bool, threads: usize) -> Result<()> {
    let mut pos = parse_fen(fen)?;
    let start = Instant::now();

    let nodes: u64 = if show_divide || threads != 1 {
        let threads = if threads == 0 { num_cpus::get() } else { threads };
        let mut split = if threads > 1 {
            parallel_divide(&pos, depth, threads).context("falha ao criar o pool de threads")?
        } else {
            divide(&mut pos, depth)
        };
        split.sort_by_key(|(mv, _)| mv.to_string());
        if show_divide {
            for (mv, count) in &split {
                println!("{}: {}", mv, count);
            }
        }
        split.iter().map(|(_, count)| count).sum()
    } else {
        perft(&mut pos, depth)
    };

    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!();
    println!("Nós: {}", nodes);
    println!("Tempo: {:.3}s ({:.0} nós/s)", elapsed.as_secs_f64(), nps);
    Ok(())
}

fn run_search(fen: &str, depth: i32, movetime: Option<u64>, hash: usize) -> Result<()> {
    let pos = parse_fen(fen)?;
    let mut search = Search::with_config(SearchConfig { hash_mb: hash, ..SearchConfig::default() });
    let limits = SearchLimits {
        depth: Some(depth),
        movetime: movetime.map(Duration::from_millis),
        ..SearchLimits::default()
    };

    let result = search.best_move_with(&pos, &GameHistory::new(), &limits, |info| println!("{}", info));
    println!("bestmove {} ({})", result.best_move, score_to_uci(result.score));
    Ok(())
}

fn run_bench(depth: i32) -> Result<()> {
    let mut search = Search::with_config(SearchConfig { hash_mb: 16, ..SearchConfig::default() });
    let start = Instant::now();
    let mut total = 0;

    for fen in BENCH_POSITIONS {
        let pos = parse_fen(fen)?;
        search.new_game();
        let result = search.best_move(&pos, &GameHistory::new(), &SearchLimits::depth(depth));
        log::debug!("{} -> {} ({} nós)", fen, result.best_move, result.nodes);
        total += result.nodes;
    }

    let elapsed = start.elapsed();
    println!("{} nós {} nps", total, (total as f64 / elapsed.as_secs_f64().max(1e-9)) as u64);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);
    init_magic_bitboards();

    match args.command {
        Command::Perft { fen, depth, divide, threads } => run_perft(&fen, depth, divide, threads),
        Command::Search { fen, depth, movetime, hash } => run_search(&fen, depth, movetime, hash),
        Command::Bench { depth } => run_bench(depth),
    }
}
