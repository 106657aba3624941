// Interface UCI (Universal Chess Interface) para o motor Folha
//
// A leitura do stdin corre numa thread própria e chega ao ciclo principal por um
// canal. Cada `go` entrega a `Search` a uma thread de trabalho, que a devolve
// ao terminar; `stop` levanta a flag partilhada que a busca consulta.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use crossbeam::channel::{unbounded, Receiver};
use folha::engine::divide;
use folha::moves::init_magic_bitboards;
use folha::search::{Depth, Search, SearchConfig, SearchLimits};
use folha::{GameHistory, Position};
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ativa logs de depuração (stderr)
    #[arg(short, long)]
    debug: bool,
}

enum GoCommand {
    Search(SearchLimits),
    Perft(u32),
}

struct UciEngine {
    position: Position,
    game: GameHistory,
    /// `None` enquanto uma thread de trabalho tem a busca.
    search: Option<Search>,
    worker: Option<JoinHandle<Search>>,
    stop: Arc<AtomicBool>,
}

impl UciEngine {
    fn new() -> Self {
        let search = Search::with_config(SearchConfig::default());
        let stop = search.stop_flag();
        UciEngine {
            position: Position::startpos(),
            game: GameHistory::new(),
            search: Some(search),
            worker: None,
            stop,
        }
    }

    /// Espera pela busca em curso (se houver) e devolve-a.
    fn wait_for_search(&mut self) -> Result<&mut Search> {
        if let Some(handle) = self.worker.take() {
            let search = handle.join().map_err(|_| anyhow!("a thread de busca terminou em pânico"))?;
            self.search = Some(search);
        }
        self.search.as_mut().context("busca indisponível")
    }

    fn stop_search(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        self.wait_for_search()?;
        Ok(())
    }

    /// Trata uma linha. Devolve `false` em `quit`.
    fn handle(&mut self, line: &str) -> Result<bool> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = tokens.split_first() else {
            return Ok(true);
        };

        match command {
            "uci" => self.handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => {
                self.wait_for_search()?.new_game();
                self.position = Position::startpos();
                self.game.clear();
            }
            "setoption" => self.handle_setoption(args)?,
            "position" => {
                if let Err(err) = self.handle_position(args) {
                    log::warn!("position ignorado: {:#}", err);
                    println!("info string {:#}", err);
                }
            }
            "go" => self.handle_go(args)?,
            "stop" => self.stop_search()?,
            "d" => println!("{}", self.position),
            "quit" => {
                self.stop_search()?;
                return Ok(false);
            }
            other => log::warn!("comando desconhecido: {}", other),
        }
        Ok(true)
    }

    fn handle_uci(&self) {
        let defaults = SearchConfig::default();
        println!("id name Folha {}", env!("CARGO_PKG_VERSION"));
        println!("id author Folha");
        println!("option name Hash type spin default {} min 1 max 65536", defaults.hash_mb);
        println!("option name NullMove type check default {}", defaults.null_move);
        println!(
            "option name RepetitionWindow type spin default {} min 0 max 1024",
            defaults.repetition_window
        );
        println!("uciok");
    }

    fn handle_setoption(&mut self, args: &[&str]) -> Result<()> {
        let name_at = args.iter().position(|&t| t == "name");
        let value_at = args.iter().position(|&t| t == "value");
        let (Some(name_at), Some(value_at)) = (name_at, value_at) else {
            log::warn!("setoption incompleto: {}", args.join(" "));
            return Ok(());
        };
        if value_at <= name_at {
            log::warn!("setoption mal formado: {}", args.join(" "));
            return Ok(());
        }

        let name = args[name_at + 1..value_at].join(" ").to_ascii_lowercase();
        let value = args[value_at + 1..].join(" ");
        let search = self.wait_for_search()?;

        match name.as_str() {
            "hash" => match value.parse::<usize>() {
                Ok(mb) if mb > 0 => search.set_hash(mb),
                _ => log::warn!("valor inválido para Hash: {}", value),
            },
            "nullmove" => match value.parse::<bool>() {
                Ok(enabled) => search.config_mut().null_move = enabled,
                Err(_) => log::warn!("valor inválido para NullMove: {}", value),
            },
            "repetitionwindow" => match value.parse::<usize>() {
                Ok(plies) => search.config_mut().repetition_window = plies,
                Err(_) => log::warn!("valor inválido para RepetitionWindow: {}", value),
            },
            _ => log::warn!("opção desconhecida: {}", name),
        }
        Ok(())
    }

    /// `position (startpos | fen <campos>) [moves ...]`. Só altera o estado se
    /// tudo for válido.
    fn handle_position(&mut self, args: &[&str]) -> Result<()> {
        let moves_at = args.iter().position(|&t| t == "moves").unwrap_or(args.len());
        let (setup, moves) = args.split_at(moves_at);

        let mut position = match setup.split_first() {
            Some((&"startpos", _)) => Position::startpos(),
            Some((&"fen", fields)) => Position::from_fen(&fields.join(" "))?,
            _ => bail!("esperado startpos ou fen"),
        };

        let mut game = GameHistory::new();
        for text in moves.iter().skip(1) {
            let mv = position.parse_move(text)?;
            if !game.play(&mut position, mv) {
                bail!("lance ilegal '{}'", text);
            }
        }

        self.position = position;
        self.game = game;
        Ok(())
    }

    fn handle_go(&mut self, args: &[&str]) -> Result<()> {
        self.stop_search()?;

        let limits = match parse_go(args) {
            GoCommand::Perft(depth) => {
                run_perft(self.position, depth);
                return Ok(());
            }
            GoCommand::Search(limits) => limits,
        };

        self.stop.store(false, Ordering::Relaxed);
        let mut search = self.search.take().context("busca indisponível")?;
        let position = self.position;
        let game = self.game.clone();

        let handle = thread::Builder::new()
            .name("search".into())
            .spawn(move || {
                let result = search.best_move_with(&position, &game, &limits, |info| println!("{}", info));
                println!("bestmove {}", result.best_move);
                search
            })
            .context("falha ao lançar a thread de busca")?;
        self.worker = Some(handle);
        Ok(())
    }
}

fn parse_go(args: &[&str]) -> GoCommand {
    let mut limits = SearchLimits::default();
    let mut iter = args.iter();

    while let Some(&token) = iter.next() {
        // Alguns GUIs enviam tempos negativos
        let mut number = || iter.next().and_then(|v| v.parse::<i64>().ok()).map(|v| v.max(0) as u64);
        match token {
            "depth" => limits.depth = number().map(|d| d as Depth),
            "movetime" => limits.movetime = number().map(Duration::from_millis),
            "wtime" => limits.wtime = number().map(Duration::from_millis),
            "btime" => limits.btime = number().map(Duration::from_millis),
            "winc" => limits.winc = number().map(Duration::from_millis),
            "binc" => limits.binc = number().map(Duration::from_millis),
            "nodes" => limits.nodes = number(),
            "movestogo" => {
                number();
            }
            "infinite" => limits.infinite = true,
            "perft" => return GoCommand::Perft(number().unwrap_or(1) as u32),
            other => log::warn!("parâmetro de go ignorado: {}", other),
        }
    }
    GoCommand::Search(limits)
}

fn run_perft(mut position: Position, depth: u32) {
    let split = divide(&mut position, depth);
    for (mv, nodes) in &split {
        println!("{}: {}", mv, nodes);
    }
    println!();
    println!("Nodes searched: {}", split.iter().map(|(_, nodes)| nodes).sum::<u64>());
}

fn spawn_stdin_reader() -> Result<Receiver<String>> {
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            log::error!("canal de comandos fechado");
                            break;
                        }
                    }
                    Err(err) => {
                        log::error!("erro a ler stdin: {}", err);
                        break;
                    }
                }
            }
        })
        .context("falha ao lançar a thread de leitura")?;
    Ok(rx)
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level))
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run() -> Result<()> {
    init_magic_bitboards();
    let commands = spawn_stdin_reader()?;
    let mut engine = UciEngine::new();

    for line in commands.iter() {
        log::debug!("<< {}", line);
        if !engine.handle(line.trim())? {
            return Ok(());
        }
    }

    // Fim do stdin: deixa terminar a busca em curso
    engine.wait_for_search()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);
    run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_records_every_move() {
        init_magic_bitboards();
        let mut engine = UciEngine::new();
        let args = ["startpos", "moves", "e2e4", "e7e5", "g1f3"];
        engine.handle_position(&args).expect("position válido");
        assert_eq!(engine.game.len(), 3);
        assert_eq!(engine.position.to_fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
    }

    #[test]
    fn invalid_position_keeps_previous_state() {
        init_magic_bitboards();
        let mut engine = UciEngine::new();
        engine.handle_position(&["startpos", "moves", "d2d4"]).expect("position válido");
        let before = engine.position;

        assert!(engine.handle_position(&["startpos", "moves", "d2d4", "d2d4"]).is_err());
        assert!(engine.handle_position(&["fen", "4k3/8/8/3P4/8/8/8/4K3", "w", "-", "e6", "0", "1"]).is_err());
        assert_eq!(engine.position, before);
        assert_eq!(engine.game.len(), 1);
    }
}
