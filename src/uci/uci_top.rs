//! UCI protocol front-end and command loop.
//!
//! Parses UCI commands, maintains the current position, routes `go` requests
//! to the engine and emits protocol-compliant output. Commands arrive over a
//! channel fed by a stdin reader thread; that thread raises the engine's
//! stop signal directly, so `stop` and `quit` take effect while a search is
//! running on the protocol thread.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use log::{debug, warn};

use crate::engines::engine_trait::{Engine, GoParams};
use crate::errors::FenError;
use crate::game_state::chess_types::GameState;
use crate::search::iterative_deepening::StopSignal;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::render_game_state::render_game_state;

const UCI_ENGINE_NAME: &str = "Bear Chess";
const UCI_ENGINE_AUTHOR: &str = "the Bear Chess authors";

/// Spawn the stdin reader. Every non-empty line is forwarded to the returned
/// receiver. `go` re-arms `stop` before it is forwarded; `stop` and `quit`
/// raise it immediately.
pub fn spawn_stdin_reader(stop: StopSignal) -> Receiver<String> {
    let (command_tx, command_rx) = channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.split_whitespace().next() {
                Some("go") => stop.reset(),
                Some("stop") | Some("quit") => stop.stop(),
                _ => {}
            }
            if command_tx.send(trimmed.to_owned()).is_err() {
                break;
            }
        }
        // End of input behaves like `quit`.
        stop.stop();
        let _ = command_tx.send("quit".to_owned());
    });
    command_rx
}

/// Run the protocol loop until `quit` or until the command channel closes.
pub fn run_uci_loop(
    engine: Box<dyn Engine>,
    commands: Receiver<String>,
    out: &mut impl Write,
) -> io::Result<()> {
    let mut uci = UciState::new(engine);
    for line in commands {
        let should_quit = uci.handle_command(&line, out)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }
    Ok(())
}

pub struct UciState {
    game_state: GameState,
    engine: Box<dyn Engine>,
    debug_mode: bool,
}

impl UciState {
    pub fn new(engine: Box<dyn Engine>) -> Self {
        Self {
            game_state: GameState::new_game(),
            engine,
            debug_mode: false,
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    /// Handle one command line. Returns `Ok(true)` once `quit` is seen.
    pub fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        let mut parts = trimmed.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(false);
        };

        match cmd {
            "uci" => {
                writeln!(out, "id name {UCI_ENGINE_NAME}")?;
                writeln!(out, "id author {UCI_ENGINE_AUTHOR}")?;
                writeln!(out, "option name Hash type spin default 64 min 1 max 4096")?;
                writeln!(out, "option name Clear Hash type button")?;
                writeln!(out, "uciok")?;
            }
            "isready" => {
                writeln!(out, "readyok")?;
            }
            "setoption" => {
                let (name, value) = parse_setoption(trimmed);
                if let Err(err) = self.engine.set_option(&name, &value) {
                    writeln!(out, "info string setoption error: {err}")?;
                }
            }
            "ucinewgame" => {
                self.game_state = GameState::new_game();
                self.engine.new_game();
            }
            "position" => {
                if let Err(err) = self.handle_position(trimmed) {
                    writeln!(out, "info string position error: {err}")?;
                }
            }
            "go" => {
                self.handle_go(trimmed, out)?;
            }
            "stop" => {
                // The reader thread already raised the stop signal.
            }
            "debug" => {
                self.debug_mode = parts.next().is_some_and(|mode| mode.eq_ignore_ascii_case("on"));
            }
            "d" => {
                write!(out, "{}", render_game_state(&self.game_state))?;
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                debug!("ignoring unknown command '{trimmed}'");
            }
        }

        Ok(false)
    }

    /// `position startpos|fen <fields> [moves <lan>...]`.
    ///
    /// A malformed FEN is reported and resets the position to the initial
    /// layout. Moves that cannot be parsed or are illegal are logged and
    /// skipped.
    fn handle_position(&mut self, line: &str) -> Result<(), FenError> {
        let result = self.set_position(line);
        if result.is_err() {
            self.game_state = GameState::new_game();
        }
        result
    }

    fn set_position(&mut self, line: &str) -> Result<(), FenError> {
        let mut tokens = line.split_whitespace().skip(1).peekable();

        let mut base_state = match tokens.next() {
            Some("startpos") => GameState::new_game(),
            Some("fen") => {
                let mut fen_parts = Vec::<&str>::new();
                while let Some(next) = tokens.next_if(|tok| *tok != "moves") {
                    fen_parts.push(next);
                }
                GameState::from_fen(&fen_parts.join(" "))?
            }
            _ => return Err(FenError::MissingField("position")),
        };

        if tokens.next_if_eq(&"moves").is_some() {
            for lan in tokens {
                match parse_long_algebraic(lan, &base_state) {
                    Ok(mv) => {
                        base_state.apply_move(mv);
                    }
                    Err(err) => warn!("skipping move in position command: {err}"),
                }
            }
        }

        self.game_state = base_state;
        Ok(())
    }

    fn handle_go(&mut self, line: &str, out: &mut impl Write) -> io::Result<()> {
        let params = parse_go_params(line);
        if self.debug_mode {
            writeln!(out, "info string go {params:?}")?;
        }

        let mut write_error = None;
        let result = self.engine.choose_move(&self.game_state, &params, &mut |info| {
            if write_error.is_none() {
                if let Err(err) = writeln!(out, "{info}").and_then(|()| out.flush()) {
                    write_error = Some(err);
                }
            }
        });
        if let Some(err) = write_error {
            return Err(err);
        }

        match result.best_move {
            Some(best_move) => writeln!(out, "bestmove {best_move}"),
            None => writeln!(out, "bestmove 0000"),
        }
    }
}

/// Split `setoption name <name...> value <value...>` into its two parts.
fn parse_setoption(line: &str) -> (String, String) {
    let mut name_tokens = Vec::<&str>::new();
    let mut value_tokens = Vec::<&str>::new();
    let mut in_value = None;

    for tok in line.split_whitespace().skip(1) {
        match tok {
            "name" if in_value.is_none() => in_value = Some(false),
            "value" if in_value == Some(false) => in_value = Some(true),
            _ if in_value == Some(false) => name_tokens.push(tok),
            _ if in_value == Some(true) => value_tokens.push(tok),
            _ => {}
        }
    }

    (name_tokens.join(" "), value_tokens.join(" "))
}

/// Unknown tokens and unparsable values are ignored.
fn parse_go_params(line: &str) -> GoParams {
    let mut params = GoParams::default();
    let tokens = line.split_whitespace().collect::<Vec<_>>();
    let mut i = 0usize;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = tokens.get(i).and_then(|x| x.parse::<u8>().ok());
            }
            "movetime" => {
                i += 1;
                params.movetime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "wtime" => {
                i += 1;
                params.wtime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "btime" => {
                i += 1;
                params.btime_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "winc" => {
                i += 1;
                params.winc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "binc" => {
                i += 1;
                params.binc_ms = tokens.get(i).and_then(|x| x.parse::<u64>().ok());
            }
            "movestogo" => {
                i += 1;
                params.movestogo = tokens.get(i).and_then(|x| x.parse::<u16>().ok());
            }
            "infinite" => {
                params.infinite = true;
            }
            _ => {}
        }
        i += 1;
    }
    params
}
