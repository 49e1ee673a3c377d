//! Interactive session: applies commands to a game and prints the results.

use crate::command::{Command, HELP};
use crate::config::{validate_ply, Config};
use chess_engine::{classify_move, Board, Game, MoveKind, SearchResult, Status};
use std::io::Write;
use std::sync::Arc;

/// Whether the input loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs commands against a game, writing output to `out`.
pub struct Driver<W: Write> {
    game: Game,
    start: Arc<Board>,
    config: Config,
    out: W,
}

impl<W: Write> Driver<W> {
    /// Creates a driver whose games start from `start`.
    pub fn new(start: Arc<Board>, config: Config, out: W) -> Self {
        Driver {
            game: Game::from_board(Arc::clone(&start)),
            start,
            config,
            out,
        }
    }

    /// Returns the current game.
    #[cfg(test)]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns the output writer.
    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Prints the board and lets the engine open if it plays the side to move.
    pub fn start(&mut self) -> std::io::Result<()> {
        self.print_board()?;
        self.engine_reply()
    }

    /// Executes one command.
    pub fn execute(&mut self, command: Command) -> std::io::Result<Flow> {
        match command {
            Command::Move(text) => match self.game.try_move_uci(&text) {
                Ok(()) => {
                    self.print_board()?;
                    self.engine_reply()?;
                }
                Err(e) => writeln!(self.out, "error: {}", e)?,
            },
            Command::Go => self.engine_move()?,
            Command::Undo => self.undo()?,
            Command::New => {
                self.game = Game::from_board(Arc::clone(&self.start));
                tracing::info!("New game");
                self.start()?;
            }
            Command::Board => self.print_board()?,
            Command::Fen => writeln!(self.out, "{}", self.game.to_fen())?,
            Command::Moves => {
                let moves: Vec<String> = self
                    .game
                    .board()
                    .legal_moves()
                    .iter()
                    .map(|m| m.to_uci())
                    .collect();
                writeln!(self.out, "{}", moves.join(" "))?;
            }
            Command::Ply(ply) => match validate_ply(ply) {
                Ok(ply) => {
                    self.config.ply = ply;
                    writeln!(self.out, "ply set to {}", ply)?;
                }
                Err(e) => writeln!(self.out, "error: {}", e)?,
            },
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Takes back one move, or back to the human's last turn when the
    /// engine plays the other side. If that leaves the engine to move (its
    /// opening move was the only one), it plays again.
    fn undo(&mut self) -> std::io::Result<()> {
        if !self.game.undo() {
            return writeln!(self.out, "nothing to undo");
        }
        if self.config.engine.plays(self.game.side_to_move()) {
            self.game.undo();
        }
        self.print_board()?;
        self.engine_reply()
    }

    fn engine_reply(&mut self) -> std::io::Result<()> {
        if self.config.engine.plays(self.game.side_to_move()) && !self.game.is_game_over() {
            self.engine_move()?;
        }
        Ok(())
    }

    fn engine_move(&mut self) -> std::io::Result<()> {
        let ply = self.config.ply;
        let searched = if self.config.parallel {
            self.game.try_auto_move_parallel(ply)
        } else {
            self.game.try_auto_move(ply)
        };
        match searched {
            Ok(SearchResult {
                mov,
                board,
                score,
                nodes,
                ..
            }) => {
                let kind = board
                    .previous()
                    .and_then(|before| classify_move(before, mov.from(), mov.to()));
                tracing::info!(mv = %mov, score, nodes, ply, "Engine moved");
                writeln!(
                    self.out,
                    "engine plays {} ({}score {}, {} nodes)",
                    mov,
                    describe(kind),
                    score,
                    nodes
                )?;
                self.print_board()
            }
            Err(e) => writeln!(self.out, "error: {}", e),
        }
    }

    fn print_board(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "{}", self.game.board())?;
        if self.game.status() != Status::Ongoing {
            writeln!(self.out, "{}", self.game.status())?;
        }
        Ok(())
    }
}

/// Short note on what an engine move does, empty for plain moves.
fn describe(kind: Option<MoveKind>) -> &'static str {
    match kind {
        Some(k @ MoveKind::Promotion { .. }) if k.is_capture() => "captures and promotes, ",
        Some(MoveKind::Promotion { .. }) => "promotes, ",
        Some(k) if k.is_capture() => "captures, ",
        _ => "",
    }
}
