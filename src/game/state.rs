use super::{Board, MoveError, Player};

/// Where a single game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Win(Player),
    Tie,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Board plus turn bookkeeping for one game. Player one always moves first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    status: GameStatus,
    moves_played: usize,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState {
            board: Board::new(),
            current_player: Player::One,
            status: GameStatus::InProgress,
            moves_played: 0,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Number of pieces placed so far.
    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Place the current player's piece and advance the state machine:
    /// a completed line ends the game as a win, a full board as a tie,
    /// otherwise the turn passes to the opponent.
    pub fn apply_move(&mut self, column: usize) -> Result<GameStatus, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        self.board.drop_piece(column, player)?;
        self.moves_played += 1;

        if self.board.check_win(player) {
            self.status = GameStatus::Win(player);
        } else if self.board.is_full() {
            self.status = GameStatus::Tie;
        } else {
            self.current_player = player.other();
        }

        Ok(self.status)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
