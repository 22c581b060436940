use log::debug;

use crate::attacks;
use crate::error::{EngineError, Result};
use crate::execute;
use crate::promotion::PromotionProvider;
use crate::terminal;
use crate::types::*;
use crate::validate;

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const fn back_row(color: Color) -> [Option<Piece>; 8] {
    let order = [
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
        PieceType::Bishop,
        PieceType::Knight,
        PieceType::Rook,
    ];
    let mut row = [None; 8];
    let mut file = 0;
    while file < 8 {
        row[file] = Some(Piece::new(color, order[file]));
        file += 1;
    }
    row
}

const STARTING_BOARD: Board = Board {
    squares: [
        back_row(Color::Black),
        [Some(Piece::new(Color::Black, PieceType::Pawn)); 8],
        [None; 8],
        [None; 8],
        [None; 8],
        [None; 8],
        [Some(Piece::new(Color::White, PieceType::Pawn)); 8],
        back_row(Color::White),
    ],
};

/// The 8x8 grid. Indexed by [`Square`], row 0 is rank 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard initial arrangement.
    pub const fn starting() -> Board {
        STARTING_BOARD
    }

    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Parse the row encoding: eight rows of eight characters, `.` for an empty
    /// square, uppercase for white and lowercase for black. Row 0 is rank 8.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Board> {
        if rows.len() != 8 {
            return Err(EngineError::InvalidBoard(format!(
                "expected 8 rows, got {}",
                rows.len()
            )));
        }
        let mut board = Board::empty();
        for (rank, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != 8 {
                return Err(EngineError::InvalidBoard(format!(
                    "row {rank} `{row}` does not have 8 squares"
                )));
            }
            for (file, c) in row.chars().enumerate() {
                if c != '.' {
                    board.squares[rank][file] = Some(Piece::from_char(c)?);
                }
            }
        }
        Ok(board)
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.squares
            .iter()
            .map(|row| {
                row.iter()
                    .map(|p| p.map_or('.', |p| p.to_char()))
                    .collect()
            })
            .collect()
    }

    /// Parse the piece placement field of a FEN string.
    pub fn from_fen_placement(placement: &str) -> Result<Board> {
        let invalid = |reason: String| EngineError::InvalidFen {
            fen: placement.to_string(),
            reason,
        };
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid(format!("expected 8 ranks, got {}", ranks.len())));
        }
        let mut board = Board::empty();
        for (rank, rank_data) in ranks.iter().enumerate() {
            let mut file = 0usize;
            for piece_char in rank_data.chars() {
                if let Some(skip) = piece_char.to_digit(10) {
                    file += skip as usize;
                } else {
                    if file >= 8 {
                        return Err(invalid(format!("rank {} is too long", 8 - rank)));
                    }
                    board.squares[rank][file] = Some(Piece::from_char(piece_char)?);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(invalid(format!(
                    "rank {} covers {file} squares instead of 8",
                    8 - rank
                )));
            }
        }
        Ok(board)
    }

    pub fn to_fen_placement(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for row in self.squares.iter() {
            let mut rank = String::new();
            let mut empty = 0;
            for square in row {
                match square {
                    Some(piece) => {
                        if empty > 0 {
                            rank.push_str(&empty.to_string());
                            empty = 0;
                        }
                        rank.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                rank.push_str(&empty.to_string());
            }
            ranks.push(rank);
        }
        ranks.join("/")
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank() as usize][sq.file() as usize]
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece_at(sq).is_none()
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.rank() as usize][sq.file() as usize] = piece;
    }

    /// Remove and return whatever stands on `sq`.
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.rank() as usize][sq.file() as usize].take()
    }

    /// A copy of the board with the piece on `from` moved to `to`.
    pub fn with_piece_moved(&self, from: Square, to: Square) -> Board {
        let mut board = *self;
        let piece = board.take(from);
        board.set(to, piece);
        board
    }

    /// Every piece of `color` with its square, a8 to h1.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|p| p.color == color)
                .map(|p| (sq, p))
        })
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::from("  a b c d e f g h\n");
        for (rank, row) in self.squares.iter().enumerate() {
            string.push_str(&format!("{} ", 8 - rank));
            for square in row {
                let symbol = match square {
                    Some(p) => p.to_symbol(),
                    None => ".",
                };
                string.push_str(symbol);
                string.push(' ');
            }
            string.push_str(&format!("{}\n", 8 - rank));
        }
        string.push_str("  a b c d e f g h\n");
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

/// Board plus everything else needed to decide what is legal next.
///
/// `GameState` is a plain value: queries borrow it and every move produces a new
/// one, so a caller can keep as many positions around as it likes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub(crate) board: Board,
    // who's move it is
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    // square skipped by a double pawn push on the previous ply
    pub(crate) en_passant: Option<Square>,
}

impl GameState {
    /// The standard starting position, white to move.
    pub fn new() -> GameState {
        GameState {
            board: Board::starting(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
        }
    }

    pub fn from_parts(
        board: Board,
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> GameState {
        GameState {
            board,
            side_to_move,
            castling,
            en_passant,
        }
    }

    /// Parse a FEN string. The halfmove and fullmove clocks may be omitted and are
    /// ignored when present.
    pub fn from_fen(fen: &str) -> Result<GameState> {
        let invalid = |reason: &str| EngineError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(invalid("expected 4 or 6 space separated fields"));
        }

        let board = Board::from_fen_placement(parts[0])?;

        let mut side_chars = parts[1].chars();
        let side_to_move = match (side_chars.next(), side_chars.next()) {
            (Some(c), None) => Color::from_char(c).map_err(|_| invalid("bad side to move"))?,
            _ => return Err(invalid("bad side to move")),
        };

        let castling =
            CastlingRights::from_fen(parts[2]).map_err(|_| invalid("bad castling rights"))?;

        let en_passant = if parts[3] == "-" {
            None
        } else {
            Some(Square::from_algebraic(parts[3]).map_err(|_| invalid("bad en passant square"))?)
        };

        Ok(GameState {
            board,
            side_to_move,
            castling,
            en_passant,
        })
    }

    /// FEN for this state. No move clocks are tracked, so they are always `0 1`.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} 0 1",
            self.board.to_fen_placement(),
            self.side_to_move.to_char(),
            self.castling.to_fen(),
            self.en_passant
                .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic()),
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get the color of the side to move
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        validate::is_legal(self, mv)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        terminal::legal_moves(self)
    }

    /// Is the side to move in check
    pub fn in_check(&self) -> bool {
        attacks::in_check(&self.board, self.side_to_move)
    }

    pub fn status(&self) -> Option<Status> {
        terminal::status(self)
    }

    /// Play `mv`, which must be legal. See [`execute::apply_move`].
    pub fn apply_move<P: PromotionProvider + ?Sized>(&self, mv: Move, promotion: &mut P) -> GameState {
        execute::apply_move(self, mv, promotion)
    }

    pub fn try_apply_move<P: PromotionProvider + ?Sized>(
        &self,
        mv: Move,
        promotion: &mut P,
    ) -> Result<GameState> {
        execute::try_apply_move(self, mv, promotion)
    }

    pub fn draw_to_terminal(&self) {
        debug!("{}", self.to_fen());
        self.board.draw_to_terminal();
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}
