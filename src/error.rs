use thiserror::Error;

use crate::types::{Color, Move};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Everything that can go wrong at the boundary of the engine.
///
/// Malformed text never reaches the rules code: it is rejected while parsing
/// squares, moves, boards or FEN strings. An illegal move is normally just a
/// `false` from [`crate::validate::is_legal`]; `IllegalMove` only shows up when a
/// caller asks for the checked [`crate::execute::try_apply_move`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid square `{0}`, expected a file a-h followed by a rank 1-8")]
    InvalidSquare(String),

    #[error("square at rank index {rank}, file index {file} is off the board")]
    OutOfBounds { rank: u8, file: u8 },

    #[error("invalid move `{0}`, expected two squares such as `e2 e4`")]
    InvalidMove(String),

    #[error("invalid piece character `{0}`")]
    InvalidPiece(char),

    #[error("invalid side to move `{0}`, expected `w` or `b`")]
    InvalidColor(char),

    #[error("invalid castling character `{0}`, expected `K`, `Q`, `k`, `q` or `-`")]
    InvalidCastling(char),

    #[error("invalid promotion choice `{0}`, expected one of q, r, b, n")]
    InvalidPromotion(String),

    #[error("invalid board: {0}")]
    InvalidBoard(String),

    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal move {mv} for {side}")]
    IllegalMove { mv: Move, side: Color },
}
