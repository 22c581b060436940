pub mod error;
pub mod types;
pub mod geometry;
pub mod board;
pub mod attacks;
pub mod castling;
pub mod validate;
pub mod execute;
pub mod promotion;
pub mod terminal;
pub mod perft;

pub use board::{Board, GameState, STARTING_POSITION_FEN};
pub use error::{EngineError, Result};
pub use promotion::{Promotion, PromotionProvider};
pub use types::{CastleSide, CastlingRights, Color, Move, Piece, PieceType, Square, Status};
