use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::types::{Color, PieceType};

/// The pieces a pawn can promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    pub const ALL: [Promotion; 4] = [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ];

    pub fn piece_type(&self) -> PieceType {
        match self {
            Self::Queen => PieceType::Queen,
            Self::Rook => PieceType::Rook,
            Self::Bishop => PieceType::Bishop,
            Self::Knight => PieceType::Knight,
        }
    }
}

/// Accepts a single letter (`q`, `R`, ...) or the full name of the piece.
impl FromStr for Promotion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(Promotion::Queen),
            "r" | "rook" => Ok(Promotion::Rook),
            "b" | "bishop" => Ok(Promotion::Bishop),
            "n" | "knight" => Ok(Promotion::Knight),
            _ => Err(EngineError::InvalidPromotion(s.to_string())),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.piece_type().to_human())
    }
}

/// Decides what a pawn reaching the last rank becomes.
///
/// The executor asks exactly once per promoting move and never otherwise. A host
/// that wants to pick the piece up front can pass a [`Promotion`] directly, any
/// `FnMut(Color) -> Promotion` works as well.
pub trait PromotionProvider {
    fn choose(&mut self, color: Color) -> Promotion;
}

impl PromotionProvider for Promotion {
    fn choose(&mut self, _color: Color) -> Promotion {
        *self
    }
}

impl<F> PromotionProvider for F
where
    F: FnMut(Color) -> Promotion,
{
    fn choose(&mut self, color: Color) -> Promotion {
        self(color)
    }
}
