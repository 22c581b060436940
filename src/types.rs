use std::fmt;
use std::str::FromStr;

use itertools::iproduct;

use crate::error::{EngineError, Result};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Parse the side-to-move field of a FEN string.
    pub fn from_char(c: char) -> Result<Color> {
        match c {
            'w' => Ok(Color::White),
            'b' => Ok(Color::Black),
            other => Err(EngineError::InvalidColor(other)),
        }
    }

    /// Uppercase letters are white pieces, everything else black.
    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Rank index of the row holding this color's king and rooks at the start.
    pub fn back_rank(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// Rank index pawns of this color start on.
    pub fn pawn_home_rank(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Rank index a pawn of this color promotes on.
    pub fn promotion_rank(&self) -> u8 {
        self.other_color().back_rank()
    }

    /// Change in rank index for one pawn step. Rank 0 is black's side of the board.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_human())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> Result<PieceType> {
        match c.to_ascii_lowercase() {
            'p' => Ok(PieceType::Pawn),
            'n' => Ok(PieceType::Knight),
            'b' => Ok(PieceType::Bishop),
            'r' => Ok(PieceType::Rook),
            'q' => Ok(PieceType::Queen),
            'k' => Ok(PieceType::King),
            _ => Err(EngineError::InvalidPiece(c)),
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub const fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { color, piece_type }
    }

    /// Board-encoding letter: uppercase for white, lowercase for black.
    pub fn from_char(c: char) -> Result<Piece> {
        if !c.is_ascii_alphabetic() {
            return Err(EngineError::InvalidPiece(c));
        }
        Ok(Piece {
            color: Color::from_case(c),
            piece_type: PieceType::from_char(c)?,
        })
    }

    pub fn to_char(&self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &str {
        match (self.color, self.piece_type) {
            (Color::White, PieceType::Pawn) => "♙",
            (Color::White, PieceType::Knight) => "♘",
            (Color::White, PieceType::Bishop) => "♗",
            (Color::White, PieceType::Rook) => "♖",
            (Color::White, PieceType::Queen) => "♕",
            (Color::White, PieceType::King) => "♔",
            (Color::Black, PieceType::Pawn) => "♟︎",
            (Color::Black, PieceType::Knight) => "♞",
            (Color::Black, PieceType::Bishop) => "♝",
            (Color::Black, PieceType::Rook) => "♜",
            (Color::Black, PieceType::Queen) => "♛",
            (Color::Black, PieceType::King) => "♚",
        }
    }
}

/// A square on the board.
///
/// `rank` is the row of the board encoding: 0 is chess rank 8 (black's back rank)
/// and 7 is chess rank 1. `file` 0 is the a-file. Both are always in `0..8`, so a
/// `Square` that exists is on the board.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Square {
    rank: u8,
    file: u8,
}

impl Square {
    pub fn new(rank: u8, file: u8) -> Result<Square> {
        if rank < 8 && file < 8 {
            Ok(Square { rank, file })
        } else {
            Err(EngineError::OutOfBounds { rank, file })
        }
    }

    /// Only for coordinates already known to be on the board.
    pub(crate) const fn at(rank: u8, file: u8) -> Square {
        Square { rank, file }
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    /// Row-major index in `0..64`, a8 = 0, h1 = 63.
    pub fn index(&self) -> usize {
        (self.rank * 8 + self.file) as usize
    }

    /// The square `rank_delta`, `file_delta` away, if that is still on the board.
    pub fn offset(&self, rank_delta: i8, file_delta: i8) -> Option<Square> {
        let rank = self.rank as i8 + rank_delta;
        let file = self.file as i8 + file_delta;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::at(rank as u8, file as u8))
        } else {
            None
        }
    }

    /// All 64 squares, a8 first, row by row.
    pub fn all() -> impl Iterator<Item = Square> {
        iproduct!(0..8u8, 0..8u8).map(|(rank, file)| Square::at(rank, file))
    }

    pub fn from_algebraic(s: &str) -> Result<Square> {
        let mut chars = s.chars();
        let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(EngineError::InvalidSquare(s.to_string()));
        };
        let file_char = file_char.to_ascii_lowercase();
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return Err(EngineError::InvalidSquare(s.to_string()));
        }
        let file = file_char as u8 - b'a';
        let rank = 8 - (rank_char as u8 - b'0');
        Ok(Square::at(rank, file))
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Square::from_algebraic(s)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

/// An origin and a destination. Which piece a pawn promotes to is decided when the
/// move is executed, so it is not part of the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    pub fn to_human(&self, piece: &Piece) -> String {
        format!(
            "{} moves {} from {} to {}",
            piece.color.to_human(),
            piece.piece_type.to_human(),
            self.from,
            self.to,
        )
    }
}

/// Parses two whitespace separated squares, e.g. `e2 e4`.
impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [from, to] = tokens.as_slice() else {
            return Err(EngineError::InvalidMove(s.to_string()));
        };
        let from = Square::from_algebraic(from).map_err(|_| EngineError::InvalidMove(s.to_string()))?;
        let to = Square::from_algebraic(to).map_err(|_| EngineError::InvalidMove(s.to_string()))?;
        Ok(Move::new(from, to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

/// File index of both kings at the start of the game.
pub const KING_HOME_FILE: u8 = 4;

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// File of the rook this side castles with.
    pub fn rook_file(&self) -> u8 {
        match self {
            Self::KingSide => 7,
            Self::QueenSide => 0,
        }
    }

    /// File the king lands on.
    pub fn king_target_file(&self) -> u8 {
        match self {
            Self::KingSide => 6,
            Self::QueenSide => 2,
        }
    }

    /// File the rook lands on, the square the king crosses.
    pub fn rook_target_file(&self) -> u8 {
        match self {
            Self::KingSide => 5,
            Self::QueenSide => 3,
        }
    }

    /// Files strictly between king and rook, which must all be empty.
    pub fn files_between(&self) -> std::ops::Range<u8> {
        match self {
            Self::KingSide => 5..7,
            Self::QueenSide => 1..4,
        }
    }

    /// Files the king stands on or crosses, start and destination included.
    /// None of them may be attacked.
    pub fn king_path(&self) -> [u8; 3] {
        match self {
            Self::KingSide => [4, 5, 6],
            Self::QueenSide => [4, 3, 2],
        }
    }

    /// Which castle, if any, a king of `color` moving to `to` would be.
    pub fn from_king_target(color: Color, to: Square) -> Option<CastleSide> {
        if to.rank() != color.back_rank() {
            return None;
        }
        CastleSide::ALL
            .into_iter()
            .find(|side| side.king_target_file() == to.file())
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::KingSide => "kingside",
            Self::QueenSide => "queenside",
        }
    }
}

/// Which castles each side may still perform. Rights are only ever taken away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    castle_kingside_white: bool,
    castle_queenside_white: bool,
    castle_kingside_black: bool,
    castle_queenside_black: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        castle_kingside_white: true,
        castle_queenside_white: true,
        castle_kingside_black: true,
        castle_queenside_black: true,
    };

    pub const NONE: CastlingRights = CastlingRights {
        castle_kingside_white: false,
        castle_queenside_white: false,
        castle_kingside_black: false,
        castle_queenside_black: false,
    };

    /// Parse the castling field of a FEN string (`KQkq`, any subset, or `-`).
    pub fn from_fen(field: &str) -> Result<Self> {
        let mut rights = CastlingRights::NONE;
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            match c {
                'K' => rights.castle_kingside_white = true,
                'Q' => rights.castle_queenside_white = true,
                'k' => rights.castle_kingside_black = true,
                'q' => rights.castle_queenside_black = true,
                other => return Err(EngineError::InvalidCastling(other)),
            }
        }
        Ok(rights)
    }

    pub fn to_fen(&self) -> String {
        let mut res = String::new();
        if self.castle_kingside_white {
            res.push('K');
        }
        if self.castle_queenside_white {
            res.push('Q');
        }
        if self.castle_kingside_black {
            res.push('k');
        }
        if self.castle_queenside_black {
            res.push('q');
        }
        if res.is_empty() {
            res.push('-');
        }
        res
    }

    pub fn has(&self, color: Color, side: CastleSide) -> bool {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => self.castle_kingside_white,
            (Color::White, CastleSide::QueenSide) => self.castle_queenside_white,
            (Color::Black, CastleSide::KingSide) => self.castle_kingside_black,
            (Color::Black, CastleSide::QueenSide) => self.castle_queenside_black,
        }
    }

    pub fn revoke(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::KingSide) => self.castle_kingside_white = false,
            (Color::White, CastleSide::QueenSide) => self.castle_queenside_white = false,
            (Color::Black, CastleSide::KingSide) => self.castle_kingside_black = false,
            (Color::Black, CastleSide::QueenSide) => self.castle_queenside_black = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, CastleSide::KingSide);
        self.revoke(color, CastleSide::QueenSide);
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        CastlingRights::ALL
    }
}

/// How a game ended. Draw rules other than stalemate are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Contains the winner
    Checkmate(Color),
    Stalemate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_char() {
        assert_eq!(Color::from_char('w'), Ok(Color::White));
        assert_eq!(Color::from_char('b'), Ok(Color::Black));
        assert_eq!(Color::from_char('g'), Err(EngineError::InvalidColor('g')));
    }

    #[test]
    fn test_other_color() {
        assert_eq!(Color::White, Color::Black.other_color());
        assert_eq!(Color::Black, Color::White.other_color());
    }

    #[test]
    fn test_piece_from_char() {
        assert_eq!(
            Piece::from_char('Q'),
            Ok(Piece::new(Color::White, PieceType::Queen))
        );
        assert_eq!(
            Piece::from_char('n'),
            Ok(Piece::new(Color::Black, PieceType::Knight))
        );
        assert_eq!(Piece::from_char('x'), Err(EngineError::InvalidPiece('x')));
        assert_eq!(Piece::from_char('.'), Err(EngineError::InvalidPiece('.')));
        assert_eq!(Piece::from_char('k').unwrap().to_char(), 'k');
    }

    #[test]
    fn test_square_from_algebraic() {
        let a8 = Square::from_algebraic("a8").unwrap();
        assert_eq!((a8.rank(), a8.file()), (0, 0));
        let h1 = Square::from_algebraic("h1").unwrap();
        assert_eq!((h1.rank(), h1.file()), (7, 7));
        let e2 = Square::from_algebraic("e2").unwrap();
        assert_eq!((e2.rank(), e2.file()), (6, 4));
        assert_eq!(e2.to_algebraic(), "e2");
        assert_eq!(e2.index(), 52);
    }

    #[test]
    fn test_square_rejects_malformed_tokens() {
        for bad in ["", "e", "e9", "i2", "e0", "e22", "2e", "ee"] {
            assert!(Square::from_algebraic(bad).is_err(), "{bad} should not parse");
        }
        assert_eq!(
            Square::new(8, 0),
            Err(EngineError::OutOfBounds { rank: 8, file: 0 })
        );
    }

    #[test]
    fn test_square_offset() {
        let a8 = Square::at(0, 0);
        assert_eq!(a8.offset(-1, 0), None);
        assert_eq!(a8.offset(1, 2), Some(Square::at(1, 2)));
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_move_from_str() {
        let m: Move = "e2 e4".parse().unwrap();
        assert_eq!(m.from, Square::at(6, 4));
        assert_eq!(m.to, Square::at(4, 4));
        assert_eq!(m.to_string(), "e2 e4");

        assert!("e2e4".parse::<Move>().is_err());
        assert!("e2 e4 e5".parse::<Move>().is_err());
        assert!("e2 z4".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_to_human() {
        let m: Move = "g8 f6".parse().unwrap();
        let knight = Piece::new(Color::Black, PieceType::Knight);
        assert_eq!(m.to_human(&knight), "black moves knight from g8 to f6");
    }

    #[test]
    fn test_castling_rights_fen() {
        let rights = CastlingRights::from_fen("Kq").unwrap();
        assert!(rights.has(Color::White, CastleSide::KingSide));
        assert!(!rights.has(Color::White, CastleSide::QueenSide));
        assert!(!rights.has(Color::Black, CastleSide::KingSide));
        assert!(rights.has(Color::Black, CastleSide::QueenSide));
        assert_eq!(rights.to_fen(), "Kq");
        assert_eq!(CastlingRights::from_fen("-").unwrap(), CastlingRights::NONE);
        assert_eq!(CastlingRights::NONE.to_fen(), "-");
        assert_eq!(
            CastlingRights::from_fen("KX"),
            Err(EngineError::InvalidCastling('X'))
        );
    }

    #[test]
    fn test_castle_side_from_king_target() {
        let g1 = Square::from_algebraic("g1").unwrap();
        let c8 = Square::from_algebraic("c8").unwrap();
        assert_eq!(
            CastleSide::from_king_target(Color::White, g1),
            Some(CastleSide::KingSide)
        );
        assert_eq!(CastleSide::from_king_target(Color::Black, g1), None);
        assert_eq!(
            CastleSide::from_king_target(Color::Black, c8),
            Some(CastleSide::QueenSide)
        );
    }
}
