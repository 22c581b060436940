use crate::board::Board;
use crate::types::{Color, Move, PieceType, Square};
use crate::validate::{raw_move, RawMode};

/// Whether any piece of `by_color` bears on `square` with the board as it is.
///
/// This only asks the raw validator in attack mode, which never looks at check
/// safety, en passant or castling, so it cannot recurse back into full legality.
pub fn square_attacked(board: &Board, square: Square, by_color: Color) -> bool {
    board
        .pieces(by_color)
        .any(|(from, _)| raw_move(board, Move::new(from, square), by_color, RawMode::Attack))
}

pub fn find_king(board: &Board, color: Color) -> Option<Square> {
    board
        .pieces(color)
        .find(|(_, p)| p.piece_type == PieceType::King)
        .map(|(sq, _)| sq)
}

/// True if `color`'s king is attacked. A board without that king is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    match find_king(board, color) {
        Some(king) => square_attacked(board, king, color.other_color()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GameState;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(fen: &str) -> Board {
        *GameState::from_fen(fen).unwrap().board()
    }

    #[test]
    fn test_rook_attack_is_blocked() {
        // . . . . . . . .
        // . . . ♜ . . . .
        // . . . . . . . .
        // . . . . . . . .
        // . . . ♖ . . . .
        // . . . . . . . .
        // . . . ♔ . . . .
        // . . . . . . . .
        let b = board("8/3r4/8/8/3R4/8/3K4/8 w - - 0 1");
        assert!(square_attacked(&b, sq("d4"), Color::Black));
        assert!(!square_attacked(&b, sq("d3"), Color::Black));
        assert!(!square_attacked(&b, sq("d2"), Color::Black));
        assert!(!in_check(&b, Color::White));
        assert!(square_attacked(&b, sq("a7"), Color::Black));
    }

    #[test]
    fn test_pawns_attack_diagonals_only() {
        let b = board("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert!(square_attacked(&b, sq("d3"), Color::White));
        assert!(square_attacked(&b, sq("f3"), Color::White));
        // a push is not an attack
        assert!(!square_attacked(&b, sq("e3"), Color::White));
        assert!(!square_attacked(&b, sq("e4"), Color::White));
    }

    #[test]
    fn test_knight_and_king_attacks() {
        let b = board("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1");
        assert!(square_attacked(&b, sq("c3"), Color::White));
        assert!(square_attacked(&b, sq("d2"), Color::White));
        assert!(square_attacked(&b, sq("f2"), Color::White));
        assert!(!square_attacked(&b, sq("e3"), Color::White));
        assert!(square_attacked(&b, sq("d7"), Color::Black));
    }

    #[test]
    fn test_in_check() {
        let b = board("4k3/8/8/8/8/8/8/4K2q w - - 0 1");
        assert!(in_check(&b, Color::White));
        assert!(!in_check(&b, Color::Black));

        let b = board("4k3/8/8/8/1b6/8/3P4/4K3 w - - 0 1");
        assert!(!in_check(&b, Color::White));
    }

    #[test]
    fn test_no_king_is_not_check() {
        let b = board("8/8/8/8/8/8/8/3q4 w - - 0 1");
        assert_eq!(find_king(&b, Color::White), None);
        assert!(!in_check(&b, Color::White));
    }
}
