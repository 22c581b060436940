use log::debug;

use crate::board::GameState;
use crate::castling::can_castle;
use crate::error::{EngineError, Result};
use crate::promotion::PromotionProvider;
use crate::types::{CastleSide, Color, Move, Piece, PieceType, Square, KING_HOME_FILE};
use crate::validate::is_legal;

/// Which castle, if any, `mv` is for a king of `color`: the king leaves its home
/// square for the g- or c-file of the same rank.
fn castle_pattern(color: Color, piece: Piece, mv: Move) -> Option<CastleSide> {
    let home = Square::at(color.back_rank(), KING_HOME_FILE);
    if piece.piece_type != PieceType::King || mv.from != home {
        return None;
    }
    CastleSide::from_king_target(color, mv.to)
}

/// The corner rook a castling right belongs to, if `sq` is one of them.
fn rook_corner(color: Color, sq: Square) -> Option<CastleSide> {
    if sq.rank() != color.back_rank() {
        return None;
    }
    CastleSide::ALL
        .into_iter()
        .find(|side| side.rook_file() == sq.file())
}

/// Play `mv` and return the resulting state, side to move toggled.
///
/// This performs no legality checks. It must only be given moves that passed
/// [`is_legal`] (or [`crate::validate::is_pseudo_legal`] while simulating).
/// `promotion` is consulted only when a pawn reaches the last rank.
pub fn execute_move<P: PromotionProvider + ?Sized>(
    state: &GameState,
    mv: Move,
    promotion: &mut P,
) -> GameState {
    let mut next = *state;
    let color = state.side_to_move;
    let Some(piece) = next.board.take(mv.from) else {
        panic!("No piece on {} to move, the move was never validated", mv.from);
    };
    next.side_to_move = color.other_color();
    next.en_passant = None;

    if let Some(side) = castle_pattern(color, piece, mv) {
        if can_castle(&state.board, color, side, state.castling) {
            let rank = color.back_rank();
            let rook = next.board.take(Square::at(rank, side.rook_file()));
            next.board.set(mv.to, Some(piece));
            next.board.set(Square::at(rank, side.rook_target_file()), rook);
            next.castling.revoke_all(color);
            return next;
        }
    }

    if piece.piece_type == PieceType::Pawn
        && mv.from.file() != mv.to.file()
        && state.en_passant == Some(mv.to)
        && state.board.is_empty(mv.to)
    {
        // the captured pawn stands beside us, behind the target square
        next.board.take(Square::at(mv.from.rank(), mv.to.file()));
    }

    let captured = next.board.take(mv.to);
    next.board.set(mv.to, Some(piece));

    if piece.piece_type == PieceType::Pawn {
        if mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            next.en_passant = Some(Square::at((mv.from.rank() + mv.to.rank()) / 2, mv.from.file()));
        }
        if mv.to.rank() == color.promotion_rank() {
            let choice = promotion.choose(color);
            next.board
                .set(mv.to, Some(Piece::new(color, choice.piece_type())));
        }
    }

    match piece.piece_type {
        PieceType::King => next.castling.revoke_all(color),
        PieceType::Rook => {
            if let Some(side) = rook_corner(color, mv.from) {
                next.castling.revoke(color, side);
            }
        }
        _ => {}
    }

    // a rook taken in its corner can never castle again
    if let Some(taken) = captured {
        if taken.piece_type == PieceType::Rook {
            if let Some(side) = rook_corner(taken.color, mv.to) {
                next.castling.revoke(taken.color, side);
            }
        }
    }

    next
}

/// Play a legal move.
///
/// # Panics
///
/// Panics if `mv` is not legal for the side to move. Applying an unvalidated move
/// would silently corrupt the position, so this is treated as a bug in the caller.
/// Use [`try_apply_move`] to get an error instead.
pub fn apply_move<P: PromotionProvider + ?Sized>(
    state: &GameState,
    mv: Move,
    promotion: &mut P,
) -> GameState {
    match try_apply_move(state, mv, promotion) {
        Ok(next) => next,
        Err(err) => panic!("{err} in position {}", state.to_fen()),
    }
}

/// Play `mv` if it is legal, otherwise return [`EngineError::IllegalMove`] and
/// leave everything as it was.
pub fn try_apply_move<P: PromotionProvider + ?Sized>(
    state: &GameState,
    mv: Move,
    promotion: &mut P,
) -> Result<GameState> {
    if !is_legal(state, mv) {
        debug!("rejected {} for {}", mv, state.side_to_move);
        return Err(EngineError::IllegalMove {
            mv,
            side: state.side_to_move,
        });
    }
    let next = execute_move(state, mv, promotion);
    debug!("{} played {} -> {}", state.side_to_move, mv, next.to_fen());
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotion::Promotion;
    use crate::types::CastlingRights;
    use pretty_assertions::assert_eq;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn state(fen: &str) -> GameState {
        GameState::from_fen(fen).unwrap()
    }

    fn play(state: &GameState, m: &str) -> GameState {
        apply_move(state, mv(m), &mut Promotion::Queen)
    }

    #[test]
    fn test_simple_move_toggles_side() {
        let s = GameState::new();
        let next = play(&s, "g1 f3");
        assert_eq!(next.side_to_move(), Color::Black);
        assert!(next.board().is_empty(sq("g1")));
        assert_eq!(
            next.board().piece_at(sq("f3")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
        assert_eq!(next.en_passant_target(), None);
        // the original is untouched
        assert_eq!(s, GameState::new());
    }

    #[test]
    fn test_double_push_sets_en_passant_target() {
        let next = play(&GameState::new(), "e2 e4");
        assert_eq!(next.en_passant_target(), Some(sq("e3")));
        let next = play(&next, "c7 c5");
        assert_eq!(next.en_passant_target(), Some(sq("c6")));
        let next = play(&next, "g1 f3");
        assert_eq!(next.en_passant_target(), None);
    }

    #[test]
    fn test_en_passant_removes_captured_pawn() {
        let s = state("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 1");
        let next = play(&s, "d5 e6");
        assert_eq!(
            next.to_fen(),
            "4k3/8/4P3/8/8/8/8/4K3 b - - 0 1"
        );
    }

    #[test]
    fn test_castling_moves_both_pieces() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "e1 g1");
        assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 0 1");
        let next = play(&next, "e8 c8");
        assert_eq!(next.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 0 1");
    }

    #[test]
    fn test_king_move_revokes_both_rights() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "e1 e2");
        assert!(!next.castling_rights().has(Color::White, CastleSide::KingSide));
        assert!(!next.castling_rights().has(Color::White, CastleSide::QueenSide));
        assert!(next.castling_rights().has(Color::Black, CastleSide::KingSide));
        // moving back does not bring them back
        let next = play(&play(&next, "a8 b8"), "e2 e1");
        assert_eq!(next.castling_rights().to_fen(), "k");
    }

    #[test]
    fn test_rook_move_revokes_one_right() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "h1 h2");
        assert_eq!(next.castling_rights().to_fen(), "Qkq");
        let next = play(&next, "a8 a7");
        assert_eq!(next.castling_rights().to_fen(), "Qk");
    }

    #[test]
    fn test_capturing_corner_rook_revokes_right() {
        let s = state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = play(&s, "a1 a8");
        assert_eq!(next.castling_rights().to_fen(), "Kk");
    }

    #[test]
    fn test_promotion_asks_provider_once() {
        let s = state("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1");
        let mut asked = Vec::new();
        let mut provider = |color: Color| {
            asked.push(color);
            Promotion::Knight
        };
        let next = apply_move(&s, mv("e7 e8"), &mut provider);
        assert_eq!(asked, vec![Color::White]);
        assert_eq!(
            next.board().piece_at(sq("e8")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
    }

    #[test]
    fn test_non_promoting_move_never_asks() {
        let mut asked = 0;
        let mut provider = |_: Color| {
            asked += 1;
            Promotion::Queen
        };
        apply_move(&GameState::new(), mv("e2 e4"), &mut provider);
        assert_eq!(asked, 0);
    }

    #[test]
    fn test_black_promotes_on_first_rank() {
        let s = state("4k3/8/8/8/8/8/1p6/R3K3 b Q - 0 1");
        let next = apply_move(&s, mv("b2 a1"), &mut Promotion::Rook);
        assert_eq!(
            next.board().piece_at(sq("a1")),
            Some(Piece::new(Color::Black, PieceType::Rook))
        );
        assert_eq!(next.castling_rights(), CastlingRights::NONE);
    }

    #[test]
    fn test_try_apply_illegal_move() {
        let s = GameState::new();
        assert_eq!(
            try_apply_move(&s, mv("e2 e5"), &mut Promotion::Queen),
            Err(EngineError::IllegalMove {
                mv: mv("e2 e5"),
                side: Color::White
            })
        );
    }

    #[test]
    #[should_panic]
    fn test_apply_illegal_move_panics() {
        play(&GameState::new(), "e1 e2");
    }
}
