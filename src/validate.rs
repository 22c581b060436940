//! Move legality in two tiers.
//!
//! [`is_pseudo_legal`] checks piece geometry and occupancy only. [`is_legal`] adds
//! check safety by playing the move on a copy of the state and asking whether the
//! mover's king is attacked afterwards. Attack detection only ever calls the raw
//! tier, which keeps the two from recursing into each other.

use crate::attacks::in_check;
use crate::board::{Board, GameState};
use crate::castling::can_castle;
use crate::execute::execute_move;
use crate::geometry::{bishop_rays, king_targets, knight_targets, rook_rays, Rays};
use crate::promotion::Promotion;
use crate::types::{CastleSide, CastlingRights, Color, Move, PieceType, Square};

/// What a raw query may consider beyond plain piece geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawMode {
    /// Squares a piece bears on. Pawns only count their capture diagonals (whether
    /// or not anything stands there), and there is no en passant or castling.
    Attack,
    /// A move by the side to move, special moves included.
    Move {
        en_passant: Option<Square>,
        castling: CastlingRights,
    },
}

/// Geometry and occupancy check for a move by `side`, ignoring whether it leaves
/// `side`'s own king in check.
pub(crate) fn raw_move(board: &Board, mv: Move, side: Color, mode: RawMode) -> bool {
    let Some(piece) = board.piece_at(mv.from) else {
        return false;
    };
    if piece.color != side || mv.from == mv.to {
        return false;
    }
    // a side can never capture its own piece
    if board.piece_at(mv.to).is_some_and(|p| p.color == side) {
        return false;
    }

    match piece.piece_type {
        PieceType::Pawn => pawn_move(board, mv, side, mode),
        PieceType::Knight => knight_targets(mv.from).contains(&mv.to),
        PieceType::Bishop => slides_to(board, bishop_rays(mv.from), mv.to),
        PieceType::Rook => slides_to(board, rook_rays(mv.from), mv.to),
        PieceType::Queen => {
            slides_to(board, rook_rays(mv.from), mv.to)
                || slides_to(board, bishop_rays(mv.from), mv.to)
        }
        PieceType::King => {
            if king_targets(mv.from).contains(&mv.to) {
                return true;
            }
            match mode {
                RawMode::Attack => false,
                RawMode::Move { castling, .. } => CastleSide::from_king_target(side, mv.to)
                    .is_some_and(|castle| can_castle(board, side, castle, castling)),
            }
        }
    }
}

fn pawn_move(board: &Board, mv: Move, side: Color, mode: RawMode) -> bool {
    let direction = side.pawn_direction();
    let rank_delta = mv.to.rank() as i8 - mv.from.rank() as i8;
    let file_delta = (mv.to.file() as i8 - mv.from.file() as i8).abs();

    if file_delta == 1 && rank_delta == direction {
        return match mode {
            RawMode::Attack => true,
            // the captured pawn of an en passant capture sits behind the target
            RawMode::Move { en_passant, .. } => match board.piece_at(mv.to) {
                Some(target) => target.color != side,
                None => en_passant == Some(mv.to),
            },
        };
    }

    if mode == RawMode::Attack || file_delta != 0 || !board.is_empty(mv.to) {
        return false;
    }
    if rank_delta == direction {
        return true;
    }
    rank_delta == 2 * direction
        && mv.from.rank() == side.pawn_home_rank()
        && mv
            .from
            .offset(direction, 0)
            .is_some_and(|skipped| board.is_empty(skipped))
}

/// `to` lies on one of the rays and every square before it on that ray is empty.
fn slides_to(board: &Board, rays: &Rays, to: Square) -> bool {
    rays.iter().any(|ray| {
        ray.contains(&to)
            && ray
                .iter()
                .take_while(|&&sq| sq != to)
                .all(|&sq| board.is_empty(sq))
    })
}

/// Is `mv` a valid move for the side to move, not accounting for check.
pub fn is_pseudo_legal(state: &GameState, mv: Move) -> bool {
    raw_move(
        &state.board,
        mv,
        state.side_to_move,
        RawMode::Move {
            en_passant: state.en_passant,
            castling: state.castling,
        },
    )
}

/// Is `mv` legal for the side to move: a valid move that does not leave the
/// mover's own king in check.
pub fn is_legal(state: &GameState, mv: Move) -> bool {
    if !is_pseudo_legal(state, mv) {
        return false;
    }
    // The promotion choice cannot change whether our own king is attacked, so the
    // simulation never bothers the caller's provider.
    let after = execute_move(state, mv, &mut Promotion::Queen);
    !in_check(&after.board, state.side_to_move)
}
