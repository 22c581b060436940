use log::debug;

use crate::attacks::in_check;
use crate::board::GameState;
use crate::types::{Move, Square, Status};
use crate::validate::is_legal;

/// Every legal move for the side to move, tried origin by origin over all 64
/// destinations.
pub fn legal_move_iter(state: &GameState) -> impl Iterator<Item = Move> + '_ {
    state
        .board
        .pieces(state.side_to_move)
        .flat_map(|(from, _)| Square::all().map(move |to| Move::new(from, to)))
        .filter(move |&mv| is_legal(state, mv))
}

pub fn legal_moves(state: &GameState) -> Vec<Move> {
    legal_move_iter(state).collect()
}

/// Stops at the first legal move found.
pub fn has_legal_move(state: &GameState) -> bool {
    legal_move_iter(state).next().is_some()
}

pub fn is_checkmate(state: &GameState) -> bool {
    in_check(&state.board, state.side_to_move) && !has_legal_move(state)
}

pub fn is_stalemate(state: &GameState) -> bool {
    !in_check(&state.board, state.side_to_move) && !has_legal_move(state)
}

/// `None` while the side to move still has a legal move.
pub fn status(state: &GameState) -> Option<Status> {
    if has_legal_move(state) {
        return None;
    }
    let status = if in_check(&state.board, state.side_to_move) {
        Status::Checkmate(state.side_to_move.other_color())
    } else {
        Status::Stalemate
    };
    debug!("{:?} in {}", status, state.to_fen());
    Some(status)
}
