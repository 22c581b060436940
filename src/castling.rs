use log::trace;

use crate::attacks::square_attacked;
use crate::board::Board;
use crate::types::{CastleSide, CastlingRights, Color, Piece, PieceType, Square, KING_HOME_FILE};

/// Can `color` castle on `side` right now.
///
/// The right must still be held, king and rook must stand on their original
/// squares, everything between them must be empty, and none of the squares the
/// king starts on, crosses or lands on may be attacked. Each of those squares is
/// tested on its own copy of the board with the king standing on it.
pub fn can_castle(board: &Board, color: Color, side: CastleSide, rights: CastlingRights) -> bool {
    if !rights.has(color, side) {
        return false;
    }

    let rank = color.back_rank();
    let king_square = Square::at(rank, KING_HOME_FILE);
    let rook_square = Square::at(rank, side.rook_file());
    if board.piece_at(king_square) != Some(Piece::new(color, PieceType::King))
        || board.piece_at(rook_square) != Some(Piece::new(color, PieceType::Rook))
    {
        trace!("{} cannot castle {}: king or rook has left its square", color, side.to_human());
        return false;
    }

    if side
        .files_between()
        .any(|file| !board.is_empty(Square::at(rank, file)))
    {
        trace!("{} cannot castle {}: path is blocked", color, side.to_human());
        return false;
    }

    let opponent = color.other_color();
    let attacked = side.king_path().into_iter().find(|&file| {
        let square = Square::at(rank, file);
        let scratch = board.with_piece_moved(king_square, square);
        square_attacked(&scratch, square, opponent)
    });
    if let Some(file) = attacked {
        trace!(
            "{} cannot castle {}: {} is attacked",
            color,
            side.to_human(),
            Square::at(rank, file)
        );
        return false;
    }
    true
}
