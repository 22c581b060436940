//! Precomputed per-square reachability tables.
//!
//! Knight and king tables list every destination one jump away. Rook and bishop
//! tables hold, for each of their four directions, the squares from the origin to
//! the edge of the board ordered nearest first, so the first occupied square on a
//! ray is the first one a sliding piece runs into. Move validation and attack
//! detection both walk the same rays.

use once_cell::sync::Lazy;

use crate::types::Square;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Four rays out of a square, one per direction, each ordered nearest first.
pub type Rays = [Vec<Square>; 4];

pub struct GeometryTables {
    knight: [Vec<Square>; 64],
    king: [Vec<Square>; 64],
    rook: [Rays; 64],
    bishop: [Rays; 64],
}

impl GeometryTables {
    pub fn new() -> Self {
        let squares: Vec<Square> = Square::all().collect();
        Self {
            knight: std::array::from_fn(|i| jump_targets(squares[i], &KNIGHT_DELTAS)),
            king: std::array::from_fn(|i| jump_targets(squares[i], &KING_DELTAS)),
            rook: std::array::from_fn(|i| rays_from(squares[i], &ROOK_DIRECTIONS)),
            bishop: std::array::from_fn(|i| rays_from(squares[i], &BISHOP_DIRECTIONS)),
        }
    }
}

impl Default for GeometryTables {
    fn default() -> Self {
        Self::new()
    }
}

fn jump_targets(from: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(rank_delta, file_delta)| from.offset(rank_delta, file_delta))
        .collect()
}

fn ray(from: Square, (rank_delta, file_delta): (i8, i8)) -> Vec<Square> {
    std::iter::successors(from.offset(rank_delta, file_delta), |sq| {
        sq.offset(rank_delta, file_delta)
    })
    .collect()
}

fn rays_from(from: Square, directions: &[(i8, i8); 4]) -> Rays {
    directions.map(|direction| ray(from, direction))
}

/// Built on first use and never written to again.
pub static GEOMETRY: Lazy<GeometryTables> = Lazy::new(GeometryTables::new);

pub fn knight_targets(sq: Square) -> &'static [Square] {
    &GEOMETRY.knight[sq.index()]
}

/// Adjacent squares only; castling is not a king step.
pub fn king_targets(sq: Square) -> &'static [Square] {
    &GEOMETRY.king[sq.index()]
}

pub fn rook_rays(sq: Square) -> &'static Rays {
    &GEOMETRY.rook[sq.index()]
}

pub fn bishop_rays(sq: Square) -> &'static Rays {
    &GEOMETRY.bishop[sq.index()]
}
