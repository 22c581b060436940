use log::debug;
use rayon::prelude::*;

use crate::board::GameState;
use crate::execute::execute_move;
use crate::promotion::Promotion;
use crate::terminal::legal_moves;
use crate::types::{Move, PieceType};

fn is_promotion(state: &GameState, mv: Move) -> bool {
    state
        .board()
        .piece_at(mv.from)
        .is_some_and(|p| p.piece_type == PieceType::Pawn)
        && mv.to.rank() == state.side_to_move().promotion_rank()
}

/// States reachable by playing `mv`. A promotion branches into one state per
/// piece, the way reference perft tables count them.
fn successors(state: &GameState, mv: Move) -> Vec<GameState> {
    if is_promotion(state, mv) {
        Promotion::ALL
            .into_iter()
            .map(|mut choice| execute_move(state, mv, &mut choice))
            .collect()
    } else {
        vec![execute_move(state, mv, &mut Promotion::Queen)]
    }
}

/// Count the leaf nodes of the legal move tree `depth` plies deep.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for mv in legal_moves(state) {
        for child in successors(state, mv) {
            nodes += perft(&child, depth - 1);
        }
    }
    nodes
}

/// Leaf counts below each root move.
pub fn divide(state: &GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return vec![];
    }
    legal_moves(state)
        .into_iter()
        .map(|mv| {
            let nodes: u64 = successors(state, mv)
                .iter()
                .map(|child| perft(child, depth - 1))
                .sum();
            (mv, nodes)
        })
        .collect()
}

/// Same count as [`perft`], with the root moves spread over the rayon pool. Every
/// worker gets its own copies of the positions it explores.
pub fn perft_parallel(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let children: Vec<GameState> = legal_moves(state)
        .into_iter()
        .flat_map(|mv| successors(state, mv))
        .collect();
    let nodes: u64 = children
        .par_iter()
        .map(|child| perft(child, depth - 1))
        .sum();
    debug!("perft({depth}) = {nodes} for {}", state.to_fen());
    nodes
}

/// Perft from starting position
///
/// https://www.chessprogramming.org/Perft_Results
///
/// | Depth | Nodes     |
/// | ----- | --------- |
/// | 0     | 1         |
/// | 1     | 20        |
/// | 2     | 400       |
/// | 3     | 8,902     |
/// | 4     | 197,281   |
/// | 5     | 4,865,609 |
pub fn expected_start_node_count(depth: u8) -> Option<u64> {
    match depth {
        0 => Some(1),
        1 => Some(20),
        2 => Some(400),
        3 => Some(8902),
        4 => Some(197_281),
        5 => Some(4_865_609),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DEPTH: u8 = 3;

    #[test]
    fn perft_start() {
        let state = GameState::new();
        for depth in 0..=MAX_DEPTH {
            println!("Depth {}", depth);
            assert_eq!(expected_start_node_count(depth), Some(perft(&state, depth)));
        }
    }

    #[test]
    fn perft_parallel_matches() {
        let state = GameState::new();
        assert_eq!(perft_parallel(&state, 2), perft(&state, 2));
    }

    #[test]
    fn divide_sums_to_perft() {
        let state = GameState::new();
        let split = divide(&state, 2);
        assert_eq!(split.len(), 20);
        assert!(split.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }

    /// "Kiwipete", heavy on castling, pins and en passant.
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 48
    /// 2     | 2,039
    #[test]
    fn perft_kiwipete() {
        let state = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&state, 1), 48);
        assert_eq!(perft(&state, 2), 2039);
    }

    /// Position 3, en passant and discovered checks along the rank.
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 14
    /// 2     | 191
    /// 3     | 2,812
    #[test]
    fn perft_pos_3() {
        let state = GameState::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        let expected = vec![1, 14, 191, 2_812];
        for depth in 1..expected.len() {
            assert_eq!(expected[depth], perft(&state, depth as u8));
        }
    }

    /// Position 4, starts in check with promotions one ply away.
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 6
    /// 2     | 264
    #[test]
    fn perft_pos_4() {
        let state = GameState::from_fen(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&state, 1), 6);
        assert_eq!(perft(&state, 2), 264);
    }

    /// Run the perft test on the "position 5" from
    /// https://www.chessprogramming.org/Perft_Results
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 44
    /// 2     | 1,486
    #[test]
    fn perft_pos_5() {
        let state =
            GameState::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8")
                .unwrap();
        assert_eq!(perft(&state, 1), 44);
        assert_eq!(perft(&state, 2), 1486);
    }
}
