use crate::engine::{Board, SIZE};

/// Amplifies the distance penalty of every tile.
const DISTANCE_WEIGHT: f64 = 5.0;

const CORNERS: [(usize, usize); 4] = [(0, 0), (0, SIZE - 1), (SIZE - 1, 0), (SIZE - 1, SIZE - 1)];

/// Corner-weighted board value.
///
/// Each tile costs `distance * value * 5`, distance being the Manhattan
/// distance to a corner. The board is scored against whichever corner it is
/// already best aligned to, so the result is the maximum (least negative)
/// of the four corner sums. A board stacked into a corner scores near zero.
///
/// ```
/// use term_2048::engine::Board;
/// use term_2048::expectimax::score_state;
/// let cornered = Board::from_rows([[512, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
/// let centered = Board::from_rows([[0; 4], [0, 512, 0, 0], [0; 4], [0; 4]]);
/// assert_eq!(score_state(&cornered), 0.0);
/// assert!(score_state(&centered) < score_state(&cornered));
/// ```
pub fn score_state(board: &Board) -> f64 {
    CORNERS
        .iter()
        .map(|&corner| corner_score(board, corner))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn corner_score(board: &Board, (corner_row, corner_col): (usize, usize)) -> f64 {
    board.tiles().fold(0.0, |acc, (row, col, val)| {
        let distance = row.abs_diff(corner_row) + col.abs_diff(corner_col);
        acc - distance as f64 * val as f64 * DISTANCE_WEIGHT
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::engine::Move;

    fn rotate_180(board: &Board) -> Board {
        let rows = board.to_rows();
        let mut out = [[0u32; SIZE]; SIZE];
        for r in 0..SIZE {
            for c in 0..SIZE {
                out[SIZE - 1 - r][SIZE - 1 - c] = rows[r][c];
            }
        }
        Board::from_rows(out)
    }

    #[test]
    fn it_scores_empty_board_zero() {
        assert_eq!(score_state(&Board::EMPTY), 0.0);
    }

    #[test]
    fn it_picks_best_corner() {
        // (1,1) is 2 steps from the top-left corner: -(2 * 4 * 5)
        let b = Board::from_rows([[0; 4], [0, 4, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(score_state(&b), -40.0);
        // two tiles pulling toward opposite corners
        let b = Board::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 8]]);
        // against (3,3): 2 is 6 away -> -60; against (0,0): 8 is 6 away -> -240
        assert_eq!(score_state(&b), -60.0);
    }

    #[test]
    fn it_is_invariant_under_half_turn() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut board = Board::new_game(&mut rng);
        for i in 0..200 {
            board = board.make_move(Move::ALL[(i * 7 + i / 3) % 4], &mut rng);
            if board.outcome().is_terminal() {
                board = Board::new_game(&mut rng);
            }
            assert_eq!(score_state(&board), score_state(&rotate_180(&board)));
        }
    }

    #[test]
    fn it_is_never_positive() {
        let b = Board::from_rows([[2, 4, 8, 16], [32, 64, 128, 256], [0; 4], [0; 4]]);
        assert!(score_state(&b) <= 0.0);
    }
}
