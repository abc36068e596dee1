//! Minimax AI 策略

use super::{sort_and_truncate, AIConfig, AIStrategy, ScoredMove, NODE_COUNT};
use crate::rules;
use crate::state::MatchState;
use crate::types::{Color, PlannedMove, Position, Symbol};
use log::debug;
use std::sync::atomic::Ordering;

/// 搜索到深度 0 仍未分出胜负时的固定分
pub const LEAF_SCORE: i32 = -1;

/// Minimax AI - 使用 Alpha-Beta 剪枝
///
/// 以 AI 自己的颜色为最大化方。获胜分为 `(格子数 - 2) * 100 / 剩余深度`，
/// 和棋为 0，到达深度 0 为固定的 `LEAF_SCORE`。
pub struct MinimaxAI {
    depth: u32,
    positional: bool,
    /// 本子回合选定的走法
    planned: Option<PlannedMove>,
}

impl MinimaxAI {
    pub fn new(config: &AIConfig) -> Self {
        MinimaxAI {
            depth: config.depth.max(1),
            positional: config.positional,
            planned: None,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 获胜分的基数
    fn win_base(state: &MatchState) -> i32 {
        (state.board().area() as i32 - 2) * 100
    }

    /// 对每个根节点走法做完整窗口搜索，按分数从高到低排序（同分保持生成顺序）
    pub fn score_root_moves(&self, state: &mut MatchState) -> Vec<ScoredMove> {
        let ai = state.to_play();
        let mut scored: Vec<ScoredMove> = state
            .candidate_moves()
            .into_iter()
            .map(|mv| {
                let mut sim = state.simulate(mv);
                let score = self.minimax(&mut sim, self.depth - 1, i32::MIN, i32::MAX, ai);
                ScoredMove { mv, score }
            })
            .collect();
        let len = scored.len();
        sort_and_truncate(&mut scored, len);
        scored
    }

    /// 最佳走法：分数严格更高才替换，同分保留先找到的
    pub fn best_move(&self, state: &mut MatchState) -> Option<ScoredMove> {
        let ai = state.to_play();
        let mut alpha = i32::MIN;
        let mut best: Option<ScoredMove> = None;

        for mv in state.candidate_moves() {
            let score = {
                let mut sim = state.simulate(mv);
                self.minimax(&mut sim, self.depth - 1, alpha, i32::MAX, ai)
            };
            if best.map_or(true, |b| score > b.score) {
                best = Some(ScoredMove { mv, score });
            }
            alpha = alpha.max(score);
        }
        best
    }

    /// 图腾已移动后，只在放置格中选择
    fn best_insertion(&self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        let ai = state.to_play();
        let mut alpha = i32::MIN;
        let mut best: Option<(Position, i32)> = None;

        for pos in state.valid_inserts(totem) {
            let score = {
                let mut sim = state.simulate_insert(totem, pos);
                self.minimax(&mut sim, self.depth - 1, alpha, i32::MAX, ai)
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((pos, score));
            }
            alpha = alpha.max(score);
        }
        best.map(|(pos, _)| pos)
    }

    /// 刚走完一步后的局面评估
    fn minimax(
        &self,
        state: &mut MatchState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ai: Color,
    ) -> i32 {
        NODE_COUNT.fetch_add(1, Ordering::Relaxed);

        if state.has_winner() {
            // 刚放置棋子的一方获胜
            let winner = state.to_play().opposite();
            let magnitude = Self::win_base(state) / depth.max(1) as i32;
            return if winner == ai { magnitude } else { -magnitude };
        }
        if state.is_draw() {
            return 0;
        }
        if depth == 0 {
            return if self.positional {
                rules::evaluate_position(state.board(), ai)
            } else {
                LEAF_SCORE
            };
        }

        let moves = state.candidate_moves();
        if moves.is_empty() {
            return 0;
        }

        if state.to_play() == ai {
            let mut max_eval = i32::MIN;
            for mv in moves {
                let eval = {
                    let mut sim = state.simulate(mv);
                    self.minimax(&mut sim, depth - 1, alpha, beta, ai)
                };
                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break; // Beta 剪枝
                }
            }
            max_eval
        } else {
            let mut min_eval = i32::MAX;
            for mv in moves {
                let eval = {
                    let mut sim = state.simulate(mv);
                    self.minimax(&mut sim, depth - 1, alpha, beta, ai)
                };
                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break; // Alpha 剪枝
                }
            }
            min_eval
        }
    }
}

impl AIStrategy for MinimaxAI {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn choose_totem(&mut self, state: &mut MatchState) -> Option<Symbol> {
        let best = self.best_move(state)?;
        debug!("minimax depth {} chose {} ({})", self.depth, best.mv, best.score);
        self.planned = Some(best.mv);
        Some(best.mv.totem)
    }

    fn choose_destination(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        match self.planned {
            Some(mv) if mv.totem == totem => Some(mv.destination),
            _ => {
                self.planned = None;
                state.valid_moves(totem).first().copied()
            }
        }
    }

    fn choose_insertion(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        match self.planned.take() {
            Some(mv) if mv.totem == totem && state.board().totem_position(totem) == mv.destination => {
                Some(mv.insertion)
            }
            _ => self.best_insertion(state, totem),
        }
    }

    fn select_moves(&mut self, state: &mut MatchState, n: usize) -> Vec<ScoredMove> {
        let mut scored = self.score_root_moves(state);
        scored.truncate(n);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{get_node_count, winning_move};
    use crate::test_positions;

    fn minimax(depth: u32) -> MinimaxAI {
        MinimaxAI::new(&AIConfig {
            depth,
            ..Default::default()
        })
    }

    /// 走完之后对手没有立即获胜的应手（或自己已经获胜）
    fn is_safe(state: &mut MatchState, mv: PlannedMove) -> bool {
        let mut sim = state.simulate(mv);
        sim.has_winner() || winning_move(&mut sim).is_none()
    }

    #[test]
    fn test_takes_immediate_win() {
        let expected = PlannedMove::new(Symbol::O, Position::new(3, 1), Position::new(3, 0));
        for depth in 1..=2 {
            let mut state = MatchState::from_notation(test_positions::ONE_WIN).unwrap();
            let best = minimax(depth).best_move(&mut state).unwrap();
            assert_eq!(best.mv, expected, "depth {}", depth);
            assert_eq!(best.score, 3400);
            assert_eq!(state.to_notation(), test_positions::ONE_WIN);
        }
    }

    #[test]
    fn test_root_scores() {
        let mut state = MatchState::from_notation(test_positions::ONE_WIN).unwrap();
        let scored = minimax(1).score_root_moves(&mut state);
        assert_eq!(scored.len(), state.candidate_moves().len());
        assert_eq!(scored[0].score, 3400);
        assert!(scored[1..].iter().all(|sm| sm.score == LEAF_SCORE));
    }

    #[test]
    fn test_avoids_immediate_loss() {
        let mut state = MatchState::from_notation(test_positions::THREAT).unwrap();
        assert_eq!(winning_move(&mut state), None);

        let candidates = state.candidate_moves();
        let safe: Vec<PlannedMove> = candidates
            .iter()
            .copied()
            .filter(|&mv| is_safe(&mut state, mv))
            .collect();
        assert!(!safe.is_empty());
        assert!(safe.len() < candidates.len());

        let best = minimax(2).best_move(&mut state).unwrap();
        assert!(safe.contains(&best.mv), "chose losing move {}", best.mv);
        assert_eq!(best.score, LEAF_SCORE);
    }

    #[test]
    fn test_safe_choice_on_small_boards() {
        for notation in [test_positions::SMALL_1, test_positions::SMALL_2, test_positions::THREAT] {
            let mut state = MatchState::from_notation(notation).unwrap();
            let candidates = state.candidate_moves();
            let any_safe = candidates.iter().any(|&mv| is_safe(&mut state, mv));
            let best = minimax(2).best_move(&mut state).unwrap();
            if any_safe {
                assert!(is_safe(&mut state, best.mv), "{}: {}", notation, best.mv);
            }
            assert_eq!(state.to_notation(), notation);
        }
    }

    #[test]
    fn test_deeper_search_keeps_state() {
        let mut state = MatchState::from_notation(test_positions::SMALL_1).unwrap();
        let before = state.to_notation();
        let mut ai = minimax(3);
        let totem = ai.choose_totem(&mut state).unwrap();
        let dest = ai.choose_destination(&mut state, totem).unwrap();
        assert!(state.is_valid_move(totem, dest));
        assert_eq!(state.to_notation(), before);
        assert!(get_node_count() > 0);
    }

    #[test]
    fn test_positional_leaves() {
        let mut state = MatchState::from_notation(test_positions::THREAT).unwrap();
        let ai = MinimaxAI::new(&AIConfig {
            depth: 1,
            positional: true,
            ..Default::default()
        });
        let scored = ai.score_root_moves(&mut state);
        assert!(!scored.is_empty());
        assert!(scored.windows(2).all(|w| w[0].score >= w[1].score));
        let top = scored[0];
        let expected = {
            let sim = state.simulate(top.mv);
            rules::evaluate_position(sim.board(), Color::Pink)
        };
        assert_eq!(top.score, expected);
    }

    #[test]
    fn test_insertion_search_after_real_move() {
        let mut state = MatchState::from_notation(test_positions::ONE_WIN).unwrap();
        let mut ai = minimax(1);
        let mut sim = state.simulate_move(Symbol::O, Position::new(3, 1));
        assert_eq!(ai.choose_insertion(&mut sim, Symbol::O), Some(Position::new(3, 0)));
    }
}
