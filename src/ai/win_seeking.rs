//! 一步求胜 AI 策略

use super::{AIConfig, AIStrategy, RandomAI};
use crate::state::MatchState;
use crate::types::{PlannedMove, Position, Symbol};
use log::debug;

/// 一步求胜 AI - 有立即获胜的走法就走，否则随机
pub struct WinSeekingAI {
    fallback: RandomAI,
    /// 本子回合已找到的获胜走法
    planned: Option<PlannedMove>,
}

impl WinSeekingAI {
    pub fn new(config: &AIConfig) -> Self {
        WinSeekingAI {
            fallback: RandomAI::new(config.seed),
            planned: None,
        }
    }
}

/// 按候选顺序试走，返回第一个立即获胜的走法
pub fn winning_move(state: &mut MatchState) -> Option<PlannedMove> {
    state
        .candidate_moves()
        .into_iter()
        .find(|&mv| state.simulate(mv).has_winner())
}

impl AIStrategy for WinSeekingAI {
    fn name(&self) -> &'static str {
        "win_seeking"
    }

    fn choose_totem(&mut self, state: &mut MatchState) -> Option<Symbol> {
        self.planned = winning_move(state);
        match self.planned {
            Some(mv) => {
                debug!("winning move found: {}", mv);
                Some(mv.totem)
            }
            None => self.fallback.choose_totem(state),
        }
    }

    fn choose_destination(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        match self.planned {
            Some(mv) if mv.totem == totem => Some(mv.destination),
            _ => {
                self.planned = None;
                self.fallback.choose_destination(state, totem)
            }
        }
    }

    fn choose_insertion(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        match self.planned.take() {
            Some(mv) if mv.totem == totem && state.board().totem_position(totem) == mv.destination => {
                Some(mv.insertion)
            }
            _ => self.fallback.choose_insertion(state, totem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AIEngine;
    use crate::game::Game;
    use crate::test_positions;
    use crate::types::{Color, Phase};

    #[test]
    fn test_finds_unique_win() {
        let mut state = MatchState::from_notation(test_positions::ONE_WIN).unwrap();
        let expected = PlannedMove::new(Symbol::O, Position::new(3, 1), Position::new(3, 0));
        assert_eq!(winning_move(&mut state), Some(expected));

        for seed in 0..5 {
            let mut engine = AIEngine::win_seeking(&AIConfig {
                seed: Some(seed),
                ..Default::default()
            });
            assert_eq!(engine.select_move(&mut state), Some(expected));
        }
        assert_eq!(state.to_notation(), test_positions::ONE_WIN);
    }

    #[test]
    fn test_exactly_one_winning_triple() {
        let mut state = MatchState::from_notation(test_positions::ONE_WIN).unwrap();
        let wins: Vec<PlannedMove> = state
            .candidate_moves()
            .into_iter()
            .filter(|&mv| state.simulate(mv).has_winner())
            .collect();
        assert_eq!(wins.len(), 1);
    }

    #[test]
    fn test_no_win_falls_back() {
        let mut state = MatchState::from_notation(test_positions::START).unwrap();
        assert_eq!(winning_move(&mut state), None);
        let mut ai = WinSeekingAI::new(&AIConfig {
            seed: Some(11),
            ..Default::default()
        });
        let totem = ai.choose_totem(&mut state).unwrap();
        let dest = ai.choose_destination(&mut state, totem).unwrap();
        assert!(state.is_valid_move(totem, dest));
    }

    #[test]
    fn test_plays_win_through_game() {
        let mut game = Game::from_notation(test_positions::ONE_WIN).unwrap();
        game.set_strategy(
            Color::Pink,
            Some(AIEngine::win_seeking(&AIConfig::default())),
        );
        assert!(game.run_ai_turn());
        assert_eq!(game.current_phase(), Phase::Win);
        assert_eq!(game.score(Color::Pink), 1);
    }
}
