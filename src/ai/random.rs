//! 随机 AI 策略

use super::AIStrategy;
use crate::state::MatchState;
use crate::types::{Position, Symbol};
use rand::prelude::*;

/// 随机 AI - 均匀随机选择图腾、目标和放置格
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomAI { rng }
    }
}

impl AIStrategy for RandomAI {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_totem(&mut self, state: &mut MatchState) -> Option<Symbol> {
        // 两个图腾都可移动时相当于抛硬币
        state
            .movable_totems(state.to_play())
            .choose(&mut self.rng)
            .copied()
    }

    fn choose_destination(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        state.valid_moves(totem).choose(&mut self.rng).copied()
    }

    fn choose_insertion(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        state.valid_inserts(totem).choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_same_seed_same_choices() {
        let mut state = MatchState::new(6, 8).unwrap();
        let mut a = RandomAI::new(Some(9));
        let mut b = RandomAI::new(Some(9));
        for _ in 0..10 {
            let totem = a.choose_totem(&mut state).unwrap();
            assert_eq!(b.choose_totem(&mut state), Some(totem));
            let dest = a.choose_destination(&mut state, totem).unwrap();
            assert_eq!(b.choose_destination(&mut state, totem), Some(dest));
            assert!(state.is_valid_move(totem, dest));
        }
    }

    #[test]
    fn test_only_movable_totem() {
        let mut state = MatchState::from_notation("6/6/2@3/3#2/6/6 0:4:8:8 p").unwrap();
        let mut ai = RandomAI::new(Some(1));
        for _ in 0..20 {
            assert_eq!(ai.choose_totem(&mut state), Some(Symbol::X));
        }
        assert_eq!(state.to_play(), Color::Pink);
    }

    #[test]
    fn test_insertion_next_to_totem() {
        let mut state = MatchState::new(6, 8).unwrap();
        let mut ai = RandomAI::new(Some(5));
        let mut sim = state.simulate_move(Symbol::O, Position::new(0, 2));
        let ins = ai.choose_insertion(&mut sim, Symbol::O).unwrap();
        assert!(ins.is_orthogonal_neighbor(Position::new(0, 2)));
    }
}
