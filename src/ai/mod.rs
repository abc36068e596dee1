//! AI 策略模块
//!
//! 提供随机、一步求胜和 Minimax 三种策略。每个子回合按顺序调用
//! 选择图腾、选择目标、选择放置格三个方法。

mod minimax;
mod random;
mod win_seeking;

pub use minimax::MinimaxAI;
pub use random::RandomAI;
pub use win_seeking::{winning_move, WinSeekingAI};

use crate::state::MatchState;
use crate::types::{Color, PlannedMove, Position, Symbol};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

/// 可用策略列表
pub const AVAILABLE_STRATEGIES: &[&str] = &["random", "win_seeking", "minimax"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "minimax";

/// 困难级别使用的搜索深度
pub const HARD_DEPTH: u32 = 6;

/// 获取策略帮助信息
pub fn strategies_help() -> String {
    format!(
        "Available strategies: {} (aliases: win = win_seeking, alphabeta = minimax)",
        AVAILABLE_STRATEGIES.join(", ")
    )
}

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 搜索深度
    pub depth: u32,
    /// 随机种子
    pub seed: Option<u64>,
    /// 叶子节点使用位置评估代替固定分
    pub positional: bool,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 3,
            seed: None,
            positional: false,
        }
    }
}

/// 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// 走法评分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: PlannedMove,
    pub score: i32,
}

/// AI 策略接口
///
/// 三个方法都可以在局面上试走，但返回前必须恢复局面。
pub trait AIStrategy {
    /// 策略名
    fn name(&self) -> &'static str;

    /// 选择要移动的图腾
    fn choose_totem(&mut self, state: &mut MatchState) -> Option<Symbol>;

    /// 选择图腾的目标格
    fn choose_destination(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position>;

    /// 图腾移动后选择放置格
    fn choose_insertion(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position>;

    /// 选择走法（返回带评分的走法列表）
    ///
    /// 默认只给出一个走法，评分为 0。
    fn select_moves(&mut self, state: &mut MatchState, n: usize) -> Vec<ScoredMove> {
        if n == 0 {
            return Vec::new();
        }
        plan_move(self, state)
            .map(|mv| ScoredMove { mv, score: 0 })
            .into_iter()
            .collect()
    }
}

/// 按三步接口规划一整步，不提交
fn plan_move<S: AIStrategy + ?Sized>(strategy: &mut S, state: &mut MatchState) -> Option<PlannedMove> {
    let color = state.to_play();
    let chosen = strategy.choose_totem(state)?;
    let totem = substitute_totem(state, color, chosen)?;
    let destination = strategy.choose_destination(state, totem)?;
    let mut sim = state.simulate_move(totem, destination);
    let insertion = strategy.choose_insertion(&mut sim, totem)?;
    Some(PlannedMove::new(totem, destination, insertion))
}

/// 所选图腾对应的棋子已用完时改用另一个图腾
pub fn substitute_totem(state: &MatchState, color: Color, chosen: Symbol) -> Option<Symbol> {
    let player = state.player(color);
    if player.has_tokens(chosen) {
        Some(chosen)
    } else if player.has_tokens(chosen.other()) {
        Some(chosen.other())
    } else {
        None
    }
}

/// 排序辅助函数，同分保持原有顺序
pub(crate) fn sort_and_truncate(scored: &mut Vec<ScoredMove>, n: usize) {
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(n);
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl fmt::Debug for AIEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AIEngine")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl AIEngine {
    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 创建一步求胜 AI
    pub fn win_seeking(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(WinSeekingAI::new(config)),
        }
    }

    /// 创建 Minimax AI
    pub fn minimax(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MinimaxAI::new(config)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "random" => Ok(Self::random(config.seed)),
            "win" | "win_seeking" => Ok(Self::win_seeking(config)),
            "minimax" | "alphabeta" => Ok(Self::minimax(config)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    /// 从难度创建：简单为随机，中等为一步求胜，困难为深度 6 的 Minimax
    pub fn from_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        match difficulty {
            Difficulty::Easy => Self::random(seed),
            Difficulty::Medium => Self::win_seeking(&AIConfig {
                seed,
                ..Default::default()
            }),
            Difficulty::Hard => Self::minimax(&AIConfig {
                depth: HARD_DEPTH,
                seed,
                ..Default::default()
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn choose_totem(&mut self, state: &mut MatchState) -> Option<Symbol> {
        self.strategy.choose_totem(state)
    }

    pub fn choose_destination(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        self.strategy.choose_destination(state, totem)
    }

    pub fn choose_insertion(&mut self, state: &mut MatchState, totem: Symbol) -> Option<Position> {
        self.strategy.choose_insertion(state, totem)
    }

    /// 计算完整的一步但不提交；只在移动阶段有效
    pub fn select_move(&mut self, state: &mut MatchState) -> Option<PlannedMove> {
        if state.phase() != crate::types::Phase::MoveTotem {
            return None;
        }
        plan_move(self.strategy.as_mut(), state)
    }

    /// 选择前 n 个走法（带评分）
    pub fn select_moves(&mut self, state: &mut MatchState, n: usize) -> Vec<ScoredMove> {
        if state.phase() != crate::types::Phase::MoveTotem {
            return Vec::new();
        }
        self.strategy.select_moves(state, n)
    }

    /// 从记谱局面选择走法（返回走法字符串和评分）
    pub fn select_moves_notation(
        &mut self,
        notation: &str,
        n: usize,
    ) -> Result<Vec<(String, i32)>, String> {
        let mut state = MatchState::from_notation(notation).map_err(|e| e.to_string())?;
        Ok(self
            .select_moves(&mut state, n)
            .into_iter()
            .map(|sm| (sm.mv.to_notation_str(), sm.score))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions;

    #[test]
    fn test_from_strategy() {
        let config = AIConfig::default();
        assert_eq!(AIEngine::from_strategy("random", &config).unwrap().name(), "random");
        assert_eq!(AIEngine::from_strategy("WIN", &config).unwrap().name(), "win_seeking");
        assert_eq!(AIEngine::from_strategy("alphabeta", &config).unwrap().name(), "minimax");
        let err = AIEngine::from_strategy("mcts", &config).unwrap_err();
        assert!(err.contains("minimax"));
    }

    #[test]
    fn test_from_difficulty() {
        assert_eq!(AIEngine::from_difficulty(Difficulty::Easy, None).name(), "random");
        assert_eq!(AIEngine::from_difficulty(Difficulty::Medium, None).name(), "win_seeking");
        assert_eq!(AIEngine::from_difficulty(Difficulty::Hard, None).name(), "minimax");
        assert_eq!(Difficulty::from_name("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("extreme"), None);
    }

    #[test]
    fn test_select_move_is_legal_and_leaves_state() {
        let mut state = MatchState::from_notation(test_positions::START).unwrap();
        let before = state.to_notation();
        for name in AVAILABLE_STRATEGIES {
            let config = AIConfig {
                depth: 1,
                seed: Some(3),
                ..Default::default()
            };
            let mut engine = AIEngine::from_strategy(name, &config).unwrap();
            let mv = engine.select_move(&mut state).unwrap();
            assert!(state.candidate_moves().contains(&mv), "{} chose {}", name, mv);
            assert_eq!(state.to_notation(), before);
        }
    }

    #[test]
    fn test_substitute_totem() {
        let state = MatchState::from_notation("6/6/2@3/3#2/6/6 0:3:8:8 p").unwrap();
        assert_eq!(substitute_totem(&state, Color::Pink, Symbol::O), Some(Symbol::X));
        assert_eq!(substitute_totem(&state, Color::Pink, Symbol::X), Some(Symbol::X));
        let empty = MatchState::from_notation("6/6/2@3/3#2/6/6 0:0:8:8 p").unwrap();
        assert_eq!(substitute_totem(&empty, Color::Pink, Symbol::O), None);
    }

    #[test]
    fn test_select_moves_notation() {
        let mut engine = AIEngine::random(Some(42));
        let moves = engine.select_moves_notation(test_positions::START, 5).unwrap();
        assert_eq!(moves.len(), 1);
        assert!(PlannedMove::from_notation_str(&moves[0].0).is_some());
        assert!(engine.select_moves_notation("bad", 1).is_err());
    }
}
