//! Oxono AI Engine
//!
//! Oxono 规则引擎与 AI - 支持记谱输入输出

pub mod ai;
pub mod board;
pub mod command;
pub mod game;
pub mod notation;
pub mod player;
pub mod rules;
pub mod state;
pub mod test_positions;
pub mod types;

pub use ai::{
    get_node_count, reset_node_count, strategies_help, AIConfig, AIEngine, AIStrategy,
    Difficulty, MinimaxAI, ScoredMove, AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::Board;
pub use command::{Command, CommandLog};
pub use game::{Game, GameConfig, Observer, ObserverId};
pub use player::Player;
pub use rules::{LineKind, WinningLine};
pub use state::{MatchState, Simulation};
pub use types::{Color, OxonoError, Pawn, Phase, PlannedMove, Position, Symbol, Token};
