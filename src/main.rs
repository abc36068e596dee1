//! Oxono AI CLI
//!
//! 命令行界面，用于测试规则引擎和 AI
//!
//! `--position` 可以是命名局面（见 test_positions）或完整记谱字符串。

use clap::{Parser, Subcommand};
use oxono_ai::rules::evaluate_position;
use oxono_ai::types::INITIAL_TOKEN_COUNT;
use oxono_ai::{
    get_node_count, reset_node_count, strategies_help, test_positions, AIConfig, AIEngine, Color,
    Game, GameConfig, MatchState, Phase, PlannedMove, DEFAULT_STRATEGY,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxono-ai")]
#[command(about = "Oxono rules engine and AI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出行棋方的全部合法走法
    Moves {
        /// 命名局面或记谱字符串
        #[arg(long, default_value = "start")]
        position: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 选择最佳走法
    Best {
        /// 命名局面或记谱字符串
        #[arg(long, default_value = "start")]
        position: String,

        /// AI 策略 (random, win_seeking, minimax)
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        strategy: String,

        /// 搜索深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 叶子节点使用位置评估
        #[arg(long)]
        positional: bool,

        /// 返回的走法数量
        #[arg(long, default_value = "1")]
        n: usize,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（行棋方视角）
    Eval {
        /// 命名局面或记谱字符串
        #[arg(long, default_value = "start")]
        position: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// AI 对战
    Play {
        /// 棋盘边长
        #[arg(long, default_value = "6")]
        size: usize,

        /// 粉方策略
        #[arg(long, default_value = "random")]
        pink: String,

        /// 黑方策略
        #[arg(long, default_value = DEFAULT_STRATEGY)]
        black: String,

        /// Minimax 搜索深度
        #[arg(long, default_value = "3")]
        depth: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 局数
        #[arg(long, default_value = "1")]
        rounds: u32,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize, Deserialize)]
struct MoveResult {
    #[serde(rename = "move")]
    mv: String,
    score: i32,
}

#[derive(Serialize, Deserialize)]
struct MovesResponse {
    moves: Vec<MoveResult>,
    total: usize,
}

#[derive(Serialize, Deserialize)]
struct LegalMovesResponse {
    position: String,
    to_play: Color,
    moves: Vec<PlannedMove>,
    total: usize,
}

#[derive(Serialize, Deserialize)]
struct EvalResponse {
    position: String,
    color: Color,
    score: i32,
}

#[derive(Serialize, Deserialize)]
struct RoundResult {
    round: u32,
    outcome: Phase,
    winner: Option<Color>,
    turns: u32,
    final_position: String,
}

#[derive(Serialize, Deserialize)]
struct PlayResponse {
    rounds: Vec<RoundResult>,
    pink_score: u32,
    black_score: u32,
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 { nodes as f64 / elapsed_secs } else { 0.0 }
}

/// 命名局面或原始记谱
fn resolve_position(position: &str) -> &str {
    test_positions::by_name(position).unwrap_or(position)
}

fn load_state(position: &str) -> MatchState {
    match MatchState::from_notation(resolve_position(position)) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_engine(strategy: &str, config: &AIConfig) -> AIEngine {
    match AIEngine::from_strategy(strategy, config) {
        Ok(ai) => ai,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", strategies_help());
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { position, json } => {
            let mut state = load_state(&position);
            let moves = state.candidate_moves();
            if json {
                let response = LegalMovesResponse {
                    position: state.to_notation(),
                    to_play: state.to_play(),
                    total: moves.len(),
                    moves,
                };
                println!("{}", serde_json::to_string_pretty(&response).unwrap());
            } else {
                println!("{}", state.board());
                println!("Legal moves for {} ({}):", state.to_play(), moves.len());
                for mv in &moves {
                    println!("  {}", mv);
                }
            }
        }

        Commands::Best {
            position,
            strategy,
            depth,
            seed,
            positional,
            n,
            json,
        } => {
            let config = AIConfig {
                depth,
                seed,
                positional,
            };
            let mut ai = build_engine(&strategy, &config);
            let mut state = load_state(&position);

            // 重置计数器
            reset_node_count();
            let start = Instant::now();

            let moves = ai.select_moves(&mut state, n);
            let elapsed = start.elapsed().as_secs_f64();
            let nodes = get_node_count();
            let nps = calc_nps(nodes, elapsed);

            if json {
                let response = MovesResponse {
                    total: moves.len(),
                    moves: moves
                        .into_iter()
                        .map(|sm| MoveResult {
                            mv: sm.mv.to_notation_str(),
                            score: sm.score,
                        })
                        .collect(),
                };
                println!("{}", serde_json::to_string_pretty(&response).unwrap());
                eprintln!(
                    "Stats: depth={}, nodes={}, time={:.3}s, nps={:.0}",
                    depth, nodes, elapsed, nps
                );
            } else {
                println!("Best moves (strategy={}):", ai.name());
                for sm in moves {
                    println!("  {} (score: {})", sm.mv, sm.score);
                }
                println!(
                    "\nStats: depth={}, nodes={}, time={:.3}s, nps={:.0}",
                    depth, nodes, elapsed, nps
                );
            }
        }

        Commands::Eval { position, json } => {
            let state = load_state(&position);
            let color = state.to_play();
            let score = evaluate_position(state.board(), color);
            if json {
                let response = EvalResponse {
                    position: state.to_notation(),
                    color,
                    score,
                };
                println!("{}", serde_json::to_string_pretty(&response).unwrap());
            } else {
                println!("Position eval ({} to play): {}", color, score);
            }
        }

        Commands::Play {
            size,
            pink,
            black,
            depth,
            seed,
            rounds,
            json,
        } => {
            let mut game = match Game::new(GameConfig::new(size, INITIAL_TOKEN_COUNT)) {
                Ok(game) => game,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let pink_config = AIConfig {
                depth,
                seed,
                ..Default::default()
            };
            let black_config = AIConfig {
                depth,
                seed: seed.map(|s| s.wrapping_add(1)),
                ..Default::default()
            };
            game.set_strategy(Color::Pink, Some(build_engine(&pink, &pink_config)));
            game.set_strategy(Color::Black, Some(build_engine(&black, &black_config)));

            let mut results = Vec::new();
            for round in 1..=rounds {
                let start = Instant::now();
                let mut turns = 0;
                while game.is_running() {
                    if !game.run_ai_turn() {
                        eprintln!("Error: {} could not play", game.player_to_move());
                        std::process::exit(1);
                    }
                    turns += 1;
                }
                let outcome = game.current_phase();
                let winner = if outcome == Phase::Win {
                    Some(game.player_to_move())
                } else {
                    None
                };
                if !json {
                    println!("{}", game.board());
                    match winner {
                        Some(color) => println!("Round {}: {} wins after {} turns", round, color, turns),
                        None => println!("Round {}: {} after {} turns", round, outcome, turns),
                    }
                    println!("Time: {:.3}s\n", start.elapsed().as_secs_f64());
                }
                results.push(RoundResult {
                    round,
                    outcome,
                    winner,
                    turns,
                    final_position: game.to_notation(),
                });
                if round < rounds {
                    game.request_rematch();
                }
            }

            if json {
                let response = PlayResponse {
                    rounds: results,
                    pink_score: game.score(Color::Pink),
                    black_score: game.score(Color::Black),
                };
                println!("{}", serde_json::to_string_pretty(&response).unwrap());
            } else {
                println!(
                    "Score: {} {} - {} {}",
                    Color::Pink,
                    game.score(Color::Pink),
                    game.score(Color::Black),
                    Color::Black
                );
            }
        }
    }
}
