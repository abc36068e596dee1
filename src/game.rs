//! 对局门面
//!
//! 外部（界面、命令行、AI 对战）只通过 `Game` 操作一局棋。所有非法操作
//! 返回 `false`，不会修改状态。每次成功修改状态后通知所有观察者。

use crate::ai::{self, AIEngine};
use crate::board::Board;
use crate::command::{Command, CommandKind, CommandLog};
use crate::state::MatchState;
use crate::types::{
    Color, OxonoError, Pawn, Phase, Position, Symbol, DEFAULT_BOARD_SIZE, INITIAL_TOKEN_COUNT,
};
use log::{debug, info, warn};
use std::fmt;

/// 完整一轮（双方各一次移动 + 放置）包含的命令数
pub const UNDO_TOTEM_COMMANDS: usize = 4;
/// 撤销刚才的移动
pub const UNDO_TOKEN_COMMANDS: usize = 1;
/// 重做被撤销的移动
pub const REDO_TOTEM_COMMANDS: usize = 1;
/// 重做放置 + 对手的移动和放置
pub const REDO_TOKEN_COMMANDS: usize = 3;

/// 对局配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// 棋盘边长
    pub board_size: usize,
    /// 每位玩家每种符号的初始棋子数
    pub initial_tokens: u8,
    /// 撤销栈上限（命令数）
    pub undo_depth: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::new(DEFAULT_BOARD_SIZE, INITIAL_TOKEN_COUNT)
    }
}

impl GameConfig {
    /// 撤销上限取整局可能产生的命令总数
    pub fn new(board_size: usize, initial_tokens: u8) -> Self {
        GameConfig {
            board_size,
            initial_tokens,
            undo_depth: max_commands(initial_tokens),
        }
    }

    pub fn validate(&self) -> Result<(), OxonoError> {
        if self.undo_depth == 0 {
            return Err(OxonoError::InvalidConfig(
                "undo depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// 双方放完所有棋子时的命令数：每枚棋子对应一次移动和一次放置
fn max_commands(initial_tokens: u8) -> usize {
    (initial_tokens as usize * 4 * 2).max(UNDO_TOTEM_COMMANDS)
}

/// 状态变化的观察者，回调不携带数据，需要时自行查询
pub trait Observer {
    fn state_changed(&self);
}

impl<F: Fn()> Observer for F {
    fn state_changed(&self) {
        self()
    }
}

/// 注册观察者时返回的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

/// 一局棋
pub struct Game {
    state: MatchState,
    log: CommandLog,
    config: GameConfig,
    observers: Vec<(ObserverId, Box<dyn Observer>)>,
    next_observer: usize,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("log", &self.log)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Game {
    fn default() -> Self {
        let config = GameConfig::default();
        let state = MatchState::new(config.board_size, config.initial_tokens)
            .expect("default configuration is valid");
        Game::with_state(state, config)
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Game, OxonoError> {
        config.validate()?;
        let state = MatchState::new(config.board_size, config.initial_tokens)?;
        Ok(Game::with_state(state, config))
    }

    /// 从记谱局面开始
    pub fn from_notation(s: &str) -> Result<Game, OxonoError> {
        let state = MatchState::from_notation(s)?;
        let config = GameConfig::new(state.board().size(), state.initial_tokens());
        Ok(Game::with_state(state, config))
    }

    fn with_state(state: MatchState, config: GameConfig) -> Game {
        Game {
            state,
            log: CommandLog::new(config.undo_depth),
            config,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    // ========================================================================
    // 查询
    // ========================================================================

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        self.state.board()
    }

    pub fn pawn_at(&self, pos: Position) -> Result<Option<Pawn>, OxonoError> {
        self.state.board().pawn_at(pos)
    }

    pub fn board_size(&self) -> usize {
        self.state.board().size()
    }

    pub fn free_cell_count(&self) -> usize {
        self.state.board().free_cell_count()
    }

    pub fn tokens_remaining(&self, color: Color, symbol: Symbol) -> u8 {
        self.state.player(color).tokens(symbol)
    }

    pub fn score(&self, color: Color) -> u32 {
        self.state.score(color)
    }

    pub fn current_phase(&self) -> Phase {
        self.state.phase()
    }

    /// 当前行棋方；获胜后为胜者
    pub fn player_to_move(&self) -> Color {
        self.state.to_play()
    }

    pub fn pending_insert_symbol(&self) -> Option<Symbol> {
        self.state.pending_insert()
    }

    pub fn last_moved_symbol(&self) -> Option<Symbol> {
        self.state.last_moved()
    }

    /// 对局未结束
    pub fn is_running(&self) -> bool {
        !self.state.phase().is_terminal()
    }

    pub fn is_valid_move(&self, totem: Symbol, pos: Position) -> bool {
        self.state.is_valid_move(totem, pos)
    }

    pub fn valid_moves(&self, totem: Symbol) -> Vec<Position> {
        self.state.valid_moves(totem)
    }

    /// 只有在等待放置时才有意义
    pub fn is_valid_insert(&self, pos: Position) -> bool {
        match self.state.pending_insert() {
            Some(symbol) => {
                self.state.phase() == Phase::InsertToken && self.state.is_valid_insert(symbol, pos)
            }
            None => false,
        }
    }

    pub fn valid_inserts(&self) -> Vec<Position> {
        match self.state.pending_insert() {
            Some(symbol) if self.state.phase() == Phase::InsertToken => {
                self.state.valid_inserts(symbol)
            }
            _ => Vec::new(),
        }
    }

    pub fn can_undo_totem(&self) -> bool {
        self.state.phase() == Phase::MoveTotem && self.log.undo_len() >= UNDO_TOTEM_COMMANDS
    }

    pub fn can_undo_token(&self) -> bool {
        self.state.phase() == Phase::InsertToken && self.log.undo_len() >= UNDO_TOKEN_COMMANDS
    }

    pub fn can_redo_totem(&self) -> bool {
        self.state.phase() == Phase::MoveTotem
            && self.log.redo_len() >= REDO_TOTEM_COMMANDS
            && self.log.peek_redo().map(Command::kind) == Some(CommandKind::MoveTotem)
    }

    pub fn can_redo_token(&self) -> bool {
        self.state.phase() == Phase::InsertToken
            && self.log.redo_len() >= REDO_TOKEN_COMMANDS
            && self.log.peek_redo().map(Command::kind) == Some(CommandKind::InsertToken)
    }

    pub fn to_notation(&self) -> String {
        self.state.to_notation()
    }

    // ========================================================================
    // 玩家操作
    // ========================================================================

    /// 选择图腾并移动
    ///
    /// 需处于移动阶段、目标合法，且行棋方还有该符号的棋子。
    pub fn choose_and_move_totem(&mut self, totem: Symbol, pos: Position) -> bool {
        if self.state.phase() != Phase::MoveTotem {
            debug!("move rejected: phase is {}", self.state.phase());
            return false;
        }
        if !self.state.current_player().has_tokens(totem) {
            debug!(
                "move rejected: {} has no {} token left",
                self.state.to_play(),
                totem
            );
            return false;
        }
        if !self.state.is_valid_move(totem, pos) {
            debug!("move rejected: {} cannot reach {}", totem, pos);
            return false;
        }

        let command = Command::move_totem(&self.state, totem, pos);
        self.log.execute(command, &mut self.state);
        self.state.set_pending_insert(Some(totem));
        debug!("{} moved totem {} to {}", self.state.to_play(), totem, pos);
        self.notify();
        true
    }

    /// 在刚移动的图腾旁放置行棋方的棋子，然后判定胜负与和棋
    pub fn insert_token(&mut self, pos: Position) -> bool {
        if self.state.phase() != Phase::InsertToken {
            debug!("insert rejected: phase is {}", self.state.phase());
            return false;
        }
        let symbol = self
            .state
            .pending_insert()
            .expect("insert phase without a pending totem");
        if !self.state.is_valid_insert(symbol, pos) {
            debug!("insert rejected: {} is not next to totem {}", pos, symbol);
            return false;
        }

        let owner = self.state.to_play();
        let command = Command::insert_token(symbol, pos, owner);
        self.log.execute(command, &mut self.state);
        self.state.set_pending_insert(None);
        debug!("{} placed {} at {}", owner, symbol, pos);

        self.conclude_if_over();
        self.notify();
        true
    }

    /// 放置后判定：先胜负，后和棋
    ///
    /// 放置命令已切换到对手，获胜时再切换一次并为此时的行棋方记分。
    fn conclude_if_over(&mut self) {
        if let Some(line) = self.state.check_winner() {
            self.state.switch_player();
            let winner = self.state.to_play();
            self.state.credit_win(winner);
            self.state.set_phase(Phase::Win);
            info!(
                "{} wins with {:?} starting at {}",
                winner, line.kind, line.positions[0]
            );
        } else if self.state.is_draw() {
            self.state.set_phase(Phase::Draw);
            info!("draw with {} free cells left", self.state.board().free_cell_count());
        }
    }

    /// 撤销一整轮（4 条命令），回到上一轮选择图腾时
    pub fn undo_totem(&mut self) -> bool {
        if !self.can_undo_totem() {
            debug!("nothing to undo for totem selection");
            return false;
        }
        self.log.undo(UNDO_TOTEM_COMMANDS, &mut self.state);
        self.state.set_pending_insert(None);
        info!("undid a full round, {} to move", self.state.to_play());
        self.notify();
        true
    }

    /// 撤销刚才的移动（1 条命令）
    pub fn undo_token(&mut self) -> bool {
        if !self.can_undo_token() {
            debug!("nothing to undo for token insertion");
            return false;
        }
        self.log.undo(UNDO_TOKEN_COMMANDS, &mut self.state);
        self.state.set_pending_insert(None);
        info!("undid totem move, {} to move", self.state.to_play());
        self.notify();
        true
    }

    /// 重做被撤销的移动（1 条命令），恢复待放置符号
    pub fn redo_totem(&mut self) -> bool {
        if !self.can_redo_totem() {
            debug!("nothing to redo for totem selection");
            return false;
        }
        self.log.redo(REDO_TOTEM_COMMANDS, &mut self.state);
        if self.state.phase() != Phase::InsertToken {
            panic!("redo of a totem move left phase {}", self.state.phase());
        }
        self.state.set_pending_insert(self.state.last_moved());
        info!("redid totem move");
        self.notify();
        true
    }

    /// 重做放置以及对手随后的移动和放置（3 条命令）
    pub fn redo_token(&mut self) -> bool {
        if !self.can_redo_token() {
            debug!("nothing to redo for token insertion");
            return false;
        }
        self.log.redo(REDO_TOKEN_COMMANDS, &mut self.state);
        if self.state.phase() != Phase::MoveTotem {
            panic!("redo of a full round left phase {}", self.state.phase());
        }
        self.state.set_pending_insert(None);
        info!("redid a full round");
        self.notify();
        true
    }

    /// 行棋方认输
    pub fn surrender(&mut self) -> bool {
        self.surrender_by(self.state.to_play())
    }

    /// `color` 认输，对手得分
    pub fn surrender_by(&mut self, color: Color) -> bool {
        if !self.is_running() {
            return false;
        }
        let winner = color.opposite();
        self.state.credit_win(winner);
        self.state.set_phase(Phase::Surrender);
        self.state.set_pending_insert(None);
        info!("{} surrendered, {} wins", color, winner);
        self.notify();
        true
    }

    /// 终局后再来一局：保留比分和策略，清空日志
    pub fn request_rematch(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.state.set_phase(Phase::Rematch);
        self.notify();

        self.state.reset_for_rematch();
        self.log.clear();
        info!(
            "rematch started, score {} {} - {} {}",
            Color::Pink,
            self.state.score(Color::Pink),
            self.state.score(Color::Black),
            Color::Black
        );
        self.notify();
        true
    }

    // ========================================================================
    // AI
    // ========================================================================

    pub fn set_strategy(&mut self, color: Color, strategy: Option<AIEngine>) {
        self.state.player_mut(color).set_strategy(strategy);
    }

    pub fn has_strategy(&self, color: Color) -> bool {
        self.state.player(color).is_computer()
    }

    /// 由行棋方的策略走完一个子回合（移动 + 放置）
    ///
    /// 通过与人类相同的入口执行，行棋方没有策略或不在移动阶段时返回 false。
    pub fn run_ai_turn(&mut self) -> bool {
        if self.state.phase() != Phase::MoveTotem {
            return false;
        }
        let color = self.state.to_play();
        let mut engine = match self.state.player_mut(color).take_strategy() {
            Some(engine) => engine,
            None => return false,
        };
        let played = self.play_engine_turn(&mut engine, color);
        self.state.player_mut(color).set_strategy(Some(engine));
        played
    }

    fn play_engine_turn(&mut self, engine: &mut AIEngine, color: Color) -> bool {
        let chosen = match engine.choose_totem(&mut self.state) {
            Some(totem) => totem,
            None => {
                warn!("{} ({}) found no totem to move", color, engine.name());
                return false;
            }
        };
        let totem = match ai::substitute_totem(&self.state, color, chosen) {
            Some(totem) => totem,
            None => return false,
        };
        let destination = match engine.choose_destination(&mut self.state, totem) {
            Some(pos) => pos,
            None => {
                warn!("{} ({}) found no destination for {}", color, engine.name(), totem);
                return false;
            }
        };
        if !self.choose_and_move_totem(totem, destination) {
            warn!("{} ({}) chose an illegal move", color, engine.name());
            return false;
        }
        let insertion = engine
            .choose_insertion(&mut self.state, totem)
            .expect("a moved totem always leaves a free cell to insert into");
        if !self.insert_token(insertion) {
            panic!("{} chose an illegal insertion at {}", engine.name(), insertion);
        }
        info!(
            "{} ({}) played {}:{}+{}",
            color,
            engine.name(),
            totem,
            destination,
            insertion
        );
        true
    }

    // ========================================================================
    // 观察者
    // ========================================================================

    pub fn register<O: Observer + 'static>(&mut self, observer: O) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer.state_changed();
        }
    }
}
