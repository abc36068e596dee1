//! 对局状态
//!
//! 棋盘、双方玩家、当前阶段与轮次、比分。搜索通过 `simulate_move` /
//! `simulate` 在原地试走，守卫离开作用域时按相反顺序撤销。

use crate::board::Board;
use crate::command::Command;
use crate::notation;
use crate::player::Player;
use crate::rules::{self, WinningLine};
use crate::types::{Color, OxonoError, Phase, PlannedMove, Position, Symbol};
use std::ops::{Deref, DerefMut};

/// 一局棋的完整状态
#[derive(Debug)]
pub struct MatchState {
    board: Board,
    players: [Player; 2],
    phase: Phase,
    to_play: Color,
    /// 已移动、等待放置棋子的图腾
    pending_insert: Option<Symbol>,
    /// 最近一次执行或撤销的移动涉及的图腾
    last_moved: Option<Symbol>,
    scores: [u32; 2],
    initial_tokens: u8,
}

/// 轮次相关字段的快照，模拟结束后整体恢复
#[derive(Debug, Clone, Copy)]
struct Bookkeeping {
    phase: Phase,
    to_play: Color,
    pending_insert: Option<Symbol>,
    last_moved: Option<Symbol>,
}

impl MatchState {
    /// 新对局：粉方先走
    pub fn new(board_size: usize, initial_tokens: u8) -> Result<MatchState, OxonoError> {
        if initial_tokens == 0 {
            return Err(OxonoError::InvalidConfig(
                "each player needs at least one token of each symbol".to_string(),
            ));
        }
        let board = Board::new(board_size)?;
        let players = [
            Player::new(Color::Pink, initial_tokens),
            Player::new(Color::Black, initial_tokens),
        ];
        Ok(MatchState::from_parts(board, players, Color::Pink, initial_tokens))
    }

    /// 由已有棋盘和玩家构造，阶段为移动图腾
    pub fn from_parts(
        board: Board,
        players: [Player; 2],
        to_play: Color,
        initial_tokens: u8,
    ) -> MatchState {
        debug_assert_eq!(players[0].color(), Color::Pink);
        debug_assert_eq!(players[1].color(), Color::Black);
        MatchState {
            board,
            players,
            phase: Phase::MoveTotem,
            to_play,
            pending_insert: None,
            last_moved: None,
            scores: [0; 2],
            initial_tokens,
        }
    }

    /// 从记谱构造
    pub fn from_notation(s: &str) -> Result<MatchState, OxonoError> {
        notation::parse(s)
    }

    /// 生成记谱
    pub fn to_notation(&self) -> String {
        notation::format(self)
    }

    // ========================================================================
    // 访问器
    // ========================================================================

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[inline]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    #[inline]
    pub(crate) fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// 当前行棋方
    #[inline]
    pub fn current_player(&self) -> &Player {
        self.player(self.to_play)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    #[inline]
    pub fn to_play(&self) -> Color {
        self.to_play
    }

    pub(crate) fn set_to_play(&mut self, color: Color) {
        self.to_play = color;
    }

    pub(crate) fn switch_player(&mut self) {
        self.to_play = self.to_play.opposite();
    }

    #[inline]
    pub fn pending_insert(&self) -> Option<Symbol> {
        self.pending_insert
    }

    pub(crate) fn set_pending_insert(&mut self, symbol: Option<Symbol>) {
        self.pending_insert = symbol;
    }

    #[inline]
    pub fn last_moved(&self) -> Option<Symbol> {
        self.last_moved
    }

    pub(crate) fn set_last_moved(&mut self, symbol: Option<Symbol>) {
        self.last_moved = symbol;
    }

    #[inline]
    pub fn score(&self, color: Color) -> u32 {
        self.scores[color.index()]
    }

    pub(crate) fn credit_win(&mut self, color: Color) {
        self.scores[color.index()] += 1;
    }

    #[inline]
    pub fn initial_tokens(&self) -> u8 {
        self.initial_tokens
    }

    // ========================================================================
    // 规则查询
    // ========================================================================

    pub fn valid_moves(&self, totem: Symbol) -> Vec<Position> {
        rules::valid_moves(&self.board, totem)
    }

    pub fn is_valid_move(&self, totem: Symbol, pos: Position) -> bool {
        rules::is_valid_move(&self.board, totem, pos)
    }

    /// 图腾 `totem` 当前位置周围的可放置格
    pub fn valid_inserts(&self, totem: Symbol) -> Vec<Position> {
        rules::valid_inserts(&self.board, self.board.totem_position(totem))
    }

    pub fn is_valid_insert(&self, totem: Symbol, pos: Position) -> bool {
        rules::is_valid_insert(&self.board, totem, pos)
    }

    /// `color` 还有棋子可放的图腾（按 O、X 顺序）
    pub fn movable_totems(&self, color: Color) -> Vec<Symbol> {
        let player = self.player(color);
        Symbol::ALL
            .iter()
            .copied()
            .filter(|&s| player.has_tokens(s))
            .collect()
    }

    pub fn has_winner(&self) -> bool {
        rules::has_winner(&self.board)
    }

    pub fn is_draw(&self) -> bool {
        rules::is_draw(&self.board, &self.players)
    }

    /// 判定胜负并标记获胜棋子
    pub(crate) fn check_winner(&mut self) -> Option<WinningLine> {
        rules::check_winner(&mut self.board)
    }

    // ========================================================================
    // 模拟
    // ========================================================================

    fn bookkeeping(&self) -> Bookkeeping {
        Bookkeeping {
            phase: self.phase,
            to_play: self.to_play,
            pending_insert: self.pending_insert,
            last_moved: self.last_moved,
        }
    }

    fn restore(&mut self, saved: Bookkeeping) {
        self.phase = saved.phase;
        self.to_play = saved.to_play;
        self.pending_insert = saved.pending_insert;
        self.last_moved = saved.last_moved;
    }

    /// 试走：移动图腾
    pub fn simulate_move(&mut self, totem: Symbol, destination: Position) -> Simulation<'_> {
        let saved = self.bookkeeping();
        let command = Command::move_totem(self, totem, destination);
        command.apply(self);
        self.pending_insert = Some(totem);
        Simulation {
            state: self,
            applied: [Some(command), None],
            saved,
        }
    }

    /// 试走：在已移动的图腾旁放置当前行棋方的棋子
    pub fn simulate_insert(&mut self, totem: Symbol, position: Position) -> Simulation<'_> {
        let saved = self.bookkeeping();
        let command = Command::insert_token(totem, position, self.to_play);
        command.apply(self);
        self.pending_insert = None;
        Simulation {
            state: self,
            applied: [Some(command), None],
            saved,
        }
    }

    /// 试走完整的一步：移动 + 放置
    pub fn simulate(&mut self, mv: PlannedMove) -> Simulation<'_> {
        let saved = self.bookkeeping();
        let owner = self.to_play;
        let moved = Command::move_totem(self, mv.totem, mv.destination);
        moved.apply(self);
        let inserted = Command::insert_token(mv.totem, mv.insertion, owner);
        inserted.apply(self);
        self.pending_insert = None;
        Simulation {
            state: self,
            applied: [Some(moved), Some(inserted)],
            saved,
        }
    }

    /// 当前行棋方的全部合法 (图腾, 目标, 放置) 组合，顺序稳定
    ///
    /// 放置格按移动之后的棋盘计算。
    pub fn candidate_moves(&mut self) -> Vec<PlannedMove> {
        let mut moves = Vec::new();
        for totem in self.movable_totems(self.to_play) {
            for destination in self.valid_moves(totem) {
                let sim = self.simulate_move(totem, destination);
                for insertion in rules::valid_inserts(sim.board(), destination) {
                    moves.push(PlannedMove::new(totem, destination, insertion));
                }
            }
        }
        moves
    }

    /// 再来一局：新棋盘、重置库存、粉方先走；比分和策略保留
    pub(crate) fn reset_for_rematch(&mut self) {
        self.board = Board::new(self.board.size())
            .expect("board size was validated at construction");
        for player in self.players.iter_mut() {
            player.reset_tokens(self.initial_tokens);
        }
        self.phase = Phase::MoveTotem;
        self.to_play = Color::Pink;
        self.pending_insert = None;
        self.last_moved = None;
    }
}

/// 试走守卫，解引用为被修改后的 `MatchState`
pub struct Simulation<'a> {
    state: &'a mut MatchState,
    applied: [Option<Command>; 2],
    saved: Bookkeeping,
}

impl Deref for Simulation<'_> {
    type Target = MatchState;

    fn deref(&self) -> &MatchState {
        &*self.state
    }
}

impl DerefMut for Simulation<'_> {
    fn deref_mut(&mut self) -> &mut MatchState {
        &mut *self.state
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let applied = self.applied;
        for command in applied.iter().rev().flatten() {
            command.revert(&mut *self.state);
        }
        self.state.restore(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: &MatchState) -> (Board, [u8; 4], Phase, Color, Option<Symbol>) {
        let pink = state.player(Color::Pink);
        let black = state.player(Color::Black);
        (
            state.board().clone(),
            [
                pink.tokens(Symbol::O),
                pink.tokens(Symbol::X),
                black.tokens(Symbol::O),
                black.tokens(Symbol::X),
            ],
            state.phase(),
            state.to_play(),
            state.last_moved(),
        )
    }

    #[test]
    fn test_new_state() {
        let state = MatchState::new(6, 8).unwrap();
        assert_eq!(state.phase(), Phase::MoveTotem);
        assert_eq!(state.to_play(), Color::Pink);
        assert_eq!(state.score(Color::Pink), 0);
        assert_eq!(state.pending_insert(), None);
        assert!(MatchState::new(6, 0).is_err());
        assert!(MatchState::new(3, 8).is_err());
    }

    #[test]
    fn test_simulate_restores_state() {
        let mut state = MatchState::new(6, 8).unwrap();
        let before = snapshot(&state);
        {
            let sim = state.simulate(PlannedMove::new(
                Symbol::O,
                Position::new(2, 1),
                Position::new(2, 0),
            ));
            assert_eq!(sim.to_play(), Color::Black);
            assert_eq!(sim.phase(), Phase::MoveTotem);
            assert_eq!(sim.player(Color::Pink).tokens(Symbol::O), 7);
            assert!(sim.board().is_occupied(Position::new(2, 0)));
        }
        assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn test_nested_simulation() {
        let mut state = MatchState::new(6, 8).unwrap();
        let before = snapshot(&state);
        {
            let mut outer = state.simulate_move(Symbol::X, Position::new(3, 4));
            assert_eq!(outer.phase(), Phase::InsertToken);
            assert_eq!(outer.pending_insert(), Some(Symbol::X));
            {
                let inner = outer.simulate_insert(Symbol::X, Position::new(3, 5));
                assert_eq!(inner.to_play(), Color::Black);
            }
            assert_eq!(outer.to_play(), Color::Pink);
            assert!(outer.board().is_free(Position::new(3, 5)));
        }
        assert_eq!(snapshot(&state), before);
    }

    #[test]
    fn test_candidate_moves_at_start() {
        let mut state = MatchState::new(6, 8).unwrap();
        let moves = state.candidate_moves();
        assert!(!moves.is_empty());
        for mv in &moves {
            let sim = state.simulate_move(mv.totem, mv.destination);
            assert!(sim.is_valid_insert(mv.totem, mv.insertion));
        }
        let destinations =
            state.valid_moves(Symbol::O).len() + state.valid_moves(Symbol::X).len();
        assert!(moves.len() <= destinations * 4);
        assert_eq!(moves, state.candidate_moves());
    }

    #[test]
    fn test_movable_totems() {
        let board = Board::new(6).unwrap();
        let players = [
            Player::with_tokens(Color::Pink, 0, 2),
            Player::with_tokens(Color::Black, 0, 0),
        ];
        let state = MatchState::from_parts(board, players, Color::Pink, 8);
        assert_eq!(state.movable_totems(Color::Pink), vec![Symbol::X]);
        assert!(state.movable_totems(Color::Black).is_empty());
    }

    #[test]
    fn test_reset_for_rematch_keeps_scores() {
        let mut state = MatchState::new(6, 8).unwrap();
        let cmd = Command::move_totem(&state, Symbol::O, Position::new(2, 1));
        cmd.apply(&mut state);
        state.credit_win(Color::Black);
        state.set_to_play(Color::Black);
        state.reset_for_rematch();
        assert_eq!(state.score(Color::Black), 1);
        assert_eq!(state.to_play(), Color::Pink);
        assert_eq!(state.phase(), Phase::MoveTotem);
        assert_eq!(state.board().totem_position(Symbol::O), Position::new(2, 2));
        assert_eq!(state.last_moved(), None);
    }
}
