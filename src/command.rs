//! 命令与撤销/重做日志
//!
//! 每个命令都能在 `MatchState` 上执行和撤销，执行与撤销的效果严格对称。

use crate::state::MatchState;
use crate::types::{Color, Phase, Position, Symbol, Token};
use log::debug;
use std::collections::VecDeque;

/// 可撤销的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 移动图腾，记录原位置以便撤销
    MoveTotem {
        totem: Symbol,
        from: Position,
        to: Position,
    },
    /// 放置棋子，记录放置者以便归还库存
    InsertToken {
        token: Token,
        position: Position,
        owner: Color,
    },
}

/// 命令种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    MoveTotem,
    InsertToken,
}

impl Command {
    /// 构造移动命令，起点取图腾当前位置
    pub fn move_totem(state: &MatchState, totem: Symbol, to: Position) -> Command {
        Command::MoveTotem {
            totem,
            from: state.board().totem_position(totem),
            to,
        }
    }

    /// 构造放置命令，棋子颜色取 `owner`
    pub fn insert_token(symbol: Symbol, position: Position, owner: Color) -> Command {
        Command::InsertToken {
            token: Token::new(symbol, owner),
            position,
            owner,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::MoveTotem { .. } => CommandKind::MoveTotem,
            Command::InsertToken { .. } => CommandKind::InsertToken,
        }
    }

    /// 执行
    pub fn apply(&self, state: &mut MatchState) {
        match *self {
            Command::MoveTotem { totem, to, .. } => {
                state.board_mut().move_totem(totem, to).expect("move target was validated");
                state.set_phase(Phase::InsertToken);
                state.set_last_moved(Some(totem));
            }
            Command::InsertToken {
                token,
                position,
                owner,
            } => {
                state
                    .board_mut()
                    .place_token(token, position)
                    .expect("insert target was validated");
                state.set_phase(Phase::MoveTotem);
                state.set_to_play(owner.opposite());
                state.player_mut(owner).take_token(token.symbol);
            }
        }
    }

    /// 撤销
    pub fn revert(&self, state: &mut MatchState) {
        match *self {
            Command::MoveTotem { totem, from, .. } => {
                state
                    .board_mut()
                    .move_totem(totem, from)
                    .expect("totem origin is on the board");
                state.set_phase(Phase::MoveTotem);
                state.set_last_moved(Some(totem));
            }
            Command::InsertToken {
                token,
                position,
                owner,
            } => {
                state
                    .board_mut()
                    .remove_pawn(position)
                    .expect("inserted token is on the board");
                state.set_phase(Phase::InsertToken);
                state.set_to_play(owner);
                state.player_mut(owner).return_token(token.symbol);
            }
        }
    }
}

/// 撤销/重做日志
///
/// 执行新命令会清空重做栈；撤销栈超过上限时丢弃最早的命令。
#[derive(Debug, Clone)]
pub struct CommandLog {
    undo_stack: VecDeque<Command>,
    redo_stack: Vec<Command>,
    max_depth: usize,
}

impl CommandLog {
    pub fn new(max_depth: usize) -> Self {
        CommandLog {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// 执行新命令并记录
    pub fn execute(&mut self, command: Command, state: &mut MatchState) {
        command.apply(state);
        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
            debug!("command log full, dropped oldest entry");
        }
        self.redo_stack.clear();
    }

    /// 撤销 `count` 条命令；数量不足时什么都不做并返回 false
    pub fn undo(&mut self, count: usize, state: &mut MatchState) -> bool {
        if self.undo_stack.len() < count {
            return false;
        }
        for _ in 0..count {
            if let Some(command) = self.undo_stack.pop_back() {
                command.revert(state);
                self.redo_stack.push(command);
            }
        }
        true
    }

    /// 重做 `count` 条命令；数量不足时什么都不做并返回 false
    pub fn redo(&mut self, count: usize, state: &mut MatchState) -> bool {
        if self.redo_stack.len() < count {
            return false;
        }
        for _ in 0..count {
            if let Some(command) = self.redo_stack.pop() {
                command.apply(state);
                self.undo_stack.push_back(command);
            }
        }
        true
    }

    #[inline]
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// 下一条将被重做的命令
    pub fn peek_redo(&self) -> Option<&Command> {
        self.redo_stack.last()
    }

    /// 下一条将被撤销的命令
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo_stack.back()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
