//! 玩家：棋子库存与可选的 AI 策略

use crate::ai::AIEngine;
use crate::types::{Color, Symbol};

/// 玩家记录
#[derive(Debug)]
pub struct Player {
    color: Color,
    /// 剩余棋子数，下标为 Symbol::index()
    tokens: [u8; 2],
    /// 电脑玩家的策略，人类玩家为 None
    strategy: Option<AIEngine>,
}

impl Player {
    pub fn new(color: Color, initial_tokens: u8) -> Self {
        Player {
            color,
            tokens: [initial_tokens; 2],
            strategy: None,
        }
    }

    /// 指定每种符号剩余数量
    pub fn with_tokens(color: Color, tokens_o: u8, tokens_x: u8) -> Self {
        Player {
            color,
            tokens: [tokens_o, tokens_x],
            strategy: None,
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// 某符号的剩余棋子数
    #[inline]
    pub fn tokens(&self, symbol: Symbol) -> u8 {
        self.tokens[symbol.index()]
    }

    #[inline]
    pub fn has_tokens(&self, symbol: Symbol) -> bool {
        self.tokens(symbol) > 0
    }

    /// O 和 X 都已用完
    pub fn is_out_of_tokens(&self) -> bool {
        self.tokens.iter().all(|&n| n == 0)
    }

    /// 取出一枚棋子（放置时调用）
    pub(crate) fn take_token(&mut self, symbol: Symbol) {
        let slot = &mut self.tokens[symbol.index()];
        if *slot == 0 {
            panic!("{} has no {} token left to place", self.color, symbol);
        }
        *slot -= 1;
    }

    /// 归还一枚棋子（撤销放置时调用）
    pub(crate) fn return_token(&mut self, symbol: Symbol) {
        self.tokens[symbol.index()] += 1;
    }

    /// 重置库存（再来一局）
    pub(crate) fn reset_tokens(&mut self, initial_tokens: u8) {
        self.tokens = [initial_tokens; 2];
    }

    pub fn strategy(&self) -> Option<&AIEngine> {
        self.strategy.as_ref()
    }

    pub fn is_computer(&self) -> bool {
        self.strategy.is_some()
    }

    pub(crate) fn set_strategy(&mut self, strategy: Option<AIEngine>) {
        self.strategy = strategy;
    }

    /// 暂时取出策略（策略需要可变借用整个局面）
    pub(crate) fn take_strategy(&mut self) -> Option<AIEngine> {
        self.strategy.take()
    }
}
