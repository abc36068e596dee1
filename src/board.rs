//! Oxono 棋盘
//!
//! 只负责格子和两个图腾的位置缓存，不包含任何规则判断。
//! 图腾位置缓存与格子内容只通过同一组修改方法同步更新。

use crate::types::{
    OxonoError, Pawn, Position, Symbol, Token, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
use std::fmt;

/// 棋盘（size x size 的格子数组）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// 按行优先存储的格子
    cells: Vec<Option<Pawn>>,
    /// 缓存两个图腾的位置，下标为 Symbol::index()
    totems: [Position; 2],
}

impl Board {
    /// 创建新棋盘，两个图腾放在中心附近：O 在 ((s-1)/2, (s-1)/2)，X 在其右下方
    pub fn new(size: usize) -> Result<Board, OxonoError> {
        check_size(size)?;
        let center = ((size - 1) / 2) as i8;
        let totem_o = Position::new(center, center);
        let totem_x = Position::new(center + 1, center + 1);

        let mut cells = vec![None; size * size];
        cells[index_of(size, totem_o)] = Some(Pawn::Totem(Symbol::O));
        cells[index_of(size, totem_x)] = Some(Pawn::Totem(Symbol::X));

        Ok(Board {
            size,
            cells,
            totems: [totem_o, totem_x],
        })
    }

    /// 从格子列表构建棋盘（记谱解析用），要求两个图腾各出现且只出现一次
    pub fn from_cells(size: usize, cells: Vec<Option<Pawn>>) -> Result<Board, OxonoError> {
        check_size(size)?;
        if cells.len() != size * size {
            return Err(OxonoError::Notation(format!(
                "expected {} cells, got {}",
                size * size,
                cells.len()
            )));
        }

        let mut found: [Option<Position>; 2] = [None, None];
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(Pawn::Totem(symbol)) = cell {
                let pos = position_of(size, idx);
                if found[symbol.index()].replace(pos).is_some() {
                    return Err(OxonoError::Notation(format!(
                        "totem {} appears more than once",
                        symbol
                    )));
                }
            }
        }

        let totem_o = found[0]
            .ok_or_else(|| OxonoError::Notation("totem O is missing".to_string()))?;
        let totem_x = found[1]
            .ok_or_else(|| OxonoError::Notation("totem X is missing".to_string()))?;

        Ok(Board {
            size,
            cells,
            totems: [totem_o, totem_x],
        })
    }

    /// 棋盘边长
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// 格子总数
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// 位置是否在棋盘内
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.size)
    }

    fn check_bounds(&self, pos: Position) -> Result<usize, OxonoError> {
        if self.contains(pos) {
            Ok(index_of(self.size, pos))
        } else {
            Err(OxonoError::OutOfBounds {
                position: pos,
                size: self.size,
            })
        }
    }

    /// 获取某位置的占用者，越界时返回错误
    pub fn pawn_at(&self, pos: Position) -> Result<Option<Pawn>, OxonoError> {
        let idx = self.check_bounds(pos)?;
        Ok(self.cells[idx])
    }

    /// 获取某位置的占用者，越界视为无
    #[inline]
    pub fn get(&self, pos: Position) -> Option<&Pawn> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[index_of(self.size, pos)].as_ref()
    }

    /// 检查某位置是否为空，越界时返回错误
    pub fn is_empty(&self, pos: Position) -> Result<bool, OxonoError> {
        let idx = self.check_bounds(pos)?;
        Ok(self.cells[idx].is_none())
    }

    /// 在棋盘内且为空
    #[inline]
    pub fn is_free(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[index_of(self.size, pos)].is_none()
    }

    /// 在棋盘内且被占用
    #[inline]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.contains(pos) && self.cells[index_of(self.size, pos)].is_some()
    }

    /// 棋盘是否已满
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// 空格数量
    pub fn free_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// 图腾当前位置（使用缓存）
    #[inline]
    pub fn totem_position(&self, symbol: Symbol) -> Position {
        self.totems[symbol.index()]
    }

    /// 移动图腾（不做合法性检查，由规则层负责）
    ///
    /// 缓存与格子在同一次调用中更新。
    pub fn move_totem(&mut self, symbol: Symbol, to: Position) -> Result<(), OxonoError> {
        let to_idx = self.check_bounds(to)?;
        let from = self.totem_position(symbol);
        let from_idx = index_of(self.size, from);

        match self.cells[from_idx].take() {
            Some(Pawn::Totem(s)) if s == symbol => {}
            other => panic!(
                "totem {} cache points at {} which holds {:?}",
                symbol, from, other
            ),
        }

        self.cells[to_idx] = Some(Pawn::Totem(symbol));
        self.totems[symbol.index()] = to;
        Ok(())
    }

    /// 放置棋子
    pub fn place_token(&mut self, token: Token, pos: Position) -> Result<(), OxonoError> {
        let idx = self.check_bounds(pos)?;
        if let Some(Pawn::Totem(symbol)) = self.cells[idx] {
            panic!("cannot place a token over totem {} at {}", symbol, pos);
        }
        self.cells[idx] = Some(Pawn::Token(token));
        Ok(())
    }

    /// 移除某位置的棋子，返回被移除的占用者
    ///
    /// 图腾只能通过 `move_totem` 移动，不能被移除。
    pub fn remove_pawn(&mut self, pos: Position) -> Result<Option<Pawn>, OxonoError> {
        let idx = self.check_bounds(pos)?;
        if let Some(Pawn::Totem(symbol)) = self.cells[idx] {
            panic!("attempted to remove totem {} at {}", symbol, pos);
        }
        Ok(self.cells[idx].take())
    }

    /// 标记获胜连线上的棋子
    pub(crate) fn mark_winning(&mut self, pos: Position) {
        if !self.contains(pos) {
            return;
        }
        let idx = index_of(self.size, pos);
        if let Some(Pawn::Token(token)) = self.cells[idx].as_mut() {
            token.winning = true;
        }
    }

    /// 所有位置（行优先）
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size * size).map(move |idx| position_of(size, idx))
    }

    /// 所有空格（行优先）
    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(move |(idx, _)| position_of(self.size, idx))
    }

    /// 所有棋子及其位置
    pub fn tokens(&self) -> impl Iterator<Item = (Position, &Token)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, c)| match c {
            Some(Pawn::Token(token)) => Some((position_of(self.size, idx), token)),
            _ => None,
        })
    }

    /// 所有被标记为获胜连线的位置
    pub fn winning_positions(&self) -> Vec<Position> {
        self.tokens()
            .filter(|(_, t)| t.winning)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// 检查图腾缓存与格子是否一致
    pub fn is_consistent(&self) -> bool {
        Symbol::ALL.iter().all(|&symbol| {
            let pos = self.totem_position(symbol);
            self.get(pos) == Some(&Pawn::Totem(symbol))
        }) && self.cells.iter().filter(|c| matches!(c, Some(Pawn::Totem(_)))).count() == 2
    }
}

#[inline]
fn index_of(size: usize, pos: Position) -> usize {
    pos.row as usize * size + pos.col as usize
}

#[inline]
fn position_of(size: usize, idx: usize) -> Position {
    Position::new((idx / size) as i8, (idx % size) as i8)
}

fn check_size(size: usize) -> Result<(), OxonoError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(OxonoError::InvalidConfig(format!(
            "board size must be between {} and {}, got {}",
            MIN_BOARD_SIZE, MAX_BOARD_SIZE, size
        )));
    }
    Ok(())
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{:>3}", row)?;
            for col in 0..self.size {
                let c = self.cells[row * self.size + col]
                    .map_or('.', |p| p.to_notation_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
