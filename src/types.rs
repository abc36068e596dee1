//! Oxono 核心类型定义
//!
//! 定义棋盘、规则和 AI 共用的基础数据类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 连成一线获胜所需的棋子数
pub const WIN_LENGTH: usize = 4;

/// 默认棋盘边长
pub const DEFAULT_BOARD_SIZE: usize = 6;

/// 最小棋盘边长（必须能放下一条获胜线）
pub const MIN_BOARD_SIZE: usize = WIN_LENGTH;

/// 最大棋盘边长（列用 a-z 表示）
pub const MAX_BOARD_SIZE: usize = 26;

/// 每位玩家每种符号的初始棋子数
pub const INITIAL_TOKEN_COUNT: u8 = 8;

/// 图腾/棋子符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    O,
    X,
}

impl Symbol {
    /// 两种符号，按枚举顺序
    pub const ALL: [Symbol; 2] = [Symbol::O, Symbol::X];

    /// 获取另一种符号
    pub fn other(&self) -> Symbol {
        match self {
            Symbol::O => Symbol::X,
            Symbol::X => Symbol::O,
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        match self {
            Symbol::O => 0,
            Symbol::X => 1,
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        match c.to_ascii_uppercase() {
            'O' => Some(Symbol::O),
            'X' => Some(Symbol::X),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Symbol::O => 'O',
            Symbol::X => 'X',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// 玩家颜色（只有棋子有颜色，图腾无色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Pink,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::Pink, Color::Black];

    /// 获取对方颜色
    pub fn opposite(&self) -> Color {
        match self {
            Color::Pink => Color::Black,
            Color::Black => Color::Pink,
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        match self {
            Color::Pink => 0,
            Color::Black => 1,
        }
    }

    /// 从记谱字符解析
    pub fn from_notation_char(c: char) -> Option<Color> {
        match c {
            'p' => Some(Color::Pink),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为记谱字符
    pub fn to_notation_char(&self) -> char {
        match self {
            Color::Pink => 'p',
            Color::Black => 'b',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Color::Pink => "pink",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Pink => write!(f, "Pink"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 棋盘位置 (row, col)
///
/// row: 0 为最上方一行
/// col: 0 为最左侧一列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    /// 位置加偏移量
    #[inline]
    pub fn offset(&self, row_delta: i8, col_delta: i8) -> Position {
        Position {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// 检查位置是否在给定边长的棋盘内
    #[inline]
    pub fn is_within(&self, size: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < size && (self.col as usize) < size
    }

    /// 是否与另一位置正交相邻
    pub fn is_orthogonal_neighbor(&self, other: Position) -> bool {
        let dr = (self.row - other.row).abs();
        let dc = (self.col - other.col).abs();
        dr + dc == 1
    }

    /// 从记谱坐标解析（如 "c2" 表示第 2 行第 2 列）
    pub fn from_notation_str(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let col = match chars.next()? {
            c @ 'a'..='z' => (c as u8 - b'a') as i8,
            _ => return None,
        };
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let row: i8 = digits.parse().ok()?;
        Some(Position { row, col })
    }

    /// 转换为记谱坐标，列超出 a..z 或行为负时输出 `(行,列)`
    pub fn to_notation_str(&self) -> String {
        if (0..MAX_BOARD_SIZE as i8).contains(&self.col) && self.row >= 0 {
            let col_char = (b'a' + self.col as u8) as char;
            format!("{}{}", col_char, self.row)
        } else {
            format!("({},{})", self.row, self.col)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation_str())
    }
}

/// 棋子：带颜色和符号，参与连线判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub symbol: Symbol,
    pub color: Color,
    /// 是否属于获胜连线（界面高亮用）
    pub winning: bool,
}

impl Token {
    pub fn new(symbol: Symbol, color: Color) -> Self {
        Token {
            symbol,
            color,
            winning: false,
        }
    }
}

/// 格子上的占用者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pawn {
    Totem(Symbol),
    Token(Token),
}

impl Pawn {
    pub fn symbol(&self) -> Symbol {
        match self {
            Pawn::Totem(symbol) => *symbol,
            Pawn::Token(token) => token.symbol,
        }
    }

    #[inline]
    pub fn is_totem(&self) -> bool {
        matches!(self, Pawn::Totem(_))
    }

    #[inline]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Pawn::Token(token) => Some(token),
            Pawn::Totem(_) => None,
        }
    }

    /// 转换为记谱字符
    pub fn to_notation_char(&self) -> char {
        match self {
            Pawn::Totem(Symbol::O) => '@',
            Pawn::Totem(Symbol::X) => '#',
            Pawn::Token(token) => match token.color {
                Color::Pink => token.symbol.to_char(),
                Color::Black => token.symbol.to_char().to_ascii_lowercase(),
            },
        }
    }

    /// 从记谱字符解析
    pub fn from_notation_char(c: char) -> Option<Pawn> {
        match c {
            '@' => Some(Pawn::Totem(Symbol::O)),
            '#' => Some(Pawn::Totem(Symbol::X)),
            'O' | 'X' => Symbol::from_char(c).map(|s| Pawn::Token(Token::new(s, Color::Pink))),
            'o' | 'x' => Symbol::from_char(c).map(|s| Pawn::Token(Token::new(s, Color::Black))),
            _ => None,
        }
    }
}

/// 对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// 等待移动图腾
    MoveTotem,
    /// 等待放置棋子
    InsertToken,
    Win,
    Draw,
    Surrender,
    /// 再来一局（短暂阶段，随即回到 MoveTotem）
    Rematch,
}

impl Phase {
    /// 是否为终局阶段
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Win | Phase::Draw | Phase::Surrender)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::MoveTotem => "MoveTotem",
            Phase::InsertToken => "InsertToken",
            Phase::Win => "Win",
            Phase::Draw => "Draw",
            Phase::Surrender => "Surrender",
            Phase::Rematch => "Rematch",
        };
        write!(f, "{}", name)
    }
}

/// 完整的一步：移动哪个图腾、移到哪里、棋子放在哪里
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedMove {
    pub totem: Symbol,
    pub destination: Position,
    pub insertion: Position,
}

impl PlannedMove {
    pub fn new(totem: Symbol, destination: Position, insertion: Position) -> Self {
        PlannedMove {
            totem,
            destination,
            insertion,
        }
    }

    /// 转换为记谱字符串，如 `O:c3+b3`（图腾起点由局面决定，不写出）
    pub fn to_notation_str(&self) -> String {
        format!(
            "{}:{}+{}",
            self.totem,
            self.destination.to_notation_str(),
            self.insertion.to_notation_str()
        )
    }

    /// 从记谱字符串解析（`O:c3+b3`）
    pub fn from_notation_str(s: &str) -> Option<PlannedMove> {
        let (totem, rest) = s.trim().split_once(':')?;
        let mut totem_chars = totem.chars();
        let symbol = Symbol::from_char(totem_chars.next()?)?;
        if totem_chars.next().is_some() {
            return None;
        }
        let (destination, insertion) = rest.split_once('+')?;
        Some(PlannedMove {
            totem: symbol,
            destination: Position::from_notation_str(destination)?,
            insertion: Position::from_notation_str(insertion)?,
        })
    }
}

impl fmt::Display for PlannedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_notation_str())
    }
}

/// 引擎错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OxonoError {
    /// 位置超出棋盘
    OutOfBounds { position: Position, size: usize },
    /// 配置参数非法
    InvalidConfig(String),
    /// 记谱解析失败
    Notation(String),
}

impl fmt::Display for OxonoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OxonoError::OutOfBounds { position, size } => write!(
                f,
                "Position ({}, {}) is outside the {}x{} board",
                position.row, position.col, size, size
            ),
            OxonoError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            OxonoError::Notation(msg) => write!(f, "Invalid notation: {}", msg),
        }
    }
}

impl std::error::Error for OxonoError {}
