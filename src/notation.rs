//! 局面记谱解析和生成
//!
//! 格式: `<棋盘> <粉O>:<粉X>:<黑O>:<黑X> <回合>`
//!
//! 棋盘从第 0 行（顶部）到最后一行，行之间用 `/` 分隔：
//! - 图腾：@(O) #(X)
//! - 粉方棋子：O X
//! - 黑方棋子：o x
//! - 空格：十进制数字（大棋盘可以是多位数）
//!
//! 回合：p(粉方) b(黑方)

use crate::board::Board;
use crate::player::Player;
use crate::state::MatchState;
use crate::types::{
    Color, OxonoError, Pawn, Position, Symbol, INITIAL_TOKEN_COUNT, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE,
};

/// 解析记谱字符串，阶段为移动图腾
pub fn parse(s: &str) -> Result<MatchState, OxonoError> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(OxonoError::Notation(format!(
            "expected '<board> <counts> <turn>', got: {}",
            s
        )));
    }

    let (size, cells) = parse_board(parts[0])?;
    let board = Board::from_cells(size, cells)?;
    let counts = parse_counts(parts[1])?;
    let turn = parse_turn(parts[2])?;

    let players = [
        Player::with_tokens(Color::Pink, counts[0], counts[1]),
        Player::with_tokens(Color::Black, counts[2], counts[3]),
    ];
    let initial = counts
        .iter()
        .copied()
        .fold(INITIAL_TOKEN_COUNT, u8::max);
    Ok(MatchState::from_parts(board, players, turn, initial))
}

/// 解析棋盘部分，返回边长和按行优先排列的格子
fn parse_board(board_str: &str) -> Result<(usize, Vec<Option<Pawn>>), OxonoError> {
    let rows: Vec<&str> = board_str.split('/').collect();
    let size = rows.len();
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(OxonoError::Notation(format!(
            "board must have {} to {} rows, got {}",
            MIN_BOARD_SIZE, MAX_BOARD_SIZE, size
        )));
    }

    let mut cells = Vec::with_capacity(size * size);
    for (row, row_str) in rows.iter().enumerate() {
        let start = cells.len();
        let mut run = 0usize;
        for ch in row_str.chars() {
            if let Some(digit) = ch.to_digit(10) {
                run = run
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(digit as usize))
                    .filter(|&r| r <= size)
                    .ok_or_else(|| {
                        OxonoError::Notation(format!("row {} is wider than {}", row, size))
                    })?;
                continue;
            }
            cells.extend(std::iter::repeat(None).take(run));
            run = 0;
            let pawn = Pawn::from_notation_char(ch)
                .ok_or_else(|| OxonoError::Notation(format!("invalid cell character: {}", ch)))?;
            cells.push(Some(pawn));
        }
        cells.extend(std::iter::repeat(None).take(run));

        let width = cells.len() - start;
        if width != size {
            return Err(OxonoError::Notation(format!(
                "row {} has {} cells, expected {}",
                row, width, size
            )));
        }
    }
    Ok((size, cells))
}

/// 解析 `<粉O>:<粉X>:<黑O>:<黑X>`
fn parse_counts(counts_str: &str) -> Result<[u8; 4], OxonoError> {
    let fields: Vec<&str> = counts_str.split(':').collect();
    if fields.len() != 4 {
        return Err(OxonoError::Notation(format!(
            "expected four token counts, got: {}",
            counts_str
        )));
    }
    let mut counts = [0u8; 4];
    for (slot, field) in counts.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| OxonoError::Notation(format!("invalid token count: {}", field)))?;
    }
    Ok(counts)
}

fn parse_turn(turn_str: &str) -> Result<Color, OxonoError> {
    let mut chars = turn_str.chars();
    match (chars.next().and_then(Color::from_notation_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(OxonoError::Notation(format!("invalid turn: {}", turn_str))),
    }
}

/// 生成记谱字符串
pub fn format(state: &MatchState) -> String {
    let board = state.board();
    let size = board.size() as i8;
    let mut rows = Vec::with_capacity(board.size());

    for row in 0..size {
        let mut row_str = String::new();
        let mut empty = 0;
        for col in 0..size {
            match board.get(Position::new(row, col)) {
                Some(pawn) => {
                    if empty > 0 {
                        row_str.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row_str.push(pawn.to_notation_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            row_str.push_str(&empty.to_string());
        }
        rows.push(row_str);
    }

    let pink = state.player(Color::Pink);
    let black = state.player(Color::Black);
    format!(
        "{} {}:{}:{}:{} {}",
        rows.join("/"),
        pink.tokens(Symbol::O),
        pink.tokens(Symbol::X),
        black.tokens(Symbol::O),
        black.tokens(Symbol::X),
        state.to_play().to_notation_char()
    )
}
