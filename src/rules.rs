//! Oxono 规则
//!
//! 图腾走法、棋子放置、胜负与和棋判定，全部是对棋盘的只读查询
//! （`check_winner` 例外，会标记获胜棋子）。

use crate::board::Board;
use crate::player::Player;
use crate::types::{Color, Position, Symbol, Token, WIN_LENGTH};

/// 四个正交方向：上、下、左、右
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// ============================================================================
// 图腾走法
// ============================================================================

/// 从某位置出发的图腾目标格
///
/// 三级回退：滑行 -> 跳跃 -> 任意空格，前一级有结果时不会尝试下一级。
pub fn valid_moves_from(board: &Board, from: Position) -> Vec<Position> {
    let mut moves = slide_moves(board, from);
    if moves.is_empty() {
        moves = jump_moves(board, from);
    }
    if moves.is_empty() {
        moves = board.empty_positions().filter(|&p| p != from).collect();
    }
    moves
}

/// 滑行：每个方向上连续的空格
fn slide_moves(board: &Board, from: Position) -> Vec<Position> {
    let mut moves = Vec::with_capacity(board.size() * 2);
    for (dr, dc) in DIRECTIONS {
        let mut pos = from.offset(dr, dc);
        while board.is_free(pos) {
            moves.push(pos);
            pos = pos.offset(dr, dc);
        }
    }
    moves
}

/// 跳跃：越过紧邻的一串占用格后的第一个空格
fn jump_moves(board: &Board, from: Position) -> Vec<Position> {
    let mut moves = Vec::with_capacity(4);
    for (dr, dc) in DIRECTIONS {
        let mut pos = from.offset(dr, dc);
        if !board.is_occupied(pos) {
            continue;
        }
        while board.is_occupied(pos) {
            pos = pos.offset(dr, dc);
        }
        // 走到边界外说明这个方向无处落脚
        if board.is_free(pos) {
            moves.push(pos);
        }
    }
    moves
}

/// 图腾的所有合法目标格
#[inline]
pub fn valid_moves(board: &Board, totem: Symbol) -> Vec<Position> {
    valid_moves_from(board, board.totem_position(totem))
}

/// 图腾能否移动到某位置
pub fn is_valid_move(board: &Board, totem: Symbol, pos: Position) -> bool {
    board.contains(pos) && valid_moves(board, totem).contains(&pos)
}

// ============================================================================
// 棋子放置
// ============================================================================

/// 图腾落在 `around` 之后可放置棋子的格子
///
/// 先取四个正交相邻空格，若一个都没有则可放在任意空格。
pub fn valid_inserts(board: &Board, around: Position) -> Vec<Position> {
    let adjacent: Vec<Position> = DIRECTIONS
        .iter()
        .map(|&(dr, dc)| around.offset(dr, dc))
        .filter(|&p| board.is_free(p))
        .collect();
    if !adjacent.is_empty() {
        return adjacent;
    }
    board.empty_positions().collect()
}

/// 带某符号的棋子能否放在某位置（以同符号图腾的当前位置为中心）
pub fn is_valid_insert(board: &Board, symbol: Symbol, pos: Position) -> bool {
    board.contains(pos) && valid_inserts(board, board.totem_position(symbol)).contains(&pos)
}

// ============================================================================
// 胜负判定
// ============================================================================

/// 获胜连线的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Symbol(Symbol),
    Color(Color),
}

/// 一条获胜连线
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine {
    pub positions: [Position; WIN_LENGTH],
    pub kind: LineKind,
}

/// 扫描一条线，符号连数与颜色连数各自独立计数
///
/// 空格和图腾会把两个计数都清零；相邻棋子不匹配时只把对应计数重置为 1。
fn scan_line(board: &Board, start: Position, step: (i8, i8)) -> Option<WinningLine> {
    let mut symbol_run = 0usize;
    let mut color_run = 0usize;
    let mut previous: Option<Token> = None;
    let mut pos = start;

    while board.contains(pos) {
        match board.get(pos).and_then(|p| p.as_token()) {
            None => {
                symbol_run = 0;
                color_run = 0;
                previous = None;
            }
            Some(token) => {
                match previous {
                    Some(prev) => {
                        symbol_run = if prev.symbol == token.symbol { symbol_run + 1 } else { 1 };
                        color_run = if prev.color == token.color { color_run + 1 } else { 1 };
                    }
                    None => {
                        symbol_run = 1;
                        color_run = 1;
                    }
                }

                let kind = if color_run == WIN_LENGTH {
                    Some(LineKind::Color(token.color))
                } else if symbol_run == WIN_LENGTH {
                    Some(LineKind::Symbol(token.symbol))
                } else {
                    None
                };
                if let Some(kind) = kind {
                    let mut positions = [pos; WIN_LENGTH];
                    for (i, slot) in positions.iter_mut().enumerate() {
                        let back = (WIN_LENGTH - 1 - i) as i8;
                        *slot = pos.offset(-back * step.0, -back * step.1);
                    }
                    return Some(WinningLine { positions, kind });
                }
                previous = Some(*token);
            }
        }
        pos = pos.offset(step.0, step.1);
    }
    None
}

/// 查找第一条获胜连线：先逐行，再逐列
pub fn find_winning_line(board: &Board) -> Option<WinningLine> {
    let size = board.size() as i8;
    (0..size)
        .find_map(|row| scan_line(board, Position::new(row, 0), (0, 1)))
        .or_else(|| (0..size).find_map(|col| scan_line(board, Position::new(0, col), (1, 0))))
}

/// 是否已有获胜连线（不修改棋盘，搜索时使用）
#[inline]
pub fn has_winner(board: &Board) -> bool {
    find_winning_line(board).is_some()
}

/// 判定胜负并标记获胜棋子
pub fn check_winner(board: &mut Board) -> Option<WinningLine> {
    let line = find_winning_line(board)?;
    for pos in line.positions {
        board.mark_winning(pos);
    }
    Some(line)
}

/// 和棋：棋盘已满，或双方的 O、X 棋子同时耗尽
pub fn is_draw(board: &Board, players: &[Player; 2]) -> bool {
    board.is_full() || players.iter().all(|p| p.is_out_of_tokens())
}

// ============================================================================
// 局面评估
// ============================================================================

/// 从某个棋子出发沿一个方向统计潜在连线
fn line_potential(board: &Board, from: Position, dir: (i8, i8), start: &Token) -> i32 {
    let mut symbol_count = 1;
    let mut color_count = 1;

    for i in 1..WIN_LENGTH as i8 {
        let pos = from.offset(i * dir.0, i * dir.1);
        match board.get(pos).and_then(|p| p.as_token()) {
            Some(token) => {
                if token.symbol == start.symbol {
                    symbol_count += 1;
                }
                if token.color == start.color {
                    color_count += 1;
                }
            }
            None => break,
        }
    }

    run_value(symbol_count) + run_value(color_count)
}

#[inline]
fn run_value(count: usize) -> i32 {
    match count {
        2 => 1,
        3 => 5,
        4 => 100,
        _ => 0,
    }
}

/// 位置评估：己方棋子的连线潜力减去对方的
pub fn evaluate_position(board: &Board, color: Color) -> i32 {
    board
        .tokens()
        .map(|(pos, token)| {
            let value: i32 = DIRECTIONS
                .iter()
                .map(|&dir| line_potential(board, pos, dir, token))
                .sum();
            if token.color == color {
                value
            } else {
                -value
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Pawn;

    fn board_from(rows: &[&str]) -> Board {
        let size = rows.len();
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(Pawn::from_notation_char))
            .collect();
        Board::from_cells(size, cells).unwrap()
    }

    fn pos(row: i8, col: i8) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_slide_moves_initial() {
        let board = Board::new(6).unwrap();
        let moves = valid_moves(&board, Symbol::O);
        // 上 2 格、下 3 格、左 2 格、右 3 格
        assert_eq!(moves.len(), 10);
        assert!(moves.contains(&pos(0, 2)));
        assert!(moves.contains(&pos(5, 2)));
        assert!(moves.contains(&pos(2, 0)));
        assert!(moves.contains(&pos(2, 5)));
        assert!(!moves.contains(&pos(3, 3)));
        assert!(!moves.contains(&pos(0, 0)));
    }

    #[test]
    fn test_slide_stops_at_first_occupied() {
        let board = board_from(&[
            "......",
            "......",
            "@.X...",
            "......",
            "......",
            "#.....",
        ]);
        let moves = valid_moves(&board, Symbol::O);
        assert!(moves.contains(&pos(2, 1)));
        assert!(!moves.contains(&pos(2, 3)));
        assert!(moves.contains(&pos(0, 0)));
        assert!(moves.contains(&pos(4, 0)));
        assert!(!moves.contains(&pos(5, 0)));
    }

    #[test]
    fn test_jump_lands_beyond_obstruction() {
        // O 图腾四面被围，只能跳
        let board = board_from(&[
            "......",
            "..x...",
            ".o@X..",
            "..#...",
            "..o...",
            "......",
        ]);
        let moves = valid_moves(&board, Symbol::O);
        let mut expected = vec![pos(0, 2), pos(5, 2), pos(2, 0), pos(2, 4)];
        let mut got = moves.clone();
        expected.sort_by_key(|p| (p.row, p.col));
        got.sort_by_key(|p| (p.row, p.col));
        assert_eq!(got, expected);
        assert!(is_valid_move(&board, Symbol::O, pos(2, 4)));
        assert!(!is_valid_move(&board, Symbol::O, pos(2, 5)));
    }

    #[test]
    fn test_jump_direction_blocked_by_edge() {
        // 上方一路被占到边界，该方向无跳跃目标
        let board = board_from(&[
            "..x...",
            "..x...",
            ".o@X..",
            "..#...",
            "..o...",
            "......",
        ]);
        let moves = valid_moves(&board, Symbol::O);
        assert!(!moves.iter().any(|p| p.col == 2 && p.row < 2));
        assert!(moves.contains(&pos(5, 2)));
        assert!(moves.contains(&pos(2, 0)));
        assert!(moves.contains(&pos(2, 4)));
    }

    #[test]
    fn test_anywhere_when_no_jump() {
        // 4x4 棋盘，O 图腾在角落，两个方向都被占满到边界
        let board = board_from(&[
            "@xOo",
            "X...",
            "o...",
            "#...",
        ]);
        let moves = valid_moves(&board, Symbol::O);
        let empties: Vec<Position> = board.empty_positions().collect();
        assert_eq!(moves, empties);
        assert_eq!(moves.len(), 9);
        assert!(!moves.contains(&pos(0, 0)));
    }

    #[test]
    fn test_inserts_adjacent() {
        let board = Board::new(6).unwrap();
        let inserts = valid_inserts(&board, board.totem_position(Symbol::O));
        assert_eq!(inserts, vec![pos(1, 2), pos(3, 2), pos(2, 1), pos(2, 3)]);
        assert!(is_valid_insert(&board, Symbol::O, pos(2, 3)));
        assert!(!is_valid_insert(&board, Symbol::O, pos(0, 0)));
        assert!(!is_valid_insert(&board, Symbol::O, pos(9, 9)));
    }

    #[test]
    fn test_inserts_anywhere_when_surrounded() {
        let board = board_from(&[
            "......",
            "..x...",
            ".o@X..",
            "..#...",
            "......",
            "......",
        ]);
        let inserts = valid_inserts(&board, board.totem_position(Symbol::O));
        assert_eq!(inserts.len(), board.free_cell_count());
        assert!(inserts.contains(&pos(5, 5)));
    }

    #[test]
    fn test_symbol_run_wins() {
        let mut board = board_from(&[
            "......",
            ".O....",
            ".o@...",
            ".O.#..",
            ".o....",
            "......",
        ]);
        let line = check_winner(&mut board).unwrap();
        assert_eq!(line.kind, LineKind::Symbol(Symbol::O));
        assert_eq!(line.positions, [pos(1, 1), pos(2, 1), pos(3, 1), pos(4, 1)]);
        assert_eq!(board.winning_positions().len(), 4);
    }

    #[test]
    fn test_color_run_wins() {
        let board = board_from(&[
            "OXOX..",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        let line = find_winning_line(&board).unwrap();
        assert_eq!(line.kind, LineKind::Color(Color::Pink));
    }

    #[test]
    fn test_totem_breaks_run() {
        let board = board_from(&[
            "......",
            ".O....",
            ".o....",
            ".@.#..",
            ".O....",
            ".o....",
        ]);
        assert!(!has_winner(&board));
    }

    #[test]
    fn test_gap_breaks_run() {
        let board = board_from(&[
            "OO.OO.",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        assert!(!has_winner(&board));
    }

    #[test]
    fn test_mismatch_resets_only_that_streak() {
        // 符号 O O X X O O，颜色 粉 粉 粉 粉 -> 颜色连成 4
        let board = board_from(&[
            "OOXXoo",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        let line = find_winning_line(&board).unwrap();
        assert_eq!(line.kind, LineKind::Color(Color::Pink));
        assert_eq!(line.positions[0], pos(0, 0));

        // 颜色交替而符号相同
        let board = board_from(&[
            "xXxX..",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        let line = find_winning_line(&board).unwrap();
        assert_eq!(line.kind, LineKind::Symbol(Symbol::X));

        // 符号与颜色都交替，没有连线
        let board = board_from(&[
            "OxOxOx",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        assert!(!has_winner(&board));
    }

    #[test]
    fn test_rows_checked_before_columns() {
        let board = board_from(&[
            "X.....",
            "X.....",
            "X.@...",
            "xOOOO.",
            "...#..",
            "......",
        ]);
        let line = find_winning_line(&board).unwrap();
        assert_eq!(line.positions[0], pos(3, 1));
    }

    #[test]
    fn test_draw_conditions() {
        let board = Board::new(6).unwrap();
        let mut players = [Player::new(Color::Pink, 8), Player::new(Color::Black, 8)];
        assert!(!is_draw(&board, &players));
        players[0] = Player::new(Color::Pink, 0);
        assert!(!is_draw(&board, &players));
        players[1] = Player::new(Color::Black, 0);
        assert!(is_draw(&board, &players));
    }

    #[test]
    fn test_evaluate_position_symmetry() {
        let board = board_from(&[
            "OO....",
            "......",
            "..@...",
            "...#..",
            "......",
            "......",
        ]);
        let pink = evaluate_position(&board, Color::Pink);
        assert!(pink > 0);
        assert_eq!(evaluate_position(&board, Color::Black), -pink);
        assert_eq!(evaluate_position(&Board::new(6).unwrap(), Color::Pink), 0);
    }
}
