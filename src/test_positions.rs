//! Oxono 测试局面库
//!
//! 提供命名的记谱测试局面，方便测试、基准和命令行调试
//!
//! 命名规范:
//! - START_n: 初始局面（n 为边长，START 为默认 6x6）
//! - ONE_WIN: 恰有一种立即获胜的走法
//! - THREAT: 没有立即获胜，但部分走法会让对手立即获胜
//! - SMALL_n: 4x4 小棋盘，可以穷举验证搜索
//! - FULL_BUT_ONE / LAST_TOKENS: 和棋边界

// =============================================================================
// 初始局面
// =============================================================================

/// 默认 6x6 初始局面
pub const START: &str = "6/6/2@3/3#2/6/6 8:8:8:8 p";

/// 4x4 初始局面
pub const START_4: &str = "4/1@2/2#1/4 8:8:8:8 p";

/// 8x8 初始局面
pub const START_8: &str = "8/8/8/3@4/4#3/8/8/8 8:8:8:8 p";

// =============================================================================
// 战术局面
// =============================================================================

/// 第 0 列已有三个 O，粉方只能把 O 图腾移到 c3 旁并在 a3 放 O 获胜
pub const ONE_WIN: &str = "O5/o5/O5/6/3#2/1@4 7:8:7:8 p";

/// 粉方无法立即获胜；O 图腾若移到第 3、4 行，黑方可以在 a3 补成四连
pub const THREAT: &str = "O4/o1@2/O4/5/4# 7:8:7:8 p";

// =============================================================================
// 小棋盘
// =============================================================================

/// 4x4，双方各放了两枚棋子
pub const SMALL_1: &str = "O2x/1@2/2#1/o2X 7:7:7:7 p";

/// 4x4，第 0 行差一个 O
pub const SMALL_2: &str = "OoO1/x3/1#1@/X2o 6:7:6:7 p";

// =============================================================================
// 和棋边界
// =============================================================================

/// 4x4 只剩一个空格，X 图腾只能移到 d3
pub const FULL_BUT_ONE: &str = "OxOx/XoXo/oX@O/xO#1 8:8:8:8 p";

/// 粉方只剩一枚 O，黑方已放完
pub const LAST_TOKENS: &str = "6/6/2@3/3#2/6/6 1:0:0:0 p";

/// 所有命名局面
pub const NAMED_POSITIONS: [(&str, &str); 9] = [
    ("start", START),
    ("start_4", START_4),
    ("start_8", START_8),
    ("one_win", ONE_WIN),
    ("threat", THREAT),
    ("small_1", SMALL_1),
    ("small_2", SMALL_2),
    ("full_but_one", FULL_BUT_ONE),
    ("last_tokens", LAST_TOKENS),
];

/// 按名字查找局面（不区分大小写）
pub fn by_name(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    NAMED_POSITIONS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, notation)| *notation)
}
