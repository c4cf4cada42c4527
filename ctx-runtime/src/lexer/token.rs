//! # Token 模块
//!
//! 定义词法单元及其标签集合。
//!
//! Token 一经产生即不可变：词法器创建，解析器只读消费。

use serde::{Deserialize, Serialize};

/// Token 标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    // ── 字面量 ──
    /// 数字字面量
    Number,
    /// 字符串字面量（lexeme 含首尾引号）
    Str,
    /// 标识符
    Identifier,

    // ── 关键字（大小写不敏感） ──
    Let,
    Func,
    If,
    Else,
    While,
    For,
    Return,
    True,
    False,
    Null,

    // ── 运算符 ──
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `**`
    StarStar,
    /// `:=`（单独的 `=` 也归入此类，兼容行为）
    Assign,
    /// `::`
    AssignConst,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    // ── 数学符号（词法保留，语法暂不消费） ──
    /// `@` 点积
    DotProduct,
    /// `⊗` 外积
    OuterProduct,
    /// `∇` 梯度
    Gradient,
    /// `∂` 偏导
    Partial,

    // ── 定界符 ──
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`（词法保留，语法暂不消费）
    LParen,
    /// `)`（词法保留，语法暂不消费）
    RParen,
    /// `|` 块开始
    Pipe,
    /// `^` 块结束
    Caret,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,

    // ── 特殊 ──
    /// 换行（语法暂不消费，解析器透明跳过）
    Newline,
    /// 输入结束，流中有且仅有一个
    Eof,
}

impl TokenKind {
    /// 按关键字表匹配标识符文本（大小写不敏感）
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text.to_ascii_lowercase().as_str() {
            "let" => Some(TokenKind::Let),
            "func" => Some(TokenKind::Func),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "for" => Some(TokenKind::For),
            "return" => Some(TokenKind::Return),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "null" => Some(TokenKind::Null),
            _ => None,
        }
    }
}

/// 词法单元
///
/// 携带源位置（行、列均从 1 开始），供各阶段诊断使用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// 标签
    pub kind: TokenKind,
    /// 原文文本
    pub lexeme: String,
    /// 起始行号
    pub line: usize,
    /// 起始列号
    pub column: usize,
}

impl Token {
    /// 创建新的 Token
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}
