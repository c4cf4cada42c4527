//! # Error 模块
//!
//! 定义 ctx-runtime 中使用的错误类型。
//!
//! 管线的三类错误与三个阶段一一对应：词法、语法、求值。
//! 任何一类错误都立即终止当前这次求值，管线内部没有恢复和重试；
//! 交互模式下的"继续接受输入"由宿主（CLI/REPL）负责。

use thiserror::Error;

/// 词法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    /// 无法识别的字符
    #[error("第 {line} 行第 {column} 列：无法识别的字符 '{ch}'")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    /// 字符串未闭合
    #[error("第 {line} 行第 {column} 列：字符串未闭合")]
    UnterminatedString { line: usize, column: usize },

    /// 块注释未闭合
    ///
    /// 位置指向注释的起始处，而不是文件末尾
    #[error("第 {line} 行第 {column} 列：块注释未闭合")]
    UnterminatedComment { line: usize, column: usize },
}

/// 语法错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// 意外的 token
    #[error("第 {line} 行第 {column} 列：意外的 token '{found}'")]
    UnexpectedToken {
        found: String,
        line: usize,
        column: usize,
    },

    /// 期望某个 token，实际是另一个
    #[error("第 {line} 行第 {column} 列：期望 {expected}，实际是 '{found}'")]
    ExpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    /// 输入意外结束
    #[error("输入意外结束：{context}")]
    UnexpectedEof { context: String },

    /// 无效的数字字面量
    #[error("第 {line} 行第 {column} 列：无效的数字字面量 '{literal}'")]
    InvalidNumber {
        literal: String,
        line: usize,
        column: usize,
    },
}

/// 运行时错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// 变量未定义
    #[error("变量 '{name}' 未定义")]
    UndefinedVariable { name: String },

    /// 函数未定义
    #[error("函数 '{name}' 未定义")]
    UndefinedFunction { name: String },

    /// 用户函数参数个数不匹配
    #[error("函数 '{name}' 期望 {expected} 个参数，实际传入 {actual} 个")]
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// 二元运算符不支持给定的操作数类型
    #[error("运算符 '{op}' 不支持操作数类型 {lhs} 和 {rhs}")]
    UnsupportedBinaryOperand {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// 一元运算符不支持给定的操作数类型
    #[error("运算符 '{op}' 不支持操作数类型 {operand}")]
    UnsupportedUnaryOperand {
        op: &'static str,
        operand: &'static str,
    },

    /// 常量重复定义（单次赋值规则）
    #[error("常量 '{name}' 已定义，不允许重新赋值")]
    ConstantRedefined { name: String },

    /// 内置函数调用不满足自身的参数约定
    #[error("内置函数 '{name}' 调用错误：{message}")]
    BuiltinCall { name: String, message: String },
}

/// ctx-runtime 统一错误类型
///
/// 对外入口（如 [`crate::run_program`]）用它报告失败发生在哪个阶段。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CtxError {
    /// 词法错误
    #[error("词法错误: {0}")]
    Lex(#[from] LexError),

    /// 语法错误
    #[error("语法错误: {0}")]
    Parse(#[from] ParseError),

    /// 运行时错误
    #[error("运行时错误: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Result 类型别名
pub type CtxResult<T> = Result<T, CtxError>;
