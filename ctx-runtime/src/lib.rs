//! # ctx-runtime
//!
//! Cortex 语言的核心运行时：词法、语法、求值三段管线加上共享的
//! AST / 值 / 错误定义。
//!
//! ## 架构
//!
//! ```text
//! 源码 → [lexer] → Vec<Token> → [parser] → Program → [interpreter] → Value
//!                                                          │
//!                                                          └→ 输出缓冲（print）
//! ```
//!
//! ## 设计原则
//!
//! - 纯逻辑 crate：不做 IO、不打日志，`print` 的输出进缓冲由宿主刷出
//! - 每阶段一个错误枚举（[`LexError`] / [`ParseError`] / [`RuntimeError`]），
//!   [`CtxError`] 统一对外；首个错误即终止，无恢复
//! - AST 与值派生 serde，宿主可以序列化缓存或做快照调试
//! - 单线程同步求值，无内部可变性、无全局状态

pub mod ast;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::Program;
pub use error::{CtxError, CtxResult, LexError, ParseError, RuntimeError};
pub use interpreter::Interpreter;
pub use lexer::{Token, TokenKind, tokenize};
pub use parser::parse;
pub use value::Value;

/// 一步执行：词法 + 语法 + 求值，返回最后一条语句的值
///
/// 每次调用使用全新的环境；`print` 的输出被丢弃。需要输出缓冲或
/// 跨次求值状态的宿主直接使用 [`Interpreter`]。
pub fn run_program(source: &str) -> CtxResult<Value> {
    Interpreter::new().eval_source(source)
}
