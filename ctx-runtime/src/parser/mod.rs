//! # Parser 模块
//!
//! 手写递归下降解析器：消费 Token 序列，构建 AST。
//!
//! ## 架构
//!
//! ```text
//! Vec<Token> → [语句分派] → [六级优先级表达式文法] → Program
//! ```
//!
//! ## 设计原则
//!
//! - 首个错误即终止：不做错误恢复，不产出部分 AST
//! - 每个错误携带出错 token 的行/列
//! - Newline token 在入口处透明滤除（词法保留、语法暂不消费）
//!
//! ## 模块结构
//!
//! - `expr`: 表达式优先级阶梯
//! - `tests`: 解析器测试套件

mod expr;

#[cfg(test)]
mod tests;

use crate::ast::{Node, NodeKind, Program, TypeAnnotation, Variable};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

/// 解析 Token 序列为程序 AST
///
/// # 返回
///
/// `Program`，或第一个语法错误（无恢复、无部分结果）。
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).run()
}

/// 递归下降解析器
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        // Newline 语法上是惰性 token：保留在词法模型中，这里滤除
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .collect();

        // 容错：保证游标永远停在有效 token 上（Eof 粘滞）
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, "", 1, 1));
        }

        Self { tokens, pos: 0 }
    }

    fn run(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while self.current().kind != TokenKind::Eof {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    // ---------------------------------------------------------------------
    // Token 游标
    // ---------------------------------------------------------------------

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// 消费当前 token 并返回它（Eof 上粘滞不前进）
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// 当前 token 匹配则消费
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// 期望并消费指定类别的 token，否则报错
    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        let found = self.current();
        if found.kind == TokenKind::Eof {
            Err(ParseError::UnexpectedEof {
                context: expected.to_string(),
            })
        } else {
            Err(ParseError::ExpectedToken {
                expected: expected.to_string(),
                found: found.lexeme.clone(),
                line: found.line,
                column: found.column,
            })
        }
    }

    // ---------------------------------------------------------------------
    // 语句
    // ---------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Node, ParseError> {
        match self.current().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Func => self.parse_function(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            _ => {
                // 裸表达式语句（如单独一行的调用）
                let expr = self.parse_expression()?;
                self.eat(TokenKind::Semicolon);
                Ok(expr)
            }
        }
    }

    /// `let name [: type] (:= expr | :: expr)`
    ///
    /// 可变与常量仅由赋值运算符区分。
    fn parse_let(&mut self) -> Result<Node, ParseError> {
        let let_tok = self.advance();
        let name = self.expect(TokenKind::Identifier, "变量名")?.lexeme;
        let annotation = self.parse_optional_annotation()?;

        if self.eat(TokenKind::AssignConst).is_some() {
            let value = Box::new(self.parse_expression()?);
            return Ok(Node::new(
                NodeKind::ConstantAssignment {
                    name,
                    annotation,
                    value,
                },
                let_tok.line,
                let_tok.column,
            ));
        }

        if self.eat(TokenKind::Assign).is_some() {
            let value = Box::new(self.parse_expression()?);
            return Ok(Node::new(
                NodeKind::Assignment {
                    name,
                    annotation,
                    value,
                },
                let_tok.line,
                let_tok.column,
            ));
        }

        let found = self.current().clone();
        Err(ParseError::ExpectedToken {
            expected: "赋值运算符 ':=' 或 '::'".to_string(),
            found: found.lexeme,
            line: found.line,
            column: found.column,
        })
    }

    /// `func name[ params ] [: returnType] | ... ^`
    fn parse_function(&mut self) -> Result<Node, ParseError> {
        let func_tok = self.advance();
        let name = self.expect(TokenKind::Identifier, "函数名")?.lexeme;

        self.expect(TokenKind::LBracket, "参数列表的 '['")?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                let param_tok = self.expect(TokenKind::Identifier, "参数名")?;
                let annotation = self.parse_optional_annotation()?;
                params.push(Variable {
                    name: param_tok.lexeme,
                    annotation,
                    line: param_tok.line,
                    column: param_tok.column,
                });

                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "参数列表的 ']'")?;

        let return_type = if self.eat(TokenKind::Colon).is_some() {
            let type_tok = self.expect(TokenKind::Identifier, "返回类型名")?;
            Some(TypeAnnotation {
                name: type_tok.lexeme,
            })
        } else {
            None
        };

        let body = Box::new(self.parse_block()?);
        Ok(Node::new(
            NodeKind::Function {
                name,
                params,
                return_type,
                body,
            },
            func_tok.line,
            func_tok.column,
        ))
    }

    /// `| statements ^` —— 语言唯一的语句分组结构
    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let pipe_tok = self.expect(TokenKind::Pipe, "块开始符 '|'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::Caret) {
            if self.check(TokenKind::Eof) {
                // 块不平衡：绝不静默截断
                return Err(ParseError::UnexpectedEof {
                    context: "块缺少结束符 '^'".to_string(),
                });
            }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::Caret, "块结束符 '^'")?;

        Ok(Node::new(
            NodeKind::Block { statements },
            pipe_tok.line,
            pipe_tok.column,
        ))
    }

    /// `if [ cond ] | ... ^ [else | ... ^]`
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let if_tok = self.advance();

        self.expect(TokenKind::LBracket, "条件的 '['")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect(TokenKind::RBracket, "条件的 ']'")?;

        let then_block = Box::new(self.parse_block()?);
        let else_block = if self.eat(TokenKind::Else).is_some() {
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };

        Ok(Node::new(
            NodeKind::IfStatement {
                condition,
                then_block,
                else_block,
            },
            if_tok.line,
            if_tok.column,
        ))
    }

    /// `while [ cond ] | ... ^`
    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let while_tok = self.advance();

        self.expect(TokenKind::LBracket, "条件的 '['")?;
        let condition = Box::new(self.parse_expression()?);
        self.expect(TokenKind::RBracket, "条件的 ']'")?;

        let body = Box::new(self.parse_block()?);
        Ok(Node::new(
            NodeKind::WhileLoop { condition, body },
            while_tok.line,
            while_tok.column,
        ))
    }

    /// `for [ name ] | ... ^`
    ///
    /// 文法不解析迭代来源，这是语言已知的结构缺口：按原样保留，
    /// `iterable` 槽位恒为 `None`，求值阶段惰性处理。
    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let for_tok = self.advance();

        self.expect(TokenKind::LBracket, "循环变量的 '['")?;
        let variable = self.expect(TokenKind::Identifier, "循环变量名")?.lexeme;
        self.expect(TokenKind::RBracket, "循环变量的 ']'")?;

        let body = Box::new(self.parse_block()?);
        Ok(Node::new(
            NodeKind::ForLoop {
                variable,
                iterable: None,
                body,
            },
            for_tok.line,
            for_tok.column,
        ))
    }

    /// `return [expr]`
    ///
    /// 紧跟 `;`、`^` 或输入结束时视为无返回值。
    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let return_tok = self.advance();

        let value = match self.current().kind {
            TokenKind::Semicolon | TokenKind::Caret | TokenKind::Eof => None,
            _ => Some(Box::new(self.parse_expression()?)),
        };
        self.eat(TokenKind::Semicolon);

        Ok(Node::new(
            NodeKind::ReturnStatement { value },
            return_tok.line,
            return_tok.column,
        ))
    }

    /// `: typeName`（可选出现在 let 与参数位）
    fn parse_optional_annotation(&mut self) -> Result<Option<TypeAnnotation>, ParseError> {
        if self.eat(TokenKind::Colon).is_none() {
            return Ok(None);
        }
        let type_tok = self.expect(TokenKind::Identifier, "类型名")?;
        Ok(Some(TypeAnnotation {
            name: type_tok.lexeme,
        }))
    }
}
