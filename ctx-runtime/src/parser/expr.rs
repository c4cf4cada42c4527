//! # 表达式文法
//!
//! 六级优先级阶梯（低到高）：
//!
//! ```text
//! or → and → equality → relational → additive → multiplicative → unary → primary
//! ```
//!
//! 同级左结合；一元处理统一在 unary 层（`!` 与一元 `-` 都产生
//! UnaryOp，不再在 primary 里混入负号特例）。

use crate::ast::{BinOp, Literal, Node, NodeKind, UnOp};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};

use super::Parser;

impl Parser {
    /// 表达式入口（最低优先级）
    pub(crate) fn parse_expression(&mut self) -> Result<Node, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::OrOr) {
            let op_tok = self.advance();
            let right = self.parse_and()?;
            left = binary(BinOp::Or, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::AndAnd) {
            let op_tok = self.advance();
            let right = self.parse_equality()?;
            left = binary(BinOp::And, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::NotEq => BinOp::NotEq,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_relational()?;
            left = binary(op, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_additive()?;
            left = binary(op, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                TokenKind::StarStar => BinOp::Pow,
                _ => break,
            };
            let op_tok = self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right, &op_tok);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let op = match self.current().kind {
            TokenKind::Bang => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            _ => return self.parse_primary(),
        };
        let op_tok = self.advance();
        let operand = Box::new(self.parse_unary()?);
        Ok(Node::new(
            NodeKind::UnaryOp { op, operand },
            op_tok.line,
            op_tok.column,
        ))
    }

    /// primary：字面量、标识符、调用、`[` 分组/数组、`{}` 字典
    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value: f64 =
                    token
                        .lexeme
                        .parse()
                        .map_err(|_| ParseError::InvalidNumber {
                            literal: token.lexeme.clone(),
                            line: token.line,
                            column: token.column,
                        })?;
                Ok(Node::new(
                    NodeKind::Literal(Literal::Number(value)),
                    token.line,
                    token.column,
                ))
            }

            TokenKind::Str => {
                self.advance();
                // 去掉首尾引号；词法层未解释的转义字符原样保留
                let content = token.lexeme[1..token.lexeme.len() - 1].to_string();
                Ok(Node::new(
                    NodeKind::Literal(Literal::Str(content)),
                    token.line,
                    token.column,
                ))
            }

            TokenKind::True => {
                self.advance();
                Ok(Node::new(
                    NodeKind::Literal(Literal::Bool(true)),
                    token.line,
                    token.column,
                ))
            }

            TokenKind::False => {
                self.advance();
                Ok(Node::new(
                    NodeKind::Literal(Literal::Bool(false)),
                    token.line,
                    token.column,
                ))
            }

            TokenKind::Null => {
                self.advance();
                Ok(Node::new(
                    NodeKind::Literal(Literal::Null),
                    token.line,
                    token.column,
                ))
            }

            TokenKind::Identifier => {
                let name_tok = self.advance();
                if self.check(TokenKind::LBracket) {
                    // 标识符紧跟 '[' 即调用——'[' 的三种用途由此消解
                    self.parse_call(name_tok)
                } else {
                    Ok(Node::new(
                        NodeKind::Identifier {
                            name: name_tok.lexeme,
                        },
                        name_tok.line,
                        name_tok.column,
                    ))
                }
            }

            TokenKind::LBracket => self.parse_group_or_array(),

            TokenKind::LBrace => self.parse_dictionary(),

            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                context: "表达式".to_string(),
            }),

            _ => Err(ParseError::UnexpectedToken {
                found: token.lexeme,
                line: token.line,
                column: token.column,
            }),
        }
    }

    /// `name[ args ]`
    fn parse_call(&mut self, name_tok: Token) -> Result<Node, ParseError> {
        self.expect(TokenKind::LBracket, "调用参数的 '['")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                args.push(self.parse_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "调用参数的 ']'")?;

        let callee = Box::new(Node::new(
            NodeKind::Identifier {
                name: name_tok.lexeme,
            },
            name_tok.line,
            name_tok.column,
        ));
        Ok(Node::new(
            NodeKind::Call { callee, args },
            name_tok.line,
            name_tok.column,
        ))
    }

    /// 非调用位置的 `[`：单表达式是分组，出现逗号（或空）是数组字面量
    fn parse_group_or_array(&mut self) -> Result<Node, ParseError> {
        let open_tok = self.advance();

        if self.eat(TokenKind::RBracket).is_some() {
            return Ok(Node::new(
                NodeKind::Array { elements: vec![] },
                open_tok.line,
                open_tok.column,
            ));
        }

        let first = self.parse_expression()?;

        if self.check(TokenKind::Comma) {
            let mut elements = vec![first];
            while self.eat(TokenKind::Comma).is_some() {
                elements.push(self.parse_expression()?);
            }
            self.expect(TokenKind::RBracket, "数组的 ']'")?;
            return Ok(Node::new(
                NodeKind::Array { elements },
                open_tok.line,
                open_tok.column,
            ));
        }

        self.expect(TokenKind::RBracket, "分组的 ']'")?;
        Ok(first)
    }

    /// `{ key: value, ... }`
    fn parse_dictionary(&mut self) -> Result<Node, ParseError> {
        let open_tok = self.advance();

        let mut pairs = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                let key = self.parse_expression()?;
                self.expect(TokenKind::Colon, "字典键后的 ':'")?;
                let value = self.parse_expression()?;
                pairs.push((key, value));

                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "字典的 '}'")?;

        Ok(Node::new(
            NodeKind::Dictionary { pairs },
            open_tok.line,
            open_tok.column,
        ))
    }
}

/// 构造二元节点（位置取运算符 token）
fn binary(op: BinOp, left: Node, right: Node, op_tok: &Token) -> Node {
    Node::new(
        NodeKind::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        op_tok.line,
        op_tok.column,
    )
}
