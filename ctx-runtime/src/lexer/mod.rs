//! # Lexer 模块
//!
//! 将 Cortex 源文本转换为带位置信息的 Token 序列。
//!
//! ## 设计原则
//!
//! - 单次从左到右扫描，一个字符的前瞻
//! - 手写的字符级解析，无 regex 依赖
//! - 清晰的错误处理和行号/列号追踪
//!
//! ## 行为要点
//!
//! - 空格/制表符直接跳过；换行产生显式的 [`TokenKind::Newline`]
//!   token（语法暂不消费，解析器透明跳过）
//! - `//` 行注释与 `/* */` 块注释被消费、不产生 token；
//!   块注释未闭合在注释起始位置报错
//! - 多字符运算符优先于单字符贪婪匹配
//! - 流末尾追加唯一的 [`TokenKind::Eof`]

mod token;

pub use token::{Token, TokenKind};

use crate::error::LexError;

/// 对源文本做词法分析
///
/// # 返回
///
/// Token 序列（以 Eof 结尾），或第一个词法错误。
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

/// 词法器
struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek(0) {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.push_here(TokenKind::Newline, "\n");
                    self.advance();
                }
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '0'..='9' => self.read_number(),
                // 小数点后紧跟数字才按数字起始处理，否则是 Dot 定界符
                '.' if matches!(self.peek(1), Some('0'..='9')) => self.read_number(),
                '"' => self.read_string()?,
                c if c.is_alphabetic() || c == '_' => self.read_identifier(),
                c => self.read_operator(c)?,
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.line, self.column));
        Ok(self.tokens)
    }

    // ---------------------------------------------------------------------
    // 字符游标
    // ---------------------------------------------------------------------

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// 以当前游标位置作为 token 位置入列
    fn push_here(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens
            .push(Token::new(kind, lexeme, self.line, self.column));
    }

    // ---------------------------------------------------------------------
    // 各类 token 的读取
    // ---------------------------------------------------------------------

    /// 跳过 `//` 行注释（不消费行尾换行）
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// 跳过 `/* */` 块注释
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        self.advance(); // `/`
        self.advance(); // `*`

        loop {
            match self.peek(0) {
                Some('*') if self.peek(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(LexError::UnterminatedComment { line, column }),
            }
        }
    }

    /// 读取数字字面量：整数部分、可选小数部分、可选指数部分
    ///
    /// 字面量文本到 f64 的转换推迟到解析器的 primary 层；
    /// 类似 `1e` 的畸形文本在那里报 ParseError。
    fn read_number(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut lexeme = String::new();

        while let Some(c @ '0'..='9') = self.peek(0) {
            lexeme.push(c);
            self.advance();
        }

        if self.peek(0) == Some('.') {
            lexeme.push('.');
            self.advance();
            while let Some(c @ '0'..='9') = self.peek(0) {
                lexeme.push(c);
                self.advance();
            }
        }

        if let Some(e @ ('e' | 'E')) = self.peek(0) {
            lexeme.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek(0) {
                lexeme.push(sign);
                self.advance();
            }
            while let Some(c @ '0'..='9') = self.peek(0) {
                lexeme.push(c);
                self.advance();
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Number, lexeme, line, column));
    }

    /// 读取字符串字面量
    ///
    /// 反斜杠原样带走紧随其后的一个字符，词法层不解释转义序列；
    /// lexeme 保留首尾引号。
    fn read_string(&mut self) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);
        let mut lexeme = String::from('"');
        self.advance(); // 开引号

        loop {
            match self.advance() {
                Some('"') => {
                    lexeme.push('"');
                    break;
                }
                Some('\\') => {
                    lexeme.push('\\');
                    if let Some(escaped) = self.advance() {
                        lexeme.push(escaped);
                    }
                }
                Some(c) => lexeme.push(c),
                None => return Err(LexError::UnterminatedString { line, column }),
            }
        }

        self.tokens
            .push(Token::new(TokenKind::Str, lexeme, line, column));
        Ok(())
    }

    /// 读取标识符或关键字
    fn read_identifier(&mut self) {
        let (line, column) = (self.line, self.column);
        let mut lexeme = String::new();

        while let Some(c) = self.peek(0) {
            if c.is_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword(&lexeme).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, lexeme, line, column));
    }

    /// 读取运算符或定界符（多字符优先）
    fn read_operator(&mut self, c: char) -> Result<(), LexError> {
        let (line, column) = (self.line, self.column);

        let two = match (c, self.peek(1)) {
            (':', Some(':')) => Some(TokenKind::AssignConst),
            (':', Some('=')) => Some(TokenKind::Assign),
            ('=', Some('=')) => Some(TokenKind::EqEq),
            ('!', Some('=')) => Some(TokenKind::NotEq),
            ('<', Some('=')) => Some(TokenKind::Le),
            ('>', Some('=')) => Some(TokenKind::Ge),
            ('&', Some('&')) => Some(TokenKind::AndAnd),
            ('|', Some('|')) => Some(TokenKind::OrOr),
            ('*', Some('*')) => Some(TokenKind::StarStar),
            _ => None,
        };

        if let Some(kind) = two {
            let mut lexeme = String::from(c);
            self.advance();
            if let Some(second) = self.advance() {
                lexeme.push(second);
            }
            self.tokens.push(Token::new(kind, lexeme, line, column));
            return Ok(());
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '!' => TokenKind::Bang,
            '@' => TokenKind::DotProduct,
            '⊗' => TokenKind::OuterProduct,
            '∇' => TokenKind::Gradient,
            '∂' => TokenKind::Partial,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '|' => TokenKind::Pipe,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            other => {
                return Err(LexError::UnexpectedChar {
                    ch: other,
                    line,
                    column,
                });
            }
        };

        self.advance();
        self.tokens
            .push(Token::new(kind, c.to_string(), line, column));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 提取 kind 序列，便于断言
    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_source_yields_single_eof() {
        let tokens = tokenize("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }

    #[test]
    fn test_number_forms() {
        for (src, lexeme) in [
            ("42", "42"),
            ("3.14", "3.14"),
            ("5.", "5."),
            (".5", ".5"),
            ("1e10", "1e10"),
            ("2.5E-3", "2.5E-3"),
            ("1e+6", "1e+6"),
        ] {
            let tokens = tokenize(src).unwrap();
            assert_eq!(tokens[0].kind, TokenKind::Number, "src: {src}");
            assert_eq!(tokens[0].lexeme, lexeme);
        }
    }

    #[test]
    fn test_lone_dot_is_delimiter_not_number() {
        assert_eq!(kinds("."), vec![TokenKind::Dot, TokenKind::Eof]);
    }

    #[test]
    fn test_string_keeps_quotes_and_raw_escapes() {
        let tokens = tokenize(r#""hello \"world\"""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, r#""hello \"world\"""#);
    }

    #[test]
    fn test_unterminated_string_reports_start_position() {
        let err = tokenize("let s := \"oops").unwrap_err();
        assert_eq!(
            err,
            LexError::UnterminatedString {
                line: 1,
                column: 10
            }
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("LET Func iF true NULL"),
            vec![
                TokenKind::Let,
                TokenKind::Func,
                TokenKind::If,
                TokenKind::True,
                TokenKind::Null,
                TokenKind::Eof
            ]
        );
        // lexeme 保留原文大小写
        let tokens = tokenize("LET").unwrap();
        assert_eq!(tokens[0].lexeme, "LET");
    }

    #[test]
    fn test_identifier_with_underscore() {
        let tokens = tokenize("_my_var2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "_my_var2");
    }

    #[test]
    fn test_multichar_operators_greedy() {
        assert_eq!(
            kinds(":: := == != <= >= && || **"),
            vec![
                TokenKind::AssignConst,
                TokenKind::Assign,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::StarStar,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_math_symbols_lexed() {
        assert_eq!(
            kinds("@ ⊗ ∇ ∂"),
            vec![
                TokenKind::DotProduct,
                TokenKind::OuterProduct,
                TokenKind::Gradient,
                TokenKind::Partial,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_line_comment_consumed() {
        assert_eq!(
            kinds("1 // comment here\n2"),
            vec![
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_block_comment_consumed_across_lines() {
        let tokens = tokenize("1 /* a\n b */ 2").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        // 块注释内部的换行推进了行号
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_unterminated_block_comment_reports_start() {
        let err = tokenize("\n  /* never closed").unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { line: 2, column: 3 });
    }

    #[test]
    fn test_unknown_character_errors_with_position() {
        let err = tokenize("let x := 1\n§").unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedChar {
                ch: '§',
                line: 2,
                column: 1
            }
        );
    }

    #[test]
    fn test_newline_emitted_as_token() {
        assert_eq!(
            kinds("1\n2"),
            vec![
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_positions_tracked() {
        let tokens = tokenize("let x := 10\nlet y := 20").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1)); // let
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5)); // x
        assert_eq!((tokens[2].line, tokens[2].column), (1, 7)); // :=
        assert_eq!((tokens[3].line, tokens[3].column), (1, 10)); // 10
        // 换行之后回到第 1 列
        assert_eq!((tokens[5].line, tokens[5].column), (2, 1)); // let
    }

    #[test]
    fn test_block_statement_tokens() {
        assert_eq!(
            kinds("func add[a, b] | return a ^"),
            vec![
                TokenKind::Func,
                TokenKind::Identifier,
                TokenKind::LBracket,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Identifier,
                TokenKind::RBracket,
                TokenKind::Pipe,
                TokenKind::Return,
                TokenKind::Identifier,
                TokenKind::Caret,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_lone_ampersand_is_error() {
        assert!(matches!(
            tokenize("a & b"),
            Err(LexError::UnexpectedChar { ch: '&', .. })
        ));
    }

    #[test]
    fn test_retokenize_lexemes_reproduces_stream() {
        // 词法幂等性：把 lexeme 用空白重新拼接后再词法分析，
        // 得到等价的 token 序列（忽略 Newline）
        let src = "func f[x: number] : number | return x * 2.5 ^\nlet a :: f[1e2]";
        let first: Vec<Token> = tokenize(src)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .collect();

        let joined = first
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let second: Vec<Token> = tokenize(&joined)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind != TokenKind::Newline)
            .collect();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.lexeme, b.lexeme);
        }
    }
}
