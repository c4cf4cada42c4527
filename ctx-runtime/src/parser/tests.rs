//! # Parser 测试
//!
//! 覆盖语句分派、优先级阶梯、`[` 的三种用途消解和错误路径。

use super::*;
use crate::ast::{BinOp, Literal, UnOp};
use crate::lexer::tokenize;

/// 词法 + 语法，一步到 Program
fn parse_source(source: &str) -> Result<Program, ParseError> {
    parse(tokenize(source).expect("词法应当成功"))
}

fn single_statement(source: &str) -> Node {
    let mut program = parse_source(source).expect("语法应当成功");
    assert_eq!(program.statements.len(), 1, "期望单条语句: {source}");
    program.statements.remove(0)
}

// -------------------------------------------------------------------------
// 语句
// -------------------------------------------------------------------------

#[test]
fn test_parse_assignment() {
    let node = single_statement("let x := 10");
    match node.kind {
        NodeKind::Assignment {
            name,
            annotation,
            value,
        } => {
            assert_eq!(name, "x");
            assert!(annotation.is_none());
            assert_eq!(value.kind, NodeKind::Literal(Literal::Number(10.0)));
        }
        other => panic!("期望 Assignment，实际 {other:?}"),
    }
}

#[test]
fn test_parse_constant_assignment() {
    let node = single_statement("let PI :: 3.14");
    assert!(matches!(
        node.kind,
        NodeKind::ConstantAssignment { ref name, .. } if name == "PI"
    ));
}

#[test]
fn test_assignment_with_type_annotation() {
    let node = single_statement("let x : number := 1");
    match node.kind {
        NodeKind::Assignment { annotation, .. } => {
            assert_eq!(annotation.unwrap().name, "number");
        }
        other => panic!("期望 Assignment，实际 {other:?}"),
    }
}

#[test]
fn test_let_without_assign_operator_is_error() {
    let err = parse_source("let x 5").unwrap_err();
    assert!(matches!(err, ParseError::ExpectedToken { .. }));
}

#[test]
fn test_parse_function_definition() {
    let node = single_statement("func add[a, b] | return[a + b] ^");
    match node.kind {
        NodeKind::Function {
            name,
            params,
            return_type,
            body,
        } => {
            assert_eq!(name, "add");
            assert_eq!(params.len(), 2);
            assert_eq!(params[0].name, "a");
            assert_eq!(params[1].name, "b");
            assert!(return_type.is_none());
            assert!(matches!(body.kind, NodeKind::Block { ref statements } if statements.len() == 1));
        }
        other => panic!("期望 Function，实际 {other:?}"),
    }
}

#[test]
fn test_function_with_annotations() {
    let node = single_statement("func f[x: number, y: string] : number | return x ^");
    match node.kind {
        NodeKind::Function {
            params,
            return_type,
            ..
        } => {
            assert_eq!(params[0].annotation.as_ref().unwrap().name, "number");
            assert_eq!(params[1].annotation.as_ref().unwrap().name, "string");
            assert_eq!(return_type.unwrap().name, "number");
        }
        other => panic!("期望 Function，实际 {other:?}"),
    }
}

#[test]
fn test_unterminated_block_is_parse_error() {
    // 缺少 '^' 绝不静默截断
    let err = parse_source("func main[] |").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEof { .. }));
}

#[test]
fn test_unbalanced_extra_caret_is_parse_error() {
    let err = parse_source("func main[] | return ^ ^").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn test_parse_if_else() {
    let node = single_statement("if [x > 0] | 1 ^ else | 2 ^");
    match node.kind {
        NodeKind::IfStatement {
            condition,
            else_block,
            ..
        } => {
            assert!(matches!(
                condition.kind,
                NodeKind::BinaryOp { op: BinOp::Gt, .. }
            ));
            assert!(else_block.is_some());
        }
        other => panic!("期望 IfStatement，实际 {other:?}"),
    }
}

#[test]
fn test_parse_while() {
    let node = single_statement("while [i < 10] | let i := i + 1 ^");
    assert!(matches!(node.kind, NodeKind::WhileLoop { .. }));
}

#[test]
fn test_parse_for_has_no_iterable() {
    // 已知结构缺口：文法不解析迭代来源
    let node = single_statement("for [i] | i ^");
    match node.kind {
        NodeKind::ForLoop {
            variable, iterable, ..
        } => {
            assert_eq!(variable, "i");
            assert!(iterable.is_none());
        }
        other => panic!("期望 ForLoop，实际 {other:?}"),
    }
}

#[test]
fn test_parse_bare_return() {
    let node = single_statement("func f[] | return ^");
    match node.kind {
        NodeKind::Function { body, .. } => match &body.kind {
            NodeKind::Block { statements } => {
                assert!(matches!(
                    statements[0].kind,
                    NodeKind::ReturnStatement { value: None }
                ));
            }
            other => panic!("期望 Block，实际 {other:?}"),
        },
        other => panic!("期望 Function，实际 {other:?}"),
    }
}

#[test]
fn test_expression_statement_with_semicolon() {
    let node = single_statement("print[1];");
    assert!(matches!(node.kind, NodeKind::Call { .. }));
}

// -------------------------------------------------------------------------
// 表达式与优先级
// -------------------------------------------------------------------------

#[test]
fn test_precedence_mul_over_add() {
    // 2 + 3 * 4 解析为 2 + (3 * 4)
    let node = single_statement("2 + 3 * 4");
    match node.kind {
        NodeKind::BinaryOp {
            op: BinOp::Add,
            left,
            right,
        } => {
            assert_eq!(left.kind, NodeKind::Literal(Literal::Number(2.0)));
            assert!(matches!(
                right.kind,
                NodeKind::BinaryOp { op: BinOp::Mul, .. }
            ));
        }
        other => panic!("期望加法在顶层，实际 {other:?}"),
    }
}

#[test]
fn test_precedence_relational_over_logical() {
    // a < b && c > d 解析为 (a < b) && (c > d)
    let node = single_statement("a < b && c > d");
    match node.kind {
        NodeKind::BinaryOp {
            op: BinOp::And,
            left,
            right,
        } => {
            assert!(matches!(left.kind, NodeKind::BinaryOp { op: BinOp::Lt, .. }));
            assert!(matches!(
                right.kind,
                NodeKind::BinaryOp { op: BinOp::Gt, .. }
            ));
        }
        other => panic!("期望 && 在顶层，实际 {other:?}"),
    }
}

#[test]
fn test_left_associativity() {
    // 10 - 4 - 3 解析为 (10 - 4) - 3
    let node = single_statement("10 - 4 - 3");
    match node.kind {
        NodeKind::BinaryOp {
            op: BinOp::Sub,
            left,
            right,
        } => {
            assert!(matches!(
                left.kind,
                NodeKind::BinaryOp { op: BinOp::Sub, .. }
            ));
            assert_eq!(right.kind, NodeKind::Literal(Literal::Number(3.0)));
        }
        other => panic!("期望左结合，实际 {other:?}"),
    }
}

#[test]
fn test_unary_unified() {
    let node = single_statement("!x");
    assert!(matches!(
        node.kind,
        NodeKind::UnaryOp { op: UnOp::Not, .. }
    ));

    let node = single_statement("-5 + 1");
    // 一元负号在 unary 层：(-5) + 1
    match node.kind {
        NodeKind::BinaryOp {
            op: BinOp::Add,
            left,
            ..
        } => {
            assert!(matches!(
                left.kind,
                NodeKind::UnaryOp { op: UnOp::Neg, .. }
            ));
        }
        other => panic!("期望加法在顶层，实际 {other:?}"),
    }
}

#[test]
fn test_grouping_with_brackets() {
    // [2 + 3] * 4：括号分组改变结合
    let node = single_statement("[2 + 3] * 4");
    match node.kind {
        NodeKind::BinaryOp {
            op: BinOp::Mul,
            left,
            ..
        } => {
            assert!(matches!(
                left.kind,
                NodeKind::BinaryOp { op: BinOp::Add, .. }
            ));
        }
        other => panic!("期望乘法在顶层，实际 {other:?}"),
    }
}

#[test]
fn test_array_literal_by_comma() {
    let node = single_statement("[1, 2, 3]");
    match node.kind {
        NodeKind::Array { elements } => assert_eq!(elements.len(), 3),
        other => panic!("期望 Array，实际 {other:?}"),
    }
}

#[test]
fn test_empty_array_literal() {
    let node = single_statement("[]");
    assert!(matches!(node.kind, NodeKind::Array { ref elements } if elements.is_empty()));
}

#[test]
fn test_call_vs_grouping_vs_array() {
    // 同一个 '['：标识符后是调用，否则单表达式分组 / 逗号数组
    let node = single_statement("f[1]");
    assert!(matches!(node.kind, NodeKind::Call { .. }));

    let node = single_statement("[1]");
    assert_eq!(node.kind, NodeKind::Literal(Literal::Number(1.0)));

    let node = single_statement("[1, 2]");
    assert!(matches!(node.kind, NodeKind::Array { .. }));
}

#[test]
fn test_call_with_multiple_args() {
    let node = single_statement("range[1, 10, 2]");
    match node.kind {
        NodeKind::Call { callee, args } => {
            assert!(matches!(
                callee.kind,
                NodeKind::Identifier { ref name } if name == "range"
            ));
            assert_eq!(args.len(), 3);
        }
        other => panic!("期望 Call，实际 {other:?}"),
    }
}

#[test]
fn test_dictionary_literal() {
    let node = single_statement(r#"{ "a": 1, "b": 2 }"#);
    match node.kind {
        NodeKind::Dictionary { pairs } => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(
                pairs[0].0.kind,
                NodeKind::Literal(Literal::Str("a".to_string()))
            );
        }
        other => panic!("期望 Dictionary，实际 {other:?}"),
    }
}

#[test]
fn test_literals() {
    assert_eq!(
        single_statement("true").kind,
        NodeKind::Literal(Literal::Bool(true))
    );
    assert_eq!(
        single_statement("false").kind,
        NodeKind::Literal(Literal::Bool(false))
    );
    assert_eq!(
        single_statement("null").kind,
        NodeKind::Literal(Literal::Null)
    );
    assert_eq!(
        single_statement(r#""hi""#).kind,
        NodeKind::Literal(Literal::Str("hi".to_string()))
    );
}

#[test]
fn test_malformed_exponent_is_invalid_number() {
    let err = parse_source("let x := 1e").unwrap_err();
    assert!(matches!(
        err,
        ParseError::InvalidNumber { ref literal, .. } if literal == "1e"
    ));
}

// -------------------------------------------------------------------------
// 错误与确定性
// -------------------------------------------------------------------------

#[test]
fn test_math_symbols_lexed_but_not_parsed() {
    // 词法保留的数学符号进入语法即报错（惰性 feature surface）
    let err = parse_source("a @ b").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "@"));
}

#[test]
fn test_paren_lexed_but_not_parsed() {
    let err = parse_source("(1 + 2)").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { ref found, .. } if found == "("));
}

#[test]
fn test_error_carries_position() {
    let err = parse_source("let x :=\nlet").unwrap_err();
    match err {
        ParseError::UnexpectedToken { found, line, .. } => {
            assert_eq!(found, "let");
            assert_eq!(line, 2);
        }
        other => panic!("期望 UnexpectedToken，实际 {other:?}"),
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let src = "func f[a] | return[a * 2] ^\nlet x := f[3]\nprint[x]";
    let first = parse_source(src).unwrap();
    let second = parse_source(src).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_newlines_transparent_to_grammar() {
    // 表达式可以跨行书写：Newline token 对文法不可见
    let node = single_statement("{ \"a\": 1,\n  \"b\": 2 }");
    assert!(matches!(node.kind, NodeKind::Dictionary { ref pairs } if pairs.len() == 2));
}

#[test]
fn test_multiple_top_level_statements() {
    let program = parse_source("let x := 1\nlet y := 2\nx + y").unwrap();
    assert_eq!(program.statements.len(), 3);
}
