//! # AST 模块
//!
//! 定义 Cortex 程序的抽象语法树（Abstract Syntax Tree）。
//!
//! ## 设计说明
//!
//! - 节点是封闭的 sum type，各阶段用穷尽 `match` 处理——新增变体时
//!   编译器强制所有处理点同步更新（替代原设计的 visitor 双分派）
//! - 每个节点携带源位置（行、列），供诊断使用
//! - 节点独占其子节点，无共享、无环；解析器构建一次，求值期间只读

use serde::{Deserialize, Serialize};

/// 程序根节点
///
/// 顶层语句的有序序列，解析器的最终输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// 顶层语句
    pub statements: Vec<Node>,
}

/// 类型标注
///
/// 语法上解析并保留在节点里，求值阶段不参与（语言暂无静态检查）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAnnotation {
    /// 类型名
    pub name: String,
}

/// 变量声明（函数参数位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// 参数名
    pub name: String,
    /// 类型标注（可选，惰性保留）
    pub annotation: Option<TypeAnnotation>,
    /// 起始行号
    pub line: usize,
    /// 起始列号
    pub column: usize,
}

/// 字面量值（语法级别）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// 数字（双精度）
    Number(f64),
    /// 字符串
    Str(String),
    /// 布尔值
    Bool(bool),
    /// 空值
    Null,
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `==`
    Eq,
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
    /// `&&`（两侧均先求值，无短路）
    And,
    /// `||`（两侧均先求值，无短路）
    Or,
}

impl BinOp {
    /// 源码中的运算符文本
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "**",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// `!` 真值取反
    Not,
    /// 一元 `-` 数值取负
    Neg,
}

impl UnOp {
    /// 源码中的运算符文本
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
        }
    }
}

/// AST 节点
///
/// 统一携带源位置；变体见 [`NodeKind`]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 节点变体
    pub kind: NodeKind,
    /// 起始行号
    pub line: usize,
    /// 起始列号
    pub column: usize,
}

impl Node {
    /// 创建新节点
    pub fn new(kind: NodeKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

/// 节点变体
///
/// 语句和表达式共用一个封闭集合：语句执行同样产生值，
/// 块把最后一条语句的值向外传播。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // ── 表达式 ──
    /// 字面量
    Literal(Literal),

    /// 标识符引用（常量优先于变量解析）
    Identifier {
        /// 名字
        name: String,
    },

    /// 二元运算
    BinaryOp {
        /// 运算符
        op: BinOp,
        /// 左操作数
        left: Box<Node>,
        /// 右操作数
        right: Box<Node>,
    },

    /// 一元运算
    UnaryOp {
        /// 运算符
        op: UnOp,
        /// 操作数
        operand: Box<Node>,
    },

    /// 函数调用
    ///
    /// 对应 `name[arg, ...]` 语法；被调方是 Identifier 节点
    Call {
        /// 被调方
        callee: Box<Node>,
        /// 实参列表
        args: Vec<Node>,
    },

    /// 数组字面量
    ///
    /// 对应非调用位置的 `[a, b, ...]`（单元素加括号是分组，见解析器）
    Array {
        /// 元素
        elements: Vec<Node>,
    },

    /// 字典字面量
    ///
    /// 对应 `{ key: value, ... }`；键可以是任意表达式
    Dictionary {
        /// 键值对
        pairs: Vec<(Node, Node)>,
    },

    // ── 语句 ──
    /// 语句块，对应 `| ... ^`
    Block {
        /// 块内语句
        statements: Vec<Node>,
    },

    /// 函数定义，对应 `func name[params] [: type] | ... ^`
    Function {
        /// 函数名
        name: String,
        /// 参数列表
        params: Vec<Variable>,
        /// 返回类型标注（可选，惰性保留）
        return_type: Option<TypeAnnotation>,
        /// 函数体（Block 节点）
        body: Box<Node>,
    },

    /// 条件语句，对应 `if [cond] | ... ^ [else | ... ^]`
    IfStatement {
        /// 条件
        condition: Box<Node>,
        /// 真分支
        then_block: Box<Node>,
        /// 假分支（可选）
        else_block: Option<Box<Node>>,
    },

    /// while 循环，对应 `while [cond] | ... ^`
    WhileLoop {
        /// 条件
        condition: Box<Node>,
        /// 循环体
        body: Box<Node>,
    },

    /// for 循环，对应 `for [name] | ... ^`
    ///
    /// 语法上不解析迭代来源，`iterable` 恒为 `None`——这是语言已知的
    /// 结构缺口，按原样保留并在求值阶段惰性处理（体不执行）。
    ForLoop {
        /// 循环变量名
        variable: String,
        /// 迭代来源（语法从不产生，保留槽位）
        iterable: Option<Box<Node>>,
        /// 循环体
        body: Box<Node>,
    },

    /// return 语句，对应 `return [expr]`
    ReturnStatement {
        /// 返回值表达式（可选）
        value: Option<Box<Node>>,
    },

    /// 变量赋值，对应 `let name [: type] := expr`
    Assignment {
        /// 变量名
        name: String,
        /// 类型标注（可选，惰性保留）
        annotation: Option<TypeAnnotation>,
        /// 右值
        value: Box<Node>,
    },

    /// 常量赋值，对应 `let name [: type] :: expr`（单次赋值）
    ConstantAssignment {
        /// 常量名
        name: String,
        /// 类型标注（可选，惰性保留）
        annotation: Option<TypeAnnotation>,
        /// 右值
        value: Box<Node>,
    },
}
