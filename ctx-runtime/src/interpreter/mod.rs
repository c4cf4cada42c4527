//! # Interpreter 模块
//!
//! 树遍历求值器：直接在 AST 上递归执行，无字节码、无 JIT。
//!
//! ## 架构
//!
//! ```text
//! Program → [函数注册] → [逐语句执行] → Value + 输出缓冲
//! ```
//!
//! ## 设计原则
//!
//! - 语句与表达式统一产生值：块的值是最后一条语句的值，赋值的值
//!   是被赋的值，while 的值是最后一次循环体的值
//! - `return` 不展开调用栈：求值其操作数后块继续执行（语言现状，
//!   保持可观测行为不变）
//! - `&&`/`||` 两侧均先求值，无短路
//! - 调用的作用域是扁平替换式：实参在调用方作用域求值，随后整张
//!   变量表换成"仅参数"的新表，函数体结束后无条件换回
//! - 核心不做 IO：`print` 写入输出缓冲，由宿主刷出
//!
//! ## 模块结构
//!
//! - `builtins`: 内置函数（print / str / len / range）

mod builtins;

use std::collections::HashMap;

use crate::ast::{BinOp, Literal, Node, NodeKind, Program, UnOp};
use crate::env::{Environment, FunctionDef};
use crate::error::{CtxResult, RuntimeError};
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::value::Value;

/// 树遍历求值器
///
/// 持有绑定环境和输出缓冲，可跨多次求值复用（REPL 的会话状态
/// 即一个长寿命的 Interpreter 实例）。
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
    output: String,
}

impl Interpreter {
    /// 创建空环境的求值器
    pub fn new() -> Self {
        Self::default()
    }

    /// 词法 + 语法 + 求值，一步到结果
    ///
    /// 环境跨调用保留，交互模式逐行喂入即可。
    pub fn eval_source(&mut self, source: &str) -> CtxResult<Value> {
        let tokens = tokenize(source)?;
        let program = parse(tokens)?;
        Ok(self.interpret(&program)?)
    }

    /// 执行程序，返回最后一条执行语句的值
    ///
    /// 两遍：先注册所有顶层函数定义（允许调用点在定义点之前），
    /// 再按序执行其余语句。函数定义对第二遍透明：程序以 `func` 结尾
    /// 时结果仍是它之前那条语句的值。
    pub fn interpret(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        for statement in &program.statements {
            if let NodeKind::Function {
                name, params, body, ..
            } = &statement.kind
            {
                self.env.register_function(FunctionDef {
                    name: name.clone(),
                    params: params.clone(),
                    body: (**body).clone(),
                });
            }
        }

        let mut last = Value::Null;
        for statement in &program.statements {
            if matches!(statement.kind, NodeKind::Function { .. }) {
                continue;
            }
            last = self.execute(statement)?;
        }
        Ok(last)
    }

    /// 取走累计的 `print` 输出（缓冲随之清空）
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// 查看累计的 `print` 输出
    pub fn output(&self) -> &str {
        &self.output
    }

    // ---------------------------------------------------------------------
    // 执行
    // ---------------------------------------------------------------------

    fn execute(&mut self, node: &Node) -> Result<Value, RuntimeError> {
        match &node.kind {
            NodeKind::Literal(literal) => Ok(match literal {
                Literal::Number(n) => Value::Number(*n),
                Literal::Str(s) => Value::Str(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
            }),

            NodeKind::Identifier { name } => {
                self.env
                    .lookup(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() })
            }

            NodeKind::BinaryOp { op, left, right } => {
                // 两侧无条件求值，再分派——&& 与 || 同样不短路
                let lhs = self.execute(left)?;
                let rhs = self.execute(right)?;
                eval_binary(*op, lhs, rhs)
            }

            NodeKind::UnaryOp { op, operand } => {
                let value = self.execute(operand)?;
                eval_unary(*op, value)
            }

            NodeKind::Call { callee, args } => self.eval_call(callee, args),

            NodeKind::Array { elements } => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.execute(element)?);
                }
                Ok(Value::Array(items))
            }

            NodeKind::Dictionary { pairs } => {
                // 经由 dict_insert 构建：字面量里的重复键同样是覆盖语义
                let mut entries = Vec::with_capacity(pairs.len());
                for (key_node, value_node) in pairs {
                    let key = self.execute(key_node)?;
                    let value = self.execute(value_node)?;
                    Value::dict_insert(&mut entries, key, value);
                }
                Ok(Value::Dict(entries))
            }

            NodeKind::Block { statements } => {
                let mut last = Value::Null;
                for statement in statements {
                    last = self.execute(statement)?;
                }
                Ok(last)
            }

            NodeKind::Function {
                name, params, body, ..
            } => {
                // 块内的函数定义执行到才注册（顶层定义已在第一遍注册）
                self.env.register_function(FunctionDef {
                    name: name.clone(),
                    params: params.clone(),
                    body: (**body).clone(),
                });
                Ok(Value::Null)
            }

            NodeKind::IfStatement {
                condition,
                then_block,
                else_block,
            } => {
                if self.execute(condition)?.is_truthy() {
                    self.execute(then_block)
                } else if let Some(else_block) = else_block {
                    self.execute(else_block)
                } else {
                    Ok(Value::Null)
                }
            }

            NodeKind::WhileLoop { condition, body } => {
                // 循环的值是最后一次循环体的值，一次未执行则为 null
                let mut last = Value::Null;
                while self.execute(condition)?.is_truthy() {
                    last = self.execute(body)?;
                }
                Ok(last)
            }

            NodeKind::ForLoop { iterable, body, .. } => {
                // 迭代来源是语法缺口（槽位恒为 None）：没有来源就没有
                // 迭代，循环体不执行
                if let Some(iterable) = iterable {
                    let source = self.execute(iterable)?;
                    if source.is_truthy() {
                        self.execute(body)?;
                    }
                }
                Ok(Value::Null)
            }

            NodeKind::ReturnStatement { value } => {
                // 不展开：求值后把值作为本语句的值交给块
                match value {
                    Some(value) => self.execute(value),
                    None => Ok(Value::Null),
                }
            }

            NodeKind::Assignment { name, value, .. } => {
                let value = self.execute(value)?;
                self.env.set_var(name.clone(), value.clone());
                Ok(value)
            }

            NodeKind::ConstantAssignment { name, value, .. } => {
                let value = self.execute(value)?;
                self.env.define_const(name.clone(), value.clone())?;
                Ok(value)
            }
        }
    }

    /// 调用分派：内置名优先，其次用户函数表
    fn eval_call(&mut self, callee: &Node, arg_nodes: &[Node]) -> Result<Value, RuntimeError> {
        let name = match &callee.kind {
            NodeKind::Identifier { name } => name.clone(),
            // 文法只产生标识符被调方；手工构造的 AST 走未定义函数
            _ => {
                return Err(RuntimeError::UndefinedFunction {
                    name: "<非标识符被调方>".to_string(),
                });
            }
        };

        // 实参一律在调用方作用域求值
        let mut args = Vec::with_capacity(arg_nodes.len());
        for node in arg_nodes {
            args.push(self.execute(node)?);
        }

        match name.as_str() {
            "print" => Ok(builtins::print(&mut self.output, &args)),
            "str" => builtins::str(&args),
            "len" => builtins::len(&args),
            "range" => builtins::range(&args),
            _ => self.call_function(&name, args),
        }
    }

    /// 用户函数调用：扁平替换作用域
    fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let def = self
            .env
            .get_function(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
            })?;

        if def.params.len() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                name: name.to_string(),
                expected: def.params.len(),
                actual: args.len(),
            });
        }

        let mut locals = HashMap::with_capacity(def.params.len());
        for (param, arg) in def.params.iter().zip(args) {
            locals.insert(param.name.clone(), arg);
        }

        // 换表后到恢复前不得用 '?' 提前返回，错误路径同样要复原
        let saved = self.env.replace_variables(locals);
        let result = self.execute(&def.body);
        self.env.restore_variables(saved);
        result
    }
}

// -------------------------------------------------------------------------
// 运算符
// -------------------------------------------------------------------------

fn eval_binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    use Value::{Array, Number, Str};

    let unsupported = |lhs: &Value, rhs: &Value| RuntimeError::UnsupportedBinaryOperand {
        op: op.symbol(),
        lhs: lhs.kind_name(),
        rhs: rhs.kind_name(),
    };

    match op {
        // 相等是结构化比较，对所有类别总是有定义
        BinOp::Eq => Ok(Value::Bool(lhs.structural_eq(&rhs))),
        BinOp::NotEq => Ok(Value::Bool(!lhs.structural_eq(&rhs))),

        // 逻辑运算作用在真值强制转换之后（两侧已求值完毕）
        BinOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
        BinOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),

        BinOp::Add => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a + b)),
            (Str(a), Str(b)) => Ok(Str(a + &b)),
            (Array(mut a), Array(b)) => {
                a.extend(b);
                Ok(Array(a))
            }
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        BinOp::Sub => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a - b)),
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        BinOp::Mul => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a * b)),
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        // IEEE 语义：除零得 ±∞ / NaN，不报错
        BinOp::Div => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a / b)),
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        BinOp::Mod => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a % b)),
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        BinOp::Pow => match (lhs, rhs) {
            (Number(a), Number(b)) => Ok(Number(a.powf(b))),
            (lhs, rhs) => Err(unsupported(&lhs, &rhs)),
        },

        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => match (&lhs, &rhs) {
            (Number(a), Number(b)) => Ok(Value::Bool(compare(op, a.partial_cmp(b)))),
            (Str(a), Str(b)) => Ok(Value::Bool(compare(op, Some(a.cmp(b))))),
            _ => Err(unsupported(&lhs, &rhs)),
        },
    }
}

/// 关系运算的判定（NaN 参与比较时一律为假）
fn compare(op: BinOp, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match (op, ordering) {
        (BinOp::Lt, Some(Less)) => true,
        (BinOp::Le, Some(Less | Equal)) => true,
        (BinOp::Gt, Some(Greater)) => true,
        (BinOp::Ge, Some(Greater | Equal)) => true,
        _ => false,
    }
}

fn eval_unary(op: UnOp, value: Value) -> Result<Value, RuntimeError> {
    match op {
        UnOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnOp::Neg => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(RuntimeError::UnsupportedUnaryOperand {
                op: op.symbol(),
                operand: other.kind_name(),
            }),
        },
    }
}
