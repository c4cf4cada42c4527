//! # Value 模块
//!
//! 定义求值阶段的运行时值。
//!
//! ## 设计说明
//!
//! - 值不携带静态类型，运算按动态类别分派
//! - 数字统一为双精度浮点（IEEE 语义，NaN/∞ 自然传播）
//! - 字典是保序的关联列表，键按结构相等比较——这允许任意值做键
//!   （包括浮点和数组），代价是线性查找；重复键写入覆盖旧值
//! - 相等比较是结构化的，类别不同的值永不相等

use std::fmt;

use serde::{Deserialize, Serialize};

/// 运行时值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// 数字（双精度）
    Number(f64),
    /// 字符串
    Str(String),
    /// 布尔值
    Bool(bool),
    /// 空值
    Null,
    /// 数组（有序）
    Array(Vec<Value>),
    /// 字典（保序关联列表，键结构相等）
    Dict(Vec<(Value, Value)>),
}

impl Value {
    /// 值类别名，用于错误信息
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Dict(_) => "dictionary",
        }
    }

    /// 真值强制转换
    ///
    /// 条件上下文（`if`/`while`/`!`/`&&`/`||`）统一经由此规则：
    /// null 为假；布尔取自身；数字零为假；空字符串/数组/字典为假；
    /// 其余为真。
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dict(pairs) => !pairs.is_empty(),
        }
    }

    /// 结构相等
    ///
    /// `PartialEq` 派生即结构比较；单独命名出来是为了让
    /// 字典键查找和 `==` 运算共用同一条规则。
    pub fn structural_eq(&self, other: &Value) -> bool {
        self == other
    }

    /// 字典键查找（线性、结构相等）
    pub fn dict_get<'a>(pairs: &'a [(Value, Value)], key: &Value) -> Option<&'a Value> {
        pairs
            .iter()
            .find(|(k, _)| k.structural_eq(key))
            .map(|(_, v)| v)
    }

    /// 字典写入：已有键覆盖，否则追加到末尾（保序）
    pub fn dict_insert(pairs: &mut Vec<(Value, Value)>, key: Value, value: Value) {
        if let Some(slot) = pairs.iter_mut().find(|(k, _)| k.structural_eq(&key)) {
            slot.1 = value;
        } else {
            pairs.push((key, value));
        }
    }
}

/// 数字的展示形式
///
/// 整值保留一位小数（`30` 显示为 `30.0`），与语言"数字即双精度"
/// 的模型一致；非整值用最短表示。
fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 {
        write!(f, "{n:.1}")
    } else {
        write!(f, "{n}")
    }
}

/// 嵌套位置的展示：字符串带引号，其余同顶层
fn fmt_nested(value: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match value {
        Value::Str(s) => write!(f, "\"{s}\""),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => fmt_number(*n, f),
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_nested(item, f)?;
                }
                write!(f, "]")
            }
            Value::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_nested(key, f)?;
                    write!(f, ": ")?;
                    fmt_nested(value, f)?;
                }
                write!(f, "}}")
            }
        }
    }
}
