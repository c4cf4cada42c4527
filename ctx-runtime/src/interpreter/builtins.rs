//! # 内置函数
//!
//! 调用分派时内置名优先于用户函数表，因此用户定义同名函数不可达。
//!
//! `print` 不直接写标准输出：输出追加到解释器的输出缓冲，
//! 由宿主决定何时、往哪里刷出。核心 crate 不做 IO。

use crate::error::RuntimeError;
use crate::value::Value;

/// `print[args...]`：参数展示形式以单个空格连接，追加到输出缓冲
///
/// 不追加换行，多次调用的输出首尾相接。
pub(super) fn print(output: &mut String, args: &[Value]) -> Value {
    let rendered = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    output.push_str(&rendered);
    Value::Null
}

/// `str[value]`：任意值转展示字符串
pub(super) fn str(args: &[Value]) -> Result<Value, RuntimeError> {
    let [value] = args else {
        return Err(RuntimeError::BuiltinCall {
            name: "str".to_string(),
            message: format!("期望 1 个参数，实际传入 {} 个", args.len()),
        });
    };
    Ok(Value::Str(value.to_string()))
}

/// `len[value]`：字符串按字符计数，数组按元素计数
pub(super) fn len(args: &[Value]) -> Result<Value, RuntimeError> {
    let [value] = args else {
        return Err(RuntimeError::BuiltinCall {
            name: "len".to_string(),
            message: format!("期望 1 个参数，实际传入 {} 个", args.len()),
        });
    };
    let count = match value {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Dict(pairs) => pairs.len(),
        other => {
            return Err(RuntimeError::BuiltinCall {
                name: "len".to_string(),
                message: format!("不支持的参数类型 {}", other.kind_name()),
            });
        }
    };
    Ok(Value::Number(count as f64))
}

/// `range[stop]` / `range[start, stop]` / `range[start, stop, step]`
///
/// 参数截断为整数；步长为零报错；方向由步长符号决定，
/// 区间左闭右开。返回数字数组。
pub(super) fn range(args: &[Value]) -> Result<Value, RuntimeError> {
    let to_int = |value: &Value| -> Result<i64, RuntimeError> {
        match value {
            Value::Number(n) => Ok(*n as i64),
            other => Err(RuntimeError::BuiltinCall {
                name: "range".to_string(),
                message: format!("参数必须是数字，实际是 {}", other.kind_name()),
            }),
        }
    };

    let (start, stop, step) = match args {
        [stop] => (0, to_int(stop)?, 1),
        [start, stop] => (to_int(start)?, to_int(stop)?, 1),
        [start, stop, step] => (to_int(start)?, to_int(stop)?, to_int(step)?),
        _ => {
            return Err(RuntimeError::BuiltinCall {
                name: "range".to_string(),
                message: format!("期望 1 到 3 个参数，实际传入 {} 个", args.len()),
            });
        }
    };

    if step == 0 {
        return Err(RuntimeError::BuiltinCall {
            name: "range".to_string(),
            message: "步长不能为零".to_string(),
        });
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Number(current as f64));
        current += step;
    }
    Ok(Value::Array(items))
}
