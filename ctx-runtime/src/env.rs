//! # Environment 模块
//!
//! 定义求值器的绑定环境。
//!
//! ## 设计原则
//!
//! - 三张相互独立的映射：可变变量、单次赋值常量、函数表
//! - 名字解析顺序固定：常量优先于变量
//! - 环境随 Interpreter 实例创建，随实例废弃，不存在隐式全局状态
//! - 函数调用用"整体替换变量表 + 无条件恢复"实现扁平作用域
//!   （语言语义如此：无词法嵌套、无闭包）；常量表和函数表从不按调用
//!   分层，在实例生命周期内全局可见

use std::collections::HashMap;

use crate::ast::{Node, Variable};
use crate::error::RuntimeError;
use crate::value::Value;

/// 用户函数定义
///
/// 注册时从 AST 的 Function 节点提取，按名存入函数表。
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// 函数名
    pub name: String,
    /// 参数列表
    pub params: Vec<Variable>,
    /// 函数体（Block 节点）
    pub body: Node,
}

/// 绑定环境
#[derive(Debug, Default)]
pub struct Environment {
    /// 可变变量
    variables: HashMap<String, Value>,
    /// 常量（写一次，重复声明报错）
    constants: HashMap<String, Value>,
    /// 用户函数表
    functions: HashMap<String, FunctionDef>,
}

impl Environment {
    /// 创建空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析名字：常量优先，其次变量
    ///
    /// 同一个名字允许同时存在于两张表中，解析顺序即遮蔽规则。
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.constants.get(name).or_else(|| self.variables.get(name))
    }

    /// 写入变量（存在则覆盖）
    pub fn set_var(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// 定义常量
    ///
    /// 单次赋值规则：重复声明同名常量是运行时错误。
    pub fn define_const(
        &mut self,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let name = name.into();
        if self.constants.contains_key(&name) {
            return Err(RuntimeError::ConstantRedefined { name });
        }
        self.constants.insert(name, value);
        Ok(())
    }

    /// 注册用户函数（同名覆盖）
    pub fn register_function(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.clone(), def);
    }

    /// 查找用户函数
    pub fn get_function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// 整体替换变量表，返回被换出的旧表
    ///
    /// 与 [`Environment::restore_variables`] 配对使用：调用方负责在
    /// 每条退出路径上恢复（正常返回与错误返回都要恢复）。
    pub fn replace_variables(&mut self, locals: HashMap<String, Value>) -> HashMap<String, Value> {
        std::mem::replace(&mut self.variables, locals)
    }

    /// 恢复先前换出的变量表
    pub fn restore_variables(&mut self, saved: HashMap<String, Value>) {
        self.variables = saved;
    }
}
