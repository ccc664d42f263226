//! 装配报告
//!
//! 启动完成后描述容器内容：注册的实例、接口绑定和构造顺序，可序列化为 JSON。

use di_abstractions::BindingPolicy;
use infrastructure_common::{ComponentState, Lifetime};
use serde::Serialize;

/// 实例来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationOrigin {
    /// 组件构造函数
    Component,
    /// 配置类构造函数
    Configuration,
    /// 配置类的工厂方法
    Factory {
        /// 所属配置类
        configuration: String,
        /// 工厂方法名称
        method: String,
    },
    /// 手工注册
    Manual,
}

/// 已注册实例的描述
#[derive(Debug, Clone, Serialize)]
pub struct ComponentEntry {
    /// 完整类型名称
    pub type_name: String,
    /// 组件名称
    pub name: String,
    /// 所在命名空间（手工注册的实例没有）
    pub namespace: Option<String>,
    /// 实例来源
    pub origin: RegistrationOrigin,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 当前状态
    pub state: ComponentState,
    /// 构造函数参数类型
    pub dependencies: Vec<String>,
    /// 绑定到此实例的接口
    pub interfaces: Vec<String>,
}

/// 接口绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingEntry {
    /// 接口类型名称
    pub interface: String,
    /// 实现类型名称
    pub implementation: String,
}

/// 装配报告
#[derive(Debug, Clone, Serialize)]
pub struct WiringReport {
    /// 绑定策略
    pub binding_policy: BindingPolicy,
    /// 已注册实例（按注册顺序）
    pub components: Vec<ComponentEntry>,
    /// 接口绑定
    pub bindings: Vec<BindingEntry>,
}

impl WiringReport {
    /// 按注册顺序排列的类型名称
    pub fn construction_order(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.type_name.as_str()).collect()
    }

    /// 按类型名称查找实例描述
    pub fn component(&self, type_name: &str) -> Option<&ComponentEntry> {
        self.components.iter().find(|c| c.type_name == type_name)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
