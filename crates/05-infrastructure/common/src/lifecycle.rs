//! 组件生命周期管理

use serde::Serialize;

/// 组件生命周期类型
///
/// 目前只有单例。更宽的作用域应作为新的变体加入，而不是改变解析流程。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Lifetime {
    /// 单例模式 - 整个应用生命周期内只创建一个实例
    #[default]
    Singleton,
}

/// 单次解析过程中组件所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub enum ComponentState {
    /// 未注册
    #[default]
    Unregistered,
    /// 构造中（正在递归解析构造函数参数）
    UnderConstruction,
    /// 已注册到具体类型和全部接口下
    Registered,
    /// 构造后钩子已执行
    PostConstructed,
    /// 可以交给任意调用方
    Servable,
}
