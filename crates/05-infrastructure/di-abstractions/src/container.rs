//! 依赖注入容器配置

use crate::scanner::ScanOptions;
use config_impl::PropertiesOptions;
use serde::Serialize;

/// 多个组件实现同一接口时的绑定策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BindingPolicy {
    /// 要求唯一实现；存在多个候选时只接受唯一的首选（primary）实现，否则启动失败
    #[default]
    Unique,
    /// 后注册的实现覆盖先注册的实现，并记录警告
    LastRegisteredWins,
}

/// 容器配置
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// 接口绑定策略
    pub binding_policy: BindingPolicy,
    /// 外部属性加载选项，为 `None` 时不加载
    pub properties: Option<PropertiesOptions>,
    /// 扫描选项
    pub scan: ScanOptions,
    /// 启动前是否先校验依赖图
    pub validate_before_build: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            binding_policy: BindingPolicy::Unique,
            properties: Some(PropertiesOptions::default()),
            scan: ScanOptions::default(),
            validate_before_build: true,
        }
    }
}

impl ContainerConfig {
    /// 不加载外部属性的配置（测试常用）
    pub fn isolated() -> Self {
        Self {
            properties: None,
            ..Self::default()
        }
    }

    /// 设置绑定策略
    pub fn with_binding_policy(mut self, policy: BindingPolicy) -> Self {
        self.binding_policy = policy;
        self
    }

    /// 设置属性加载选项
    pub fn with_properties(mut self, options: PropertiesOptions) -> Self {
        self.properties = Some(options);
        self
    }

    /// 设置扫描选项
    pub fn with_scan_options(mut self, scan: ScanOptions) -> Self {
        self.scan = scan;
        self
    }

    /// 设置是否在构建前校验依赖图
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_before_build = enabled;
        self
    }
}
