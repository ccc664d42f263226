//! 组件扫描器抽象接口
//!
//! 提供按命名空间发现组件的能力

use infrastructure_common::{ComponentDescriptor, ContainerError};
use std::sync::Arc;

/// 组件扫描器 trait
pub trait ComponentScanner: Send + Sync {
    /// 扫描命名空间（模块路径）及其子命名空间中带标记的组件
    ///
    /// 根命名空间下没有任何组件时返回 [`ContainerError::NamespaceNotFound`]。
    fn find_components(&self, root_namespace: &str) -> Result<Vec<Arc<ComponentDescriptor>>, ContainerError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 扫描选项
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 是否递归扫描子命名空间
    pub recursive: bool,
    /// 排除的命名空间（前缀匹配）
    pub exclude_namespaces: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            exclude_namespaces: Vec::new(),
        }
    }
}

impl ScanOptions {
    /// 只扫描根命名空间本身
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// 添加排除的命名空间
    pub fn exclude<S: Into<String>>(mut self, namespace: S) -> Self {
        self.exclude_namespaces.push(namespace.into());
        self
    }
}
