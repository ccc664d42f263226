//! 基于组件目录的扫描器

use di_abstractions::{ComponentScanner, ScanOptions};
use infrastructure_common::{ComponentCatalog, ComponentDescriptor, ContainerError, ContainerResult};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
enum CatalogSource {
    Global,
    Owned(Arc<ComponentCatalog>),
}

/// 组件目录扫描器
///
/// 按模块路径从目录中筛选描述符。结果顺序：先按命名空间层级（命名空间自身的类型
/// 排在子命名空间之前），再按声明行号。
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    source: CatalogSource,
    options: ScanOptions,
}

impl CatalogScanner {
    /// 扫描全局目录（编译期标记生成的描述符）
    pub fn global() -> Self {
        Self {
            source: CatalogSource::Global,
            options: ScanOptions::default(),
        }
    }

    /// 扫描指定目录
    pub fn new(catalog: Arc<ComponentCatalog>) -> Self {
        Self {
            source: CatalogSource::Owned(catalog),
            options: ScanOptions::default(),
        }
    }

    /// 设置扫描选项
    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    fn catalog(&self) -> &ComponentCatalog {
        match &self.source {
            CatalogSource::Global => ComponentCatalog::global(),
            CatalogSource::Owned(catalog) => catalog.as_ref(),
        }
    }

    fn is_eligible(&self, descriptor: &ComponentDescriptor, root: &str) -> bool {
        if !descriptor.is_in_namespace(root) {
            return false;
        }
        if !self.options.recursive && descriptor.module_path != root {
            return false;
        }
        !self
            .options
            .exclude_namespaces
            .iter()
            .any(|excluded| descriptor.is_in_namespace(excluded))
    }
}

impl Default for CatalogScanner {
    fn default() -> Self {
        Self::global()
    }
}

impl ComponentScanner for CatalogScanner {
    fn find_components(&self, root_namespace: &str) -> ContainerResult<Vec<Arc<ComponentDescriptor>>> {
        let root = root_namespace.trim().trim_end_matches("::");
        let all = self.catalog().descriptors();

        if root.is_empty() || !all.iter().any(|d| d.is_in_namespace(root)) {
            return Err(ContainerError::NamespaceNotFound {
                namespace: root_namespace.to_string(),
            });
        }

        let mut found: Vec<Arc<ComponentDescriptor>> =
            all.into_iter().filter(|d| self.is_eligible(d, root)).collect();
        found.sort_by(|a, b| {
            let a_segments: Vec<&str> = a.module_path.split("::").collect();
            let b_segments: Vec<&str> = b.module_path.split("::").collect();
            a_segments
                .cmp(&b_segments)
                .then(a.line.cmp(&b.line))
                .then_with(|| a.key.name().cmp(b.key.name()))
        });

        debug!("命名空间 {} 中发现 {} 个组件", root, found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "CatalogScanner"
    }
}
