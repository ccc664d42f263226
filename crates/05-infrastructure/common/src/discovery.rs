//! 组件目录
//!
//! 编译期生成的注册代码在程序加载时把描述符写入全局目录，扫描器再从目录中按命名空间取出。

use crate::component::ComponentDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

/// 全局组件目录
static GLOBAL_CATALOG: Lazy<ComponentCatalog> = Lazy::new(ComponentCatalog::new);

/// 组件目录
///
/// 每个具体类型最多一个描述符，重复注册时后者替换前者。
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    descriptors: RwLock<Vec<Arc<ComponentDescriptor>>>,
}

impl ComponentCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取全局目录
    pub fn global() -> &'static ComponentCatalog {
        &GLOBAL_CATALOG
    }

    /// 注册描述符
    pub fn register(&self, descriptor: ComponentDescriptor) {
        let mut descriptors = self.descriptors.write();
        match descriptors.iter().position(|d| d.key == descriptor.key) {
            Some(index) => descriptors[index] = Arc::new(descriptor),
            None => descriptors.push(Arc::new(descriptor)),
        }
    }

    /// 获取全部描述符（按注册顺序）
    pub fn descriptors(&self) -> Vec<Arc<ComponentDescriptor>> {
        self.descriptors.read().clone()
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}

/// 注册到全局目录（宏生成的加载期代码调用）
pub fn register_component(descriptor: ComponentDescriptor) {
    ComponentCatalog::global().register(descriptor);
}
