//! 应用上下文
//!
//! 启动完成后冻结的注册表。没有任何写操作，可在任意线程间共享并无锁读取。

use crate::report::WiringReport;
use di_abstractions::InstanceProvider;
use infrastructure_common::{downcast_handle, ContainerError, ContainerResult, Handle, TypeKey};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

struct ContextInner {
    handles: HashMap<TypeId, Handle>,
    bound_interfaces: HashSet<TypeId>,
    report: WiringReport,
}

/// 只读应用上下文
#[derive(Clone)]
pub struct ApplicationContext {
    inner: Arc<ContextInner>,
}

impl ApplicationContext {
    pub(crate) fn new(handles: HashMap<TypeId, Handle>, bound_interfaces: HashSet<TypeId>, report: WiringReport) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                handles,
                bound_interfaces,
                report,
            }),
        }
    }

    /// 获取实例，从不构造
    pub fn get_instance<T>(&self) -> ContainerResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let handle = self.lookup(TypeKey::of::<T>())?;
        downcast_handle::<T>(&handle)
    }

    /// 冻结时的装配报告
    pub fn report(&self) -> &WiringReport {
        &self.inner.report
    }

    /// 可查找的类型数量（含接口）
    pub fn len(&self) -> usize {
        self.inner.handles.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.handles.is_empty()
    }
}

impl InstanceProvider for ApplicationContext {
    fn lookup(&self, key: TypeKey) -> ContainerResult<Handle> {
        if let Some(handle) = self.inner.handles.get(&key.id()) {
            return Ok(handle.clone());
        }
        if key.is_interface() && !self.inner.bound_interfaces.contains(&key.id()) {
            return Err(ContainerError::NoImplementation {
                type_name: key.name().to_string(),
            });
        }
        Err(ContainerError::NotRegistered {
            type_name: key.name().to_string(),
        })
    }

    fn contains(&self, key: TypeKey) -> bool {
        self.inner.handles.contains_key(&key.id())
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("instances", &self.inner.handles.len())
            .field("bindings", &self.inner.report.bindings.len())
            .finish()
    }
}
