//! 只读实例提供者
//!
//! 启动完成后注册表被冻结，请求处理代码只通过此接口读取实例。

use infrastructure_common::{downcast_handle, ContainerError, Handle, TypeKey};
use std::sync::Arc;

/// 只读实例提供者 trait
pub trait InstanceProvider: Send + Sync {
    /// 按类型标识查找实例，不会构造新实例
    fn lookup(&self, key: TypeKey) -> Result<Handle, ContainerError>;

    /// 是否存在指定类型的实例或绑定
    fn contains(&self, key: TypeKey) -> bool;
}

/// 只读实例提供者扩展方法
pub trait InstanceProviderExt: InstanceProvider {
    /// 获取指定类型的实例
    fn get_instance<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let handle = self.lookup(TypeKey::of::<T>())?;
        downcast_handle::<T>(&handle)
    }

    /// 是否存在指定类型
    fn has<T: ?Sized + 'static>(&self) -> bool {
        self.contains(TypeKey::of::<T>())
    }
}

impl<P: InstanceProvider + ?Sized> InstanceProviderExt for P {}
