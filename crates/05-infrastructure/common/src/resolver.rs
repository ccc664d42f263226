//! 依赖解析接口
//!
//! 容器对外暴露的最小解析能力。组件构造函数、工厂方法和构造后钩子都只通过
//! `&mut dyn Resolver` 获取依赖，因此描述符层不依赖具体的容器实现。

use crate::errors::ContainerError;
use crate::metadata::TypeKey;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除后的组件实例（内部为具体类型 `T`）
pub type SharedAny = Arc<dyn Any + Send + Sync>;

/// 类型化句柄（内部为 `Arc<T>`，`T` 可以是 `dyn Trait`）
pub type Handle = Arc<dyn Any + Send + Sync>;

/// 依赖解析器 trait
pub trait Resolver {
    /// 按类型标识解析实例，必要时递归构造其依赖
    fn resolve(&mut self, key: TypeKey) -> Result<Handle, ContainerError>;
}

/// 解析器扩展方法
pub trait ResolverExt: Resolver {
    /// 解析指定类型的实例
    fn get_instance<T>(&mut self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let handle = self.resolve(TypeKey::of::<T>())?;
        downcast_handle::<T>(&handle)
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

/// 从解析器获取依赖（宏生成代码使用的自由函数形式）
pub fn resolve<T>(resolver: &mut dyn Resolver) -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
{
    resolver.get_instance::<T>()
}

/// 包装为类型化句柄
pub fn wrap_handle<T>(instance: Arc<T>) -> Handle
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(instance)
}

/// 从类型化句柄中取出实例
pub fn downcast_handle<T>(handle: &Handle) -> Result<Arc<T>, ContainerError>
where
    T: ?Sized + Send + Sync + 'static,
{
    handle
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| ContainerError::TypeMismatch {
            type_name: std::any::type_name::<T>().to_string(),
        })
}

/// 把具体实例包装为其自身类型的句柄
pub fn wrap_concrete<T>(object: SharedAny) -> Option<Handle>
where
    T: Send + Sync + 'static,
{
    object.downcast::<T>().ok().map(wrap_handle)
}
