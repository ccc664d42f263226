//! 元数据定义
//!
//! 提供容器内部使用的类型标识

use serde::Serialize;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型标识
///
/// 相等性和哈希只由 [`TypeId`] 决定，类型名称仅用于日志和错误信息。
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeKey {
    /// 类型ID
    #[serde(skip)]
    id: TypeId,
    /// 完整类型名称
    name: &'static str,
    /// 是否为无固定大小的类型（`dyn Trait` 等）
    #[serde(skip)]
    unsized_type: bool,
}

impl TypeKey {
    /// 从类型获取类型标识，`T` 可以是 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            unsized_type: std::mem::size_of::<*const T>() != std::mem::size_of::<*const ()>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        let name = self.name.trim_start_matches("dyn ");
        let base = name.split('<').next().unwrap_or(name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// 是否为接口
    ///
    /// 按指针宽度判断：指向 `dyn Trait`（以及切片、`str`）的指针带有元数据。
    /// 这类类型不能由构造函数产生，只能经接口绑定或共享注册取得。
    /// 不依赖 `type_name` 的输出格式。
    pub fn is_interface(&self) -> bool {
        self.unsized_type
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
