//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入基础设施的公共类型：组件描述符、类型标识、
//! 解析接口和错误类型。
//!
//! ## 核心组件
//!
//! - [`ComponentDescriptor`] - 编译期注册表条目（类型标识到构造闭包）
//! - [`Injectable`] / [`Configuration`] - 构造函数与工厂方法约定
//! - [`Resolver`] - 组件构造期间使用的依赖解析接口
//! - [`ComponentCatalog`] - 加载期填充的全局组件目录
//!
//! ## 设计原则
//!
//! - 用编译期生成的描述符代替运行时反射
//! - 启动期间的任何错误都是致命的

pub mod component;
pub mod discovery;
pub mod errors;
pub mod lifecycle;
pub mod metadata;
pub mod resolver;

pub use component::*;
pub use discovery::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
pub use resolver::*;

#[doc(hidden)]
pub mod __private {
    pub use ctor::ctor;
}
