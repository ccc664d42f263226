//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件扫描、容器配置和只读实例访问的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`ContainerConfig`] / [`BindingPolicy`] - 容器配置
//! - [`InstanceProvider`] - 启动完成后的只读实例访问

pub mod container;
pub mod provider;
pub mod scanner;

pub use container::*;
pub use provider::*;
pub use scanner::*;
