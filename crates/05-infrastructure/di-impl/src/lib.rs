//! # 依赖注入具体实现
//!
//! 提供组件目录扫描器、单例容器、接口绑定、依赖图校验和冻结后的只读应用上下文。
//!
//! ```rust,no_run
//! use di_impl::Container;
//!
//! let mut container = Container::new();
//! container.auto_register("finance_app::domain").expect("装配失败");
//! let context = container.into_context();
//! println!("{}", context.report().to_json_pretty().unwrap());
//! ```

pub mod bindings;
pub mod container;
pub mod context;
pub mod registry;
pub mod report;
pub mod scanner;
mod validation;

pub use bindings::{BindingCandidate, BindingTable};
pub use container::Container;
pub use context::ApplicationContext;
pub use registry::{InstanceRegistry, Registration};
pub use report::{BindingEntry, ComponentEntry, RegistrationOrigin, WiringReport};
pub use scanner::CatalogScanner;

pub use di_abstractions::{
    BindingPolicy, ComponentScanner, ContainerConfig, InstanceProvider, InstanceProviderExt, ScanOptions,
};
pub use infrastructure_common::ResolverExt;
