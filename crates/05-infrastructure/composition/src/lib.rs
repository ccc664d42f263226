//! # Infrastructure Composition
//!
//! 组合层把日志、配置属性、组件扫描和容器装配串成一次启动，产出冻结的
//! [`ApplicationContext`](di_impl::ApplicationContext)。
//!
//! ```rust,no_run
//! use infrastructure_composition::ApplicationBuilder;
//!
//! let context = ApplicationBuilder::new()
//!     .auto_configure_development()
//!     .scan("finance_app::domain")
//!     .build()
//!     .expect("启动失败");
//! println!("{}", context.report().to_json_pretty().unwrap());
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod logging;

pub use bootstrapper::{bootstrap, Bootstrapper, Preregistration};
pub use builder::ApplicationBuilder;
pub use logging::{initialize_logging, LoggingConfig};
