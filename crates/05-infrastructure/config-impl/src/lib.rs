//! # 配置管理实现
//!
//! 基于 `config` crate 加载应用属性（TOML 文件 + 环境变量），供容器在启动时注册。

pub mod properties;

pub use properties::{ApplicationProperties, PropertiesOptions};
