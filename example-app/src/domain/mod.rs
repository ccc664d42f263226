//! 演示用的个人理财领域
//!
//! 这里的类型全部通过标记宏注册，启动时按 `example_app::domain` 扫描装配。

pub mod accounts;
pub mod budget;
pub mod money;
pub mod savings;
