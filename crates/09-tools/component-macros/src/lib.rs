//! # Component Macros
//!
//! 这个 crate 提供声明式组件标记：把结构体和配置类的工厂方法在编译期转换为组件描述符，
//! 并在程序加载时注册到全局组件目录，容器按命名空间（模块路径）扫描即可装配。
//!
//! ## 核心宏
//!
//! - [`component`] - 组件标记
//! - [`configuration`] - 配置类标记
//! - [`factories`] - 配置类工厂方法（配合 `#[factory]`）
//! - [`Injectable`] - 仅生成字段构造函数
//!
//! 生成的代码引用 `infrastructure_common`，使用方需要同时依赖该 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{component, configuration, factories};
//! use std::sync::Arc;
//!
//! pub trait Store: Send + Sync {}
//!
//! #[component(provides(dyn Store))]
//! pub struct Repo;
//! impl Store for Repo {}
//!
//! #[component]
//! pub struct Service {
//!     store: Arc<dyn Store>,
//! }
//!
//! #[configuration]
//! pub struct MoneyConfig;
//!
//! #[factories]
//! impl MoneyConfig {
//!     #[factory]
//!     fn currency(&self) -> Currency {
//!         Currency::default()
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod factories;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件标记
///
/// 为结构体实现 `Injectable`（`Arc<T>` 字段从容器解析，其余字段取 `Default::default()`），
/// 并在加载期把组件描述符注册到全局目录。
///
/// # 参数
///
/// - `provides(dyn A, dyn B)` - 实现的接口
/// - `primary` - 同一接口存在多个实现时的首选实现
/// - `name = "custom_name"` - 自定义组件名称
/// - `post_construct = "method"` - 构造后钩子，签名 `fn(&self, &mut dyn Resolver) -> Result<(), E>`
///
/// # 示例
///
/// ```rust,ignore
/// #[component(provides(dyn Store), post_construct = "warm_up")]
/// pub struct Repo {
///     cache: Mutex<Vec<Entry>>,
/// }
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand(component::MarkerKind::Component, args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 配置类标记
///
/// 与 [`component`] 相同的构造规则；配置类实例化后，容器调用其全部工厂方法。
/// 工厂方法由同一类型上的 [`factories`] impl 块提供。
///
/// # 参数
///
/// - `name = "custom_name"` - 自定义名称
/// - `post_construct = "method"` - 构造后钩子
#[proc_macro_attribute]
pub fn configuration(args: TokenStream, input: TokenStream) -> TokenStream {
    component::expand(component::MarkerKind::Configuration, args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 配置类工厂方法
///
/// 作用在配置类的固有 `impl` 块上。其中带 `#[factory]` 的方法签名须为
/// `fn m(&self, dep: Arc<D>, ..) -> P` 或 `-> Result<P, E>`，返回值注册为 `P` 的单例。
///
/// # 示例
///
/// ```rust,ignore
/// #[factories]
/// impl StorageConfig {
///     #[factory(provides(dyn Store), name = "ledger_store")]
///     fn store(&self, settings: Arc<Settings>) -> Result<SqlStore, StoreError> {
///         SqlStore::open(&settings.url)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn factories(args: TokenStream, input: TokenStream) -> TokenStream {
    factories::expand(args.into(), input.into())
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 可注入派生宏
///
/// 只生成 `Injectable` 实现，不注册到全局目录，用于手工登记描述符。
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(Injectable)]
/// pub struct Service {
///     store: Arc<dyn Store>,
/// }
/// ```
#[proc_macro_derive(Injectable)]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match &input.data {
        syn::Data::Struct(data) => utils::injectable_impl(&input.ident, &data.fields).into(),
        _ => syn::Error::new_spanned(&input.ident, "Injectable 只能用于结构体")
            .into_compile_error()
            .into(),
    }
}
