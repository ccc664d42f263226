//! 组件基础接口定义
//!
//! 组件描述符是容器的“编译期注册表”条目：类型标识到构造闭包的映射，
//! 可以手工填写，也可以由 `component-macros` 在编译期生成。

use crate::errors::ContainerError;
use crate::lifecycle::Lifetime;
use crate::metadata::TypeKey;
use crate::resolver::{wrap_concrete, Handle, Resolver, SharedAny};
use std::fmt;
use std::sync::Arc;

/// 可注入组件 trait
///
/// 相当于组件的公开构造函数：声明参数类型，并从解析器取得这些参数完成构造。
pub trait Injectable: Send + Sync + Sized + 'static {
    /// 构造函数参数类型列表
    fn dependencies() -> Vec<TypeKey>;

    /// 使用依赖注入构建组件实例
    fn inject(resolver: &mut dyn Resolver) -> Result<Self, ContainerError>;
}

/// 配置类 trait
///
/// 配置类实例化后，容器依次调用它的全部工厂方法。
pub trait Configuration: Injectable {
    /// 工厂方法列表
    fn factory_methods() -> Vec<FactoryMethod>;
}

/// 构造函数类型
pub type ConstructorFn = fn(&mut dyn Resolver) -> Result<SharedAny, ContainerError>;

/// 把具体实例转换为某个类型化句柄
pub type CastFn = fn(SharedAny) -> Option<Handle>;

/// 构造后钩子
pub type HookFn = fn(SharedAny, &mut dyn Resolver) -> Result<(), ContainerError>;

/// 工厂方法调用函数，第一个参数为配置类实例
pub type FactoryFn = fn(SharedAny, &mut dyn Resolver) -> Result<SharedAny, ContainerError>;

/// 组件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ComponentKind {
    /// 组件：注册自身并把声明的接口绑定到自身
    Component,
    /// 配置类：实例化后运行其工厂方法
    Configuration,
}

/// 接口绑定声明
#[derive(Clone, Copy)]
pub struct InterfaceBinding {
    /// 接口类型
    pub interface: TypeKey,
    /// 具体实例到接口句柄的转换
    pub cast: CastFn,
}

impl InterfaceBinding {
    /// 创建接口绑定声明
    pub fn new(interface: TypeKey, cast: CastFn) -> Self {
        Self { interface, cast }
    }
}

impl fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("interface", &self.interface)
            .finish()
    }
}

/// 声明 `具体类型 => 接口` 的绑定
///
/// ```rust
/// use infrastructure_common::{bind_interface, InterfaceBinding};
///
/// pub trait Store: Send + Sync {}
/// pub struct Repo;
/// impl Store for Repo {}
///
/// let binding: InterfaceBinding = bind_interface!(Repo => dyn Store);
/// assert!(binding.interface.is_interface());
/// ```
#[macro_export]
macro_rules! bind_interface {
    ($concrete:ty => $interface:ty) => {
        $crate::InterfaceBinding::new($crate::TypeKey::of::<$interface>(), |object| {
            object.downcast::<$concrete>().ok().map(|concrete| {
                let interface: ::std::sync::Arc<$interface> = concrete;
                $crate::wrap_handle(interface)
            })
        })
    };
}

/// 工厂方法描述
#[derive(Clone)]
pub struct FactoryMethod {
    /// 方法名称
    pub name: &'static str,
    /// 返回值的具体类型
    pub product: TypeKey,
    /// 参数类型列表
    pub dependencies: Vec<TypeKey>,
    /// 调用函数
    pub invoke: FactoryFn,
    /// 返回值到自身类型句柄的转换
    pub wrap: CastFn,
    /// 返回值实现的接口
    pub interfaces: Vec<InterfaceBinding>,
}

impl FactoryMethod {
    /// 创建工厂方法描述
    pub fn new<P>(name: &'static str, invoke: FactoryFn) -> Self
    where
        P: Send + Sync + 'static,
    {
        Self {
            name,
            product: TypeKey::of::<P>(),
            dependencies: Vec::new(),
            invoke,
            wrap: wrap_concrete::<P>,
            interfaces: Vec::new(),
        }
    }

    /// 设置参数类型列表
    pub fn with_dependencies(mut self, dependencies: Vec<TypeKey>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// 添加返回值实现的接口
    pub fn provides(mut self, binding: InterfaceBinding) -> Self {
        self.interfaces.push(binding);
        self
    }
}

impl fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("name", &self.name)
            .field("product", &self.product)
            .field("dependencies", &self.dependencies)
            .field("interfaces", &self.interfaces)
            .finish()
    }
}

/// 组件描述符
#[derive(Clone)]
pub struct ComponentDescriptor {
    /// 具体类型
    pub key: TypeKey,
    /// 组件名称
    pub name: String,
    /// 所在命名空间（模块路径）
    pub module_path: &'static str,
    /// 声明所在行，用于同一命名空间内排序
    pub line: u32,
    /// 组件种类
    pub kind: ComponentKind,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 是否为接口的首选实现
    pub primary: bool,
    /// 构造函数参数类型
    pub dependencies: Vec<TypeKey>,
    /// 构造函数，`None` 表示没有可用的构造函数
    pub constructor: Option<ConstructorFn>,
    /// 实例到自身类型句柄的转换
    pub wrap: CastFn,
    /// 声明实现的接口
    pub interfaces: Vec<InterfaceBinding>,
    /// 构造后钩子
    pub post_construct: Option<HookFn>,
    /// 工厂方法（仅配置类）
    pub factories: Vec<FactoryMethod>,
}

impl ComponentDescriptor {
    fn new<T: Send + Sync + 'static>(kind: ComponentKind, module_path: &'static str) -> Self {
        let key = TypeKey::of::<T>();
        Self {
            key,
            name: key.short_name().to_string(),
            module_path,
            line: 0,
            kind,
            lifetime: Lifetime::Singleton,
            primary: false,
            dependencies: Vec::new(),
            constructor: None,
            wrap: wrap_concrete::<T>,
            interfaces: Vec::new(),
            post_construct: None,
            factories: Vec::new(),
        }
    }

    /// 创建组件描述符（尚未设置构造函数）
    pub fn component<T: Send + Sync + 'static>(module_path: &'static str) -> Self {
        Self::new::<T>(ComponentKind::Component, module_path)
    }

    /// 创建配置类描述符，并带上其构造函数和工厂方法
    pub fn configuration<T: Configuration>(module_path: &'static str) -> Self {
        Self::new::<T>(ComponentKind::Configuration, module_path)
            .injectable::<T>()
            .with_factories(T::factory_methods())
    }

    /// 使用 [`Injectable`] 实现作为构造函数
    pub fn injectable<T: Injectable>(self) -> Self {
        self.with_constructor(T::dependencies(), construct_injectable::<T>)
    }

    /// 设置构造函数
    pub fn with_constructor(mut self, dependencies: Vec<TypeKey>, constructor: ConstructorFn) -> Self {
        self.dependencies = dependencies;
        self.constructor = Some(constructor);
        self
    }

    /// 设置组件名称
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置声明所在行
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// 标记为首选实现
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// 添加实现的接口
    pub fn provides(mut self, binding: InterfaceBinding) -> Self {
        self.interfaces.push(binding);
        self
    }

    /// 设置构造后钩子
    pub fn with_post_construct(mut self, hook: HookFn) -> Self {
        self.post_construct = Some(hook);
        self
    }

    /// 添加工厂方法
    pub fn with_factory(mut self, factory: FactoryMethod) -> Self {
        self.factories.push(factory);
        self
    }

    /// 批量添加工厂方法
    pub fn with_factories(mut self, factories: Vec<FactoryMethod>) -> Self {
        self.factories.extend(factories);
        self
    }

    /// 是否为配置类
    pub fn is_configuration(&self) -> bool {
        self.kind == ComponentKind::Configuration
    }

    /// 是否位于指定命名空间或其子命名空间
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        let namespace = namespace.trim_end_matches("::");
        self.module_path == namespace
            || self
                .module_path
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("module_path", &self.module_path)
            .field("kind", &self.kind)
            .field("primary", &self.primary)
            .field("dependencies", &self.dependencies)
            .field("has_constructor", &self.constructor.is_some())
            .field("interfaces", &self.interfaces)
            .field("factories", &self.factories)
            .finish()
    }
}

fn construct_injectable<T: Injectable>(resolver: &mut dyn Resolver) -> Result<SharedAny, ContainerError> {
    let instance: SharedAny = Arc::new(T::inject(resolver)?);
    Ok(instance)
}
