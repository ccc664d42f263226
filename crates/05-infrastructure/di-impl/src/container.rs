//! 依赖注入容器
//!
//! 启动阶段单线程、同步地完成整个对象图的装配，完成后冻结为 [`ApplicationContext`]。

use crate::bindings::{BindingCandidate, BindingTable};
use crate::context::ApplicationContext;
use crate::registry::InstanceRegistry;
use crate::report::{BindingEntry, ComponentEntry, RegistrationOrigin, WiringReport};
use crate::scanner::CatalogScanner;
use config_impl::ApplicationProperties;
use di_abstractions::{ComponentScanner, ContainerConfig};
use infrastructure_common::{
    downcast_handle, wrap_concrete, wrap_handle, ComponentDescriptor, ComponentState, ContainerError,
    ContainerResult, Handle, Lifetime, Resolver, SharedAny, TypeKey,
};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 工厂方法索引：产品类型 -> 所属配置类和方法位置
#[derive(Debug, Clone, Copy)]
pub(crate) struct Producer {
    pub(crate) configuration: TypeKey,
    pub(crate) index: usize,
}

/// 依赖注入容器
pub struct Container {
    config: ContainerConfig,
    scanner: Box<dyn ComponentScanner>,
    pub(crate) registry: InstanceRegistry,
    pub(crate) bindings: BindingTable,
    pub(crate) descriptors: HashMap<TypeId, Arc<ComponentDescriptor>>,
    pub(crate) descriptor_order: Vec<TypeKey>,
    pub(crate) producers: HashMap<TypeId, Producer>,
    invoked: HashSet<(TypeId, usize)>,
    resolving: Vec<TypeKey>,
    states: HashMap<TypeId, ComponentState>,
}

impl Container {
    /// 使用默认配置创建容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器，扫描全局组件目录
    pub fn with_config(config: ContainerConfig) -> Self {
        let scanner = CatalogScanner::global().with_options(config.scan.clone());
        Self {
            bindings: BindingTable::new(config.binding_policy),
            config,
            scanner: Box::new(scanner),
            registry: InstanceRegistry::new(),
            descriptors: HashMap::new(),
            descriptor_order: Vec::new(),
            producers: HashMap::new(),
            invoked: HashSet::new(),
            resolving: Vec::new(),
            states: HashMap::new(),
        }
    }

    /// 替换组件扫描器
    pub fn with_scanner<S: ComponentScanner + 'static>(mut self, scanner: S) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 扫描命名空间并装配其中全部组件
    ///
    /// 顺序：加载外部属性，记录接口绑定，实例化配置类并运行其工厂方法，
    /// 最后实例化尚未注册的组件。任何错误都会中止装配。
    pub fn auto_register(&mut self, root_namespace: &str) -> ContainerResult<()> {
        info!("开始自动注册组件, 命名空间: {}", root_namespace);
        self.load_properties()?;

        let found = self.scanner.find_components(root_namespace)?;
        let (configurations, components): (Vec<_>, Vec<_>) =
            found.into_iter().partition(|descriptor| descriptor.is_configuration());
        info!(
            "扫描器 {} 发现 {} 个配置类, {} 个组件",
            self.scanner.name(),
            configurations.len(),
            components.len()
        );

        for descriptor in components.iter().chain(configurations.iter()) {
            self.record_descriptor(descriptor.clone());
        }
        self.bindings.ensure_unambiguous()?;
        if self.config.validate_before_build {
            self.validate()?;
        }

        for configuration in &configurations {
            if !self.registry.contains(configuration.key) {
                self.create_with_dependencies(configuration)?;
            }
            self.run_factories(configuration)?;
        }

        for component in &components {
            if !self.registry.contains(component.key) {
                self.create_with_dependencies(component)?;
            }
        }

        self.bind_registered()?;
        info!("组件自动注册完成, 共 {} 个实例", self.registry.len());
        Ok(())
    }

    /// 手工登记组件描述符
    pub fn register_descriptor(&mut self, descriptor: ComponentDescriptor) {
        self.record_descriptor(Arc::new(descriptor));
    }

    /// 手工注册实例
    pub fn register_instance<T>(&mut self, instance: T) -> ContainerResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        let instance = Arc::new(instance);
        let object: SharedAny = instance.clone();
        self.registry
            .insert_object(key, object, wrap_concrete::<T>, RegistrationOrigin::Manual)?;
        self.states.insert(key.id(), ComponentState::Servable);
        self.bind_interfaces(key)?;
        debug!("手工注册实例: {}", key);
        Ok(instance)
    }

    /// 手工注册共享实例，`T` 可以是接口
    pub fn register_shared<T>(&mut self, instance: Arc<T>) -> ContainerResult<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = TypeKey::of::<T>();
        self.registry
            .insert_handle(key, wrap_handle(instance), RegistrationOrigin::Manual)?;
        self.states.insert(key.id(), ComponentState::Servable);
        debug!("手工注册共享实例: {}", key);
        Ok(())
    }

    /// 获取实例，必要时递归构造其依赖
    pub fn get_instance<T>(&mut self) -> ContainerResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let handle = self.resolve(TypeKey::of::<T>())?;
        downcast_handle::<T>(&handle)
    }

    /// 使用描述符的构造函数创建实例并注册
    ///
    /// 参数依次解析；实例注册到具体类型和它胜出的全部接口下，随后执行一次构造后钩子。
    pub fn create_with_dependencies(&mut self, descriptor: &Arc<ComponentDescriptor>) -> ContainerResult<Handle> {
        let key = descriptor.key;
        if self.registry.contains(key) {
            return Err(ContainerError::DuplicateRegistration {
                type_name: key.name().to_string(),
            });
        }
        let constructor = descriptor.constructor.ok_or_else(|| ContainerError::NoConstructor {
            type_name: key.name().to_string(),
        })?;

        self.enter(key)?;
        debug!("构造组件: {}", key);
        let constructed = constructor(self);
        self.leave(key);
        let object = match constructed {
            Ok(object) => object,
            Err(err) => {
                self.states.remove(&key.id());
                return Err(err);
            }
        };

        let origin = if descriptor.is_configuration() {
            RegistrationOrigin::Configuration
        } else {
            RegistrationOrigin::Component
        };
        let handle = self
            .registry
            .insert_object(key, object.clone(), descriptor.wrap, origin)?;
        self.states.insert(key.id(), ComponentState::Registered);
        self.bind_interfaces(key)?;

        if let Some(hook) = descriptor.post_construct {
            debug!("执行构造后钩子: {}", key);
            hook(object, self)?;
            self.states.insert(key.id(), ComponentState::PostConstructed);
        }
        self.states.insert(key.id(), ComponentState::Servable);
        Ok(handle)
    }

    /// 查询组件状态
    pub fn state_of<T: ?Sized + 'static>(&self) -> ComponentState {
        self.state_of_key(TypeKey::of::<T>())
    }

    /// 按类型标识查询组件状态
    pub fn state_of_key(&self, key: TypeKey) -> ComponentState {
        match self.states.get(&key.id()) {
            Some(state) => *state,
            None if self.registry.contains(key) => ComponentState::Servable,
            None => ComponentState::Unregistered,
        }
    }

    /// 是否已存在指定类型的实例
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registry.contains(TypeKey::of::<T>())
    }

    /// 生成装配报告
    pub fn report(&self) -> WiringReport {
        let resolved = self.bindings.resolved();
        let components = self
            .registry
            .registrations()
            .map(|registration| {
                let key = registration.key;
                let descriptor = self.descriptors.get(&key.id());
                ComponentEntry {
                    type_name: key.name().to_string(),
                    name: descriptor
                        .map(|d| d.name.clone())
                        .unwrap_or_else(|| key.short_name().to_string()),
                    namespace: descriptor.map(|d| d.module_path.to_string()),
                    origin: registration.origin.clone(),
                    lifetime: descriptor.map(|d| d.lifetime).unwrap_or(Lifetime::Singleton),
                    state: self.state_of_key(key),
                    dependencies: self
                        .declared_dependencies(key)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|dependency| dependency.name().to_string())
                        .collect(),
                    interfaces: resolved
                        .iter()
                        .filter(|(interface, concrete)| *concrete == key && self.registry.contains(*interface))
                        .map(|(interface, _)| interface.name().to_string())
                        .collect(),
                }
            })
            .collect();

        WiringReport {
            binding_policy: self.bindings.policy(),
            components,
            bindings: resolved
                .iter()
                .map(|(interface, concrete)| BindingEntry {
                    interface: interface.name().to_string(),
                    implementation: concrete.name().to_string(),
                })
                .collect(),
        }
    }

    /// 冻结注册表，得到只读的应用上下文
    ///
    /// 先为已注册的具体实例补齐接口绑定，手工注册早于绑定记录的实例也能按接口取到。
    pub fn into_context(mut self) -> ApplicationContext {
        if let Err(err) = self.bind_registered() {
            warn!("冻结前补齐接口绑定失败: {}", err);
        }
        let report = self.report();
        let bound = self
            .bindings
            .resolved()
            .into_iter()
            .map(|(interface, _)| interface.id())
            .collect();
        info!("容器已冻结, 共 {} 个实例", self.registry.len());
        ApplicationContext::new(self.registry.handles(), bound, report)
    }

    /// 构造函数（或工厂方法）声明的参数类型
    ///
    /// 工厂产品的第一个依赖是其所属配置类。
    pub(crate) fn declared_dependencies(&self, key: TypeKey) -> ContainerResult<Vec<TypeKey>> {
        if let Some(producer) = self.producers.get(&key.id()) {
            let factory = self
                .descriptors
                .get(&producer.configuration.id())
                .and_then(|configuration| configuration.factories.get(producer.index));
            if let Some(factory) = factory {
                let mut dependencies = vec![producer.configuration];
                dependencies.extend(factory.dependencies.iter().copied());
                return Ok(dependencies);
            }
        }
        match self.descriptors.get(&key.id()) {
            Some(descriptor) if descriptor.constructor.is_some() => Ok(descriptor.dependencies.clone()),
            _ => Err(ContainerError::NoConstructor {
                type_name: key.name().to_string(),
            }),
        }
    }

    fn record_descriptor(&mut self, descriptor: Arc<ComponentDescriptor>) {
        let key = descriptor.key;
        if self.descriptors.insert(key.id(), descriptor.clone()).is_some() {
            debug!("替换组件描述符: {}", key);
        } else {
            self.descriptor_order.push(key);
        }

        for binding in &descriptor.interfaces {
            self.bindings.record(
                binding.interface,
                BindingCandidate {
                    concrete: key,
                    cast: binding.cast,
                    primary: descriptor.primary,
                },
            );
        }

        for (index, factory) in descriptor.factories.iter().enumerate() {
            match self.producers.get(&factory.product.id()) {
                Some(existing) if existing.configuration != key => {
                    warn!(
                        "类型 {} 已由 {} 的工厂方法产生, 忽略 {}::{}",
                        factory.product, existing.configuration, key, factory.name
                    );
                }
                _ => {
                    self.producers.insert(
                        factory.product.id(),
                        Producer {
                            configuration: key,
                            index,
                        },
                    );
                }
            }
            for binding in &factory.interfaces {
                self.bindings.record(
                    binding.interface,
                    BindingCandidate {
                        concrete: factory.product,
                        cast: binding.cast,
                        primary: false,
                    },
                );
            }
        }
    }

    fn load_properties(&mut self) -> ContainerResult<()> {
        let Some(options) = self.config.properties.clone() else {
            return Ok(());
        };
        if self.registry.contains(TypeKey::of::<ApplicationProperties>()) {
            debug!("外部属性已注册, 跳过加载");
            return Ok(());
        }
        let properties = ApplicationProperties::load(&options)?;
        self.register_instance(properties)?;
        info!("外部属性已加载");
        Ok(())
    }

    fn resolve_interface(&mut self, interface: TypeKey) -> ContainerResult<Handle> {
        let candidate = self
            .bindings
            .winner(interface)?
            .ok_or_else(|| ContainerError::NoImplementation {
                type_name: interface.name().to_string(),
            })?;
        self.resolve(candidate.concrete)?;
        self.bind_interfaces(candidate.concrete)?;
        self.registry
            .get(interface)
            .ok_or_else(|| ContainerError::NoImplementation {
                type_name: interface.name().to_string(),
            })
    }

    fn produce(&mut self, producer: Producer) -> ContainerResult<Handle> {
        let configuration = self
            .descriptors
            .get(&producer.configuration.id())
            .cloned()
            .ok_or_else(|| ContainerError::NoConstructor {
                type_name: producer.configuration.name().to_string(),
            })?;
        self.invoke_factory(&configuration, producer.index)
    }

    fn run_factories(&mut self, configuration: &Arc<ComponentDescriptor>) -> ContainerResult<()> {
        for index in 0..configuration.factories.len() {
            if !self.invoked.contains(&(configuration.key.id(), index)) {
                self.invoke_factory(configuration, index)?;
            }
        }
        Ok(())
    }

    fn invoke_factory(&mut self, configuration: &Arc<ComponentDescriptor>, index: usize) -> ContainerResult<Handle> {
        let factory = configuration
            .factories
            .get(index)
            .cloned()
            .ok_or_else(|| ContainerError::NoConstructor {
                type_name: configuration.key.name().to_string(),
            })?;
        let product = factory.product;

        self.enter(product)?;
        let produced = match self.configuration_object(configuration.key) {
            Ok(owner) => {
                debug!("调用工厂方法: {}::{}", configuration.key, factory.name);
                (factory.invoke)(owner, self)
            }
            Err(err) => Err(err),
        };
        self.leave(product);
        let object = match produced {
            Ok(object) => object,
            Err(err) => {
                self.states.remove(&product.id());
                return Err(err);
            }
        };
        self.invoked.insert((configuration.key.id(), index));

        let origin = RegistrationOrigin::Factory {
            configuration: configuration.key.name().to_string(),
            method: factory.name.to_string(),
        };
        let handle = self.registry.insert_object(product, object, factory.wrap, origin)?;
        self.states.insert(product.id(), ComponentState::Registered);
        self.bind_interfaces(product)?;
        self.states.insert(product.id(), ComponentState::Servable);
        Ok(handle)
    }

    fn configuration_object(&mut self, key: TypeKey) -> ContainerResult<SharedAny> {
        self.resolve(key)?;
        self.registry.object(key).ok_or_else(|| ContainerError::TypeMismatch {
            type_name: key.name().to_string(),
        })
    }

    /// 为全部已注册的具体实例绑定其胜出的接口
    fn bind_registered(&mut self) -> ContainerResult<()> {
        let concretes: Vec<TypeKey> = self
            .registry
            .registrations()
            .map(|registration| registration.key)
            .filter(|key| !key.is_interface())
            .collect();
        for concrete in concretes {
            self.bind_interfaces(concrete)?;
        }
        Ok(())
    }

    fn bind_interfaces(&mut self, concrete: TypeKey) -> ContainerResult<()> {
        let Some(object) = self.registry.object(concrete) else {
            return Ok(());
        };
        for (interface, cast) in self.bindings.implemented_by(concrete) {
            if self.registry.contains(interface) {
                continue;
            }
            let handle = cast(object.clone()).ok_or_else(|| ContainerError::TypeMismatch {
                type_name: interface.name().to_string(),
            })?;
            self.registry.insert_interface(interface, handle);
            debug!("绑定接口: {} => {}", interface, concrete);
        }
        Ok(())
    }

    fn enter(&mut self, key: TypeKey) -> ContainerResult<()> {
        if let Some(position) = self.resolving.iter().position(|resolving| *resolving == key) {
            return Err(ContainerError::CyclicDependency {
                chain: cycle_chain(&self.resolving[position..], key),
            });
        }
        self.resolving.push(key);
        self.states.insert(key.id(), ComponentState::UnderConstruction);
        Ok(())
    }

    fn leave(&mut self, key: TypeKey) {
        if let Some(position) = self.resolving.iter().rposition(|resolving| *resolving == key) {
            self.resolving.truncate(position);
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for Container {
    fn resolve(&mut self, key: TypeKey) -> ContainerResult<Handle> {
        if let Some(handle) = self.registry.get(key) {
            return Ok(handle);
        }
        if key.is_interface() {
            return self.resolve_interface(key);
        }
        if let Some(producer) = self.producers.get(&key.id()).copied() {
            return self.produce(producer);
        }
        match self.descriptors.get(&key.id()).cloned() {
            Some(descriptor) => self.create_with_dependencies(&descriptor),
            None => Err(ContainerError::NoConstructor {
                type_name: key.name().to_string(),
            }),
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("scanner", &self.scanner.name())
            .field("binding_policy", &self.bindings.policy())
            .field("instances", &self.registry.len())
            .field("descriptors", &self.descriptor_order)
            .finish()
    }
}

/// 把解析栈中的一段格式化为 `A -> B -> A`
pub(crate) fn cycle_chain(path: &[TypeKey], repeated: TypeKey) -> String {
    path.iter()
        .chain(std::iter::once(&repeated))
        .map(|key| key.name())
        .collect::<Vec<_>>()
        .join(" -> ")
}
