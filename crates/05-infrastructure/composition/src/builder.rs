//! 应用构建器

use crate::bootstrapper::{Bootstrapper, Preregistration};
use crate::logging::LoggingConfig;
use config_impl::PropertiesOptions;
use di_abstractions::{BindingPolicy, ComponentScanner, ContainerConfig, ScanOptions};
use di_impl::ApplicationContext;
use infrastructure_common::InfrastructureResult;
use tracing::debug;

/// 应用构建器
///
/// 使用建造者模式组合扫描根、配置来源、绑定策略和日志，最终产出只读的应用上下文。
pub struct ApplicationBuilder {
    /// 扫描的根命名空间
    root_namespace: Option<String>,
    /// 容器配置
    container_config: ContainerConfig,
    /// 自定义扫描器
    scanner: Option<Box<dyn ComponentScanner>>,
    /// 日志配置，`None` 表示不初始化日志
    logging_config: Option<LoggingConfig>,
    /// 预置实例
    preregistrations: Vec<Preregistration>,
}

impl ApplicationBuilder {
    /// 创建新的应用构建器
    pub fn new() -> Self {
        Self {
            root_namespace: None,
            container_config: ContainerConfig::default(),
            scanner: None,
            logging_config: None,
            preregistrations: Vec::new(),
        }
    }

    /// 设置扫描的根命名空间（模块路径）
    pub fn scan<S: Into<String>>(mut self, root_namespace: S) -> Self {
        self.root_namespace = Some(root_namespace.into());
        self
    }

    /// 设置扫描选项
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.container_config = self.container_config.with_scan_options(options);
        self
    }

    /// 设置配置来源
    pub fn with_properties(mut self, options: PropertiesOptions) -> Self {
        self.container_config = self.container_config.with_properties(options);
        self
    }

    /// 不加载配置属性
    pub fn without_properties(mut self) -> Self {
        self.container_config.properties = None;
        self
    }

    /// 设置接口绑定策略
    pub fn with_binding_policy(mut self, policy: BindingPolicy) -> Self {
        self.container_config = self.container_config.with_binding_policy(policy);
        self
    }

    /// 使用自定义扫描器
    pub fn with_scanner<S: ComponentScanner + 'static>(mut self, scanner: S) -> Self {
        self.scanner = Some(Box::new(scanner));
        self
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = Some(config);
        self
    }

    /// 是否在构造前校验依赖图
    pub fn enable_validation(mut self, enabled: bool) -> Self {
        self.container_config = self.container_config.with_validation(enabled);
        self
    }

    /// 开发环境预设：调试日志、唯一绑定、构造前校验
    pub fn auto_configure_development(self) -> Self {
        debug!("使用开发环境预设");
        self.with_logging(LoggingConfig::development())
            .with_binding_policy(BindingPolicy::Unique)
            .enable_validation(true)
    }

    /// 生产环境预设：JSON 日志、唯一绑定、构造前校验
    pub fn auto_configure_production(self) -> Self {
        debug!("使用生产环境预设");
        self.with_logging(LoggingConfig::production())
            .with_binding_policy(BindingPolicy::Unique)
            .enable_validation(true)
    }

    /// 预先注册实例，扫描到的组件可以依赖它
    pub fn register_instance<T>(mut self, instance: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.preregistrations
            .push(Box::new(move |container| container.register_instance(instance).map(|_| ())));
        self
    }

    /// 构建应用上下文
    pub fn build(self) -> InfrastructureResult<ApplicationContext> {
        let mut bootstrapper = Bootstrapper::new(self.root_namespace.unwrap_or_default(), self.container_config)
            .with_preregistrations(self.preregistrations);
        if let Some(scanner) = self.scanner {
            bootstrapper = bootstrapper.with_scanner(scanner);
        }
        if let Some(logging) = self.logging_config {
            bootstrapper = bootstrapper.with_logging(logging);
        }
        bootstrapper.bootstrap()
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
