//! 应用启动器
//!
//! 按固定顺序完成启动：初始化日志、创建容器、注册预置实例、扫描装配、冻结注册表。

use crate::logging::{initialize_logging, LoggingConfig};
use di_abstractions::{ComponentScanner, ContainerConfig};
use di_impl::{ApplicationContext, Container};
use infrastructure_common::{
    ComponentDescriptor, ContainerResult, InfrastructureError, InfrastructureResult,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 预置实例注册动作
pub type Preregistration = Box<dyn FnOnce(&mut Container) -> ContainerResult<()> + Send>;

/// 应用启动器
pub struct Bootstrapper {
    root_namespace: String,
    container_config: ContainerConfig,
    scanner: Option<Box<dyn ComponentScanner>>,
    logging: Option<LoggingConfig>,
    preregistrations: Vec<Preregistration>,
}

impl Bootstrapper {
    /// 创建新的启动器
    pub fn new<S: Into<String>>(root_namespace: S, container_config: ContainerConfig) -> Self {
        Self {
            root_namespace: root_namespace.into(),
            container_config,
            scanner: None,
            logging: None,
            preregistrations: Vec::new(),
        }
    }

    /// 使用指定扫描器
    pub fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 启动时初始化日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 添加预置实例注册动作
    pub fn with_preregistrations(mut self, preregistrations: Vec<Preregistration>) -> Self {
        self.preregistrations.extend(preregistrations);
        self
    }

    /// 执行启动流程
    pub fn bootstrap(self) -> InfrastructureResult<ApplicationContext> {
        if let Some(logging) = &self.logging {
            initialize_logging(logging)?;
        }

        if self.root_namespace.trim().is_empty() {
            return Err(InfrastructureError::BootstrapFailed {
                message: "未指定扫描的根命名空间".to_string(),
            });
        }

        info!("开始启动应用, 根命名空间: {}", self.root_namespace);
        let mut container = Container::with_config(self.container_config);
        if let Some(scanner) = self.scanner {
            container = container.with_scanner(BoxedScanner(scanner));
        }

        for preregistration in self.preregistrations {
            preregistration(&mut container)?;
        }
        debug!("预置实例注册完成");

        if let Err(e) = container.auto_register(&self.root_namespace) {
            error!("组件装配失败: {}", e);
            return Err(e.into());
        }

        let context = container.into_context();
        info!("应用启动完成, 共 {} 个组件", context.report().components.len());
        Ok(context)
    }
}

/// 把装箱的扫描器适配为容器需要的具体类型
struct BoxedScanner(Box<dyn ComponentScanner>);

impl ComponentScanner for BoxedScanner {
    fn find_components(
        &self,
        root_namespace: &str,
    ) -> ContainerResult<Vec<Arc<ComponentDescriptor>>> {
        self.0.find_components(root_namespace)
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// 使用默认配置启动：扫描全局组件目录中 `root_namespace` 下的全部组件
pub fn bootstrap(root_namespace: &str) -> InfrastructureResult<ApplicationContext> {
    Bootstrapper::new(root_namespace, ContainerConfig::default()).bootstrap()
}
