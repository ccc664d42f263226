//! 错误类型定义

use thiserror::Error;

/// 通用的装箱错误类型，用户代码（构造函数、工厂方法、钩子）返回的错误统一转换为此类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {key}, 原因: {message}")]
    TypeConversionError { key: String, message: String },
}

/// 容器错误类型
///
/// 启动期间出现的任何错误都是致命的：整个引导过程中止，不存在部分成功的状态。
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("命名空间不存在: {namespace}")]
    NamespaceNotFound { namespace: String },

    #[error("组件没有可用的构造函数: {type_name}")]
    NoConstructor { type_name: String },

    #[error("接口没有绑定任何实现: {type_name}")]
    NoImplementation { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ConstructionFailure { type_name: String, source: BoxError },

    #[error("检测到循环依赖: {chain}")]
    CyclicDependency { chain: String },

    #[error("接口存在多个实现: {interface}, 候选: {candidates:?}")]
    AmbiguousBinding {
        interface: String,
        candidates: Vec<String>,
    },

    #[error("组件重复注册: {type_name}")]
    DuplicateRegistration { type_name: String },

    #[error("组件未注册: {type_name}")]
    NotRegistered { type_name: String },

    #[error("组件类型转换失败: {type_name}")]
    TypeMismatch { type_name: String },

    #[error("外部配置加载失败: {source}")]
    Properties {
        #[from]
        source: ConfigError,
    },
}

impl ContainerError {
    /// 把用户代码返回的错误包装为构造失败
    pub fn construction(type_name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::ConstructionFailure {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 错误是否指向指定的类型名称
    pub fn names_type(&self, type_name: &str) -> bool {
        match self {
            Self::NoConstructor { type_name: t }
            | Self::NoImplementation { type_name: t }
            | Self::ConstructionFailure { type_name: t, .. }
            | Self::DuplicateRegistration { type_name: t }
            | Self::NotRegistered { type_name: t }
            | Self::TypeMismatch { type_name: t } => t == type_name,
            Self::AmbiguousBinding { interface, .. } => interface == type_name,
            Self::CyclicDependency { chain } => chain.split(" -> ").any(|t| t == type_name),
            Self::NamespaceNotFound { .. } | Self::Properties { .. } => false,
        }
    }
}

/// 基础设施启动错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },

    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
