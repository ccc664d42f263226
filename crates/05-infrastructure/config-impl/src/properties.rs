//! 应用属性
//!
//! 启动时加载的外部配置值，作为普通实例注册到容器，其他组件可以像依赖任何类型一样依赖它。

use config::{Config, Environment, File, FileFormat};
use infrastructure_common::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 属性加载选项
#[derive(Debug, Clone)]
pub struct PropertiesOptions {
    /// 属性文件（TOML），为 `None` 时不读取文件
    pub file: Option<PathBuf>,
    /// 属性文件是否必须存在
    pub required: bool,
    /// 环境变量前缀，为 `None` 时不读取环境变量
    pub env_prefix: Option<String>,
    /// 环境变量中的层级分隔符
    pub env_separator: String,
    /// 默认值
    pub defaults: Vec<(String, String)>,
}

impl Default for PropertiesOptions {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("config/application.toml")),
            required: false,
            env_prefix: Some("APP".to_string()),
            env_separator: "__".to_string(),
            defaults: Vec::new(),
        }
    }
}

impl PropertiesOptions {
    /// 不读取任何外部来源
    pub fn none() -> Self {
        Self {
            file: None,
            required: false,
            env_prefix: None,
            env_separator: "__".to_string(),
            defaults: Vec::new(),
        }
    }

    /// 设置属性文件
    pub fn with_file<P: AsRef<Path>>(mut self, path: P, required: bool) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self.required = required;
        self
    }

    /// 设置环境变量前缀
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 添加默认值
    pub fn with_default<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.defaults.push((key.into(), value.into()));
        self
    }
}

/// 应用属性
#[derive(Debug, Clone)]
pub struct ApplicationProperties {
    settings: Config,
}

impl ApplicationProperties {
    /// 按选项加载属性
    pub fn load(options: &PropertiesOptions) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        for (key, value) in &options.defaults {
            builder = builder
                .set_default(key.as_str(), value.as_str())
                .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
        }

        if let Some(path) = &options.file {
            if path.exists() {
                info!("加载属性文件: {}", path.display());
                builder = builder.add_source(File::from(path.clone()).format(FileFormat::Toml));
            } else if options.required {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            } else {
                debug!("属性文件不存在，跳过: {}", path.display());
            }
        }

        if let Some(prefix) = &options.env_prefix {
            debug!("读取环境变量，前缀: {}", prefix);
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(&options.env_separator)
                    .try_parsing(true),
            );
        }

        let settings = builder
            .build()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;

        Ok(Self { settings })
    }

    /// 从 TOML 文本创建
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
        Ok(Self { settings })
    }

    /// 空属性集
    pub fn empty() -> Self {
        Self {
            settings: Config::default(),
        }
    }

    /// 读取并反序列化属性
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        self.settings.get::<T>(key).map_err(|e| match e {
            config::ConfigError::NotFound(_) => ConfigError::KeyNotFound {
                key: key.to_string(),
            },
            other => ConfigError::TypeConversionError {
                key: key.to_string(),
                message: other.to_string(),
            },
        })
    }

    /// 读取属性，不存在时返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get(key) {
            Err(ConfigError::KeyNotFound { .. }) => Ok(default),
            other => other,
        }
    }

    /// 属性是否存在
    pub fn contains(&self, key: &str) -> bool {
        self.settings.get::<config::Value>(key).is_ok()
    }
}

impl Default for ApplicationProperties {
    fn default() -> Self {
        Self::empty()
    }
}
