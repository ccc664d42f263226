//! # 个人理财演示程序
//!
//! 启动时扫描 `--root` 指定的命名空间，装配领域组件，然后在多个任务中并发读取冻结后的上下文。

mod domain;

use anyhow::Context;
use clap::Parser;
use config_impl::PropertiesOptions;
use di_impl::ApplicationContext;
use domain::accounts::AccountStore;
use domain::budget::BudgetService;
use domain::savings::SavingsCalculator;
use infrastructure_composition::{ApplicationBuilder, LoggingConfig};
use std::path::PathBuf;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app", version, about = "编译期依赖注入容器的理财演示")]
struct Args {
    /// 扫描的根命名空间
    #[arg(long, default_value = "example_app::domain")]
    root: String,

    /// 属性文件（TOML）
    #[arg(long, default_value = "config/application.toml")]
    config: PathBuf,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// 使用 JSON 日志
    #[arg(long)]
    json_logs: bool,

    /// 输出装配报告
    #[arg(long)]
    report: bool,

    /// 并发读取任务数
    #[arg(long, default_value_t = 4)]
    readers: usize,
}

fn build_context(args: &Args) -> anyhow::Result<ApplicationContext> {
    let logging = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    }
    .with_level(args.log_level);

    ApplicationBuilder::new()
        .scan(args.root.as_str())
        .with_logging(logging)
        .with_properties(PropertiesOptions::default().with_file(&args.config, false))
        .build()
        .with_context(|| format!("应用启动失败, 根命名空间: {}", args.root))
}

/// 单个读取任务：只读访问上下文中的单例
fn read_summary(context: &ApplicationContext, reader: usize) -> anyhow::Result<String> {
    let budget = context.get_instance::<BudgetService>()?;
    let savings = context.get_instance::<SavingsCalculator>()?;
    let store = context.get_instance::<dyn AccountStore>()?;

    let accounts = store.all();
    let account = accounts
        .get(reader % accounts.len().max(1))
        .context("账户存储为空")?;
    let projection = savings
        .project_account(account.id, 12)
        .unwrap_or_else(|| "-".to_string());
    Ok(format!(
        "[reader {}] {}；账户 {} 一年后约 {}",
        reader,
        budget.summary(&account.owner),
        account.id,
        projection
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let context = build_context(&args)?;

    let tasks: Vec<_> = (0..args.readers)
        .map(|reader| {
            let context = context.clone();
            tokio::spawn(async move { read_summary(&context, reader) })
        })
        .collect();

    for task in tasks {
        let line = task.await.context("读取任务异常退出")??;
        info!("{}", line);
    }

    if args.report {
        println!("{}", context.report().to_json_pretty()?);
    }
    Ok(())
}
