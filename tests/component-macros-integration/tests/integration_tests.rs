//! 组件标记宏集成测试：标记的类型在加载期进入全局目录，按模块路径扫描装配

use di_impl::{BindingPolicy, Container, ContainerConfig};
use infrastructure_common::ContainerError;

mod ledger {
    use component_macros::{component, configuration, factories};
    use config_impl::ApplicationProperties;
    use infrastructure_common::{ConfigResult, ContainerError, Resolver};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    pub const NAMESPACE: &str = module_path!();
    pub static CURRENCY_CALLS: AtomicUsize = AtomicUsize::new(0);
    pub static WARM_UPS: AtomicUsize = AtomicUsize::new(0);

    pub trait Store: Send + Sync {
        fn balance(&self, account: &str) -> i64;
    }

    #[component(provides(dyn Store), post_construct = "warm_up")]
    pub struct MemoryStore {
        entries: Mutex<Vec<(String, i64)>>,
    }

    impl MemoryStore {
        fn warm_up(&self, _resolver: &mut dyn Resolver) -> Result<(), ContainerError> {
            WARM_UPS.fetch_add(1, Ordering::SeqCst);
            self.entries.lock().unwrap().push(("cash".to_string(), 100));
            Ok(())
        }
    }

    impl Store for MemoryStore {
        fn balance(&self, account: &str) -> i64 {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter(|(name, _)| name == account)
                .map(|(_, amount)| amount)
                .sum()
        }
    }

    pub struct Currency {
        pub code: String,
        pub scale: u32,
    }

    #[configuration]
    pub struct MoneyConfig {
        properties: Arc<ApplicationProperties>,
    }

    #[factories]
    impl MoneyConfig {
        #[factory]
        fn currency(&self) -> ConfigResult<Currency> {
            CURRENCY_CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Currency {
                code: self.properties.get("money.currency")?,
                scale: self.properties.get_or("money.scale", 2)?,
            })
        }
    }

    #[component]
    pub struct Accounts {
        pub store: Arc<dyn Store>,
        pub currency: Arc<Currency>,
    }

    #[component(name = "monthly_reports")]
    pub struct Reports {
        pub accounts: Arc<Accounts>,
        pub currency: Arc<Currency>,
    }
}

mod notify {
    use component_macros::component;
    use std::sync::Arc;

    pub const NAMESPACE: &str = module_path!();

    pub trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
    }

    #[component(provides(dyn Notifier))]
    pub struct EmailNotifier;

    impl Notifier for EmailNotifier {
        fn channel(&self) -> &'static str {
            "email"
        }
    }

    #[component(provides(dyn Notifier), primary, name = "sms")]
    pub struct SmsNotifier;

    impl Notifier for SmsNotifier {
        fn channel(&self) -> &'static str {
            "sms"
        }
    }

    #[component]
    pub struct Alerts {
        pub notifier: Arc<dyn Notifier>,
    }
}

mod exporters {
    use component_macros::component;
    use std::sync::Arc;

    pub const NAMESPACE: &str = module_path!();

    pub trait Exporter: Send + Sync {
        fn format(&self) -> &'static str;
    }

    #[component(provides(dyn Exporter))]
    pub struct CsvExporter;

    impl Exporter for CsvExporter {
        fn format(&self) -> &'static str {
            "csv"
        }
    }

    #[component(provides(dyn Exporter))]
    pub struct JsonExporter;

    impl Exporter for JsonExporter {
        fn format(&self) -> &'static str {
            "json"
        }
    }

    #[component]
    pub struct Export {
        pub exporter: Arc<dyn Exporter>,
    }
}

mod cycle {
    use component_macros::component;
    use std::sync::Arc;

    pub const NAMESPACE: &str = module_path!();

    #[component]
    pub struct Left {
        pub right: Arc<Right>,
    }

    #[component]
    pub struct Right {
        pub left: Arc<Left>,
    }
}

mod failing {
    use component_macros::component;
    use infrastructure_common::Resolver;

    pub const NAMESPACE: &str = module_path!();

    #[derive(Debug, thiserror::Error)]
    #[error("连接池已耗尽")]
    pub struct PoolExhausted;

    #[component(post_construct = "connect")]
    pub struct Pool;

    impl Pool {
        fn connect(&self, _resolver: &mut dyn Resolver) -> Result<(), PoolExhausted> {
            Err(PoolExhausted)
        }
    }
}

mod manual {
    use component_macros::Injectable;
    use std::sync::Arc;

    pub struct Clock {
        pub offset_hours: i32,
    }

    #[derive(Injectable)]
    pub struct Summary {
        pub clock: Arc<Clock>,
        pub runs: u32,
    }
}

fn isolated() -> ContainerConfig {
    ContainerConfig::isolated()
}

#[test]
fn test_marked_components_are_wired_from_global_catalog() {
    use config_impl::PropertiesOptions;
    use ledger::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    let config = isolated().with_properties(PropertiesOptions::none().with_default("money.currency", "EUR"));
    let mut container = Container::with_config(config);
    container.auto_register(NAMESPACE).unwrap();

    let reports = container.get_instance::<Reports>().unwrap();
    let accounts = container.get_instance::<Accounts>().unwrap();
    assert!(Arc::ptr_eq(&reports.accounts, &accounts));
    assert!(Arc::ptr_eq(&reports.currency, &accounts.currency));
    assert_eq!(accounts.currency.code, "EUR");
    assert_eq!(accounts.currency.scale, 2);

    assert_eq!(CURRENCY_CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(WARM_UPS.load(Ordering::SeqCst), 1);

    let store = container.get_instance::<dyn Store>().unwrap();
    assert_eq!(store.balance("cash"), 100);

    let report = container.report();
    assert!(report.components.iter().any(|c| c.name == "monthly_reports"));
}

#[test]
fn test_primary_implementation_wins() {
    let mut container = Container::with_config(isolated());
    container.auto_register(notify::NAMESPACE).unwrap();

    let alerts = container.get_instance::<notify::Alerts>().unwrap();
    assert_eq!(alerts.notifier.channel(), "sms");

    let report = container.report();
    assert!(report.components.iter().any(|c| c.name == "sms"));
}

#[test]
fn test_ambiguous_interface_depends_on_policy() {
    let mut strict = Container::with_config(isolated());
    let result = strict.auto_register(exporters::NAMESPACE);
    assert!(matches!(result, Err(ContainerError::AmbiguousBinding { .. })));

    let mut lenient = Container::with_config(isolated().with_binding_policy(BindingPolicy::LastRegisteredWins));
    lenient.auto_register(exporters::NAMESPACE).unwrap();
    let export = lenient.get_instance::<exporters::Export>().unwrap();
    assert_eq!(export.exporter.format(), "json");
}

#[test]
fn test_cycle_between_marked_components() {
    let mut container = Container::with_config(isolated());
    match container.auto_register(cycle::NAMESPACE) {
        Err(ContainerError::CyclicDependency { chain }) => {
            assert!(chain.contains("Left"));
            assert!(chain.contains("Right"));
            assert_eq!(chain.matches(" -> ").count(), 2);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_failing_hook_aborts_startup() {
    let mut container = Container::with_config(isolated());
    let error = container.auto_register(failing::NAMESPACE).unwrap_err();
    assert!(matches!(error, ContainerError::ConstructionFailure { .. }));
    assert!(error.to_string().contains("连接池已耗尽"));
}

#[test]
fn test_derived_injectable_with_manual_descriptor() {
    use infrastructure_common::{ComponentDescriptor, Injectable, TypeKey};
    use manual::*;

    assert!(Summary::dependencies() == vec![TypeKey::of::<Clock>()]);

    let mut container = Container::with_config(isolated());
    container.register_instance(Clock { offset_hours: -5 }).unwrap();
    container.register_descriptor(ComponentDescriptor::component::<Summary>("manual").injectable::<Summary>());

    let summary = container.get_instance::<Summary>().unwrap();
    assert_eq!(summary.clock.offset_hours, -5);
    assert_eq!(summary.runs, 0);
}
