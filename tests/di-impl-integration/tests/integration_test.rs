//! 依赖注入容器的集中集成测试
//!
//! 组件描述符全部手工构建并登记在各测试自己的目录中，互不影响。

use config_impl::{ApplicationProperties, PropertiesOptions};
use di_impl::{
    BindingPolicy, CatalogScanner, Container, ContainerConfig, InstanceProviderExt, RegistrationOrigin,
};
use infrastructure_common::{
    bind_interface, resolve, ComponentCatalog, ComponentDescriptor, ComponentState, Configuration, ContainerError,
    ContainerResult, FactoryMethod, Injectable, Resolver, SharedAny, TypeKey,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn addr<T: ?Sized>(value: &Arc<T>) -> usize {
    Arc::as_ptr(value) as *const () as usize
}

fn container_over(catalog: ComponentCatalog, config: ContainerConfig) -> Container {
    Container::with_config(config).with_scanner(CatalogScanner::new(Arc::new(catalog)))
}

mod app {
    use super::*;

    pub trait Store: Send + Sync {
        fn save(&self, entry: &str) -> usize;
    }

    #[derive(Debug, Default)]
    pub struct Repo {
        pub saved: AtomicUsize,
    }

    impl Store for Repo {
        fn save(&self, _entry: &str) -> usize {
            self.saved.fetch_add(1, Ordering::SeqCst) + 1
        }
    }

    impl Injectable for Repo {
        fn dependencies() -> Vec<TypeKey> {
            Vec::new()
        }

        fn inject(_resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            Ok(Repo::default())
        }
    }

    pub struct Service {
        pub store: Arc<dyn Store>,
    }

    impl Injectable for Service {
        fn dependencies() -> Vec<TypeKey> {
            vec![TypeKey::of::<dyn Store>()]
        }

        fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            Ok(Service {
                store: resolve::<dyn Store>(resolver)?,
            })
        }
    }

    pub fn catalog() -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        catalog.register(
            ComponentDescriptor::component::<Repo>("app")
                .injectable::<Repo>()
                .at_line(10)
                .provides(bind_interface!(Repo => dyn Store)),
        );
        catalog.register(
            ComponentDescriptor::component::<Service>("app")
                .injectable::<Service>()
                .at_line(20),
        );
        catalog
    }
}

#[test]
fn test_repo_service_scenario() {
    let mut container = container_over(app::catalog(), ContainerConfig::isolated());
    container.auto_register("app").unwrap();

    let service = container.get_instance::<app::Service>().unwrap();
    let second = container.get_instance::<app::Service>().unwrap();
    assert!(Arc::ptr_eq(&service, &second));

    let store = container.get_instance::<dyn app::Store>().unwrap();
    let repo = container.get_instance::<app::Repo>().unwrap();
    assert_eq!(addr(&store), addr(&repo));
    assert_eq!(addr(&service.store), addr(&repo));

    service.store.save("coffee");
    assert_eq!(repo.saved.load(Ordering::SeqCst), 1);
}

#[test]
fn test_frozen_context_serves_same_graph() {
    let mut container = container_over(app::catalog(), ContainerConfig::isolated());
    container.auto_register("app").unwrap();
    let context = container.into_context();

    let service = context.get_instance::<app::Service>().unwrap();
    let store = context.get_instance::<dyn app::Store>().unwrap();
    assert_eq!(addr(&service.store), addr(&store));
    assert!(context.has::<app::Repo>());

    let report = context.report();
    assert_eq!(report.components.len(), 2);
    assert_eq!(report.bindings[0].interface, std::any::type_name::<dyn app::Store>());
    assert_eq!(report.bindings[0].implementation, std::any::type_name::<app::Repo>());
}

fn repo_only_catalog() -> ComponentCatalog {
    let catalog = ComponentCatalog::new();
    catalog.register(
        ComponentDescriptor::component::<app::Repo>("app")
            .injectable::<app::Repo>()
            .provides(bind_interface!(app::Repo => dyn app::Store)),
    );
    catalog
}

#[test]
fn test_preregistered_implementer_is_bound_in_frozen_context() {
    let mut container = container_over(repo_only_catalog(), ContainerConfig::isolated());
    container.register_instance(app::Repo::default()).unwrap();
    container.auto_register("app").unwrap();
    let context = container.into_context();

    let repo = context.get_instance::<app::Repo>().unwrap();
    let store = context.get_instance::<dyn app::Store>().unwrap();
    assert_eq!(addr(&store), addr(&repo));
    store.save("rent");
    assert_eq!(repo.saved.load(Ordering::SeqCst), 1);
}

#[test]
fn test_descriptor_recorded_after_instance_is_bound_on_freeze() {
    let mut container = Container::with_config(ContainerConfig::isolated());
    let repo = container.register_instance(app::Repo::default()).unwrap();
    container.register_descriptor(
        ComponentDescriptor::component::<app::Repo>("app")
            .injectable::<app::Repo>()
            .provides(bind_interface!(app::Repo => dyn app::Store)),
    );
    let context = container.into_context();

    let store = context.get_instance::<dyn app::Store>().unwrap();
    assert_eq!(addr(&store), addr(&repo));
}

#[tokio::test]
async fn test_context_concurrent_reads() {
    let mut container = container_over(app::catalog(), ContainerConfig::isolated());
    container.auto_register("app").unwrap();
    let context = container.into_context();
    let expected = addr(&context.get_instance::<dyn app::Store>().unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let context = context.clone();
            tokio::spawn(async move {
                let service = context.get_instance::<app::Service>().unwrap();
                service.store.save(&format!("entry-{i}"));
                addr(&service.store)
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), expected);
    }
    let repo = context.get_instance::<app::Repo>().unwrap();
    assert_eq!(repo.saved.load(Ordering::SeqCst), 8);
}

#[test]
fn test_unknown_namespace_aborts_bootstrap() {
    let mut container = container_over(app::catalog(), ContainerConfig::isolated());
    let err = container.auto_register("finance").unwrap_err();
    assert!(matches!(err, ContainerError::NamespaceNotFound { .. }));
    assert!(!container.contains::<app::Repo>());
}

mod money {
    use super::*;

    pub static CURRENCY_CALLS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    pub struct Currency {
        pub code: String,
    }

    pub struct MoneyConfig;

    impl Injectable for MoneyConfig {
        fn dependencies() -> Vec<TypeKey> {
            Vec::new()
        }

        fn inject(_resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            Ok(MoneyConfig)
        }
    }

    fn currency(_owner: SharedAny, _resolver: &mut dyn Resolver) -> ContainerResult<SharedAny> {
        CURRENCY_CALLS.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Currency {
            code: "CHF".to_string(),
        }))
    }

    impl Configuration for MoneyConfig {
        fn factory_methods() -> Vec<FactoryMethod> {
            vec![FactoryMethod::new::<Currency>("currency", currency)]
        }
    }

    pub struct Budget {
        pub currency: Arc<Currency>,
    }

    pub struct Savings {
        pub currency: Arc<Currency>,
    }

    impl Injectable for Budget {
        fn dependencies() -> Vec<TypeKey> {
            vec![TypeKey::of::<Currency>()]
        }

        fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            Ok(Budget {
                currency: resolve::<Currency>(resolver)?,
            })
        }
    }

    impl Injectable for Savings {
        fn dependencies() -> Vec<TypeKey> {
            vec![TypeKey::of::<Currency>()]
        }

        fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            Ok(Savings {
                currency: resolve::<Currency>(resolver)?,
            })
        }
    }

    pub fn catalog() -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        catalog.register(ComponentDescriptor::component::<Budget>("money").injectable::<Budget>());
        catalog.register(ComponentDescriptor::component::<Savings>("money").injectable::<Savings>());
        catalog.register(ComponentDescriptor::configuration::<MoneyConfig>("money::config"));
        catalog
    }
}

#[test]
fn test_factory_runs_once_for_many_dependents() {
    let mut container = container_over(money::catalog(), ContainerConfig::isolated());
    container.auto_register("money").unwrap();

    let budget = container.get_instance::<money::Budget>().unwrap();
    let savings = container.get_instance::<money::Savings>().unwrap();
    assert!(Arc::ptr_eq(&budget.currency, &savings.currency));
    assert_eq!(budget.currency.code, "CHF");
    assert_eq!(money::CURRENCY_CALLS.load(Ordering::SeqCst), 1);

    let report = container.report();
    let currency = report.component(std::any::type_name::<money::Currency>()).unwrap();
    assert!(matches!(currency.origin, RegistrationOrigin::Factory { .. }));
    let configuration = report.component(std::any::type_name::<money::MoneyConfig>()).unwrap();
    assert_eq!(configuration.origin, RegistrationOrigin::Configuration);
}

mod ambiguous {
    use super::*;

    pub trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
    }

    #[derive(Default)]
    pub struct Mailer;
    #[derive(Default)]
    pub struct Sms;

    impl Notifier for Mailer {
        fn channel(&self) -> &'static str {
            "mail"
        }
    }

    impl Notifier for Sms {
        fn channel(&self) -> &'static str {
            "sms"
        }
    }

    fn build<T: Default + Send + Sync + 'static>(_resolver: &mut dyn Resolver) -> ContainerResult<SharedAny> {
        Ok(Arc::new(T::default()))
    }

    pub fn catalog(sms_primary: bool) -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        catalog.register(
            ComponentDescriptor::component::<Mailer>("alerts")
                .at_line(1)
                .with_constructor(Vec::new(), build::<Mailer>)
                .provides(bind_interface!(Mailer => dyn Notifier)),
        );
        let sms = ComponentDescriptor::component::<Sms>("alerts")
            .at_line(2)
            .with_constructor(Vec::new(), build::<Sms>)
            .provides(bind_interface!(Sms => dyn Notifier));
        catalog.register(if sms_primary { sms.primary() } else { sms });
        catalog
    }
}

#[test]
fn test_two_implementers_fail_under_unique_policy() {
    let mut container = container_over(ambiguous::catalog(false), ContainerConfig::isolated());
    let err = container.auto_register("alerts").unwrap_err();
    match err {
        ContainerError::AmbiguousBinding { interface, candidates } => {
            assert_eq!(interface, std::any::type_name::<dyn ambiguous::Notifier>());
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(container.state_of::<ambiguous::Mailer>(), ComponentState::Unregistered);
}

#[test]
fn test_primary_qualifier_selects_implementation() {
    let mut container = container_over(ambiguous::catalog(true), ContainerConfig::isolated());
    container.auto_register("alerts").unwrap();

    let notifier = container.get_instance::<dyn ambiguous::Notifier>().unwrap();
    assert_eq!(notifier.channel(), "sms");
    assert!(container.contains::<ambiguous::Mailer>());
}

#[test]
fn test_last_registered_wins_when_configured() {
    let config = ContainerConfig::isolated().with_binding_policy(BindingPolicy::LastRegisteredWins);
    let mut container = container_over(ambiguous::catalog(false), config);
    container.auto_register("alerts").unwrap();

    let notifier = container.get_instance::<dyn ambiguous::Notifier>().unwrap();
    let sms = container.get_instance::<ambiguous::Sms>().unwrap();
    assert_eq!(addr(&notifier), addr(&sms));
}

mod broken {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("账本文件损坏")]
    pub struct CorruptLedger;

    pub struct Ledger;

    fn fail(_resolver: &mut dyn Resolver) -> ContainerResult<SharedAny> {
        Err(ContainerError::construction(std::any::type_name::<Ledger>(), CorruptLedger))
    }

    pub struct Hidden;

    pub fn catalog() -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        catalog.register(ComponentDescriptor::component::<Ledger>("broken").with_constructor(Vec::new(), fail));
        catalog.register(ComponentDescriptor::component::<Hidden>("broken::hidden"));
        catalog
    }
}

#[test]
fn test_construction_failure_names_type() {
    let config = ContainerConfig::isolated().with_validation(false);
    let mut container = container_over(broken::catalog(), config);
    let err = container.auto_register("broken").unwrap_err();
    assert!(matches!(err, ContainerError::ConstructionFailure { .. }));
    assert!(err.names_type(std::any::type_name::<broken::Ledger>()));
    assert!(err.to_string().contains("账本文件损坏"));
}

#[test]
fn test_type_without_constructor_aborts_bootstrap() {
    let mut container = container_over(broken::catalog(), ContainerConfig::isolated());
    let err = container.auto_register("broken").unwrap_err();
    assert!(matches!(err, ContainerError::NoConstructor { .. }));
    assert!(err.names_type(std::any::type_name::<broken::Hidden>()));
    assert!(!container.contains::<broken::Ledger>());
}

mod settings {
    use super::*;

    pub struct LedgerSettings {
        pub currency: String,
        pub owner: String,
    }

    impl Injectable for LedgerSettings {
        fn dependencies() -> Vec<TypeKey> {
            vec![TypeKey::of::<ApplicationProperties>()]
        }

        fn inject(resolver: &mut dyn Resolver) -> ContainerResult<Self> {
            let properties = resolve::<ApplicationProperties>(resolver)?;
            Ok(LedgerSettings {
                currency: properties.get("ledger.currency")?,
                owner: properties.get_or("ledger.owner", "nobody".to_string())?,
            })
        }
    }

    pub fn catalog() -> ComponentCatalog {
        let catalog = ComponentCatalog::new();
        catalog.register(ComponentDescriptor::component::<LedgerSettings>("settings").injectable::<LedgerSettings>());
        catalog
    }
}

#[test]
fn test_properties_are_injected_like_any_dependency() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[ledger]\ncurrency = \"EUR\"").unwrap();

    let options = PropertiesOptions::none().with_file(file.path(), true);
    let mut container = container_over(settings::catalog(), ContainerConfig::isolated().with_properties(options));
    container.auto_register("settings").unwrap();

    let settings = container.get_instance::<settings::LedgerSettings>().unwrap();
    assert_eq!(settings.currency, "EUR");
    assert_eq!(settings.owner, "nobody");
    assert!(container.contains::<ApplicationProperties>());
}

#[test]
fn test_missing_required_properties_file_aborts() {
    let options = PropertiesOptions::none().with_file("does/not/exist.toml", true);
    let mut container = container_over(settings::catalog(), ContainerConfig::isolated().with_properties(options));
    let err = container.auto_register("settings").unwrap_err();
    assert!(matches!(err, ContainerError::Properties { .. }));
}

#[test]
fn test_preregistered_properties_are_kept() {
    let mut container = container_over(settings::catalog(), ContainerConfig::default());
    let properties = ApplicationProperties::from_toml_str("[ledger]\ncurrency = \"JPY\"\nowner = \"kim\"").unwrap();
    container.register_instance(properties).unwrap();
    container.auto_register("settings").unwrap();

    let settings = container.get_instance::<settings::LedgerSettings>().unwrap();
    assert_eq!(settings.currency, "JPY");
    assert_eq!(settings.owner, "kim");
}
