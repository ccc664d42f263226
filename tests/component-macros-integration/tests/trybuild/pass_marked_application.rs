use component_macros::{component, configuration, factories};
use di_impl::{Container, ContainerConfig};
use std::sync::Arc;

pub trait Greeting: Send + Sync {
    fn text(&self) -> String;
}

pub struct Salutation(String);

#[configuration]
pub struct GreetingConfig;

#[factories]
impl GreetingConfig {
    #[factory]
    fn salutation(&self) -> Salutation {
        Salutation("hello".to_string())
    }
}

#[component(provides(dyn Greeting))]
pub struct Greeter {
    salutation: Arc<Salutation>,
}

impl Greeting for Greeter {
    fn text(&self) -> String {
        format!("{}, world", self.salutation.0)
    }
}

fn main() {
    let mut container = Container::with_config(ContainerConfig::isolated());
    container.auto_register(module_path!()).unwrap();
    let greeting = container.get_instance::<dyn Greeting>().unwrap();
    assert_eq!(greeting.text(), "hello, world");
}
