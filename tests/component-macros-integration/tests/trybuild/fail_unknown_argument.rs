use component_macros::component;

#[component(transient)]
pub struct Session;

fn main() {}
