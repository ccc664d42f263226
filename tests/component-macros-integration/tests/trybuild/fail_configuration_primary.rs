use component_macros::configuration;

#[configuration(primary)]
pub struct Settings;

fn main() {}
