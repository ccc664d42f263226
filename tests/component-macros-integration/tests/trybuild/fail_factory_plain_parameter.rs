use component_macros::factories;

pub struct Plain;

#[factories]
impl Plain {
    #[factory]
    fn make(&self, count: u32) -> String {
        count.to_string()
    }
}

fn main() {
    let _ = Plain;
}
