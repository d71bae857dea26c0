#[derive(formwire::FormModel)]
enum Shape {
    Circle,
    Square,
}

fn main() {}
