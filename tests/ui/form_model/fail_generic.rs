#[derive(formwire::FormModel)]
struct Ranged<T> {
    value: T,
}

fn main() {}
