#[derive(formwire::FormModel)]
struct Point(i64, i64);

fn main() {}
