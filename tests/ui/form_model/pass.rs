use formwire::{EntityMap, FieldValue, FormModel};

#[derive(Clone, Debug, PartialEq, FormModel)]
struct Profile {
    name: String,
    age: i64,
    newsletter: bool,
    nickname: Option<String>,
}

fn main() {
    let fields = Profile::fields();
    assert_eq!(fields.name().as_str(), "name");
    assert_eq!(fields.newsletter().as_str(), "newsletter");

    let mut entity = EntityMap::new();
    entity.insert(fields.name(), FieldValue::Str("Ada".to_string()));
    entity.insert(fields.age(), FieldValue::Int(36));
    entity.insert(fields.newsletter(), FieldValue::Bool(true));
    let profile = Profile::from_entity(&entity).unwrap();
    assert_eq!(
        profile,
        Profile {
            name: "Ada".to_string(),
            age: 36,
            newsletter: true,
            nickname: None,
        }
    );
}
