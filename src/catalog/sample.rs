use super::Entity;

pub fn sample_entities() -> Vec<Entity> {
    vec![
        Entity::new("Data Asset 1", "Description for Data Asset 1"),
        Entity::new("Data Asset 2", "Description for Data Asset 2").using(["Data Asset 1"]),
        Entity::new("Data Asset 3", "Description for Data Asset 3")
            .using(["Data Asset 1", "Data Asset 2"]),
        Entity::new("Data Asset 4", "Description for Data Asset 4"),
        Entity::new("Data Asset 5", "Description for Data Asset 5").using(["Data Asset 3"]),
    ]
}
