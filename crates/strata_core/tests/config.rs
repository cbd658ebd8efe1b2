//! Integration tests for building managers from TOML configuration.

use bytemuck::{Pod, Zeroable};
use strata_core::{
    Arena, Component, ComponentTypeId, ConfigError, EcsConfig, EntityManagerBuilder,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct Position {
    x: f32,
    y: f32,
}

impl Component for Position {
    const ID: ComponentTypeId = ComponentTypeId::new(0);
    const NAME: &'static str = "position";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct Health(u32);

impl Component for Health {
    const ID: ComponentTypeId = ComponentTypeId::new(1);
    const NAME: &'static str = "health";
    const DEFAULT_CAPACITY: u32 = 64;
}

const CONFIG: &str = r#"
max_entities = 256

[components]
health = 2
"#;

fn builder(config: &EcsConfig) -> EntityManagerBuilder {
    EntityManagerBuilder::from_config(config)
        .register::<Position>()
        .register::<Health>()
}

#[test]
fn test_config_sizes_tables() {
    let config = EcsConfig::from_toml_str(CONFIG).unwrap();
    let mut manager = builder(&config).build().unwrap();

    assert_eq!(manager.capacity(), 256);
    assert_eq!(manager.component_capacity(Position::ID), Position::DEFAULT_CAPACITY);
    assert_eq!(manager.component_capacity(Health::ID), 2);

    let ids: Vec<_> = (0..3).map(|_| manager.create_entity().unwrap()).collect();
    manager.add_component(ids[0], Health(1)).unwrap();
    manager.add_component(ids[1], Health(2)).unwrap();
    assert!(manager.add_component(ids[2], Health(3)).is_err());
}

#[test]
fn test_shared_arena_holds_manager() {
    let config = EcsConfig::from_toml_str(CONFIG).unwrap();
    let builder = builder(&config);
    let required = builder.required_bytes();

    let arena = Arena::new(required + 64);
    let manager = builder.build_in(&arena).unwrap();
    assert_eq!(arena.used(), required);
    assert_eq!(arena.remaining(), 64);
    assert!(manager.check_invariants().is_ok());
}

#[test]
fn test_malformed_config_is_parse_error() {
    let err = EcsConfig::from_toml_str("max_entities = \"lots\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let err = EcsConfig::from_toml_str("[components]\nhealth = 2").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_config_errors_surface_at_build() {
    let config = EcsConfig::from_toml_str("max_entities = 0").unwrap();
    assert_eq!(
        builder(&config).build().unwrap_err(),
        ConfigError::ZeroEntityCapacity
    );

    let config = EcsConfig::new(16).with_component("health", 0);
    assert_eq!(
        builder(&config).build().unwrap_err(),
        ConfigError::ZeroComponentCapacity("health")
    );

    let config = EcsConfig::new(16).with_component("mana", 8);
    assert_eq!(
        builder(&config).build().unwrap_err(),
        ConfigError::UnknownComponent("mana".to_owned())
    );
}
