use sparse_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Renderable {
    mesh: u32,
    material: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frozen;

fn spawn_mover(registry: &mut Registry, x: f32, vx: f32) -> EntityId {
    let e = registry.create_entity().unwrap();
    registry.add_component(e, Position { x, y: 0.0 }).unwrap();
    registry.add_component(e, Velocity { x: vx, y: 0.0 }).unwrap();
    e
}

#[test]
fn movement_pass_integrates_velocity() {
    let mut registry = Registry::new();
    let movers: Vec<EntityId> = (0..5)
        .map(|i| spawn_mover(&mut registry, i as f32, 1.0))
        .collect();

    let dt = 0.5;
    for (_, (pos, vel)) in registry.view::<(&mut Position, &Velocity)>() {
        pos.x += vel.x * dt;
        pos.y += vel.y * dt;
    }

    for (i, &e) in movers.iter().enumerate() {
        let pos = registry.get_component::<Position>(e).unwrap();
        assert_eq!(pos.x, i as f32 + 0.5);
    }
}

#[test]
fn rare_component_drives_wide_view() {
    let mut registry = Registry::new();
    for i in 0..100 {
        spawn_mover(&mut registry, i as f32, 0.0);
    }
    // Only two entities carry the rare component.
    let tagged: Vec<EntityId> = (0..2)
        .map(|_| {
            let e = spawn_mover(&mut registry, 0.0, 0.0);
            registry
                .add_component(e, Renderable { mesh: 1, material: 2 })
                .unwrap();
            e
        })
        .collect();

    let mut matched: Vec<EntityId> = registry
        .view::<(&Position, &Velocity, &Renderable)>()
        .map(|(id, _)| id)
        .collect();
    matched.sort();
    let mut expected = tagged;
    expected.sort();
    assert_eq!(matched, expected);
}

#[test]
fn view_order_is_stable_within_a_call_sequence() {
    let mut registry = Registry::new();
    for i in 0..10 {
        spawn_mover(&mut registry, i as f32, 0.0);
    }

    // Two passes with no structural mutation in between see the same order.
    let first: Vec<EntityId> = registry.view::<&Position>().map(|(id, _)| id).collect();
    let second: Vec<EntityId> = registry.view::<&Position>().map(|(id, _)| id).collect();
    assert_eq!(first, second);
}

#[test]
fn removal_changes_membership_not_correctness() {
    let mut registry = Registry::new();
    let movers: Vec<EntityId> = (0..6)
        .map(|i| spawn_mover(&mut registry, i as f32, 0.0))
        .collect();

    // Swap-remove reorders the dense array; the view must still yield
    // exactly the surviving set.
    registry.remove_component::<Velocity>(movers[0]);
    registry.remove_component::<Velocity>(movers[3]);

    let mut matched: Vec<EntityId> = registry
        .view::<(&Position, &Velocity)>()
        .map(|(id, _)| id)
        .collect();
    matched.sort();

    let mut expected: Vec<EntityId> = movers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != 0 && i != 3)
        .map(|(_, &e)| e)
        .collect();
    expected.sort();
    assert_eq!(matched, expected);
}

#[test]
fn four_way_view_intersects_all_stores() {
    let mut registry = Registry::new();

    let full = registry.create_entity().unwrap();
    registry.add_component(full, Position { x: 0.0, y: 0.0 }).unwrap();
    registry.add_component(full, Velocity { x: 0.0, y: 0.0 }).unwrap();
    registry
        .add_component(full, Renderable { mesh: 0, material: 0 })
        .unwrap();
    registry.add_component(full, Frozen).unwrap();

    let partial = registry.create_entity().unwrap();
    registry
        .add_component(partial, Position { x: 0.0, y: 0.0 })
        .unwrap();
    registry.add_component(partial, Frozen).unwrap();

    let matched: Vec<EntityId> = registry
        .view::<(&Position, &Velocity, &Renderable, &Frozen)>()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(matched, vec![full]);
}
