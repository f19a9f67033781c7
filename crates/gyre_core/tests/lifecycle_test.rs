//! Integration tests for entity lifecycle, batched removal and dispatch.

use std::thread;

use bytemuck::{Pod, Zeroable};
use gyre_core::ecs::{Component, EntityId, Schedule, System, World};
use gyre_core::{EcsError, WorldConfig};

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct A(u32);
impl Component for A {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct B(u32);
impl Component for B {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
struct C(u32);
impl Component for C {}

fn spawn_ab(world: &mut World, count: u32) -> Vec<EntityId> {
    (0..count)
        .map(|i| world.create_entity((A(i), B(i * 10))).unwrap())
        .collect()
}

fn stored_a(world: &World, member: EntityId) -> Vec<u32> {
    let mask = world.archetype_of(member).unwrap();
    world
        .storage::<A>()
        .unwrap()
        .view(mask)
        .unwrap()
        .iter()
        .map(|a| a.0)
        .collect()
}

#[test]
fn test_deferred_removal_scenario() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 5);

    world.late_remove_entity(ids[1]).unwrap();
    world.late_remove_entity(ids[3]).unwrap();
    assert_eq!(world.flush_entity_operations(), 2);

    assert_eq!(stored_a(&world, ids[0]), vec![0, 2, 4]);
    let mask = world.archetype_of(ids[0]).unwrap();
    let b: Vec<u32> = world
        .storage::<B>()
        .unwrap()
        .view(mask)
        .unwrap()
        .iter()
        .map(|b| b.0)
        .collect();
    assert_eq!(b, vec![0, 20, 40]);

    for (position, &id) in [ids[0], ids[2], ids[4]].iter().enumerate() {
        assert_eq!(world.position_of(id), Ok(position));
    }
}

#[test]
fn test_flush_is_idempotent() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 6);
    world.late_remove_entity(ids[2]).unwrap();

    assert_eq!(world.flush_entity_operations(), 1);
    let snapshot = stored_a(&world, ids[0]);
    assert_eq!(world.flush_entity_operations(), 0);
    assert_eq!(stored_a(&world, ids[0]), snapshot);
    assert_eq!(world.len(), 5);
}

#[test]
fn test_round_trip_empties_groups() {
    let mut world = World::new();
    let ab = spawn_ab(&mut world, 40);
    let abc: Vec<_> = (0..25)
        .map(|i| world.create_entity((A(i), B(i), C(i))).unwrap())
        .collect();

    for &id in ab.iter().chain(abc.iter()) {
        world.late_remove_entity(id).unwrap();
    }
    assert_eq!(world.flush_entity_operations(), 65);

    assert!(world.is_empty());
    let storage = world.storage::<A>().unwrap();
    assert_eq!(storage.len(), 0);
    assert_eq!(storage.group_count(), 2);
    assert!(storage.groups().all(|(_, group)| group.is_empty()));
}

#[test]
fn test_batched_equals_sequential() {
    let mut batched = World::new();
    let mut sequential = World::new();
    let ids_batched = spawn_ab(&mut batched, 12);
    let ids_sequential = spawn_ab(&mut sequential, 12);
    let victims = [0, 3, 4, 7, 11];

    for &i in &victims {
        batched.late_remove_entity(ids_batched[i]).unwrap();
    }
    batched.flush_entity_operations();

    for &i in &victims {
        sequential.remove_entity(ids_sequential[i]).unwrap();
    }

    assert_eq!(
        stored_a(&batched, ids_batched[1]),
        stored_a(&sequential, ids_sequential[1])
    );
    assert_eq!(stored_a(&batched, ids_batched[1]), vec![1, 2, 5, 6, 8, 9, 10]);
}

#[test]
fn test_immediate_removal_between_queue_and_flush() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 5);

    world.late_remove_entity(ids[3]).unwrap();
    // Shifts the pending entity from position 3 to 2
    world.remove_entity(ids[1]).unwrap();
    world.flush_entity_operations();

    assert_eq!(stored_a(&world, ids[0]), vec![0, 2, 4]);
    assert_eq!(world.get::<A>(ids[4]), Ok(&A(4)));
}

#[test]
fn test_stale_handles_fail_fast() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 2);

    world.late_remove_entity(ids[0]).unwrap();
    assert_eq!(world.late_remove_entity(ids[0]), Err(EcsError::stale(ids[0])));
    assert_eq!(world.remove_entity(ids[0]), Err(EcsError::stale(ids[0])));
    assert!(matches!(world.get::<A>(ids[0]), Err(EcsError::StaleEntity { .. })));

    world.flush_entity_operations();
    let reused = world.create_entity((A(9), B(9))).unwrap();
    assert_eq!(reused.index(), ids[0].index());
    assert!(world.get::<A>(ids[0]).is_err());
    assert_eq!(world.get::<A>(reused), Ok(&A(9)));
}

#[test]
fn test_identity_column_cannot_be_overwritten() {
    let mut world = World::new();
    let ids: Vec<_> = (0..3).map(|i| world.create_entity((A(i),)).unwrap()).collect();

    let mut writes = 0;
    let result = world.for_each_chunk::<(EntityId,), _>(|_, (entities,)| {
        entities.fill(EntityId::NULL);
        writes += 1;
    });
    assert!(matches!(result, Err(EcsError::ReadOnlyComponent(_))));
    assert_eq!(writes, 0);
    assert!(matches!(
        world.get_mut::<EntityId>(ids[1]),
        Err(EcsError::ReadOnlyComponent(_))
    ));

    let mut stored = Vec::new();
    world
        .for_each_chunk_with_entities::<(A,), _>(|_, entities, _| stored.extend_from_slice(entities))
        .unwrap();
    assert_eq!(stored, ids);

    world.remove_entity(ids[0]).unwrap();
    assert_eq!(world.position_of(ids[2]), Ok(1));
    assert_eq!(world.get::<A>(ids[2]), Ok(&A(2)));
}

#[test]
fn test_removal_queue_across_threads() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 8);
    let queue = world.removal_queue();

    let workers: Vec<_> = ids
        .chunks(4)
        .map(|chunk| {
            let queue = queue.clone();
            let victims = vec![chunk[0], chunk[2]];
            thread::spawn(move || queue.extend(victims))
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
    // A duplicate request is skipped as stale
    queue.push(ids[0]);

    assert_eq!(world.flush_entity_operations(), 4);
    assert_eq!(stored_a(&world, ids[1]), vec![1, 3, 5, 7]);
    assert!(queue.is_empty());
}

#[test]
fn test_create_entity_default() {
    let mut world = World::new();
    let id = world.create_entity_default::<(A, C)>().unwrap();
    assert_eq!(world.get::<A>(id), Ok(&A(0)));
    assert_eq!(world.get::<C>(id), Ok(&C(0)));
    assert!(!world.contains::<B>(id));

    let bare = world.create_entity(()).unwrap();
    assert_eq!(world.archetype_of(bare).unwrap().len(), 1);
}

#[test]
fn test_chunks_bounded_by_config() {
    let config = WorldConfig::from_toml_str("initial_capacity = 2\nmax_chunk_size = 6").unwrap();
    let mut world = World::with_config(config).unwrap();
    world.create_entities((0..30).map(|i| (A(i), B(i)))).unwrap();

    let mut sizes = Vec::new();
    world
        .for_each_chunk::<(A, B), _>(|size, (a, b)| {
            assert_eq!(a.len(), size);
            assert_eq!(b.len(), size);
            assert!(a.iter().zip(b.iter()).all(|(a, b)| a.0 == b.0));
            sizes.push(size);
        })
        .unwrap();

    // Rounded down to a power of two
    assert!(sizes.iter().all(|&size| size <= 4));
    assert_eq!(sizes.iter().sum::<usize>(), 30);
}

#[test]
fn test_chunks_stay_aligned_across_wrapped_groups() {
    let mut world = World::new();
    // Alternating inserts into an earlier archetype rotate the later one
    let mut expected = 0;
    for i in 0..20 {
        world.create_entity((A(i), B(i))).unwrap();
        world.create_entity((A(100 + i), B(100 + i), C(i))).unwrap();
        expected += 2;
    }

    let mut seen = 0;
    world
        .for_each_chunk::<(A, B), _>(|size, (a, b)| {
            assert!(a.iter().zip(b.iter()).all(|(a, b)| a.0 == b.0));
            seen += size;
        })
        .unwrap();
    assert_eq!(seen, expected);
}

#[test]
fn test_query_unknown_type_is_empty() {
    #[derive(Clone, Copy, Default, Pod, Zeroable)]
    #[repr(C)]
    struct Unused(u8);
    impl Component for Unused {}

    let mut world = World::new();
    spawn_ab(&mut world, 3);
    let mut calls = 0;
    world.for_each_chunk::<(A, Unused), _>(|_, _| calls += 1).unwrap();
    assert_eq!(calls, 0);
}

struct Accumulate;

impl System for Accumulate {
    type Query = (A, B);

    fn update(&mut self, _delta_time: f64, _size: usize, (a, b): (&mut [A], &mut [B])) {
        for (a, b) in a.iter_mut().zip(b.iter()) {
            a.0 += b.0;
        }
    }
}

struct Scale {
    calls: usize,
}

impl System for Scale {
    type Query = (A,);

    fn update(&mut self, delta_time: f64, _size: usize, (a,): (&mut [A],)) {
        self.calls += 1;
        let factor = delta_time as u32;
        for a in a.iter_mut() {
            a.0 *= factor;
        }
    }
}

#[test]
fn test_schedule_runs_in_order() {
    let mut world = World::new();
    let ids = spawn_ab(&mut world, 3);

    let mut schedule = Schedule::new();
    schedule.add_system(Accumulate).add_system(Scale { calls: 0 });
    assert_eq!(schedule.len(), 2);
    schedule.run(&mut world, 2.0).unwrap();

    // (i + 10i) * 2
    assert_eq!(stored_a(&world, ids[0]), vec![0, 22, 44]);
}

#[test]
fn test_run_single_system() {
    let mut world = World::new();
    spawn_ab(&mut world, 4);
    world.create_entity((A(1),)).unwrap();

    let mut scale = Scale { calls: 0 };
    world.run_system(&mut scale, 3.0).unwrap();
    assert_eq!(scale.calls, 2);
}
