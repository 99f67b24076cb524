use block_world::config::{DESTROY_REACH, PLACE_REACH};
use block_world::engine_state::voxels::block::block_side::BlockSide;
use block_world::engine_state::voxels::block::block_type::BlockType;
use block_world::engine_state::voxels::block::Block;
use block_world::engine_state::voxels::editing::{self, EditMode, Ray};
use block_world::engine_state::voxels::lighting::LightSolver;
use block_world::engine_state::voxels::neighbors;
use block_world::{EngineState, World, WorldConfig, WorldError};
use cgmath::{Point2, Point3, Vector3};

/// A camera looking straight down has its forward basis vector pointing up.
fn down() -> Vector3<f32> {
    Vector3::new(0.0, 1.0, 0.0)
}

fn engine(seed: u64) -> EngineState {
    let mut config = WorldConfig::with_bounds(32, 16, 4);
    config.seed = Some(seed);
    EngineState::generate(config).unwrap()
}

/// A column whose highest block is grass, so nothing overhangs the edit.
fn grass_column(engine: &EngineState) -> (i32, i32, i32) {
    let world = engine.world();
    for x in 3..world.world_size() - 3 {
        for z in 3..world.world_size() - 3 {
            let top = world.column_top(x, z).unwrap();
            if world.block_type_at(Point3::new(x, top, z)) == Some(BlockType::GRASS) {
                return (x, top, z);
            }
        }
    }
    panic!("no grass column");
}

fn above(x: i32, y: i32, z: i32) -> Point3<f32> {
    Point3::new(x as f32 + 0.5, y as f32 + 2.5, z as f32 + 0.5)
}

#[test]
fn destroy_leaves_air_and_opens_neighbor_faces() {
    let mut engine = engine(4);
    let (x, top, z) = grass_column(&engine);
    let target = Point3::new(x, top, z);

    let result = engine.cast_and_edit(above(x, top, z), down(), EditMode::Destroy).unwrap();
    assert_eq!(result.position, target);

    let world = engine.world();
    assert!(world.get(target).unwrap().is_air());
    for side in BlockSide::all() {
        let neighbor = target + side.normal();
        if let Some(block) = world.get(neighbor).filter(|block| block.is_solid()) {
            if block.block_type() != BlockType::ORE {
                assert!(!block.is_occluded(side.opposite()), "{neighbor:?} still hides its {:?} face", side.opposite());
            }
        }
    }
}

#[test]
fn destroying_bedrock_changes_nothing() {
    let mut world = World::new(16, 4, 1);
    neighbors::update_neighbors(&mut world);
    let solver = LightSolver::default();
    solver.solve(&mut world);
    world.clear_all_stale();

    let before = world.snapshot();
    let ray = Ray::new(Point3::new(5.5, 2.5, 5.5), down());
    let result = editing::destroy(&mut world, &solver, &ray, DESTROY_REACH);

    assert_eq!(result, Err(WorldError::Indestructible(Point3::new(5, 0, 5))));
    let after = world.snapshot();
    assert_eq!(
        bytemuck::cast_slice::<Block, u8>(&before),
        bytemuck::cast_slice::<Block, u8>(&after)
    );
    assert!(world.stale_chunks().is_empty());
}

#[test]
fn place_then_destroy_restores_the_world() {
    let mut engine = engine(6);
    let (x, top, z) = grass_column(&engine);
    let before = engine.world().snapshot();
    let origin = above(x, top, z);

    let placed = engine.cast_and_edit(origin, down(), EditMode::Place).unwrap();
    assert_eq!(placed.position, Point3::new(x, top + 1, z));
    assert_eq!(engine.world().block_type_at(placed.position), Some(BlockType::BRICK));
    assert_ne!(before, engine.world().snapshot());

    let destroyed = engine.cast_and_edit(origin, down(), EditMode::Destroy).unwrap();
    assert_eq!(destroyed.position, placed.position);
    assert_eq!(before, engine.world().snapshot());
}

#[test]
fn place_then_destroy_next_to_ore_restores_the_world() {
    let mut world = World::new(16, 8, 3);
    let ore = Point3::new(8, 3, 9);
    world.set(ore, Block::sealed(BlockType::ORE)).unwrap();
    neighbors::update_neighbors(&mut world);
    let solver = LightSolver::default();
    solver.solve(&mut world);
    let before = world.snapshot();

    let ray = Ray::new(Point3::new(8.5, 5.5, 8.5), down());
    let placed = editing::place(&mut world, &solver, &ray, PLACE_REACH, BlockType::BRICK).unwrap();
    assert_eq!(placed.position, Point3::new(8, 3, 8));
    assert_eq!(world.get(ore).unwrap().occluded_sides(), [true; 6]);

    let destroyed = editing::destroy(&mut world, &solver, &ray, DESTROY_REACH).unwrap();
    assert_eq!(destroyed.position, placed.position);
    assert_eq!(world.get(ore).unwrap().occluded_sides(), [true; 6]);
    assert_eq!(before, world.snapshot());
}

#[test]
fn edits_mark_their_chunk_stale() {
    let mut engine = engine(8);
    for chunk in engine.stale_chunks() {
        engine.clear_stale(chunk);
    }

    let (x, top, z) = grass_column(&engine);
    engine.cast_and_edit(above(x, top, z), down(), EditMode::Place).unwrap();

    let home = World::chunk_position_of(Point3::new(x, top + 1, z));
    assert!(engine.is_chunk_geometry_stale(home));
    engine.clear_stale(home);
    assert!(!engine.is_chunk_geometry_stale(home));
}

#[test]
fn a_ray_into_the_sky_finds_nothing() {
    let mut engine = engine(9);
    let before = engine.world().snapshot();
    let result = engine.cast_and_edit(Point3::new(16.5, 14.5, 16.5), -down(), EditMode::Destroy);
    assert_eq!(result, Err(WorldError::NoTargetInRange));
    assert_eq!(before, engine.world().snapshot());
}

#[test]
fn placing_past_the_world_edge_is_rejected() {
    let mut world = World::new(16, 8, 3);
    neighbors::update_neighbors(&mut world);
    let solver = LightSolver::default();
    solver.solve(&mut world);

    // approach the x = 0 wall of the world from outside
    let ray = Ray::new(Point3::new(-0.9, 2.5, 4.5), Vector3::new(-1.0, 0.0, 0.0));
    let result = editing::place(&mut world, &solver, &ray, PLACE_REACH, BlockType::BRICK);
    assert_eq!(result, Err(WorldError::OutOfBounds(Point3::new(-1, 2, 4))));
}

#[test]
fn placing_on_the_top_layer_passes_through_it() {
    let mut world = World::new(16, 8, 4);
    let solver = LightSolver::default();
    world.set(Point3::new(4, 7, 4), Block::new(BlockType::STONE)).unwrap();
    neighbors::update_neighbors(&mut world);
    solver.solve(&mut world);

    let ray = Ray::new(Point3::new(4.5, 7.9, 4.5), down());
    let result = editing::place(&mut world, &solver, &ray, PLACE_REACH, BlockType::BRICK).unwrap();
    assert_eq!(result.position, Point3::new(4, 4, 4));
    assert_eq!(result.mode, EditMode::Place);
}

#[test]
#[should_panic]
fn non_finite_rays_are_rejected() {
    let mut engine = engine(1);
    let _ = engine.cast_and_edit(Point3::new(f32::NAN, 4.0, 4.0), down(), EditMode::Destroy);
}

#[test]
fn stale_chunk_query_is_keyed_by_chunk_position() {
    let engine = engine(2);
    assert!(engine.is_chunk_geometry_stale(Point2::new(1, 1)));
    assert!(!engine.is_chunk_geometry_stale(Point2::new(2, 0)));
}
