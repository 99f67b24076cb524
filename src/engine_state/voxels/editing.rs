//! # Editing Module
//!
//! Single-block edits driven by a ray from the viewer.
//!
//! A ray is walked in fixed increments along `-dir` (the camera's forward
//! basis vector points backwards) and the first solid cell it enters is the
//! target. Destroying empties the target; placing fills the cell across the
//! target face closest to where the ray came from. After either edit the
//! occlusion flags around the cell are patched and light is solved again, so
//! callers always observe a consistent world.

use cgmath::{MetricSpace, Point3, Vector3};
use log::{debug, warn};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::Block;
use super::lighting::LightSolver;
use super::neighbors;
use super::world::World;
use crate::config::Reach;
use crate::error::{WorldError, WorldResult};

/// A ray in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Where the walk starts.
    pub origin: Point3<f32>,
    /// The viewer's forward basis vector; the walk moves against it.
    pub dir: Vector3<f32>,
}

impl Ray {
    /// Creates a ray from `origin` along `dir`.
    pub fn new(origin: Point3<f32>, dir: Vector3<f32>) -> Self {
        Ray { origin, dir }
    }

    fn is_finite(&self) -> bool {
        [self.origin.x, self.origin.y, self.origin.z, self.dir.x, self.dir.y, self.dir.z]
            .iter()
            .all(|v| v.is_finite())
    }

    /// The positions visited by walking `reach.steps()` increments of
    /// `dir / accuracy` away from the origin, against `dir`.
    pub fn march(&self, reach: Reach) -> impl Iterator<Item = Point3<f32>> {
        let step = -self.dir / reach.accuracy as f32;
        let mut position = self.origin;
        (0..reach.steps()).map(move |_| {
            position += step;
            position
        })
    }
}

/// What an edit does to the cell a ray finds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Empty the first solid cell hit.
    Destroy,
    /// Fill the cell in front of the face that was hit.
    Place,
}

/// The cell an edit changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EditResult {
    /// World coordinate of the changed cell.
    pub position: Point3<i32>,
    /// What happened to it.
    pub mode: EditMode,
}

/// The first solid cell a ray walk entered.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hit {
    cell: Point3<i32>,
    /// The walk position one step before entering `cell`.
    before: Point3<f32>,
}

/// Walks `ray` and returns the first solid cell accepted by `accept`.
///
/// # Panics
/// Panics if the ray has a non-finite component.
fn first_hit<F>(world: &World, ray: &Ray, reach: Reach, accept: F) -> Option<Hit>
where
    F: Fn(Point3<i32>) -> bool,
{
    assert!(ray.is_finite(), "non-finite ray {ray:?}");
    let mut before = ray.origin;
    for position in ray.march(reach) {
        let cell = World::cell_of(position);
        if world.contains(cell) && accept(cell) {
            return Some(Hit { cell, before });
        }
        before = position;
    }
    None
}

/// The face of `cell` whose centre is closest to `from`. Ties go to the
/// face that comes first in `BlockSide::all()` order.
pub fn closest_face(cell: Point3<i32>, from: Point3<f32>) -> BlockSide {
    let centre = Point3::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5, cell.z as f32 + 0.5);
    let mut closest = BlockSide::FRONT;
    let mut closest_distance = f32::INFINITY;
    for side in BlockSide::all() {
        let normal = side.normal();
        let face_centre = centre + Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32) * 0.5;
        let distance = face_centre.distance(from);
        if distance < closest_distance {
            closest = side;
            closest_distance = distance;
        }
    }
    closest
}

/// Empties the first solid cell along the ray.
///
/// Bedrock is never removed: hitting it returns [`WorldError::Indestructible`]
/// and leaves the world untouched.
pub fn destroy(world: &mut World, solver: &LightSolver, ray: &Ray, reach: Reach) -> WorldResult<EditResult> {
    let hit = first_hit(world, ray, reach, |_| true).ok_or(WorldError::NoTargetInRange)?;
    let target = hit.cell;

    if world.block_type_at(target).is_some_and(BlockType::is_indestructible) {
        warn!("Refusing to destroy indestructible block at {target:?}");
        return Err(WorldError::Indestructible(target));
    }

    world.set(target, Block::air())?;
    neighbors::patch_edit(world, target);
    solver.solve(world);

    debug!("Destroyed block at {target:?}");
    Ok(EditResult {
        position: target,
        mode: EditMode::Destroy,
    })
}

/// Places a `block_type` block against the face of the first solid cell
/// along the ray that is closest to the ray's approach.
///
/// Cells on the top layer of the world are not valid targets; the walk
/// passes through them.
pub fn place(
    world: &mut World,
    solver: &LightSolver,
    ray: &Ray,
    reach: Reach,
    block_type: BlockType,
) -> WorldResult<EditResult> {
    let top = world.world_height() - 1;
    let hit = first_hit(world, ray, reach, |cell| cell.y != top).ok_or(WorldError::NoTargetInRange)?;

    let side = closest_face(hit.cell, hit.before);
    let target = hit.cell + side.normal();

    if !world.in_bounds(target) {
        warn!("Cannot place a block outside the world at {target:?}");
        return Err(WorldError::OutOfBounds(target));
    }
    if world.contains(target) {
        warn!("Cannot place a block at {target:?}, the cell is occupied");
        return Err(WorldError::Occupied(target));
    }

    world.set(target, Block::new(block_type))?;
    neighbors::patch_edit(world, target);
    solver.solve(world);

    debug!("Placed {block_type} at {target:?} against the {side:?} face of {:?}", hit.cell);
    Ok(EditResult {
        position: target,
        mode: EditMode::Place,
    })
}
