// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame visibility collection.
//!
//! Read-only over the scene snapshot: intersects every renderable's cached
//! world-space bounding box with the view frustum and records the
//! survivors, in snapshot order, with everything downstream stages need
//! (transform range, bounding-box index, mesh draw range). An empty result
//! is not an error; the lane answers it with a degenerate frame.

use mica_core::gpu::{DrawRange, MeshRegistry};
use mica_core::math::Frustum;

use super::world::RenderWorld;

/// One renderable that survived frustum culling this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleInstance {
    /// Index of the source renderable in the snapshot.
    pub renderable: u32,
    /// Index of the first transform in the cached transform pool.
    pub transform_index: u32,
    /// Number of consecutive transforms (1, or the joint count when skinned).
    pub transform_count: u32,
    /// Index of the cached world-space bounding box.
    pub aabb_index: u32,
    /// The mesh's meshlet-group slot range from the registry.
    pub draw_range: DrawRange,
}

/// The reusable list of visible instances for one frame.
///
/// Cleared and refilled each frame; the backing storage is kept.
#[derive(Debug, Default)]
pub struct VisibilityList {
    items: Vec<VisibleInstance>,
}

impl VisibilityList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the list without releasing storage.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Appends an instance. Normally only [`collect`] does this; exposed so
    /// callers with their own visibility source can feed the lane directly.
    pub fn push(&mut self, item: VisibleInstance) {
        self.items.push(item);
    }

    /// The visible instances, in snapshot order.
    pub fn items(&self) -> &[VisibleInstance] {
        &self.items
    }

    /// Whether nothing survived culling.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The number of visible instances.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Collects the renderables whose bounding box intersects `frustum`.
///
/// Ordering is the snapshot's iteration order; no additional sort is
/// imposed. Renderables whose mesh the registry has not made resident are
/// skipped.
pub fn collect(
    frustum: &Frustum,
    world: &RenderWorld,
    registry: &dyn MeshRegistry,
    list: &mut VisibilityList,
) {
    for (index, renderable) in world.renderables().iter().enumerate() {
        let meshlet = renderable.meshlet();
        let aabb = match world.aabbs().get(meshlet.aabb_index as usize) {
            Some(packed) => packed.to_aabb(),
            None => {
                log::warn!(
                    "Visibility: renderable {index} references missing AABB {}.",
                    meshlet.aabb_index
                );
                continue;
            }
        };
        if !frustum.intersects_aabb(&aabb) {
            continue;
        }
        let Some(draw_range) = registry.draw_range(meshlet.mesh) else {
            log::debug!(
                "Visibility: mesh {:?} not resident, skipping renderable {index}.",
                meshlet.mesh
            );
            continue;
        };
        list.items.push(VisibleInstance {
            renderable: index as u32,
            transform_index: meshlet.transform_index,
            transform_count: renderable.transform_count(),
            aabb_index: meshlet.aabb_index,
            draw_range,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshlet_lane::world::{MeshletRenderable, Renderable};
    use mica_core::gpu::{
        ConventionalBuffers, MeshEncoding, MeshHandle, MeshletBuffers, MeshStyle,
    };
    use mica_core::math::{Aabb, Mat4, Vec3};

    struct FixedRegistry {
        range: DrawRange,
    }

    impl MeshRegistry for FixedRegistry {
        fn draw_range(&self, mesh: MeshHandle) -> Option<DrawRange> {
            // Mesh 99 plays the not-yet-resident role.
            (mesh.0 != 99).then_some(self.range)
        }

        fn style(&self, _mesh: MeshHandle) -> MeshStyle {
            MeshStyle::Textured
        }

        fn encoding(&self) -> MeshEncoding {
            MeshEncoding::Conventional
        }

        fn meshlet_buffers(&self) -> Option<MeshletBuffers> {
            None
        }

        fn conventional_buffers(&self) -> Option<ConventionalBuffers> {
            None
        }
    }

    fn test_frustum() -> Frustum {
        let proj = Mat4::perspective_rh_zo(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y).unwrap();
        Frustum::from_view_projection(&(proj * view))
    }

    fn world_with_boxes(centers: &[Vec3]) -> RenderWorld {
        let mut world = RenderWorld::new();
        for (i, center) in centers.iter().enumerate() {
            let transform_index = world.push_transforms(&[Mat4::from_translation(*center)]);
            let aabb_index =
                world.push_aabb(Aabb::from_center_half_extents(*center, Vec3::ONE));
            world.push_renderable(Renderable::Mesh(MeshletRenderable {
                mesh: MeshHandle(i as u32),
                aabb_index,
                transform_index,
            }));
        }
        world
    }

    #[test]
    fn empty_world_yields_empty_list() {
        let registry = FixedRegistry {
            range: DrawRange { offset: 0, count: 4 },
        };
        let mut list = VisibilityList::new();
        collect(
            &test_frustum(),
            &RenderWorld::new(),
            &registry,
            &mut list,
        );
        assert!(list.is_empty());
    }

    #[test]
    fn culls_boxes_behind_the_camera_and_keeps_snapshot_order() {
        let registry = FixedRegistry {
            range: DrawRange { offset: 0, count: 4 },
        };
        let world = world_with_boxes(&[
            Vec3::new(0.0, 0.0, 0.0),   // visible
            Vec3::new(0.0, 0.0, 50.0),  // behind the camera
            Vec3::new(2.0, 0.0, -5.0),  // visible
        ]);
        let mut list = VisibilityList::new();
        collect(&test_frustum(), &world, &registry, &mut list);

        let visible: Vec<u32> = list.items().iter().map(|v| v.renderable).collect();
        assert_eq!(visible, vec![0, 2]);
    }

    #[test]
    fn skips_non_resident_meshes() {
        let registry = FixedRegistry {
            range: DrawRange { offset: 0, count: 4 },
        };
        let mut world = RenderWorld::new();
        let transform_index = world.push_transforms(&[Mat4::IDENTITY]);
        let aabb_index = world.push_aabb(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE));
        world.push_renderable(Renderable::Mesh(MeshletRenderable {
            mesh: MeshHandle(99),
            aabb_index,
            transform_index,
        }));

        let mut list = VisibilityList::new();
        collect(&test_frustum(), &world, &registry, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn skinned_instances_carry_their_joint_count() {
        let registry = FixedRegistry {
            range: DrawRange { offset: 0, count: 4 },
        };
        let mut world = RenderWorld::new();
        let joints = [Mat4::IDENTITY; 8];
        let transform_index = world.push_transforms(&joints);
        let aabb_index = world.push_aabb(Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE));
        world.push_renderable(Renderable::SkinnedMesh {
            mesh: MeshletRenderable {
                mesh: MeshHandle(0),
                aabb_index,
                transform_index,
            },
            joint_count: 8,
        });

        let mut list = VisibilityList::new();
        collect(&test_frustum(), &world, &registry, &mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list.items()[0].transform_count, 8);
    }
}
