// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ray hit to element resolution.
//!
//! Models are rendered as one merged mesh each, so a hit only carries the
//! model and a triangle index. The element is recovered through the
//! per-vertex express ID attribute of the first vertex of that triangle.

use crate::error::ResolutionError;
use crate::model::{ElementRef, GeometryBuffer, ModelId};

/// Nearest intersection of a picking ray, borrowed from the scene host
#[derive(Debug, Clone, Copy)]
pub struct RayHit<'a> {
    pub model_id: ModelId,
    pub geometry: &'a GeometryBuffer,
    /// Triangle index within `geometry`
    pub face_index: u32,
    /// Distance from the camera along the ray
    pub distance: f32,
}

/// Maps ray hits to building elements
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementResolver;

impl ElementResolver {
    /// Resolve the element owning the hit triangle
    pub fn resolve(hit: &RayHit<'_>) -> Result<ElementRef, ResolutionError> {
        let model_id = hit.model_id;
        let geometry = hit.geometry;

        let element_ids = geometry
            .element_ids()
            .ok_or(ResolutionError::NoElementIds { model_id })?;

        let out_of_bounds = || ResolutionError::FaceOutOfBounds {
            model_id,
            face_index: hit.face_index,
            face_count: geometry.face_count(),
        };

        // Last vertex slot of the face; out of range on overflow
        let last = (hit.face_index as usize)
            .checked_mul(3)
            .and_then(|first| first.checked_add(2))
            .ok_or_else(out_of_bounds)?;
        let first = last - 2;
        let vertex = match geometry.index() {
            Some(index) => {
                if last >= index.len() {
                    return Err(out_of_bounds());
                }
                index[first]
            }
            None => {
                if last >= element_ids.len() {
                    return Err(out_of_bounds());
                }
                first as u32
            }
        };

        element_ids
            .get(vertex as usize)
            .map(|&element_id| ElementRef::new(model_id, element_id))
            .ok_or(ResolutionError::VertexOutOfBounds { model_id, vertex })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(geometry: &GeometryBuffer, face_index: u32) -> RayHit<'_> {
        RayHit {
            model_id: 1,
            geometry,
            face_index,
            distance: 1.0,
        }
    }

    #[test]
    fn test_resolve_indexed() {
        // Two triangles, first belongs to #42, second to #7
        let geometry = GeometryBuffer::indexed(vec![0, 1, 2, 3, 4, 5], vec![42, 42, 42, 7, 7, 7]);

        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 0)),
            Ok(ElementRef::new(1, 42))
        );
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 1)),
            Ok(ElementRef::new(1, 7))
        );
    }

    #[test]
    fn test_resolve_uses_first_vertex_of_face() {
        let geometry = GeometryBuffer::indexed(vec![3, 0, 1], vec![10, 10, 10, 20]);
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 0)),
            Ok(ElementRef::new(1, 20))
        );
    }

    #[test]
    fn test_resolve_non_indexed() {
        let geometry = GeometryBuffer::non_indexed(vec![5, 5, 5, 9, 9, 9]);
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 1)),
            Ok(ElementRef::new(1, 9))
        );
    }

    #[test]
    fn test_face_out_of_bounds() {
        let geometry = GeometryBuffer::indexed(vec![0, 1, 2], vec![1, 1, 1]);
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 1)),
            Err(ResolutionError::FaceOutOfBounds {
                model_id: 1,
                face_index: 1,
                face_count: 1,
            })
        );

        let flat = GeometryBuffer::non_indexed(vec![1, 1]);
        assert!(matches!(
            ElementResolver::resolve(&hit(&flat, 0)),
            Err(ResolutionError::FaceOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_huge_face_index_out_of_bounds() {
        let geometry = GeometryBuffer::indexed(vec![0, 1, 2, 3, 4, 5], vec![42, 42, 42, 7, 7, 7]);
        for face_index in [0x5555_5556, u32::MAX] {
            assert_eq!(
                ElementResolver::resolve(&hit(&geometry, face_index)),
                Err(ResolutionError::FaceOutOfBounds {
                    model_id: 1,
                    face_index,
                    face_count: 2,
                })
            );
        }

        let flat = GeometryBuffer::non_indexed(vec![9, 9, 9]);
        assert!(matches!(
            ElementResolver::resolve(&hit(&flat, u32::MAX)),
            Err(ResolutionError::FaceOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_vertex_without_element_id() {
        let geometry = GeometryBuffer::indexed(vec![8, 0, 1], vec![1, 1, 1]);
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 0)),
            Err(ResolutionError::VertexOutOfBounds {
                model_id: 1,
                vertex: 8
            })
        );
    }

    #[test]
    fn test_stale_geometry() {
        let mut geometry = GeometryBuffer::indexed(vec![0, 1, 2], vec![1, 1, 1]);
        geometry.release_element_ids();
        assert_eq!(
            ElementResolver::resolve(&hit(&geometry, 0)),
            Err(ResolutionError::NoElementIds { model_id: 1 })
        );
    }
}
