//! `Geometry`: a BSP tree built from a triangle mesh, with boolean operations,
//! plane cuts and export back to flat buffers.

use crate::aabb::Aabb;
use crate::errors::Result;
use crate::float_types::{Real, to_f32};
use crate::mesh::bsp::Node;
use crate::mesh::buffers::{BufferGeometry, MeshInput, PolygonGroup, RenderMesh};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::{Vertex, normal_matrix};
use crate::triangulated::Triangulated3D;
use hashbrown::HashMap;
use log::{debug, trace, warn};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::Arc;

/// A solid in world space, stored as a BSP tree of its boundary polygons.
///
/// Boolean operations and cuts never touch their operands; they clone the
/// trees and return a new `Geometry`. The `direct_*` variants are the
/// exception: they consume the other operand and rewrite `self` in place.
#[derive(Debug, Clone)]
pub struct Geometry {
    tree: Node,
    transform: Matrix4<Real>,
    max_id: u32,
    flipped: bool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::from_node(Node::new())
    }
}

impl Geometry {
    /// Build a geometry from a triangle mesh.
    ///
    /// `transform` is baked into the vertices. Triangle `i` is tagged with
    /// the provenance id `id + i`. With `flipped` set, the input winding is
    /// taken as reversed (e.g. after a mirroring transform) and every
    /// triangle is turned around so its front faces outward.
    ///
    /// Degenerate triangles are dropped. A singular transform is not an
    /// error: it is logged and its NaN normals are propagated.
    pub fn from_buffers(
        input: &MeshInput,
        transform: &Matrix4<Real>,
        id: u32,
        flipped: bool,
    ) -> Result<Geometry> {
        input.validate()?;

        let normal_transform = normal_matrix(transform);
        let determinant = transform.fixed_view::<3, 3>(0, 0).determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            warn!("singular transform (determinant {determinant}), normals will be NaN");
        }

        let triangle_count = input.triangle_count();
        let mut polygons = Vec::with_capacity(triangle_count);
        let mut dropped = 0usize;

        for i in 0..triangle_count {
            let corners = input.triangle(i);
            let mut vertices: Vec<Vertex> = corners
                .iter()
                .map(|&v| {
                    let [x, y, z] = input.position(v);
                    let [nx, ny, nz] = input.normal(v).unwrap_or([0.0; 3]);
                    let mut vertex = Vertex::from_components(x, y, z, nx, ny, nz);
                    vertex.transform(transform, &normal_transform);
                    vertex
                })
                .collect();
            if flipped {
                vertices.reverse();
            }

            let polygon_id = id.wrapping_add(i as u32);
            match Polygon::new(vertices, Some(polygon_id)) {
                Some(mut polygon) => {
                    if input.normals.is_none() {
                        let face_normal = polygon.plane.normal;
                        polygon.vertices.iter_mut().for_each(|v| v.normal = face_normal);
                    }
                    polygons.push(polygon);
                },
                None => {
                    dropped += 1;
                    trace!("dropping degenerate triangle {i} (id {polygon_id})");
                },
            }
        }

        debug!(
            "geometry {id}: {} polygons from {triangle_count} triangles ({dropped} degenerate)",
            polygons.len()
        );

        Ok(Geometry {
            tree: Node::from_polygons(polygons),
            transform: *transform,
            max_id: id.wrapping_add(triangle_count as u32),
            flipped,
        })
    }

    /// Wrap world-space polygons. `max_id` is one past the largest id found.
    pub fn from_polygons(polygons: Vec<Polygon>) -> Geometry {
        let max_id = next_free_id(&polygons);
        Geometry {
            max_id,
            ..Geometry::from_node(Node::from_polygons(polygons))
        }
    }

    /// Wrap an existing tree as is.
    pub fn from_node(tree: Node) -> Geometry {
        Geometry {
            tree,
            transform: Matrix4::identity(),
            max_id: 0,
            flipped: false,
        }
    }

    pub const fn tree(&self) -> &Node {
        &self.tree
    }

    /// Transform baked into the vertices at construction.
    pub const fn transform(&self) -> &Matrix4<Real> {
        &self.transform
    }

    /// The next provenance id after the ones used by this geometry.
    pub const fn max_id(&self) -> u32 {
        self.max_id
    }

    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// A result geometry carrying this one's bookkeeping.
    fn derive(&self, other_max_id: u32, tree: Node) -> Geometry {
        Geometry {
            tree,
            transform: self.transform,
            max_id: self.max_id.max(other_max_id),
            flipped: self.flipped,
        }
    }

    /// Rebuild a fresh tree from the polygon soup of `tree`, merging split
    /// fragments back together first.
    fn compressed(tree: Node) -> Node {
        let mut polygons = tree.into_polygons();
        let merged = Self::try_to_compress(&mut polygons);
        if merged > 0 {
            trace!("compress merged {merged} fragment pairs");
        }
        Node::from_polygons(polygons)
    }

    /// Return a new geometry covering the space in `self` or in `other`.
    pub fn union(&self, other: &Geometry) -> Geometry {
        debug!(
            "union: {} + {} polygons",
            self.tree.num_polygons(),
            other.tree.num_polygons()
        );
        let mut a = self.tree.clone();
        union_trees(&mut a, other.tree.clone());
        let tree = Self::compressed(a);
        debug!("union: {} polygons", tree.num_polygons());
        self.derive(other.max_id, tree)
    }

    /// Return a new geometry covering the space in both `self` and `other`.
    pub fn intersect(&self, other: &Geometry) -> Geometry {
        debug!(
            "intersect: {} & {} polygons",
            self.tree.num_polygons(),
            other.tree.num_polygons()
        );
        let mut a = self.tree.clone();
        intersect_trees(&mut a, other.tree.clone());
        let tree = Self::compressed(a);
        debug!("intersect: {} polygons", tree.num_polygons());
        self.derive(other.max_id, tree)
    }

    /// Return a new geometry covering the space in `self` but not in `other`.
    pub fn subtract(&self, other: &Geometry) -> Geometry {
        debug!(
            "subtract: {} - {} polygons",
            self.tree.num_polygons(),
            other.tree.num_polygons()
        );
        let mut a = self.tree.clone();
        subtract_trees(&mut a, other.tree.clone());
        let tree = Self::compressed(a);
        debug!("subtract: {} polygons", tree.num_polygons());
        self.derive(other.max_id, tree)
    }

    /// In-place union for convex operands: no copies, no compression and
    /// no rebuild of the result tree.
    ///
    /// Both solids must be convex; this is not checked (see
    /// [`Node::is_convex`]). Non-convex input gives a wrong surface, never a panic.
    pub fn direct_union(&mut self, other: Geometry) -> &mut Self {
        debug!("direct union: {} + {} polygons", self.tree.num_polygons(), other.tree.num_polygons());
        self.max_id = self.max_id.max(other.max_id);
        union_trees(&mut self.tree, other.tree);
        self
    }

    /// In-place intersection for convex operands, see [`direct_union`](Self::direct_union).
    pub fn direct_intersect(&mut self, other: Geometry) -> &mut Self {
        debug!("direct intersect: {} & {} polygons", self.tree.num_polygons(), other.tree.num_polygons());
        self.max_id = self.max_id.max(other.max_id);
        intersect_trees(&mut self.tree, other.tree);
        self
    }

    /// In-place subtraction for convex operands, see [`direct_union`](Self::direct_union).
    pub fn direct_subtract(&mut self, other: Geometry) -> &mut Self {
        debug!("direct subtract: {} - {} polygons", self.tree.num_polygons(), other.tree.num_polygons());
        self.max_id = self.max_id.max(other.max_id);
        subtract_trees(&mut self.tree, other.tree);
        self
    }

    /// Keep the part of `self` behind the root divider of `other`.
    ///
    /// Only that one plane is used, the rest of `other` is ignored. The cut
    /// is left open, no cap polygon is added. If `other` is empty the result
    /// is a copy of `self`.
    pub fn cut_from_plane(&self, other: &Geometry) -> Geometry {
        let Some(plane) = other.tree.plane else {
            return self.clone();
        };
        let polygons = self.tree.all_polygons();
        debug!("cut: {} polygons against {plane:?}", polygons.len());

        // solid side of the cutter is in front of the flipped plane
        let cutter = Node::from_plane(plane.flipped());
        let kept = cutter.clip_polygons(polygons);
        debug!("cut: {} polygons kept", kept.len());

        self.derive(other.max_id, Node::from_polygons(kept))
    }

    /// Scale every vertex in place by `(x, y, z)`.
    ///
    /// Polygon and divider planes are remapped so the tree stays valid;
    /// vertex normals are left alone, which is exact only for uniform
    /// scaling. An odd number of negative factors mirrors the solid, so
    /// vertex order is reversed to keep the winding outward.
    pub fn scale(&mut self, x: Real, y: Real, z: Real) -> &mut Self {
        let factors = Vector3::new(x, y, z);
        let mirrored = (x < 0.0) ^ (y < 0.0) ^ (z < 0.0);

        let mut stack = vec![&mut self.tree];
        while let Some(node) = stack.pop() {
            if let Some(ref mut plane) = node.plane {
                plane.scale(x, y, z);
            }
            for polygon in &mut node.polygons {
                for vertex in &mut polygon.vertices {
                    vertex.pos = Point3::from(vertex.pos.coords.component_mul(&factors));
                }
                if mirrored {
                    polygon.vertices.reverse();
                }
                polygon.plane.scale(x, y, z);
                polygon.forget_origin();
            }
            if let Some(ref mut front) = node.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = node.back {
                stack.push(back.as_mut());
            }
        }
        self
    }

    /// Merge split fragments back into the polygon they were cut from.
    ///
    /// Two polygons merge when they are the front and back halves of one
    /// split and face the same way; the merged polygon can then merge with
    /// its own sibling. Untagged polygons pass through. On return the list
    /// holds the untagged polygons followed by the tagged ones sorted by id.
    /// Returns the number of merges.
    pub fn try_to_compress(polygons: &mut Vec<Polygon>) -> usize {
        let mut untagged = Vec::new();
        let mut groups: HashMap<u32, Vec<Polygon>> = HashMap::new();
        for polygon in polygons.drain(..) {
            match polygon.id {
                Some(id) => groups.entry(id).or_default().push(polygon),
                None => untagged.push(polygon),
            }
        }

        let mut merges = 0;
        for group in groups.values_mut() {
            merges += merge_siblings(group);
        }

        let mut ids: Vec<u32> = groups.keys().copied().collect();
        ids.sort_unstable();

        polygons.append(&mut untagged);
        for id in ids {
            if let Some(mut group) = groups.remove(&id) {
                polygons.append(&mut group);
            }
        }
        merges
    }

    /// All boundary polygons, node first then front then back subtree.
    pub fn to_polygons(&self) -> Vec<Polygon> {
        self.tree.all_polygons()
    }

    /// Flatten into non-indexed triangle buffers, one fan per polygon.
    pub fn to_buffer_geometry(&self) -> BufferGeometry {
        let polygons = self.tree.all_polygons();
        let triangles: usize = polygons.iter().map(|p| p.vertices.len().saturating_sub(2)).sum();

        let mut buffers = BufferGeometry {
            positions: Vec::with_capacity(triangles * 9),
            normals: Vec::with_capacity(triangles * 9),
            groups: Vec::with_capacity(polygons.len()),
        };

        for polygon in &polygons {
            let start = buffers.vertex_count();
            polygon.visit_triangles(|triangle| {
                for vertex in &triangle {
                    buffers
                        .positions
                        .extend(vertex.pos.iter().map(|&c| to_f32(c)));
                    buffers
                        .normals
                        .extend(vertex.normal.iter().map(|&c| to_f32(c)));
                }
            });
            buffers.groups.push(PolygonGroup {
                start,
                count: buffers.vertex_count() - start,
                id: polygon.id,
            });
        }
        buffers
    }

    /// Buffers paired with a caller material.
    pub fn to_mesh<M>(&self, material: M) -> RenderMesh<M> {
        RenderMesh {
            geometry: self.to_buffer_geometry(),
            material,
        }
    }

    /// The complement solid: every polygon and divider flipped.
    pub fn inverse(&self) -> Geometry {
        let mut result = self.clone();
        result.tree.invert();
        result
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut bb = Aabb::empty();
        for polygon in self.tree.all_polygons() {
            bb.merge(&polygon.bounding_box());
        }
        bb
    }
}

/// `a ∪ b`, result left in `a`.
fn union_trees(a: &mut Node, mut b: Node) {
    a.clip_to(&b);
    b.clip_to(a);
    b.invert();
    b.clip_to(a);
    b.invert();
    a.build(b.into_polygons());
}

/// `a ∩ b`, result left in `a`.
fn intersect_trees(a: &mut Node, mut b: Node) {
    a.invert();
    b.clip_to(a);
    b.invert();
    a.clip_to(&b);
    b.clip_to(a);
    a.build(b.into_polygons());
    a.invert();
}

/// `a − b`, result left in `a`.
fn subtract_trees(a: &mut Node, mut b: Node) {
    a.invert();
    a.clip_to(&b);
    b.clip_to(a);
    b.invert();
    b.clip_to(a);
    b.invert();
    a.build(b.into_polygons());
    a.invert();
}

fn next_free_id(polygons: &[Polygon]) -> u32 {
    polygons
        .iter()
        .filter_map(|p| p.id)
        .max()
        .map_or(0, |id| id.saturating_add(1))
}

/// Replace sibling pairs in `group` with their parent until none are left.
///
/// Unpaired fragments wait in `slots`, indexed by the address of their shared
/// parent snapshot, so each merge is found in constant time. A merged parent
/// goes back on the work list since it may pair with its own sibling.
fn merge_siblings(group: &mut Vec<Polygon>) -> usize {
    let mut merges = 0;
    let mut slots: Vec<Option<Polygon>> = Vec::with_capacity(group.len());
    let mut waiting: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut work = std::mem::take(group);
    work.reverse();

    while let Some(polygon) = work.pop() {
        let Some(origin) = &polygon.origin else {
            slots.push(Some(polygon));
            continue;
        };
        let candidates = waiting
            .entry(Arc::as_ptr(&origin.parent) as usize)
            .or_default();

        let partner = candidates.iter().position(|&slot| {
            slots[slot].as_ref().is_some_and(|other| {
                other.origin.as_ref().is_some_and(|o| o.is_sibling_of(origin))
                    && other.plane.normal.dot(&polygon.plane.normal) > 0.0
            })
        });
        let Some(index) = partner else {
            candidates.push(slots.len());
            slots.push(Some(polygon));
            continue;
        };
        let slot = candidates.swap_remove(index);
        slots[slot] = None;

        let mut parent = (*origin.parent).clone();
        if parent.plane.normal.dot(&polygon.plane.normal) < 0.0 {
            parent.flip();
        }
        trace!("merging fragments of polygon {:?}", parent.id);
        merges += 1;
        work.push(parent);
    }

    *group = slots.into_iter().flatten().collect();
    merges
}
