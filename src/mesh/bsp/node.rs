//! BSP tree node data structure

use crate::mesh::plane::{BACK, COPLANAR, Plane};
use crate::mesh::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
///
/// A node with no plane is empty: it is the tree of a solid with no
/// surface. Every other node owns its children exclusively, so trees
/// never share nodes; [`Clone`] is a deep copy. Cloning and dropping walk
/// the tree with a work stack, so deep trees are safe.
#[derive(Debug)]
pub struct Node {
    /// Divider plane for this node, `None` until the first polygon arrives.
    pub plane: Option<Plane>,

    /// Subtree in the *front* half‑space.
    pub front: Option<Box<Node>>,

    /// Subtree in the *back* half‑space.
    pub back: Option<Box<Node>>,

    /// Polygons that lie on `plane`, either facing.
    pub polygons: Vec<Polygon>,
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        let mut root = self.shallow_clone();
        {
            let mut stack = vec![(self, &mut root)];
            while let Some((source, target)) = stack.pop() {
                if let Some(front) = source.front.as_deref() {
                    let child = target.front.insert(Box::new(front.shallow_clone()));
                    stack.push((front, child.as_mut()));
                }
                if let Some(back) = source.back.as_deref() {
                    let child = target.back.insert(Box::new(back.shallow_clone()));
                    stack.push((back, child.as_mut()));
                }
            }
        }
        root
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = Vec::new();
        stack.extend(self.front.take());
        stack.extend(self.back.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.front.take());
            stack.extend(node.back.take());
        }
    }
}

impl Node {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// A single node holding only a divider plane and no polygons.
    pub const fn from_plane(plane: Plane) -> Self {
        Self {
            plane: Some(plane),
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Copy of this node's plane and polygons, without children.
    fn shallow_clone(&self) -> Self {
        Self {
            plane: self.plane,
            front: None,
            back: None,
            polygons: self.polygons.clone(),
        }
    }

    /// Total number of polygons in the subtree.
    pub fn num_polygons(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += node.polygons.len();
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }

    /// Total number of nodes in the subtree, this one included.
    pub fn num_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.front.as_deref());
            stack.extend(node.back.as_deref());
        }
        count
    }

    /// Move every polygon out of the tree, consuming it.
    pub fn into_polygons(self) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(mut node) = stack.pop() {
            result.append(&mut node.polygons);
            if let Some(back) = node.back.take() {
                stack.push(*back);
            }
            if let Some(front) = node.front.take() {
                stack.push(*front);
            }
        }
        result
    }
}

/// True when every polygon lies behind (or on) the plane of every other one,
/// i.e. the polygon set bounds a convex solid.
pub fn is_convex(polygons: &[Polygon]) -> bool {
    polygons.iter().enumerate().all(|(i, a)| {
        polygons
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || matches!(a.classify_side(b), BACK | COPLANAR))
    })
}
