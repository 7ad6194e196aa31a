//! Serial implementation of BSP operations
//!
//! Every traversal uses an explicit work stack, so tree depth is bounded by
//! heap memory and not by the call stack.

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;

/// Serial implementation of BSP operations
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialBspOps<SP: SplittingPlaneStrategy = FirstPolygonStrategy> {
    splitting_strategy: SP,
}

impl SerialBspOps<FirstPolygonStrategy> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygonStrategy,
        }
    }
}

impl<SP: SplittingPlaneStrategy> SerialBspOps<SP> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
        }
    }
}

/// Partition `polygons` by `plane` for clipping: coplanar polygons travel
/// with the side their facing points to.
fn partition(plane: &Plane, polygons: &[Polygon]) -> (Vec<Polygon>, Vec<Polygon>) {
    let mut coplanar_front = Vec::new();
    let mut coplanar_back = Vec::new();
    let mut front = Vec::with_capacity(polygons.len());
    let mut back = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        plane.split_polygon(
            polygon,
            &mut coplanar_front,
            &mut coplanar_back,
            &mut front,
            &mut back,
        );
    }

    front.append(&mut coplanar_front);
    back.append(&mut coplanar_back);
    (front, back)
}

impl<SP: SplittingPlaneStrategy> BspOps for SerialBspOps<SP> {
    fn invert(&self, node: &mut Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn clip_polygons(&self, node: &Node, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            let Some(plane) = current.plane.as_ref() else {
                // empty tree, nothing to clip against
                result.extend(polygons);
                continue;
            };

            let (front, back) = partition(plane, &polygons);

            match current.front.as_deref() {
                Some(front_node) if !front.is_empty() => stack.push((front_node, front)),
                Some(_) => {},
                None => result.extend(front),
            }

            // behind a leaf means inside the solid
            if let Some(back_node) = current.back.as_deref() {
                if !back.is_empty() {
                    stack.push((back_node, back));
                }
            }
        }

        result
    }

    fn clip_to(&self, node: &mut Node, other: &Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            let polygons = std::mem::take(&mut current.polygons);
            current.polygons = self.clip_polygons(other, polygons);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn build(&self, node: &mut Node, polygons: Vec<Polygon>) {
        let mut stack = vec![(node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = *current
                .plane
                .get_or_insert_with(|| self.splitting_strategy.pick_best_splitting_plane(&polygons));

            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();

            for polygon in &polygons {
                plane.split_polygon(
                    polygon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }

            // both facings stay on the node
            current.polygons.append(&mut coplanar_front);
            current.polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                let front_node = current.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node.as_mut(), front));
            }
            if !back.is_empty() {
                let back_node = current.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node.as_mut(), back));
            }
        }
    }

    fn all_polygons(&self, node: &Node) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            // back first so the front subtree is emitted first
            if let Some(ref back) = current.back {
                stack.push(back.as_ref());
            }
            if let Some(ref front) = current.front {
                stack.push(front.as_ref());
            }
        }

        result
    }
}
