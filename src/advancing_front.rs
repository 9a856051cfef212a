use std::fmt;

use num_traits::real::Real;

use crate::{errors::InternalError, idx::{Idx, IdxDisplay, VecExt}, sweep_context::PointId, triangle::TriangleId};

pub(crate) type NodeId<C> = Idx<Node<C>>;

/// One point of the advancing front
#[derive(Debug, Clone)]
pub(crate) struct Node<C: Real> {
    point: PointId<C>,
    value: C,
    triangle: Option<TriangleId<C>>,
    prev: Option<NodeId<C>>,
    next: Option<NodeId<C>>,
}

impl<C: Real> IdxDisplay for Node<C> {
    fn fmt(f: &mut fmt::Formatter<'_>, idx: usize) -> fmt::Result {
        write!(f, "n{}", idx)
    }
}

impl<C: Real> Node<C> {
    fn new(point: PointId<C>, value: C, triangle: Option<TriangleId<C>>) -> Self {
        Self {
            point,
            value,
            triangle,
            prev: None,
            next: None,
        }
    }
}

/// The upper boundary of the region triangulated so far, as a linked list of [Node]s ordered by x.
///
/// Nodes live in an arena and are only unlinked, never reused, so a removed node keeps its
/// `prev`/`next` links and can still be used to step to its former neighbors.
///
/// Lookups walk the list from the last result. The sweep visits points in y order, so
/// consecutive lookups are usually close together, but a lookup is O(n) in the worst case.
#[derive(Debug)]
pub(crate) struct AdvancingFront<C: Real> {
    nodes: Vec<Node<C>>,
    head: NodeId<C>,
    tail: NodeId<C>,
    search_node: NodeId<C>,
}

impl<C: Real> AdvancingFront<C> {
    /// Creates the front `head -> middle -> tail` over the initial triangle
    pub fn new(head: (PointId<C>, C), middle: (PointId<C>, C), tail: (PointId<C>, C), triangle: TriangleId<C>, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(3));
        let hi = nodes.push_get_index(Node::new(head.0, head.1, Some(triangle)));
        let mi = nodes.push_get_index(Node::new(middle.0, middle.1, Some(triangle)));
        let ti = nodes.push_get_index(Node::new(tail.0, tail.1, None));
        nodes[hi].next = Some(mi);
        nodes[mi].prev = Some(hi);
        nodes[mi].next = Some(ti);
        nodes[ti].prev = Some(mi);

        Self {
            nodes,
            head: hi,
            tail: ti,
            search_node: hi,
        }
    }

    pub fn head(&self) -> NodeId<C> { self.head }
    pub fn tail(&self) -> NodeId<C> { self.tail }

    pub fn next(&self, ni: NodeId<C>) -> Option<NodeId<C>> { self.nodes[ni].next }
    pub fn prev(&self, ni: NodeId<C>) -> Option<NodeId<C>> { self.nodes[ni].prev }
    pub fn point(&self, ni: NodeId<C>) -> PointId<C> { self.nodes[ni].point }
    pub fn triangle(&self, ni: NodeId<C>) -> Option<TriangleId<C>> { self.nodes[ni].triangle }

    pub fn set_triangle(&mut self, ni: NodeId<C>, ti: TriangleId<C>) {
        self.nodes[ni].triangle = Some(ti);
    }

    pub fn expect_next(&self, ni: NodeId<C>) -> Result<NodeId<C>, InternalError> {
        self.next(ni).ok_or_else(|| InternalError::new(format!("{} has no next node", ni)))
    }

    pub fn expect_prev(&self, ni: NodeId<C>) -> Result<NodeId<C>, InternalError> {
        self.prev(ni).ok_or_else(|| InternalError::new(format!("{} has no previous node", ni)))
    }

    /// Iterates the linked nodes from head to tail
    pub fn iter(&self) -> FrontIter<'_, C> {
        FrontIter { front: self, current: Some(self.head) }
    }

    /// Finds the node whose segment `[node, node.next)` contains `x`
    pub fn locate_node(&mut self, x: C) -> Option<NodeId<C>> {
        let mut ni = self.search_node;
        if x < self.nodes[ni].value {
            while let Some(prev) = self.nodes[ni].prev {
                ni = prev;
                if x >= self.nodes[ni].value {
                    self.search_node = ni;
                    return Some(ni);
                }
            }
        } else {
            while let Some(next) = self.nodes[ni].next {
                if x < self.nodes[next].value {
                    self.search_node = ni;
                    return Some(ni);
                }
                ni = next;
            }
        }
        None
    }

    /// Finds the node holding `point`, whose x coordinate is `x`
    pub fn locate_point(&mut self, point: PointId<C>, x: C) -> Option<NodeId<C>> {
        let start = self.search_node;
        let nx = self.nodes[start].value;

        let found = if x == nx {
            if self.nodes[start].point == point {
                Some(start)
            } else if self.nodes[start].prev.map_or(false, |prev| self.nodes[prev].point == point) {
                self.nodes[start].prev
            } else if self.nodes[start].next.map_or(false, |next| self.nodes[next].point == point) {
                self.nodes[start].next
            } else {
                // Several nodes can share an x value, so the neighbors are not necessarily enough
                self.scan(start, point, |n| n.prev).or_else(|| self.scan(start, point, |n| n.next))
            }
        } else if x < nx {
            self.scan(start, point, |n| n.prev)
        } else {
            self.scan(start, point, |n| n.next)
        };

        if let Some(ni) = found {
            self.search_node = ni;
        }
        found
    }

    fn scan(&self, start: NodeId<C>, point: PointId<C>, step: impl Fn(&Node<C>) -> Option<NodeId<C>>) -> Option<NodeId<C>> {
        let mut current = step(&self.nodes[start]);
        while let Some(ni) = current {
            if self.nodes[ni].point == point {
                return Some(ni);
            }
            current = step(&self.nodes[ni]);
        }
        None
    }

    /// Links a new node for `point` directly after `ni`
    pub fn insert_after(&mut self, ni: NodeId<C>, point: PointId<C>, x: C) -> Result<NodeId<C>, InternalError> {
        let next = self.expect_next(ni)?;
        let new = self.nodes.push_get_index(Node::new(point, x, None));
        self.nodes[new].prev = Some(ni);
        self.nodes[new].next = Some(next);
        self.nodes[next].prev = Some(new);
        self.nodes[ni].next = Some(new);
        Ok(new)
    }

    /// Unlinks `ni` from the front. The head and tail cannot be removed.
    pub fn remove(&mut self, ni: NodeId<C>) -> Result<(), InternalError> {
        let prev = self.expect_prev(ni)?;
        let next = self.expect_next(ni)?;
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
        if self.search_node == ni {
            self.search_node = prev;
        }
        Ok(())
    }
}

pub(crate) struct FrontIter<'a, C: Real> {
    front: &'a AdvancingFront<C>,
    current: Option<NodeId<C>>,
}

impl<'a, C: Real> Iterator for FrontIter<'a, C> {
    type Item = NodeId<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let ni = self.current?;
        self.current = self.front.nodes[ni].next;
        Some(ni)
    }
}
