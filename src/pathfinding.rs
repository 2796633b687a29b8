//! Dijkstra's and A* pathfinding on top of the indexed priority queue
//!
//! The open set is a min-[`PriorityQueue`] keyed by [`PriorityCost`]. When a
//! cheaper route to a queued node is found, its entry is improved in place
//! with [`PriorityQueue::update_key`] instead of pushing a duplicate, so the
//! open set never holds more than one entry per node.
//!
//! # Design
//!
//! For performance, only lightweight indices are stored in the queue rather
//! than full node data. A fast hash map (using FxHash) maps node states to
//! their index; per-node metadata lives in a vector.
//!
//! Dijkstra is A* with h(n) = 0.
//!
//! # Example
//!
//! ```rust
//! use rust_indexed_heaps::pathfinding::{astar, AStarNode, SearchNode};
//!
//! // Floors of a building: stairs move one floor, the lift skips four
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct Floor { level: u8, target: u8 }
//!
//! impl SearchNode for Floor {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, u32)> {
//!         let at = |level| Floor { level, target: self.target };
//!         let mut out = vec![(at(self.level + 1), 3)];
//!         if self.level > 0 {
//!             out.push((at(self.level - 1), 3));
//!         }
//!         out.push((at(self.level + 4), 5));
//!         out
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.level == self.target
//!     }
//! }
//!
//! impl AStarNode for Floor {
//!     // no move costs less than one per floor
//!     fn heuristic(&self) -> u32 {
//!         u32::from(self.level.abs_diff(self.target))
//!     }
//! }
//!
//! let (path, cost) = astar(&Floor { level: 0, target: 9 }).unwrap();
//! assert_eq!(cost, 13); // lift, lift, stairs
//! assert_eq!(path.len(), 4);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

use log::debug;
use rustc_hash::FxHashMap;

use crate::arity::{Arity, Binary, KAry};
use crate::priority_queue::{PriorityQueue, QueueBuilder};

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// This requires the type to be orderable, copyable, and support addition.
/// `Default` must be the zero cost.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
///
/// The node carries all context needed to generate successors and to decide
/// whether it is a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must be admissible (never overestimate the true cost)
/// for A* to find optimal paths.
pub trait AStarNode: SearchNode {
    /// Returns a heuristic estimate of the cost from this node to any goal.
    fn heuristic(&self) -> Self::Cost;
}

/// Open-set key that orders by f-score.
///
/// Lower f-scores are popped first.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// The f-score: g + h (where h=0 for Dijkstra)
    pub f_score: C,
    /// The actual cost from start (g-score)
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Internal index type; the queue holds these instead of full node data.
type NodeIndex = usize;

/// Metadata stored for each discovered node during search.
struct NodeEntry<N: SearchNode> {
    node: N,
    /// Cost from start to this node (g-score)
    g_score: N::Cost,
    /// Previous node in the path (for reconstruction)
    came_from: Option<NodeIndex>,
    /// Whether this node has been popped from the open set
    closed: bool,
}

/// Node bookkeeping for a single search.
struct PathFinder<N: SearchNode> {
    nodes: Vec<NodeEntry<N>>,
    state_to_index: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode> PathFinder<N> {
    fn new() -> Self {
        PathFinder {
            nodes: Vec::new(),
            state_to_index: FxHashMap::default(),
        }
    }

    /// Gets or creates an index for a node state.
    fn get_or_create_index(&mut self, node: N, g_score: N::Cost) -> (NodeIndex, bool) {
        if let Some(&index) = self.state_to_index.get(&node) {
            (index, false)
        } else {
            let index = self.nodes.len();
            self.state_to_index.insert(node.clone(), index);
            self.nodes.push(NodeEntry {
                node,
                g_score,
                came_from: None,
                closed: false,
            });
            (index, true)
        }
    }

    /// Reconstructs the path from start to the given node index.
    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = Vec::new();

        loop {
            let entry = &self.nodes[current];
            path.push(entry.node.clone());

            match entry.came_from {
                Some(prev) => current = prev,
                None => break,
            }
        }

        path.reverse();
        path
    }
}

/// Search bounds; `None` means unbounded.
#[derive(Debug, Clone, Copy)]
struct Limits<C> {
    max_cost: Option<C>,
    max_nodes: Option<usize>,
}

impl<C> Limits<C> {
    fn none() -> Self {
        Limits {
            max_cost: None,
            max_nodes: None,
        }
    }
}

/// Core best-first loop shared by every entry point.
///
/// `visit` is called once per settled node with its final cost and returns
/// true to stop the search at that node.
fn explore<N, A>(
    start: &N,
    arity: A,
    limits: Limits<N::Cost>,
    heuristic: impl Fn(&N) -> N::Cost,
    mut visit: impl FnMut(&N, N::Cost) -> bool,
) -> Option<(PathFinder<N>, NodeIndex, N::Cost)>
where
    N: SearchNode,
    A: Arity,
{
    let zero = N::Cost::default();
    let mut open: PriorityQueue<NodeIndex, PriorityCost<N::Cost>, A> =
        QueueBuilder::new().with_arity(arity).build_empty();
    let mut finder = PathFinder::new();

    let (start_index, _) = finder.get_or_create_index(start.clone(), zero);
    let priority = PriorityCost {
        f_score: heuristic(start),
        g_score: zero,
    };
    open.push(priority, start_index);

    let mut nodes_explored = 0usize;

    while let Some((priority, current_index)) = open.try_pop() {
        if let Some(max) = limits.max_nodes {
            if nodes_explored >= max {
                debug!("search stopped after {} nodes", nodes_explored);
                return None;
            }
        }
        nodes_explored += 1;

        let current_entry = &mut finder.nodes[current_index];
        current_entry.closed = true;
        let current_node = current_entry.node.clone();
        let current_g = priority.g_score;

        if visit(&current_node, current_g) {
            debug!("search settled {} nodes", nodes_explored);
            return Some((finder, current_index, current_g));
        }

        for (neighbor, edge_cost) in current_node.successors() {
            let tentative_g = current_g + edge_cost;

            if limits.max_cost.is_some_and(|max| tentative_g > max) {
                continue;
            }

            let h = heuristic(&neighbor);
            let (neighbor_index, is_new) = finder.get_or_create_index(neighbor, tentative_g);
            let neighbor_entry = &mut finder.nodes[neighbor_index];

            if neighbor_entry.closed {
                continue;
            }

            if is_new || tentative_g < neighbor_entry.g_score {
                neighbor_entry.g_score = tentative_g;
                neighbor_entry.came_from = Some(current_index);
                let new_priority = PriorityCost {
                    f_score: tentative_g + h,
                    g_score: tentative_g,
                };

                // every open node is queued exactly once, so a cheaper route
                // is an in-place improvement
                if is_new {
                    open.push(new_priority, neighbor_index);
                } else {
                    open.update_key(new_priority, &neighbor_index);
                }
            }
        }
    }

    debug!("search exhausted after {} nodes", nodes_explored);
    None
}

fn shortest_path<N, A>(
    start: &N,
    arity: A,
    limits: Limits<N::Cost>,
    heuristic: impl Fn(&N) -> N::Cost,
) -> Option<(Vec<N>, N::Cost)>
where
    N: SearchNode,
    A: Arity,
{
    let (finder, goal_index, cost) =
        explore(start, arity, limits, heuristic, |node, _| node.is_goal())?;
    Some((finder.reconstruct_path(goal_index), cost))
}

/// Runs Dijkstra's algorithm from the start node until `is_goal()` returns true.
///
/// # Returns
/// - `Some((path, cost))` if a path is found
/// - `None` if no path exists
///
/// # Example
/// ```rust
/// use rust_indexed_heaps::pathfinding::{SearchNode, dijkstra};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Node {
///     value: i32,
///     goal: i32,
/// }
///
/// impl SearchNode for Node {
///     type Cost = u32;
///
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.value < 100 {
///             vec![(Node { value: self.value + 1, goal: self.goal }, 1)]
///         } else {
///             vec![]
///         }
///     }
///
///     fn is_goal(&self) -> bool {
///         self.value == self.goal
///     }
/// }
///
/// let start = Node { value: 0, goal: 5 };
/// let (_, cost) = dijkstra(&start).unwrap();
/// assert_eq!(cost, 5);
/// ```
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    shortest_path(start, Binary, Limits::none(), |_| N::Cost::default())
}

/// Runs A* search from the start node until `is_goal()` returns true.
///
/// Uses the node's `heuristic()` method to guide the search.
pub fn astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    shortest_path(start, Binary, Limits::none(), |n| n.heuristic())
}

/// Returns all nodes reachable from the start within a given cost budget,
/// in the order they were settled (non-decreasing cost).
pub fn reachable_within<N: SearchNode>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)> {
    let mut result = Vec::new();
    let limits = Limits {
        max_cost: Some(max_cost),
        max_nodes: None,
    };

    explore(
        start,
        Binary,
        limits,
        |_| N::Cost::default(),
        |node, cost| {
            result.push((node.clone(), cost));
            false
        },
    );

    result
}

/// Builder for pathfinding queries with more configuration options.
///
/// # Example
/// ```rust
/// use rust_indexed_heaps::pathfinding::{PathFinderBuilder, SearchNode};
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Step(u32);
///
/// impl SearchNode for Step {
///     type Cost = u32;
///     fn successors(&self) -> Vec<(Self, u32)> {
///         vec![(Step(self.0 + 1), 1), (Step(self.0 + 2), 3)]
///     }
///     fn is_goal(&self) -> bool {
///         self.0 == 10
///     }
/// }
///
/// let found = PathFinderBuilder::new(Step(0)).arity(4).dijkstra();
/// assert_eq!(found.map(|(_, cost)| cost), Some(10));
///
/// let capped = PathFinderBuilder::new(Step(0)).max_cost(5).dijkstra();
/// assert!(capped.is_none());
/// ```
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    max_cost: Option<N::Cost>,
    max_nodes: Option<usize>,
    arity: Option<KAry>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    /// Creates a new builder starting from the given node.
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            max_cost: None,
            max_nodes: None,
            arity: None,
        }
    }

    /// Sets the maximum cost to explore.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Sets the maximum number of nodes to explore.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.max_nodes = Some(count);
        self
    }

    /// Uses a k-ary open set instead of a binary one.
    ///
    /// # Panics
    /// Panics if `k <= 2`.
    #[track_caller]
    pub fn arity(mut self, k: usize) -> Self {
        self.arity = Some(KAry::new(k));
        self
    }

    /// Runs Dijkstra's algorithm with the configured settings.
    pub fn dijkstra(self) -> Option<(Vec<N>, N::Cost)> {
        self.search_with_heuristic(|_| N::Cost::default())
    }

    /// Runs A* search with the configured settings.
    pub fn astar(self) -> Option<(Vec<N>, N::Cost)>
    where
        N: AStarNode,
    {
        self.search_with_heuristic(|n| n.heuristic())
    }

    fn search_with_heuristic(
        self,
        heuristic: impl Fn(&N) -> N::Cost,
    ) -> Option<(Vec<N>, N::Cost)> {
        let limits = Limits {
            max_cost: self.max_cost,
            max_nodes: self.max_nodes,
        };

        match self.arity {
            Some(arity) => shortest_path(&self.start, arity, limits, heuristic),
            None => shortest_path(&self.start, Binary, limits, heuristic),
        }
    }
}
