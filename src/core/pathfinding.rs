use crate::domain::graph::{Edge, RouteGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// 最短路徑結果，`edges[i]` 為 `nodes[i] -> nodes[i + 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct PathInfo {
    pub nodes: Vec<String>,
    pub edges: Vec<Edge>,
    pub costs: Vec<f64>,
    pub total_cost: f64,
}

#[derive(Debug, PartialEq)]
struct QueueEntry {
    cost: f64,
    vertex: String,
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// Dijkstra 搜尋。`cost_fn(prev, next, edge, prev_edge)` 回傳無限大時視為不可通行。
pub fn find_path<F>(
    graph: &RouteGraph,
    start: &str,
    goal: &str,
    mut cost_fn: F,
) -> Option<PathInfo>
where
    F: FnMut(&str, &str, &Edge, Option<&Edge>) -> f64,
{
    let mut best: HashMap<String, f64> = HashMap::new();
    let mut predecessors: HashMap<String, (String, Edge, f64)> = HashMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue = BinaryHeap::new();

    best.insert(start.to_string(), 0.0);
    queue.push(Reverse(QueueEntry {
        cost: 0.0,
        vertex: start.to_string(),
    }));

    while let Some(Reverse(QueueEntry { cost, vertex })) = queue.pop() {
        if !visited.insert(vertex.clone()) {
            continue;
        }
        if vertex == goal {
            break;
        }

        let incoming = predecessors.get(&vertex).map(|(_, edge, _)| edge.clone());
        for (next, edge) in graph.neighbours(&vertex) {
            if visited.contains(next) {
                continue;
            }
            let step = cost_fn(vertex.as_str(), next.as_str(), edge, incoming.as_ref());
            if !step.is_finite() {
                continue;
            }
            let candidate = cost + step;
            let improves = best.get(next).map_or(true, |&known| candidate < known);
            if improves {
                best.insert(next.clone(), candidate);
                predecessors.insert(next.clone(), (vertex.clone(), edge.clone(), step));
                queue.push(Reverse(QueueEntry {
                    cost: candidate,
                    vertex: next.clone(),
                }));
            }
        }
    }

    let total_cost = *best.get(goal)?;
    if !visited.contains(goal) {
        return None;
    }

    let mut nodes = vec![goal.to_string()];
    let mut edges = Vec::new();
    let mut costs = Vec::new();
    let mut current = goal.to_string();
    while current != start {
        let (prev, edge, step) = predecessors.get(&current)?.clone();
        nodes.push(prev.clone());
        edges.push(edge);
        costs.push(step);
        current = prev;
    }
    nodes.reverse();
    edges.reverse();
    costs.reverse();

    Some(PathInfo {
        nodes,
        edges,
        costs,
        total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::Via;

    fn airway(distance: f64) -> Edge {
        Edge::new(distance, Via::Airway("A1".into()))
    }

    fn plain(_: &str, _: &str, edge: &Edge, _: Option<&Edge>) -> f64 {
        edge.distance
    }

    #[test]
    fn test_picks_cheapest_path() {
        let mut graph = RouteGraph::new();
        graph.add_edge("a", "b", airway(1.0));
        graph.add_edge("b", "c", airway(1.0));
        graph.add_edge("a", "c", airway(5.0));

        let path = find_path(&graph, "a", "c", plain).unwrap();
        assert_eq!(path.nodes, vec!["a", "b", "c"]);
        assert_eq!(path.edges.len(), 2);
        assert_eq!(path.costs, vec![1.0, 1.0]);
        assert_eq!(path.total_cost, 2.0);
    }

    #[test]
    fn test_equal_cost_paths_break_ties_by_vertex() {
        let mut forward = RouteGraph::new();
        forward.add_edge("a", "b", airway(1.0));
        forward.add_edge("b", "d", airway(1.0));
        forward.add_edge("a", "c", airway(1.0));
        forward.add_edge("c", "d", airway(1.0));

        let mut backward = RouteGraph::new();
        backward.add_edge("c", "d", airway(1.0));
        backward.add_edge("a", "c", airway(1.0));
        backward.add_edge("b", "d", airway(1.0));
        backward.add_edge("a", "b", airway(1.0));

        for graph in [&forward, &backward] {
            let path = find_path(graph, "a", "d", plain).unwrap();
            assert_eq!(path.nodes, vec!["a", "b", "d"]);
            assert_eq!(path.total_cost, 2.0);
        }
    }

    #[test]
    fn test_infinite_cost_prunes_edge() {
        let mut graph = RouteGraph::new();
        graph.add_edge("a", "b", airway(1.0));
        graph.add_edge("b", "c", airway(1.0));
        graph.add_edge("a", "c", airway(5.0));

        let path = find_path(&graph, "a", "c", |prev, _, edge, _| {
            if prev == "b" {
                f64::INFINITY
            } else {
                edge.distance
            }
        })
        .unwrap();
        assert_eq!(path.nodes, vec!["a", "c"]);
        assert_eq!(path.total_cost, 5.0);
    }

    #[test]
    fn test_prev_edge_is_passed_to_cost_fn() {
        let mut graph = RouteGraph::new();
        graph.add_edge("a", "b", Edge::new(1.0, Via::Sid));
        graph.add_edge("b", "c", airway(1.0));

        let mut seen = Vec::new();
        find_path(&graph, "a", "c", |_, next, edge, prev_edge| {
            seen.push((next.to_string(), prev_edge.map(|e| e.via.clone())));
            edge.distance
        })
        .unwrap();
        assert_eq!(seen[0], ("b".to_string(), None));
        assert_eq!(seen[1], ("c".to_string(), Some(Via::Sid)));
    }

    #[test]
    fn test_unreachable_goal() {
        let mut graph = RouteGraph::new();
        graph.add_edge("a", "b", airway(1.0));
        assert!(find_path(&graph, "a", "z", plain).is_none());
        assert!(find_path(&graph, "b", "a", plain).is_none());
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = RouteGraph::new();
        let path = find_path(&graph, "a", "a", plain).unwrap();
        assert_eq!(path.nodes, vec!["a"]);
        assert!(path.edges.is_empty());
        assert_eq!(path.total_cost, 0.0);
    }
}
