use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::geo::GEOHASH_PRECISION;

/// 邊的來源：航路、離場程序或進場程序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Via {
    Airway(String),
    Sid,
    Star,
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Via::Airway(name) => f.write_str(name),
            Via::Sid => f.write_str("SID"),
            Via::Star => f.write_str("STAR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 海里
    pub distance: f64,
    pub via: Via,
}

impl Edge {
    pub fn new(distance: f64, via: Via) -> Self {
        Self { distance, via }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    Airport,
    Fix,
}

impl VertexKind {
    /// 機場以 4 碼 ICAO、航點以 9 碼 geohash 表示
    pub fn classify(key: &str) -> Option<Self> {
        match key.len() {
            4 => Some(VertexKind::Airport),
            GEOHASH_PRECISION => Some(VertexKind::Fix),
            _ => None,
        }
    }
}

/// 有向航路圖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteGraph {
    adjacency: BTreeMap<String, BTreeMap<String, Edge>>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 重複加入相同方向的邊時覆蓋舊值
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>, edge: Edge) {
        self.adjacency
            .entry(from.into())
            .or_default()
            .insert(to.into(), edge);
    }

    pub fn neighbours(&self, vertex: &str) -> impl Iterator<Item = (&String, &Edge)> {
        self.adjacency.get(vertex).into_iter().flat_map(|m| m.iter())
    }

    pub fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        self.adjacency.get(from).and_then(|m| m.get(to))
    }

    pub fn contains(&self, vertex: &str) -> bool {
        self.adjacency.contains_key(vertex)
            || self.adjacency.values().any(|m| m.contains_key(vertex))
    }

    /// 所有出現過的頂點（含只當終點者）
    pub fn vertices(&self) -> Vec<&String> {
        let mut all: Vec<&String> = self
            .adjacency
            .iter()
            .flat_map(|(from, targets)| std::iter::once(from).chain(targets.keys()))
            .collect();
        all.sort();
        all.dedup();
        all
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|m| m.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edge_overwrites_same_direction() {
        let mut graph = RouteGraph::new();
        graph.add_edge("wsqqqqqqq", "wsqqqqqqr", Edge::new(10.0, Via::Airway("A1".into())));
        graph.add_edge("wsqqqqqqq", "wsqqqqqqr", Edge::new(12.0, Via::Airway("B2".into())));
        graph.add_edge("wsqqqqqqr", "wsqqqqqqq", Edge::new(11.0, Via::Airway("A1".into())));

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.vertex_count(), 2);
        let edge = graph.edge("wsqqqqqqq", "wsqqqqqqr").unwrap();
        assert_eq!(edge.distance, 12.0);
        assert_eq!(edge.via.to_string(), "B2");
    }

    #[test]
    fn test_contains_target_only_vertex() {
        let mut graph = RouteGraph::new();
        graph.add_edge("wsqqqqqqq", "ZSPD", Edge::new(5.0, Via::Star));
        assert!(graph.contains("ZSPD"));
        assert_eq!(graph.neighbours("ZSPD").count(), 0);
        assert!(!graph.contains("ZSFZ"));
    }

    #[test]
    fn test_classify_vertex() {
        assert_eq!(VertexKind::classify("ZSPD"), Some(VertexKind::Airport));
        assert_eq!(VertexKind::classify("wtw3sjq6q"), Some(VertexKind::Fix));
        assert_eq!(VertexKind::classify("SID"), None);
    }

    #[test]
    fn test_via_serialization() {
        let json = serde_json::to_string(&Edge::new(1.5, Via::Sid)).unwrap();
        assert_eq!(json, r#"{"distance":1.5,"via":"sid"}"#);
        let json = serde_json::to_string(&Via::Airway("B221".into())).unwrap();
        assert_eq!(json, r#"{"airway":"B221"}"#);
    }
}
