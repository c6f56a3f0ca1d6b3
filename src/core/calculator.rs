use crate::core::pathfinding::find_path;
use crate::domain::geo::{geohash_decode, geohash_encode};
use crate::domain::graph::{Edge, RouteGraph, Via, VertexKind};
use crate::domain::model::{AirportInfo, HashedNodeInfo, InfoData, NodeInfo, RouteResult};
use crate::utils::error::{Result, RouteError};
use std::collections::BTreeMap;

fn is_airport(key: &str) -> bool {
    VertexKind::classify(key) == Some(VertexKind::Airport)
}

/// 航路搜尋的成本函式，負責 SID/STAR 的進出限制
#[derive(Debug, Clone, PartialEq)]
pub struct CostFunc {
    dest: String,
    dest_is_airport: bool,
    sid_node: Option<String>,
    star_node: Option<String>,
}

impl CostFunc {
    /// `sid_node` / `star_node` 為 geohash，限制離場出口與進場入口
    pub fn new(
        orig: &str,
        dest: &str,
        sid_node: Option<String>,
        star_node: Option<String>,
    ) -> Result<Self> {
        if !is_airport(orig) && sid_node.is_some() {
            return Err(RouteError::miscellaneous(
                "Cannot specify exit node for non-airport.",
            ));
        }
        if !is_airport(dest) && star_node.is_some() {
            return Err(RouteError::miscellaneous(
                "Cannot specify entry node for non-airport.",
            ));
        }
        Ok(Self {
            dest: dest.to_string(),
            dest_is_airport: is_airport(dest),
            sid_node,
            star_node,
        })
    }

    pub fn cost(
        &self,
        prev_node: &str,
        next_node: &str,
        edge: &Edge,
        _prev_edge: Option<&Edge>,
    ) -> f64 {
        match edge.via {
            Via::Sid => {
                if let Some(sid_node) = &self.sid_node {
                    if next_node != sid_node.as_str() {
                        return f64::INFINITY;
                    }
                }
            }
            Via::Star => {
                if !self.dest_is_airport || next_node != self.dest {
                    return f64::INFINITY;
                }
                if let Some(star_node) = &self.star_node {
                    if prev_node != star_node.as_str() {
                        return f64::INFINITY;
                    }
                }
            }
            Via::Airway(_) => {}
        }
        edge.distance
    }
}

/// 航路查詢條件，SID 出口與 STAR 入口以航點名稱指定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequest {
    pub orig: String,
    pub dest: String,
    pub sid_exit: Option<String>,
    pub star_entry: Option<String>,
}

impl RouteRequest {
    pub fn new(orig: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            orig: orig.into(),
            dest: dest.into(),
            ..Default::default()
        }
    }

    pub fn with_sid_exit(mut self, fix: impl Into<String>) -> Self {
        self.sid_exit = Some(fix.into());
        self
    }

    pub fn with_star_entry(mut self, fix: impl Into<String>) -> Self {
        self.star_entry = Some(fix.into());
        self
    }
}

pub struct RouteCalculator {
    graph: RouteGraph,
    info: InfoData,
}

impl RouteCalculator {
    /// 圖上每個頂點都必須能在資訊表中找到
    pub fn new(graph: RouteGraph, info: InfoData) -> Result<Self> {
        for vertex in graph.vertices() {
            let known = match VertexKind::classify(vertex) {
                Some(VertexKind::Airport) => info.airports.contains_key(vertex),
                Some(VertexKind::Fix) => info.nodes.contains_key(vertex),
                None => false,
            };
            if !known {
                return Err(RouteError::data_corruption(format!(
                    "Info data is corrupted: unknown vertex {}.",
                    vertex
                )));
            }
        }
        Ok(Self { graph, info })
    }

    pub fn get_airport_info(&self, icao: &str) -> Result<&AirportInfo> {
        self.info
            .airports
            .get(icao)
            .ok_or_else(|| RouteError::node_not_found(format!("Cannot find airport {}.", icao)))
    }

    /// 依名稱找出所有同名航點，鍵為 geohash
    pub fn find_node(&self, name: &str) -> Result<BTreeMap<String, HashedNodeInfo>> {
        let result: BTreeMap<String, HashedNodeInfo> = self
            .info
            .nodes
            .iter()
            .filter(|(_, node)| node.name == name)
            .map(|(hash, node)| (hash.clone(), node.clone()))
            .collect();
        if result.is_empty() {
            return Err(RouteError::node_not_found(format!("Cannot find node {}.", name)));
        }
        Ok(result)
    }

    pub fn calculate(&self, orig: &str, dest: &str) -> Result<RouteResult> {
        self.calculate_with(&RouteRequest::new(orig, dest))
    }

    pub fn calculate_with(&self, request: &RouteRequest) -> Result<RouteResult> {
        let (orig, dest) = (request.orig.as_str(), request.dest.as_str());
        let (Some(orig_airport), Some(dest_airport)) =
            (self.info.airports.get(orig), self.info.airports.get(dest))
        else {
            return Err(RouteError::no_result("Airport not found."));
        };

        let sid_node = match &request.sid_exit {
            Some(fix) => Some(self.sid_exit_hash(orig, orig_airport, fix)?),
            None => None,
        };
        let star_node = match &request.star_entry {
            Some(fix) => Some(self.star_entry_hash(dest, dest_airport, fix)?),
            None => None,
        };
        let cost_func = CostFunc::new(orig, dest, sid_node, star_node)?;

        tracing::debug!("Searching route {} -> {}", orig, dest);
        let path = find_path(&self.graph, orig, dest, |prev, next, edge, prev_edge| {
            cost_func.cost(prev, next, edge, prev_edge)
        })
        .filter(|path| path.total_cost.is_finite())
        .ok_or_else(|| {
            RouteError::no_result(format!("Unable to find a path from {} to {}.", orig, dest))
        })?;

        let mut display_route: Vec<String> = Vec::new();
        let mut prev_edgename = String::new();
        let mut nodes_info: Vec<NodeInfo> = Vec::with_capacity(path.nodes.len());

        for (i, vertex) in path.nodes.iter().enumerate() {
            let edgename = path.edges.get(i).map(|edge| edge.via.to_string());
            let node = self.describe_vertex(vertex)?;

            // 同一條航路上的中間點不顯示
            if edgename.as_deref() != Some(prev_edgename.as_str()) {
                display_route.push(node.name.clone());
                if let Some(edgename) = edgename {
                    display_route.push(edgename.clone());
                    prev_edgename = edgename;
                }
            }
            nodes_info.push(node);
        }

        tracing::debug!(
            "Found route with {} nodes, {:.1} NM",
            nodes_info.len(),
            path.total_cost
        );

        Ok(RouteResult {
            display_route,
            distance: path.total_cost,
            nodes_info,
            sid: orig_airport.sid.clone(),
            star: dest_airport.star.clone(),
        })
    }

    fn describe_vertex(&self, vertex: &str) -> Result<NodeInfo> {
        match VertexKind::classify(vertex) {
            Some(VertexKind::Airport) => {
                let airport = self.get_airport_info(vertex)?;
                Ok(NodeInfo {
                    name: vertex.to_string(),
                    frequency: None,
                    position: airport.position,
                })
            }
            Some(VertexKind::Fix) => {
                let node = self.info.nodes.get(vertex).ok_or_else(|| {
                    RouteError::data_corruption(format!("Unexpected node: {}", vertex))
                })?;
                Ok(NodeInfo {
                    name: node.name.clone(),
                    frequency: node.frequency,
                    position: geohash_decode(vertex)?,
                })
            }
            None => Err(RouteError::data_corruption(format!(
                "Unexpected node: {}",
                vertex
            ))),
        }
    }

    /// SID 以最後一個航點為出口
    fn sid_exit_hash(&self, icao: &str, airport: &AirportInfo, fix: &str) -> Result<String> {
        airport
            .sid
            .get(fix)
            .and_then(|procedures| procedures.first())
            .and_then(|procedure| procedure.nodes.last())
            .map(|node| geohash_encode(node.position))
            .ok_or_else(|| {
                RouteError::node_not_found(format!("{} has no SID exiting at {}.", icao, fix))
            })
    }

    /// STAR 以第一個航點為入口
    fn star_entry_hash(&self, icao: &str, airport: &AirportInfo, fix: &str) -> Result<String> {
        airport
            .star
            .get(fix)
            .and_then(|procedures| procedures.first())
            .and_then(|procedure| procedure.nodes.first())
            .map(|node| geohash_encode(node.position))
            .ok_or_else(|| {
                RouteError::node_not_found(format!("{} has no STAR entering at {}.", icao, fix))
            })
    }
}
