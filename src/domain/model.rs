use crate::domain::graph::RouteGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// (緯度, 經度)
pub type Position = (f64, f64);

/// 以 geohash 為鍵的航點或導航台資訊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashedNodeInfo {
    pub name: String,
    /// 只有導航台有頻率
    pub frequency: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub frequency: Option<f64>,
    pub position: Position,
}

/// SID/STAR 程序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportProcedure {
    pub name: String,
    pub runway: String,
    pub nodes: Vec<NodeInfo>,
}

/// 以出口（SID）或入口（STAR）航點名稱分組的程序
pub type ProcedureTable = BTreeMap<String, Vec<AirportProcedure>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportInfo {
    pub position: Position,
    pub sid: ProcedureTable,
    pub star: ProcedureTable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfoData {
    /// ICAO -> 機場
    pub airports: BTreeMap<String, AirportInfo>,
    /// geohash -> 航點
    pub nodes: BTreeMap<String, HashedNodeInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// 可直接輸入飛行電腦的航路字串（航點與航路交替）
    pub display_route: Vec<String>,
    /// 海里
    pub distance: f64,
    pub nodes_info: Vec<NodeInfo>,
    pub sid: ProcedureTable,
    pub star: ProcedureTable,
}

/// 編譯結果摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileManifest {
    pub compiled_at: DateTime<Utc>,
    pub source: String,
    pub airports: usize,
    pub nodes: usize,
    pub vertices: usize,
    pub edges: usize,
}

impl CompileManifest {
    pub fn new(source: impl Into<String>, graph: &RouteGraph, info: &InfoData) -> Self {
        Self {
            compiled_at: Utc::now(),
            source: source.into(),
            airports: info.airports.len(),
            nodes: info.nodes.len(),
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
        }
    }
}

impl RouteResult {
    pub fn route_string(&self) -> String {
        self.display_route.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_data_rejects_unknown_sections() {
        let json = r#"{"airports": {}, "nodes": {}, "extra": {}}"#;
        assert!(serde_json::from_str::<InfoData>(json).is_err());

        let json = r#"{"airports": {}, "nodes": {}}"#;
        assert_eq!(serde_json::from_str::<InfoData>(json).unwrap(), InfoData::default());
    }

    #[test]
    fn test_route_string_joins_with_spaces() {
        let result = RouteResult {
            display_route: vec!["ZSFZ".into(), "SID".into(), "DST".into()],
            distance: 0.0,
            nodes_info: Vec::new(),
            sid: ProcedureTable::new(),
            star: ProcedureTable::new(),
        };
        assert_eq!(result.route_string(), "ZSFZ SID DST");
    }
}
