use crate::domain::graph::RouteGraph;
use crate::domain::model::{CompileManifest, InfoData};
use crate::domain::ports::Storage;
use crate::utils::error::{Result, RouteError};

pub const GRAPH_FILE: &str = "graph.json";
pub const INFO_FILE: &str = "info.json";
pub const MANIFEST_FILE: &str = "manifest.json";

pub async fn save_compiled<S: Storage>(
    storage: &S,
    graph: &RouteGraph,
    info: &InfoData,
    manifest: &CompileManifest,
) -> Result<()> {
    tracing::debug!("Writing {} ({} edges)", GRAPH_FILE, manifest.edges);
    storage
        .write_file(GRAPH_FILE, &serde_json::to_vec(graph)?)
        .await?;

    tracing::debug!("Writing {} ({} airports)", INFO_FILE, manifest.airports);
    storage
        .write_file(INFO_FILE, &serde_json::to_vec(info)?)
        .await?;

    storage
        .write_file(MANIFEST_FILE, &serde_json::to_vec_pretty(manifest)?)
        .await?;
    Ok(())
}

pub async fn load_compiled<S: Storage>(storage: &S) -> Result<(RouteGraph, InfoData)> {
    let graph_bytes = storage.read_file(GRAPH_FILE).await?;
    let graph: RouteGraph = serde_json::from_slice(&graph_bytes)
        .map_err(|e| RouteError::data_corruption(format!("Graph data is corrupted: {}", e)))?;

    let info_bytes = storage.read_file(INFO_FILE).await?;
    let info: InfoData = serde_json::from_slice(&info_bytes)
        .map_err(|e| RouteError::data_corruption(format!("Info data is corrupted: {}", e)))?;

    tracing::debug!(
        "Loaded {} edges, {} airports, {} nodes",
        graph.edge_count(),
        info.airports.len(),
        info.nodes.len()
    );
    Ok((graph, info))
}

pub async fn load_manifest<S: Storage>(storage: &S) -> Result<CompileManifest> {
    let bytes = storage.read_file(MANIFEST_FILE).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::domain::graph::{Edge, Via};
    use crate::domain::model::HashedNodeInfo;
    use tempfile::TempDir;

    fn sample() -> (RouteGraph, InfoData) {
        let mut graph = RouteGraph::new();
        graph.add_edge("wsqqqqqqq", "wsqqqqqqr", Edge::new(42.0, Via::Airway("B221".into())));
        let mut info = InfoData::default();
        info.nodes.insert(
            "wsqqqqqqq".into(),
            HashedNodeInfo {
                name: "DST".into(),
                frequency: Some(113.9),
            },
        );
        (graph, info)
    }

    #[tokio::test]
    async fn test_save_and_load_compiled_data() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
        let (graph, info) = sample();
        let manifest = CompileManifest::new("/navdata", &graph, &info);

        save_compiled(&storage, &graph, &info, &manifest).await.unwrap();
        let (loaded_graph, loaded_info) = load_compiled(&storage).await.unwrap();

        assert_eq!(loaded_graph, graph);
        assert_eq!(loaded_info, info);
        let loaded_manifest = load_manifest(&storage).await.unwrap();
        assert_eq!(loaded_manifest.edges, 1);
        assert_eq!(loaded_manifest.source, "/navdata");
    }

    #[tokio::test]
    async fn test_corrupted_info_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
        storage.write_file(GRAPH_FILE, b"{}").await.unwrap();
        storage
            .write_file(INFO_FILE, br#"{"airports":{},"nodes":{},"routes":{}}"#)
            .await
            .unwrap();

        let err = load_compiled(&storage).await.unwrap_err();
        assert!(matches!(err, RouteError::DataCorruption { .. }));
    }

    #[tokio::test]
    async fn test_missing_files_are_io_errors() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().to_string());
        let err = load_compiled(&storage).await.unwrap_err();
        assert!(matches!(err, RouteError::IoError(_)));
    }
}
