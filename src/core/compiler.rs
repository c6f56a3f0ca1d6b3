use crate::core::datastore::save_compiled;
use crate::domain::geo::{distance_nm, geohash_encode};
use crate::domain::graph::{Edge, RouteGraph, Via};
use crate::domain::model::{
    AirportInfo, AirportProcedure, CompileManifest, HashedNodeInfo, InfoData, NodeInfo, Position,
    ProcedureTable,
};
use crate::domain::ports::{CompilePipeline, Storage};
use crate::utils::error::{Result, RouteError};
use async_trait::async_trait;
use csv::StringRecord;
use std::collections::HashMap;
use std::fmt::Display;

pub const NAVAIDS_FILE: &str = "Navaids.txt";
pub const ATS_FILE: &str = "ATS.txt";
pub const PROC_DIR: &str = "proc";

/// 沒有定位點的航段類型（爬升至高度、航向等）
const FIXLESS_LEG_TYPES: [&str; 9] = ["CA", "CD", "CI", "CR", "VA", "VD", "VI", "VM", "VR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcedureKind {
    Sid,
    Star,
}

/// 將 Aerosoft 格式的 Navigraph 資料編譯為航路圖與資訊表。
///
/// 必須依序讀取 navaids、edges、airports，每個階段只能讀一次。
pub struct DataCompiler<S: Storage, O: Storage> {
    source: S,
    output: O,
    source_label: String,
    graph: RouteGraph,
    info: InfoData,
    navaid_frequency: HashMap<String, f64>,
    navaids_read: bool,
    edges_read: bool,
    airports_read: bool,
}

impl<S: Storage, O: Storage> DataCompiler<S, O> {
    pub fn new(source: S, output: O) -> Self {
        Self {
            source,
            output,
            source_label: String::new(),
            graph: RouteGraph::new(),
            info: InfoData::default(),
            navaid_frequency: HashMap::new(),
            navaids_read: false,
            edges_read: false,
            airports_read: false,
        }
    }

    /// 寫入 manifest 的來源描述
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    pub async fn compile(&mut self) -> Result<()> {
        self.read_navaids().await?;
        self.read_edges().await?;
        self.read_airports().await?;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.edges_read && self.airports_read
    }

    pub fn graph_data(&self) -> Result<&RouteGraph> {
        self.ensure_ready()?;
        Ok(&self.graph)
    }

    pub fn info_data(&self) -> Result<&InfoData> {
        self.ensure_ready()?;
        Ok(&self.info)
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.is_ready() {
            return Err(RouteError::data_not_ready(
                "Haven't read edges and airports yet.",
            ));
        }
        Ok(())
    }

    /// Navaids.txt：第 2 欄為頻率，第 6、7 欄為經緯度
    pub async fn read_navaids(&mut self) -> Result<usize> {
        if self.navaids_read {
            return Err(RouteError::already_read("Navaids already read."));
        }
        tracing::info!("Reading navaids");

        let bytes = self.source.read_file(NAVAIDS_FILE).await?;
        for row in csv_reader(&bytes).records() {
            let row = row?;
            if is_blank(&row) {
                continue;
            }
            let position = (
                number(&row, 6, NAVAIDS_FILE)?,
                number(&row, 7, NAVAIDS_FILE)?,
            );
            let frequency = number(&row, 2, NAVAIDS_FILE)?;
            self.navaid_frequency
                .insert(geohash_encode(position), frequency);
        }

        self.navaids_read = true;
        tracing::info!("Read {} navaids", self.navaid_frequency.len());
        Ok(self.navaid_frequency.len())
    }

    /// ATS.txt：`A` 行開始一條航路，`S` 行為航路上的一段有向邊
    pub async fn read_edges(&mut self) -> Result<usize> {
        if self.edges_read {
            return Err(RouteError::already_read("Edge already read."));
        }
        if !self.navaids_read {
            return Err(RouteError::read_order(
                "The navaids must be read before the edge reading.",
            ));
        }
        tracing::info!("Reading edges");

        let bytes = self.source.read_file(ATS_FILE).await?;
        let mut airway: Option<String> = None;
        let mut segments = 0usize;

        for row in csv_reader(&bytes).records() {
            let row = row?;
            if is_blank(&row) {
                continue;
            }
            match row.get(0).map(str::trim) {
                Some("A") => {
                    airway = Some(field(&row, 1, ATS_FILE)?.trim().to_string());
                }
                Some("S") => {
                    let name = airway
                        .clone()
                        .ok_or_else(|| RouteError::data_corruption("ATS.txt is corrupted."))?;
                    let start = self.fix_at(&row, 1, ATS_FILE)?;
                    let end = self.fix_at(&row, 4, ATS_FILE)?;
                    // TODO: 第 7/8 欄為進出航向，確認方向定義後再納入
                    let distance = number(&row, 9, ATS_FILE)?;

                    let start_hash = geohash_encode(start.position);
                    let end_hash = geohash_encode(end.position);
                    self.graph.add_edge(
                        start_hash.clone(),
                        end_hash.clone(),
                        Edge::new(distance, Via::Airway(name)),
                    );
                    self.info.nodes.insert(start_hash, hashed(&start));
                    self.info.nodes.insert(end_hash, hashed(&end));
                    segments += 1;
                }
                _ => {}
            }
        }

        self.edges_read = true;
        tracing::info!(
            "Read {} airway segments ({} nodes)",
            segments,
            self.info.nodes.len()
        );
        Ok(segments)
    }

    /// proc/ 目錄下每個機場一個檔案，區塊之間以空行分隔
    pub async fn read_airports(&mut self) -> Result<usize> {
        if self.airports_read {
            return Err(RouteError::already_read("Airport already read."));
        }
        if !self.navaids_read {
            return Err(RouteError::read_order(
                "The navaids must be read before the airport reading.",
            ));
        }
        tracing::info!("Reading airport SID & STAR");

        let files = self.source.list_files(PROC_DIR).await?;
        let mut airports = 0usize;

        for file in files.iter().filter(|f| f.ends_with(".txt")) {
            let bytes = self.source.read_file(file).await?;
            let content = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");

            if let Some((icao, airport)) = self.parse_airport_file(file, &content)? {
                tracing::debug!(
                    "{}: {} SID exits, {} STAR entries",
                    icao,
                    airport.sid.len(),
                    airport.star.len()
                );
                self.info.nodes.insert(
                    geohash_encode(airport.position),
                    HashedNodeInfo {
                        name: icao.clone(),
                        frequency: None,
                    },
                );
                self.info.airports.insert(icao, airport);
                airports += 1;
            }
        }

        self.airports_read = true;
        tracing::info!("Read {} airports", airports);
        Ok(airports)
    }

    fn parse_airport_file(
        &mut self,
        file: &str,
        content: &str,
    ) -> Result<Option<(String, AirportInfo)>> {
        let mut airport: Option<(String, Position)> = None;
        let mut sid = ProcedureTable::new();
        let mut star = ProcedureTable::new();

        for block in content.split("\n\n") {
            let block = block.trim_start_matches('\n');
            let Some(header) = block.lines().next() else {
                continue;
            };

            if header.starts_with("A,") {
                let fields: Vec<&str> = header.split(',').collect();
                let icao = fields
                    .get(1)
                    .map(|s| s.trim().to_string())
                    .ok_or_else(|| corrupted_file(file, "missing airport ICAO"))?;
                let position = (
                    parse_number(fields.get(3).copied(), file)?,
                    parse_number(fields.get(4).copied(), file)?,
                );
                airport = Some((icao, position));
                continue;
            }

            let kind = if header.starts_with("SID,") {
                ProcedureKind::Sid
            } else if header.starts_with("STAR,") {
                ProcedureKind::Star
            } else {
                continue;
            };

            let fields: Vec<&str> = header.split(',').collect();
            if fields.len() != 4 {
                return Err(corrupted_file(file, format!("bad procedure header '{}'", header)));
            }
            let (icao, airport_position) = airport
                .clone()
                .ok_or_else(|| corrupted_file(file, "procedure before airport line"))?;

            let nodes = self.procedure_nodes(file, block)?;
            // 沒有任何定位點的程序無效
            let (Some(first), Some(last)) = (nodes.first().cloned(), nodes.last().cloned()) else {
                continue;
            };
            let procedure = AirportProcedure {
                name: fields[1].trim().to_string(),
                runway: fields[2].trim().to_string(),
                nodes,
            };

            match kind {
                ProcedureKind::Sid => {
                    if !sid.contains_key(&last.name) {
                        let hash = geohash_encode(last.position);
                        self.info
                            .nodes
                            .entry(hash.clone())
                            .or_insert_with(|| hashed(&last));
                        self.graph.add_edge(
                            icao.clone(),
                            hash,
                            Edge::new(distance_nm(airport_position, last.position), Via::Sid),
                        );
                    }
                    sid.entry(last.name.clone()).or_default().push(procedure);
                }
                ProcedureKind::Star => {
                    if !star.contains_key(&first.name) {
                        let hash = geohash_encode(first.position);
                        self.info
                            .nodes
                            .entry(hash.clone())
                            .or_insert_with(|| hashed(&first));
                        self.graph.add_edge(
                            hash,
                            icao.clone(),
                            Edge::new(distance_nm(airport_position, first.position), Via::Star),
                        );
                    }
                    star.entry(first.name.clone()).or_default().push(procedure);
                }
            }
        }

        Ok(airport.map(|(icao, position)| {
            (
                icao,
                AirportInfo {
                    position,
                    sid,
                    star,
                },
            )
        }))
    }

    fn procedure_nodes(&self, file: &str, block: &str) -> Result<Vec<NodeInfo>> {
        let mut nodes = Vec::new();
        for row in csv_reader(block.as_bytes()).records() {
            let row = row?;
            if is_blank(&row) {
                continue;
            }
            let leg = row.get(0).map(str::trim).unwrap_or_default();
            if leg == "SID" || leg == "STAR" || FIXLESS_LEG_TYPES.contains(&leg) {
                continue;
            }
            nodes.push(self.fix_at(&row, 1, file)?);
        }
        Ok(nodes)
    }

    /// 讀取 `name, lat, lon` 三欄，並補上導航台頻率
    fn fix_at(&self, row: &StringRecord, index: usize, file: &str) -> Result<NodeInfo> {
        let name = field(row, index, file)?.trim().to_string();
        let position = (number(row, index + 1, file)?, number(row, index + 2, file)?);
        let frequency = self
            .navaid_frequency
            .get(&geohash_encode(position))
            .copied();
        Ok(NodeInfo {
            name,
            frequency,
            position,
        })
    }
}

#[async_trait]
impl<S: Storage, O: Storage> CompilePipeline for DataCompiler<S, O> {
    async fn read_navaids(&mut self) -> Result<usize> {
        DataCompiler::read_navaids(self).await
    }

    async fn read_edges(&mut self) -> Result<usize> {
        DataCompiler::read_edges(self).await
    }

    async fn read_airports(&mut self) -> Result<usize> {
        DataCompiler::read_airports(self).await
    }

    async fn save(&self) -> Result<CompileManifest> {
        let graph = self.graph_data()?;
        let info = self.info_data()?;
        let manifest = CompileManifest::new(self.source_label.clone(), graph, info);
        save_compiled(&self.output, graph, info, &manifest).await?;
        Ok(manifest)
    }
}

fn csv_reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data)
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|f| f.trim().is_empty())
}

fn hashed(node: &NodeInfo) -> HashedNodeInfo {
    HashedNodeInfo {
        name: node.name.clone(),
        frequency: node.frequency,
    }
}

fn field<'r>(row: &'r StringRecord, index: usize, file: &str) -> Result<&'r str> {
    row.get(index)
        .ok_or_else(|| corrupted_row(file, row, format!("missing column {}", index)))
}

fn number(row: &StringRecord, index: usize, file: &str) -> Result<f64> {
    let raw = field(row, index, file)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| corrupted_row(file, row, format!("invalid number '{}'", raw)))
}

fn parse_number(raw: Option<&str>, file: &str) -> Result<f64> {
    let raw = raw.ok_or_else(|| corrupted_file(file, "missing coordinate"))?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| corrupted_file(file, format!("invalid number '{}'", raw)))
}

fn corrupted_row(file: &str, row: &StringRecord, detail: impl Display) -> RouteError {
    let line = row.position().map(|p| p.line()).unwrap_or_default();
    RouteError::data_corruption(format!("{} is corrupted (line {}): {}", file, line, detail))
}

fn corrupted_file(file: &str, detail: impl Display) -> RouteError {
    RouteError::data_corruption(format!("{} is corrupted: {}", file, detail))
}
