use crate::domain::model::CompileManifest;
use crate::domain::ports::CompilePipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CompileSummary {
    pub navaids: usize,
    pub segments: usize,
    pub airports: usize,
    pub manifest: CompileManifest,
    pub elapsed: Duration,
}

pub struct CompileEngine<P: CompilePipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: CompilePipeline> CompileEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&mut self) -> Result<CompileSummary> {
        let started = Instant::now();
        tracing::info!("Starting navdata compilation...");
        self.monitor.log_stats("Start");

        let navaids = self.pipeline.read_navaids().await?;
        self.monitor.log_stats("Navaids");

        let segments = self.pipeline.read_edges().await?;
        self.monitor.log_stats("Edges");

        let airports = self.pipeline.read_airports().await?;
        self.monitor.log_stats("Airports");

        tracing::info!("Saving compiled data...");
        let manifest = self.pipeline.save().await?;
        self.monitor.log_final_stats();

        Ok(CompileSummary {
            navaids,
            segments,
            airports,
            manifest,
            elapsed: started.elapsed(),
        })
    }

    pub fn into_pipeline(self) -> P {
        self.pipeline
    }
}
