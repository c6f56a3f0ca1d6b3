use crate::domain::model::CompileManifest;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// 遞迴列出目錄下的檔案（相對於 base，已排序）
    fn list_files(
        &self,
        dir: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn monitoring_enabled(&self) -> bool;
}

/// 導航資料編譯的各個階段，依序執行
#[async_trait]
pub trait CompilePipeline: Send + Sync {
    async fn read_navaids(&mut self) -> Result<usize>;
    async fn read_edges(&mut self) -> Result<usize>;
    async fn read_airports(&mut self) -> Result<usize>;
    async fn save(&self) -> Result<CompileManifest>;
}
