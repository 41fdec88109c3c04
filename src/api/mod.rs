use crate::types::{
    AnalysisResponse, GpuInventory, Health, LoadedModels, ModelActionResponse, ModelDiscovery,
    PopularModelsResponse, QuantizationOptions, QuantizeResponse, QuantizedModelsResponse,
};

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;
pub use error::ApiError;

#[cfg(test)]
use mockall::automock;

/// The AI server's dashboard-facing REST surface.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Base URL of the server this API talks to.
    fn base_url(&self) -> &str;

    /// GPU inventory and memory statistics.
    async fn gpu_info(&self) -> Result<GpuInventory, ApiError>;

    /// Quantization recommendations for a single model.
    async fn analyze(&self, model_name: &str) -> Result<AnalysisResponse, ApiError>;

    /// Batch analysis of the server's fixed list of popular models.
    async fn popular_models(&self) -> Result<PopularModelsResponse, ApiError>;

    /// Starts quantization of a model at the given level.
    async fn quantize(&self, model_name: &str, level: &str)
    -> Result<QuantizeResponse, ApiError>;

    /// Every quantization tier the server knows for a model.
    async fn quantization_options(&self, model_name: &str)
    -> Result<QuantizationOptions, ApiError>;

    /// Inventory of already-quantized models.
    async fn quantized_models(&self) -> Result<QuantizedModelsResponse, ApiError>;

    /// Scan of the server's local model cache.
    async fn discover_models(&self) -> Result<ModelDiscovery, ApiError>;

    /// Models currently resident in server memory.
    async fn loaded_models(&self) -> Result<LoadedModels, ApiError>;

    /// Loads a cached model into memory.
    async fn load_model(&self, model_name: &str) -> Result<ModelActionResponse, ApiError>;

    /// Unloads a model from memory.
    async fn unload_model(&self, model_name: &str) -> Result<ModelActionResponse, ApiError>;

    /// Server liveness.
    async fn health(&self) -> Result<Health, ApiError>;
}
