//! Response types
//!
//! View models mirrored one-to-one from the AI server's JSON. Nothing here is
//! persisted; every value is fetched, rendered and dropped on the next fetch.
//! Optional fields default so that rendering never depends on their presence.

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

/// GPU inventory as reported by `/quantization/gpu-info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInventory {
    pub available: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// Keyed by device id (`cuda:0`, `cuda:1`, ...).
    #[serde(default)]
    pub gpus: IndexMap<String, GpuInfo>,
    #[serde(default)]
    pub primary_gpu: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_gb: f64,
    #[serde(default)]
    pub allocated_gb: f64,
    #[serde(default)]
    pub reserved_gb: Option<f64>,
    #[serde(default)]
    pub free_gb: f64,
    /// Server-side percentage. Rendering recomputes it from `free_gb / total_gb`.
    #[serde(default)]
    pub free_percent: Option<f64>,
    #[serde(default)]
    pub compute_capability: String,
    #[serde(default)]
    pub multi_processor_count: Option<u32>,
}

impl GpuInfo {
    /// Free memory as a percentage of total, 0 when the total is unknown.
    pub fn free_percent(&self) -> f64 {
        if self.total_gb > 0.0 {
            self.free_gb / self.total_gb * 100.0
        } else {
            0.0
        }
    }
}

/// One quantization tier assessed against the target GPU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: String,
    #[serde(default)]
    pub bits: u32,
    #[serde(default)]
    pub estimated_size_gb: f64,
    #[serde(default)]
    pub required_vram_gb: f64,
    #[serde(default)]
    pub can_fit: bool,
    #[serde(default)]
    pub vram_usage_percent: f64,
    #[serde(default)]
    pub quality: String,
    #[serde(default)]
    pub recommended: bool,
    /// Set when nothing fits and the server fell back to the smallest tier.
    #[serde(default)]
    pub forced: bool,
    #[serde(default)]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub model_name: String,
    #[serde(default)]
    pub estimated_size_gb: f64,
    #[serde(default)]
    pub can_load: bool,
    pub best_recommendation: Recommendation,
    #[serde(default)]
    pub alternative_recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub gpu_info: GpuInventory,
}

impl AnalysisResponse {
    /// Best pick followed by the alternatives, in server order.
    pub fn recommendation_cards(&self) -> Vec<Recommendation> {
        std::iter::once(self.best_recommendation.clone())
            .chain(self.alternative_recommendations.iter().cloned())
            .collect()
    }
}

/// Per-model entry of the popular models batch. The server reports failures
/// in-band as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PopularModelEntry {
    Failed {
        error: String,
    },
    Analyzed {
        #[serde(default)]
        estimated_size_gb: f64,
        #[serde(default)]
        can_load: bool,
        best_recommendation: Recommendation,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopularModelsResponse {
    #[serde(default)]
    pub popular_models: IndexMap<String, PopularModelEntry>,
    #[serde(default)]
    pub gpu_info: GpuInventory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuConstraints {
    #[serde(default)]
    pub free_vram_gb: f64,
    #[serde(default)]
    pub total_vram_gb: f64,
}

/// Full option set from `/quantization/model/{name}/quantization-options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantizationOptions {
    pub model_name: String,
    #[serde(default)]
    pub estimated_size_gb: f64,
    #[serde(default)]
    pub quantization_options: Vec<Recommendation>,
    #[serde(default)]
    pub gpu_constraints: GpuConstraints,
}

/// Outcome class of a quantization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizeStatus {
    AlreadyExists,
    Completed,
    /// Anything else (`queued`, `running`, ...) is treated as still in progress.
    Pending(String),
}

impl From<&str> for QuantizeStatus {
    fn from(value: &str) -> Self {
        match value {
            "already_exists" => QuantizeStatus::AlreadyExists,
            "completed" => QuantizeStatus::Completed,
            other => QuantizeStatus::Pending(other.to_string()),
        }
    }
}

impl Display for QuantizeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantizeStatus::AlreadyExists => write!(f, "already_exists"),
            QuantizeStatus::Completed => write!(f, "completed"),
            QuantizeStatus::Pending(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantizeResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub quantization_level: Option<String>,
    #[serde(default)]
    pub estimated_size_gb: Option<f64>,
    #[serde(default)]
    pub quantized_path: Option<String>,
}

impl QuantizeResponse {
    pub fn status(&self) -> QuantizeStatus {
        QuantizeStatus::from(self.status.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantizedModel {
    pub original_name: String,
    #[serde(default)]
    pub quantized_name: Option<String>,
    #[serde(default)]
    pub quantization_level: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size_mb: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantizedModelsResponse {
    #[serde(default)]
    pub quantized_models: Vec<QuantizedModel>,
    #[serde(default)]
    pub total_quantized: usize,
}

/// A model directory found in the server's local cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedModel {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size_mb: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDiscovery {
    #[serde(default)]
    pub cache_path: Option<String>,
    #[serde(default)]
    pub total_folders: Option<usize>,
    #[serde(default)]
    pub total_models: usize,
    #[serde(default)]
    pub models: Vec<CachedModel>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedModelStats {
    #[serde(default)]
    pub total_loaded: usize,
    #[serde(default)]
    pub embedding_models: usize,
    #[serde(default)]
    pub llm_models: usize,
}

/// Models resident in server memory, keyed by name with their kind as value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadedModels {
    #[serde(default)]
    pub loaded_models: IndexMap<String, String>,
    #[serde(default)]
    pub stats: LoadedModelStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelActionResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub model_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}
