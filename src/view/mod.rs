//! View renderer
//!
//! Pure transformations from fetched responses to HTML fragments. Rendering
//! the same input twice yields the same fragment.

pub mod analysis;
pub mod format;
pub mod gpu;
pub mod models;
pub mod quantize;
pub mod quantized;

pub use analysis::{render_analysis, render_popular_models, render_quantization_options};
pub use format::{escape_html, render_error, render_loading};
pub use gpu::render_gpu_info;
pub use models::{render_health, render_loaded_models, render_model_action, render_model_list};
pub use quantize::render_quantize_result;
pub use quantized::render_quantized_models;
