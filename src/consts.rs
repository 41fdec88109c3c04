pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Endpoint paths, timings and display thresholds, organized by functional
    //! area.

    // =============================================================================
    // SERVER
    // =============================================================================

    /// Default AI server base URL (the server binds 0.0.0.0:8000).
    pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

    /// Environment variable overriding the server URL.
    pub const SERVER_URL_ENV: &str = "QUANT_DASH_SERVER_URL";

    /// Connect timeout for API calls (seconds). There is no overall request
    /// timeout: a slow response keeps its panel in the loading state.
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    // =============================================================================
    // ENDPOINTS
    // =============================================================================

    pub mod endpoints {
        pub const GPU_INFO: &str = "quantization/gpu-info";
        pub const ANALYZE: &str = "quantization/analyze";
        pub const POPULAR_MODELS: &str = "quantization/recommendations/popular-models";
        pub const QUANTIZED_MODELS: &str = "quantization/quantized-models";
        pub const MODEL_DISCOVERY: &str = "models/discovery";
        pub const LOADED_MODELS: &str = "models/loaded";
        pub const LOAD_MODEL: &str = "models/load";
        pub const UNLOAD_MODEL: &str = "models/unload";
        pub const HEALTH: &str = "health";

        /// `quantization/model/{name}/quantize?quantization_level={level}`
        pub fn quantize(model_name: &str, level: &str) -> String {
            format!(
                "quantization/model/{}/quantize?quantization_level={}",
                urlencoding::encode(model_name),
                urlencoding::encode(level)
            )
        }

        /// `quantization/model/{name}/quantization-options`
        pub fn quantization_options(model_name: &str) -> String {
            format!(
                "quantization/model/{}/quantization-options",
                urlencoding::encode(model_name)
            )
        }
    }

    // =============================================================================
    // UI
    // =============================================================================

    /// Lifetime of a transient notification (seconds).
    pub const NOTIFICATION_TTL_SECS: u64 = 5;

    /// GPU free-memory percentage below which a card is styled as danger.
    pub const GPU_DANGER_PERCENT: f64 = 20.0;

    /// GPU free-memory percentage below which a card is styled as warning.
    pub const GPU_WARNING_PERCENT: f64 = 40.0;

    /// Prefix of Hugging Face cache directory names (`models--org--name`).
    pub const CACHE_DIR_PREFIX: &str = "models--";

    /// Separator used in cache directory names in place of `/`.
    pub const CACHE_DIR_SEPARATOR: &str = "--";

    /// Quantization level used when none is chosen.
    pub const DEFAULT_QUANTIZATION_LEVEL: &str = "8bit";

    // =============================================================================
    // SERVICE MANAGER
    // =============================================================================

    pub mod service {
        /// Default Windows service name of the AI server.
        pub const DEFAULT_SERVICE_NAME: &str = "TamivlaAIServer";

        /// Default service manager executable.
        pub const DEFAULT_NSSM_PATH: &str = "nssm";

        /// Default directory receiving the service's rotated stdout/stderr.
        pub const DEFAULT_LOG_DIR: &str = "storage/logs";

        pub const STDOUT_LOG: &str = "service_stdout.log";
        pub const STDERR_LOG: &str = "service_stderr.log";

        /// Daily rotation.
        pub const ROTATE_SECONDS: u64 = 86_400;
    }
}

#[cfg(test)]
mod tests {
    use super::cli_consts::endpoints;

    #[test]
    fn test_model_names_are_encoded_into_paths() {
        assert_eq!(
            endpoints::quantize("Qwen/Qwen2.5-7B-Instruct", "4bit"),
            "quantization/model/Qwen%2FQwen2.5-7B-Instruct/quantize?quantization_level=4bit"
        );
        assert_eq!(
            endpoints::quantization_options("google/flan-t5-large"),
            "quantization/model/google%2Fflan-t5-large/quantization-options"
        );
    }
}
