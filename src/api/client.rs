//! AI Server API Client
//!
//! A thin JSON-over-HTTP client for the dashboard endpoints. One call, one
//! request: no retry, no caching, no dedup of concurrent identical calls.

use crate::api::DashboardApi;
use crate::api::error::ApiError;
use crate::consts::cli_consts::{CONNECT_TIMEOUT_SECS, endpoints};
use crate::error_classifier::ErrorClassifier;
use crate::types::{
    AnalysisResponse, GpuInventory, Health, LoadedModels, ModelActionResponse, ModelDiscovery,
    PopularModelsResponse, QuantizationOptions, QuantizeResponse, QuantizedModelsResponse,
};
use reqwest::{Client, ClientBuilder, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("quant-dash/", env!("CARGO_PKG_VERSION"));

/// Method, body and extra headers for a single call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::get()
        }
    }

    pub fn post_json(body: serde_json::Value) -> Self {
        Self {
            body: Some(body),
            ..Self::post()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    classifier: ErrorClassifier,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            classifier: ErrorClassifier::new(),
        })
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    /// Performs one call and decodes the JSON body.
    ///
    /// Failures are logged before they are returned so that every failed call
    /// leaves a trace even when the caller only renders a short message.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let options = options.with_header("X-Request-Id", &request_id);
        let method = options.method.clone();
        let result = self.send(endpoint, options).await;
        if let Err(e) = &result {
            let level: log::Level = self.classifier.classify_api_error(e).into();
            log::log!(level, "{} /{} [{}] failed: {}", method, endpoint, request_id, e);
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        log::debug!("{} {}", options.method, url);

        let mut builder = self
            .client
            .request(options.method, &url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP);
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait::async_trait]
impl DashboardApi for ApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn gpu_info(&self) -> Result<GpuInventory, ApiError> {
        self.request(endpoints::GPU_INFO, RequestOptions::get()).await
    }

    async fn analyze(&self, model_name: &str) -> Result<AnalysisResponse, ApiError> {
        let body = json!({ "model_name": model_name });
        self.request(endpoints::ANALYZE, RequestOptions::post_json(body))
            .await
    }

    async fn popular_models(&self) -> Result<PopularModelsResponse, ApiError> {
        self.request(endpoints::POPULAR_MODELS, RequestOptions::get())
            .await
    }

    async fn quantize(
        &self,
        model_name: &str,
        level: &str,
    ) -> Result<QuantizeResponse, ApiError> {
        let endpoint = endpoints::quantize(model_name, level);
        self.request(&endpoint, RequestOptions::post()).await
    }

    async fn quantization_options(
        &self,
        model_name: &str,
    ) -> Result<QuantizationOptions, ApiError> {
        let endpoint = endpoints::quantization_options(model_name);
        self.request(&endpoint, RequestOptions::get()).await
    }

    async fn quantized_models(&self) -> Result<QuantizedModelsResponse, ApiError> {
        self.request(endpoints::QUANTIZED_MODELS, RequestOptions::get())
            .await
    }

    async fn discover_models(&self) -> Result<ModelDiscovery, ApiError> {
        self.request(endpoints::MODEL_DISCOVERY, RequestOptions::get())
            .await
    }

    async fn loaded_models(&self) -> Result<LoadedModels, ApiError> {
        self.request(endpoints::LOADED_MODELS, RequestOptions::get())
            .await
    }

    async fn load_model(&self, model_name: &str) -> Result<ModelActionResponse, ApiError> {
        let body = json!({ "model_name": model_name });
        self.request(endpoints::LOAD_MODEL, RequestOptions::post_json(body))
            .await
    }

    async fn unload_model(&self, model_name: &str) -> Result<ModelActionResponse, ApiError> {
        let body = json!({ "model_name": model_name });
        self.request(endpoints::UNLOAD_MODEL, RequestOptions::post_json(body))
            .await
    }

    async fn health(&self) -> Result<Health, ApiError> {
        self.request(endpoints::HEALTH, RequestOptions::get()).await
    }
}

#[cfg(test)]
/// These are ignored by default since they require a running AI server.
mod live_server_tests {
    use crate::api::DashboardApi;
    use crate::consts::cli_consts::DEFAULT_SERVER_URL;

    #[tokio::test]
    #[ignore] // This test requires a live AI server.
    /// Should report GPU availability.
    async fn test_gpu_info() {
        let client = super::ApiClient::new(DEFAULT_SERVER_URL).unwrap();
        match client.gpu_info().await {
            Ok(info) => println!("GPU available: {}", info.available),
            Err(e) => panic!("Failed to get GPU info: {}", e),
        }
    }

    #[tokio::test]
    #[ignore] // This test requires a live AI server.
    /// Should analyze a known model.
    async fn test_analyze() {
        let client = super::ApiClient::new(DEFAULT_SERVER_URL).unwrap();
        match client.analyze("Qwen/Qwen2.5-7B-Instruct").await {
            Ok(analysis) => println!("Best: {}", analysis.best_recommendation.level),
            Err(e) => panic!("Failed to analyze model: {}", e),
        }
    }
}
