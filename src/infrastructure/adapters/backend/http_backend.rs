//! HTTP Inference Backend - 调用外部推理服务
//!
//! 实现 InferenceBackendPort trait，模型权重由 GPU 推理服务加载和执行
//!
//! 推理服务 API:
//! POST {base}/api/models/load       {"kind", "model_id", "source", "dtype", "device", "cache_dir", "options"} → {"handle": "..."}
//! POST {base}/api/music/generate    {"handle", "prompt", "lyrics", "audio_duration", "infer_step", "guidance_scale"} → audio/wav
//! GET  {base}/api/models/{handle}/health
//! GET  {base}/health

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    BackendError, InferenceBackendPort, ModelHandlePort, MusicGenerationParams, MusicPipelinePort,
};
use crate::domain::{ModelDescriptor, ModelSpec};

/// 加载模型响应
#[derive(Debug, Deserialize)]
struct LoadModelResponse {
    handle: String,
}

/// 音乐生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct GenerateMusicRequest<'a> {
    handle: &'a str,
    prompt: &'a str,
    lyrics: &'a str,
    audio_duration: f64,
    infer_step: u32,
    guidance_scale: f64,
}

/// HTTP 推理后端配置
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// 推理服务基础 URL
    pub base_url: String,
    /// 推理请求超时时间（秒）
    pub timeout_secs: u64,
    /// 模型加载超时时间（秒），大模型首次下载可能很慢
    pub load_timeout_secs: u64,
    /// 访问令牌（来自平台托管的 secret）
    pub auth_token: Option<String>,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            timeout_secs: 600,
            load_timeout_secs: 1800,
            auth_token: None,
        }
    }
}

impl HttpBackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// 后端连接信息，由后端和它创建的所有句柄共享
#[derive(Clone)]
struct Endpoint {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    async fn is_healthy(&self, path: &str) -> bool {
        match self.get(path).timeout(Duration::from_secs(5)).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

fn map_send_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::NetworkError(format!("Cannot connect to inference backend: {}", e))
    } else {
        BackendError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(BackendError::ServiceError(format!(
        "HTTP {}: {}",
        status, error_text
    )))
}

/// HTTP 推理后端
pub struct HttpInferenceBackend {
    endpoint: Endpoint,
    load_timeout: Duration,
}

impl HttpInferenceBackend {
    /// 创建新的 HTTP 推理后端
    pub fn new(config: HttpBackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::NetworkError(e.to_string()))?;

        Ok(Self {
            endpoint: Endpoint {
                client,
                base_url: config.base_url,
                auth_token: config.auth_token,
            },
            load_timeout: Duration::from_secs(config.load_timeout_secs),
        })
    }

    async fn load(&self, spec: &ModelSpec) -> Result<ModelDescriptor, BackendError> {
        tracing::debug!(
            url = %self.endpoint.url("/api/models/load"),
            kind = %spec.kind,
            model_id = %spec.model_id,
            "Sending model load request"
        );

        let response = self
            .endpoint
            .post("/api/models/load")
            .timeout(self.load_timeout)
            .json(spec)
            .send()
            .await
            .map_err(map_send_error)?;

        let body: LoadModelResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Bad load response: {}", e)))?;

        if body.handle.is_empty() {
            return Err(BackendError::InvalidResponse(
                "Backend returned an empty handle".to_string(),
            ));
        }

        Ok(ModelDescriptor::from_spec(body.handle, spec))
    }
}

#[async_trait]
impl InferenceBackendPort for HttpInferenceBackend {
    async fn load_music_pipeline(
        &self,
        spec: &ModelSpec,
    ) -> Result<Arc<dyn MusicPipelinePort>, BackendError> {
        let descriptor = self.load(spec).await?;
        Ok(Arc::new(HttpMusicPipeline {
            endpoint: self.endpoint.clone(),
            descriptor,
        }))
    }

    async fn load_model(&self, spec: &ModelSpec) -> Result<Arc<dyn ModelHandlePort>, BackendError> {
        let descriptor = self.load(spec).await?;
        Ok(Arc::new(HttpModelHandle {
            endpoint: self.endpoint.clone(),
            descriptor,
        }))
    }

    async fn health_check(&self) -> bool {
        self.endpoint.is_healthy("/health").await
    }
}

/// 远程模型句柄
struct HttpModelHandle {
    endpoint: Endpoint,
    descriptor: ModelDescriptor,
}

#[async_trait]
impl ModelHandlePort for HttpModelHandle {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn health_check(&self) -> bool {
        let path = format!("/api/models/{}/health", self.descriptor.handle);
        self.endpoint.is_healthy(&path).await
    }
}

/// 远程音乐生成管线
struct HttpMusicPipeline {
    endpoint: Endpoint,
    descriptor: ModelDescriptor,
}

#[async_trait]
impl ModelHandlePort for HttpMusicPipeline {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn health_check(&self) -> bool {
        let path = format!("/api/models/{}/health", self.descriptor.handle);
        self.endpoint.is_healthy(&path).await
    }
}

#[async_trait]
impl MusicPipelinePort for HttpMusicPipeline {
    async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError> {
        let request = GenerateMusicRequest {
            handle: &self.descriptor.handle,
            prompt: &params.prompt,
            lyrics: &params.lyrics,
            audio_duration: params.audio_duration,
            infer_step: params.infer_step,
            guidance_scale: params.guidance_scale,
        };

        tracing::debug!(
            url = %self.endpoint.url("/api/music/generate"),
            handle = %self.descriptor.handle,
            audio_duration = params.audio_duration,
            "Sending music generate request"
        );

        let response = self
            .endpoint
            .post("/api/music/generate")
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let audio_data = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        if audio_data.is_empty() {
            return Err(BackendError::InvalidResponse(
                "Backend returned empty audio".to_string(),
            ));
        }

        tokio::fs::write(&params.save_path, &audio_data)
            .await
            .map_err(|e| BackendError::IoError(e.to_string()))?;

        tracing::info!(
            handle = %self.descriptor.handle,
            audio_size = audio_data.len(),
            path = %params.save_path.display(),
            "Music generation completed"
        );

        Ok(())
    }
}
