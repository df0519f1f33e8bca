//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping       GET   存活检查
//! - /api/models     GET   已加载模型及健康状态
//! - /api/generate   POST  生成固定曲目，返回 {"audio_data": "<base64>"}

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/models", get(handlers::list_models))
        .route("/generate", post(handlers::generate_track))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    use crate::application::{
        BackendError, LoadModelsCommand, LoadModelsHandler, LoadedModels, ModelHandlePort,
        MusicGenerationParams, MusicPipelinePort,
    };
    use crate::domain::{ModelDescriptor, ModelKind, ModelSource, ModelSpec, TrackPreset};
    use crate::infrastructure::adapters::{
        FakeBackendConfig, FakeInferenceBackend, FileAudioStaging, WavProbe,
    };

    async fn fake_models() -> LoadedModels {
        let handler = LoadModelsHandler::new(Arc::new(FakeInferenceBackend::new(
            FakeBackendConfig::default(),
        )));
        handler
            .handle(LoadModelsCommand {
                music: ModelSpec::new(ModelKind::Music, "/models", ModelSource::Local),
                llm: ModelSpec::new(ModelKind::Llm, "Qwen/Qwen2-72B-Instruct", ModelSource::Hub),
                image: ModelSpec::new(ModelKind::Image, "stabilityai/sdxl-turbo", ModelSource::Hub),
                require_local_checkpoint: false,
            })
            .await
            .unwrap()
    }

    async fn test_app(models: LoadedModels) -> (Router, TempDir) {
        let dir = tempdir().unwrap();
        let staging = Arc::new(FileAudioStaging::new(dir.path()).await.unwrap());
        let state = AppState::new(
            models,
            staging,
            Arc::new(WavProbe::new()),
            TrackPreset {
                audio_duration: 0.25,
                ..Default::default()
            },
            1,
        );
        (create_routes().with_state(Arc::new(state)), dir)
    }

    fn staged_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_generate() -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_returns_base64_wav() {
        let (app, dir) = test_app(fake_models().await).await;

        let response = app.oneshot(post_generate()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let audio_data = body["audio_data"].as_str().unwrap();
        assert!(!audio_data.is_empty());

        let wav = STANDARD.decode(audio_data).unwrap();
        let reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        assert_eq!(reader.spec().sample_rate, 48000);
        assert!(reader.duration() > 0);

        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_generate_ignores_request_body() {
        let (app, dir) = test_app(fake_models().await).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"prompt": "ignored"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_repeated_generate_leaves_no_files() {
        let (app, dir) = test_app(fake_models().await).await;

        let mut payloads = Vec::new();
        for _ in 0..3 {
            let response = app.clone().oneshot(post_generate()).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            payloads.push(json_body(response).await["audio_data"].clone());
        }
        assert!(payloads.iter().all(|p| p.as_str().map_or(false, |s| !s.is_empty())));
        assert_eq!(staged_files(&dir), 0);
    }

    struct BrokenPipeline {
        descriptor: ModelDescriptor,
    }

    #[async_trait]
    impl ModelHandlePort for BrokenPipeline {
        fn descriptor(&self) -> &ModelDescriptor {
            &self.descriptor
        }
    }

    #[async_trait]
    impl MusicPipelinePort for BrokenPipeline {
        async fn generate(&self, params: &MusicGenerationParams) -> Result<(), BackendError> {
            tokio::fs::write(&params.save_path, b"half a file").await.unwrap();
            Err(BackendError::Timeout)
        }
    }

    #[tokio::test]
    async fn test_generate_failure_returns_503_and_cleans_up() {
        let mut models = fake_models().await;
        let descriptor = models.music.descriptor().clone();
        models.music = Arc::new(BrokenPipeline { descriptor });
        let (app, dir) = test_app(models).await;

        let response = app.oneshot(post_generate()).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["errno"], 503);
        assert!(body["error"].as_str().unwrap().contains("timeout"));
        assert!(body["data"].is_null());

        assert_eq!(staged_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_list_models() {
        let (app, _dir) = test_app(fake_models().await).await;

        let request = Request::builder()
            .uri("/api/models")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["errno"], 0);
        let models = body["data"]["models"].as_array().unwrap();
        let kinds: Vec<&str> = models.iter().map(|m| m["kind"].as_str().unwrap()).collect();
        assert_eq!(kinds, vec!["music", "llm", "image"]);
        assert!(models.iter().all(|m| m["healthy"] == true));
    }

    #[tokio::test]
    async fn test_ping() {
        let (app, _dir) = test_app(fake_models().await).await;

        let request = Request::builder()
            .uri("/api/ping")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["models_loaded"], 3);
    }

    #[tokio::test]
    async fn test_generate_rejects_get() {
        let (app, _dir) = test_app(fake_models().await).await;

        let request = Request::builder()
            .uri("/api/generate")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
