//! Jukebox - 音乐生成演示服务
//!
//! 冷启动加载三个模型，然后对外提供固定曲目的生成接口

use std::sync::Arc;

use jukebox::application::{
    AudioProbePort, AudioStagingPort, InferenceBackendPort, LoadModelsHandler,
};
use jukebox::config::{load_config, print_config, AppConfig, BackendKind};
use jukebox::infrastructure::http::{AppState, HttpServer, ServerConfig};
use jukebox::infrastructure::{
    FakeBackendConfig, FakeInferenceBackend, FileAudioStaging, HttpBackendConfig,
    HttpInferenceBackend, WavProbe,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Jukebox - 音乐生成服务 v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 暂存目录，清理上次进程遗留的文件
    let staging = Arc::new(FileAudioStaging::new(&config.generation.staging_dir).await?);
    let swept = staging.sweep().await?;
    if swept > 0 {
        tracing::warn!(count = swept, "Removed stale staged audio files");
    }

    let backend = create_backend(&config)?;
    if !backend.health_check().await {
        tracing::warn!(kind = %config.backend.kind, "Inference backend health check failed");
    }

    // 冷启动加载，任何一个失败都终止启动
    let loader = LoadModelsHandler::new(backend);
    let models = loader
        .handle(config.models.load_command())
        .await
        .map_err(|e| anyhow::anyhow!("Model loading failed: {}", e))?;

    let probe: Arc<dyn AudioProbePort> = Arc::new(WavProbe::new());
    let state = AppState::new(
        models,
        staging,
        probe,
        config.generation.preset.clone(),
        config.generation.max_concurrent,
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},jukebox={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn create_backend(config: &AppConfig) -> anyhow::Result<Arc<dyn InferenceBackendPort>> {
    match config.backend.kind {
        BackendKind::Http => {
            let mut backend_config =
                HttpBackendConfig::new(&config.backend.url).with_timeout(config.backend.timeout_secs);
            backend_config.load_timeout_secs = config.backend.load_timeout_secs;
            if let Some(token) = &config.backend.auth_token {
                backend_config = backend_config.with_auth_token(token);
            }
            Ok(Arc::new(HttpInferenceBackend::new(backend_config)?))
        }
        BackendKind::Fake => {
            tracing::warn!("Using fake inference backend, generated audio is synthetic");
            Ok(Arc::new(FakeInferenceBackend::new(FakeBackendConfig::default())))
        }
    }
}
