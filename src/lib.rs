//! Jukebox - 音乐生成演示服务
//!
//! 架构设计: CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Track: 曲目预设
//! - Model: 模型描述
//!
//! 应用层 (application/):
//! - Ports: InferenceBackend, MusicPipeline, AudioStaging, AudioProbe
//! - Commands: 模型加载、曲目生成
//! - Queries: 已加载模型状态
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 推理后端（HTTP / Fake）、文件暂存、WAV 校验

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
