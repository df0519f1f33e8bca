//! Jukebox 命令行客户端
//!
//! 调用生成接口，解码返回的 base64 音频并写入文件
//!
//! # Usage
//!
//! ```sh
//! jukebox-client --output /tmp/rap.wav
//! jukebox-client --url http://gpu-host:8000/api/generate --output rap.wav --timeout-secs 900
//! ```

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Parser;
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "jukebox-client", about = "Generate the preset track via a jukebox server")]
struct Args {
    /// Generation endpoint
    #[arg(long, default_value = "http://localhost:8000/api/generate")]
    url: String,

    /// Output WAV file path
    #[arg(long, default_value = "output.wav")]
    output: PathBuf,

    /// Timeout in seconds to wait for generation
    #[arg(long, default_value = "900")]
    timeout_secs: u64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    audio_data: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    eprintln!("requesting {} ...", args.url);

    let response = client
        .post(&args.url)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", args.url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        bail!("server returned {status}: {message}");
    }

    let body: GenerateResponse = response
        .json()
        .await
        .context("failed to parse server response")?;

    if body.audio_data.is_empty() {
        bail!("server returned empty audio_data");
    }

    let audio = STANDARD
        .decode(body.audio_data.as_bytes())
        .context("audio_data is not valid base64")?;

    tokio::fs::write(&args.output, &audio)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    eprintln!("wrote {} bytes → {}", audio.len(), args.output.display());
    println!("{}", args.output.display());

    Ok(())
}
