//! `mailsort fetch-model`: download the sentence-transformer files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::{info, warn};

const MODEL_BASE_URL: &str = "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

/// Remote path and local file name of each required file.
pub const MODEL_FILES: [(&str, &str); 2] = [
    ("onnx/model.onnx", "model.onnx"),
    ("tokenizer.json", "tokenizer.json"),
];

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// Download every model file into `dir`, skipping files already present.
pub async fn fetch_model(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let client = reqwest::Client::new();
    let mut written = Vec::new();
    for (remote, local) in MODEL_FILES {
        let target = dir.join(local);
        if target.exists() {
            info!("{} already present, skipping", target.display());
            continue;
        }
        let url = format!("{}/{}", MODEL_BASE_URL, remote);
        let bytes = download_with_retries(&client, &url).await?;
        write_complete(&target, &bytes).await?;
        info!("Wrote {} ({} bytes)", target.display(), bytes.len());
        written.push(target);
    }
    Ok(written)
}

/// Write `bytes` to `<target>.part`, then rename over `target`, so an
/// interrupted write never leaves a truncated file at `target`.
async fn write_complete(target: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let mut part = target.as_os_str().to_owned();
    part.push(".part");
    let part = PathBuf::from(part);

    tokio::fs::write(&part, bytes)
        .await
        .with_context(|| format!("Failed to write {}", part.display()))?;
    tokio::fs::rename(&part, target)
        .await
        .with_context(|| format!("Failed to move {} into place", part.display()))?;
    Ok(())
}

async fn download_with_retries(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let mut attempt = 1;
    loop {
        match download(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!("Download of {} failed (attempt {}/{}): {}", url, attempt, MAX_ATTEMPTS, e);
                tokio::time::sleep(RETRY_DELAY * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e.context(format!("Giving up on {} after {} attempts", url, MAX_ATTEMPTS))),
        }
    }
}

async fn download(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    info!("Downloading {}", url);
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }
    Ok(response.bytes().await?.to_vec())
}
