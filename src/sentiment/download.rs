// Fetches the ONNX sentiment model into the local model directory.
//
// Source: distilbert-base-uncased-finetuned-sst-2-english on HuggingFace.
// Each file streams into "<name>.part" and is renamed into place once
// complete, so an interrupted download never leaves a truncated model.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const REPO_URL: &str =
    "https://huggingface.co/distilbert/distilbert-base-uncased-finetuned-sst-2-english/resolve/main";

/// Local file names inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// One downloadable file: where it lives in the repo and where it lands locally.
struct ModelAsset {
    remote: &'static str,
    local: &'static str,
    /// Large files get a byte progress bar.
    large: bool,
}

const ASSETS: [ModelAsset; 2] = [
    ModelAsset {
        remote: "tokenizer.json",
        local: TOKENIZER_FILE,
        large: false,
    },
    ModelAsset {
        remote: "onnx/model.onnx",
        local: MODEL_FILE,
        large: true,
    },
];

/// Platform data directory for the model, e.g. ~/.local/share/genlex/models on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("genlex")
        .join("models")
}

pub fn model_files_present(dir: &Path) -> bool {
    ASSETS.iter().all(|asset| dir.join(asset.local).exists())
}

/// Download whichever model files are missing from `dir`.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    let client = reqwest::Client::new();
    for asset in &ASSETS {
        let dest = dir.join(asset.local);
        if dest.exists() {
            info!(file = asset.local, "Model file already present, skipping");
            println!("  {} (already exists)", asset.local);
            continue;
        }

        println!("  Downloading {}...", asset.local);
        let url = format!("{REPO_URL}/{}", asset.remote);
        fetch_to(&client, &url, &dest, asset.large).await?;
    }
    Ok(())
}

async fn fetch_to(client: &reqwest::Client, url: &str, dest: &Path, large: bool) -> Result<()> {
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to request {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Download of {} failed with status {}", url, response.status());
    }

    let pb = if large {
        progress_bar(response.content_length())
    } else {
        ProgressBar::hidden()
    };

    let partial = partial_path(dest);
    let file = File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;
    let mut writer = BufWriter::new(file);

    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read body of {url}"))?
    {
        writer
            .write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        written += chunk.len() as u64;
        pb.set_position(written);
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", partial.display()))?;
    pb.finish_and_clear();

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;

    info!(url, bytes = written, dest = %dest.display(), "Downloaded model file");
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_under_genlex() {
        let dir = default_model_dir();
        assert!(dir.ends_with("genlex/models"), "got {}", dir.display());
    }

    #[test]
    fn test_model_files_present_needs_both_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!model_files_present(dir.path()));
        std::fs::write(dir.path().join(MODEL_FILE), b"fake").unwrap();
        assert!(!model_files_present(dir.path()));
        std::fs::write(dir.path().join(TOKENIZER_FILE), b"fake").unwrap();
        assert!(model_files_present(dir.path()));
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/models/model.onnx")),
            PathBuf::from("/models/model.onnx.part")
        );
    }
}
