use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::{fs, path::Path, path::PathBuf, time::Duration};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

pub fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<Duration> {
    let value = value?.to_str().ok()?.trim();
    let secs = value.parse::<u64>().ok()?;
    Some(Duration::from_secs(secs))
}

pub fn truncate_for_log(text: &str) -> String {
    let trimmed = text.trim();
    let max_len = 300usize;
    if trimmed.len() <= max_len {
        return trimmed.to_string();
    }
    let mut end = max_len;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

pub fn min_interval_for_rate(requests_per_second: u32) -> Duration {
    if requests_per_second == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs_f64(1.0 / requests_per_second as f64)
    }
}

pub async fn wait_for_rate_slot(next_slot: &Mutex<Instant>, min_interval: Duration) {
    if min_interval.is_zero() {
        return;
    }
    let mut guard = next_slot.lock().await;
    let now = Instant::now();
    if *guard > now {
        sleep(*guard - now).await;
    }
    *guard = Instant::now() + min_interval;
}

pub fn write_atomically(output_path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = prepare_tmp_path(output_path)?;
    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed writing {}", tmp_path.display()))?;
    commit_tmp_path(&tmp_path, output_path)
}

pub fn prepare_tmp_path(output_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating parent directory {}", parent.display()))?;
    }
    let file_name = output_path
        .file_name()
        .and_then(|x| x.to_str())
        .context("Output path has no file name")?;
    Ok(output_path.with_file_name(format!("{file_name}.tmp")))
}

pub fn commit_tmp_path(tmp_path: &Path, output_path: &Path) -> Result<()> {
    fs::rename(tmp_path, output_path).with_context(|| {
        format!(
            "Failed moving temp file {} to {}",
            tmp_path.display(),
            output_path.display()
        )
    })
}
