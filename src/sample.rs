// src/sample.rs
//
// Acquisition of the hosted sample binary. Failures are recoverable and
// carry remediation pointing at the manual download URL.

pub const SAMPLE_BINARY_DOWNLOAD_URL: &str =
    "https://github.com/th0jensen/bininspect/releases/latest/download/bininspect_wasm.wasm";

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Sample download failed ({status}).")]
    Http { status: u16 },
    #[error("Sample download failed ({0}).")]
    Network(#[from] reqwest::Error),
}

impl SampleError {
    /// User-facing message including the manual fallback path. The fallback
    /// URL comes from configuration so a mirror can be pointed at without
    /// rebuilding.
    pub fn remediation(&self, fallback_url: &str) -> String {
        format!(
            "Could not load the sample binary ({self}). Download it from {fallback_url} and upload it manually."
        )
    }
}

pub async fn fetch_sample(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, SampleError> {
    tracing::debug!("fetching sample binary from {}", url);
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!("sample download failed with status {}", status);
        return Err(SampleError::Http {
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;
    tracing::info!("sample binary downloaded ({} bytes)", bytes.len());
    Ok(bytes.to_vec())
}
