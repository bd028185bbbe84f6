//! Multipart POST client for the scan service.

use super::{ScanService, VcfUpload};
use crate::error::MutaviewError;
use crate::mutation::ScanResponse;
use crate::options::ScanOptions;

/// Scan service reached over HTTP with a single multipart POST.
///
/// There is no retry: one failed request is one failed scan.
#[derive(Debug, Clone)]
pub struct HttpScanService {
    endpoint: String,
    file_field: String,
}

impl HttpScanService {
    /// Client for the endpoint in `options`.
    #[must_use]
    pub fn new(options: &ScanOptions) -> Self {
        Self {
            endpoint: options.endpoint.clone(),
            file_field: options.file_field.clone(),
        }
    }
}

impl ScanService for HttpScanService {
    fn scan(&self, upload: &VcfUpload) -> Result<ScanResponse, MutaviewError> {
        let contents = upload.read()?;
        let boundary = format!("mutaview-{:016x}", rand::random::<u64>());
        let body = multipart_body(
            &boundary,
            &self.file_field,
            upload.file_name(),
            &contents,
        );

        let text = ureq::post(&self.endpoint)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .send(&body[..])
            .map_err(|e| {
                MutaviewError::Scan(format!("POST {}: {e}", self.endpoint))
            })?
            .into_body()
            .read_to_string()
            .map_err(|e| MutaviewError::Scan(format!("reading body: {e}")))?;

        let response: ScanResponse = serde_json::from_str(&text)
            .map_err(|e| MutaviewError::Scan(format!("decoding body: {e}")))?;
        log::info!(
            "scan of {} finished: status {:?}, {} results",
            upload.file_name(),
            response.status,
            response.results.len()
        );
        Ok(response)
    }
}

/// `multipart/form-data` body carrying one file part.
fn multipart_body(
    boundary: &str,
    field: &str,
    file_name: &str,
    contents: &[u8],
) -> Vec<u8> {
    let mut body = Vec::with_capacity(contents.len() + 256);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; \
             filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
