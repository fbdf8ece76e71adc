use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::services::config::ClientConfig;
use crate::services::http::{self, HttpError};

use super::types::{FilePayload, GatewayRequest, ProgressSender, ServiceId};

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Seam between the dispatcher and the network.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Issue exactly one call. `progress` receives request-body progress for
    /// file uploads and is ignored otherwise.
    async fn send(
        &self,
        service: ServiceId,
        request: GatewayRequest,
        bearer: Option<String>,
        progress: Option<ProgressSender>,
    ) -> Result<Value, HttpError>;
}

pub struct HttpGateway {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http_client: http::build_client(config.timeout),
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, service: ServiceId) -> String {
        http::endpoint(&self.base_url, &format!("gateway/{}", service))
    }
}

fn file_part(file: FilePayload, progress: Option<ProgressSender>) -> Result<Part, HttpError> {
    let total = file.size();
    let FilePayload {
        name,
        mime_type,
        data,
    } = file;

    let part = match progress {
        None => Part::bytes(data),
        Some(tx) => {
            if total == 0 {
                let _ = tx.send(100);
            }
            let chunks: Vec<Vec<u8>> = data
                .chunks(UPLOAD_CHUNK_BYTES)
                .map(<[u8]>::to_vec)
                .collect();
            let mut sent: u64 = 0;
            // Progress is reported as reqwest pulls each chunk off the body.
            let stream = futures_util::stream::iter(chunks).map(move |chunk| {
                sent += chunk.len() as u64;
                let percent = (sent.saturating_mul(100) / total.max(1)).min(100) as u8;
                let _ = tx.send(percent);
                Ok::<_, std::io::Error>(chunk)
            });
            Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
        }
    };

    part.file_name(name)
        .mime_str(&mime_type)
        .map_err(|e| HttpError::transport(format!("Invalid file type: {}", e)))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(
        &self,
        service: ServiceId,
        request: GatewayRequest,
        bearer: Option<String>,
        progress: Option<ProgressSender>,
    ) -> Result<Value, HttpError> {
        let url = self.url(service);
        log::info!("POST {} ({})", url, request.kind());

        let builder = self.http_client.post(&url);
        let builder = match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let builder = match request {
            GatewayRequest::Text(text) => builder.multipart(Form::new().text("text", text)),
            GatewayRequest::File(file) => {
                builder.multipart(Form::new().part("file", file_part(file, progress)?))
            }
            GatewayRequest::Journal(submission) => builder.json(&submission),
        };

        let response = builder.send().await.map_err(|e| {
            log::warn!("Gateway request to {} failed: {}", service, e);
            HttpError::from(e)
        })?;

        http::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_per_service() {
        let config = ClientConfig::default().with_base_url("http://backend.test/");
        let gateway = HttpGateway::new(&config);
        assert_eq!(
            gateway.url(ServiceId::Service2),
            "http://backend.test/gateway/service2"
        );
    }

    #[test]
    fn test_file_part_rejects_bad_mime() {
        let file = FilePayload {
            name: "a.pdf".to_string(),
            mime_type: "not a mime".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(matches!(
            file_part(file, None),
            Err(HttpError::Transport { .. })
        ));
    }
}
