use crate::csrf::{CSRF_HEADER, extract_csrf_token};
use crate::{CapturedFrame, EndpointConfig, VerificationEndpoint, VerificationResult, VerifyError, decode_response};
use reqwest::header::{ACCEPT, REFERER};
use reqwest::multipart::{Form, Part};
use tokio::sync::OnceCell;

/// Multipart field the image is sent in.
pub const IMAGE_FIELD: &str = "image";

/// File name given to the uploaded image.
pub const IMAGE_FILE_NAME: &str = "webcam_capture.jpg";

/// Verification endpoint reached over HTTP(S).
///
/// Posts to the page URL, the same address the verification page was served
/// from. The anti-forgery token is taken from the configuration or read once
/// from the page; the cookie store keeps the session and token cookies the
/// server sets along the way.
#[derive(Debug)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    config: EndpointConfig,
    token: OnceCell<String>,
}

impl HttpEndpoint {
    pub fn new(config: EndpointConfig) -> Result<Self, VerifyError> {
        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let token = match config.csrf_token() {
            Some(token) => OnceCell::new_with(Some(token.to_string())),
            None => OnceCell::new(),
        };

        Ok(Self {
            client,
            config,
            token,
        })
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// The anti-forgery token, fetching the page on first use.
    pub async fn csrf_token(&self) -> Result<&str, VerifyError> {
        let token = self
            .token
            .get_or_try_init(|| async {
                let url = self.config.page_url();
                log::debug!("fetching anti-forgery token from {url}");
                let html = self
                    .client
                    .get(url.clone())
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                extract_csrf_token(&html).ok_or_else(|| VerifyError::MissingToken(url.to_string()))
            })
            .await?;
        Ok(token.as_str())
    }

    async fn post_frame(&self, frame: &CapturedFrame) -> Result<(u16, Vec<u8>), VerifyError> {
        let token = self.csrf_token().await?;
        let url = self.config.page_url();

        let part = Part::bytes(frame.jpeg.clone())
            .file_name(IMAGE_FILE_NAME)
            .mime_str("image/jpeg")?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(url.clone())
            .header(CSRF_HEADER, token)
            // token-protected posts over HTTPS are rejected without a matching Referer
            .header(REFERER, url.as_str())
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

impl VerificationEndpoint for HttpEndpoint {
    async fn submit(&self, frame: &CapturedFrame) -> VerificationResult {
        log::info!(
            "submitting {}x{} frame ({} bytes) to {}",
            frame.width,
            frame.height,
            frame.jpeg.len(),
            self.config.page_url()
        );
        match self.post_frame(frame).await {
            Ok((status, body)) => {
                log::debug!("verification response: HTTP {status}, {} bytes", body.len());
                decode_response(status, &body)
            }
            Err(e) => {
                log::error!("verification request failed: {e}");
                VerificationResult::TransportError {
                    detail: e.to_string(),
                }
            }
        }
    }
}
