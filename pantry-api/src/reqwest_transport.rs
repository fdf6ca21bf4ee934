use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use pantry_core::{HttpMethod, HttpRequest, HttpResponse, PantryError, PantryTransport};

/// `PantryTransport` backed by a blocking reqwest client.
///
/// Runs on the short-lived `pantry-*` threads, never on the control thread.
/// Requests use reqwest's default timeouts and are never retried.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, PantryError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PantryError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PantryTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, PantryError> {
        let mut builder = self.client.request(method(request.method), &request.url);
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| PantryError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| PantryError::Transport(format!("failed to read response: {e}")))?;
        Ok(HttpResponse::new(status, body))
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}
