use crate::models::barcode;
use crate::models::error::PantryError;
use crate::models::record::PantryRecord;
use crate::traits::transport::{HttpMethod, HttpRequest, HttpResponse, PantryTransport};

/// Statuses a DELETE may answer with on success.
const DELETE_SUCCESS: [u16; 3] = [200, 202, 204];

/// Whether an error body reports a duplicate barcode.
///
/// The API has no structured error codes, so this sniffs the text for
/// "duplicate" or "already exists". Any wording change on the server
/// turns duplicates into plain `Api` errors.
pub fn is_duplicate_response(body: &str) -> bool {
    let body = body.to_lowercase();
    body.contains("duplicate") || body.contains("already exists")
}

/// Blocking calls against the pantry collection endpoint.
///
/// ```text
/// GET    {base}          → [PantryRecord]
/// POST   {base}          ← PantryRecord (id ignored)
/// PUT    {base}?id={id}  ← PantryRecord
/// DELETE {base}/{id}
/// ```
#[derive(Debug)]
pub struct PantryApi<T: PantryTransport> {
    transport: T,
    base_url: String,
}

impl<T: PantryTransport> PantryApi<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn list(&self) -> Result<Vec<PantryRecord>, PantryError> {
        let response = self.send(HttpMethod::Get, self.base_url.clone(), None)?;
        if !response.is_success() {
            return Err(api_error(response));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| PantryError::Transport(format!("decoding error: {e}")))
    }

    pub fn create(&self, record: &PantryRecord) -> Result<(), PantryError> {
        let body = encode(record)?;
        let response = self.send(HttpMethod::Post, self.base_url.clone(), Some(body))?;
        if response.is_success() {
            return Ok(());
        }
        if is_duplicate_response(&response.body) {
            return Err(PantryError::DuplicateBarcode {
                code: barcode::normalize(record.barcode()),
            });
        }
        Err(api_error(response))
    }

    /// The identifier travels as a query parameter, not a path segment.
    pub fn update(&self, record: &PantryRecord) -> Result<(), PantryError> {
        let body = encode(record)?;
        let url = format!("{}?id={}", self.base_url, record.id);
        let response = self.send(HttpMethod::Put, url, Some(body))?;
        if response.is_success() {
            Ok(())
        } else {
            Err(api_error(response))
        }
    }

    pub fn delete(&self, id: i64) -> Result<(), PantryError> {
        let url = format!("{}/{}", self.base_url, id);
        let response = self.send(HttpMethod::Delete, url, None)?;
        if DELETE_SUCCESS.contains(&response.status) {
            Ok(())
        } else {
            Err(api_error(response))
        }
    }

    fn send(
        &self,
        method: HttpMethod,
        url: String,
        body: Option<String>,
    ) -> Result<HttpResponse, PantryError> {
        let request = HttpRequest { method, url, body };
        log::debug!("{} {}", request.method, request.url);
        let response = self.transport.send(&request).map_err(|e| {
            log::warn!("{} {} failed: {}", request.method, request.url, e);
            e
        })?;
        log::debug!("{} {} → {}", request.method, request.url, response.status);
        Ok(response)
    }
}

fn encode(record: &PantryRecord) -> Result<String, PantryError> {
    serde_json::to_string(record)
        .map_err(|e| PantryError::Transport(format!("failed to encode record: {e}")))
}

fn api_error(response: HttpResponse) -> PantryError {
    PantryError::Api {
        status: response.status,
        detail: response.body,
    }
}
