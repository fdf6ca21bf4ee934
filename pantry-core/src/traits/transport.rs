use std::fmt;

use crate::models::error::PantryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        })
    }
}

/// One request to the pantry API. A body is always JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP round trip.
///
/// Implemented by `pantry_api::ReqwestTransport`. Returns `Err` only for
/// transport failures (`PantryError::Transport`); every status code comes
/// back as a response for the client to interpret. No retries.
pub trait PantryTransport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, PantryError>;
}

impl<T: PantryTransport + ?Sized> PantryTransport for std::sync::Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, PantryError> {
        (**self).send(request)
    }
}
