use crate::config::CsrfConfig;
use crate::error::{CsrfError, Result};
use crate::manager::{CsrfManager, ValidationReason};
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Request, Response, StatusCode};
use serde_json::json;

/// What the middleware did with a request that was allowed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsrfDecision {
    /// Nothing to check or issue
    Exempt,
    /// Safe request; a fresh token was issued for the session
    Issued(String),
    /// Protected request carried the session's current token
    Verified,
}

/// CSRF protection for `http` requests, backed by a [`CsrfManager`].
#[derive(Debug, Clone)]
pub struct CsrfMiddleware {
    manager: CsrfManager,
}

impl CsrfMiddleware {
    pub fn new(config: CsrfConfig) -> Self {
        Self::with_manager(CsrfManager::new(config))
    }

    /// Share an existing manager (and its store) with the middleware.
    pub fn with_manager(manager: CsrfManager) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &CsrfManager {
        &self.manager
    }

    fn config(&self) -> &CsrfConfig {
        self.manager.config()
    }

    /// Check if a request needs CSRF protection
    pub fn needs_protection(&self, method: &Method, path: &str) -> bool {
        if self.config().safe_methods.contains(method) {
            return false;
        }

        !self
            .config()
            .exclude_paths
            .iter()
            .any(|excluded| path.starts_with(excluded.as_str()))
    }

    /// Session key from the configured session header
    pub fn session_key(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.config().session_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Token from the header, else a JSON body field, else a form field.
    pub fn extract_token(&self, headers: &HeaderMap, body: &[u8]) -> Option<String> {
        self.token_from_header(headers)
            .or_else(|| self.token_from_body(body))
    }

    fn token_from_header(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(self.config().header_name.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    fn token_from_body(&self, body: &[u8]) -> Option<String> {
        let field = self.config().field_name.as_str();

        if let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) {
            if let Some(token) = json.get(field) {
                return token.as_str().map(str::to_string);
            }
        }

        if let Ok(form) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            return form
                .into_iter()
                .find(|(key, _)| key == field)
                .map(|(_, value)| value);
        }

        None
    }

    /// Issue on safe requests, verify on protected ones.
    ///
    /// A rejection comes back as [`CsrfError::Rejected`]; turn it into a
    /// response with [`rejection_response`](Self::rejection_response).
    pub fn process<B: AsRef<[u8]>>(&self, request: &Request<B>) -> Result<CsrfDecision> {
        let method = request.method();
        let path = request.uri().path();
        let session_key = self.session_key(request.headers());

        if self.config().safe_methods.contains(method) {
            return match session_key {
                Some(key) => Ok(CsrfDecision::Issued(self.manager.issue(&key)?)),
                None => Ok(CsrfDecision::Exempt),
            };
        }

        if !self.needs_protection(method, path) {
            return Ok(CsrfDecision::Exempt);
        }

        let reason = match session_key {
            None => ValidationReason::NoTokenFound,
            Some(key) => {
                let provided = self
                    .extract_token(request.headers(), request.body().as_ref())
                    .unwrap_or_default();
                let validation = self.manager.validate(&key, &provided);
                if validation.valid {
                    return Ok(CsrfDecision::Verified);
                }
                validation.reason
            }
        };

        bastion_log::security_event(
            "csrf_rejected",
            &json!({ "method": method.as_str(), "path": path, "reason": reason }),
        );
        Err(CsrfError::Rejected(reason))
    }

    /// 403 JSON response for a failed validation.
    pub fn rejection_response(&self, reason: ValidationReason) -> Response<Vec<u8>> {
        let body = json!({
            "success": false,
            "message": "CSRF token validation failed",
            "reason": reason,
            "security": "CSRF protection prevented unauthorized request",
        });

        let mut response = Response::new(body.to_string().into_bytes());
        *response.status_mut() = StatusCode::FORBIDDEN;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    /// Expose `token` to the client in the configured header.
    pub fn attach_token<B>(&self, mut response: Response<B>, token: &str) -> Result<Response<B>> {
        let name = HeaderName::from_bytes(self.config().header_name.as_bytes())
            .map_err(|e| CsrfError::InvalidConfig(e.to_string()))?;
        let value = HeaderValue::from_str(token)
            .map_err(|e| CsrfError::InvalidConfig(e.to_string()))?;

        response.headers_mut().insert(name, value);
        Ok(response)
    }
}

impl Default for CsrfMiddleware {
    fn default() -> Self {
        Self::new(CsrfConfig::default())
    }
}
