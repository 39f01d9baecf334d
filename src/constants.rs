/// Ollama API endpoints consumed by the gateway
pub const OLLAMA_GENERATE: &str = "/api/generate";
pub const OLLAMA_TAGS: &str = "/api/tags";

/// Response headers
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
pub const HEADER_NOSNIFF: &str = "nosniff";

/// Error messages
pub const ERROR_INVALID_BODY: &str = "Invalid request body";
pub const ERROR_MARSHAL_PREFIX: &str = "Failed to marshal request";
pub const ERROR_UPSTREAM_PREFIX: &str = "Failed to call Ollama";
pub const ERROR_NOT_FOUND: &str = "404 page not found";
pub const ERROR_METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
