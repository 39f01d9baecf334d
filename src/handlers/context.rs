#[derive(Clone)]
pub struct RequestContext<'a> {
    pub client: &'a reqwest::Client,
    pub ollama_url: &'a str,
}

impl<'a> RequestContext<'a> {
    /// Constructs a full URL by joining base URL with an endpoint.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.ollama_url, endpoint)
    }
}
