use waypoint_core::generation::ParseError;

/// Errors from the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Neither the caller nor the service supplied an API key.
    #[error("No API key configured")]
    MissingApiKey,

    /// The provider rejected the model id for this key. Not retryable.
    #[error(
        "Model Access Failed: Your API Key does not support '{model}'. \
         Please enable the Generative Language API in Google Cloud Console."
    )]
    ModelUnavailable { model: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Gemini API error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered successfully but without any text.
    #[error("Gemini returned an empty response")]
    EmptyResponse,

    /// The model text could not be turned into a roadmap.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
