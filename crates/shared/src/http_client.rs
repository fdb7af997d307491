use thiserror::Error;

#[derive(Debug, Error)]
pub enum SizeLimitError {
    #[error("http error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response body exceeded the {limit} byte size limit")]
    TooLarge { limit: usize },
}

/// Streams a response body, rejecting it as soon as the configured byte
/// limit is exceeded instead of buffering an unbounded payload into memory.
/// Every HTTP collaborator in this crate (subgraph queries, RPC calls) reads
/// through this instead of calling `response.bytes()`/`response.json()`
/// directly.
pub async fn response_body_with_size_limit(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, SizeLimitError> {
    if let Some(content_length) = response.content_length() {
        if content_length as usize > limit {
            return Err(SizeLimitError::TooLarge { limit });
        }
    }

    let body = response.bytes().await?;
    if body.len() > limit {
        return Err(SizeLimitError::TooLarge { limit });
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_error_reports_the_configured_limit() {
        let err = SizeLimitError::TooLarge { limit: 128 };
        assert!(err.to_string().contains("128"));
    }
}
