use reqwest::Client;

use crate::error::KnowledgeBaseError;
use crate::knowledge::base::KnowledgeBase;

/// Fetch an ingredient table from an HTTP tables endpoint.
///
/// The endpoint may answer with a bare array or with the `{"data": [...]}` envelope.
pub async fn fetch_table(client: &Client, url: &str) -> Result<KnowledgeBase, KnowledgeBaseError> {
    let http = |source| KnowledgeBaseError::Http {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .header("User-Agent", concat!("label-checkr/", env!("CARGO_PKG_VERSION")))
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(http)?;

    let status = response.status();
    if !status.is_success() {
        return Err(KnowledgeBaseError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let value: serde_json::Value = response.json().await.map_err(http)?;
    KnowledgeBase::from_json_value(value)
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/tables/ingredients"));
        assert!(is_remote("http://localhost:8080/tables/ingredients?limit=100"));
        assert!(!is_remote("./ingredients.json"));
        assert!(!is_remote("/data/http.json"));
    }
}
