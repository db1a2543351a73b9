//! Response payloads returned by the Appwrite REST API.

use super::ProviderError;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use std::fmt;

/// `GET .../documents` response; documents stay untyped until the caller picks a model.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct DocumentList {
    pub total: u64,
    #[serde(default)]
    pub documents: Vec<Value>,
}

impl DocumentList {
    /// Decode every document into `T`.
    ///
    /// # Errors
    /// Returns `ProviderError::Decode` if any document does not match `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<Vec<T>, ProviderError> {
        self.documents
            .into_iter()
            .map(|document| serde_json::from_value(document).map_err(ProviderError::from))
            .collect()
    }

    /// Decode the first document, if any.
    ///
    /// # Errors
    /// Returns `ProviderError::Decode` if the first document does not match `T`.
    pub fn first<T: DeserializeOwned>(self) -> Result<Option<T>, ProviderError> {
        if self.total == 0 {
            return Ok(None);
        }
        self.documents
            .into_iter()
            .next()
            .map(serde_json::from_value)
            .transpose()
            .map_err(ProviderError::from)
    }
}

/// Identity account (`POST /account`, `GET /account`).
#[derive(Deserialize, Debug, Clone)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// Email OTP token (`POST /account/tokens/email`). The secret itself is only emailed.
#[derive(Deserialize, Debug, Clone)]
pub struct Token {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// Session created from a verified token. `secret` is only populated for
/// requests made with an API key.
#[derive(Deserialize, Clone)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub secret: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("secret", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[derive(Deserialize, Debug)]
    struct Named {
        name: String,
    }

    #[test]
    fn first_returns_none_when_total_is_zero() -> Result<()> {
        let list: DocumentList = serde_json::from_value(json!({"total": 0, "documents": []}))?;
        assert!(list.first::<Named>()?.is_none());
        Ok(())
    }

    #[test]
    fn first_decodes_the_first_document() -> Result<()> {
        let list: DocumentList = serde_json::from_value(json!({
            "total": 2,
            "documents": [{"name": "a"}, {"name": "b"}]
        }))?;
        let first = list.first::<Named>()?;
        assert_eq!(first.map(|named| named.name), Some("a".to_string()));
        Ok(())
    }

    #[test]
    fn into_typed_rejects_mismatched_documents() -> Result<()> {
        let list: DocumentList =
            serde_json::from_value(json!({"total": 1, "documents": [{"other": 1}]}))?;
        assert!(list.into_typed::<Named>().is_err());
        Ok(())
    }

    #[test]
    fn session_debug_redacts_secret() -> Result<()> {
        let session: Session = serde_json::from_value(json!({
            "$id": "s1",
            "userId": "u1",
            "secret": "very-secret"
        }))?;
        let debug = format!("{session:?}");
        assert!(debug.contains("s1"));
        assert!(!debug.contains("very-secret"));
        Ok(())
    }
}
