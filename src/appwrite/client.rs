use super::{
    Account, Backend, DocumentList, ProviderError, ProviderResult, Query, Scope, Session, Token,
};
use crate::APP_USER_AGENT;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, instrument};
use url::Url;

/// Appwrite REST client.
///
/// One `reqwest::Client` is shared by every request; cloning is cheap.
#[derive(Clone)]
pub struct AppwriteClient {
    http: Client,
    endpoint: String,
    project_id: String,
    api_key: SecretString,
    database_id: String,
}

impl AppwriteClient {
    /// Build a client for `endpoint` (e.g. `https://cloud.appwrite.io/v1`).
    ///
    /// # Errors
    /// Returns an error if the endpoint is not an http(s) URL with a host, or
    /// the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        project_id: String,
        api_key: SecretString,
        database_id: String,
    ) -> ProviderResult<Self> {
        let endpoint = endpoint_url(endpoint)?;
        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            http,
            endpoint,
            project_id,
            api_key,
            database_id,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method, path: &str, scope: Scope<'_>) -> (String, RequestBuilder) {
        let url = format!("{}{path}", self.endpoint);
        let builder = self
            .http
            .request(method, &url)
            .header("X-Appwrite-Project", &self.project_id);

        let builder = match scope {
            Scope::Admin => builder.header("X-Appwrite-Key", self.api_key.expose_secret()),
            Scope::Session(secret) => {
                builder.header("X-Appwrite-Session", secret.expose_secret())
            }
        };

        (url, builder)
    }

    fn documents_path(&self, collection_id: &str) -> String {
        format!(
            "/databases/{}/collections/{collection_id}/documents",
            self.database_id
        )
    }
}

impl fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"***")
            .field("database_id", &self.database_id)
            .finish()
    }
}

impl Backend for AppwriteClient {
    #[instrument(skip(self, queries), fields(queries = queries.len()))]
    async fn list_documents(
        &self,
        scope: Scope<'_>,
        collection_id: &str,
        queries: &[Query],
    ) -> ProviderResult<DocumentList> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_string()))
            .collect();

        let (url, builder) = self.request(Method::GET, &self.documents_path(collection_id), scope);

        send(&url, builder.query(&params)).await
    }

    #[instrument(skip(self, data))]
    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> ProviderResult<Value> {
        let (url, builder) = self.request(
            Method::POST,
            &self.documents_path(collection_id),
            Scope::Admin,
        );

        let payload = json!({
            "documentId": document_id,
            "data": data,
        });

        send(&url, builder.json(&payload)).await
    }

    #[instrument(skip(self, password))]
    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &SecretString,
    ) -> ProviderResult<Account> {
        let (url, builder) = self.request(Method::POST, "/account", Scope::Admin);

        let payload = json!({
            "userId": user_id,
            "email": email,
            "password": password.expose_secret(),
        });

        send(&url, builder.json(&payload)).await
    }

    #[instrument(skip(self))]
    async fn create_email_token(&self, user_id: &str, email: &str) -> ProviderResult<Token> {
        let (url, builder) = self.request(Method::POST, "/account/tokens/email", Scope::Admin);

        let payload = json!({
            "userId": user_id,
            "email": email,
        });

        send(&url, builder.json(&payload)).await
    }

    #[instrument(skip(self, secret))]
    async fn create_session(&self, user_id: &str, secret: &SecretString) -> ProviderResult<Session> {
        let (url, builder) = self.request(Method::POST, "/account/sessions/token", Scope::Admin);

        let payload = json!({
            "userId": user_id,
            "secret": secret.expose_secret(),
        });

        send(&url, builder.json(&payload)).await
    }

    #[instrument(skip(self, session))]
    async fn get_account(&self, session: &SecretString) -> ProviderResult<Account> {
        let (url, builder) = self.request(Method::GET, "/account", Scope::Session(session));

        send(&url, builder).await
    }

    #[instrument(skip(self, session))]
    async fn delete_session(&self, session: &SecretString, session_id: &str) -> ProviderResult<()> {
        let (url, builder) = self.request(
            Method::DELETE,
            &format!("/account/sessions/{session_id}"),
            Scope::Session(session),
        );

        check(&url, builder.send().await?).await?;

        Ok(())
    }
}

/// Validate the endpoint and strip any trailing slash so paths can be appended.
fn endpoint_url(endpoint: &str) -> ProviderResult<String> {
    let url = Url::parse(endpoint)
        .map_err(|err| ProviderError::Endpoint(format!("{endpoint}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ProviderError::Endpoint(format!(
                "{endpoint}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(ProviderError::Endpoint(format!(
            "{endpoint}: no host specified"
        )));
    }

    let endpoint_url = url.as_str().trim_end_matches('/').to_string();

    debug!("endpoint URL: {}", endpoint_url);

    Ok(endpoint_url)
}

async fn send<T: DeserializeOwned>(url: &str, builder: RequestBuilder) -> ProviderResult<T> {
    let response = check(url, builder.send().await?).await?;
    let body = response.bytes().await?;

    Ok(serde_json::from_slice(&body)?)
}

/// Turn a non-success response into `ProviderError::Api` using Appwrite's
/// `{message, code, type}` error body when present.
async fn check(url: &str, response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let json_response: Value = response.json().await.unwrap_or(Value::Null);

    Err(ProviderError::Api {
        url: url.to_string(),
        status: status.as_u16(),
        kind: json_response["type"].as_str().unwrap_or("").to_string(),
        message: json_response["message"]
            .as_str()
            .or_else(|| status.canonical_reason())
            .unwrap_or("")
            .to_string(),
    })
}
