//! In-memory `Backend` used by tests.
//!
//! Documents are stored per collection and filtered with the subset of the
//! query language the service emits (`equal`, `contains`, `or`, `orderAsc`,
//! `orderDesc`, `limit`). Every call is recorded so tests can assert on what
//! reached the provider.

use super::{
    Account, Backend, DocumentList, ProviderError, ProviderResult, Query, Scope, Session, Token,
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// OTP accepted by `create_session`.
pub(crate) const VALID_OTP: &str = "123456";

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Value>>,
    // email -> account id
    accounts: HashMap<String, String>,
    // session secret -> (session id, account id)
    sessions: HashMap<String, (String, String)>,
    tokens_sent: Vec<(String, String)>,
    queries: Vec<Vec<Value>>,
    documents_created: usize,
    accounts_created: usize,
    sessions_deleted: usize,
    next_id: u64,
}

/// Provider misbehaviour a test can switch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Failure {
    CreateAccount,
    CreateDocument,
    EmailToken,
    ListDocuments,
    DeleteSession,
    /// `create_account` succeeds but returns an empty `$id`.
    EmptyAccountId,
    /// `create_session` succeeds but returns an empty `secret`.
    EmptySessionSecret,
}

#[derive(Default)]
pub(crate) struct MemoryBackend {
    state: Mutex<State>,
    failures: HashSet<Failure>,
}

impl MemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(failure: Failure) -> Self {
        Self {
            failures: HashSet::from([failure]),
            ..Self::default()
        }
    }

    fn fails(&self, failure: Failure) -> bool {
        self.failures.contains(&failure)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an identity account plus its users-collection document.
    pub(crate) fn seed_user(&self, collection_id: &str, full_name: &str, email: &str) -> String {
        let mut state = self.state();
        state.next_id += 1;
        let account_id = format!("acc-{}", state.next_id);
        state
            .accounts
            .insert(email.to_string(), account_id.clone());
        let document = json!({
            "$id": format!("doc-{}", state.next_id),
            "accountId": account_id,
            "email": email,
            "fullName": full_name,
            "avatar": "https://example.com/avatar.png",
        });
        state
            .collections
            .entry(collection_id.to_string())
            .or_default()
            .push(document);
        account_id
    }

    pub(crate) fn seed_document(&self, collection_id: &str, document: Value) {
        self.state()
            .collections
            .entry(collection_id.to_string())
            .or_default()
            .push(document);
    }

    /// Open a session for an existing account and return its secret.
    pub(crate) fn seed_session(&self, account_id: &str) -> SecretString {
        let mut state = self.state();
        state.next_id += 1;
        let secret = format!("secret-{}", state.next_id);
        let session_id = format!("session-{}", state.next_id);
        state
            .sessions
            .insert(secret.clone(), (session_id, account_id.to_string()));
        SecretString::from(secret)
    }

    pub(crate) fn documents(&self, collection_id: &str) -> Vec<Value> {
        self.state()
            .collections
            .get(collection_id)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn tokens_sent(&self) -> Vec<(String, String)> {
        self.state().tokens_sent.clone()
    }

    pub(crate) fn documents_created(&self) -> usize {
        self.state().documents_created
    }

    pub(crate) fn accounts_created(&self) -> usize {
        self.state().accounts_created
    }

    pub(crate) fn sessions_deleted(&self) -> usize {
        self.state().sessions_deleted
    }

    pub(crate) fn active_sessions(&self) -> usize {
        self.state().sessions.len()
    }

    pub(crate) fn last_queries(&self) -> Vec<Value> {
        self.state().queries.last().cloned().unwrap_or_default()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.state().queries.len()
    }
}

fn api_error(path: &str, status: u16, kind: &str, message: &str) -> ProviderError {
    ProviderError::Api {
        url: format!("memory://{path}"),
        status,
        kind: kind.to_string(),
        message: message.to_string(),
    }
}

fn matches(document: &Value, query: &Value) -> bool {
    let attribute = query["attribute"].as_str().unwrap_or_default();
    let values = query["values"].as_array().cloned().unwrap_or_default();
    let field = &document[attribute];

    match query["method"].as_str().unwrap_or_default() {
        "equal" => values.contains(field),
        "contains" => match field {
            Value::String(text) => values
                .iter()
                .filter_map(Value::as_str)
                .any(|needle| text.contains(needle)),
            Value::Array(items) => values.iter().any(|value| items.contains(value)),
            _ => false,
        },
        "or" => values.iter().any(|nested| matches(document, nested)),
        _ => true,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => a
            .as_str()
            .unwrap_or_default()
            .cmp(b.as_str().unwrap_or_default()),
    }
}

impl Backend for MemoryBackend {
    async fn list_documents(
        &self,
        scope: Scope<'_>,
        collection_id: &str,
        queries: &[Query],
    ) -> ProviderResult<DocumentList> {
        let encoded: Vec<Value> = queries
            .iter()
            .filter_map(|query| serde_json::to_value(query).ok())
            .collect();

        let mut state = self.state();
        state.queries.push(encoded.clone());

        if self.fails(Failure::ListDocuments) {
            return Err(api_error("documents", 500, "general_unknown", "Server Error"));
        }

        if let Scope::Session(secret) = scope {
            if !state.sessions.contains_key(secret.expose_secret()) {
                return Err(api_error("documents", 401, "user_unauthorized", "Unauthorized"));
            }
        }

        let mut documents: Vec<Value> = state
            .collections
            .get(collection_id)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|document| encoded.iter().all(|query| matches(document, query)))
            .collect();

        for query in &encoded {
            let attribute = query["attribute"].as_str().unwrap_or_default();
            match query["method"].as_str().unwrap_or_default() {
                "orderAsc" => documents.sort_by(|a, b| compare(&a[attribute], &b[attribute])),
                "orderDesc" => documents.sort_by(|a, b| compare(&b[attribute], &a[attribute])),
                _ => {}
            }
        }

        let total = documents.len() as u64;

        if let Some(limit) = encoded
            .iter()
            .find(|query| query["method"] == "limit")
            .and_then(|query| query["values"][0].as_u64())
        {
            documents.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(DocumentList { total, documents })
    }

    async fn create_document(
        &self,
        collection_id: &str,
        document_id: &str,
        data: Value,
    ) -> ProviderResult<Value> {
        if self.fails(Failure::CreateDocument) {
            return Err(api_error("documents", 500, "general_unknown", "Server Error"));
        }

        let mut document = data;
        document["$id"] = Value::String(document_id.to_string());

        let mut state = self.state();
        state.documents_created += 1;
        state
            .collections
            .entry(collection_id.to_string())
            .or_default()
            .push(document.clone());

        Ok(document)
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        _password: &SecretString,
    ) -> ProviderResult<Account> {
        if self.fails(Failure::CreateAccount) {
            return Err(api_error("account", 503, "general_unknown", "Service Unavailable"));
        }

        let mut state = self.state();
        if state.accounts.contains_key(email) {
            return Err(api_error(
                "account",
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }

        let id = if self.fails(Failure::EmptyAccountId) {
            String::new()
        } else {
            user_id.to_string()
        };
        state.accounts.insert(email.to_string(), user_id.to_string());
        state.accounts_created += 1;

        Ok(Account {
            id,
            email: email.to_string(),
            name: String::new(),
        })
    }

    async fn create_email_token(&self, user_id: &str, email: &str) -> ProviderResult<Token> {
        if self.fails(Failure::EmailToken) {
            return Err(api_error("tokens", 503, "general_unknown", "Service Unavailable"));
        }

        let mut state = self.state();
        state
            .tokens_sent
            .push((user_id.to_string(), email.to_string()));
        let account_id = state
            .accounts
            .get(email)
            .cloned()
            .unwrap_or_else(|| user_id.to_string());

        Ok(Token {
            id: format!("token-{}", state.tokens_sent.len()),
            user_id: account_id,
        })
    }

    async fn create_session(&self, user_id: &str, secret: &SecretString) -> ProviderResult<Session> {
        let mut state = self.state();
        let known = state.accounts.values().any(|id| id == user_id);
        if !known || secret.expose_secret() != VALID_OTP {
            return Err(api_error(
                "sessions",
                401,
                "user_invalid_token",
                "Invalid token passed in the request.",
            ));
        }

        state.next_id += 1;
        let session = Session {
            id: format!("session-{}", state.next_id),
            user_id: user_id.to_string(),
            secret: if self.fails(Failure::EmptySessionSecret) {
                String::new()
            } else {
                format!("secret-{}", state.next_id)
            },
        };
        state.sessions.insert(
            session.secret.clone(),
            (session.id.clone(), user_id.to_string()),
        );

        Ok(session)
    }

    async fn get_account(&self, session: &SecretString) -> ProviderResult<Account> {
        let state = self.state();
        let (_, account_id) = state
            .sessions
            .get(session.expose_secret())
            .ok_or_else(|| api_error("account", 401, "user_unauthorized", "Unauthorized"))?;
        let email = state
            .accounts
            .iter()
            .find(|(_, id)| *id == account_id)
            .map(|(email, _)| email.clone())
            .unwrap_or_default();

        Ok(Account {
            id: account_id.clone(),
            email,
            name: String::new(),
        })
    }

    async fn delete_session(&self, session: &SecretString, _session_id: &str) -> ProviderResult<()> {
        if self.fails(Failure::DeleteSession) {
            return Err(api_error("sessions", 500, "general_unknown", "Server Error"));
        }

        let mut state = self.state();
        state
            .sessions
            .remove(session.expose_secret())
            .ok_or_else(|| api_error("sessions", 401, "user_unauthorized", "Unauthorized"))?;
        state.sessions_deleted += 1;

        Ok(())
    }
}
