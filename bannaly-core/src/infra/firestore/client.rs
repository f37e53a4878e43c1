use std::future::Future;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::auth::TokenProvider;
use super::values::Document;
use crate::error::{LibraryError, Result};
use crate::infra::http::{GoogleErrorBody, describe_failure, ensure_success};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";
const LIST_PAGE_SIZE: &str = "300";
pub const MAX_TRANSACTION_ATTEMPTS: usize = 5;
/// Delay before the second attempt; doubled for each further one.
const TRANSACTION_BACKOFF: Duration = Duration::from_millis(50);

/// How a commit ended when the request itself went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// The transaction lost a race and may be retried.
    Aborted,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BeginTransactionResponse {
    transaction: String,
}

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<Document>,
}

/// REST client for one Firestore database.
#[derive(Debug)]
pub struct FirestoreClient {
    http: reqwest::Client,
    tokens: TokenProvider,
    base_url: String,
    project_id: String,
}

impl FirestoreClient {
    pub fn new(http: reqwest::Client, tokens: TokenProvider) -> Self {
        let project_id = tokens.project_id().to_string();
        Self {
            http,
            tokens,
            base_url: FIRESTORE_API_BASE.to_string(),
            project_id,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Resource name of the database's document root.
    pub fn documents_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// Full resource name of a document, used inside write bodies.
    pub fn document_name(&self, collection: &str, id: &str) -> Result<String> {
        validate_document_id(id)?;
        Ok(format!("{}/{collection}/{id}", self.documents_path()))
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.base_url, self.documents_path())
    }

    /// URL of a collection or document with every segment percent-encoded.
    fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.documents_url()).map_err(|err| {
            LibraryError::ConfigurationMissing(format!(
                "invalid firestore base url {}: {err}",
                self.base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                LibraryError::ConfigurationMissing(format!(
                    "firestore base url {} cannot carry a path",
                    self.base_url
                ))
            })?
            .extend(segments);
        Ok(url)
    }

    async fn authorized(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        Ok(request.bearer_auth(token).send().await?)
    }

    /// Fetch one document, reading inside `transaction` when given.
    /// A missing document is `Ok(None)`.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
        transaction: Option<&str>,
    ) -> Result<Option<Document>> {
        validate_document_id(id)?;
        let url = self.resource_url(&[collection, id])?;
        let mut request = self.http.get(url);
        if let Some(transaction) = transaction {
            request = request.query(&[("transaction", transaction)]);
        }

        let response = self.authorized(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success("firestore", response).await?;
        Ok(Some(response.json::<Document>().await?))
    }

    /// Every document of a collection, following page tokens.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let url = self.resource_url(&[collection])?;
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", LIST_PAGE_SIZE)];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let response = self
                .authorized(self.http.get(url.clone()).query(&query))
                .await?;
            let page = ensure_success("firestore", response)
                .await?
                .json::<ListDocumentsResponse>()
                .await?;

            documents.extend(page.documents);
            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    /// Documents whose `field` equals the string `value`.
    pub async fn query_equal(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": value },
                    }
                }
            }
        });
        let url = format!("{}:runQuery", self.documents_url());
        let response = self.authorized(self.http.post(&url).json(&body)).await?;
        let rows = ensure_success("firestore", response)
            .await?
            .json::<Vec<RunQueryRow>>()
            .await?;

        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    /// Create a document with a caller-chosen id. Fails if it already exists.
    pub async fn create_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document> {
        validate_document_id(id)?;
        let url = self.resource_url(&[collection])?;
        let request = self
            .http
            .post(url)
            .query(&[("documentId", id)])
            .json(&json!({ "fields": fields }));
        let response = self.authorized(request).await?;
        Ok(ensure_success("firestore", response)
            .await?
            .json::<Document>()
            .await?)
    }

    pub async fn begin_transaction(&self) -> Result<String> {
        let url = format!("{}:beginTransaction", self.documents_url());
        let response = self
            .authorized(self.http.post(&url).json(&json!({})))
            .await?;
        Ok(ensure_success("firestore", response)
            .await?
            .json::<BeginTransactionResponse>()
            .await?
            .transaction)
    }

    pub async fn commit(
        &self,
        writes: Vec<Value>,
        transaction: Option<String>,
    ) -> Result<CommitOutcome> {
        let url = format!("{}:commit", self.documents_url());
        let mut body = json!({ "writes": writes });
        if let Some(transaction) = transaction {
            body["transaction"] = Value::String(transaction);
        }

        let response = self.authorized(self.http.post(&url).json(&body)).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(CommitOutcome::Committed);
        }

        let text = response.text().await.unwrap_or_default();
        if is_contention(status, &text) {
            return Ok(CommitOutcome::Aborted);
        }
        Err(LibraryError::upstream("firestore", describe_failure(status, &text)))
    }

    /// Release a transaction that will not be committed. Failures are only
    /// logged; the server expires abandoned transactions on its own.
    pub async fn rollback(&self, transaction: &str) {
        let url = format!("{}:rollback", self.documents_url());
        let request = self
            .http
            .post(&url)
            .json(&json!({ "transaction": transaction }));
        let result = match self.authorized(request).await {
            Ok(response) => ensure_success("firestore", response).await.map(drop),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            warn!(error = %err, "firestore rollback failed");
        }
    }

    /// Run a read-modify-write transaction. `body` receives the transaction
    /// id, performs its reads through it and returns the writes to commit plus
    /// the value to hand back. Contention retries the whole body after a
    /// growing delay; any other failure rolls the transaction back.
    pub async fn transact<T, F, Fut>(&self, mut body: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<(Vec<Value>, T)>>,
    {
        let mut backoff = TRANSACTION_BACKOFF;
        for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
            let transaction = self.begin_transaction().await?;
            let outcome = match body(transaction.clone()).await {
                Ok((writes, value)) => self
                    .commit(writes, Some(transaction.clone()))
                    .await
                    .map(|outcome| (outcome, value)),
                Err(err) => Err(err),
            };

            match outcome {
                Ok((CommitOutcome::Committed, value)) => return Ok(value),
                Ok((CommitOutcome::Aborted, _)) => {
                    warn!(attempt, "firestore transaction aborted, retrying");
                    if attempt < MAX_TRANSACTION_ATTEMPTS {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
                Err(err) => {
                    self.rollback(&transaction).await;
                    return Err(err);
                }
            }
        }

        Err(LibraryError::upstream(
            "firestore",
            format!("transaction aborted {MAX_TRANSACTION_ATTEMPTS} times"),
        ))
    }
}

/// Reject ids Firestore cannot address as a single document segment.
pub fn validate_document_id(id: &str) -> Result<()> {
    let reserved = id.len() > 4 && id.starts_with("__") && id.ends_with("__");
    if id.is_empty() || id == "." || id == ".." || id.contains('/') || reserved {
        return Err(LibraryError::Validation(format!("invalid document id {id:?}")));
    }
    Ok(())
}

/// Upsert of selected fields; other fields of the document are preserved.
pub fn update_write(name: &str, fields: Map<String, Value>) -> Value {
    let mask: Vec<String> = fields.keys().cloned().collect();
    json!({
        "update": { "name": name, "fields": fields },
        "updateMask": { "fieldPaths": mask },
    })
}

/// Like [`update_write`] but fails the commit when the document is gone.
pub fn update_existing_write(name: &str, fields: Map<String, Value>) -> Value {
    let mut write = update_write(name, fields);
    write["currentDocument"] = json!({ "exists": true });
    write
}

fn is_contention(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::CONFLICT {
        return true;
    }
    serde_json::from_str::<GoogleErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.status)
        .is_some_and(|status| status == "ABORTED")
}
