/*
[INPUT]:  Collection names, documents and search queries
[OUTPUT]: Collections, document uuids, documents and search results
[POS]:    HTTP layer - document collection endpoints
[UPDATE]: When adding document endpoints or changing batch behavior
*/

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, warn};

use crate::http::client::{ApiContext, append_query, require_non_empty};
use crate::http::{HttpHandles, Lane, RequestOptions, Result, ZepError};
use crate::types::{
    CreateCollectionRequest, Document, DocumentCollection, DocumentSearchPayload,
    DocumentSearchResponse, GetDocumentsRequest, UpdateCollectionRequest, UpdateDocumentRequest,
};

/// Documents per upload request unless the caller asks otherwise
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Above this many documents per request the server may slow down or run out of memory
pub const LARGE_BATCH_WARNING_LIMIT: usize = 5000;

const MAX_EMBEDDING_DIMENSIONS: u32 = 2000;

/// Collection and document operations
#[async_trait]
pub trait DocumentOperations: Send + Sync {
    async fn add_collection(
        &self,
        collection: &CreateCollectionRequest,
        options: &RequestOptions,
    ) -> Result<DocumentCollection>;

    async fn get_collection(
        &self,
        name: &str,
        options: &RequestOptions,
    ) -> Result<DocumentCollection>;

    async fn update_collection(
        &self,
        collection: &UpdateCollectionRequest,
        options: &RequestOptions,
    ) -> Result<DocumentCollection>;

    async fn list_collections(&self, options: &RequestOptions) -> Result<Vec<DocumentCollection>>;

    async fn delete_collection(&self, name: &str, options: &RequestOptions) -> Result<()>;

    async fn add_documents(
        &self,
        collection: &str,
        documents: &[Document],
        batch_size: Option<usize>,
        options: &RequestOptions,
    ) -> Result<Vec<String>>;

    async fn get_document(
        &self,
        collection: &str,
        uuid: &str,
        options: &RequestOptions,
    ) -> Result<Document>;

    async fn get_documents(
        &self,
        collection: &str,
        uuids: &[String],
        options: &RequestOptions,
    ) -> Result<Vec<Document>>;

    async fn update_document(
        &self,
        collection: &str,
        uuid: &str,
        update: &UpdateDocumentRequest,
        options: &RequestOptions,
    ) -> Result<()>;

    async fn delete_document(
        &self,
        collection: &str,
        uuid: &str,
        options: &RequestOptions,
    ) -> Result<()>;

    async fn search_return_query_vector(
        &self,
        collection: &str,
        payload: &DocumentSearchPayload,
        limit: Option<u32>,
        options: &RequestOptions,
    ) -> Result<DocumentSearchResponse>;

    async fn search(
        &self,
        collection: &str,
        payload: &DocumentSearchPayload,
        limit: Option<u32>,
        options: &RequestOptions,
    ) -> Result<Vec<Document>> {
        Ok(self
            .search_return_query_vector(collection, payload, limit, options)
            .await?
            .results)
    }
}

/// Client for `/collection` and `/collections` endpoints
#[derive(Debug, Clone)]
pub struct DocumentClient {
    context: ApiContext,
}

impl DocumentClient {
    pub fn new(context: ApiContext) -> Self {
        Self { context }
    }

    pub fn handles(&self) -> Option<&HttpHandles> {
        self.context.transport().handles()
    }
}

#[async_trait]
impl DocumentOperations for DocumentClient {
    /// POST /collection/{name}, then re-read the stored collection
    async fn add_collection(
        &self,
        collection: &CreateCollectionRequest,
        options: &RequestOptions,
    ) -> Result<DocumentCollection> {
        require_non_empty(&collection.name, "collection name")?;
        if !(1..=MAX_EMBEDDING_DIMENSIONS).contains(&collection.embedding_dimensions) {
            return Err(ZepError::InvalidArgument(format!(
                "embedding_dimensions must be between 1 and {MAX_EMBEDDING_DIMENSIONS}"
            )));
        }

        let request = self
            .context
            .request(Method::POST, &["collection", &collection.name])?
            .with_json(collection)?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await?;

        self.get_collection(&collection.name, options).await
    }

    /// GET /collection/{name}
    async fn get_collection(
        &self,
        name: &str,
        options: &RequestOptions,
    ) -> Result<DocumentCollection> {
        require_non_empty(name, "collection name")?;
        let request = self.context.request(Method::GET, &["collection", name])?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Collection {name} not found")))
    }

    /// PATCH /collection/{name}, then re-read the stored collection
    async fn update_collection(
        &self,
        collection: &UpdateCollectionRequest,
        options: &RequestOptions,
    ) -> Result<DocumentCollection> {
        require_non_empty(&collection.name, "collection name")?;
        let request = self
            .context
            .request(Method::PATCH, &["collection", &collection.name])?
            .with_json(collection)?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Collection {} not found", collection.name)))?;

        self.get_collection(&collection.name, options).await
    }

    /// GET /collection
    async fn list_collections(&self, options: &RequestOptions) -> Result<Vec<DocumentCollection>> {
        let request = self.context.request(Method::GET, &["collection"])?;
        self.context.send_json(Lane::Primary, request, options).await
    }

    /// DELETE /collection/{name}
    async fn delete_collection(&self, name: &str, options: &RequestOptions) -> Result<()> {
        require_non_empty(name, "collection name")?;
        let request = self.context.request(Method::DELETE, &["collection", name])?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Collection {name} not found")))?;
        Ok(())
    }

    /// POST /collections/{name}/documents, one request per batch
    async fn add_documents(
        &self,
        collection: &str,
        documents: &[Document],
        batch_size: Option<usize>,
        options: &RequestOptions,
    ) -> Result<Vec<String>> {
        require_non_empty(collection, "collection name")?;
        let batch_size = batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(ZepError::InvalidArgument("batch_size must be positive".into()));
        }
        if batch_size > LARGE_BATCH_WARNING_LIMIT {
            warn!(
                batch_size,
                limit = LARGE_BATCH_WARNING_LIMIT,
                "large document batch may be slow or exhaust server memory"
            );
        }

        let mut uuids = Vec::with_capacity(documents.len());
        for (index, batch) in documents.chunks(batch_size).enumerate() {
            debug!(collection, batch = index, size = batch.len(), "uploading document batch");
            let request = self
                .context
                .request(Method::POST, &["collections", collection, "documents"])?
                .with_json(batch)?;
            let created: Vec<String> = self
                .context
                .send_json(Lane::Alternate, request, options)
                .await?;
            uuids.extend(created);
        }
        Ok(uuids)
    }

    /// GET /collections/{name}/documents/uuid/{uuid}
    async fn get_document(
        &self,
        collection: &str,
        uuid: &str,
        options: &RequestOptions,
    ) -> Result<Document> {
        require_non_empty(collection, "collection name")?;
        require_non_empty(uuid, "document uuid")?;
        let request = self.context.request(
            Method::GET,
            &["collections", collection, "documents", "uuid", uuid],
        )?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Document {uuid} not found")))
    }

    /// POST /collections/{name}/documents/list/get
    async fn get_documents(
        &self,
        collection: &str,
        uuids: &[String],
        options: &RequestOptions,
    ) -> Result<Vec<Document>> {
        require_non_empty(collection, "collection name")?;
        if uuids.is_empty() {
            return Err(ZepError::InvalidArgument("document uuids must be provided".into()));
        }
        if uuids.len() > LARGE_BATCH_WARNING_LIMIT {
            warn!(
                count = uuids.len(),
                limit = LARGE_BATCH_WARNING_LIMIT,
                "large document lookup may be slow or exhaust server memory"
            );
        }

        let body = GetDocumentsRequest {
            uuids: uuids.to_vec(),
        };
        let request = self
            .context
            .request(
                Method::POST,
                &["collections", collection, "documents", "list", "get"],
            )?
            .with_json(&body)?;
        self.context.send_json(Lane::Alternate, request, options).await
    }

    /// PATCH /collections/{name}/documents/uuid/{uuid}
    async fn update_document(
        &self,
        collection: &str,
        uuid: &str,
        update: &UpdateDocumentRequest,
        options: &RequestOptions,
    ) -> Result<()> {
        require_non_empty(collection, "collection name")?;
        require_non_empty(uuid, "document uuid")?;
        if update.document_id.is_none() && update.metadata.is_none() {
            return Err(ZepError::InvalidArgument(
                "document_id or metadata must be provided".into(),
            ));
        }

        let request = self
            .context
            .request(
                Method::PATCH,
                &["collections", collection, "documents", "uuid", uuid],
            )?
            .with_json(update)?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Document {uuid} not found")))?;
        Ok(())
    }

    /// DELETE /collections/{name}/documents/uuid/{uuid}
    async fn delete_document(
        &self,
        collection: &str,
        uuid: &str,
        options: &RequestOptions,
    ) -> Result<()> {
        require_non_empty(collection, "collection name")?;
        require_non_empty(uuid, "document uuid")?;
        let request = self.context.request(
            Method::DELETE,
            &["collections", collection, "documents", "uuid", uuid],
        )?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(|e| e.or_not_found(format!("Document {uuid} not found")))?;
        Ok(())
    }

    /// POST /collections/{name}/search?limit={limit}
    ///
    /// A missing collection yields an empty result rather than an error.
    async fn search_return_query_vector(
        &self,
        collection: &str,
        payload: &DocumentSearchPayload,
        limit: Option<u32>,
        options: &RequestOptions,
    ) -> Result<DocumentSearchResponse> {
        require_non_empty(collection, "collection name")?;
        if payload.text.is_none() && payload.metadata.is_none() {
            return Err(ZepError::InvalidArgument(
                "one of text or metadata must be provided".into(),
            ));
        }

        let mut request = self
            .context
            .request(Method::POST, &["collections", collection, "search"])?
            .with_json(payload)?;
        append_query(
            &mut request.url,
            &[("limit", limit.filter(|l| *l > 0).map(|l| l.to_string()))],
        );

        match self
            .context
            .send_json(Lane::Alternate, request, options)
            .await
        {
            Err(err) if err.status() == Some(404) => {
                debug!(collection, "search on missing collection");
                Ok(DocumentSearchResponse::default())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ClientConfig, ZepClient};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DocumentClient {
        ZepClient::with_config(ClientConfig::new(server.uri()))
            .expect("client init")
            .documents()
    }

    #[tokio::test]
    async fn test_add_collection_rereads_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collection/docs"))
            .and(body_json(serde_json::json!({
                "name": "docs",
                "embedding_dimensions": 384,
                "is_auto_embedded": true
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collection/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": "c1",
                "name": "docs",
                "embedding_dimensions": 384,
                "is_auto_embedded": true,
                "document_count": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let collection = client(&server)
            .add_collection(
                &CreateCollectionRequest::new("docs", 384),
                &RequestOptions::default(),
            )
            .await
            .expect("add_collection failed");
        assert_eq!(collection.uuid.as_deref(), Some("c1"));
        assert_eq!(collection.document_count, Some(0));
    }

    #[tokio::test]
    async fn test_add_collection_rejects_bad_dimensions() {
        let server = MockServer::start().await;
        let documents = client(&server);
        for dims in [0, 2001] {
            let err = documents
                .add_collection(
                    &CreateCollectionRequest::new("docs", dims),
                    &RequestOptions::default(),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, ZepError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn test_get_collection_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collection/gone"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .get_collection("gone", &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: Collection gone not found");
    }

    #[tokio::test]
    async fn test_update_collection_rereads_collection() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/collection/docs"))
            .and(body_json(serde_json::json!({
                "name": "docs",
                "description": "product manuals"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collection/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "docs",
                "description": "product manuals",
                "document_count": 4,
                "document_embedded_count": 4
            })))
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateCollectionRequest {
            name: "docs".to_string(),
            description: Some("product manuals".to_string()),
            metadata: None,
        };
        let collection = client(&server)
            .update_collection(&update, &RequestOptions::default())
            .await
            .expect("update_collection failed");
        assert_eq!(collection.description.as_deref(), Some("product manuals"));
        assert_eq!(collection.status(), crate::types::CollectionStatus::Ready);
    }

    #[tokio::test]
    async fn test_delete_collection() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/collection/docs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_collection("docs", &RequestOptions::default())
            .await
            .expect("delete_collection failed");
    }

    #[tokio::test]
    async fn test_add_documents_in_batches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/docs/documents"))
            .and(body_json(serde_json::json!([
                {"content": "one"}, {"content": "two"}
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["u1", "u2"])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/docs/documents"))
            .and(body_json(serde_json::json!([{"content": "three"}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["u3"])))
            .expect(1)
            .mount(&server)
            .await;

        let documents = vec![
            Document::new("one"),
            Document::new("two"),
            Document::new("three"),
        ];
        let uuids = client(&server)
            .add_documents("docs", &documents, Some(2), &RequestOptions::default())
            .await
            .expect("add_documents failed");
        assert_eq!(uuids, vec!["u1", "u2", "u3"]);
    }

    #[tokio::test]
    async fn test_get_documents_requires_uuids() {
        let server = MockServer::start().await;
        let err = client(&server)
            .get_documents("docs", &[], &RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_get_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections/docs/documents/uuid/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uuid": "u1",
                "document_id": "manual-1",
                "content": "rust ownership",
                "is_embedded": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let document = client(&server)
            .get_document("docs", "u1", &RequestOptions::default())
            .await
            .expect("get_document failed");
        assert_eq!(document.document_id.as_deref(), Some("manual-1"));
        assert_eq!(document.is_embedded, Some(true));
    }

    #[tokio::test]
    async fn test_get_documents_posts_uuids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/docs/documents/list/get"))
            .and(body_json(serde_json::json!({"uuids": ["u1", "u2"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"uuid": "u1", "content": "one"},
                {"uuid": "u2", "content": "two"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let uuids = vec!["u1".to_string(), "u2".to_string()];
        let documents = client(&server)
            .get_documents("docs", &uuids, &RequestOptions::default())
            .await
            .expect("get_documents failed");
        let contents: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_update_document() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/collections/docs/documents/uuid/u1"))
            .and(body_json(serde_json::json!({"document_id": "manual-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let update = UpdateDocumentRequest {
            document_id: Some("manual-1".to_string()),
            metadata: None,
        };
        client(&server)
            .update_document("docs", "u1", &update, &RequestOptions::default())
            .await
            .expect("update_document failed");
    }

    #[tokio::test]
    async fn test_delete_document() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/collections/docs/documents/uuid/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .delete_document("docs", "u1", &RequestOptions::default())
            .await
            .expect("delete_document failed");
    }

    #[tokio::test]
    async fn test_update_document_requires_a_field() {
        let server = MockServer::start().await;
        let err = client(&server)
            .update_document(
                "docs",
                "u1",
                &UpdateDocumentRequest::default(),
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_search_returns_documents_and_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/docs/search"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"uuid": "u1", "content": "rust ownership", "dist": 0.12}],
                "query_vector": [0.5, 0.25]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .search_return_query_vector(
                "docs",
                &DocumentSearchPayload::text("ownership"),
                Some(3),
                &RequestOptions::default(),
            )
            .await
            .expect("search failed");
        assert_eq!(response.results[0].content, "rust ownership");
        assert_eq!(response.results[0].dist, Some(0.12));
        assert_eq!(response.query_vector, vec![0.5, 0.25]);
    }

    #[tokio::test]
    async fn test_search_missing_collection_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/gone/search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let results = client(&server)
            .search(
                "gone",
                &DocumentSearchPayload::text("anything"),
                None,
                &RequestOptions::default(),
            )
            .await
            .expect("search failed");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_requires_text_or_metadata() {
        let server = MockServer::start().await;
        let err = client(&server)
            .search(
                "docs",
                &DocumentSearchPayload::default(),
                None,
                &RequestOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ZepError::InvalidArgument(_)));
    }
}
