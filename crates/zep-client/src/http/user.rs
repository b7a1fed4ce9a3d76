/*
[INPUT]:  User ids and user create/update payloads
[OUTPUT]: User records and their sessions
[POS]:    HTTP layer - user endpoints
[UPDATE]: When adding new user endpoints or changing query parameters
*/

// ### User Endpoints

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::Method;

use crate::http::client::{ApiContext, append_query, require_non_empty};
use crate::http::{HttpHandles, Lane, RequestOptions, Result, ZepError};
use crate::types::{CreateUserRequest, Session, UpdateUserRequest, User};

/// User operations
#[async_trait]
pub trait UserOperations: Send + Sync {
    async fn add(&self, user: &CreateUserRequest, options: &RequestOptions) -> Result<User>;

    async fn get(&self, user_id: &str, options: &RequestOptions) -> Result<User>;

    async fn update(&self, user: &UpdateUserRequest, options: &RequestOptions) -> Result<User>;

    async fn delete(&self, user_id: &str, options: &RequestOptions) -> Result<()>;

    async fn list(
        &self,
        limit: Option<u32>,
        cursor: Option<u64>,
        options: &RequestOptions,
    ) -> Result<Vec<User>>;

    async fn get_sessions(&self, user_id: &str, options: &RequestOptions) -> Result<Vec<Session>>;
}

/// Client for `/user` endpoints
#[derive(Debug, Clone)]
pub struct UserClient {
    context: ApiContext,
}

impl UserClient {
    pub fn new(context: ApiContext) -> Self {
        Self { context }
    }

    pub fn handles(&self) -> Option<&HttpHandles> {
        self.context.transport().handles()
    }

    /// Page through every user, `chunk_size` at a time.
    pub fn list_chunked(
        &self,
        chunk_size: u32,
        options: RequestOptions,
    ) -> BoxStream<'_, Result<Vec<User>>> {
        if chunk_size == 0 {
            return stream::once(async {
                Err::<Vec<_>, _>(ZepError::InvalidArgument("chunk_size must be positive".into()))
            })
            .boxed();
        }

        stream::try_unfold(None::<u64>, move |cursor| {
            let options = options.clone();
            async move {
                let page = self.list(Some(chunk_size), cursor, &options).await?;
                if page.is_empty() {
                    return Ok(None);
                }
                let next = cursor.unwrap_or(0) + u64::from(chunk_size);
                Ok(Some((page, Some(next))))
            }
        })
        .boxed()
    }

    fn not_found(user_id: &str) -> impl FnOnce(ZepError) -> ZepError + '_ {
        move |e| e.or_not_found(format!("User {user_id} not found"))
    }
}

#[async_trait]
impl UserOperations for UserClient {
    /// POST /user
    async fn add(&self, user: &CreateUserRequest, options: &RequestOptions) -> Result<User> {
        require_non_empty(&user.user_id, "user_id")?;
        let request = self
            .context
            .request(Method::POST, &["user"])?
            .with_json(user)?;
        self.context.send_json(Lane::Primary, request, options).await
    }

    /// GET /user/{user_id}
    async fn get(&self, user_id: &str, options: &RequestOptions) -> Result<User> {
        require_non_empty(user_id, "user_id")?;
        let request = self.context.request(Method::GET, &["user", user_id])?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(Self::not_found(user_id))
    }

    /// PATCH /user/{user_id}
    async fn update(&self, user: &UpdateUserRequest, options: &RequestOptions) -> Result<User> {
        require_non_empty(&user.user_id, "user_id")?;
        let request = self
            .context
            .request(Method::PATCH, &["user", &user.user_id])?
            .with_json(user)?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(Self::not_found(&user.user_id))
    }

    /// DELETE /user/{user_id}
    async fn delete(&self, user_id: &str, options: &RequestOptions) -> Result<()> {
        require_non_empty(user_id, "user_id")?;
        let request = self.context.request(Method::DELETE, &["user", user_id])?;
        self.context
            .execute_checked(Lane::Primary, request, options)
            .await
            .map_err(Self::not_found(user_id))?;
        Ok(())
    }

    /// GET /user?limit={limit}&cursor={cursor}
    async fn list(
        &self,
        limit: Option<u32>,
        cursor: Option<u64>,
        options: &RequestOptions,
    ) -> Result<Vec<User>> {
        let mut request = self.context.request(Method::GET, &["user"])?;
        append_query(
            &mut request.url,
            &[
                ("limit", limit.map(|l| l.to_string())),
                ("cursor", cursor.map(|c| c.to_string())),
            ],
        );
        self.context.send_json(Lane::Primary, request, options).await
    }

    /// GET /user/{user_id}/sessions
    async fn get_sessions(&self, user_id: &str, options: &RequestOptions) -> Result<Vec<Session>> {
        require_non_empty(user_id, "user_id")?;
        let request = self
            .context
            .request(Method::GET, &["user", user_id, "sessions"])?;
        self.context
            .send_json(Lane::Primary, request, options)
            .await
            .map_err(Self::not_found(user_id))
    }
}
