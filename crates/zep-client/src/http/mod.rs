/*
[INPUT]:  HTTP client handles, configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod document;
pub mod error;
pub mod memory;
pub mod message;
pub mod message_client;
pub mod options;
pub mod response;
pub mod transport;
pub mod user;

pub use error::{Result, ZepError};
pub use message::{HttpRequest, HttpResponse};
pub use options::RequestOptions;
pub use response::{ResponseHandler, handle_response};
pub use transport::{HttpHandles, Lane, ReqwestTransport, Transport};

pub use client::{ApiContext, ClientConfig, ZepClient};
pub use document::{DocumentClient, DocumentOperations};
pub use memory::{MemoryClient, MemoryOperations};
pub use message_client::{MessageClient, MessageOperations};
pub use user::{UserClient, UserOperations};
