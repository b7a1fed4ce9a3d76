/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Zep client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ApiContext,
    ClientConfig,
    DocumentClient,
    DocumentOperations,
    HttpHandles,
    HttpRequest,
    HttpResponse,
    Lane,
    MemoryClient,
    MemoryOperations,
    MessageClient,
    MessageOperations,
    RequestOptions,
    ReqwestTransport,
    ResponseHandler,
    Result,
    Transport,
    UserClient,
    UserOperations,
    ZepClient,
    ZepError,
    handle_response,
};

// Re-export all types
pub use types::*;

pub use tokio_util::sync::CancellationToken;
