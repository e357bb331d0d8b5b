//! Pagination of section text and interactive page sessions.

mod paginator;
mod registry;
mod session;
mod store;

pub use paginator::{paginate, PaginatedText, DEFAULT_PAGE_SIZE};
pub use registry::{PageView, SessionOptions, SessionRegistry, DEFAULT_IDLE_TIMEOUT};
pub use session::{query_fingerprint, Navigation, PaginationSession, SessionId, SessionKey};
pub use store::{JsonFileStore, MemoryStore, SessionStore};
