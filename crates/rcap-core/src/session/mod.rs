//! Authentication session: identity, bearer token and lifecycle.

pub mod handle;
pub mod model;
pub mod state;
pub mod token;

pub use handle::SessionHandle;
pub use model::{AuthPayload, Credentials, RegistrationData, Session, TokenPayload};
pub use state::{SessionEvent, SessionState};
pub use token::{MemoryTokenStore, TokenStore};
