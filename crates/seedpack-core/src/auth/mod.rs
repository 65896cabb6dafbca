//! Session authentication: the bearer credential, the header state that carries
//! it, where it is persisted, and the login route contract.

pub mod context;
pub mod login;
pub mod session;

pub use context::{AuthContext, Credential};
pub use login::{LoginBootstrap, LoginError, LoginRedirect};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, TOKEN_KEY};
