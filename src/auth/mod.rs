//! Authentication and session management

pub mod file_store;
pub mod models;
pub mod password;
pub mod session;

pub use file_store::FileSessionStore;
pub use models::{AuthState, LoginOutcome, LoginRequest, LOGGED_IN_AS, PUBLIC_USER};
pub use password::{authenticate, hash_password};
pub use session::{load_session, save_session, MemorySessionStore, Session, SessionStore};
