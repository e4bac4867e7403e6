/// Security primitives for the board service.
///
/// Passwords are hashed with Argon2id; sessions are opaque random tokens
/// stored server-side (no JWT anywhere in this service).
pub mod password;

pub use password::{hash_password, verify_password};
