pub mod session_auth;

// Middleware modules:
// - session_auth: session cookie resolution and user_id extraction
// - Request logging: handled by actix_web::middleware::Logger
// - CORS: handled by actix_cors::Cors

pub use session_auth::{SessionAuth, UserId};
