/// Business logic layer
///
/// - Accounts: registration sequence, credential checks, profile edits
/// - Audit: the shared diff-and-audit unit of work for edits
/// - Posts and comments: board content with audited edits
/// - Likes: like toggling with the counter kept in step
/// - Sessions: server-side session store behind the auth cookie
pub mod accounts;
pub mod audit;
pub mod comments;
pub mod likes;
pub mod posts;
pub mod sessions;

// Re-export commonly used services
pub use accounts::AccountService;
pub use audit::{apply_audited_update, AuditedResource, FieldChange};
pub use comments::CommentService;
pub use likes::LikeService;
pub use posts::PostService;
pub use sessions::SessionStore;
