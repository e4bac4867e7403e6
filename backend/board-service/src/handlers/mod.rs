/// HTTP handlers for the board API
///
/// This module contains handlers for:
/// - Users: sign-up, sign-in, and the signed-in user's profile
/// - Posts: create, list, read, update, delete
/// - Comments: create, list, update, delete under a post
/// - Likes: like toggling and the liked-posts listing
pub mod comments;
pub mod health;
pub mod likes;
pub mod posts;
pub mod users;

// Re-export handler functions at module level
pub use comments::{create_comment, delete_comment, list_comments, update_comment};
pub use health::health_check;
pub use likes::{like_post, list_liked_posts, unlike_post};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use users::{get_profile, sign_in, sign_up, update_profile};
