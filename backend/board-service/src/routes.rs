//! Route configuration
//!
//! Centralized route setup. Reads are public; everything that writes sits
//! behind the session middleware. Registration order matters in two places:
//! the literal `/posts/likes` path must come before the `/posts/{post_id}`
//! pattern, and the authenticated catch-all scope must come last so public
//! GETs are matched first.

use actix_web::web;

use crate::handlers;
use crate::middleware::SessionAuth;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health_check))
            .route("/sign-up", web::post().to(handlers::sign_up))
            .route("/sign-in", web::post().to(handlers::sign_in))
            .service(
                web::scope("/users")
                    .wrap(SessionAuth)
                    .route("", web::get().to(handlers::get_profile))
                    .route("", web::patch().to(handlers::update_profile)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(handlers::list_posts))
                    .service(
                        web::scope("/likes")
                            .wrap(SessionAuth)
                            .route("", web::get().to(handlers::list_liked_posts)),
                    )
                    .route("/{post_id}", web::get().to(handlers::get_post))
                    .route(
                        "/{post_id}/comments",
                        web::get().to(handlers::list_comments),
                    )
                    .service(
                        web::scope("")
                            .wrap(SessionAuth)
                            .route("", web::post().to(handlers::create_post))
                            .route("/{post_id}", web::patch().to(handlers::update_post))
                            .route("/{post_id}", web::delete().to(handlers::delete_post))
                            .route(
                                "/{post_id}/comments",
                                web::post().to(handlers::create_comment),
                            )
                            .route(
                                "/{post_id}/comments/{comment_id}",
                                web::patch().to(handlers::update_comment),
                            )
                            .route(
                                "/{post_id}/comments/{comment_id}",
                                web::delete().to(handlers::delete_comment),
                            )
                            .route("/{post_id}/like", web::post().to(handlers::like_post))
                            .route("/{post_id}/like", web::delete().to(handlers::unlike_post)),
                    ),
            ),
    );
}
