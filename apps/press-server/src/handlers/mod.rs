//! HTTP handlers and route configuration.

mod api_posts;
mod auth;
mod health;
mod media;
mod web_posts;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(api_posts::index))
                    .route("", web::post().to(api_posts::store))
                    .route("/{id}", web::get().to(api_posts::show))
                    .route("/{id}", web::patch().to(api_posts::update))
                    .route("/{id}", web::put().to(api_posts::update))
                    .route("/{id}", web::delete().to(api_posts::destroy)),
            ),
    )
    .service(
        web::scope("/posts")
            .route("", web::get().to(web_posts::index))
            .route("", web::post().to(web_posts::store))
            .route("/{id}", web::get().to(web_posts::show))
            .route("/{id}", web::patch().to(web_posts::update))
            .route("/{id}", web::put().to(web_posts::update))
            .route("/{id}", web::delete().to(web_posts::destroy)),
    )
    .route("/login", web::get().to(auth::login_page))
    .route("/login", web::post().to(auth::login_submit))
    .route("/storage/{path:.*}", web::get().to(media::serve));
}
