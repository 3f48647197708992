mod auth;
mod db;
mod errors;
mod handlers;
mod metrics;
mod models;
mod store;
mod utils;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    // Validate JWT secret
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    if jwt_secret.is_empty() {
        panic!("JWT_SECRET cannot be empty");
    }

    let pool = db::create_pool().await;

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    info!("Starting server at {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .service(
                web::resource("/v1/auth/admin/login")
                    .route(web::post().to(handlers::auth::admin_login)),
            )
            .service(
                web::resource("/v1/auth/employee/login")
                    .route(web::post().to(handlers::auth::employee_login)),
            )
            .service(
                web::resource("/v1/auth/logout")
                    .route(web::post().to(handlers::auth::logout)),
            )
            .service(
                web::resource("/v1/auth/password")
                    .route(web::post().to(handlers::auth::change_password)),
            )
            .service(
                web::resource("/v1/dashboard")
                    .route(web::get().to(handlers::dashboard::admin_dashboard)),
            )
            .service(
                web::resource("/v1/dashboard/search")
                    .route(web::get().to(handlers::dashboard::employee_search)),
            )
            .service(
                web::resource("/v1/me")
                    .route(web::get().to(handlers::dashboard::employee_dashboard)),
            )
            .service(
                web::resource("/v1/employee")
                    .route(web::post().to(handlers::employee::create_employee)),
            )
            .service(
                web::resource("/v1/employee/{id}")
                    .route(web::get().to(handlers::employee::employee_detail))
                    .route(web::patch().to(handlers::employee::update_employee))
                    .route(web::delete().to(handlers::employee::delete_employee)),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
