use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;

use taskguard::auth::{AuthMiddleware, IdentityService};
use taskguard::config::Config;
use taskguard::routes::{self, health};
use taskguard::store::{PgCredentialStore, PgTaskStore};
use taskguard::tasks::TaskService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    log::info!("Starting TaskGuard server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    let config = web::Data::new(config);
    let identities = web::Data::new(IdentityService::new(Arc::new(PgCredentialStore::new(
        pool.clone(),
    ))));
    let task_service = web::Data::new(TaskService::new(Arc::new(PgTaskStore::new(pool))));

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .app_data(identities.clone())
            .app_data(task_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
