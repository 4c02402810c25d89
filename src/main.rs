use actix_web::{App, HttpServer, middleware::{self, TrailingSlash}, web};
use dotenvy::dotenv;
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use birthday_notify::{
    api::{self, ApiDoc, middleware::RequestId},
    app_state::AppState,
    config::Config,
    database,
    seed,
    services::bootstrap::SeedOutcome,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Failed to load configuration: {}", e),
        )
    })?;

    let db = database::connect().await?;
    database::schema::sync(&db)
        .await
        .map_err(|e| io::Error::other(format!("Failed to sync database schema: {}", e)))?;

    match seed::seed_admin_from_env(&db, &config).await {
        Ok(SeedOutcome::Created(user)) => log::info!("Seeded admin user {}", user.email),
        Ok(_) => {}
        Err(e) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Failed to seed admin user: {}", e),
            ));
        }
    }

    let host = config.host.clone();
    let port = config.port;
    let workers = config.effective_workers();
    let max_body_bytes = config.effective_max_body_bytes();
    let state = AppState { db, config };

    log::info!("Starting server at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::new(TrailingSlash::MergeOnly))
            .wrap(RequestId)
            .app_data(web::Data::new(state.clone()))
            .configure(|cfg| api::configure(cfg, max_body_bytes))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
