use std::io;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tasklist::{
    auth::AuthSettings,
    config::{Config, StorageBackend},
    db::{self, MemoryStore, PgStore},
    routes,
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let store = match &config.storage {
        StorageBackend::Postgres(url) => {
            let pg = PgStore::connect(url, config.max_connections)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            log::info!("Using PostgreSQL store");
            db::shared(pg)
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory store; data is lost on restart");
            db::shared(MemoryStore::new())
        }
    };
    let settings = web::Data::new(AuthSettings::from_config(&config));

    log::info!("Started up at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(settings.clone())
            .wrap(routes::cors())
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
