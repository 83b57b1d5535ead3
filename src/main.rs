#[cfg(feature = "ssr")]
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    use actix_web::{web, App, HttpResponse, HttpServer};
    use product_reviews::api;
    use product_reviews::config::{Settings, CONFIG_PATH_VAR};
    use product_reviews::db::Database;
    use std::io;
    use std::path::PathBuf;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let config_path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    let settings = Settings::load(config_path.as_deref()).map_err(io::Error::other)?;

    // Initialize the database
    let db = Database::new(&settings.database_path)
        .map_err(io::Error::other)?
        .with_page_size(settings.page_size);
    db.create_schema().await.map_err(io::Error::other)?; // Ensure the schema is created
    let db = web::Data::new(db);

    log::info!("[SERVER] listening on http://{}", &settings.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(db.clone())
            .configure(api::configure)
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("Product reviews") }))
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no server without the `ssr` feature; the library is usable on its own
}
