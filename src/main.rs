use city_recipes::{AppConfig, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_tracing(&config.logging);

    web::run(config).await
}
