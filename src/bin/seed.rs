use std::io;

use projectforge::db::seed::{seed_demo, DEMO_EMAIL, DEMO_PASSWORD};
use projectforge::db::PgStore;
use projectforge::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = PgStore::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let report = seed_demo(&store, config.bcrypt_cost)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    if report.user_created {
        log::info!("created demo user {}", DEMO_EMAIL);
    } else {
        log::info!("demo user {} already exists", DEMO_EMAIL);
    }
    log::info!(
        "removed {} old projects, created {} projects with {} tasks",
        report.projects_removed,
        report.projects_created,
        report.tasks_created
    );
    log::info!("seeding complete; log in as {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
    Ok(())
}
