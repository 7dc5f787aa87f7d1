use crate::server;
use actix_web::dev::Server;
use anyhow::{Context, Result};
use clap::App;

fn create_app() -> App<'static, 'static> {
    App::new("servidores")
        .version(env!("CARGO_PKG_VERSION"))
        .about("API de servidores por municipio")
}

pub fn init() -> Result<Server> {
    let _matches = create_app().get_matches();
    dotenv::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
    let server_addr =
        std::env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let server_addr = server_addr
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("invalid IP address/port for the API server: {}", server_addr))?;

    Ok(server::run(&database_url, &server_addr).context("failed to create server")?)
}
