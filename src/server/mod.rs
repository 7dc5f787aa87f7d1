use actix_web::{dev::Server, middleware, App, HttpServer};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::io;
use thiserror::Error;

use crate::database;

mod route;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not bind server address: {0}")]
    Bind(io::Error),
    #[error("could not connect to database: {0}")]
    DatabaseConnection(r2d2::Error),
    #[error("could not initialize/migrate database: {0}")]
    DatabaseMigration(diesel_migrations::RunMigrationsError),
    #[error("could not create a database connection pool: {0}")]
    PoolInitialization(r2d2::Error),
}

pub(crate) fn run(database_url: &str, server_addr: &std::net::SocketAddr) -> Result<Server, Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::new(manager).map_err(Error::PoolInitialization)?;
    let conn = pool.get().map_err(Error::DatabaseConnection)?;
    database::api_migrations::run(&conn).map_err(Error::DatabaseMigration)?;
    drop(conn);

    let server = HttpServer::new(move || {
        App::new()
            .data(pool.clone())
            .configure(route::init_app)
            .wrap(middleware::Logger::default())
    })
    .bind(server_addr)
    .map_err(Error::Bind)?
    .run();
    Ok(server)
}
