#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;

pub mod app;
mod database;
pub mod importer;
mod server;

use log::error;

pub fn log_error(err: &dyn std::error::Error) {
    error!("{}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        error!("\tcaused by: {}", cause);
        source = cause.source();
    }
}
