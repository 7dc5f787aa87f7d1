use diesel::r2d2::ConnectionManager;
use diesel::result::DatabaseErrorKind;
use diesel::sqlite::SqliteConnection;
use serde_json::json;
use thiserror::Error;

mod cargo;
mod estado;
mod gratificacao;
mod municipio;
mod orgao;
pub(crate) mod schema;
mod servidor;
mod unidade;

pub(crate) use self::cargo::*;
pub(crate) use self::estado::*;
pub(crate) use self::gratificacao::*;
pub(crate) use self::municipio::*;
pub(crate) use self::orgao::*;
pub(crate) use self::servidor::*;
pub(crate) use self::unidade::*;

pub(crate) type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub(crate) type Conn = SqliteConnection;

#[derive(Debug, Error)]
pub enum Error {
    #[error("record does not exist")]
    RecordNotExist,
    #[error("diesel connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("migration error: {0}")]
    Migration(#[from] diesel_migrations::RunMigrationsError),
    #[error("query error: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("connection error: {0}")]
    R2D2(#[from] r2d2::Error),
}

pub(crate) fn build_err_msg(err: &dyn std::error::Error) -> String {
    log::error!("{}", err);
    let mut err_msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        log::error!("\tcaused by: {}", cause);
        err_msg.push_str(&format!("\n\tcaused by: {}", cause));
        source = cause.source();
    }

    json!({ "message": err_msg }).to_string()
}

/// Looks up a row by its natural key and inserts it only if absent.
///
/// A unique-constraint violation from `insert` means another insert of the
/// same key won the race; it is swallowed and the key is looked up again.
pub(crate) fn get_or_create<T>(
    conn: &Conn,
    lookup: impl Fn(&Conn) -> diesel::QueryResult<Option<T>>,
    insert: impl FnOnce(&Conn) -> diesel::QueryResult<usize>,
) -> Result<T, Error> {
    if let Some(found) = lookup(conn)? {
        return Ok(found);
    }
    match insert(conn) {
        Ok(_) => (),
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => (),
        Err(e) => return Err(e.into()),
    }
    lookup(conn)?.ok_or(Error::RecordNotExist)
}

pub(crate) mod api_migrations {
    use super::Conn;

    embed_migrations!("migrations/api");

    pub(crate) fn run(conn: &Conn) -> Result<(), diesel_migrations::RunMigrationsError> {
        embedded_migrations::run(conn)
    }
}

pub(crate) mod grat_migrations {
    use super::Conn;

    embed_migrations!("migrations/grat");

    pub(crate) fn run(conn: &Conn) -> Result<(), diesel_migrations::RunMigrationsError> {
        embedded_migrations::run(conn)
    }
}
