use diesel::prelude::*;

use super::schema::cargos;
use crate::database::{get_or_create, Conn, Error};

/// Resolves a position by its unique title.
pub(crate) fn find_or_create_cargo(
    conn: &Conn,
    titulo: &str,
    escolaridade: Option<&str>,
) -> Result<i32, Error> {
    use cargos::dsl;
    get_or_create(
        conn,
        |conn| {
            dsl::cargos
                .select(dsl::id)
                .filter(dsl::titulo.eq(titulo))
                .first::<i32>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(dsl::cargos)
                .values((dsl::titulo.eq(titulo), dsl::escolaridade.eq(escolaridade)))
                .execute(conn)
        },
    )
}
