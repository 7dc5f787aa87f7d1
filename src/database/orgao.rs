use diesel::prelude::*;

use super::schema::orgaos;
use crate::database::{get_or_create, Conn, Error};

/// Resolves an agency by its globally unique name.
///
/// The `uf` recorded is the one seen on the first occurrence; later rows with
/// the same agency name do not overwrite it.
pub(crate) fn find_or_create_orgao(
    conn: &Conn,
    nome: &str,
    uf: Option<&str>,
) -> Result<i32, Error> {
    use orgaos::dsl;
    get_or_create(
        conn,
        |conn| {
            dsl::orgaos
                .select(dsl::id)
                .filter(dsl::nome.eq(nome))
                .first::<i32>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(dsl::orgaos)
                .values((dsl::nome.eq(nome), dsl::uf.eq(uf)))
                .execute(conn)
        },
    )
}
