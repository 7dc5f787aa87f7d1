use diesel::prelude::*;

use super::schema::unidades;
use crate::database::{get_or_create, Conn, Error};

/// Resolves an organizational unit by (name, parent agency).
///
/// Units without a parent agency (paying units come in that way) are keyed on
/// name alone among the orphan units; SQLite treats NULLs as distinct in the
/// unique constraint, so the lookup-first order is what actually deduplicates
/// them.
pub(crate) fn find_or_create_unidade(
    conn: &Conn,
    nome: &str,
    uf: Option<&str>,
    orgao_id: Option<i32>,
) -> Result<i32, Error> {
    use unidades::dsl;
    get_or_create(
        conn,
        |conn| {
            let query = dsl::unidades
                .select(dsl::id)
                .filter(dsl::nome.eq(nome))
                .into_boxed();
            let query = match orgao_id {
                Some(id) => query.filter(dsl::orgao_id.eq(id)),
                None => query.filter(dsl::orgao_id.is_null()),
            };
            query.first::<i32>(conn).optional()
        },
        |conn| {
            diesel::insert_into(dsl::unidades)
                .values((
                    dsl::nome.eq(nome),
                    dsl::uf.eq(uf),
                    dsl::orgao_id.eq(orgao_id),
                ))
                .execute(conn)
        },
    )
}
