use diesel::prelude::*;

use super::schema::servidores;
use crate::database::{get_or_create, Conn, Error};

#[derive(Debug, Insertable)]
#[table_name = "servidores"]
pub(crate) struct NewServidor<'a> {
    pub(crate) cpf: &'a str,
    pub(crate) nome: &'a str,
    pub(crate) escolaridade: Option<&'a str>,
    pub(crate) situacao: Option<&'a str>,
}

/// Resolves a servant by CPF, inserting it on first sight.
pub(crate) fn find_or_create_servidor(conn: &Conn, servidor: &NewServidor) -> Result<i32, Error> {
    use servidores::dsl;
    get_or_create(
        conn,
        |conn| {
            dsl::servidores
                .select(dsl::id)
                .filter(dsl::cpf.eq(servidor.cpf))
                .first::<i32>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(dsl::servidores)
                .values(servidor)
                .execute(conn)
        },
    )
}
