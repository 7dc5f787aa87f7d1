use diesel::prelude::*;

use super::schema::gratificacoes;
use crate::database::{Conn, Error};

#[derive(Debug, Insertable)]
#[table_name = "gratificacoes"]
pub(crate) struct NewGratificacao<'a> {
    pub(crate) servidor_id: i32,
    pub(crate) cargo_id: Option<i32>,
    pub(crate) cargo_origem_id: Option<i32>,
    pub(crate) orgao_exercicio_id: Option<i32>,
    pub(crate) orgao_origem_id: Option<i32>,
    pub(crate) uorg_exercicio_id: Option<i32>,
    pub(crate) upag_id: Option<i32>,
    pub(crate) nome_rubrica: Option<&'a str>,
    pub(crate) nivel_gratificacao: Option<&'a str>,
    pub(crate) valor_centavos: Option<i64>,
}

pub(crate) fn add_gratificacao(conn: &Conn, grat: &NewGratificacao) -> Result<usize, Error> {
    use gratificacoes::dsl;
    diesel::insert_into(dsl::gratificacoes)
        .values(grat)
        .execute(conn)
        .map_err(Into::into)
}
