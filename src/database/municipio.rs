use actix_web::{http, web::Data, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;

use super::schema::municipios;
use crate::database::{build_err_msg, Conn, Error, Pool};

#[derive(Debug, Identifiable, Queryable, Serialize)]
#[table_name = "municipios"]
pub(crate) struct Municipio {
    pub(crate) id: i32,
    pub(crate) nome: String,
    pub(crate) numero_servidores: i32,
    pub(crate) estado_id: i32,
}

#[derive(Debug, Insertable)]
#[table_name = "municipios"]
pub(crate) struct NewMunicipio<'a> {
    pub(crate) nome: &'a str,
    pub(crate) numero_servidores: i32,
    pub(crate) estado_id: i32,
}

pub(crate) async fn get_municipios_table(
    pool: Data<Pool>,
) -> Result<HttpResponse, actix_web::Error> {
    let query_result: Result<Vec<Municipio>, Error> =
        pool.get().map_err(Into::into).and_then(|conn| {
            municipios::dsl::municipios
                .load::<Municipio>(&conn)
                .map_err(Into::into)
        });

    match query_result {
        Ok(municipios_table) => Ok(HttpResponse::Ok()
            .header(http::header::CONTENT_TYPE, "application/json")
            .json(municipios_table)),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(build_err_msg(&e))),
    }
}

pub(crate) fn add_municipio(conn: &Conn, municipio: &NewMunicipio) -> Result<usize, Error> {
    use municipios::dsl;
    diesel::insert_into(dsl::municipios)
        .values(municipio)
        .execute(conn)
        .map_err(Into::into)
}
