use actix_web::{http, web::Data, HttpResponse};
use diesel::prelude::*;
use serde::Serialize;

use super::schema::estados;
use crate::database::{build_err_msg, get_or_create, Conn, Error, Pool};

#[derive(Debug, Identifiable, Queryable, Serialize)]
#[table_name = "estados"]
pub(crate) struct Estado {
    pub(crate) id: i32,
    pub(crate) sigla: String,
}

pub(crate) async fn get_estados_table(pool: Data<Pool>) -> Result<HttpResponse, actix_web::Error> {
    let query_result: Result<Vec<Estado>, Error> =
        pool.get().map_err(Into::into).and_then(|conn| {
            estados::dsl::estados
                .load::<Estado>(&conn)
                .map_err(Into::into)
        });

    match query_result {
        Ok(estados_table) => Ok(HttpResponse::Ok()
            .header(http::header::CONTENT_TYPE, "application/json")
            .json(estados_table)),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(build_err_msg(&e))),
    }
}

pub(crate) fn find_or_create_estado(conn: &Conn, sigla: &str) -> Result<i32, Error> {
    use estados::dsl;
    get_or_create(
        conn,
        |conn| {
            dsl::estados
                .select(dsl::id)
                .filter(dsl::sigla.eq(sigla))
                .first::<i32>(conn)
                .optional()
        },
        |conn| {
            diesel::insert_into(dsl::estados)
                .values(dsl::sigla.eq(sigla))
                .execute(conn)
        },
    )
}
