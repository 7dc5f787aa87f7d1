use actix_web::{
    guard,
    web::{get, resource, ServiceConfig},
    HttpResponse,
};
use serde_json::json;

use crate::database::{get_estados_table, get_municipios_table};

async fn raiz() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "mensagem": "API de servidores funcionando!" }))
}

pub(crate) fn init_app(cfg: &mut ServiceConfig) {
    cfg.service(resource("/").guard(guard::Get()).route(get().to(raiz)))
        .service(
            resource("/estados")
                .guard(guard::Get())
                .route(get().to(get_estados_table)),
        )
        .service(
            resource("/municipios")
                .guard(guard::Get())
                .route(get().to(get_municipios_table)),
        );
}
