table! {
    estados (id) {
        id -> Integer,
        sigla -> Text,
    }
}

table! {
    municipios (id) {
        id -> Integer,
        nome -> Text,
        numero_servidores -> Integer,
        estado_id -> Integer,
    }
}

table! {
    orgaos (id) {
        id -> Integer,
        nome -> Text,
        uf -> Nullable<Text>,
    }
}

table! {
    unidades (id) {
        id -> Integer,
        nome -> Text,
        uf -> Nullable<Text>,
        orgao_id -> Nullable<Integer>,
    }
}

table! {
    cargos (id) {
        id -> Integer,
        titulo -> Text,
        escolaridade -> Nullable<Text>,
    }
}

table! {
    servidores (id) {
        id -> Integer,
        cpf -> Text,
        nome -> Text,
        escolaridade -> Nullable<Text>,
        situacao -> Nullable<Text>,
    }
}

table! {
    gratificacoes (id) {
        id -> Integer,
        servidor_id -> Integer,
        cargo_id -> Nullable<Integer>,
        cargo_origem_id -> Nullable<Integer>,
        orgao_exercicio_id -> Nullable<Integer>,
        orgao_origem_id -> Nullable<Integer>,
        uorg_exercicio_id -> Nullable<Integer>,
        upag_id -> Nullable<Integer>,
        nome_rubrica -> Nullable<Text>,
        nivel_gratificacao -> Nullable<Text>,
        valor_centavos -> Nullable<BigInt>,
    }
}

joinable!(municipios -> estados (estado_id));
joinable!(unidades -> orgaos (orgao_id));
joinable!(gratificacoes -> servidores (servidor_id));

allow_tables_to_appear_in_same_query!(estados, municipios);
allow_tables_to_appear_in_same_query!(orgaos, unidades, cargos, servidores, gratificacoes);
