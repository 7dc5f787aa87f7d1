//! Batch loaders for the two SQLite databases: the gratification extract and
//! the servant-count-per-municipality extract served by the API.

mod normalize;
mod reader;

use std::path::Path;

use csv::StringRecord;
use diesel::prelude::*;
use thiserror::Error;

use crate::database::{
    add_gratificacao, add_municipio, api_migrations, find_or_create_cargo, find_or_create_estado,
    find_or_create_orgao, find_or_create_servidor, find_or_create_unidade, grat_migrations, Conn,
    NewGratificacao, NewMunicipio, NewServidor,
};
use self::normalize::{normalize_cpf, parse_valor};
use self::reader::Table;

pub use self::reader::Encoding;

#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("database error: {0}")]
    Database(#[from] crate::database::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<diesel::result::Error> for Error {
    fn from(e: diesel::result::Error) -> Self {
        Error::Database(e.into())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ImportOptions {
    pub encoding: Encoding,
    /// Number of fact rows committed per transaction.
    pub checkpoint: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Latin1,
            checkpoint: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImportSummary {
    pub rows: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Imports the semicolon-delimited gratification extract into `database`,
/// creating the schema if needed.
pub fn import_gratificacoes(
    database: &str,
    csv_path: &Path,
    opts: &ImportOptions,
) -> Result<ImportSummary, Error> {
    let conn = Conn::establish(database).map_err(crate::database::Error::from)?;
    grat_migrations::run(&conn).map_err(crate::database::Error::from)?;
    let table = reader::read_table(csv_path, b';', opts.encoding)?;
    log::info!("{} linhas lidas de {}", table.records().len(), csv_path.display());
    import_gratificacoes_into(&conn, &table, opts.checkpoint)
}

/// Loads the UTF-8, comma-delimited servant-count extract into the API
/// database as `estados` and `municipios` rows.
pub fn import_municipios(database: &str, csv_path: &Path) -> Result<ImportSummary, Error> {
    let conn = Conn::establish(database).map_err(crate::database::Error::from)?;
    api_migrations::run(&conn).map_err(crate::database::Error::from)?;
    let table = reader::read_table(csv_path, b',', Encoding::Utf8)?;
    log::info!("{} linhas lidas de {}", table.records().len(), csv_path.display());
    import_municipios_into(&conn, &table)
}

fn import_gratificacoes_into(
    conn: &Conn,
    table: &Table,
    checkpoint: usize,
) -> Result<ImportSummary, Error> {
    let checkpoint = checkpoint.max(1);
    let mut inserted = 0;
    for (chunk_index, chunk) in table.records().chunks(checkpoint).enumerate() {
        let base = chunk_index * checkpoint;
        conn.transaction::<_, Error, _>(|| {
            for (offset, record) in chunk.iter().enumerate() {
                import_gratificacao_row(conn, table, record, base + offset)?;
            }
            Ok(())
        })?;
        inserted += chunk.len();
        log::info!("{} registros gravados", inserted);
    }
    Ok(ImportSummary {
        rows: table.records().len(),
        inserted,
        skipped: 0,
    })
}

fn import_gratificacao_row(
    conn: &Conn,
    table: &Table,
    record: &StringRecord,
    index: usize,
) -> Result<(), Error> {
    // A row with no usable CPF still identifies a distinct servant for this
    // run; the non-digit prefix keeps the placeholder out of real CPF space.
    let cpf = match table.field(record, "CPF").and_then(normalize_cpf) {
        Some(cpf) => cpf,
        None => format!("NOCPF_{}", index),
    };
    log::debug!("linha {}: CPF {}", index + 1, cpf);

    let servidor_id = find_or_create_servidor(
        conn,
        &NewServidor {
            cpf: &cpf,
            nome: table.field(record, "NOME_SERVIDOR").unwrap_or("SEM NOME"),
            escolaridade: table.field(record, "ESCOLARIDADE_SERVIDOR"),
            situacao: table.field(record, "SITUACAO_SERVIDOR"),
        },
    )?;

    let uf_uorg = table.field(record, "UF_UORG_EXERCICIO");
    let orgao_exercicio_id = table
        .field(record, "ORGAO_EXERCICIO")
        .map(|nome| find_or_create_orgao(conn, nome, uf_uorg))
        .transpose()?;
    let uorg_exercicio_id = table
        .field(record, "UORG_EXERCICIO")
        .map(|nome| find_or_create_unidade(conn, nome, uf_uorg, orgao_exercicio_id))
        .transpose()?;
    let upag_id = table
        .field(record, "UPAG")
        .map(|nome| find_or_create_unidade(conn, nome, table.field(record, "UF_UPAG"), None))
        .transpose()?;
    let cargo_id = table
        .field(record, "CARGO")
        .map(|titulo| {
            find_or_create_cargo(conn, titulo, table.field(record, "ESCOLARIDADE_CARGO"))
        })
        .transpose()?;
    let cargo_origem_id = table
        .field(record, "CARGO_ORIGEM")
        .map(|titulo| {
            find_or_create_cargo(conn, titulo, table.field(record, "ESCOLARIDADE_CARGO_ORIGEM"))
        })
        .transpose()?;
    let orgao_origem_id = table
        .field(record, "ORGAO_ORIGEM")
        .map(|nome| find_or_create_orgao(conn, nome, None))
        .transpose()?;

    add_gratificacao(
        conn,
        &NewGratificacao {
            servidor_id,
            cargo_id,
            cargo_origem_id,
            orgao_exercicio_id,
            orgao_origem_id,
            uorg_exercicio_id,
            upag_id,
            nome_rubrica: table.field(record, "NOME_RUBRICA"),
            nivel_gratificacao: table.field(record, "NIVEL_GRATIFICACAO"),
            valor_centavos: table.field(record, "VALOR").and_then(parse_valor),
        },
    )?;
    Ok(())
}

fn import_municipios_into(conn: &Conn, table: &Table) -> Result<ImportSummary, Error> {
    conn.transaction::<_, Error, _>(|| {
        let mut summary = ImportSummary {
            rows: table.records().len(),
            ..ImportSummary::default()
        };
        for (index, record) in table.records().iter().enumerate() {
            let sigla = table.field(record, "SG_UF_MUNICIPIO_UORG");
            let nome = table.field(record, "NO_MUNICIPIO_UORG");
            let servidores = table
                .field(record, "QTD_SERVIDORES_ATIVOS")
                .and_then(|v| v.parse::<i32>().ok());
            if let (Some(sigla), Some(nome), Some(numero_servidores)) = (sigla, nome, servidores) {
                let estado_id = find_or_create_estado(conn, sigla)?;
                add_municipio(
                    conn,
                    &NewMunicipio {
                        nome,
                        numero_servidores,
                        estado_id,
                    },
                )?;
                summary.inserted += 1;
            } else {
                log::warn!("linha {} ignorada: campos obrigatorios ausentes", index + 1);
                summary.skipped += 1;
            }
        }
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use diesel::dsl::count_star;
    use diesel::prelude::*;

    use super::reader::Table;
    use super::*;
    use crate::database::tests::{api_conn, grat_conn};

    const HEADER: &str = "CPF;NOME_SERVIDOR;ESCOLARIDADE_SERVIDOR;SITUACAO_SERVIDOR;\
ORGAO_EXERCICIO;UF_UORG_EXERCICIO;UORG_EXERCICIO;UPAG;UF_UPAG;CARGO;ESCOLARIDADE_CARGO;\
CARGO_ORIGEM;ESCOLARIDADE_CARGO_ORIGEM;ORGAO_ORIGEM;NOME_RUBRICA;NIVEL_GRATIFICACAO;VALOR";

    fn grat_table(rows: &[&str]) -> Table {
        let mut csv = String::from(HEADER);
        for row in rows {
            csv.push('\n');
            csv.push_str(row);
        }
        Table::from_reader(csv.as_bytes(), b';').expect("valid CSV")
    }

    #[test]
    fn same_agency_creates_one_orgao() {
        use crate::database::schema::{gratificacoes, orgaos};

        let conn = grat_conn();
        let table = grat_table(&[
            "111;MARIA;SUPERIOR;ATIVO;MINISTERIO DA SAUDE;DF;UORG A;UPAG A;DF;ANALISTA;\
SUPERIOR;;;;GDPGPE;13;1234,56",
            "222;JOAO;MEDIO;ATIVO;MINISTERIO DA SAUDE;DF;UORG B;UPAG A;DF;TECNICO;MEDIO;\
;;;GDPGPE;13;999,99",
        ]);
        let summary = import_gratificacoes_into(&conn, &table, 500).expect("import");
        assert_eq!(summary.inserted, 2);

        let orgao_count: i64 = orgaos::dsl::orgaos
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(orgao_count, 1);

        let orgao_id: i32 = orgaos::dsl::orgaos
            .select(orgaos::dsl::id)
            .first(&conn)
            .expect("orgao id");
        let referenced: Vec<Option<i32>> = gratificacoes::dsl::gratificacoes
            .select(gratificacoes::dsl::orgao_exercicio_id)
            .load(&conn)
            .expect("facts");
        assert_eq!(referenced, vec![Some(orgao_id), Some(orgao_id)]);
    }

    #[test]
    fn same_cpf_creates_one_servidor() {
        use crate::database::schema::servidores;

        let conn = grat_conn();
        let table = grat_table(&[
            "123.456.789-01;MARIA;;ATIVO;;;;;;;;;;;GDPGPE;13;100,00",
            "12345678901;MARIA;;ATIVO;;;;;;;;;;;GDPGPE;14;200,00",
        ]);
        import_gratificacoes_into(&conn, &table, 500).expect("import");

        let servidores: Vec<String> = servidores::dsl::servidores
            .select(servidores::dsl::cpf)
            .load(&conn)
            .expect("servidores");
        assert_eq!(servidores, vec!["12345678901".to_string()]);
    }

    #[test]
    fn empty_cpf_rows_get_distinct_placeholders() {
        use crate::database::schema::servidores;

        let conn = grat_conn();
        let table = grat_table(&[
            ";ANA;;ATIVO;;;;;;;;;;;GDPGPE;13;100,00",
            "---;BIA;;ATIVO;;;;;;;;;;;GDPGPE;13;100,00",
        ]);
        import_gratificacoes_into(&conn, &table, 500).expect("import");

        let mut cpfs: Vec<String> = servidores::dsl::servidores
            .select(servidores::dsl::cpf)
            .load(&conn)
            .expect("servidores");
        cpfs.sort();
        assert_eq!(cpfs, vec!["NOCPF_0".to_string(), "NOCPF_1".to_string()]);
    }

    #[test]
    fn malformed_valor_inserts_null_amount() {
        use crate::database::schema::gratificacoes;

        let conn = grat_conn();
        let table = grat_table(&["111;MARIA;;ATIVO;;;;;;;;;;;GDPGPE;13;n/d"]);
        let summary = import_gratificacoes_into(&conn, &table, 500).expect("import");
        assert_eq!(summary.inserted, 1);

        let valores: Vec<Option<i64>> = gratificacoes::dsl::gratificacoes
            .select(gratificacoes::dsl::valor_centavos)
            .load(&conn)
            .expect("facts");
        assert_eq!(valores, vec![None]);
    }

    #[test]
    fn upag_without_agency_is_shared_between_rows() {
        use crate::database::schema::unidades;

        let conn = grat_conn();
        let table = grat_table(&[
            "111;MARIA;;ATIVO;;;;COORD PAGAMENTO;DF;;;;;;GDPGPE;13;1,00",
            "222;JOAO;;ATIVO;;;;COORD PAGAMENTO;DF;;;;;;GDPGPE;13;2,00",
        ]);
        import_gratificacoes_into(&conn, &table, 500).expect("import");

        let unidade_count: i64 = unidades::dsl::unidades
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(unidade_count, 1);
    }

    #[test]
    fn checkpoint_smaller_than_input_still_imports_everything() {
        use crate::database::schema::gratificacoes;

        let conn = grat_conn();
        let rows: Vec<String> = (0..7)
            .map(|i| format!("{};SERVIDOR {};;ATIVO;;;;;;;;;;;GDPGPE;13;10,00", 100 + i, i))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = grat_table(&rows);
        let summary = import_gratificacoes_into(&conn, &table, 3).expect("import");
        assert_eq!(summary.inserted, 7);

        let fact_count: i64 = gratificacoes::dsl::gratificacoes
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(fact_count, 7);
    }

    #[test]
    fn failure_mid_chunk_keeps_only_committed_checkpoints() {
        use crate::database::schema::gratificacoes;

        let conn = grat_conn();
        // Simulates a crash while the second chunk is in flight.
        conn.execute(
            "CREATE TRIGGER gratificacoes_falha
             BEFORE INSERT ON gratificacoes
             WHEN NEW.nome_rubrica = 'FALHA'
             BEGIN
                 SELECT RAISE(ABORT, 'falha simulada');
             END",
        )
        .expect("trigger");

        let rows: Vec<String> = (0..8)
            .map(|i| {
                let rubrica = if i == 4 { "FALHA" } else { "GDPGPE" };
                format!(
                    "{};SERVIDOR {};;ATIVO;;;;;;;;;;;{};13;10,00",
                    200 + i,
                    i,
                    rubrica
                )
            })
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let table = grat_table(&rows);

        assert!(import_gratificacoes_into(&conn, &table, 3).is_err());

        // The first chunk of 3 committed; the chunk holding the failing row
        // rolled back entirely and nothing after it was attempted.
        let fact_count: i64 = gratificacoes::dsl::gratificacoes
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(fact_count, 3);
    }

    #[test]
    fn municipios_share_estado_rows() {
        use crate::database::schema::{estados, municipios};

        let conn = api_conn();
        let csv = "SG_UF_MUNICIPIO_UORG,NO_MUNICIPIO_UORG,QTD_SERVIDORES_ATIVOS\n\
SP,SAO PAULO,1200\nSP,CAMPINAS,300\nRJ,RIO DE JANEIRO,900\n";
        let table = Table::from_reader(csv.as_bytes(), b',').expect("valid CSV");
        let summary = import_municipios_into(&conn, &table).expect("import");
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.skipped, 0);

        let estado_count: i64 = estados::dsl::estados
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(estado_count, 2);

        let municipio_count: i64 = municipios::dsl::municipios
            .select(count_star())
            .first(&conn)
            .expect("count");
        assert_eq!(municipio_count, 3);
    }

    #[test]
    fn municipios_with_bad_count_are_skipped() {
        use crate::database::schema::municipios;

        let conn = api_conn();
        let csv = "SG_UF_MUNICIPIO_UORG,NO_MUNICIPIO_UORG,QTD_SERVIDORES_ATIVOS\n\
SP,SAO PAULO,muitos\nRJ,RIO DE JANEIRO,900\n";
        let table = Table::from_reader(csv.as_bytes(), b',').expect("valid CSV");
        let summary = import_municipios_into(&conn, &table).expect("import");
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 1);

        let nomes: Vec<String> = municipios::dsl::municipios
            .select(municipios::dsl::nome)
            .load(&conn)
            .expect("municipios");
        assert_eq!(nomes, vec!["RIO DE JANEIRO".to_string()]);
    }
}
