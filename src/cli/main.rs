use clap::{App, Arg, ArgMatches, SubCommand};
use servidores::importer::{self, Encoding, ImportOptions, ImportSummary};

fn create_app() -> App<'static, 'static> {
    App::new("carga")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Carga de dados dos servidores")
        .subcommand(
            SubCommand::with_name("gratificacoes")
                .about("Importa o CSV de gratificacoes (separado por ponto e virgula)")
                .arg(
                    Arg::with_name("INPUT")
                        .help("Sets the input file to use")
                        .required(true),
                )
                .arg(
                    Arg::with_name("database")
                        .long("database")
                        .takes_value(true)
                        .help("SQLite database path (default: GRAT_DATABASE_URL or gratificacoes.db)"),
                )
                .arg(
                    Arg::with_name("encoding")
                        .long("encoding")
                        .takes_value(true)
                        .possible_values(&["latin1", "utf8"])
                        .default_value("latin1"),
                )
                .arg(
                    Arg::with_name("checkpoint")
                        .long("checkpoint")
                        .takes_value(true)
                        .default_value("500")
                        .validator(validate_checkpoint)
                        .help("Commit every N records"),
                ),
        )
        .subcommand(
            SubCommand::with_name("municipios")
                .about("Carrega o CSV de servidores ativos por municipio")
                .arg(
                    Arg::with_name("INPUT")
                        .help("Sets the input file to use")
                        .required(true),
                )
                .arg(
                    Arg::with_name("database")
                        .long("database")
                        .takes_value(true)
                        .help("SQLite database path (default: DATABASE_URL or servidores.db)"),
                ),
        )
}

fn validate_checkpoint(v: String) -> Result<(), String> {
    v.parse::<usize>()
        .map(|_| ())
        .map_err(|e| format!("invalid checkpoint value '{}': {}", v, e))
}

fn database_path(matches: &ArgMatches, env_var: &str, default: &str) -> String {
    matches
        .value_of("database")
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or_else(|| default.to_string())
}

fn run(matches: &ArgMatches) -> Result<ImportSummary, importer::Error> {
    match matches.subcommand() {
        ("gratificacoes", Some(sub)) => {
            let input = sub.value_of("INPUT").unwrap();
            let database = database_path(sub, "GRAT_DATABASE_URL", "gratificacoes.db");
            let encoding = sub
                .value_of("encoding")
                .unwrap()
                .parse::<Encoding>()
                .unwrap_or(Encoding::Latin1);
            // validated by clap, so the parse cannot fail
            let checkpoint = sub
                .value_of("checkpoint")
                .unwrap()
                .parse::<usize>()
                .unwrap_or(500);
            let opts = ImportOptions {
                encoding,
                checkpoint,
            };
            importer::import_gratificacoes(&database, input.as_ref(), &opts)
        }
        ("municipios", Some(sub)) => {
            let input = sub.value_of("INPUT").unwrap();
            let database = database_path(sub, "DATABASE_URL", "servidores.db");
            importer::import_municipios(&database, input.as_ref())
        }
        _ => {
            eprintln!("{}", matches.usage());
            std::process::exit(2);
        }
    }
}

fn main() {
    env_logger::init();
    dotenv::dotenv().ok();

    let matches = create_app().get_matches();
    match run(&matches) {
        Ok(summary) => println!(
            "importacao finalizada: {} linhas lidas, {} registros gravados, {} ignorados",
            summary.rows, summary.inserted, summary.skipped
        ),
        Err(e) => {
            servidores::log_error(&e);
            eprintln!("importacao falhou: {}", e);
            std::process::exit(1);
        }
    }
}
