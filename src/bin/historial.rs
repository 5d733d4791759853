// src/bin/historial.rs

// Visor do historial de entradas em modo terminal.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use ferreteria::viewer::{
    export::{write_csv, CSV_FILE_NAME},
    render::render,
    session::{login, Navegacion, SesionStore},
    HistorialView, HttpHistorialClient, RangoFechas, SortConfig, SortDirection, SortKey,
    ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "historial")]
#[command(about = "Historial de entradas de inventario da ferretería")]
struct Cli {
    /// URL base da API (ex: http://localhost:5000/api)
    #[arg(long, env = "FERRETERIA_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Comando,
}

#[derive(Subcommand, Debug)]
enum Comando {
    /// Autentica e grava a sessão
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FERRETERIA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Encerra a sessão
    Logout,
    /// Mostra uma página do historial
    Listar {
        #[command(flatten)]
        filtros: Filtros,
        #[arg(long, default_value_t = 1)]
        pagina: usize,
    },
    /// Exporta o conjunto filtrado para CSV
    Exportar {
        #[command(flatten)]
        filtros: Filtros,
        #[arg(long, default_value = CSV_FILE_NAME)]
        salida: PathBuf,
    },
    /// Modo interativo (busca com debounce)
    Interactivo,
}

#[derive(Args, Debug)]
struct Filtros {
    /// Busca parcial pelo código do produto
    #[arg(long, default_value = "")]
    buscar: String,
    /// Data inicial (YYYY-MM-DD)
    #[arg(long)]
    desde: Option<NaiveDate>,
    /// Data final (YYYY-MM-DD)
    #[arg(long)]
    hasta: Option<NaiveDate>,
    /// Coluna: producto, codigo, cantidad, stock_anterior, stock_nuevo, costo, fecha, operacion
    #[arg(long, value_parser = parse_sort_key)]
    orden: Option<SortKey>,
    /// Ordem descendente
    #[arg(long)]
    desc: bool,
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    SortKey::parse(value).ok_or_else(|| format!("coluna desconhecida: {value}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs vão para stderr; a tabela vai para stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = ViewerConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    let store = SesionStore::new(config.session_file.clone());

    match cli.command {
        Comando::Login { email, password } => {
            let sesion = login(&config.api_url, &email, &password, config.request_timeout).await?;
            store.save(&sesion).await?;
            println!("Sessão iniciada para {} (expira em {})", sesion.email, sesion.expira_em);
        }
        Comando::Logout => {
            let Navegacion::Raiz = store.logout().await?;
            println!("Sessão encerrada");
        }
        Comando::Listar { filtros, pagina } => {
            let view = open_view(&store, &config).await?;
            apply_filtros(&view, &filtros).await?;
            view.set_page(pagina);
            println!("{}", render(&view.snapshot(), &view.sort()));
        }
        Comando::Exportar { filtros, salida } => {
            let view = open_view(&store, &config).await?;
            apply_filtros(&view, &filtros).await?;
            let total = write_csv(&salida, &view.exportables()?).await?;
            println!("{} movimentos exportados para {}", total, salida.display());
        }
        Comando::Interactivo => {
            let view = open_view(&store, &config).await?;
            view.refresh().await;
            interactivo(&view, &store).await?;
        }
    }

    Ok(())
}

// Só entra quem tem sessão válida
async fn open_view(store: &SesionStore, config: &ViewerConfig) -> anyhow::Result<HistorialView<HttpHistorialClient>> {
    let Some(sesion) = store.current().await? else {
        bail!("Sessão ausente ou expirada. Use `historial login` primeiro.");
    };
    let client = HttpHistorialClient::new(&config.api_url, Some(sesion.token), config.request_timeout)
        .context("não foi possível criar o cliente HTTP")?;
    Ok(HistorialView::new(client, config.clone()))
}

async fn apply_filtros(view: &HistorialView<HttpHistorialClient>, filtros: &Filtros) -> anyhow::Result<()> {
    if let (Some(desde), Some(hasta)) = (filtros.desde, filtros.hasta) {
        if desde > hasta {
            bail!("--desde ({desde}) é posterior a --hasta ({hasta})");
        }
    }
    // sem --orden fica o padrão (fecha descendente)
    if let Some(key) = filtros.orden {
        let direction = if filtros.desc { SortDirection::Desc } else { SortDirection::Asc };
        view.set_sort(SortConfig { key, direction });
    }

    view.apply_filters(filtros.buscar.clone(), RangoFechas::new(filtros.desde, filtros.hasta))
        .await;
    Ok(())
}

const AJUDA: &str = "\
Digite para buscar por código (debounce de 300 ms).
Comandos:
  /p N                ir para a página N
  /o COLUNA           ordenar (repita para inverter)
  /f DESDE HASTA      filtrar datas (YYYY-MM-DD, '-' deixa em aberto)
  /f                  limpar filtro de datas
  /x [ARQUIVO]        exportar CSV
  /r                  recarregar
  /logout             encerrar sessão e sair
  /q                  sair";

async fn interactivo(view: &HistorialView<HttpHistorialClient>, store: &SesionStore) -> anyhow::Result<()> {
    println!("{AJUDA}\n");
    let mut revision = view.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            changed = revision.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("\n{}", render(&view.snapshot(), &view.sort()));
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match comando(view, store, line.trim_end()).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("⚠️  {e:#}"),
                }
            }
        }
    }

    view.teardown();
    Ok(())
}

// Ok(false) = sair
async fn comando(view: &HistorialView<HttpHistorialClient>, store: &SesionStore, line: &str) -> anyhow::Result<bool> {
    let Some(cmd) = line.strip_prefix('/') else {
        view.set_search_text(line);
        return Ok(true);
    };

    let mut partes = cmd.split_whitespace();
    match partes.next().unwrap_or_default() {
        "q" | "salir" => return Ok(false),
        "logout" => {
            let Navegacion::Raiz = store.logout().await?;
            println!("Sessão encerrada");
            return Ok(false);
        }
        "p" => {
            let pagina: usize = partes.next().context("uso: /p N")?.parse().context("página inválida")?;
            view.set_page(pagina);
        }
        "o" => {
            let coluna = partes.next().context("uso: /o COLUNA")?;
            let key = parse_sort_key(coluna).map_err(anyhow::Error::msg)?;
            view.request_sort(key);
        }
        "f" => match (partes.next(), partes.next()) {
            (None, _) => view.clear_date_range().await,
            (Some(desde), hasta) => {
                let rango = RangoFechas::new(parse_fecha(desde)?, hasta.map(parse_fecha).transpose()?.flatten());
                view.set_date_range(rango).await;
            }
        },
        "x" => {
            let salida = partes.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(CSV_FILE_NAME));
            let total = write_csv(&salida, &view.exportables()?).await?;
            println!("{} movimentos exportados para {}", total, salida.display());
        }
        "r" => view.refresh().await,
        "h" | "ajuda" => println!("{AJUDA}"),
        otro => bail!("comando desconhecido: /{otro}"),
    }
    Ok(true)
}

fn parse_fecha(value: &str) -> anyhow::Result<Option<NaiveDate>> {
    if value == "-" {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .with_context(|| format!("data inválida: {value}"))
}
