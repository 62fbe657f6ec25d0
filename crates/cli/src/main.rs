use clap::{Parser, Subcommand};
use tokio::signal;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{info, warn};

use lixeira_api::{ApiClient, TrashItem};
use lixeira_common::{DEFAULT_BASE_URL, DEFAULT_RETENTION_DAYS, TRASH_ROOT, now_ms};
use lixeira_watcher::TrashWatcher;

#[derive(Parser, Debug)]
#[command(
    name = "lixeira-cli",
    about = "Lixeira — cliente de retenção e purga do cloud storage"
)]
struct Args {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lista um diretório do storage
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Move um item para a lixeira, ou exclui permanentemente
    Rm {
        path: String,
        /// Exclui de vez, sem passar pela lixeira
        #[arg(long)]
        permanent: bool,
        #[arg(long)]
        recursive: bool,
        /// Dias de retenção na lixeira
        #[arg(long, default_value_t = DEFAULT_RETENTION_DAYS)]
        days: u32,
    },
    /// Restaura um item da lixeira para o caminho original
    Restore { path: String },
    /// Dispara uma purga imediata no backend
    Purge,
    /// Observa a lixeira até ctrl-c: purga periódica + timer exato
    Watch {
        #[arg(long, default_value = TRASH_ROOT)]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lixeira_cli=info,lixeira_watcher=info".into()),
        )
        .init();

    let args = Args::parse();
    let api = ApiClient::new(&args.base_url)?;

    match args.command {
        Command::Ls { path } => {
            let items = api.list(&path).await?;
            print_items(&items);
        }
        Command::Rm {
            path,
            permanent,
            recursive,
            days,
        } => {
            let retention = (!permanent).then_some(days);
            api.delete(&path, permanent, recursive, retention).await?;
            if permanent {
                println!("excluído permanentemente: {path}");
            } else {
                println!("movido para a lixeira, retenção de {days} dias: {path}");
            }
        }
        Command::Restore { path } => {
            api.restore(&path).await?;
            println!("restaurado: {path}");
        }
        Command::Purge => {
            let outcome = api.purge().await?;
            if outcome.is_empty() {
                println!("nada para purgar");
            } else {
                for path in &outcome.purged {
                    println!("purgado: {path}");
                }
            }
        }
        Command::Watch { path } => watch(api, &path).await?,
    }

    Ok(())
}

/// Loop da view de lixeira: alimenta snapshots no watcher e recarrega o
/// listing a cada purga efetiva, até ctrl-c.
async fn watch(api: ApiClient, path: &str) -> anyhow::Result<()> {
    let watcher = TrashWatcher::new(api.clone());
    let mut events = BroadcastStream::new(watcher.events());

    watcher.enter_view();

    let items = api.list(path).await?;
    print_items(&items);
    watcher.snapshot_loaded(items).await;

    loop {
        tokio::select! {
            maybe = events.next() => match maybe {
                Some(Ok(event)) => {
                    info!("backend purgou {} itens", event.purged.len());
                    match api.list(path).await {
                        Ok(items) => {
                            print_items(&items);
                            watcher.snapshot_loaded(items).await;
                        }
                        Err(e) => warn!("recarga do listing falhou: {e}"),
                    }
                }
                // evento perdido por lag; o próximo ciclo corrige
                Some(Err(_)) => continue,
                None => break,
            },
            _ = signal::ctrl_c() => {
                info!("encerrando");
                break;
            }
        }
    }

    watcher.exit_view();
    Ok(())
}

fn print_items(items: &[TrashItem]) {
    if items.is_empty() {
        println!("(vazio)");
        return;
    }
    let now = now_ms();
    for item in items {
        let kind = if item.is_directory { "dir " } else { "file" };
        println!(
            "{kind}  {:>10}  {:<10}  {}",
            format_size(item.size),
            format_remaining(item.expire_at, now),
            item.path
        );
    }
}

/// Countdown humano até a expiração: "3d02h", "5m30s", "expirado", "-".
fn format_remaining(expire_at: i64, now_ms: i64) -> String {
    if expire_at <= 0 {
        return "-".into();
    }
    let diff = expire_at - now_ms;
    if diff <= 0 {
        return "expirado".into();
    }
    let secs = diff / 1000;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    let rem_secs = secs % 60;
    if days > 0 {
        format!("{days}d{hours:02}h")
    } else if hours > 0 {
        format!("{hours}h{mins:02}m")
    } else if mins > 0 {
        format!("{mins}m{rem_secs:02}s")
    } else {
        format!("{rem_secs}s")
    }
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
