use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::time::interval;

use lixeira_api::{ApiClient, TrashItem};
use lixeira_common::{DEFAULT_BASE_URL, TRASH_ROOT, now_ms};

#[derive(Parser, Debug)]
#[command(name = "lixeira-monitor", about = "Countdown TUI da lixeira")]
struct Args {
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    #[arg(long, default_value = TRASH_ROOT)]
    path: String,
    /// Intervalo de recarga do listing, em segundos
    #[arg(long, default_value_t = 5)]
    refresh: u64,
}

struct App {
    items: Vec<TrashItem>,
    last_error: Option<String>,
    purged_total: usize,
}

impl App {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            last_error: None,
            purged_total: 0,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let api = ApiClient::new(&args.base_url)?;

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let mut ticker = interval(Duration::from_secs(1));
    let mut refresh = interval(Duration::from_secs(args.refresh.max(1)));

    // UI Loop
    loop {
        terminal.draw(|f| ui(f, &app, &args))?;

        // Input (checagem não bloqueante)
        if event::poll(Duration::from_millis(0))?
            && let Event::Key(key) = event::read()?
        {
            match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Char('p') => {
                    // purga manual; o backend decide o que remover
                    match api.purge().await {
                        Ok(outcome) => {
                            app.purged_total += outcome.purged.len();
                            app.last_error = None;
                        }
                        Err(e) => app.last_error = Some(e.to_string()),
                    }
                    reload(&api, &args.path, &mut app).await;
                }
                _ => {}
            }
        }

        tokio::select! {
            _ = refresh.tick() => reload(&api, &args.path, &mut app).await,
            _ = ticker.tick() => {} // só redesenha os countdowns
        }
    }

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

async fn reload(api: &ApiClient, path: &str, app: &mut App) {
    match api.list(path).await {
        Ok(mut items) => {
            // expirações mais próximas primeiro; perpétuos no fim
            items.sort_by_key(|item| {
                if item.expire_at > 0 {
                    item.expire_at
                } else {
                    i64::MAX
                }
            });
            app.items = items;
            app.last_error = None;
        }
        Err(e) => app.last_error = Some(e.to_string()),
    }
}

fn ui(f: &mut Frame, app: &App, args: &Args) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(size);

    let now = now_ms();
    let next = app
        .items
        .iter()
        .filter_map(|item| item.remaining_ms(now))
        .filter(|&remaining| remaining > 0)
        .min();
    let status = match next {
        Some(remaining) => format!(
            "{} itens | próxima expiração em {} | {} purgados",
            app.items.len(),
            countdown(remaining),
            app.purged_total
        ),
        None => format!(
            "{} itens | nada expira | {} purgados",
            app.items.len(),
            app.purged_total
        ),
    };

    let header = Paragraph::new(format!("{}{} — {status}", args.base_url, args.path))
        .block(Block::default().borders(Borders::ALL).title("Lixeira"))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = app
        .items
        .iter()
        .map(|item| item_line(item, now))
        .collect();
    if let Some(err) = &app.last_error {
        lines.push(Line::from(Span::styled(
            format!("erro: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Itens (q sai, p purga)"),
    );
    f.render_widget(body, chunks[1]);
}

fn item_line(item: &TrashItem, now: i64) -> Line<'static> {
    let label = format!("{:<44}", item.name);
    match item.remaining_ms(now) {
        None => Line::from(vec![
            Span::raw(label),
            Span::styled("perpétuo", Style::default().fg(Color::DarkGray)),
        ]),
        Some(remaining) if remaining <= 0 => Line::from(vec![
            Span::raw(label),
            Span::styled("expirado", Style::default().fg(Color::Red)),
        ]),
        Some(remaining) => {
            // amarelo quando falta menos de uma hora
            let style = if remaining < 3_600_000 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            Line::from(vec![
                Span::raw(label),
                Span::styled(countdown(remaining), style),
            ])
        }
    }
}

/// Countdown compacto em milissegundos restantes.
fn countdown(remaining_ms: i64) -> String {
    let secs = remaining_ms / 1000;
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let mins = (secs % 3_600) / 60;
    let rem_secs = secs % 60;
    if days > 0 {
        format!("{days}d {hours:02}h")
    } else if hours > 0 {
        format!("{hours}h {mins:02}m")
    } else {
        format!("{mins:02}m {rem_secs:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_under_an_hour() {
        assert_eq!(countdown(5 * 60_000 + 3_000), "05m 03s");
    }

    #[test]
    fn countdown_hours() {
        assert_eq!(countdown(2 * 3_600_000 + 30 * 60_000), "2h 30m");
    }

    #[test]
    fn countdown_days() {
        assert_eq!(countdown(3 * 86_400_000 + 4 * 3_600_000), "3d 04h");
    }
}
