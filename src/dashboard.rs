use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::{error, info};

use crate::assistant::Assistant;
use crate::config::Config;
use crate::dataset::{CleanReport, JobTable};
use crate::scrape::{refresh, Scraper};
use crate::session::Session;

/// Dashboard state that outlives a single frame.
pub struct Dashboard {
    pub session: Session,
    pub input: String,
    pub table_state: TableState,
    pub status: String,
}

impl Dashboard {
    pub fn new(session: Session) -> Self {
        let mut table_state = TableState::default();
        if !session.jobs().is_empty() {
            table_state.select(Some(0)); // Select the first row by default
        }
        Self {
            session,
            input: String::new(),
            table_state,
            status: String::new(),
        }
    }

    fn select_next(&mut self) {
        let len = self.session.jobs().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    fn select_previous(&mut self) {
        let len = self.session.jobs().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Swaps in a freshly scraped table. A failed refresh keeps the current
    /// table and shows the error in the header.
    pub fn apply_refresh(&mut self, result: Result<(JobTable, CleanReport)>) {
        match result {
            Ok((table, _)) => {
                self.session.replace_table(table);
                self.status.clear();
            }
            Err(e) => {
                error!(error = %e, "scheduled refresh failed");
                self.status = format!("Refresh failed: {e}");
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.session.jobs().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            _ => {}
        }
    }
}

/// Runs the interactive dashboard until Esc / Ctrl-C. The jobs table is
/// re-scraped every `config.refresh_interval`, synchronously.
pub fn run_dashboard(config: &Config, scraper: &Scraper, assistant: &Assistant, session: Session) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut dashboard = Dashboard::new(session);
    let result = event_loop(&mut terminal, &mut dashboard, config, scraper, assistant);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    dashboard: &mut Dashboard,
    config: &Config,
    scraper: &Scraper,
    assistant: &Assistant,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    loop {
        if last_refresh.elapsed() >= config.refresh_interval {
            dashboard.status = "Refreshing jobs...".to_string();
            terminal.draw(|f| ui(f, dashboard))?;
            dashboard.apply_refresh(refresh(scraper, config));
            last_refresh = Instant::now();
        }

        terminal.draw(|f| ui(f, dashboard))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Down => dashboard.select_next(),
            KeyCode::Up => dashboard.select_previous(),
            KeyCode::Backspace => {
                dashboard.input.pop();
            }
            KeyCode::Enter => {
                let message = std::mem::take(&mut dashboard.input);
                if message.trim().is_empty() {
                    continue;
                }
                dashboard.status = "Asking the assistant...".to_string();
                terminal.draw(|f| ui(f, dashboard))?;
                dashboard.session.submit(&message, assistant);
                dashboard.status.clear();
            }
            KeyCode::Char(c) => dashboard.input.push(c),
            _ => {}
        }
    }

    info!(turns = dashboard.session.transcript().len(), "dashboard closed");
    Ok(())
}

pub fn ui(f: &mut Frame, dashboard: &mut Dashboard) {
    let rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .margin(1)
        .split(f.size());

    render_header(f, rects[0], dashboard);
    render_jobs(f, rects[1], dashboard);
    render_chat(f, rects[2], dashboard);
    render_input(f, rects[3], dashboard);
}

fn render_header(f: &mut Frame, area: ratatui::layout::Rect, dashboard: &Dashboard) {
    let jobs = dashboard.session.jobs().len();
    let mut spans = if jobs > 0 {
        vec![Span::raw(format!("Total jobs found: {jobs}"))]
    } else {
        vec![Span::styled(
            "No jobs found. Try refreshing or check the website.",
            Style::default().fg(Color::Yellow),
        )]
    };
    if !dashboard.status.is_empty() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(dashboard.status.clone(), Style::default().fg(Color::Magenta)));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Live JobYaari Jobs & Chatbot"),
    );
    f.render_widget(header, area);
}

fn render_jobs(f: &mut Frame, area: ratatui::layout::Rect, dashboard: &mut Dashboard) {
    let selected_style = Style::default().add_modifier(Modifier::REVERSED).fg(Color::Yellow);
    let normal_style = Style::default().fg(Color::White);
    let header_cells = [
        "Title", "Organization", "Salary", "Experience", "Location", "Last Date", "Category",
    ]
    .iter()
    .map(|h| Cell::from(*h).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells)
        .style(normal_style)
        .height(1)
        .bottom_margin(1);

    let rows = dashboard.session.jobs().iter().map(|item| {
        let cells = vec![
            Cell::from(item.title.clone()),
            Cell::from(item.organization.clone()),
            Cell::from(item.salary.clone()),
            Cell::from(item.experience.clone()),
            Cell::from(item.location.clone()),
            Cell::from(item.last_date.clone()),
            Cell::from(item.category.clone()),
        ];
        Row::new(cells).style(normal_style)
    });

    let col_widths = vec![
        Constraint::Min(20), // Title
        Constraint::Min(18), // Organization
        Constraint::Min(12), // Salary
        Constraint::Min(10), // Experience
        Constraint::Min(16), // Location
        Constraint::Min(10), // Last date
        Constraint::Min(11), // Category
    ];

    let table = Table::new(rows, col_widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Jobs"))
        .highlight_style(selected_style)
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut dashboard.table_state);
}

fn render_chat(f: &mut Frame, area: ratatui::layout::Rect, dashboard: &Dashboard) {
    let user_style = Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD);
    let bot_style = Style::default().fg(Color::Gray);

    // Newest exchange first.
    let mut lines: Vec<Line> = Vec::new();
    for turn in dashboard.session.transcript().iter().rev() {
        lines.push(Line::from(vec![Span::styled("You: ", user_style), Span::raw(turn.user.clone())]));
        for (i, text) in turn.bot.lines().enumerate() {
            let prefix = if i == 0 { "Bot: " } else { "     " };
            lines.push(Line::from(vec![
                Span::styled(prefix, bot_style.add_modifier(Modifier::BOLD)),
                Span::styled(text.to_string(), bot_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    let chat = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("JobYaari Chatbot"));
    f.render_widget(chat, area);
}

fn render_input(f: &mut Frame, area: ratatui::layout::Rect, dashboard: &Dashboard) {
    let input = Paragraph::new(dashboard.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Type your message here (Enter to send, Esc to quit)"),
    );
    f.render_widget(input, area);

    f.set_cursor(cursor_column(area, &dashboard.input), area.y + 1);
}

/// Cursor column after `input`, kept inside the input box border.
fn cursor_column(area: ratatui::layout::Rect, input: &str) -> u16 {
    let typed = u16::try_from(input.chars().count()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(1)
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}
