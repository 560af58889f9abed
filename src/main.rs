use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use gol_terminal::dataset::load_events_csv;
use gol_terminal::demo_feed;
use gol_terminal::export::{export_rankings_json, export_rankings_xlsx};
use gol_terminal::state::{AppState, Tab};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.state.search_editing {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.state.next_tab(),
            KeyCode::BackTab | KeyCode::Left => self.state.prev_tab(),
            KeyCode::Char('1') => self.state.select_tab(Tab::Hours),
            KeyCode::Char('2') => self.state.select_tab(Tab::Matchups),
            KeyCode::Char('3') => self.state.select_tab(Tab::Minutes),
            KeyCode::Char('4') => self.state.select_tab(Tab::Odds),
            KeyCode::Char('5') => self.state.select_tab(Tab::HomeTeams),
            KeyCode::Char('6') => self.state.select_tab(Tab::AwayTeams),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(1),
            KeyCode::PageDown => self.state.scroll_down(10),
            KeyCode::PageUp => self.state.scroll_up(10),
            KeyCode::Char('o') => self.state.cycle_odds_column(),
            KeyCode::Char('/') => self.state.begin_search_edit(),
            KeyCode::Char('c') => self.state.clear_search(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.state.adjust_min_goals(1),
            KeyCode::Char('-') => self.state.adjust_min_goals(-1),
            KeyCode::Char('e') => self.export_xlsx(),
            KeyCode::Char('w') => self.export_json(),
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.state.apply_search(),
            KeyCode::Esc => self.state.cancel_search_edit(),
            KeyCode::Backspace => {
                self.state.search_draft.pop();
            }
            KeyCode::Char(c) => self.state.search_draft.push(c),
            _ => {}
        }
    }

    fn export_xlsx(&mut self) {
        let path = env::var("EXPORT_XLSX_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("gol_rankings.xlsx"));
        match export_rankings_xlsx(&path, &self.state.rankings, &self.state.rates) {
            Ok(report) => self.state.push_log(format!(
                "Exported {} sheets / {} rows to {}",
                report.sheets,
                report.rows,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[WARN] xlsx export failed: {err:#}")),
        }
    }

    fn export_json(&mut self) {
        let path = env::var("EXPORT_JSON_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("gol_rankings.json"));
        match export_rankings_json(&path, &self.state.rankings) {
            Ok(()) => self
                .state
                .push_log(format!("Exported rankings to {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] json export failed: {err:#}")),
        }
    }
}

fn main() -> Result<()> {
    let state = build_initial_state()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(state));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn build_initial_state() -> Result<AppState> {
    let csv_path = env::args()
        .nth(1)
        .or_else(|| env::var("EVENTS_CSV").ok())
        .map(PathBuf::from);

    let mut state = match csv_path {
        Some(path) => {
            let columns = gol_terminal::rankings::DEFAULT_ODDS_COLUMNS.clone();
            let events = load_events_csv(&path, &columns)
                .with_context(|| format!("load dataset {}", path.display()))?;
            let label = path.display().to_string();
            AppState::new(events, label)
        }
        None => {
            let count = env::var("DEMO_EVENT_COUNT")
                .ok()
                .and_then(|val| val.parse::<usize>().ok())
                .unwrap_or(600)
                .clamp(50, 20_000);
            let seed = env::var("DEMO_SEED")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(7);
            let events = demo_feed::generate_events(count, seed);
            AppState::new(events, format!("demo feed ({count} events, seed {seed})"))
        }
    };
    let loaded = state.events.len();
    state.push_log(format!("Loaded {loaded} events from {}", state.source_label));
    Ok(state)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, &app.state))?;

        if event::poll(Duration::from_millis(200))?
            && let Event::Key(key) = event::read()?
        {
            app.on_key(key);
        }
        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], state);
    draw_tab_bar(frame, chunks[1], state);
    draw_body(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let top = match state.top_hour() {
        Some(row) => format!(
            "Top hour {:02}: {} goals (rank {})",
            row.hour, row.total_goals, row.rank
        ),
        None => "Top hour: no data".to_string(),
    };
    let search = if state.search_editing {
        format!("Hour search (editing): {}_", state.search_draft)
    } else if state.config.hour_search.is_empty() {
        "Hour search: (none)".to_string()
    } else {
        format!("Hour search: {}", state.config.hour_search)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Gol Terminal ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "| {} | {} rows after filters",
                state.source_label, state.filtered_len
            )),
        ]),
        Line::from(top),
        Line::from(format!(
            "Over 3.5: {:.2}%   Over 4.5: {:.2}%   Over 5.5: {:.2}%   Min goals: {}",
            state.rates.over_35,
            state.rates.over_45,
            state.rates.over_55,
            state.filter.min_total_goals
        )),
        Line::from(search),
    ];
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_tab_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for (idx, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == state.tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, tab.title()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.tab {
        Tab::Hours => draw_hours(frame, area, state),
        Tab::Matchups => draw_table(
            frame,
            area,
            state,
            "Matchups ranked by goals",
            format!(
                "{:<34} {:>6} {:>6} {:>7} {:>6} {:>6}",
                "Matchup", "Goals", "Games", "Mean", "R.Sum", "R.Mean"
            ),
            state
                .rankings
                .matchups
                .iter()
                .map(|r| {
                    format!(
                        "{:<34} {:>6} {:>6} {:>7.2} {:>6} {:>6}",
                        clip(&r.matchup, 34),
                        r.total_goals,
                        r.games,
                        r.mean_goals,
                        r.rank_by_sum,
                        r.rank_by_mean
                    )
                })
                .collect(),
        ),
        Tab::Minutes => draw_table(
            frame,
            area,
            state,
            "Minutes with most goals",
            format!("{:>6} {:>10}", "Minute", "Goals"),
            state
                .rankings
                .by_minute
                .iter()
                .map(|r| format!("{:>6} {:>10}", r.minute, r.total_goals))
                .collect(),
        ),
        Tab::Odds => {
            let (title, rows) = match state.current_odds_profile() {
                Some((column, rows)) => (
                    format!("Odds profile: {column} (o cycles column)"),
                    rows.iter()
                        .map(|r| {
                            format!(
                                "{:<20} {:>6} {:>6} {:>7.2}",
                                clip(&r.value, 20),
                                r.total_goals,
                                r.games,
                                r.mean_goals
                            )
                        })
                        .collect(),
                ),
                None => ("Odds profile: no columns configured".to_string(), Vec::new()),
            };
            draw_table(
                frame,
                area,
                state,
                &title,
                format!("{:<20} {:>6} {:>6} {:>7}", "Value", "Goals", "Games", "Mean"),
                rows,
            );
        }
        Tab::HomeTeams => draw_team_table(frame, area, state, true),
        Tab::AwayTeams => draw_team_table(frame, area, state, false),
    }
}

fn draw_team_table(frame: &mut Frame, area: Rect, state: &AppState, home: bool) {
    let (title, rows) = if home {
        ("Home side goals by minute", &state.rankings.home_teams)
    } else {
        ("Away side goals by minute", &state.rankings.away_teams)
    };
    draw_table(
        frame,
        area,
        state,
        title,
        format!(
            "{:>6} {:<22} {:>6} {:>6} {:>7}",
            "Minute", "Team", "Goals", "Games", "Mean"
        ),
        rows.iter()
            .map(|r| {
                format!(
                    "{:>6} {:<22} {:>6} {:>6} {:>7.2}",
                    r.minute,
                    clip(&r.team, 22),
                    r.goals,
                    r.games,
                    r.mean_per_minute
                )
            })
            .collect(),
    );
}

fn draw_hours(frame: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_table(
        frame,
        halves[0],
        state,
        "Hours ranked by goals",
        format!("{:>5} {:>10} {:>5}", "Hour", "Goals", "Rank"),
        state
            .rankings
            .by_hour
            .iter()
            .map(|r| format!("{:>5} {:>10} {:>5}", r.hour, r.total_goals, r.rank))
            .collect(),
    );

    let bars: Vec<Bar> = state
        .rankings
        .by_hour
        .iter()
        .take(16)
        .map(|row| {
            Bar::default()
                .value(row.total_goals.max(0) as u64)
                .label(Line::from(format!("{:02}", row.hour)))
                .text_value(row.total_goals.to_string())
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Goals by hour"),
        );
    frame.render_widget(chart, halves[1]);
}

fn draw_table(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    title: &str,
    header: String,
    rows: Vec<String>,
) {
    let visible = area.height.saturating_sub(3) as usize;
    let offset = state.scroll.min(rows.len().saturating_sub(1));

    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "(no rows)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for row in rows.iter().skip(offset).take(visible) {
            lines.push(Line::from(row.clone()));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{title} [{}/{}]", offset.min(rows.len()), rows.len()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![Line::from(Span::styled(
        "q quit | tab/1-6 screens | j/k scroll | o odds column | / search hour | c clear | +/- min goals | e xlsx | w json",
        Style::default().fg(Color::DarkGray),
    ))];
    for log in state.logs.iter().rev().take(area.height.saturating_sub(3) as usize) {
        lines.push(Line::from(log.clone()));
    }
    let block = Block::default().borders(Borders::ALL).title("Log");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
