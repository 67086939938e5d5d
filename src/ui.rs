use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use draft_insight::{analyze, Analysis, AnalysisParams, MergedRecord, Metric};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::collections::BTreeSet;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Players,
    Teams,
    Insights,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Players => Page::Teams,
            Page::Teams => Page::Insights,
            Page::Insights => Page::Players,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Players => Page::Insights,
            Page::Teams => Page::Players,
            Page::Insights => Page::Teams,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Players => "Players",
            Page::Teams => "Teams",
            Page::Insights => "Insights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Dashboard session: merged records are fixed, parameters change per key press
pub struct App {
    pub records: Vec<MergedRecord>,
    pub params: AnalysisParams,
    pub analysis: Analysis,
    pub state: TableState,
    pub teams_state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub input_mode: InputMode,
    pub minutes_step: f64,
    pub summary: String,
    teams: Vec<String>,
}

impl App {
    pub fn new(
        records: Vec<MergedRecord>,
        params: AnalysisParams,
        minutes_step: f64,
        summary: String,
    ) -> Self {
        let teams: BTreeSet<String> = records
            .iter()
            .map(|r| r.drafted_team.clone())
            .filter(|team| !team.is_empty())
            .collect();
        let analysis = analyze(&records, &params);

        let mut app = Self {
            records,
            params,
            analysis,
            state: TableState::default(),
            teams_state: TableState::default(),
            current_page: Page::Players,
            show_detail: false,
            input_mode: InputMode::Normal,
            minutes_step,
            summary,
            teams: teams.into_iter().collect(),
        };
        app.reset_selection();
        app
    }

    /// Recompute the analysis after a parameter change
    pub fn refresh(&mut self) {
        self.analysis = analyze(&self.records, &self.params);
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        let players = if self.analysis.filtered.is_empty() { None } else { Some(0) };
        self.state.select(players);

        let teams = if self.analysis.teams.is_empty() { None } else { Some(0) };
        self.teams_state.select(teams);
    }

    pub fn visible_players(&self) -> &[MergedRecord] {
        self.analysis.filtered.records()
    }

    pub fn selected_player(&self) -> Option<&MergedRecord> {
        self.state.selected().and_then(|i| self.visible_players().get(i))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    // ========================================================================
    // PARAMETERS
    // ========================================================================

    pub fn raise_min_minutes(&mut self) {
        self.params.min_minutes += self.minutes_step;
        self.refresh();
    }

    pub fn lower_min_minutes(&mut self) {
        self.params.min_minutes = (self.params.min_minutes - self.minutes_step).max(0.0);
        self.refresh();
    }

    pub fn cycle_metric(&mut self) {
        self.params.metric = self.params.metric.next();
        self.refresh();
    }

    /// No team → first team → ... → last team → no team
    pub fn cycle_team(&mut self) {
        let next = match &self.params.team {
            None => self.teams.first().cloned(),
            Some(current) => self
                .teams
                .iter()
                .position(|team| team == current)
                .and_then(|i| self.teams.get(i + 1))
                .cloned(),
        };
        self.params.team = next;
        self.refresh();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.params.search.get_or_insert_with(String::new).push(c);
        self.refresh();
    }

    pub fn pop_search_char(&mut self) {
        if let Some(search) = self.params.search.as_mut() {
            search.pop();
            if search.is_empty() {
                self.params.search = None;
            }
        }
        self.refresh();
    }

    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn clear_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.params.search = None;
        self.refresh();
    }

    /// Add the selected player to the comparison, or take them out again
    pub fn toggle_compare(&mut self) {
        let Some(name) = self.selected_player().map(|r| r.player_name.clone()) else {
            return;
        };
        let selected = self.state.selected();

        match self.params.compare.iter().position(|n| *n == name) {
            Some(i) => {
                self.params.compare.remove(i);
            }
            None => self.params.compare.push(name),
        }

        self.refresh();
        // Comparison leaves the filtered view unchanged
        self.state.select(selected);
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    fn active_list(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Teams => (&mut self.teams_state, self.analysis.teams.len()),
            _ => (&mut self.state, self.analysis.filtered.len()),
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn first(&mut self) {
        let (state, len) = self.active_list();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let (state, len) = self.active_list();
        if len > 0 {
            state.select(Some(len - 1));
        }
    }

    pub fn page_down(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| (i + 20).min(len - 1)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let (state, len) = self.active_list();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        if app.input_mode == InputMode::Search {
            match key.code {
                KeyCode::Enter => app.finish_search(),
                KeyCode::Esc => app.clear_search(),
                KeyCode::Backspace => app.pop_search_char(),
                KeyCode::Char(c) => app.push_search_char(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Enter => app.toggle_detail(),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    app.previous_page();
                } else {
                    app.next_page();
                }
            }
            KeyCode::BackTab => app.previous_page(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('c') => app.clear_search(),
            KeyCode::Char('+') | KeyCode::Char('=') => app.raise_min_minutes(),
            KeyCode::Char('-') => app.lower_min_minutes(),
            KeyCode::Char('m') => app.cycle_metric(),
            KeyCode::Char('t') => app.cycle_team(),
            KeyCode::Char('x') => app.toggle_compare(),
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::PageDown => app.page_down(),
            KeyCode::PageUp => app.page_up(),
            KeyCode::Home => app.first(),
            KeyCode::End => app.last(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header: tabs + parameters
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Players {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_players(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Players => render_players(f, chunks[1], app),
            Page::Teams => render_teams(f, chunks[1], app),
            Page::Insights => render_insights(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in [Page::Players, Page::Teams, Page::Insights].iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(app.summary.clone(), Style::default().fg(Color::White)));

    let params = &app.params;
    let param_spans = vec![
        Span::styled("Metric: ", Style::default().fg(Color::Cyan)),
        Span::styled(params.metric.label(), Style::default().fg(Color::Yellow)),
        Span::raw("  |  "),
        Span::styled("Min minutes: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{}", params.min_minutes),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  |  "),
        Span::styled("Search: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            params.search.clone().unwrap_or_else(|| "-".to_string()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  |  "),
        Span::styled("Team: ", Style::default().fg(Color::Cyan)),
        Span::styled(
            params.team.clone().unwrap_or_else(|| "all".to_string()),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(tab_spans), Line::from(param_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_no_match(f: &mut Frame, area: Rect, title: &str) {
    let message = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "  No players match the current filters",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "  Lower the minutes threshold (-) or clear the search (c)",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title.to_string()),
    );

    f.render_widget(message, area);
}

fn header_row<'a>(labels: &[&'a str]) -> Row<'a> {
    let cells = labels.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_players(f: &mut Frame, area: Rect, app: &mut App) {
    if app.analysis.filtered.is_no_match() {
        render_no_match(f, area, " Players ");
        return;
    }

    let metric = app.params.metric;
    let team = app.params.team.clone();
    let header = header_row(&["Pk", "Player", "Tm", "MP", "PTS", "TRB", "AST", metric.label()]);

    let rows: Vec<Row> = app
        .visible_players()
        .iter()
        .map(|record| {
            let color = if record.pick <= app.params.top_pick_max {
                Color::Cyan
            } else if record.pick >= app.params.late_pick_min {
                Color::Green
            } else {
                Color::White
            };
            let style = if team.as_deref() == Some(record.drafted_team.as_str()) {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };

            Row::new(vec![
                Cell::from(record.pick.to_string()),
                Cell::from(truncate(&record.player_name, 26)),
                Cell::from(record.drafted_team.clone()),
                Cell::from(format_stat(record.minutes, 1)),
                Cell::from(format!("{:.1}", record.points)),
                Cell::from(format_stat(record.rebounds, 1)),
                Cell::from(format_stat(record.assists, 1)),
                Cell::from(format_stat(metric.value(record), 2))
                    .style(Style::default().fg(Color::Yellow)),
            ])
            .style(style)
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(28),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Players ({}) ", app.analysis.filtered.len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_teams(f: &mut Frame, area: Rect, app: &mut App) {
    if app.analysis.filtered.is_no_match() {
        render_no_match(f, area, " Teams ");
        return;
    }

    let header = header_row(&["Team", "Players", "Avg Pick", "Total MP", "Avg Composite", "Avg PTS"]);
    let selected_team = app.params.team.clone();

    let rows: Vec<Row> = app
        .analysis
        .teams
        .iter()
        .map(|summary| {
            let style = if selected_team.as_deref() == Some(summary.team.as_str()) {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(summary.team.clone()),
                Cell::from(summary.count.to_string()),
                Cell::from(format!("{:.1}", summary.avg_pick)),
                Cell::from(format!("{:.1}", summary.total_minutes)),
                Cell::from(format!("{:.2}", summary.avg_composite)),
                Cell::from(format!("{:.1}", summary.avg_points)),
            ])
            .style(style)
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(15),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Drafting Teams - Summary "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.teams_state);
}

fn section_title(title: String) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn ranked_lines(records: &[MergedRecord], metric: Metric) -> Vec<Line<'static>> {
    if records.is_empty() {
        return vec![Line::from(Span::styled(
            "  (none)",
            Style::default().fg(Color::DarkGray),
        ))];
    }

    records
        .iter()
        .map(|record| {
            Line::from(vec![
                Span::styled(format!("  #{:<3}", record.pick), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<28}", truncate(&record.player_name, 26))),
                Span::raw(format!("{:<5}", record.drafted_team)),
                Span::styled(
                    format!("{} {}", metric.label(), format_stat(metric.value(record), 2)),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        })
        .collect()
}

fn render_insights(f: &mut Frame, area: Rect, app: &App) {
    if app.analysis.filtered.is_no_match() {
        render_no_match(f, area, " Insights ");
        return;
    }

    let analysis = &app.analysis;
    let params = &app.params;
    let overview = &analysis.overview;
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Correlation (pick vs ", label),
            Span::styled(format!("{}): ", overview.metric), label),
            Span::styled(
                format!("{:.2}", overview.correlation),
                Style::default().fg(if overview.correlation < 0.0 {
                    Color::Green
                } else {
                    Color::Red
                }),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Players analyzed: ", label),
            Span::raw(overview.players.to_string()),
            Span::styled("   Avg minutes: ", label),
            Span::raw(format_stat(overview.avg_minutes, 1)),
        ]),
        Line::from(""),
        section_title(format!("  TOP PICKS (1-{})", params.top_pick_max)),
    ];
    content.extend(ranked_lines(&analysis.top_picks, params.metric));

    content.push(Line::from(""));
    content.push(section_title(format!(
        "  BEST DRAFT VALUE (pick {}+)",
        params.late_pick_min
    )));
    content.extend(ranked_lines(&analysis.late_finds, params.metric));

    content.push(Line::from(""));
    content.push(section_title("  EARLY PICKS NOT YET DELIVERING".to_string()));
    content.extend(ranked_lines(&analysis.underdelivering, params.metric));

    if !analysis.comparison.is_empty() {
        content.push(Line::from(""));
        content.push(section_title("  COMPARISON".to_string()));
        for record in &analysis.comparison {
            content.push(Line::from(vec![
                Span::styled(format!("  #{:<3}", record.pick), Style::default().fg(Color::Cyan)),
                Span::raw(format!("{:<28}", truncate(&record.player_name, 26))),
                Span::raw(format!(
                    "MP {:>5}  PTS {:>5.1}  TRB {:>5}  AST {:>5}  Composite {:.2}",
                    format_stat(record.minutes, 1),
                    record.points,
                    format_stat(record.rebounds, 1),
                    format_stat(record.assists, 1),
                    record.composite_score
                )),
            ]));
        }
    }

    if let Some(team) = &params.team {
        content.push(Line::from(""));
        content.push(section_title(format!("  {}", team)));
        match &analysis.team {
            Some(summary) => content.push(Line::from(format!(
                "  {} players | avg pick {:.1} | {:.1} minutes | avg composite {:.2}",
                summary.count, summary.avg_pick, summary.total_minutes, summary.avg_composite
            ))),
            None => content.push(Line::from("  No drafted players in the current view")),
        }
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Key Insights "),
    );

    f.render_widget(paragraph, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let record = match app.selected_player() {
        Some(r) => r,
        None => {
            let no_selection = Paragraph::new("No player selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Player Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", record.player_name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Draft pick", record.pick.to_string()),
        field(
            "Drafted by",
            if record.drafted_team.is_empty() {
                "-".to_string()
            } else {
                record.drafted_team.clone()
            },
        ),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        field("Minutes", format_stat(record.minutes, 1)),
        field("Points", format!("{:.1}", record.points)),
        field("Rebounds", format_stat(record.rebounds, 1)),
        field("Assists", format_stat(record.assists, 1)),
        field("Steals", format_stat(record.steals, 1)),
        field("Blocks", format_stat(record.blocks, 1)),
        field("FG%", format_stat(record.field_goal_pct, 3)),
        field("3P%", format_stat(record.three_point_pct, 3)),
        field("TS%", format_stat(record.true_shooting_pct, 3)),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Composite: ", label),
            Span::styled(
                format!("{:.2}", record.composite_score),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Player Details "),
    );

    f.render_widget(detail_panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if app.input_mode == InputMode::Search {
        status_spans.push(Span::styled(" Search: ", Style::default().fg(Color::Green)));
        status_spans.push(Span::raw(app.params.search.clone().unwrap_or_default()));
        status_spans.push(Span::styled("█", Style::default().fg(Color::Green)));
        status_spans.push(Span::raw("  ("));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" done, "));
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    } else {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.analysis.filtered.len()),
            Style::default().fg(Color::Cyan),
        ));

        for (key, action) in [
            ("+/-", " Minutes | "),
            ("m", " Metric | "),
            ("/", " Search | "),
            ("t", " Team | "),
            ("x", " Compare | "),
            ("Enter", " Details | "),
            ("Tab", " Page | "),
        ] {
            status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(action));
        }
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn format_stat(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use draft_insight::AnalysisConfig;

    fn record(pick: u32, name: &str, team: &str, points: f64, minutes: f64) -> MergedRecord {
        MergedRecord {
            pick,
            player_name: name.to_string(),
            drafted_team: team.to_string(),
            identity_key: draft_insight::normalize(name),
            points,
            field_goal_pct: None,
            three_point_pct: None,
            rebounds: Some(4.0),
            assists: Some(2.0),
            steals: None,
            blocks: None,
            minutes: Some(minutes),
            true_shooting_pct: None,
            composite_score: points,
        }
    }

    fn app() -> App {
        let records = vec![
            record(1, "Zaccharie Risacher", "ATL", 12.0, 30.0),
            record(2, "Alex Sarr", "WAS", 13.0, 32.0),
            record(20, "Kyshawn George", "WAS", 9.0, 12.0),
            record(35, "Bench Guy", "OKC", 2.0, 4.0),
        ];
        let config = AnalysisConfig::default();
        App::new(
            records,
            AnalysisParams::from_config(&config),
            config.minutes_step,
            "3 of 4 matched".to_string(),
        )
    }

    #[test]
    fn test_minutes_step_refreshes_view() {
        let mut app = app();
        assert_eq!(app.visible_players().len(), 3);

        app.raise_min_minutes();
        assert_eq!(app.params.min_minutes, 15.0);
        assert_eq!(app.visible_players().len(), 2);

        app.lower_min_minutes();
        app.lower_min_minutes();
        app.lower_min_minutes();
        assert_eq!(app.params.min_minutes, 0.0);
        assert_eq!(app.visible_players().len(), 4);
    }

    #[test]
    fn test_search_typing() {
        let mut app = app();
        app.start_search();
        for c in "sarr".chars() {
            app.push_search_char(c);
        }

        assert_eq!(app.visible_players().len(), 1);
        assert_eq!(app.selected_player().map(|r| r.pick), Some(2));

        app.push_search_char('x');
        assert!(app.analysis.filtered.is_no_match());
        assert_eq!(app.selected_player(), None);

        app.clear_search();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.params.search, None);
        assert_eq!(app.visible_players().len(), 3);
    }

    #[test]
    fn test_cycle_team_wraps_to_none() {
        let mut app = app();
        let mut seen = vec![];
        for _ in 0..4 {
            app.cycle_team();
            seen.push(app.params.team.clone());
        }

        assert_eq!(
            seen,
            vec![
                Some("ATL".to_string()),
                Some("OKC".to_string()),
                Some("WAS".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        app.next_page();
        app.next();
        assert_eq!(app.teams_state.selected(), Some(1));
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_home_end_follow_the_active_page() {
        let mut app = app();
        app.next_page();
        assert_eq!(app.current_page, Page::Teams);

        app.last();
        assert_eq!(app.teams_state.selected(), Some(1));
        assert_eq!(app.state.selected(), Some(0));

        app.first();
        assert_eq!(app.teams_state.selected(), Some(0));

        app.previous_page();
        app.last();
        assert_eq!(app.state.selected(), Some(2));
        assert_eq!(app.teams_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_compare() {
        let mut app = app();
        app.next();
        app.toggle_compare();

        assert_eq!(app.params.compare, vec!["Alex Sarr".to_string()]);
        assert_eq!(app.analysis.comparison.len(), 1);
        assert_eq!(app.state.selected(), Some(1));

        app.toggle_compare();
        assert!(app.params.compare.is_empty());
        assert!(app.analysis.comparison.is_empty());
    }

    #[test]
    fn test_cycle_metric() {
        let mut app = app();
        app.cycle_metric();
        assert_eq!(app.params.metric, Metric::FieldGoalPct);
        assert_eq!(app.analysis.overview.metric, Metric::FieldGoalPct);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Nikola Jokić", 20), "Nikola Jokić");
        assert_eq!(truncate("Nikola Jokić", 8), "Nikol...");
    }
}
