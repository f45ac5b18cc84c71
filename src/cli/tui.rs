use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::Frame;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::{debug, warn};

use crate::board::Square;
use crate::cli::board_display::{TokenMarker, cell_label};
use crate::game::{Game, GameError, GamePhase, Intent, StepOutcome};
use crate::quiz::QuestionProvider;
use crate::types::{Side, SquareKind};

pub type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Answer,
    Report,
}

/// Terminal render surface: draws the game and turns key presses into intents.
pub struct TuiApp<Q: QuestionProvider> {
    game: Game<Q>,
    player_color: Color,
    input: String,
    input_mode: InputMode,
    notice: Option<String>,
    next_transition_at: Option<Instant>,
    show_help: bool,
    should_quit: bool,
    history_scroll: u16,
    history_max_scroll: u16,
    follow_history: bool,
}

impl<Q: QuestionProvider> TuiApp<Q> {
    pub fn new(game: Game<Q>, player_color: (u8, u8, u8)) -> Self {
        let (r, g, b) = player_color;
        Self {
            game,
            player_color: Color::Rgb(r, g, b),
            input: String::new(),
            input_mode: InputMode::Answer,
            notice: None,
            next_transition_at: None,
            show_help: false,
            should_quit: false,
            history_scroll: 0,
            history_max_scroll: 0,
            follow_history: true,
        }
    }

    pub fn into_game(self) -> Game<Q> {
        self.game
    }

    pub fn run(&mut self) -> io::Result<Option<Side>> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        // Always cleanup terminal state
        let _ = terminal.clear();
        let _ = disable_raw_mode();
        let _ = execute!(terminal.backend_mut(), DisableMouseCapture);
        let _ = terminal.show_cursor();

        result.map(|_| self.game.winner())
    }

    fn event_loop(&mut self, terminal: &mut Terminal) -> io::Result<()> {
        loop {
            if self.should_quit {
                return Ok(());
            }

            self.run_due_transition();
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
    }

    /// Fires the robot's next step once its pacing delay has elapsed. Player
    /// intents are refused by the controller until then.
    fn run_due_transition(&mut self) {
        if !self.game.state.phase.is_autonomous() {
            self.next_transition_at = None;
            return;
        }
        let due = *self.next_transition_at.get_or_insert_with(Instant::now);
        if Instant::now() < due {
            return;
        }
        self.next_transition_at = None;
        match self.game.advance() {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => warn!(%err, "robot transition refused"),
        }
    }

    fn apply_outcome(&mut self, outcome: StepOutcome) {
        debug!(events = outcome.events.len(), "step applied");
        self.next_transition_at = outcome.next.map(|next| Instant::now() + next.after);
        self.notice = None;
        self.follow_history = true;
    }

    fn dispatch(&mut self, intent: Intent) {
        match self.game.handle(intent) {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(GameError::EmptyAnswer) => {
                self.notice = Some("Type an answer first.".to_string());
            }
            Err(err) => {
                self.notice = Some(err.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::PageUp => return self.adjust_history_scroll(-5),
            KeyCode::PageDown => return self.adjust_history_scroll(5),
            KeyCode::Up => return self.adjust_history_scroll(-1),
            KeyCode::Down => return self.adjust_history_scroll(1),
            _ => {}
        }

        match self.game.state.phase {
            GamePhase::PlayerAwaitingAnswer => self.handle_typing(key),
            GamePhase::PlayerTurn => match key.code {
                KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => {
                    self.dispatch(Intent::RollRequested)
                }
                KeyCode::Char('h') => self.show_help = !self.show_help,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
            GamePhase::GameOver { .. } => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Enter) {
                    self.should_quit = true;
                }
            }
            GamePhase::RobotTurn | GamePhase::RobotAnswering => match key.code {
                KeyCode::Char('h') => self.show_help = !self.show_help,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn handle_typing(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.input_mode = match self.input_mode {
                    InputMode::Answer => InputMode::Report,
                    InputMode::Report => InputMode::Answer,
                };
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                match self.input_mode {
                    InputMode::Answer => self.dispatch(Intent::AnswerSubmitted(text)),
                    InputMode::Report => {
                        self.input_mode = InputMode::Answer;
                        self.dispatch(Intent::ReportRequested(text));
                    }
                }
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn render(&mut self, f: &mut Frame<'_>) {
        let area = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(20),   // Main content
                Constraint::Length(3), // Help/status bar
            ])
            .split(area);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Board
                Constraint::Percentage(35), // Status, question, history
            ])
            .split(chunks[0]);

        self.render_board(f, main_chunks[0]);
        self.render_right_panel(f, main_chunks[1]);
        self.render_status_bar(f, chunks[1]);
    }

    fn render_board(&self, f: &mut Frame<'_>, area: Rect) {
        let state = &self.game.state;
        let player = state.player.position;
        let robot = state.robot.position;

        let mut lines: Vec<Line<'_>> = Vec::new();
        for row in state.board.rows() {
            let spans: Vec<Span<'_>> = row
                .iter()
                .flat_map(|square| {
                    let marker = TokenMarker::at(square.number, player, robot);
                    [
                        Span::styled(cell_label(square), self.style_for_square(square)),
                        Span::styled(
                            marker.map(TokenMarker::symbol).unwrap_or("  "),
                            self.style_for_marker(marker),
                        ),
                        Span::raw("│"),
                    ]
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Board {}", state.board.size()))
            .title_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Left);

        f.render_widget(paragraph, area);
    }

    fn render_right_panel(&mut self, f: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9),      // Game state
                Constraint::Percentage(40), // Question
                Constraint::Min(5),         // History
            ])
            .split(area);

        self.render_game_state(f, chunks[0]);
        self.render_question(f, chunks[1]);
        self.render_history_panel(f, chunks[2]);
    }

    fn render_game_state(&self, f: &mut Frame<'_>, area: Rect) {
        let view = self.game.view();
        let frozen = |turns: u8| {
            if turns > 0 {
                format!("  🧊 x{turns}")
            } else {
                String::new()
            }
        };

        let lines = vec![
            Line::from(Span::styled(
                view.turn_label.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw("Dice: "),
                Span::styled(
                    view.dice
                        .map(|value| format!("🎲 {value}"))
                        .unwrap_or_else(|| "🎲 -".to_string()),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(vec![
                Span::styled("YOU   ", Style::default().fg(self.player_color)),
                Span::raw(format!(
                    "{:>3} / {}{}",
                    view.player.position,
                    view.total_squares,
                    frozen(view.player.frozen_turns)
                )),
            ]),
            Line::from(vec![
                Span::styled("ROBOT ", Style::default().fg(Color::Gray)),
                Span::raw(format!(
                    "{:>3} / {}{}",
                    view.robot.position,
                    view.total_squares,
                    frozen(view.robot.frozen_turns)
                )),
            ]),
            Line::from(""),
            Line::from(Span::styled(view.status, Style::default().fg(Color::White))),
        ];

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game State"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_question(&self, f: &mut Frame<'_>, area: Rect) {
        let mut lines: Vec<Line<'_>> = Vec::new();
        let view = self.game.view();

        match &view.question {
            Some(question) if question.side == Side::Player => {
                lines.push(Line::from(Span::styled(
                    format!("{} square · {}", question.square_kind, question.difficulty),
                    Style::default().fg(Color::Yellow),
                )));
                lines.push(Line::from(question.prompt.clone()));
                lines.push(Line::from(""));
                let label = match self.input_mode {
                    InputMode::Answer => "Answer: ",
                    InputMode::Report => "Report reason: ",
                };
                lines.push(Line::from(vec![
                    Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(self.input.clone()),
                    Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
                ]));
            }
            Some(question) => {
                lines.push(Line::from(Span::styled(
                    "🤖 Robot is thinking about:",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::from(question.prompt.clone()));
            }
            None => lines.push(Line::from("No question right now.")),
        }

        if let Some(notice) = &self.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::LightRed),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Question"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_history_panel(&mut self, f: &mut Frame<'_>, area: Rect) {
        let history = &self.game.state.history;
        let lines: Vec<Line<'_>> = if history.is_empty() {
            vec![Line::from("Nothing has happened yet.")]
        } else {
            history
                .iter()
                .map(|event| Line::from(event.to_string()))
                .collect()
        };

        let viewport_height = area.height.saturating_sub(2);
        let content_height = lines.len() as u16;
        self.history_max_scroll = content_height.saturating_sub(viewport_height);
        if self.follow_history || self.history_scroll > self.history_max_scroll {
            self.history_scroll = self.history_max_scroll;
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("History"))
            .scroll((self.history_scroll, 0));
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame<'_>, area: Rect) {
        let help_text = match self.game.state.phase {
            GamePhase::PlayerAwaitingAnswer => {
                "Type answer | Enter: Submit | Tab: Report question | ↑/↓: Scroll History | Esc: Quit"
            }
            GamePhase::GameOver { .. } => "Game over | Enter/q: Leave",
            _ if self.show_help => {
                "r/Space/Enter: Roll | ↑/↓ PgUp/PgDn: Scroll History | h: Toggle Help | q/Esc: Quit"
            }
            _ => "Press 'r' to roll | 'h' for help",
        };

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);

        f.render_widget(paragraph, area);
    }

    fn style_for_square(&self, square: &Square) -> Style {
        match square.kind {
            SquareKind::Normal => Style::default().fg(Color::DarkGray),
            SquareKind::Ladder => Style::default().fg(Color::Green),
            SquareKind::Snake => Style::default().fg(Color::Red),
            SquareKind::Bonus => Style::default().fg(Color::Cyan),
            SquareKind::Penalty => Style::default().fg(Color::Magenta),
            SquareKind::Freeze => Style::default().fg(Color::LightBlue),
        }
    }

    fn style_for_marker(&self, marker: Option<TokenMarker>) -> Style {
        match marker {
            Some(TokenMarker::Player) => Style::default()
                .fg(self.player_color)
                .add_modifier(Modifier::BOLD),
            Some(TokenMarker::Robot) => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            Some(TokenMarker::Both) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            None => Style::default(),
        }
    }

    fn adjust_history_scroll(&mut self, delta: i16) {
        let next = (self.history_scroll as i32 + delta as i32).clamp(0, self.history_max_scroll as i32);
        self.history_scroll = next as u16;
        self.follow_history = self.history_scroll == self.history_max_scroll;
    }
}
