//! Main UI Application
//!
//! Coordinates rendering and input handling across all screens.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::widgets::{render_garden_help, GardenGridWidget, GridCursor, GARDEN_COLS, GARDEN_ROWS};
use crate::game::{ActiveGame, Game, GameMode, MessageCategory};
use crate::garden::plant_at;
use crate::minigames::logic::TIME_PER_PUZZLE;
use crate::minigames::pattern::{TILE_COLORS, TILE_COUNT};
use crate::minigames::{
    Answer, LogicGame, MemoryGame, MiniGameKind, PatternGame, RoundPhase,
};
use crate::progression::xp::coins_for_win;
use crate::progression::{level_title, XP_PER_LEVEL};

/// Menu entries in display order
const MENU_ITEMS: [MenuAction; 7] = [
    MenuAction::Play(MiniGameKind::Memory),
    MenuAction::Play(MiniGameKind::Pattern),
    MenuAction::Play(MiniGameKind::Logic),
    MenuAction::Garden,
    MenuAction::Achievements,
    MenuAction::Tutorial,
    MenuAction::Quit,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Play(MiniGameKind),
    Garden,
    Achievements,
    Tutorial,
    Quit,
}

impl MenuAction {
    fn label(&self) -> &'static str {
        match self {
            MenuAction::Play(kind) => kind.name(),
            MenuAction::Garden => "My Garden",
            MenuAction::Achievements => "Achievements",
            MenuAction::Tutorial => "How to Play",
            MenuAction::Quit => "Quit",
        }
    }

    fn hotkey(&self) -> char {
        match self {
            MenuAction::Play(MiniGameKind::Memory) => '1',
            MenuAction::Play(MiniGameKind::Pattern) => '2',
            MenuAction::Play(MiniGameKind::Logic) => '3',
            MenuAction::Garden => 'g',
            MenuAction::Achievements => 'a',
            MenuAction::Tutorial => 't',
            MenuAction::Quit => 'q',
        }
    }

    fn blurb(&self) -> &'static str {
        match self {
            MenuAction::Play(kind) => kind.blurb(),
            MenuAction::Garden => "Spend coins on plants and watch them grow",
            MenuAction::Achievements => "Milestones and statistics",
            MenuAction::Tutorial => "A quick walkthrough",
            MenuAction::Quit => "Save and exit",
        }
    }
}

/// Main UI application
pub struct App {
    menu_cursor: usize,
    /// Whether the reset confirmation popup is open
    confirm_reset: bool,
    card_cursor: usize,
    tile_cursor: usize,
    answer_cursor: usize,
    garden_cursor: GridCursor,
    /// Index into the plant catalog
    palette_index: usize,
    /// Plant picked up for moving
    carrying: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            menu_cursor: 0,
            confirm_reset: false,
            card_cursor: 0,
            tile_cursor: 0,
            answer_cursor: 0,
            garden_cursor: GridCursor::default(),
            palette_index: 0,
            carrying: None,
        }
    }

    /// Handle keyboard input, returns true if should quit
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        // Global quit shortcut
        if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            return Ok(true);
        }

        match game.mode() {
            GameMode::Menu => self.handle_menu_input(key, game),
            GameMode::Tutorial => self.handle_tutorial_input(key, game),
            GameMode::Memory | GameMode::Pattern | GameMode::Logic => {
                self.handle_minigame_input(key, game)
            }
            GameMode::Garden => self.handle_garden_input(key, game),
            GameMode::Achievements => self.handle_achievements_input(key, game),
            GameMode::Quit => Ok(true),
        }
    }

    fn handle_menu_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        if self.confirm_reset {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_reset = false;
                    game.reset_all()?;
                }
                _ => self.confirm_reset = false,
            }
            return Ok(false);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_cursor = (self.menu_cursor + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.activate(MENU_ITEMS[self.menu_cursor], game);
            }
            KeyCode::Char('r') => self.confirm_reset = true,
            KeyCode::Esc => game.set_mode(GameMode::Quit),
            KeyCode::Char(c) => {
                if let Some(action) = MENU_ITEMS.iter().find(|a| a.hotkey() == c) {
                    self.activate(*action, game);
                }
            }
            _ => {}
        }
        Ok(matches!(game.mode(), GameMode::Quit))
    }

    fn activate(&mut self, action: MenuAction, game: &mut Game) {
        match action {
            MenuAction::Play(kind) => self.start(kind, game),
            MenuAction::Garden => {
                self.carrying = None;
                game.set_mode(GameMode::Garden);
            }
            MenuAction::Achievements => game.set_mode(GameMode::Achievements),
            MenuAction::Tutorial => game.set_mode(GameMode::Tutorial),
            MenuAction::Quit => game.set_mode(GameMode::Quit),
        }
    }

    fn start(&mut self, kind: MiniGameKind, game: &mut Game) {
        self.card_cursor = 0;
        self.tile_cursor = 0;
        self.answer_cursor = 0;
        game.start_minigame(kind);
    }

    fn handle_tutorial_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        match key.code {
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                game.tutorial_mut().next();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                game.tutorial_mut().prev();
            }
            KeyCode::Enter => {
                if !game.tutorial_mut().next() {
                    game.set_mode(GameMode::Menu);
                }
            }
            KeyCode::Esc => game.set_mode(GameMode::Menu),
            _ => {}
        }
        Ok(false)
    }

    fn handle_minigame_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let Some(kind) = game.mode().minigame() else {
            return Ok(false);
        };
        if key.code == KeyCode::Esc {
            game.set_mode(GameMode::Menu);
            return Ok(false);
        }

        let completed = game
            .active()
            .map(|active| active.as_engine().is_completed())
            .unwrap_or(true);
        if completed {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) {
                self.start(kind, game);
            }
            return Ok(false);
        }

        match kind {
            MiniGameKind::Memory => self.handle_memory_input(key, game),
            MiniGameKind::Pattern => self.handle_pattern_input(key, game),
            MiniGameKind::Logic => self.handle_logic_input(key, game),
        }
        Ok(false)
    }

    fn handle_memory_input(&mut self, key: KeyEvent, game: &mut Game) {
        let card_count = match game.active() {
            Some(ActiveGame::Memory(memory)) => memory.cards().len(),
            _ => return,
        };
        let cols = memory_columns(card_count);

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.card_cursor = self.card_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.card_cursor = (self.card_cursor + 1).min(card_count - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.card_cursor >= cols {
                    self.card_cursor -= cols;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.card_cursor + cols < card_count {
                    self.card_cursor += cols;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                game.flip_card(self.card_cursor);
            }
            KeyCode::Char('r') => self.start(MiniGameKind::Memory, game),
            _ => {}
        }
    }

    fn handle_pattern_input(&mut self, key: KeyEvent, game: &mut Game) {
        match key.code {
            KeyCode::Char(c @ '1'..='6') => {
                let tile = c as usize - '1' as usize;
                self.tile_cursor = tile;
                game.press_tile(tile);
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.tile_cursor = self.tile_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.tile_cursor = (self.tile_cursor + 1).min(TILE_COUNT - 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.tile_cursor >= PATTERN_COLS {
                    self.tile_cursor -= PATTERN_COLS;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.tile_cursor + PATTERN_COLS < TILE_COUNT {
                    self.tile_cursor += PATTERN_COLS;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                game.press_tile(self.tile_cursor);
            }
            _ => {}
        }
    }

    fn handle_logic_input(&mut self, key: KeyEvent, game: &mut Game) {
        let option_count = match game.active() {
            Some(ActiveGame::Logic(logic)) => logic
                .current_puzzle()
                .map(|p| p.options.len())
                .unwrap_or(0),
            _ => return,
        };
        if option_count == 0 {
            return;
        }

        let chosen = match key.code {
            KeyCode::Char(c @ '1'..='9') => Some(c as usize - '1' as usize),
            KeyCode::Char(c @ 'a'..='f') => Some(c as usize - 'a' as usize),
            KeyCode::Up | KeyCode::Char('k') => {
                self.answer_cursor = self.answer_cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.answer_cursor = (self.answer_cursor + 1).min(option_count - 1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(self.answer_cursor),
            _ => None,
        };

        if let Some(option) = chosen.filter(|&o| o < option_count) {
            if game.answer_puzzle(option) {
                self.answer_cursor = 0;
            }
        }
    }

    fn handle_garden_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        let plant_count = game.catalog().len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.garden_cursor.move_by(0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.garden_cursor.move_by(0, 1),
            KeyCode::Left | KeyCode::Char('h') => self.garden_cursor.move_by(-1, 0),
            KeyCode::Right | KeyCode::Char('l') => self.garden_cursor.move_by(1, 0),
            KeyCode::Tab | KeyCode::Char(']') if plant_count > 0 => {
                self.palette_index = (self.palette_index + 1) % plant_count;
            }
            KeyCode::BackTab | KeyCode::Char('[') if plant_count > 0 => {
                self.palette_index = (self.palette_index + plant_count - 1) % plant_count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.place(game),
            KeyCode::Char('m') => {
                let (x, y) = self.garden_cursor.center();
                self.carrying = plant_at(game.garden().items(), game.catalog(), x, y)
                    .map(|item| item.id.clone());
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let (x, y) = self.garden_cursor.center();
                let target = plant_at(game.garden().items(), game.catalog(), x, y)
                    .map(|item| item.id.clone());
                if let Some(id) = target {
                    if let Some(item) = game.remove_plant(&id) {
                        let name = self.plant_name(game, &item.plant_type);
                        game.add_message(format!("Dug up {}", name), MessageCategory::Garden);
                    }
                    if self.carrying.as_deref() == Some(id.as_str()) {
                        self.carrying = None;
                    }
                }
            }
            KeyCode::Esc => {
                if self.carrying.take().is_none() {
                    game.set_mode(GameMode::Menu);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    /// Drop a carried plant, or buy the selected one, at the cursor
    fn place(&mut self, game: &mut Game) {
        let (x, y) = self.garden_cursor.origin();

        if let Some(id) = self.carrying.take() {
            game.move_plant(&id, x, y);
            return;
        }

        let Some(plant_id) = game
            .catalog()
            .plants()
            .get(self.palette_index)
            .map(|p| p.id.clone())
        else {
            return;
        };
        if let Err(e) = game.purchase_plant(&plant_id, x, y) {
            log::debug!("Purchase refused: {}", e);
            game.add_message(e.to_string(), MessageCategory::Warning);
        }
    }

    fn plant_name(&self, game: &Game, plant_type: &str) -> String {
        game.catalog()
            .get(plant_type)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| plant_type.to_string())
    }

    fn handle_achievements_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('a')) {
            game.set_mode(GameMode::Menu);
        }
        Ok(false)
    }

    /// Render the current screen
    pub fn render(&self, frame: &mut Frame, game: &Game) {
        // Clear the entire screen first to prevent artifacts
        frame.render_widget(Clear, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(6),
            ])
            .split(frame.area());

        self.render_header(frame, game, chunks[0]);
        match game.mode() {
            GameMode::Menu => self.render_menu(frame, chunks[1]),
            GameMode::Tutorial => self.render_tutorial(frame, game, chunks[1]),
            GameMode::Memory | GameMode::Pattern | GameMode::Logic => {
                self.render_minigame(frame, game, chunks[1])
            }
            GameMode::Garden => self.render_garden(frame, game, chunks[1]),
            GameMode::Achievements => self.render_achievements(frame, game, chunks[1]),
            GameMode::Quit => {}
        }
        self.render_messages(frame, game, chunks[2]);

        if self.confirm_reset {
            self.render_reset_popup(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let progress = game.progression().progress();
        let into_level = progress.experience_into_level();

        let line = Line::from(vec![
            Span::styled(
                " 🌸 Mindgarden ",
                Style::default().fg(Color::Rgb(236, 72, 153)).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Lv {} {}", progress.level, level_title(progress.level)),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw("  "),
            Span::styled(
                bar(f64::from(into_level) / f64::from(XP_PER_LEVEL), 10),
                Style::default().fg(Color::Rgb(139, 92, 246)),
            ),
            Span::styled(
                format!(" {}/{} XP", into_level, XP_PER_LEVEL),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            Span::styled(format!("🪙 {}", progress.coins), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(
                format!("🔥 {} (best {})", progress.current_streak, progress.best_streak),
                Style::default().fg(Color::LightRed),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8)])
            .split(area);

        let title = vec![
            Line::from(Span::styled(
                "Train your brain. Grow your garden.",
                Style::default().fg(Color::Rgb(16, 185, 129)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        frame.render_widget(
            Paragraph::new(title).alignment(Alignment::Center),
            chunks[0],
        );

        let mut lines = Vec::new();
        for (idx, action) in MENU_ITEMS.iter().enumerate() {
            let selected = idx == self.menu_cursor;
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Rgb(16, 185, 129)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!(" [{}] {:<22}", action.hotkey().to_ascii_uppercase(), action.label()),
                style,
            )));
            if selected {
                lines.push(Line::from(Span::styled(
                    action.blurb(),
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.push(Line::from(""));
            }
        }
        lines.push(Line::from(Span::styled(
            "[R] Reset progress",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            chunks[1],
        );
    }

    fn render_reset_popup(&self, frame: &mut Frame) {
        let area = centered_rect(44, 24, frame.area());
        frame.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Reset all progress?",
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Coins, levels, achievements and your garden"),
            Line::from("will be deleted."),
            Line::from(""),
            Line::from(Span::styled("[Y] Reset   [any key] Cancel", Style::default().fg(Color::Gray))),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(Color::LightRed));
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            area,
        );
    }

    fn render_tutorial(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let tutorial = game.tutorial();
        let step = tutorial.step();
        let area = centered_rect(60, 80, area);

        let dots: Vec<Span> = (0..tutorial.len())
            .map(|i| {
                if i == tutorial.index() {
                    Span::styled("● ", Style::default().fg(Color::Rgb(16, 185, 129)))
                } else {
                    Span::styled("○ ", Style::default().fg(Color::DarkGray))
                }
            })
            .collect();

        let hint = if tutorial.is_last() {
            "[←] Back   [Enter] Start playing"
        } else {
            "[←] Back   [→] Next   [Esc] Skip"
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::raw(step.icon)),
            Line::from(""),
            Line::from(Span::styled(
                step.title,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(step.body, Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(dots),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" How to Play ({}/{}) ", tutorial.index() + 1, tutorial.len()))
            .border_style(Style::default().fg(Color::Rgb(59, 130, 246)));
        frame.render_widget(
            Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_minigame(&self, frame: &mut Frame, game: &Game, area: Rect) {
        match game.active() {
            Some(ActiveGame::Memory(memory)) => self.render_memory(frame, memory, area),
            Some(ActiveGame::Pattern(pattern)) => self.render_pattern(frame, pattern, area),
            Some(ActiveGame::Logic(logic)) => self.render_logic(frame, logic, area),
            None => {}
        }

        if let Some(active) = game.active() {
            let engine = active.as_engine();
            if engine.is_completed() {
                self.render_result(frame, game, engine.kind());
            }
        }
    }

    fn render_memory(&self, frame: &mut Frame, memory: &MemoryGame, area: Rect) {
        let view = memory.view();
        let cols = memory_columns(view.cards.len());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Memory Match ")
            .border_style(Style::default().fg(Color::Rgb(236, 72, 153)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("Moves: {}", view.moves), Style::default().fg(Color::White)),
                Span::raw("   "),
                Span::styled(
                    format!("Pairs: {}/{}", view.matched_pairs, view.pair_count),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("Difficulty: {}", memory.difficulty()),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(""),
        ];

        for (row, chunk) in view.cards.chunks(cols).enumerate() {
            let spans: Vec<Span> = chunk
                .iter()
                .enumerate()
                .map(|(col, card)| {
                    let idx = row * cols + col;
                    let text = if card.face_up || card.matched {
                        format!(" {} ", card.symbol)
                    } else {
                        " ▒▒ ".to_string()
                    };
                    let mut style = if card.matched {
                        Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
                    } else if card.face_up {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Rgb(139, 92, 246))
                    };
                    if idx == self.card_cursor {
                        style = style.bg(Color::Rgb(60, 60, 80));
                    }
                    Span::styled(text, style)
                })
                .flat_map(|span| [span, Span::raw(" ")])
                .collect();
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }

        let hint = if view.phase == RoundPhase::Feedback {
            "No match..."
        } else {
            "[←↑↓→] Move   [Enter] Flip   [R] Restart   [Esc] Menu"
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }

    fn render_pattern(&self, frame: &mut Frame, pattern: &PatternGame, area: Rect) {
        let view = pattern.view();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Pattern Recognition ")
            .border_style(Style::default().fg(Color::Rgb(59, 130, 246)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(1),
            ])
            .split(inner);

        let hearts: String = (0..crate::minigames::pattern::START_LIVES)
            .map(|i| if i < view.lives { '♥' } else { '♡' })
            .collect();
        let status = if view.showing_pattern {
            "Watch the pattern...".to_string()
        } else if view.phase == RoundPhase::InRound {
            format!("Your turn: {}/{}", view.progress, view.sequence_len)
        } else {
            "Get ready...".to_string()
        };
        let info = vec![
            Line::from(vec![
                Span::styled(
                    format!("Round {}/{}", view.round, view.max_rounds),
                    Style::default().fg(Color::White),
                ),
                Span::raw("   "),
                Span::styled(hearts, Style::default().fg(Color::LightRed)),
                Span::raw("   "),
                Span::styled(format!("Score: {}", view.score), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(Span::styled(status, Style::default().fg(Color::Cyan))),
        ];
        frame.render_widget(Paragraph::new(info).alignment(Alignment::Center), chunks[0]);

        let board = centered_rect(70, 100, chunks[1]);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(board);
        for (row_idx, row_area) in rows.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                    Constraint::Ratio(1, 3),
                ])
                .split(*row_area);
            for (col_idx, cell) in cells.iter().enumerate() {
                let tile = row_idx * PATTERN_COLS + col_idx;
                let lit = view.lit == Some(tile) || view.flash == Some(tile);
                let (r, g, b) = TILE_COLORS[tile];
                let color = if lit {
                    Color::Rgb(r, g, b)
                } else {
                    Color::Rgb(r / 3, g / 3, b / 3)
                };
                let border = if tile == self.tile_cursor && view.phase == RoundPhase::InRound {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let tile_block = Block::default().borders(Borders::ALL).border_style(border);
                frame.render_widget(
                    Paragraph::new(format!("{}", tile + 1))
                        .block(tile_block)
                        .style(Style::default().bg(color).fg(Color::White))
                        .alignment(Alignment::Center),
                    *cell,
                );
            }
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "[1-6] Press tile   [←↑↓→ Enter] Select   [Esc] Menu",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
            chunks[2],
        );
    }

    fn render_logic(&self, frame: &mut Frame, logic: &LogicGame, area: Rect) {
        let view = logic.view();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Logic Puzzles ")
            .border_style(Style::default().fg(Color::Rgb(245, 158, 11)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(puzzle) = view.puzzle else {
            return;
        };

        let budget = TIME_PER_PUZZLE.as_secs() as u32;
        let timer_color = if view.remaining_seconds > 10 { Color::Green } else { Color::Red };
        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("Puzzle {}/{}", view.index + 1, view.total),
                    Style::default().fg(Color::White),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("{} · difficulty {}", puzzle.kind.name(), puzzle.difficulty),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw("   "),
                Span::styled(format!("Score: {}", view.score), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::styled(
                    bar(f64::from(view.remaining_seconds) / f64::from(budget), 30),
                    Style::default().fg(timer_color),
                ),
                Span::styled(
                    format!(" {:>2}s", view.remaining_seconds),
                    Style::default().fg(timer_color),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                puzzle.question.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (idx, option) in puzzle.options.iter().enumerate() {
            let letter = (b'A' + idx as u8) as char;
            let style = match view.answer {
                Some(_) if idx == puzzle.correct => {
                    Style::default().fg(Color::Black).bg(Color::Green)
                }
                Some(Answer::Chosen(chosen)) if chosen == idx => {
                    Style::default().fg(Color::White).bg(Color::Red)
                }
                Some(_) => Style::default().fg(Color::DarkGray),
                None if idx == self.answer_cursor => {
                    Style::default().fg(Color::Black).bg(Color::Rgb(245, 158, 11))
                }
                None => Style::default().fg(Color::White),
            };
            lines.push(Line::from(Span::styled(format!(" {}) {} ", letter, option), style)));
        }

        lines.push(Line::from(""));
        let feedback = match view.answer {
            Some(Answer::Chosen(chosen)) if chosen == puzzle.correct => {
                Span::styled("Correct!", Style::default().fg(Color::Green))
            }
            Some(Answer::Chosen(_)) => Span::styled("Not quite.", Style::default().fg(Color::Red)),
            Some(Answer::TimedOut) => Span::styled("Time's up!", Style::default().fg(Color::Red)),
            None => Span::styled(
                "[A-D / 1-4] Answer   [↑↓ Enter] Select   [Esc] Menu",
                Style::default().fg(Color::DarkGray),
            ),
        };
        lines.push(Line::from(feedback));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_result(&self, frame: &mut Frame, game: &Game, kind: MiniGameKind) {
        let Some((_, outcome)) = game.last_outcome() else {
            return;
        };
        let area = centered_rect(40, 40, frame.area());
        frame.render_widget(Clear, area);

        let (headline, color) = if outcome.won {
            ("🎉 Well done!", Color::Green)
        } else {
            ("Out of lives", Color::LightRed)
        };
        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Score: {}", outcome.score)),
        ];
        if outcome.won {
            text.push(Line::from(Span::styled(
                format!("+{} coins", coins_for_win(outcome.score)),
                Style::default().fg(Color::Yellow),
            )));
        }
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            "[Enter] Play again   [Esc] Menu",
            Style::default().fg(Color::Gray),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", kind.name()))
            .border_style(Style::default().fg(color));
        frame.render_widget(
            Paragraph::new(text).block(block).alignment(Alignment::Center),
            area,
        );
    }

    fn render_garden(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let grid_width = (GARDEN_COLS as u16) * 2 + 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(grid_width), Constraint::Min(28)])
            .split(area);

        let grid_area = Rect {
            height: chunks[0].height.min(GARDEN_ROWS as u16 + 2),
            ..chunks[0]
        };
        frame.render_widget(
            GardenGridWidget::new(game.garden().items(), game.catalog())
                .cursor(self.garden_cursor)
                .carrying(self.carrying.as_deref())
                .title(" My Garden "),
            grid_area,
        );

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(9),
                Constraint::Length(4),
                Constraint::Length(8),
            ])
            .split(chunks[1]);

        // Plant palette
        let level = game.progression().level();
        let coins = game.progression().coins();
        let palette: Vec<Line> = game
            .catalog()
            .iter()
            .enumerate()
            .map(|(idx, plant)| {
                let unlocked = plant.is_unlocked_at(level);
                let affordable = coins >= plant.cost;
                let mut style = match (unlocked, affordable) {
                    (false, _) => Style::default().fg(Color::DarkGray),
                    (true, false) => Style::default().fg(Color::Gray),
                    (true, true) => Style::default().fg(Color::White),
                };
                if idx == self.palette_index {
                    style = style.bg(Color::Rgb(50, 70, 45)).add_modifier(Modifier::BOLD);
                }
                let detail = if unlocked {
                    format!("{:>4} 🪙", plant.cost)
                } else {
                    format!("Lv {}", plant.unlock_level)
                };
                let magic = if plant.magical { "✨" } else { "  " };
                Line::from(Span::styled(
                    format!("{} {:<15}{} {}", plant.sprite, plant.name, magic, detail),
                    style,
                ))
            })
            .collect();
        let palette_block = Block::default()
            .borders(Borders::ALL)
            .title(" Plants ")
            .border_style(Style::default().fg(Color::Rgb(16, 185, 129)));
        frame.render_widget(Paragraph::new(palette).block(palette_block), side[0]);

        // Plant under the cursor
        let (x, y) = self.garden_cursor.center();
        let info = match plant_at(game.garden().items(), game.catalog(), x, y) {
            Some(item) => vec![
                Line::from(Span::styled(
                    self.plant_name(game, &item.plant_type),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("{} {:.0}% grown", bar(f64::from(item.growth), 10), item.growth * 100.0),
                    Style::default().fg(Color::Green),
                )),
            ],
            None if self.carrying.is_some() => vec![Line::from(Span::styled(
                "Press Enter to drop here",
                Style::default().fg(Color::Cyan),
            ))],
            None => vec![Line::from(Span::styled(
                format!("{} plants in your garden", game.garden().len()),
                Style::default().fg(Color::DarkGray),
            ))],
        };
        let info_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Paragraph::new(info).block(info_block), side[1]);

        render_garden_help(side[2], frame.buffer_mut());
    }

    fn render_achievements(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        // Stats panel
        let progress = game.progression().progress();
        let stat = |label: &'static str, value: String, color: Color| {
            Line::from(vec![
                Span::styled(label, Style::default().fg(Color::Gray)),
                Span::styled(value, Style::default().fg(color)),
            ])
        };
        let stats_lines = vec![
            Line::from(""),
            stat("Games Played: ", progress.games_played.to_string(), Color::White),
            stat("Games Won: ", progress.games_won.to_string(), Color::Green),
            stat("Win Rate: ", format!("{:.0}%", progress.win_rate() * 100.0), Color::White),
            Line::from(""),
            stat("Current Streak: ", progress.current_streak.to_string(), Color::LightRed),
            stat("Best Streak: ", progress.best_streak.to_string(), Color::LightRed),
            Line::from(""),
            stat("Total Score: ", progress.total_score.to_string(), Color::Yellow),
            stat("Experience: ", progress.experience.to_string(), Color::Magenta),
            stat("Plants Grown: ", game.garden().items().iter().filter(|i| i.is_grown()).count().to_string(), Color::Green),
        ];
        let stats_block = Block::default()
            .borders(Borders::ALL)
            .title(" Statistics ")
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(stats_lines).block(stats_block), chunks[0]);

        // Achievements panel
        let tracker = game.progression().tracker();
        let mut lines: Vec<Line> = vec![Line::from("")];
        for achievement in tracker.all() {
            let (check, name_style) = if achievement.unlocked {
                (
                    Span::styled("[X] ", Style::default().fg(Color::Green)),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                (
                    Span::styled("[ ] ", Style::default().fg(Color::DarkGray)),
                    Style::default().fg(Color::White),
                )
            };
            lines.push(Line::from(vec![
                check,
                Span::raw(format!("{} ", achievement.icon())),
                Span::styled(achievement.name(), name_style),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(achievement.description(), Style::default().fg(Color::Gray)),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    bar(achievement.ratio(), 16),
                    Style::default().fg(if achievement.unlocked { Color::Green } else { Color::DarkGray }),
                ),
                Span::styled(
                    format!(" {}/{}", achievement.progress, achievement.max_progress),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "[Esc] Back to Menu",
            Style::default().fg(Color::DarkGray),
        )));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Achievements ({}/{}) ",
                tracker.unlocked_count(),
                tracker.all().len()
            ))
            .border_style(Style::default().fg(Color::Yellow));
        frame.render_widget(Paragraph::new(lines).block(block), chunks[1]);
    }

    fn render_messages(&self, frame: &mut Frame, game: &Game, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);

        let messages: Vec<Line> = game
            .messages()
            .iter()
            .rev()
            .take(inner.height as usize)
            .rev()
            .map(|msg| {
                let color = match msg.category {
                    MessageCategory::Reward => Color::Yellow,
                    MessageCategory::Achievement => Color::Magenta,
                    MessageCategory::Garden => Color::Green,
                    MessageCategory::System => Color::Cyan,
                    MessageCategory::Warning => Color::LightRed,
                };
                Line::from(Span::styled(msg.text.as_str(), Style::default().fg(color)))
            })
            .collect();

        frame.render_widget(Paragraph::new(messages).block(block), area);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Tiles per row on the pattern board
const PATTERN_COLS: usize = 3;

/// Cards per row for a deck size
fn memory_columns(card_count: usize) -> usize {
    if card_count > 16 {
        6
    } else {
        4
    }
}

/// Text progress bar
fn bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round()) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::GameConfig;
    use crate::data::DataManager;
    use crate::save::MemoryStore;

    fn game() -> Game {
        Game::with_rng(
            GameConfig::default(),
            Arc::new(MemoryStore::new()),
            DataManager::default(),
            StdRng::seed_from_u64(5),
        )
    }

    fn press(app: &mut App, game: &mut Game, code: KeyCode) -> bool {
        app.handle_input(KeyEvent::new(code, KeyModifiers::NONE), game).unwrap()
    }

    #[test]
    fn test_menu_hotkeys() {
        let mut app = App::new();
        let mut game = game();

        press(&mut app, &mut game, KeyCode::Char('2'));
        assert_eq!(game.mode(), GameMode::Pattern);
        press(&mut app, &mut game, KeyCode::Esc);
        assert_eq!(game.mode(), GameMode::Menu);

        press(&mut app, &mut game, KeyCode::Char('g'));
        assert_eq!(game.mode(), GameMode::Garden);
        press(&mut app, &mut game, KeyCode::Esc);

        assert!(press(&mut app, &mut game, KeyCode::Char('q')));
    }

    #[test]
    fn test_garden_purchase_refusal_is_reported() {
        let mut app = App::new();
        let mut game = game();
        game.set_mode(GameMode::Garden);

        press(&mut app, &mut game, KeyCode::Enter);
        assert!(game.garden().is_empty());
        let last = game.messages().last().unwrap();
        assert_eq!(last.category, MessageCategory::Warning);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut app = App::new();
        let mut game = game();

        press(&mut app, &mut game, KeyCode::Char('r'));
        press(&mut app, &mut game, KeyCode::Char('n'));
        assert!(!app.confirm_reset);
        assert!(game.messages().is_empty());

        press(&mut app, &mut game, KeyCode::Char('r'));
        press(&mut app, &mut game, KeyCode::Char('y'));
        assert_eq!(game.messages().last().unwrap().text, "All progress reset");
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(2.0, 3), "███");
    }
}
