pub mod surface;

use std::io::{Stdout, Write};
use std::time::Duration;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode, MouseButton, MouseEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::app::surface::TermSurface;
use crate::config::EngineConfig;
use crate::engine::{Engine, Phase, SolveOutcome};
use crate::grid::GridMode;
use crate::search::SearchKind;

pub struct App {
    /// Target time between engine ticks, a.k.a. the frame interval
    frame_interval: Duration,
}

impl Default for App {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(33),
        }
    }
}

impl App {
    /// Available search strategies, keyed 1-3 during a run
    const SEARCH_KINDS: [SearchKind; 3] = [SearchKind::Bfs, SearchKind::Dfs, SearchKind::BiBfs];
    /// Available grid flavors
    const MODES: [GridMode; 2] = [GridMode::Maze, GridMode::Open];
    /// Rows below the lattice reserved for the status line
    const STATUS_ROWS: u16 = 2;

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode, enter alternate screen, and capture mouse
    /// events for wall painting. Also sets a panic hook to restore terminal
    /// on panic.
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        crossterm::queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            event::EnableMouseCapture,
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(
            stdout,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop
    pub fn run(&self, stdout: &mut Stdout) -> std::io::Result<()> {
        let dimensions = match App::ask_dimensions(stdout)? {
            Some(dimensions) => dimensions,
            None => return Ok(()),
        };

        let mode = match App::select_from_menu(
            stdout,
            "Select grid flavor (use arrow keys and Enter, or Esc to exit):",
            &App::MODES,
        )? {
            Some(mode) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Selected: {}\r\n", mode)
                        .with(Color::Green)
                        .attribute(Attribute::Bold),
                ))?;
                mode
            }
            None => return Ok(()),
        };

        let search_kind = match App::select_from_menu(
            stdout,
            "Select search strategy (use arrow keys and Enter, or Esc to exit):",
            &App::SEARCH_KINDS,
        )? {
            Some(kind) => {
                stdout.execute(style::PrintStyledContent(
                    format!("Selected: {}\r\n", kind)
                        .with(Color::Green)
                        .attribute(Attribute::Bold),
                ))?;
                kind
            }
            None => return Ok(()),
        };

        queue!(
            stdout,
            style::PrintStyledContent(
                "Controls:\r\n"
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
            ),
            style::PrintStyledContent("  Enter/Space: Start solving\r\n".with(Color::Cyan)),
            style::PrintStyledContent(
                "  Mouse drag: Paint walls (open grid, while idle)\r\n".with(Color::Cyan)
            ),
            style::PrintStyledContent("  1/2/3: Switch search strategy\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  R: Restart with a fresh grid\r\n".with(Color::Cyan)),
            style::PrintStyledContent("  Esc: Exit\r\n\r\n".with(Color::Cyan)),
            style::PrintStyledContent(
                "Press Enter to start...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold)
            ),
        )?;
        stdout.flush()?;
        if !App::wait_for_enter()? {
            return Ok(());
        }

        let config = EngineConfig {
            dimensions,
            mode,
            search_kind,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config.clone()).map_err(std::io::Error::other)?;

        queue!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        stdout.flush()?;

        let mut surface = TermSurface::new((0, 0));
        engine.draw_all(&mut surface);
        surface.flush()?;

        self.frame_loop(stdout, &mut engine, &mut surface, &config)
    }

    /// Single-threaded frame loop: poll input for up to one frame interval,
    /// apply it, tick the engine once, flush, and repeat until Esc.
    fn frame_loop(
        &self,
        stdout: &mut Stdout,
        engine: &mut Engine,
        surface: &mut TermSurface,
        config: &EngineConfig,
    ) -> std::io::Result<()> {
        let (_, lattice_rows) = TermSurface::extent(engine.grid().dimensions());
        let status_row = lattice_rows + 1;
        let mut last_status = String::new();

        tracing::info!("entering frame loop");
        loop {
            if event::poll(self.frame_interval)? {
                // Drain everything that arrived this frame
                loop {
                    match event::read()? {
                        event::Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                            match key.code {
                                KeyCode::Esc => return Ok(()),
                                KeyCode::Enter | KeyCode::Char(' ' | 's' | 'S') => {
                                    engine.on_solve()
                                }
                                KeyCode::Char(c @ '1'..='3') => {
                                    let index = c as usize - '1' as usize;
                                    engine.on_search_selection(App::SEARCH_KINDS[index]);
                                }
                                KeyCode::Char('r' | 'R') => {
                                    engine.reset(config.clone()).map_err(std::io::Error::other)?;
                                    queue!(stdout, terminal::Clear(ClearType::All))?;
                                    stdout.flush()?;
                                    engine.draw_all(surface);
                                    last_status.clear();
                                }
                                _ => {}
                            }
                        }
                        event::Event::Mouse(mouse) => {
                            let (x, y) = App::canvas_position(engine, mouse.column, mouse.row);
                            match mouse.kind {
                                MouseEventKind::Down(MouseButton::Left) => {
                                    engine.on_mouse_move(x, y);
                                    engine.on_mouse_down(true);
                                }
                                MouseEventKind::Up(MouseButton::Left) => {
                                    engine.on_mouse_down(false);
                                }
                                MouseEventKind::Drag(MouseButton::Left)
                                | MouseEventKind::Moved => {
                                    engine.on_mouse_move(x, y);
                                }
                                _ => {}
                            }
                        }
                        event::Event::Resize(_, _) => {
                            queue!(stdout, terminal::Clear(ClearType::All))?;
                            stdout.flush()?;
                            engine.draw_all(surface);
                            last_status.clear();
                        }
                        _ => {}
                    }
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }

            engine.tick(surface);
            surface.flush()?;

            let status = App::status_line(engine);
            if status != last_status {
                queue!(
                    stdout,
                    cursor::MoveTo(0, status_row),
                    terminal::Clear(ClearType::CurrentLine),
                    style::PrintStyledContent(status.as_str().with(Color::Cyan))
                )?;
                stdout.flush()?;
                last_status = status;
            }
        }
    }

    fn status_line(engine: &Engine) -> String {
        match (engine.phase(), engine.outcome()) {
            (Phase::Generating, _) => "Generating maze...".to_string(),
            (Phase::Searching, _) => format!("Searching with {}...", engine.search_kind()),
            (Phase::Solving, _) => "Tracing the path...".to_string(),
            (Phase::Waiting, Some(SolveOutcome::NoSolution)) => {
                "No path found. Edit walls and press Enter to retry.".to_string()
            }
            (Phase::Waiting, _) => {
                "Idle. Drag the mouse to paint walls, press Enter to solve.".to_string()
            }
            (Phase::Complete, _) => "Solved! Press R to restart or Esc to exit.".to_string(),
        }
    }

    /// Map a terminal mouse position to the engine's canvas pixel space.
    /// Positions outside the lattice map outside the canvas and are dropped
    /// by the engine.
    fn canvas_position(engine: &Engine, column: u16, row: u16) -> (f64, f64) {
        let (lattice_cols, lattice_rows) = TermSurface::extent(engine.grid().dimensions());
        let canvas = engine.config().canvas_size as f64;
        (
            column as f64 / lattice_cols as f64 * canvas,
            row as f64 / lattice_rows as f64 * canvas,
        )
    }

    /// Largest grid that fits the terminal once the lattice footprint and
    /// the status line are accounted for
    fn max_dimensions(term_width: u16, term_height: u16) -> u16 {
        let by_width = (term_width / TermSurface::CELL_WIDTH).saturating_sub(1) / 2;
        let by_height = term_height.saturating_sub(1 + App::STATUS_ROWS) / 2;
        by_width.min(by_height).max(1)
    }

    /// Ask user for the grid dimensions (the grid is square)
    /// Returns None if user cancels input with Esc
    fn ask_dimensions(stdout: &mut Stdout) -> std::io::Result<Option<u16>> {
        stdout.execute(style::PrintStyledContent(
            "Enter the grid size (cells per side), or press Esc to exit. \
Empty input uses the largest size the terminal fits.\r\n"
                .with(Color::Blue),
        ))?;

        let validate = |s: &str| {
            let max_size = match terminal::size() {
                Ok((term_width, term_height)) => App::max_dimensions(term_width, term_height),
                // Fallback if terminal size cannot be determined
                Err(_) => u8::MAX as u16,
            };

            if s.trim().is_empty() {
                return Ok(max_size);
            }

            let error_msg = format!("Please enter a valid number between 1 and {}.", max_size);
            s.parse::<u16>()
                .map_err(|_| error_msg.clone())
                .and_then(|n| match n {
                    1.. if n <= max_size => Ok(n),
                    _ => Err(error_msg),
                })
        };

        let dimensions = match App::prompt_with_validation(stdout, "Size: ", validate)? {
            Some(n) => n,
            None => return Ok(None),
        };
        stdout.execute(style::PrintStyledContent(
            format!("Grid size set to {0}x{0}\r\n", dimensions)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;

        Ok(Some(dimensions))
    }

    /// Wait for the user to press Enter; Esc returns false
    fn wait_for_enter() -> std::io::Result<bool> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter => return Ok(true),
                    KeyCode::Esc => return Ok(false),
                    _ => {}
                }
            }
        }
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let value = loop {
            // Re-render prompt line
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            // Color the input based on validity
            let validation_result = validate(input.trim());
            match validation_result {
                Ok(_) => stdout.queue(style::SetForegroundColor(Color::Green))?,
                Err(_) => stdout.queue(style::SetForegroundColor(Color::Red))?,
            };
            queue!(stdout, style::Print(&input), style::ResetColor)?;
            stdout.queue(style::Print(" \r\n"))?;

            // Error message line (if any)
            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                match code {
                    KeyCode::Enter => match validate(&input) {
                        Ok(n) => break Some(n),
                        Err(_) => continue,
                    },
                    KeyCode::Char(c) if kind == event::KeyEventKind::Press => {
                        if !c.is_whitespace() && !c.is_control() {
                            input.push(c);
                        }
                    }
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        // Cleanup
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(value)
    }

    /// Present a menu of options to the user and let them select one using arrow keys
    /// Returns None if user cancels input with Esc
    fn select_from_menu<T: std::fmt::Display + Copy>(
        stdout: &mut Stdout,
        prompt: &str,
        options: &[T],
    ) -> std::io::Result<Option<T>> {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;

        let mut selected = 0;

        let selected_option = loop {
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;
            stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

            for (i, option) in options.iter().enumerate() {
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::Reverse))?;
                }
                stdout.queue(style::Print(format!("\r\n{}", option)))?;
                if i == selected {
                    stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
                }
            }
            stdout.queue(style::Print("\r\n"))?;
            stdout.flush()?;

            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if kind != event::KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Up => {
                        selected = match selected {
                            0 => options.len() - 1,
                            _ => selected - 1,
                        };
                    }
                    KeyCode::Down => {
                        selected = if selected >= options.len() - 1 {
                            0
                        } else {
                            selected + 1
                        };
                    }
                    KeyCode::Enter => break Some(options[selected]),
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        // Cleanup
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown),
            cursor::Show
        )?;
        stdout.flush()?;

        Ok(selected_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_dimensions_inverts_the_lattice_footprint() {
        // 80x24 terminal: width allows (80/2 - 1)/2 = 19, height (24-3)/2 = 10.
        assert_eq!(App::max_dimensions(80, 24), 10);
        // Width-bound terminal.
        assert_eq!(App::max_dimensions(20, 50), 4);
        // Degenerate terminals still allow a 1x1 grid.
        assert_eq!(App::max_dimensions(0, 0), 1);
    }

    #[test]
    fn lattice_extent_is_odd_and_double_width() {
        assert_eq!(TermSurface::extent(10), (42, 21));
        assert_eq!(TermSurface::extent(1), (6, 3));
    }
}
