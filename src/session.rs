//! Session - the editor's top-level state and input loop
//!
//! A session owns the pane tree, the context stack with its registry, the
//! key bindings and the configuration. Screen layout: a title bar on the
//! first row, the panes below it, and a status line on the last row.

use std::io;

use crate::command::{Command, CommandParser, Outcome, ParamDefaults};
use crate::config::EditorConfig;
use crate::context::Context;
use crate::error::EditorError;
use crate::input::{
    CodeSource, Decoded, InputDecoder, MouseAction, MouseReport, Wheel, MOUSE_KEYCHORD,
    RESIZE_KEYCHORD,
};
use crate::keymap::Keymap;
use crate::model::{Rect, TextBuffer, ViewTree};
use crate::registry::Scope;
use crate::render::{Color, Highlighter, Style, Surface};

/// Global variable holding the result of the last command
pub const RESULT_VAR: &str = "_";

/// Lines scrolled per mouse wheel step
const WHEEL_LINES: isize = 3;

pub struct Session {
    pub(crate) views: ViewTree,
    pub(crate) context: Context,
    pub(crate) keymap: Keymap,
    pub(crate) config: EditorConfig,
    title: String,
    status: String,
    /// Title and status rows need repainting
    chrome_dirty: bool,
    size: (usize, usize),
    halted: bool,
}

impl Session {
    pub fn new(config: EditorConfig, keymap: Keymap, buffer: TextBuffer) -> Self {
        let views =
            ViewTree::with_gutter_color(buffer, config.line_number_width, config.gutter_color);
        let mut session = Self {
            views,
            context: Context::new(),
            keymap,
            config,
            title: format!("quill {}", env!("CARGO_PKG_VERSION")),
            status: String::new(),
            chrome_dirty: true,
            size: (0, 0),
            halted: false,
        };
        session.publish_cursor_vars();
        session
    }

    pub fn views(&self) -> &ViewTree {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewTree {
        &mut self.views
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, text: &str) {
        if self.status != text {
            self.status = text.to_string();
            self.chrome_dirty = true;
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.chrome_dirty = true;
    }

    /// Whether a command asked to quit
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Lay the panes out for a `rows` x `cols` screen
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.size = (rows, cols);
        self.views
            .resize(Rect::new(1, 0, rows.saturating_sub(2), cols));
        self.chrome_dirty = true;
        tracing::debug!(rows, cols, "session resized");
    }

    pub fn parser(&self) -> CommandParser<'_> {
        let cursor = self.views.active_buffer_view().cursor();
        let defaults = ParamDefaults {
            line: cursor.line,
            column: cursor.column,
            tab_stop: self.config.tab_stop,
            split: self.config.default_split,
        };
        CommandParser::new(&self.context, &self.keymap, defaults)
    }

    /// Run a parsed command and publish its result as `$_`
    pub fn execute(&mut self, command: &Command) -> Result<Outcome, EditorError> {
        self.context.set_current_command(Some(command.kind()));
        let result = command.execute(self);
        self.context.set_current_command(None);
        self.publish_cursor_vars();

        let outcome = result?;
        match &outcome {
            Outcome::Done(value) => self.context.set_var(RESULT_VAR, value.clone(), Scope::Global),
            Outcome::Halt => self.halted = true,
        }
        Ok(outcome)
    }

    /// Parse and run one line of command text
    pub fn execute_str(&mut self, text: &str) -> Result<Outcome, EditorError> {
        let command = self.parser().from_string(text)?;
        self.execute(&command)
    }

    /// Run whatever `keychord` is bound to in the current context
    pub fn dispatch_keychord(&mut self, keychord: &str) -> Result<Outcome, EditorError> {
        let command = self.parser().from_keychord(keychord)?;
        self.execute(&command)
    }

    /// Dispatch a keychord, turning failures into status messages
    ///
    /// Resolution failures (unbound key, bad command text) only set the
    /// status line; failures while executing are also logged.
    pub fn handle_keychord(&mut self, keychord: &str) -> Outcome {
        let command = match self.parser().from_keychord(keychord) {
            Ok(command) => command,
            Err(e) => {
                self.set_status(&e.to_string());
                return Outcome::Done(String::new());
            }
        };

        match self.execute(&command) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(command = %command, "command failed: {}", e);
                self.set_status(&e.to_string());
                Outcome::Done(String::new())
            }
        }
    }

    /// Run a startup script, one command per line
    ///
    /// Blank lines and `#` comments are skipped. A failing line is logged
    /// and the script continues. Returns the number of failed lines.
    pub fn run_startup(&mut self, script: &str) -> usize {
        let mut failures = 0;
        for (number, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match self.execute_str(line) {
                Ok(Outcome::Halt) => break,
                Ok(Outcome::Done(_)) => {}
                Err(e) => {
                    failures += 1;
                    tracing::error!(
                        line = number + 1,
                        command = line,
                        "startup command failed: {}",
                        e
                    );
                }
            }
        }
        failures
    }

    /// Publish a mouse report and apply clicks and wheel steps to the panes
    pub fn handle_mouse(&mut self, report: MouseReport) {
        self.context
            .set_var("mouse_x", report.x.to_string(), Scope::Global);
        self.context
            .set_var("mouse_y", report.y.to_string(), Scope::Global);
        self.context
            .set_var("mouse_button", report.button.to_string(), Scope::Global);
        self.context
            .set_var("mouse_action", report.action.name(), Scope::Global);

        if let Some(wheel) = report.wheel {
            let delta = match wheel {
                Wheel::Up => -WHEEL_LINES,
                Wheel::Down => WHEEL_LINES,
            };
            let (view, buffer) = self.views.active_parts();
            view.move_cursor_line(buffer, delta);
        } else if report.action == MouseAction::Down
            && report.button == 1
            && report.x >= 0
            && report.y >= 0
        {
            let (row, col) = (report.y as usize, report.x as usize);
            let Some(leaf) = self.views.leaf_at(row, col) else {
                return;
            };
            self.views.focus(leaf);
            let (view, buffer) = self.views.active_parts();
            if let Some((line, column)) = view.position_at(row, col) {
                // Clicks past the end of a line or below the last line land
                // on the nearest character
                let line = line.min(buffer.line_count().saturating_sub(1));
                let column = column.min(buffer.line_length(line).unwrap_or(0));
                view.set_cursor(buffer, line as isize, column as isize);
                view.sync_target_column();
            }
        }
        self.publish_cursor_vars();
    }

    /// Paint everything that changed and place the cursor
    pub fn render(
        &mut self,
        surface: &mut dyn Surface,
        highlighter: &dyn Highlighter,
    ) -> io::Result<()> {
        let (rows, cols) = self.size;
        if self.chrome_dirty && rows > 0 {
            let bar = Style::new(Color::Black, Color::White);
            surface.move_to(0, 0)?;
            surface.write(&centered(&self.title, cols), bar)?;
            if rows > 1 {
                surface.move_to(rows - 1, 0)?;
                surface.write(&centered(&self.status, cols), Style::PLAIN)?;
            }
            self.chrome_dirty = false;
        }

        self.views.render(surface, highlighter)?;
        self.publish_cursor_vars();

        surface.show_cursor(self.views.cursor_screen_position())?;
        surface.flush()
    }

    /// Expose the focused cursor as `$cur_line_num` and `$cur_line_length`
    fn publish_cursor_vars(&mut self) {
        let cursor = self.views.active_buffer_view().cursor();
        let length = self
            .views
            .active_buffer()
            .line_length(cursor.line)
            .unwrap_or(0);
        self.context
            .set_var("cur_line_num", cursor.line.to_string(), Scope::Control);
        self.context
            .set_var("cur_line_length", length.to_string(), Scope::Control);
    }

    /// Render, read a keychord, dispatch; until a command halts or input ends
    pub fn run<S: CodeSource>(
        &mut self,
        decoder: &mut InputDecoder<S>,
        surface: &mut dyn Surface,
        highlighter: &dyn Highlighter,
    ) -> io::Result<()> {
        while !self.halted {
            self.render(surface, highlighter)?;

            let keychord = match decoder.next_keychord() {
                Decoded::Keychord(keychord) => keychord,
                Decoded::Unrecognized => {
                    self.set_status("Unrecognized input");
                    continue;
                }
                Decoded::EndOfInput => break,
            };

            if keychord == RESIZE_KEYCHORD {
                let (rows, cols) = surface.size();
                self.resize(rows, cols);
                continue;
            }

            if keychord == MOUSE_KEYCHORD {
                if let Some(report) = decoder.last_mouse() {
                    self.handle_mouse(report);
                }
                let context = self.context.context_name();
                if self.keymap.lookup(&context, MOUSE_KEYCHORD).is_none() {
                    continue;
                }
            }

            self.handle_keychord(&keychord);
        }
        Ok(())
    }
}

/// `text` centered in a row of `width` cells, clipped if too long
fn centered(text: &str, width: usize) -> String {
    let text: String = text.chars().take(width).collect();
    let left = (width - text.chars().count()) / 2;
    format!("{:left$}{:<rest$}", "", text, left = left, rest = width - left)
}
