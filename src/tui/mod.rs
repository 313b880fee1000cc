pub mod widgets;

use std::cell::Cell;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};

use crate::color::Hex;
use crate::panel::{AddTarget, Command, Host, Section, Workspace};
use crate::view::{category_nodes, tooltip, TreeNode};

use widgets::{DetailWidget, PanelWidget, StatusWidget};

/// One line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Section(Section),
    Category {
        section: Section,
        name: String,
        len: usize,
        expanded: bool,
    },
    Color {
        section: Section,
        category: String,
        color: Hex,
    },
    Action {
        section: Section,
        label: &'static str,
    },
}

/// Flatten both sections into display rows, listing colors only under
/// expanded categories.
pub fn build_rows(workspace: &Workspace, expanded: &HashSet<(Section, String)>) -> Vec<Row> {
    let mut rows = Vec::new();
    for section in Section::ALL {
        rows.push(Row::Section(section));
        let store = workspace.store(section);
        for node in category_nodes(store) {
            match node {
                TreeNode::Category { label, len } => {
                    let is_open = expanded.contains(&(section, label.clone()));
                    let colors = if is_open {
                        store.colors(&label).unwrap_or_default()
                    } else {
                        &[]
                    };
                    let children = colors.iter().map(|color| Row::Color {
                        section,
                        category: label.clone(),
                        color: color.clone(),
                    });
                    let children: Vec<Row> = children.collect();
                    rows.push(Row::Category {
                        section,
                        name: label,
                        len,
                        expanded: is_open,
                    });
                    rows.extend(children);
                }
                TreeNode::Action { label, .. } => rows.push(Row::Action { section, label }),
            }
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    /// Typing a color.
    Input(String),
    /// Choosing between Primary and Others.
    Target(String),
    /// Primary chosen; asking whether to generate the ramp.
    Generate(String),
}

/// Status line contents, written by the host callbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

/// Terminal host: clipboard through OSC 52, messages on the status line.
struct TuiHost {
    status: Option<Status>,
}

impl Host for TuiHost {
    fn write_clipboard(&mut self, text: &str) -> Result<()> {
        let mut out = io::stdout();
        write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        out.flush()?;
        Ok(())
    }

    fn show_info(&mut self, message: &str) {
        self.status = Some(Status {
            message: message.to_string(),
            is_error: false,
        });
    }

    fn show_error(&mut self, message: &str) {
        self.status = Some(Status {
            message: message.to_string(),
            is_error: true,
        });
    }
}

/// State for the interactive panel.
pub struct TuiApp {
    workspace: Workspace,
    files: Vec<PathBuf>,
    expanded: HashSet<(Section, String)>,
    rows: Vec<Row>,
    selected: usize,
    mode: Mode,
    host: TuiHost,
    dirty: Rc<Cell<bool>>,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(mut workspace: Workspace, files: Vec<PathBuf>) -> Self {
        let dirty = Rc::new(Cell::new(true));
        for section in Section::ALL {
            let flag = Rc::clone(&dirty);
            workspace
                .store_mut(section)
                .subscribe(move |_| flag.set(true));
        }
        let mut app = Self {
            workspace,
            files,
            expanded: HashSet::new(),
            rows: Vec::new(),
            selected: 0,
            mode: Mode::Browse,
            host: TuiHost { status: None },
            dirty,
            should_quit: false,
        };
        app.refresh();
        app
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn status(&self) -> Option<&Status> {
        self.host.status.as_ref()
    }

    /// Rebuild rows if a store changed since the last call.
    fn refresh(&mut self) {
        if !self.dirty.replace(false) {
            return;
        }
        self.rows = build_rows(&self.workspace, &self.expanded);
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        self.workspace.dispatch(command, &mut self.host)?;
        self.refresh();
        Ok(())
    }

    fn toggle(&mut self, section: Section, name: &str) {
        let key = (section, name.to_string());
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
        self.dirty.set(true);
        self.refresh();
    }

    fn scan_files(&mut self) -> Result<()> {
        if self.files.is_empty() {
            self.host.show_error("No files to scan; pass them on the command line.");
            return Ok(());
        }
        for path in self.files.clone() {
            let text = match std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))
            {
                Ok(text) => text,
                Err(e) => {
                    self.host.show_error(&format!("{e:#}"));
                    continue;
                }
            };
            self.dispatch(Command::ScanDocument { text })?;
        }
        for category in self.workspace.store(Section::Document).categories() {
            self.expanded.insert((Section::Document, category.to_string()));
        }
        self.dirty.set(true);
        self.refresh();
        Ok(())
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Browse => self.handle_browse_key(key.code)?,
            Mode::Input(mut buffer) => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => match Hex::parse(&buffer) {
                    Ok(_) => self.mode = Mode::Target(buffer),
                    // Let the command report the rejection.
                    Err(_) => self.dispatch(Command::AddColor {
                        input: buffer,
                        target: AddTarget::Others,
                        generate: false,
                    })?,
                },
                KeyCode::Backspace => {
                    buffer.pop();
                    self.mode = Mode::Input(buffer);
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    self.mode = Mode::Input(buffer);
                }
                _ => self.mode = Mode::Input(buffer),
            },
            Mode::Target(input) => match key.code {
                KeyCode::Char('p') => self.mode = Mode::Generate(input),
                KeyCode::Char('o') => self.dispatch(Command::AddColor {
                    input,
                    target: AddTarget::Others,
                    generate: false,
                })?,
                KeyCode::Esc => {}
                _ => self.mode = Mode::Target(input),
            },
            Mode::Generate(input) => match key.code {
                KeyCode::Char('y') => self.dispatch(Command::AddColor {
                    input,
                    target: AddTarget::Primary,
                    generate: true,
                })?,
                // Dismissing the question still adds the color, just without a ramp.
                KeyCode::Char('n') | KeyCode::Esc => self.dispatch(Command::AddColor {
                    input,
                    target: AddTarget::Primary,
                    generate: false,
                })?,
                _ => self.mode = Mode::Generate(input),
            },
        }
        Ok(())
    }

    fn handle_browse_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => self.mode = Mode::Input(String::new()),
            KeyCode::Char('s') => self.scan_files()?,
            KeyCode::Char('r') => self.dispatch(Command::Reset)?,
            KeyCode::Char('g') => {
                if !self.workspace.regenerate() {
                    self.host.show_error("Add a primary color first.");
                }
                self.refresh();
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('d') => {
                let Some(row) = self.selected_row().cloned() else {
                    return Ok(());
                };
                match (code, row) {
                    (KeyCode::Char('d'), Row::Color {
                        section,
                        category,
                        color,
                    }) => self.dispatch(Command::DeleteColor {
                        color,
                        tooltip: tooltip(section, &category),
                    })?,
                    (KeyCode::Char('d'), _) => {}
                    (_, Row::Color { color, .. }) => self.dispatch(Command::CopyColor { color })?,
                    (KeyCode::Char('c'), _) => {}
                    (_, Row::Category { section, name, .. }) => self.toggle(section, &name),
                    (_, Row::Action { .. }) => self.mode = Mode::Input(String::new()),
                    (_, Row::Section(_)) => {}
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn prompt(&self) -> Option<String> {
        match &self.mode {
            Mode::Browse => None,
            Mode::Input(buffer) => Some(format!("Enter a new color (e.g., #RRGGBB): {buffer}_")),
            Mode::Target(input) => Some(format!("{input}: [p] Primary  [o] Others  [Esc] cancel")),
            Mode::Generate(input) => Some(format!(
                "{input}: generate shades and tints automatically? [y/n]"
            )),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let [tree, detail, status] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(PanelWidget::new(&self.rows, self.selected), tree);
        let color = match self.selected_row() {
            Some(Row::Color { color, .. }) => Some(color),
            _ => None,
        };
        frame.render_widget(DetailWidget::new(color, self.workspace.primary()), detail);
        frame.render_widget(StatusWidget::new(self.prompt(), self.status()), status);
    }
}

/// Launch the interactive panel.
pub fn run(mut app: TuiApp) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut app, &mut terminal);
    ratatui::restore();
    result
}

fn event_loop(app: &mut TuiApp, terminal: &mut DefaultTerminal) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| app.draw(frame))?;
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{OTHERS, PRIMARY, TINTS};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut TuiApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_str(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn select(app: &mut TuiApp, wanted: impl Fn(&Row) -> bool) {
        app.selected = app.rows().iter().position(wanted).expect("row present");
    }

    #[test]
    fn collapsed_tree_lists_sections_categories_and_actions() {
        let app = TuiApp::new(Workspace::default(), Vec::new());
        // per section: header + 4 categories + add action
        assert_eq!(app.rows().len(), 12);
        assert_eq!(app.rows()[0], Row::Section(Section::Palette));
        assert_eq!(app.rows()[6], Row::Section(Section::Document));
    }

    #[test]
    fn add_primary_with_ramp_through_prompts() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "#808080");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('y'));

        let palette = app.workspace().store(Section::Palette);
        assert_eq!(palette.colors(PRIMARY).unwrap().len(), 1);
        assert_eq!(palette.colors(TINTS).unwrap().len(), 15);
        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn invalid_input_shows_error() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "red");
        press(&mut app, KeyCode::Enter);
        assert!(app.status().is_some_and(|s| s.is_error));
        assert_eq!(app.mode, Mode::Browse);
    }

    #[test]
    fn expand_then_delete_a_color() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "#123");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('o'));

        select(&mut app, |row| {
            matches!(row, Row::Category { section: Section::Palette, name, .. } if name == OTHERS)
        });
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        assert!(matches!(app.selected_row(), Some(Row::Color { color, .. }) if color == "#112233"));

        press(&mut app, KeyCode::Char('d'));
        assert!(app.workspace().store(Section::Palette).colors(OTHERS).unwrap().is_empty());
        assert_eq!(
            app.status().map(|s| s.message.as_str()),
            Some("Deleted #112233 from Others!")
        );
    }

    #[test]
    fn dismissing_generate_prompt_still_adds_primary() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "#808080");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Esc);

        let palette = app.workspace().store(Section::Palette);
        assert_eq!(palette.colors(PRIMARY).unwrap(), ["#808080"]);
        assert!(palette.colors(TINTS).unwrap().is_empty());
        assert_eq!(app.mode, Mode::Browse);
        assert!(!app.should_quit);
    }

    #[test]
    fn unreadable_file_is_reported_and_others_still_scanned() {
        let dir = std::env::temp_dir().join(format!("swatchbook-tui-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let readable = dir.join("ok.css");
        std::fs::write(&readable, "a { color: #00ff00; }").unwrap();

        let files = vec![PathBuf::from("/nonexistent/x.css"), readable];
        let mut app = TuiApp::new(Workspace::default(), files);
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE))
            .expect("read failure stays inside the panel");

        assert!(!app.should_quit);
        let others = app.workspace().store(Section::Document).colors(OTHERS).unwrap();
        assert_eq!(others, ["#00ff00"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_shows_error_status() {
        let files = vec![PathBuf::from("/nonexistent/x.css")];
        let mut app = TuiApp::new(Workspace::default(), files);
        press(&mut app, KeyCode::Char('s'));

        let status = app.status().expect("status set");
        assert!(status.is_error);
        assert!(status.message.contains("/nonexistent/x.css"), "{}", status.message);
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_keys() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn regenerate_without_primary_reports_error() {
        let mut app = TuiApp::new(Workspace::default(), Vec::new());
        press(&mut app, KeyCode::Char('g'));
        assert!(app.status().is_some_and(|s| s.is_error));
    }
}
