use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;

use crate::config::themes::Theme;
use crate::config::AppConfig;
use crate::store::IdeaStore;
use crate::ui;

pub mod form;
pub mod state;

pub use form::{FormField, FormMode, FormState};
pub use state::{AppState, OverlayState};

/// Every user gesture maps onto one of these before anything mutates;
/// a single handler dispatches them.
enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    NewIdea,
    EditIdea,
    DeleteIdea,
    ToggleArchive,
    CycleView,
    CycleCategory,
    CycleTag,
    CycleSort,
    StartSearch,
}

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    list_state: ListState,
    theme: Theme,
    should_quit: bool,
    poll_timeout: Duration,
}

impl App {
    pub fn new(config: Arc<AppConfig>, store: IdeaStore) -> Self {
        let state = AppState::new(
            store,
            config.default_view,
            config.default_sort,
            config.preview_lines as usize,
        );
        let mut list_state = ListState::default();
        if !state.is_empty() {
            list_state.select(Some(state.selected));
        }
        let theme = Theme::named(&config.theme);
        Self {
            config,
            state,
            list_state,
            theme,
            should_quit: false,
            poll_timeout: Duration::from_millis(250),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal
                .draw(|frame| {
                    if !self.state.is_empty() {
                        self.list_state.select(Some(self.state.selected));
                    } else {
                        self.list_state.select(None);
                    }
                    ui::draw_app(frame, &self.state, &mut self.list_state, &self.theme);
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            if event::poll(self.poll_timeout).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw adapts to the new size
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.handle_overlay_key(key) {
            return;
        }

        if self.state.search_active {
            match key.code {
                KeyCode::Esc => {
                    self.state.cancel_search();
                    return;
                }
                KeyCode::Enter => {
                    self.state.finish_search();
                    return;
                }
                KeyCode::Backspace => {
                    self.state.pop_search_char();
                    return;
                }
                KeyCode::Char(ch)
                    if !key.modifiers.intersects(
                        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                    ) =>
                {
                    self.state.push_search_char(ch);
                    return;
                }
                _ => {}
            }
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
        let action = match key.code {
            KeyCode::Char('q') if plain => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Char('a') if plain => Some(Action::NewIdea),
            KeyCode::Char('e') if plain => Some(Action::EditIdea),
            KeyCode::Char('d') if plain => Some(Action::DeleteIdea),
            KeyCode::Char('A') => Some(Action::ToggleArchive),
            KeyCode::Char('v') if plain => Some(Action::CycleView),
            KeyCode::Char('c') if plain => Some(Action::CycleCategory),
            KeyCode::Char('t') if plain => Some(Action::CycleTag),
            KeyCode::Char('s') if plain => Some(Action::CycleSort),
            KeyCode::Char('/') if plain => Some(Action::StartSearch),
            _ => None,
        };

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.state.move_selection(1),
            Action::SelectPrevious => self.state.move_selection(-1),
            Action::NewIdea => {
                if self.state.overlay().is_none() {
                    self.state.open_create_form();
                    self.state
                        .set_status_message(Some("New idea: Tab fields • Ctrl-s save"));
                }
            }
            Action::EditIdea => {
                if self.state.overlay().is_none() && self.state.open_edit_form() {
                    self.state
                        .set_status_message(Some("Editing idea: Tab fields • Ctrl-s save"));
                }
            }
            Action::DeleteIdea => {
                if self.state.overlay().is_none() {
                    if !self.config.confirm_delete {
                        self.state.delete_selected();
                    } else if self.state.open_delete_confirm() {
                        self.state
                            .set_status_message(Some("Delete idea: Enter confirm • Esc cancel"));
                    }
                }
            }
            Action::ToggleArchive => self.state.toggle_archive_selected(),
            Action::CycleView => self.state.cycle_view(),
            Action::CycleCategory => self.state.cycle_category(),
            Action::CycleTag => self.state.cycle_tag(),
            Action::CycleSort => self.state.cycle_sort(),
            Action::StartSearch => self.state.begin_search(),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> bool {
        match self.state.overlay() {
            Some(OverlayState::Form(_)) => {
                self.handle_form_key(key);
                true
            }
            Some(OverlayState::ConfirmDelete(_)) => {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('n') => {
                        self.state.close_overlay();
                        self.state.set_status_message(Some("Delete canceled"));
                    }
                    KeyCode::Enter | KeyCode::Char('y') => {
                        self.state.confirm_delete();
                    }
                    _ => {}
                }
                true
            }
            None => false,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('s') = key.code {
                self.state.submit_form();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.state.close_overlay();
                self.state.set_status_message(Some("Canceled; nothing saved"));
            }
            KeyCode::Tab => {
                if let Some(form) = self.state.form_mut() {
                    form.focus_next();
                }
            }
            KeyCode::BackTab => {
                if let Some(form) = self.state.form_mut() {
                    form.focus_previous();
                }
            }
            KeyCode::Enter => {
                let focus = self.state.form().map(|form| form.focus);
                match focus {
                    Some(FormField::Content) => {
                        if let Some(form) = self.state.form_mut() {
                            form.insert_newline();
                        }
                    }
                    Some(FormField::Tags) => {
                        if let Some(form) = self.state.form_mut() {
                            form.commit_tag();
                        }
                    }
                    Some(_) => self.state.submit_form(),
                    None => {}
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.state.form_mut() {
                    form.pop_char();
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let on_category = self
                    .state
                    .form()
                    .map(|form| form.focus == FormField::Category)
                    .unwrap_or(false);
                if on_category {
                    if let Some(form) = self.state.form_mut() {
                        form.cycle_category();
                    }
                }
            }
            KeyCode::Char(ch)
                if !key.modifiers.intersects(
                    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                ) =>
            {
                let on_category = self
                    .state
                    .form()
                    .map(|form| form.focus == FormField::Category)
                    .unwrap_or(false);
                if on_category && ch == ' ' {
                    if let Some(form) = self.state.form_mut() {
                        form.cycle_category();
                    }
                } else if let Some(form) = self.state.form_mut() {
                    form.push_char(ch);
                }
            }
            _ => {}
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("restoring screen state")?;
    Ok(())
}
