use crate::api::LookupError;
use crate::config::Config;
use crate::models::IpRecord;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Whether keystrokes edit the IP input line or navigate the target list.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Editing,
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::Editing
    }
}

#[derive(Default)]
pub struct App {
    pub config: Config,
    pub input_mode: InputMode,
    pub input: String,

    // What the map and the cards show
    pub user: Option<IpRecord>,
    pub targets: Vec<IpRecord>,
    pub selected_index: usize,

    // Request state tracking
    pub initial_loading: bool,
    pub lookup_in_flight: bool,
    pending_lookup: Option<String>,

    pub error: Option<String>,
    pub tick_count: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            input_mode: InputMode::Editing,
            input: String::new(),
            user: None,
            targets: Vec::new(),
            selected_index: 0,
            initial_loading: true,
            lookup_in_flight: false,
            pending_lookup: None,
            error: None,
            tick_count: 0,
            should_quit: false,
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The loading screen owns the terminal until the own-location fetch
        // settles; only quitting works there.
        if self.initial_loading {
            if let KeyCode::Char('q') = key.code {
                self.should_quit = true;
            }
            return;
        }

        match self.input_mode {
            InputMode::Editing => {
                // The input line is frozen while a lookup is outstanding;
                // only leaving editing mode works.
                if self.lookup_in_flight {
                    if key.code == KeyCode::Esc {
                        self.input_mode = InputMode::Normal;
                    }
                    return;
                }
                match key.code {
                    KeyCode::Enter => self.submit_input(),
                    KeyCode::Char(c) => self.input.push(c),
                    KeyCode::Backspace => {
                        self.input.pop();
                    }
                    KeyCode::Esc => self.input_mode = InputMode::Normal,
                    _ => {}
                }
            }
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('i') | KeyCode::Char('/') => self.input_mode = InputMode::Editing,
                KeyCode::Down | KeyCode::Char('j') => self.select_next(),
                KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
                KeyCode::Char('J') => self.move_selected_down(),
                KeyCode::Char('K') => self.move_selected_up(),
                KeyCode::Char('d') | KeyCode::Delete => self.remove_selected(),
                KeyCode::Char('x') => self.clear_targets(),
                _ => {}
            },
        }
    }

    /// Hands the IP the user just submitted to the main loop, which spawns
    /// the actual request. `None` when nothing was submitted since the last
    /// call.
    pub fn take_pending_lookup(&mut self) -> Option<String> {
        self.pending_lookup.take()
    }

    /// Outcome of the startup own-location fetch. A failed fetch is simply
    /// an absent record; the UI carries on without a "you" marker.
    pub fn apply_my_location(&mut self, record: Option<IpRecord>) {
        self.initial_loading = false;
        self.user = record;
    }

    /// Outcome of a submitted lookup. Success appends the record to the
    /// target list and selects it; failure surfaces a short message and
    /// leaves everything else untouched.
    pub fn apply_lookup(&mut self, result: Result<IpRecord, LookupError>) {
        self.lookup_in_flight = false;
        match result {
            Ok(record) => {
                // The API canonicalizes the address it echoes back, so a
                // non-canonical spelling of a tracked IP is caught here
                // rather than at submit time.
                if self.is_tracked(&record.ip) {
                    self.error = Some(format!("{} is already tracked", record.ip));
                    return;
                }
                self.error = None;
                self.input.clear();
                self.targets.push(record);
                self.selected_index = self.targets.len() - 1;
            }
            Err(err) => self.error = Some(err.user_message().to_string()),
        }
    }

    /// The target the details card and the connecting line point at.
    pub fn selected_target(&self) -> Option<&IpRecord> {
        self.targets.get(self.selected_index)
    }

    fn submit_input(&mut self) {
        let ip = self.input.trim().to_string();
        if ip.is_empty() {
            return;
        }
        // One outstanding request at a time; further submits are dropped
        // until the current one settles.
        if self.lookup_in_flight {
            return;
        }
        if self.is_tracked(&ip) {
            self.error = Some(format!("{ip} is already tracked"));
            return;
        }
        self.error = None;
        self.lookup_in_flight = true;
        self.pending_lookup = Some(ip);
    }

    fn is_tracked(&self, ip: &str) -> bool {
        self.targets.iter().any(|t| t.ip == ip)
    }

    fn select_next(&mut self) {
        if !self.targets.is_empty() {
            self.selected_index = (self.selected_index + 1) % self.targets.len();
        }
    }

    fn select_previous(&mut self) {
        if !self.targets.is_empty() {
            self.selected_index = self
                .selected_index
                .checked_sub(1)
                .unwrap_or(self.targets.len() - 1);
        }
    }

    fn move_selected_down(&mut self) {
        if self.selected_index + 1 < self.targets.len() {
            self.targets.swap(self.selected_index, self.selected_index + 1);
            self.selected_index += 1;
        }
    }

    fn move_selected_up(&mut self) {
        if self.selected_index > 0 && self.selected_index < self.targets.len() {
            self.targets.swap(self.selected_index, self.selected_index - 1);
            self.selected_index -= 1;
        }
    }

    fn remove_selected(&mut self) {
        if self.selected_index < self.targets.len() {
            self.targets.remove(self.selected_index);
        }
        self.selected_index = self.selected_index.min(self.targets.len().saturating_sub(1));
    }

    fn clear_targets(&mut self) {
        self.targets.clear();
        self.selected_index = 0;
        self.error = None;
    }
}
