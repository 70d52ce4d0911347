// src/tui.rs
use salon_booking::appointments::AppointmentStats;
use salon_booking::calendar::MonthCursor;
use salon_booking::config::Config;
use salon_booking::error::{AppError, AppResult, TuiError};
use salon_booking::models::{Appointment, AppointmentStatus, NewAppointment};
use salon_booking::validation;
use salon_booking::SalonContext;

use arboard; // For clipboard
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{stdout, Stdout};
use std::time::Duration;

const NUM_FORM_FIELDS: usize = 5; // Day, Time, Specialist, Service, Price
const FORM_LABELS: [&str; NUM_FORM_FIELDS] = ["Day:", "Time (HH:MM):", "Specialist:", "Service:", "Price:"];
const BASE_KEYS: &str = "(q) Quit | (Tab) View | (j/k) Nav | (d) Dark";

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum View {
    Appointments,
    Notifications,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum InputMode {
    Normal,
    Booking,
}

#[derive(Clone, Default)]
struct BookingForm {
    day: String,
    time: String,
    specialist: String,
    service: String,
    price: String,
}

pub struct App<'a> {
    ctx: &'a mut SalonContext,
    config: &'a Config,
    should_quit: bool,
    view: View,
    appointments: Vec<Appointment>,
    stats: AppointmentStats,
    appointment_list: ListState,
    notification_list: ListState,
    month: MonthCursor,
    dark_mode: bool,
    app_status: String,
    input_mode: InputMode,
    current_input_value: String,
    editing_field_index: usize,
    form: BookingForm,
}

impl<'a> App<'a> {
    /// Builds the screen state. Needs a logged-in user.
    pub fn new(ctx: &'a mut SalonContext, config: &'a Config) -> AppResult<Self> {
        let greeting = match ctx.users.current_user() {
            Some(user) => format!("Hello, {}!", user.name),
            None => return Err(AppError::NotLoggedIn),
        };
        let mut app = App {
            ctx,
            config,
            should_quit: false,
            view: View::Appointments,
            appointments: Vec::new(),
            stats: AppointmentStats::default(),
            appointment_list: ListState::default(),
            notification_list: ListState::default(),
            month: MonthCursor::current(),
            dark_mode: false,
            app_status: greeting,
            input_mode: InputMode::Normal,
            current_input_value: String::new(),
            editing_field_index: 0,
            form: BookingForm::default(),
        };
        app.dark_mode = app.ctx.preferences.dark_mode();
        app.refresh_history();
        if !app.ctx.notifications.notifications().is_empty() {
            app.notification_list.select(Some(0));
        }
        Ok(app)
    }

    fn refresh_history(&mut self) {
        match self.ctx.history() {
            Ok((appointments, stats)) => {
                self.appointments = appointments;
                self.stats = stats;
            }
            Err(e) => {
                log::warn!("Could not load appointment history: {}", e);
                self.appointments.clear();
                self.stats = AppointmentStats::default();
            }
        }
        let len = self.appointments.len();
        let selected = match self.appointment_list.selected() {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.appointment_list.select(selected);
    }

    fn selected_appointment(&self) -> Option<&Appointment> {
        self.appointment_list.selected().and_then(|idx| self.appointments.get(idx))
    }

    fn selected_notification_id(&self) -> Option<String> {
        self.notification_list
            .selected()
            .and_then(|idx| self.ctx.notifications.notifications().get(idx))
            .map(|n| n.id.clone())
    }

    fn copy_to_clipboard(&mut self, content: String, field_name: &str) {
        let result = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(content))
            .map_err(|e| TuiError::Clipboard(e.to_string()));
        match result {
            Ok(()) => {
                self.app_status = format!("{} copied to clipboard!", field_name);
                log::info!("Copied {} to clipboard.", field_name);
            }
            Err(err) => {
                self.app_status = format!("Error copying {}: {}", field_name, err);
                log::error!("Error setting clipboard text for {}: {}", field_name, err);
            }
        }
    }

    pub fn on_key(&mut self, key_event: KeyEvent) {
        log::debug!("Key event received: {:?}", key_event);
        match self.input_mode {
            InputMode::Normal => self.on_normal_key(key_event.code),
            InputMode::Booking => self.on_booking_key(key_event.code),
        }
    }

    fn on_normal_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.view = match self.view {
                    View::Appointments => View::Notifications,
                    View::Notifications => View::Appointments,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('<') => {
                self.month = self.month.previous();
                self.app_status = format!("Calendar: {}", self.month.label());
            }
            KeyCode::Char('>') => {
                self.month = self.month.next();
                self.app_status = format!("Calendar: {}", self.month.label());
            }
            KeyCode::Char('d') => {
                let enabled = !self.dark_mode;
                self.app_status = if self.ctx.preferences.set_dark_mode(enabled) {
                    self.dark_mode = enabled;
                    format!("Dark mode {}", if enabled { "enabled" } else { "disabled" })
                } else {
                    "Could not save the dark mode preference.".to_string()
                };
            }
            KeyCode::Char('n') if self.view == View::Appointments => {
                self.input_mode = InputMode::Booking;
                log::info!("Switched to InputMode::Booking");
                self.form = BookingForm {
                    service: self.config.default_service.clone(),
                    price: self.config.default_price.clone(),
                    ..BookingForm::default()
                };
                self.editing_field_index = 0;
                self.load_current_input_from_field();
                self.app_status = format!("Booking for {}... (Esc to cancel)", self.month.label());
            }
            KeyCode::Char('c') if self.view == View::Appointments => {
                let Some(appointment) = self.selected_appointment().cloned() else {
                    self.app_status = "No appointment selected to cancel.".to_string();
                    return;
                };
                if appointment.status == AppointmentStatus::Cancelled {
                    self.app_status = "Appointment is already cancelled.".to_string();
                    return;
                }
                self.ctx.appointments.cancel(&appointment.id);
                self.refresh_history();
                self.app_status = format!("Appointment with {} cancelled.", appointment.specialist);
            }
            KeyCode::Char('r') if self.view == View::Notifications => {
                match self.selected_notification_id() {
                    Some(id) => {
                        self.ctx.notifications.mark_as_read(&id);
                        self.app_status = "Notification marked as read.".to_string();
                    }
                    None => self.app_status = "No notification selected.".to_string(),
                }
            }
            KeyCode::Char('R') if self.view == View::Notifications => {
                self.ctx.notifications.mark_all_as_read();
                self.app_status = "All notifications marked as read.".to_string();
            }
            KeyCode::Char('y') => {
                let id = match self.view {
                    View::Appointments => self.selected_appointment().map(|a| a.id.clone()),
                    View::Notifications => self.selected_notification_id(),
                };
                match id {
                    Some(id) => self.copy_to_clipboard(id, "Id"),
                    None => self.app_status = "Nothing selected to copy.".to_string(),
                }
            }
            _ => {}
        }
    }

    fn on_booking_key(&mut self, key_code: KeyCode) {
        match key_code {
            KeyCode::Char(c) => {
                self.current_input_value.push(c);
            }
            KeyCode::Backspace => {
                self.current_input_value.pop();
            }
            KeyCode::Tab => {
                self.store_current_input_to_field();
                self.editing_field_index = (self.editing_field_index + 1) % NUM_FORM_FIELDS;
                self.load_current_input_from_field();
            }
            KeyCode::Enter => {
                self.store_current_input_to_field();
                if self.editing_field_index < NUM_FORM_FIELDS - 1 {
                    self.editing_field_index += 1;
                    self.load_current_input_from_field();
                    return;
                }
                match self.submit_booking() {
                    Ok(appointment) => {
                        self.input_mode = InputMode::Normal;
                        log::info!("Switched to InputMode::Normal after booking.");
                        self.reset_form();
                        self.refresh_history();
                        self.appointment_list.select(Some(self.appointments.len().saturating_sub(1)));
                        self.app_status = format!(
                            "Booked {} at {} with {}!",
                            appointment.date, appointment.time, appointment.specialist
                        );
                    }
                    Err((field, message)) => {
                        self.app_status = format!("{} (Esc to cancel, Tab to edit)", message);
                        self.editing_field_index = field;
                        self.load_current_input_from_field();
                    }
                }
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                log::info!("Switched to InputMode::Normal via Esc from booking form.");
                self.reset_form();
                self.app_status = "Booking cancelled.".to_string();
            }
            _ => {}
        }
    }

    /// Validates the form and books it. On failure returns the field to
    /// focus and the message to show.
    fn submit_booking(&mut self) -> Result<Appointment, (usize, String)> {
        let date = self
            .form
            .day
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(|day| self.month.select_day(day))
            .ok_or_else(|| (0, format!("Pick a day between 1 and {}.", self.month.days_in_month())))?;
        let time = self.form.time.trim().to_string();
        if !validation::is_valid_time_slot(&time) {
            return Err((1, "Time must be HH:MM.".to_string()));
        }
        let specialist = self.form.specialist.trim().to_string();
        if specialist.is_empty() {
            return Err((2, "Choose a specialist.".to_string()));
        }
        let service = match self.form.service.trim() {
            "" => self.config.default_service.clone(),
            service => service.to_string(),
        };
        let price = match self.form.price.trim() {
            "" => self.config.default_price.clone(),
            price => price.to_string(),
        };

        self.ctx
            .book(NewAppointment {
                date: date.format("%Y-%m-%d").to_string(),
                time,
                specialist,
                service,
                price,
            })
            .map_err(|e| {
                log::error!("Booking from TUI failed: {}", e);
                (0, e.to_string())
            })
    }

    fn store_current_input_to_field(&mut self) {
        let value = self.current_input_value.clone();
        match self.editing_field_index {
            0 => self.form.day = value,
            1 => self.form.time = value,
            2 => self.form.specialist = value,
            3 => self.form.service = value,
            4 => self.form.price = value,
            _ => {}
        }
    }

    fn load_current_input_from_field(&mut self) {
        self.current_input_value = self.form_field(self.editing_field_index).to_string();
    }

    fn form_field(&self, index: usize) -> &str {
        match index {
            0 => &self.form.day,
            1 => &self.form.time,
            2 => &self.form.specialist,
            3 => &self.form.service,
            4 => &self.form.price,
            _ => "",
        }
    }

    fn reset_form(&mut self) {
        self.form = BookingForm::default();
        self.current_input_value = String::new();
        self.editing_field_index = 0;
    }

    fn move_selection(&mut self, delta: i32) {
        let (len, state) = match self.view {
            View::Appointments => (self.appointments.len(), &mut self.appointment_list),
            View::Notifications => (
                self.ctx.notifications.notifications().len(),
                &mut self.notification_list,
            ),
        };
        if len == 0 {
            state.select(None);
            return;
        }
        let current = state.selected().unwrap_or(0) as i32;
        let new_index = (current + delta).clamp(0, len as i32 - 1);
        state.select(Some(new_index as usize));
    }
}

pub fn run_tui(ctx: &mut SalonContext, config: &Config) -> AppResult<()> {
    log::info!("Initializing TUI...");
    // Fail before touching the terminal when nobody is logged in.
    let mut app = App::new(ctx, config)?;

    enable_raw_mode().map_err(|e| { log::error!("Failed to enable raw mode: {}", e); TuiError::Io(e) })?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| { log::error!("Failed to setup terminal screen: {}", e); TuiError::Io(e) })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| { log::error!("Failed to create terminal: {}", e); TuiError::Io(e) })?;

    log::info!("Starting TUI application loop.");
    let res = run_app_loop(&mut terminal, &mut app);
    log::info!("TUI application loop finished.");

    disable_raw_mode().map_err(|e| { log::error!("Failed to disable raw mode: {}", e); TuiError::Io(e) })?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)
        .map_err(|e| { log::error!("Failed to restore terminal screen: {}", e); TuiError::Io(e) })?;

    res?;
    log::info!("TUI shutdown complete.");
    Ok(())
}

fn run_app_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<(), TuiError> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app)).map_err(|e| { log::error!("Terminal draw error: {}", e); TuiError::Io(e) })?;

        if event::poll(Duration::from_millis(100)).map_err(|e| { log::error!("Event poll error: {}", e); TuiError::Io(e) })? {
            if let Event::Key(key_event) = event::read().map_err(|e| { log::error!("Event read error: {}", e); TuiError::Io(e) })? {
                if key_event.kind == KeyEventKind::Press {
                    app.on_key(key_event);
                }
            }
        }
    }
    Ok(())
}

fn base_style(dark_mode: bool) -> Style {
    if dark_mode {
        Style::default().bg(Color::Black).fg(Color::White)
    } else {
        Style::default()
    }
}

fn field_line<'t>(label: &'t str, value: &'t str) -> Line<'t> {
    Line::from(vec![Span::styled(label, Style::default().bold()), Span::raw(value)])
}

fn draw_appointments(f: &mut Frame, app: &mut App, list_area: Rect, detail_area: Rect, style: Style) {
    let title = format!(
        "Appointments ({}) | Spent R$ {:.2} | Scheduled {}",
        app.stats.total, app.stats.spent, app.stats.scheduled
    );
    let block = Block::default().borders(Borders::ALL).title(title).style(style);

    if app.appointments.is_empty() {
        let text = Paragraph::new("No appointments yet. Press 'n' to book.")
            .block(block).alignment(Alignment::Center).wrap(Wrap { trim: true });
        f.render_widget(text, list_area);
    } else {
        let items: Vec<ListItem> = app.appointments.iter()
            .map(|a| {
                let line = format!("{} {} - {} [{}]", a.date, a.time, a.specialist, a.status);
                let item_style = if a.status == AppointmentStatus::Cancelled {
                    Style::default().add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(line, item_style))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Gray))
            .highlight_symbol("> ");
        f.render_stateful_widget(list, list_area, &mut app.appointment_list);
    }

    let details_block = Block::default().borders(Borders::ALL).title("Details").style(style);
    match app.selected_appointment() {
        Some(a) => {
            let status = a.status.to_string();
            let created = a.created_at.format("%Y-%m-%d %H:%M").to_string();
            let detail_text = vec![
                field_line("Service: ", &a.service),
                field_line("Specialist: ", &a.specialist),
                field_line("Date: ", &a.date),
                field_line("Time: ", &a.time),
                field_line("Price: ", &a.price),
                field_line("Status: ", &status),
                field_line("Booked: ", &created),
                field_line("Id: ", &a.id),
            ];
            let paragraph = Paragraph::new(detail_text).block(details_block).wrap(Wrap { trim: true });
            f.render_widget(paragraph, detail_area);
        }
        None => {
            let text = Paragraph::new("Select an appointment to see details.")
                .block(details_block).alignment(Alignment::Center);
            f.render_widget(text, detail_area);
        }
    }
}

fn draw_notifications(f: &mut Frame, app: &mut App, list_area: Rect, detail_area: Rect, style: Style) {
    let feed = &app.ctx.notifications;
    let title = format!("Notifications ({} unread)", feed.unread_count());
    let block = Block::default().borders(Borders::ALL).title(title).style(style);

    let items: Vec<ListItem> = feed.notifications().iter()
        .map(|n| {
            let item_style = if n.read { Style::default() } else { Style::default().bold() };
            ListItem::new(Span::styled(format!("{} ({})", n.title, n.time), item_style))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::Gray))
        .highlight_symbol("> ");
    f.render_stateful_widget(list, list_area, &mut app.notification_list);

    let details_block = Block::default().borders(Borders::ALL).title("Details").style(style);
    let selected = app.notification_list.selected().and_then(|idx| app.ctx.notifications.notifications().get(idx));
    match selected {
        Some(n) => {
            let read = if n.read { "yes" } else { "no" };
            let detail_text = vec![
                field_line("Title: ", &n.title),
                field_line("Message: ", &n.message),
                field_line("When: ", &n.time),
                field_line("Type: ", n.kind.as_str()),
                field_line("Read: ", read),
            ];
            let paragraph = Paragraph::new(detail_text).block(details_block).wrap(Wrap { trim: true });
            f.render_widget(paragraph, detail_area);
        }
        None => {
            let text = Paragraph::new("Select a notification to see details.")
                .block(details_block).alignment(Alignment::Center);
            f.render_widget(text, detail_area);
        }
    }
}

fn draw_main_ui(f: &mut Frame, app: &mut App) {
    let style = base_style(app.dark_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.size());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[0]);

    match app.view {
        View::Appointments => draw_appointments(f, app, main_chunks[0], main_chunks[1], style),
        View::Notifications => draw_notifications(f, app, main_chunks[0], main_chunks[1], style),
    }

    let status_text = if app.input_mode == InputMode::Normal {
        let view_keys = match app.view {
            View::Appointments => "(n) Book | (c) Cancel | (</>) Month | (y) Copy id",
            View::Notifications => "(r) Read | (R) Read all | (y) Copy id",
        };
        format!("{} | {} | {}", app.app_status, BASE_KEYS, view_keys)
    } else {
        app.app_status.clone()
    };
    let status_paragraph = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status_paragraph, chunks[1]);
}

fn draw_booking_form(f: &mut Frame, app: &App) {
    let form_area = centered_rect(60, 60, f.size());
    f.render_widget(Clear, form_area);

    let form_title = format!("Book an appointment - {}", app.month.label());
    let form_block = Block::default().title(form_title).borders(Borders::ALL);
    f.render_widget(form_block, form_area);

    let mut constraints = vec![Constraint::Length(3); NUM_FORM_FIELDS];
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(1));
    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(constraints)
        .split(form_area);

    for (i, label) in FORM_LABELS.iter().enumerate() {
        let text = if app.editing_field_index == i {
            format!("{}▋", app.current_input_value)
        } else {
            app.form_field(i).to_string()
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(*label))
            .style(if app.editing_field_index == i { Style::default().fg(Color::Yellow) } else { Style::default() });
        f.render_widget(paragraph, form_chunks[i]);
    }

    let help_text = "(Tab) Next | (Enter) Next/Book | (Esc) Cancel";
    let help_paragraph = Paragraph::new(help_text).alignment(Alignment::Center);
    f.render_widget(help_paragraph, form_chunks[NUM_FORM_FIELDS + 1]);
}

/// Renders the UI widgets based on the application mode.
fn ui(f: &mut Frame, app: &mut App) {
    draw_main_ui(f, app);
    if app.input_mode == InputMode::Booking {
        draw_booking_form(f, app);
    }
}

/// Helper to create a centered rect for popups.
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
    use super::*;
    use chrono::Month;
    use crossterm::event::KeyModifiers;
    use salon_booking::models::NewUser;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.on_key(key(KeyCode::Char(c)));
        }
    }

    fn logged_in_ctx() -> SalonContext {
        let mut ctx = SalonContext::in_memory();
        ctx.users
            .register(NewUser {
                name: "Ana".to_string(),
                email: "a@a.com".to_string(),
                phone: "(11) 99999-9999".to_string(),
                password: "abcdef".to_string(),
            })
            .unwrap();
        ctx.users.login("a@a.com", "abcdef").unwrap();
        ctx
    }

    #[test]
    fn test_app_requires_login() {
        let mut ctx = SalonContext::in_memory();
        let config = Config::default();
        assert!(matches!(App::new(&mut ctx, &config), Err(AppError::NotLoggedIn)));
    }

    #[test]
    fn test_booking_form_books_and_notifies() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();
        app.month = MonthCursor::new(2026, Month::March);

        app.on_key(key(KeyCode::Char('n')));
        assert_eq!(app.input_mode, InputMode::Booking);
        type_text(&mut app, "12");
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "15:00");
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "Mary Jane");
        app.on_key(key(KeyCode::Enter)); // service keeps the default
        app.on_key(key(KeyCode::Enter)); // price keeps the default

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.appointments.len(), 1);
        assert_eq!(app.appointments[0].date, "2026-03-12");
        assert_eq!(app.appointments[0].service, config.default_service);
        assert_eq!(app.stats.scheduled, 1);
        assert_eq!(app.ctx.notifications.notifications()[0].title, "Appointment confirmed!");
    }

    #[test]
    fn test_booking_form_rejects_day_outside_month() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();
        app.month = MonthCursor::new(2026, Month::February);

        app.on_key(key(KeyCode::Char('n')));
        type_text(&mut app, "30");
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "10:00");
        app.on_key(key(KeyCode::Enter));
        type_text(&mut app, "John Doe");
        for _ in 0..3 {
            app.on_key(key(KeyCode::Enter));
        }

        assert_eq!(app.input_mode, InputMode::Booking);
        assert_eq!(app.editing_field_index, 0);
        assert!(app.app_status.contains("between 1 and 28"));
        assert!(app.appointments.is_empty());
    }

    #[test]
    fn test_escape_discards_form() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();
        app.on_key(key(KeyCode::Char('n')));
        type_text(&mut app, "5");
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.appointments.is_empty());
        assert!(app.current_input_value.is_empty());
    }

    #[test]
    fn test_cancel_selected_appointment() {
        let mut ctx = logged_in_ctx();
        ctx.book(NewAppointment {
            date: "2".to_string(),
            time: "14:00".to_string(),
            specialist: "John Doe".to_string(),
            service: "Hair wash".to_string(),
            price: "R$42,5".to_string(),
        })
        .unwrap();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();

        app.on_key(key(KeyCode::Char('c')));
        assert_eq!(app.appointments[0].status, AppointmentStatus::Cancelled);
        assert_eq!(app.stats.scheduled, 0);
    }

    #[test]
    fn test_notification_keys() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();

        app.on_key(key(KeyCode::Tab));
        assert_eq!(app.view, View::Notifications);
        app.on_key(key(KeyCode::Char('j')));
        app.on_key(key(KeyCode::Char('r')));
        assert!(app.ctx.notifications.notifications()[1].read);
        assert!(!app.ctx.notifications.notifications()[0].read);

        app.on_key(key(KeyCode::Char('R')));
        assert_eq!(app.ctx.notifications.unread_count(), 0);
    }

    #[test]
    fn test_month_cycling_and_dark_mode() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();
        app.month = MonthCursor::new(2026, Month::December);

        app.on_key(key(KeyCode::Char('>')));
        assert_eq!(app.month, MonthCursor::new(2027, Month::January));
        app.on_key(key(KeyCode::Char('<')));
        assert_eq!(app.month, MonthCursor::new(2026, Month::December));

        app.on_key(key(KeyCode::Char('d')));
        assert!(app.ctx.preferences.dark_mode());
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut ctx = logged_in_ctx();
        let config = Config::default();
        let mut app = App::new(&mut ctx, &config).unwrap();
        app.view = View::Notifications;
        for _ in 0..10 {
            app.on_key(key(KeyCode::Down));
        }
        assert_eq!(app.notification_list.selected(), Some(3));
        for _ in 0..10 {
            app.on_key(key(KeyCode::Up));
        }
        assert_eq!(app.notification_list.selected(), Some(0));
    }
}
