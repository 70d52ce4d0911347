// src/cli.rs
use clap::{Parser, Subcommand};
use log;
use rpassword;
use salon_booking::config::Config;
use salon_booking::error::{AppError, AppResult};
use salon_booking::models::{NewAppointment, NewUser};
use salon_booking::validation;
use salon_booking::SalonContext;
use std::io::{self, Write};
use std::path::PathBuf;

/// Book salon appointments from the terminal.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = false)] // no subcommand opens the TUI
pub struct Cli {
    /// Directory holding the stored records (overrides the config file)
    #[clap(long, global = true, value_parser)]
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory; nothing survives the process
    #[clap(long, global = true)]
    pub in_memory: bool,
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BookingArgs {
    /// Day of the appointment, as shown on the calendar
    #[clap(long)]
    pub date: String,
    /// Time slot, HH:MM
    #[clap(long)]
    pub time: String,
    #[clap(long)]
    pub specialist: String,
    /// Service name (defaults to the configured service)
    #[clap(long)]
    pub service: Option<String>,
    /// Display price, e.g. "R$42,50"
    #[clap(long)]
    pub price: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account and log in
    Register {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        phone: String,
        /// Prompted for when omitted
        #[clap(long)]
        password: Option<String>,
        /// Accept the terms of use
        #[clap(long)]
        accept_terms: bool,
    },
    /// Log in with email and password
    Login {
        #[clap(long)]
        email: String,
        /// Prompted for when omitted
        #[clap(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Schedule an appointment
    Book(BookingArgs),
    /// Schedule an appointment through the payment screen
    Pay(BookingArgs),
    /// List your appointments with totals
    History,
    /// Cancel one of your appointments
    Cancel { id: String },
    /// Show or update notifications
    Notifications {
        #[clap(subcommand)]
        action: Option<NotificationAction>,
    },
    /// Show or set the dark mode preference
    DarkMode {
        #[clap(value_enum)]
        state: Option<Toggle>,
    },
    /// List registered users
    Users,
    /// Delete all stored data
    Reset {
        /// Skip the confirmation prompt
        #[clap(long)]
        yes: bool,
    },
    /// Launch the Terminal User Interface (TUI)
    Tui,
}

#[derive(Subcommand, Debug)]
pub enum NotificationAction {
    List,
    /// Mark one notification as read
    Read { id: String },
    /// Mark every notification as read
    ReadAll,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

fn require_session(ctx: &SalonContext) -> AppResult<()> {
    if ctx.users.is_logged_in() {
        Ok(())
    } else {
        log::warn!("Command needs a session but nobody is logged in");
        Err(AppError::NotLoggedIn)
    }
}

fn prompt_password(prompt: &str) -> AppResult<String> {
    rpassword::prompt_password(prompt).map_err(|e| {
        log::error!("Failed to read password: {}", e);
        AppError::Cli(format!("Failed to read password: {}", e))
    })
}

fn confirm(question: &str) -> AppResult<bool> {
    print!("{} (y/N): ", question);
    io::stdout().flush().map_err(|e| {
        log::error!("Failed to flush stdout for confirmation: {}", e);
        AppError::Cli(format!("Failed to flush stdout: {}", e))
    })?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(|e| {
        log::error!("Failed to read confirmation: {}", e);
        AppError::Cli(format!("Failed to read confirmation: {}", e))
    })?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Checks registration input in the order the sign-up form reports problems.
pub fn validate_registration(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    confirmation: &str,
    accept_terms: bool,
) -> AppResult<()> {
    let fail = |msg: &str| Err(AppError::Validation(msg.to_string()));
    if name.is_empty() || email.is_empty() || phone.is_empty() || password.is_empty() {
        return fail("Please fill in all fields");
    }
    if !validation::is_valid_name(name) {
        return fail("Name must have at least 2 characters");
    }
    if !validation::is_valid_email(email) {
        return fail("Please enter a valid email");
    }
    if !validation::is_valid_phone(phone) {
        return fail("Please enter a valid phone number");
    }
    if !validation::is_valid_password(password) {
        return fail("Password must have at least 6 characters");
    }
    if password != confirmation {
        return fail("Passwords do not match");
    }
    if !accept_terms {
        return fail("You must accept the terms to continue");
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation("Please fill in all fields".to_string()));
    }
    if !validation::is_valid_email(email) {
        return Err(AppError::Validation("Please enter a valid email".to_string()));
    }
    Ok(())
}

/// Turns booking flags into an appointment, filling gaps from the config.
pub fn booking_from_args(args: BookingArgs, config: &Config, price_required: bool) -> AppResult<NewAppointment> {
    let date = args.date.trim().to_string();
    let specialist = args.specialist.trim().to_string();
    if date.is_empty() || specialist.is_empty() {
        return Err(AppError::Validation("Select a date, a time and a specialist".to_string()));
    }
    if !validation::is_valid_time_slot(args.time.trim()) {
        return Err(AppError::Validation(format!("Invalid time slot {:?}, expected HH:MM", args.time)));
    }
    let price = match args.price {
        Some(price) if !price.trim().is_empty() => price.trim().to_string(),
        _ if price_required => return Err(AppError::Validation("A price is required".to_string())),
        _ => config.default_price.clone(),
    };
    Ok(NewAppointment {
        date,
        time: args.time.trim().to_string(),
        specialist,
        service: args.service.unwrap_or_else(|| config.default_service.clone()),
        price,
    })
}

/// Handles the parsed CLI command.
/// Returns `Ok(true)` if the TUI should run, `Ok(false)` if a CLI command was handled.
pub fn handle_cli_command(command: Option<Commands>, ctx: &mut SalonContext, config: &Config) -> AppResult<bool> {
    log::debug!("Handling CLI command: {:?}", command);
    match command {
        Some(Commands::Register { name, email, phone, password, accept_terms }) => {
            let name = name.trim().to_string();
            let email = email.trim().to_string();
            let phone = validation::format_phone(phone.trim());
            let (password, confirmation) = match password {
                Some(password) => (password.clone(), password),
                None => (
                    prompt_password("Choose a password: ")?,
                    prompt_password("Confirm password: ")?,
                ),
            };
            validate_registration(&name, &email, &phone, &password, &confirmation, accept_terms)?;

            let user = ctx.users.register(NewUser { name, email, phone, password: password.clone() })?;
            println!("Registration successful! Welcome, {}.", user.name);
            ctx.users.login(&user.email, &password)?;
            log::info!("New user {} logged in after registration", user.id);
            Ok(false)
        }
        Some(Commands::Login { email, password }) => {
            let email = email.trim().to_string();
            let password = match password {
                Some(password) => password,
                None => prompt_password("Password: ")?,
            };
            validate_login(&email, &password)?;
            let user = ctx.users.login(&email, &password)?;
            println!("Login successful! Hello, {}.", user.name);
            Ok(false)
        }
        Some(Commands::Logout) => {
            require_session(ctx)?;
            ctx.users.logout();
            println!("Logged out.");
            Ok(false)
        }
        Some(Commands::Whoami) => {
            require_session(ctx)?;
            if let Some(user) = ctx.users.current_user() {
                println!("{} <{}> {}", user.name, user.email, user.phone);
            }
            Ok(false)
        }
        Some(Commands::Book(args)) => {
            require_session(ctx)?;
            let appointment = ctx.book(booking_from_args(args, config, true)?)?;
            println!(
                "Appointment booked: {} at {} with {} ({}) [{}]",
                appointment.date, appointment.time, appointment.specialist, appointment.price, appointment.id
            );
            Ok(false)
        }
        Some(Commands::Pay(args)) => {
            require_session(ctx)?;
            let appointment = ctx.pay(booking_from_args(args, config, false)?)?;
            println!("Payment successful! Appointment {} confirmed ({}).", appointment.id, appointment.price);
            Ok(false)
        }
        Some(Commands::History) => {
            let (appointments, stats) = ctx.history()?;
            if appointments.is_empty() {
                println!("No appointments yet.");
            } else {
                for appointment in &appointments {
                    println!(
                        "  - [{}] {} at {} | {} with {} | {} | {}",
                        appointment.id,
                        appointment.date,
                        appointment.time,
                        appointment.service,
                        appointment.specialist,
                        appointment.price,
                        appointment.status
                    );
                }
            }
            println!(
                "Total: {} | Spent: R$ {:.2} | Scheduled: {}",
                stats.total, stats.spent, stats.scheduled
            );
            Ok(false)
        }
        Some(Commands::Cancel { id }) => {
            require_session(ctx)?;
            let owned = ctx
                .appointments
                .get(&id)
                .map(|a| a.user_id.as_deref() == ctx.users.current_user().map(|u| u.id.as_str()))
                .unwrap_or(false);
            if !owned {
                log::warn!("Cancel refused for appointment {} not owned by the session user", id);
                return Err(AppError::Cli(format!("No appointment {} in your history", id)));
            }
            ctx.appointments.cancel(&id);
            println!("Appointment {} cancelled.", id);
            Ok(false)
        }
        Some(Commands::Notifications { action }) => {
            require_session(ctx)?;
            match action.unwrap_or(NotificationAction::List) {
                NotificationAction::List => {
                    let feed = &ctx.notifications;
                    println!("Notifications ({} unread):", feed.unread_count());
                    for n in feed.notifications() {
                        let marker = if n.read { " " } else { "*" };
                        println!("{} [{}] {} - {} ({})", marker, n.id, n.title, n.message, n.time);
                    }
                }
                NotificationAction::Read { id } => {
                    if ctx.notifications.mark_as_read(&id) {
                        println!("Notification {} marked as read.", id);
                    } else {
                        println!("No notification {}.", id);
                    }
                }
                NotificationAction::ReadAll => {
                    ctx.notifications.mark_all_as_read();
                    println!("All notifications marked as read.");
                }
            }
            Ok(false)
        }
        Some(Commands::DarkMode { state }) => {
            match state {
                Some(toggle) => {
                    let enabled = toggle == Toggle::On;
                    if !ctx.preferences.set_dark_mode(enabled) {
                        return Err(AppError::Cli("Could not save the preference".to_string()));
                    }
                    println!("Dark mode {}.", if enabled { "enabled" } else { "disabled" });
                }
                None => println!("Dark mode is {}.", if ctx.preferences.dark_mode() { "on" } else { "off" }),
            }
            Ok(false)
        }
        Some(Commands::Users) => {
            for user in ctx.users.users() {
                println!("  - {} <{}> joined {}", user.name, user.email, user.created_at.format("%Y-%m-%d"));
            }
            log::info!("Listed {} users.", ctx.users.users().len());
            Ok(false)
        }
        Some(Commands::Reset { yes }) => {
            if !yes && !confirm("Delete all users, appointments and notifications?")? {
                println!("Reset cancelled.");
                log::info!("Reset cancelled by user.");
                return Ok(false);
            }
            if !ctx.reset() {
                return Err(AppError::Cli("Some data could not be removed".to_string()));
            }
            println!("All data removed.");
            Ok(false)
        }
        Some(Commands::Tui) => {
            log::info!("'tui' command given, preparing to launch TUI.");
            Ok(true)
        }
        None => {
            log::info!("No CLI command given, preparing to launch TUI by default.");
            Ok(true)
        }
    }
}
