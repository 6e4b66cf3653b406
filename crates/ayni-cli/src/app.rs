//! Application state for the `ayni` command-line front-end.
//!
//! `App` owns the loaded configuration and the authenticator (and through it
//! the session snapshot on disk). Each command is one method; output goes to
//! stdout, diagnostics go through `tracing`. Nothing here is fatal: an
//! unreadable config or data directory degrades to defaults and an
//! in-memory session.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use ayni_core::auth::MIN_PASSWORD_LENGTH;
use ayni_core::contact::{format_phone, mailto_link, whatsapp_link};
use ayni_core::rut::{format_rut, is_valid_rut};
use ayni_core::{
    Authenticator, Config, ContactForm, FileStore, KeyValueStore, MemoryStore, NewClient,
    Profile, Role, RoleDetails,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
/// RFC 5321 caps a forward path at 254 characters.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Shown for every failed login, whatever the cause.
const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Main application state container
pub struct App {
    pub config: Config,
    pub auth: Authenticator,
    /// Where `config` is written back after a login. `None` leaves the
    /// file on disk alone.
    config_file: Option<PathBuf>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Self {
        debug!("App::new() starting");
        let (config, config_file) = match Config::config_path() {
            Ok(path) => load_config(path),
            Err(e) => {
                warn!(error = %e, "No config directory, using defaults");
                (Config::default(), None)
            }
        };

        let mut auth = Authenticator::seeded(open_store(&config));
        let restored = auth.restore_session();
        debug!(restored, "Session checked");

        Self::with_parts(config, auth, config_file)
    }

    pub fn with_parts(config: Config, auth: Authenticator, config_file: Option<PathBuf>) -> Self {
        Self {
            config,
            auth,
            config_file,
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Sign in. Returns false (after telling the user) on bad credentials.
    pub async fn login(&mut self, role: Role, email: Option<String>) -> Result<bool> {
        let email = match email
            .or_else(|| std::env::var("AYNI_EMAIL").ok())
            .or_else(|| self.remembered_email(role))
        {
            Some(email) => email,
            None => prompt_line("Email: ")?,
        };
        let password = match std::env::var("AYNI_PASSWORD") {
            Ok(p) => p,
            Err(_) => rpassword::prompt_password("Password: ")?,
        };

        let (Some(email), Some(password)) = (
            sanitize_input(email.trim(), MAX_EMAIL_LENGTH),
            sanitize_input(&password, MAX_PASSWORD_LENGTH),
        ) else {
            println!("{}", INVALID_CREDENTIALS_MESSAGE);
            return Ok(false);
        };

        Ok(self.sign_in(role, email, password).await)
    }

    /// Run the simulated login round trip and print the outcome.
    async fn sign_in(&mut self, role: Role, email: String, password: String) -> bool {
        println!("Signing in...");
        tokio::time::sleep(self.config.login_delay()).await;

        match self.auth.authenticate(&email, &password, role) {
            Some(profile) => {
                println!("¡Bienvenido, {}!", profile.display_name);
                println!();
                for line in dashboard_lines(&profile, role) {
                    println!("{}", line);
                }

                self.config.last_email = Some(email);
                self.config.last_role = Some(role);
                self.save_config();
                true
            }
            None => {
                println!("{}", INVALID_CREDENTIALS_MESSAGE);
                false
            }
        }
    }

    fn save_config(&self) {
        let Some(path) = &self.config_file else {
            debug!("Config file not writable this run, skipping save");
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, "Failed to save config");
        }
    }

    /// The last email used, if it was used for the same role.
    fn remembered_email(&self, role: Role) -> Option<String> {
        match self.config.last_role {
            Some(last) if last == role => self.config.last_email.clone(),
            _ => None,
        }
    }

    pub fn logout(&mut self) {
        let was_signed_in = self.auth.is_authenticated();
        self.auth.logout();
        if was_signed_in {
            println!("Signed out.");
        } else {
            println!("Not signed in.");
        }
    }

    pub fn whoami(&self) {
        match (self.auth.current_user(), self.auth.user_type()) {
            (Some(profile), Some(role)) => {
                println!("{}", greeting(Some(profile)));
                println!("{} <{}> ({})", profile.display_name, profile.email, role);
                if let Some(data) = self.auth.session_data() {
                    println!("{}", expiry_line(data.time_until_expiry_at(Utc::now())));
                }
            }
            _ => println!("{}", greeting(None)),
        }
    }

    /// Register a client account, then sign it in.
    pub async fn register(&mut self, email: String, name: String) -> Result<bool> {
        let password = match std::env::var("AYNI_PASSWORD") {
            Ok(p) => p,
            Err(_) => {
                let first = rpassword::prompt_password(format!(
                    "Password (min {} characters): ",
                    MIN_PASSWORD_LENGTH
                ))?;
                let confirm = rpassword::prompt_password("Confirm password: ")?;
                if first != confirm {
                    println!("Passwords do not match");
                    return Ok(false);
                }
                first
            }
        };

        Ok(self.register_with_password(email, name, password).await)
    }

    async fn register_with_password(
        &mut self,
        email: String,
        name: String,
        password: String,
    ) -> bool {
        let new = NewClient {
            email: email.clone(),
            password: password.clone(),
            name,
        };
        if let Err(e) = self.auth.register_client(new) {
            println!("{}", e);
            return false;
        }
        info!("Client account created");
        println!("Account created for {}", email);

        self.sign_in(Role::Client, email, password).await
    }

    // =========================================================================
    // Tools
    // =========================================================================

    /// Print one line per RUT. Returns true if all of them are valid.
    pub fn check_ruts(&self, inputs: &[String]) -> bool {
        let mut all_valid = true;
        for input in inputs {
            if is_valid_rut(input) {
                let canonical = format_rut(input).unwrap_or_else(|| input.clone());
                println!("{:<16} valid   {}", input, canonical);
            } else {
                all_valid = false;
                println!("{:<16} invalid", input);
            }
        }
        all_valid
    }

    /// Validate a contact request and print the links that deliver it.
    pub async fn contact(&self, form: ContactForm) -> bool {
        let submission = match form.submit() {
            Ok(s) => s,
            Err(e) => {
                println!("{}", e);
                return false;
            }
        };

        println!("Sending...");
        tokio::time::sleep(self.config.submit_delay()).await;
        info!(
            from = %submission.from,
            subject = %submission.subject,
            "Contact request prepared"
        );

        println!("¡Gracias por contactarnos! Nos pondremos en contacto contigo pronto.");
        println!();
        for line in self.contact_links(&form) {
            println!("{}", line);
        }
        true
    }

    /// The e-mail and WhatsApp links for a validated form, labelled.
    fn contact_links(&self, form: &ContactForm) -> [String; 2] {
        [
            format!("Email:    {}", mailto_link(&self.config.contact_email, form)),
            format!("WhatsApp: {}", whatsapp_link(&self.config.whatsapp_number, form)),
        ]
    }

    pub fn list_users(&self) {
        for role in [Role::Lawyer, Role::Client] {
            println!("{}:", role);
            for user in self.auth.directory().users(role) {
                println!("  {:<34} {}", user.profile.email, user.password);
            }
        }
        println!();
        println!(
            "Firm: {}  WhatsApp {}",
            self.config.contact_email,
            format_phone(&self.config.whatsapp_number)
        );
    }
}

// ============================================================================
// Startup helpers
// ============================================================================

/// Load the config file at `path`. The path is kept for saving only when the
/// file was absent or parsed; a broken file is never overwritten.
fn load_config(path: PathBuf) -> (Config, Option<PathBuf>) {
    match Config::load_from(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            (Config::default(), None)
        }
    }
}

/// Open the session store in the data directory, falling back to memory
/// (no session across runs) when the directory cannot be used.
fn open_store(config: &Config) -> Box<dyn KeyValueStore> {
    let opened = config.data_dir().and_then(|dir| {
        debug!(data_dir = %dir.display(), "Data directory configured");
        FileStore::new(dir)
    });
    match opened {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "Data directory unavailable, session will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

// ============================================================================
// Display helpers
// ============================================================================

/// Navbar-style greeting: "Hola, Juan" when signed in.
pub fn greeting(profile: Option<&Profile>) -> String {
    match profile {
        Some(p) => format!("Hola, {}", p.first_name()),
        None => "Not signed in".to_string(),
    }
}

/// "Session expires in 5h 12m"; never negative.
fn expiry_line(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    format!("Session expires in {}h {}m", minutes / 60, minutes % 60)
}

/// Summary shown right after sign-in.
pub fn dashboard_lines(profile: &Profile, role: Role) -> Vec<String> {
    let mut lines = vec![format!("{} dashboard", role)];
    match &profile.details {
        RoleDetails::Lawyer { title, specialty } => {
            lines.push(format!("  Role:      {}", title));
            lines.push(format!("  Specialty: {}", specialty));
        }
        RoleDetails::Client { cases } => {
            lines.push("  Your cases:".to_string());
            if cases.is_empty() {
                lines.push("  - No active cases".to_string());
            } else {
                lines.extend(cases.iter().map(|c| format!("  - {}", c)));
            }
        }
    }
    lines
}

// ============================================================================
// Input helpers
// ============================================================================

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Accept a typed value only if it is within `max_len` characters and holds
/// no control characters. The value is otherwise kept exactly as typed.
pub fn sanitize_input(input: &str, max_len: usize) -> Option<String> {
    if input.chars().count() > max_len || input.chars().any(|c| c.is_control()) {
        return None;
    }
    Some(input.to_string())
}

// ============================================================================
// Tests
// ============================================================================
