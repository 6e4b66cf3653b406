//! Command-line arguments.

use clap::{Args, Parser, Subcommand};

use ayni_core::{ContactForm, Role};

#[derive(Parser, Debug)]
#[command(name = "ayni", version, about = "Ayni Abogados client portal")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign in (password from AYNI_PASSWORD or prompt)
    Login {
        /// Account type: lawyer (abogado) or client (cliente)
        role: Role,

        /// Defaults to AYNI_EMAIL, then the last email used for this role
        email: Option<String>,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the signed-in user, if any
    #[command(name = "whoami")]
    WhoAmI,

    /// Create a client account and sign in
    Register {
        email: String,

        /// Full name; several words are joined with spaces
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Validate one or more RUTs
    Rut {
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Validate a contact request and print its links
    Contact(ContactArgs),

    /// List the demo accounts
    Users,
}

/// Contact form fields. Blank fields are left for the form to reject.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    /// Practice area, e.g. "Derecho Laboral"
    #[arg(long, default_value = "")]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub message: String,
}

impl From<ContactArgs> for ContactForm {
    fn from(args: ContactArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            subject: args.subject,
            message: args.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Command, ErrorKind> {
        Cli::try_parse_from(std::iter::once("ayni").chain(args.iter().copied()))
            .map(|cli| cli.command)
            .map_err(|e| e.kind())
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_shows_help() {
        assert_eq!(
            parse(&[]),
            Err(ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand)
        );
    }

    #[test]
    fn test_login() {
        assert_eq!(
            parse(&["login", "abogado", "juan.perez@ayniabogados.cl"]),
            Ok(Command::Login {
                role: Role::Lawyer,
                email: Some("juan.perez@ayniabogados.cl".to_string()),
            })
        );
        assert_eq!(
            parse(&["login", "client"]),
            Ok(Command::Login { role: Role::Client, email: None })
        );
        assert_eq!(parse(&["login"]), Err(ErrorKind::MissingRequiredArgument));
        assert_eq!(parse(&["login", "admin"]), Err(ErrorKind::ValueValidation));
        assert_eq!(parse(&["login", "client", "a", "b"]), Err(ErrorKind::UnknownArgument));
    }

    #[test]
    fn test_login_help_is_not_a_role() {
        assert_eq!(parse(&["login", "--help"]), Err(ErrorKind::DisplayHelp));
    }

    #[test]
    fn test_register_collects_name() {
        assert_eq!(
            parse(&["register", "rosa@example.com", "Rosa", "Díaz"]),
            Ok(Command::Register {
                email: "rosa@example.com".to_string(),
                name: vec!["Rosa".to_string(), "Díaz".to_string()],
            })
        );
        assert!(parse(&["register", "rosa@example.com"]).is_err());
        assert!(parse(&["register"]).is_err());
    }

    #[test]
    fn test_rut() {
        assert_eq!(
            parse(&["rut", "12.345.678-5", "6-k"]),
            Ok(Command::Rut {
                inputs: vec!["12.345.678-5".to_string(), "6-k".to_string()],
            })
        );
        assert!(parse(&["rut"]).is_err());
    }

    #[test]
    fn test_contact_flags() {
        let parsed = parse(&[
            "contact",
            "--name=Ana",
            "--email",
            "ana@example.com",
            "--subject",
            "Derecho Penal",
            "--message",
            "Necesito ayuda urgente",
        ]);
        let Ok(Command::Contact(args)) = parsed else {
            panic!("expected contact command, got {:?}", parsed);
        };
        let form = ContactForm::from(args);
        assert_eq!(form.name, "Ana");
        assert_eq!(form.subject, "Derecho Penal");
        assert!(form.phone.is_empty());

        assert!(parse(&["contact", "--name"]).is_err());
        assert_eq!(parse(&["contact", "--age", "3"]), Err(ErrorKind::UnknownArgument));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse(&["dance"]), Err(ErrorKind::InvalidSubcommand));
        assert_eq!(parse(&["--help"]), Err(ErrorKind::DisplayHelp));
    }
}
