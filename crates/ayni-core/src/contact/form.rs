use serde::{Deserialize, Serialize};

use crate::auth::validate_email;
use crate::error::ContactError;

/// Minimum characters in the sender's name, after trimming.
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum characters in the message body, after trimming.
pub const MIN_MESSAGE_LENGTH: usize = 10;

/// A contact form as filled in by a visitor.
///
/// `subject` is the practice area picked from the form's select; an empty
/// string means nothing was picked. `phone` is optional and never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check the fields in form order and report the first failure.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().chars().count() < MIN_NAME_LENGTH {
            return Err(ContactError::NameTooShort(MIN_NAME_LENGTH));
        }

        if !validate_email(&self.email) {
            return Err(ContactError::InvalidEmail);
        }

        if self.subject.trim().is_empty() {
            return Err(ContactError::MissingSubject);
        }

        if self.message.trim().chars().count() < MIN_MESSAGE_LENGTH {
            return Err(ContactError::MessageTooShort(MIN_MESSAGE_LENGTH));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and build the message the firm receives.
    pub fn submit(&self) -> Result<ContactSubmission, ContactError> {
        self.validate()?;
        Ok(ContactSubmission::from_form(self))
    }
}

/// The e-mail a validated form turns into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl ContactSubmission {
    pub(crate) fn from_form(form: &ContactForm) -> Self {
        let phone = if form.phone.trim().is_empty() {
            "-"
        } else {
            form.phone.trim()
        };

        let body = format!(
            "Nombre: {}\nEmail: {}\nTeléfono: {}\nÁrea: {}\n\nMensaje:\n{}",
            form.name.trim(),
            form.email.trim(),
            phone,
            form.subject.trim(),
            form.message.trim(),
        );

        Self {
            from: form.email.trim().to_string(),
            subject: format!("Nueva consulta - {}", form.subject.trim()),
            body,
        }
    }
}
