//! Contact form handling.
//!
//! There is no backend to post the form to. A valid form is turned into a
//! `mailto:` link and a WhatsApp chat link that the visitor opens
//! themselves.
//!
//! - `form`: the form fields, validation and the e-mail summary
//! - `links`: `mailto:` and WhatsApp deep links
//! - `format`: phone number display

pub mod form;
pub mod format;
pub mod links;

pub use form::{ContactForm, ContactSubmission, MIN_MESSAGE_LENGTH, MIN_NAME_LENGTH};
pub use format::format_phone;
pub use links::{mailto_link, whatsapp_link};
