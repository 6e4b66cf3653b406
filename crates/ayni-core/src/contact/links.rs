use super::form::{ContactForm, ContactSubmission};
use super::format::phone_digits;

/// Build a `mailto:` link addressed to the firm, carrying the same subject
/// and body as `ContactForm::submit`, percent-encoded.
pub fn mailto_link(to: &str, form: &ContactForm) -> String {
    let submission = ContactSubmission::from_form(form);
    format!(
        "mailto:{}?subject={}&body={}",
        to,
        urlencoding::encode(&submission.subject),
        urlencoding::encode(&submission.body),
    )
}

/// Build a WhatsApp chat link to `number` with the form as the prefilled text.
/// Everything but digits is stripped from the number.
pub fn whatsapp_link(number: &str, form: &ContactForm) -> String {
    let text = format!(
        "Hola, soy {}. Consulta sobre {}: {}",
        form.name.trim(),
        form.subject.trim(),
        form.message.trim(),
    );
    format!(
        "https://wa.me/{}?text={}",
        phone_digits(number),
        urlencoding::encode(&text),
    )
}
