//! The dial action.
//!
//! Dialing is fire-and-forget: the resolver hands the facility's number to
//! the platform and receives no feedback about whether the call connected.

/// Something that can start a phone call.
pub trait Dialer: Send + Sync {
    /// Start a call to `phone`. Never blocks on the call itself.
    fn dial(&self, phone: &str);
}

/// A dialer that only records the intent in the log.
///
/// On a server there is no handset; the client receives the `tel:` URI
/// and dials locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDialer;

impl Dialer for TracingDialer {
    fn dial(&self, phone: &str) {
        tracing::info!(uri = %tel_uri(phone), "Dial requested");
    }
}

/// `tel:` URI for a phone number, with whitespace stripped.
pub fn tel_uri(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    format!("tel:{digits}")
}
