//! Decomposition of the composite contact field.
//!
//! Legacy rows carry mailing address and email in one string shaped like
//! `{"mailing_address:<addr>", "email:<mail>"}`.

/// Delimiter between the address and email parts.
const PART_DELIMITER: &str = "\", ";

/// Characters stripped from both parts.
const WRAPPER_CHARS: [char; 3] = ['{', '}', '"'];

const ADDRESS_PREFIX: &str = "mailing_address:";
const EMAIL_PREFIX: &str = "email:";

/// Mailing address and email extracted from a contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub mailing_address: String,
    pub email: String,
}

/// Split a composite contact value.
///
/// Returns `None` unless the value splits into exactly two parts.
pub fn parse_contact(raw: &str) -> Option<Contact> {
    let mut parts = raw.split(PART_DELIMITER);
    let (address, email) = match (parts.next(), parts.next(), parts.next()) {
        (Some(address), Some(email), None) => (address, email),
        _ => return None,
    };

    Some(Contact {
        mailing_address: strip(address, ADDRESS_PREFIX),
        email: strip(email, EMAIL_PREFIX),
    })
}

fn strip(part: &str, prefix: &str) -> String {
    part.replace(WRAPPER_CHARS, "").replace(prefix, "")
}
