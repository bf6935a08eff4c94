//! Messaging deep links.
//!
//! Call-to-action buttons open a WhatsApp chat with a prefilled message:
//! `https://wa.me/<digits>?text=<message>`. The phone number is reduced to its
//! digits and the message is percent-encoded with the same unreserved set as
//! JavaScript's `encodeURIComponent`, so links match what browsers produce.

/// Build a `wa.me` link for `phone` with `message` prefilled.
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if message.is_empty() {
        format!("https://wa.me/{digits}")
    } else {
        format!("https://wa.me/{digits}?text={}", encode_component(message))
    }
}

/// Percent-encode every byte outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
