//! Entity encoding of the five XML special characters
//!
//! Helpers for message strings that carry markup. SOAP arguments are escaped
//! by the client itself, not here. Both directions work in a single
//! left-to-right pass, so `&amp;lt;` decodes to `&lt;` and not further.

use crate::error::{Error, Result};

const ENTITIES: [(char, &str); 5] = [
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('\'', "&apos;"),
    ('"', "&quot;"),
    ('&', "&amp;"),
];

/// Replace `< > ' " &` with their named entities.
pub fn encode_html(input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(Error::InvalidInput("html input is missing/empty".to_string()));
    }

    let mut encoded = String::with_capacity(input.len());
    for ch in input.chars() {
        match ENTITIES.iter().find(|(literal, _)| *literal == ch) {
            Some((_, entity)) => encoded.push_str(entity),
            None => encoded.push(ch),
        }
    }
    Ok(encoded)
}

/// Replace the five named entities with their characters.
pub fn decode_html(input: &str) -> Result<String> {
    if input.is_empty() {
        return Err(Error::InvalidInput("html input is missing/empty".to_string()));
    }

    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(position) = rest.find('&') {
        decoded.push_str(&rest[..position]);
        rest = &rest[position..];
        match ENTITIES.iter().find(|(_, entity)| rest.starts_with(entity)) {
            Some((literal, entity)) => {
                decoded.push(*literal);
                rest = &rest[entity.len()..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    Ok(decoded)
}
