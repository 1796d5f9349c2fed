use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Base path of the generated placeholder image.
const PLACEHOLDER_BASE: &str = "/placeholder.svg?height=200&width=400";

/// Characters escaped in a URI component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Placeholder thumbnail reference for a post that was created without one.
///
/// The title is percent-encoded into the `query` parameter so the image
/// service can render it.
pub fn placeholder_thumbnail(title: &str) -> String {
    let query = utf8_percent_encode(title, URI_COMPONENT);
    format!("{PLACEHOLDER_BASE}&query={query}")
}
