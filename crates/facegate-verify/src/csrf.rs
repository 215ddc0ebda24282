/// Name of the hidden form field carrying the anti-forgery token.
pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";

/// Header the token is echoed in on submission.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Find the value of the first `<input name="csrfmiddlewaretoken">` in `html`.
///
/// Tag and attribute names are matched case-insensitively; attribute values
/// may be double-quoted, single-quoted or bare, in any order.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let mut offset = 0;

    while let Some(found) = lower[offset..].find("<input") {
        let start = offset + found + "<input".len();
        let end = tag_end(html, start);
        let attributes = parse_attributes(&html[start..end]);

        let named = attributes
            .iter()
            .any(|(name, value)| name == "name" && value == CSRF_FIELD_NAME);
        if named {
            return attributes
                .into_iter()
                .find(|(name, _)| name == "value")
                .map(|(_, value)| value);
        }
        offset = end;
    }
    None
}

/// Index of the `>` closing the tag that starts at `start`, skipping any
/// `>` inside a quoted attribute value. `html.len()` if the tag never closes.
fn tag_end(html: &str, start: usize) -> usize {
    let mut quote = None;
    let mut after_equals = false;

    for (i, b) in html.bytes().enumerate().skip(start) {
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'>' => return i,
                b'"' | b'\'' if after_equals => quote = Some(b),
                b'=' => {
                    after_equals = true;
                    continue;
                }
                // whitespace may sit between `=` and the value
                _ if b.is_ascii_whitespace() => continue,
                _ => {}
            },
        }
        after_equals = false;
    }
    html.len()
}

/// Split the inside of a tag into `(lowercase name, value)` pairs.
fn parse_attributes(tag: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut chars = tag.char_indices().peekable();

    loop {
        // skip whitespace and stray slashes
        while chars.next_if(|(_, c)| c.is_whitespace() || *c == '/').is_some() {}
        let Some(&(name_start, _)) = chars.peek() else {
            break;
        };

        let mut name_end = tag.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() || c == '=' || c == '/' {
                name_end = i;
                break;
            }
            chars.next();
        }
        let name = tag[name_start..name_end].to_ascii_lowercase();

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        if chars.next_if(|(_, c)| *c == '=').is_none() {
            attributes.push((name, String::new()));
            continue;
        }
        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}

        let value = match chars.peek().copied() {
            Some((i, quote @ ('"' | '\''))) => {
                chars.next();
                let value_start = i + 1;
                let mut value_end = tag.len();
                for (j, c) in chars.by_ref() {
                    if c == quote {
                        value_end = j;
                        break;
                    }
                }
                &tag[value_start..value_end]
            }
            Some((i, _)) => {
                let mut value_end = tag.len();
                while let Some(&(j, c)) = chars.peek() {
                    if c.is_whitespace() {
                        value_end = j;
                        break;
                    }
                    chars.next();
                }
                &tag[i..value_end]
            }
            None => "",
        };
        attributes.push((name, value.to_string()));
    }

    attributes
}
