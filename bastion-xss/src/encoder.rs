/// Context-specific output encoders.
///
/// [`XssEncoder::encode_html`] is the second stage of sanitization. The other
/// encoders exist for the contexts that stage does not cover: attribute
/// values, inline script strings and URL components.
pub struct XssEncoder;

impl XssEncoder {
    /// Encode `& < > " ' /` as HTML entities.
    pub fn encode_html(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '/' => out.push_str("&#x2F;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Encode for a quoted HTML attribute value.
    ///
    /// Whitespace is encoded as well, so an attribute that is accidentally
    /// left unquoted still cannot be broken out of.
    pub fn encode_html_attribute(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#x27;"),
                '`' => out.push_str("&#x60;"),
                '=' => out.push_str("&#x3D;"),
                ' ' => out.push_str("&#x20;"),
                '\t' => out.push_str("&#x9;"),
                '\n' => out.push_str("&#xA;"),
                '\r' => out.push_str("&#xD;"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Encode for a JavaScript string literal.
    pub fn encode_javascript(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\'' => out.push_str("\\'"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '<' => out.push_str("\\x3C"),
                '>' => out.push_str("\\x3E"),
                '/' => out.push_str("\\/"),
                '\u{2028}' => out.push_str("\\u2028"),
                '\u{2029}' => out.push_str("\\u2029"),
                _ => out.push(c),
            }
        }
        out
    }

    /// Percent-encode everything but RFC 3986 unreserved characters.
    pub fn encode_url(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for byte in text.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
                out.push(byte as char);
            } else {
                out.push_str(&format!("%{:02X}", byte));
            }
        }
        out
    }

    /// Inverse of [`XssEncoder::encode_html`].
    pub fn decode_html(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#x27;", "'")
            .replace("&#x2F;", "/")
            .replace("&amp;", "&") // Must be last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_html() {
        let output = XssEncoder::encode_html(r#"<script>alert("XSS")</script>"#);

        assert_eq!(
            output,
            "&lt;script&gt;alert(&quot;XSS&quot;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_encode_html_all_six() {
        assert_eq!(
            XssEncoder::encode_html(r#"&<>"'/"#),
            "&amp;&lt;&gt;&quot;&#x27;&#x2F;"
        );
    }

    #[test]
    fn test_encode_html_without_specials_is_identity() {
        let plain = "Hello world, 100% fine: yes!";
        assert_eq!(XssEncoder::encode_html(plain), plain);
    }

    #[test]
    fn test_encode_html_keeps_unicode() {
        assert_eq!(XssEncoder::encode_html("héllo <ü>"), "héllo &lt;ü&gt;");
    }

    #[test]
    fn test_encode_html_attribute() {
        let output = XssEncoder::encode_html_attribute(r#"x" onclick="alert('XSS')"#);

        assert!(output.contains("&quot;"));
        assert!(output.contains("&#x27;"));
        assert!(!output.contains(' '));
        assert!(!output.contains('='));
    }

    #[test]
    fn test_encode_javascript() {
        let output = XssEncoder::encode_javascript("'; alert('XSS'); //</script>");

        assert!(output.contains("\\'"));
        assert!(!output.contains("';"));
        assert!(!output.contains("</script>"));
    }

    #[test]
    fn test_encode_url() {
        assert_eq!(
            XssEncoder::encode_url("hello world&test=value"),
            "hello%20world%26test%3Dvalue"
        );
        assert_eq!(XssEncoder::encode_url("é"), "%C3%A9");
    }

    #[test]
    fn test_decode_html() {
        let input = "&lt;script&gt;alert(&quot;XSS&quot;)&lt;&#x2F;script&gt;";
        assert_eq!(XssEncoder::decode_html(input), r#"<script>alert("XSS")</script>"#);
    }

    #[test]
    fn test_decode_does_not_double_decode() {
        assert_eq!(XssEncoder::decode_html("&amp;lt;"), "&lt;");
    }
}
