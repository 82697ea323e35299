//! Attribute value and CDATA escaping.

const ESCAPED_DOUBLE_QUOTE: &[u8] = b"&#34;";
const ESCAPED_SINGLE_QUOTE: &[u8] = b"&#39;";
const ESCAPED_LT: &[u8] = b"&lt;";
const ESCAPED_AMP: &[u8] = b"&amp;";

/// Length of `<![CDATA[` plus `]]>`.
const CDATA_OVERHEAD: usize = 12;

/// If `b` starts with a character reference to a quote, return the quote and
/// the reference length. `b[0]` is expected to be `&`.
fn quote_entity(b: &[u8]) -> Option<(u8, usize)> {
    if b.len() < 5 {
        return None;
    }
    if b[1] == b'#' {
        let (digits, first, double, single) = if b[2] == b'x' {
            (3, b'2', b'2', b'7')
        } else {
            (2, b'3', b'4', b'9')
        };
        let i = digits + b[digits..].iter().take_while(|&&c| c == b'0').count();
        if i + 2 < b.len() && b[i] == first && b[i + 2] == b';' {
            if b[i + 1] == double {
                return Some((b'"', i + 3));
            } else if b[i + 1] == single {
                return Some((b'\'', i + 3));
            }
        }
    } else if b.len() >= 6 && b[5] == b';' {
        if b[1..5].eq_ignore_ascii_case(b"quot") {
            return Some((b'"', 6));
        } else if b[1..5].eq_ignore_ascii_case(b"apos") {
            return Some((b'\'', 6));
        }
    }
    None
}

/// Rewrite an unquoted attribute value into `buf` wrapped in whichever quote
/// needs fewer escapes.
///
/// Quote references for the other quote are decoded, the delimiter itself is
/// always written as a numeric reference, and tabs and line breaks become spaces.
pub fn escape_attr_val<'a>(buf: &'a mut Vec<u8>, b: &[u8]) -> &'a [u8] {
    let mut doubles = 0;
    let mut singles = 0;
    for (i, &c) in b.iter().enumerate() {
        let quote = match c {
            b'&' => quote_entity(&b[i..]).map(|(quote, _)| quote),
            b'"' | b'\'' => Some(c),
            _ => None,
        };
        match quote {
            Some(b'"') => doubles += 1,
            Some(_) => singles += 1,
            None => {}
        }
    }

    let (quote, escaped_quote) = if doubles > singles {
        (b'\'', ESCAPED_SINGLE_QUOTE)
    } else {
        (b'"', ESCAPED_DOUBLE_QUOTE)
    };

    buf.clear();
    buf.reserve(b.len() + 2);
    buf.push(quote);
    let mut i = 0;
    while i < b.len() {
        let c = b[i];
        match c {
            b'&' => match quote_entity(&b[i..]) {
                Some((entity_quote, n)) => {
                    if entity_quote == quote {
                        buf.extend_from_slice(escaped_quote);
                    } else {
                        buf.push(entity_quote);
                    }
                    i += n;
                    continue;
                }
                None => buf.push(c),
            },
            b'\t' | b'\n' | b'\r' => buf.push(b' '),
            _ if c == quote => buf.extend_from_slice(escaped_quote),
            _ => buf.push(c),
        }
        i += 1;
    }
    buf.push(quote);
    buf
}

/// Outcome of [`escape_cdata_val`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CDataForm {
    /// Escaping would cost more than the CDATA markers; keep the section.
    Keep,
    /// The escaped text was written to the buffer.
    Escaped,
}

/// Decide whether CDATA content is shorter as escaped text, writing the
/// escaped form into `buf` when it is.
pub fn escape_cdata_val(buf: &mut Vec<u8>, b: &[u8]) -> CDataForm {
    let mut growth = 0;
    for &c in b {
        growth += match c {
            b'<' => ESCAPED_LT.len() - 1,
            b'&' => ESCAPED_AMP.len() - 1,
            _ => continue,
        };
        if growth > CDATA_OVERHEAD {
            return CDataForm::Keep;
        }
    }

    buf.clear();
    buf.reserve(b.len() + growth);
    for &c in b {
        match c {
            b'<' => buf.extend_from_slice(ESCAPED_LT),
            b'&' => buf.extend_from_slice(ESCAPED_AMP),
            _ => buf.push(c),
        }
    }
    CDataForm::Escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(value: &str) -> String {
        let mut buf = Vec::new();
        String::from_utf8(escape_attr_val(&mut buf, value.as_bytes()).to_vec()).unwrap()
    }

    fn cdata(value: &str) -> (CDataForm, String) {
        let mut buf = Vec::new();
        let form = escape_cdata_val(&mut buf, value.as_bytes());
        (form, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_attr_plain_uses_double_quotes() {
        assert_eq!(attr("10"), r#""10""#);
        assert_eq!(attr(""), r#""""#);
    }

    #[test]
    fn test_attr_more_doubles_switches_to_single() {
        assert_eq!(attr(r#"a"b"c'd"#), r#"'a"b"c&#39;d'"#);
    }

    #[test]
    fn test_attr_tie_keeps_double() {
        assert_eq!(attr(r#"a"b'c"#), r#""a&#34;b'c""#);
    }

    #[test]
    fn test_attr_decodes_other_quote_entity() {
        assert_eq!(attr("it&apos;s"), r#""it's""#);
        assert_eq!(attr("&quot;x&quot;"), r#"'"x"'"#);
    }

    #[test]
    fn test_attr_entity_forms() {
        assert_eq!(attr("&#x0022;a&#x22;"), r#"'"a"'"#);
        assert_eq!(attr("&#00039;"), r#""'""#);
        assert_eq!(attr("&QUOT;&Quot;&apos;"), r#"'""&#39;'"#);
    }

    #[test]
    fn test_attr_entity_matching_delimiter_normalized() {
        assert_eq!(attr("&#x27;&#39;&quot;&quot;&quot;"), r#"'&#39;&#39;"""'"#);
    }

    #[test]
    fn test_attr_not_quote_entities_untouched() {
        assert_eq!(attr("&amp;&#35;&#x23;&quo;"), r#""&amp;&#35;&#x23;&quo;""#);
    }

    #[test]
    fn test_attr_whitespace_becomes_space() {
        assert_eq!(attr("a\tb\nc\rd"), r#""a b c d""#);
    }

    #[test]
    fn test_attr_escapes_only_the_rarer_quote() {
        for (value, escapes) in [(r#""""'"#, 1), (r#"''""#, 1), (r#"&quot;'&#39;&#39;"#, 1), ("x", 0)] {
            let out = attr(value);
            let (escaped, other) = if out.starts_with('"') {
                ("&#34;", "&#39;")
            } else {
                ("&#39;", "&#34;")
            };
            assert_eq!(out.matches(escaped).count(), escapes, "{value}");
            assert_eq!(out.matches(other).count(), 0, "{value}");
        }
    }

    #[test]
    fn test_cdata_small_growth_converts() {
        assert_eq!(cdata("<a>"), (CDataForm::Escaped, "&lt;a>".into()));
        assert_eq!(cdata("a & b"), (CDataForm::Escaped, "a &amp; b".into()));
        assert_eq!(cdata("plain"), (CDataForm::Escaped, "plain".into()));
    }

    #[test]
    fn test_cdata_threshold() {
        assert_eq!(cdata("<<<<").0, CDataForm::Escaped);
        assert_eq!(cdata("&&&").0, CDataForm::Escaped);
        assert_eq!(cdata("<<<<<").0, CDataForm::Keep);
        assert_eq!(cdata("&&&<").0, CDataForm::Keep);
    }
}
