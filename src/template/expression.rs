//! Template expression grammar.
//!
//! ```text
//! $now
//! $random.<generator>
//! $params.<key>
//! $query.<key>
//! $body.<key>
//! ```

/// A parsed `{{...}}` expression, borrowing its key from the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expression<'a> {
    Now,
    Random(&'a str),
    Param(&'a str),
    Query(&'a str),
    Body(&'a str),
    Unknown(&'a str),
}

impl<'a> Expression<'a> {
    /// Classify the text between the braces. Surrounding whitespace is ignored.
    pub fn parse(raw: &'a str) -> Self {
        let expr = raw.trim();

        if expr == "$now" {
            return Expression::Now;
        }
        if let Some(name) = expr.strip_prefix("$random.") {
            return Expression::Random(name);
        }
        if let Some(key) = expr.strip_prefix("$params.") {
            return Expression::Param(key);
        }
        if let Some(key) = expr.strip_prefix("$query.") {
            return Expression::Query(key);
        }
        if let Some(key) = expr.strip_prefix("$body.") {
            return Expression::Body(key);
        }
        Expression::Unknown(expr)
    }
}

/// A `{{...}}` span located in a template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    /// Byte offset of the opening `{{`.
    pub start: usize,
    /// Byte offset just past the closing `}}`.
    pub end: usize,
    /// Text between the braces, untrimmed.
    pub inner: &'a str,
}

/// Iterator over non-overlapping placeholders, left to right.
///
/// A placeholder needs at least one character between the braces and may
/// not span a line break; the first `}}` after that character closes it.
pub fn placeholders(text: &str) -> Placeholders<'_> {
    Placeholders { text, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Placeholders<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.text[self.pos..].find("{{") {
            let start = self.pos + offset;
            let body_start = start + 2;
            match closing_offset(&self.text[body_start..]) {
                Some(len) => {
                    let end = body_start + len + 2;
                    self.pos = end;
                    return Some(Placeholder {
                        start,
                        end,
                        inner: &self.text[body_start..body_start + len],
                    });
                }
                // No placeholder opens here; retry one brace later.
                None => self.pos = start + 1,
            }
        }
        self.pos = self.text.len();
        None
    }
}

/// Length of the placeholder body in `rest`, if a valid close exists.
fn closing_offset(rest: &str) -> Option<usize> {
    let first = rest.chars().next()?;
    if is_line_break(first) {
        return None;
    }
    let skip = first.len_utf8();
    let len = skip + rest[skip..].find("}}")?;
    if rest[..len].chars().any(is_line_break) {
        return None;
    }
    Some(len)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inners(text: &str) -> Vec<&str> {
        placeholders(text).map(|p| p.inner).collect()
    }

    #[test]
    fn test_parse_expressions() {
        assert_eq!(Expression::parse("$now"), Expression::Now);
        assert_eq!(Expression::parse("  $now "), Expression::Now);
        assert_eq!(Expression::parse("$random.uuid"), Expression::Random("uuid"));
        assert_eq!(Expression::parse("$params.id"), Expression::Param("id"));
        assert_eq!(Expression::parse("$query.q"), Expression::Query("q"));
        assert_eq!(Expression::parse("$body.name"), Expression::Body("name"));
        assert_eq!(Expression::parse("$nowish"), Expression::Unknown("$nowish"));
        assert_eq!(Expression::parse("name"), Expression::Unknown("name"));
    }

    #[test]
    fn test_scan_multiple() {
        assert_eq!(inners("{{a}}-{{ b }}"), vec!["a", " b "]);
        assert_eq!(inners("no placeholders"), Vec::<&str>::new());
    }

    #[test]
    fn test_scan_edge_cases() {
        assert_eq!(inners("{{}}"), Vec::<&str>::new());
        assert_eq!(inners("{{}}}"), vec!["}"]);
        assert_eq!(inners("{{{a}}"), vec!["{a"]);
        assert_eq!(inners("{{a\n}} {{b}}"), vec!["b"]);
        assert_eq!(inners("{{ünï}}"), vec!["ünï"]);
        assert_eq!(inners("{{open"), Vec::<&str>::new());
    }

    #[test]
    fn test_spans() {
        let spans: Vec<_> = placeholders("id={{$params.id}};").collect();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 3);
        assert_eq!(spans[0].end, 17);
    }
}
