//! Log sanitization for patient identifiers and credentials.
//!
//! Formatted log lines pass through [`SanitizingMakeWriter`] before they
//! reach the sink. Redacted:
//! - Patient and record IDs (UUIDs)
//! - CPF and CNS numbers
//! - Medical record numbers ("prontuário" / MRN)
//! - E-mail addresses and phone numbers
//! - Bearer tokens and `key=value` style secrets
//!
//! Patient names cannot be matched reliably by pattern and must never be
//! passed to logging calls.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Default maximum number of bytes sanitized per call.
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

struct Pattern {
    regex: Regex,
    replacement: &'static str,
}

struct Patterns {
    set: RegexSet,
    rules: Vec<Pattern>,
}

fn patterns() -> &'static Patterns {
    PATTERNS.get_or_init(|| {
        // Order matters: specific identifiers before the generic digit runs.
        let rules: Vec<(&'static str, &'static str)> = vec![
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (r"\b\d{3}\.\d{3}\.\d{3}-\d{2}\b", "[REDACTED-CPF]"),
            (r"\b\d{3}\s?\d{4}\s?\d{4}\s?\d{4}\b", "[REDACTED-CNS]"),
            (
                r"(?i)\b(?:MRN|prontu[aá]rio)[:\s#]*\d{4,12}\b",
                "[REDACTED-MRN]",
            ),
            (
                r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"(?:\+55\s?\(?\d{2}\)?\s?9?\d{4}-?\d{4}|\(\d{2}\)\s?9?\d{4}-?\d{4}|\b\d{2}\s?9?\d{4}-\d{4})\b",
                "[REDACTED-PHONE]",
            ),
            (
                r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b",
                "[REDACTED-JWT]",
            ),
            (
                r"(?i)\b(?:api[_-]?key|access[_-]?token|refresh[_-]?token|secret|password|otp|token)\b\s*[:=]\s*\S{6,}",
                "[REDACTED-SECRET]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Pattern {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        Patterns { set, rules }
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Sanitize a string with the default size cap.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, DEFAULT_SANITIZE_MAX_BYTES)
}

/// Sanitize at most `max_bytes` of `input`, marking truncation.
#[must_use]
pub fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    // Apply in rule order, only for rules that matched the original prefix.
    for idx in &patterns.set.matches(prefix) {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).into_owned();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains a redactable identifier.
#[must_use]
pub fn contains_pii(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, DEFAULT_SANITIZE_MAX_BYTES);
    patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
    max_bytes: usize,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes.max(1);
        self
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
    max_bytes: usize,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        let sanitized = sanitize_with_limit(&text, self.max_bytes);
        self.inner.write_all(sanitized.as_bytes())?;
        if !sanitized.ends_with('\n') && text.ends_with('\n') {
            // truncation dropped the newline
            self.inner.write_all(b"\n")?;
        }
        Ok(())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // No newline in sight: don't buffer without bound.
        if self.buffer.len() > self.max_bytes.saturating_mul(2) {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
            max_bytes: self.max_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_uuid() {
        let input = "Recorded measurement for patient 550e8400-e29b-41d4-a716-446655440000";
        let sanitized = sanitize(input);
        assert!(sanitized.contains("[REDACTED-UUID]"));
        assert!(!sanitized.contains("550e8400"));
    }

    #[test]
    fn test_sanitize_cpf() {
        let sanitized = sanitize("CPF do responsável: 123.456.789-09");
        assert!(sanitized.contains("[REDACTED-CPF]"));
        assert!(!sanitized.contains("789-09"));
    }

    #[test]
    fn test_sanitize_mrn() {
        let sanitized = sanitize("prontuário: 20240315 aberto");
        assert!(sanitized.contains("[REDACTED-MRN]"));
    }

    #[test]
    fn test_sanitize_email() {
        let sanitized = sanitize("Convite enviado para mae.paciente@example.com");
        assert!(sanitized.contains("[REDACTED-EMAIL]"));
    }

    #[test]
    fn test_sanitize_phone() {
        let sanitized = sanitize("Contato: (11) 98765-4321");
        assert!(sanitized.contains("[REDACTED-PHONE]"));
        assert!(!sanitized.contains("98765"));
    }

    #[test]
    fn test_sanitize_phone_shapes() {
        for input in ["+55 11 98765-4321", "+5511987654321", "(21)3456-7890", "11 98765-4321"] {
            assert_eq!(sanitize(input), "[REDACTED-PHONE]", "input: {input}");
        }
    }

    #[test]
    fn test_bare_digit_runs_untouched() {
        let input = "page offset=1234567890 total=98765432101";
        assert!(!contains_pii(input));
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_otp_secret() {
        let sanitized = sanitize("admin otp=842913 issued");
        assert!(sanitized.contains("[REDACTED-SECRET]"));
        assert!(!sanitized.contains("842913"));
    }

    #[test]
    fn test_clinical_values_untouched() {
        let input = "Assessment complete: ci=94.4 cvai=5.1 diagnosis=Misto Moderado";
        assert!(!contains_pii(input));
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("ação ".repeat(10).as_str(), 7);
        assert!(sanitized.ends_with(" [TRUNCATED]"));
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        let make = SanitizingMakeWriter::new(Vec::<u8>::new);
        let mut writer = make.make_writer();
        writer
            .write_all(b"patient 550e8400-e29b-41d4-a716-446655440000 saved\n")
            .expect("Should write");
        let out = String::from_utf8(writer.inner.clone()).expect("utf8");
        assert_eq!(out, "patient [REDACTED-UUID] saved\n");
    }
}
