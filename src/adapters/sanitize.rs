//! Log sanitization for clinical inputs.
//!
//! Feature values entered into the form are health data. The inference path
//! never logs them, and this writer redacts anything that slips through:
//! - `name=value` / `name: value` pairs for the 13 clinical features
//! - `Debug` output of `FeatureVector`
//! - numeric vectors (raw or scaled model inputs)
//!
//! Input is capped (see `CARDIO_SANITIZE_MAX_BYTES`) so a huge log line
//! cannot stall the writer.

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

static PATTERNS: OnceLock<RedactionPatterns> = OnceLock::new();

/// Maximum number of bytes sanitized per call (16 KiB unless overridden).
const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

struct Redaction {
    regex: Regex,
    replacement: &'static str,
}

struct RedactionPatterns {
    set: RegexSet,
    rules: Vec<Redaction>,
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }

    let mut end = max_bytes.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

fn max_sanitize_bytes() -> usize {
    std::env::var("CARDIO_SANITIZE_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_SANITIZE_MAX_BYTES)
}

fn get_patterns() -> &'static RedactionPatterns {
    PATTERNS.get_or_init(|| {
        let rules: Vec<(&'static str, &'static str)> = vec![
            // Whole feature vectors in Debug form
            (r"FeatureVector\s*\{[^}]*\}", "FeatureVector { [REDACTED] }"),
            // Clinical feature key/value pairs (column names and field names)
            (
                r"(?i)\b(age|sex|cp|trestbps|chol|fbs|restecg|thalach|exang|oldpeak|slope|ca|thal|chest_pain_type|resting_bp|cholesterol|fasting_blood_sugar|resting_ecg|max_heart_rate|exercise_angina|st_depression|st_slope|vessel_count|thalassemia)\b(\s*[:=]\s*)-?\d+(?:\.\d+)?",
                "${1}${2}[REDACTED]",
            ),
            // Three or more numbers in brackets: model input vectors
            (
                r"\[\s*-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?(?:\s*,\s*-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?){2,}\s*,?\s*\]",
                "[REDACTED-VECTOR]",
            ),
        ];

        let set = RegexSet::new(rules.iter().map(|(p, _)| *p)).expect("Valid regex set");
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Redaction {
                regex: Regex::new(pattern).expect("Valid regex"),
                replacement,
            })
            .collect();

        RedactionPatterns { set, rules }
    })
}

/// Redact clinical values from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, max_sanitize_bytes())
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let patterns = get_patterns();
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);

    let mut result = prefix.to_string();
    for idx in patterns.set.matches(prefix).into_iter() {
        let rule = &patterns.rules[idx];
        result = rule.regex.replace_all(&result, rule.replacement).to_string();
    }

    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// Check if a string contains clinical values that would be redacted.
#[must_use]
pub fn contains_clinical_data(input: &str) -> bool {
    let (prefix, _) = truncate_to_char_boundary(input, max_sanitize_bytes());
    get_patterns().set.is_match(prefix)
}

/// A `tracing_subscriber` writer wrapper that sanitizes each formatted log
/// line before it reaches the underlying sink.
#[derive(Debug)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<M> Clone for SanitizingMakeWriter<M>
where
    M: Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
        }
    }
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.drain(..=pos).collect::<Vec<u8>>();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
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

        // A line with no newline in sight: sanitize what we have and move on.
        let hard_cap = max_sanitize_bytes().saturating_mul(2);
        if self.buffer.len() > hard_cap {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.inner.write_all(b"\n")?;
            self.buffer.clear();
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;

        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
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
        SanitizingWriter::new(self.inner.make_writer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeatureVector;
    use std::io::Write;

    #[test]
    fn test_sanitize_key_value_pairs() {
        let sanitized = sanitize("submitted age=45 chol: 233 thalach=150 oldpeak=2.3");
        assert!(!sanitized.contains("45"));
        assert!(!sanitized.contains("233"));
        assert!(!sanitized.contains("2.3"));
        assert!(sanitized.contains("age=[REDACTED]"));
        assert!(sanitized.contains("chol: [REDACTED]"));
    }

    #[test]
    fn test_sanitize_feature_vector_debug() {
        let line = format!("snapshot {:?}", FeatureVector::default());
        let sanitized = sanitize(&line);
        assert_eq!(sanitized, "snapshot FeatureVector { [REDACTED] }");
    }

    #[test]
    fn test_sanitize_numeric_vectors() {
        let sanitized = sanitize("scaled=[-0.52, 1.3, 0.0, 2e-3] done");
        assert_eq!(sanitized, "scaled=[REDACTED-VECTOR] done");
    }

    #[test]
    fn test_leaves_ordinary_text_alone() {
        let line = "Inference complete: prediction=1, probability=85.0%, tier=Urgent";
        assert_eq!(sanitize(line), line);
        assert!(!contains_clinical_data(line));
        assert!(!contains_clinical_data("Loaded scaler (n_features=13)"));
        assert!(contains_clinical_data("age=45"));
    }

    #[test]
    fn test_sanitize_truncates_large_inputs() {
        let input = "prefix age=45 and a long tail that goes past the cap";
        let sanitized = sanitize_with_limit(input, 16);
        assert!(sanitized.ends_with(" [TRUNCATED]"));
        assert!(sanitized.starts_with("prefix age=[REDACTED]"));
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut out = Vec::new();
        {
            let mut writer = SanitizingWriter::new(&mut out);
            writer.write_all(b"first age=").expect("write");
            writer.write_all(b"61\nsecond line\n").expect("write");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text, "first age=[REDACTED]\nsecond line\n");
    }
}
