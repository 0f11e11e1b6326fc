//! Text surgery for the `"version"` field of a JSON manifest.
//!
//! Nothing here parses JSON. The manifest is edited as plain text so that
//! indentation, key order, newline style and one-line layouts survive the
//! edit byte for byte. Validation of the result lives in [`super::upsert`].

use crate::error::Result;
use regex::Regex;

const DEFAULT_INDENT: &str = "  ";

/// Sets the `"version"` field of `text` to `version` without re-serializing.
///
/// Returns the input unchanged when it cannot edit confidently: a one-line
/// object without a closing brace, or a multi-line object whose last
/// non-blank line is not a lone `}`.
pub fn splice_version(text: &str, version: &str) -> Result<String> {
    let existing = Regex::new(r#"("version"\s*:\s*")([^"]*)(")"#)?;
    if let Some(value) = existing.captures(text).and_then(|caps| caps.get(2)) {
        log::debug!("Replacing existing version value {:?}", value.as_str());
        let mut out = String::with_capacity(text.len() + version.len());
        out.push_str(&text[..value.start()]);
        out.push_str(version);
        out.push_str(&text[value.end()..]);
        return Ok(out);
    }

    if text.contains('\n') {
        insert_multi_line(text, version)
    } else {
        Ok(insert_single_line(text, version))
    }
}

fn insert_single_line(text: &str, version: &str) -> String {
    let Some(close) = text.rfind('}') else {
        log::debug!("No closing brace in one-line manifest");
        return text.to_string();
    };

    // `after` keeps the brace and anything trailing it
    let (before, after) = text.split_at(close);
    let inside = before
        .find('{')
        .map(|open| before[open + 1..].trim())
        .unwrap_or("");
    let comma = if !inside.is_empty() && !inside.ends_with(',') {
        ","
    } else {
        ""
    };

    log::debug!("Inserting version into one-line manifest");
    format!("{before}{comma} \"version\": \"{version}\"{after}")
}

fn insert_multi_line(text: &str, version: &str) -> Result<String> {
    let newline = detect_newline(text);
    let mut lines = split_lines(text);

    let mut close = lines.len() - 1;
    while close > 0 && lines[close].trim().is_empty() {
        close -= 1;
    }
    if lines[close].trim() != "}" {
        log::debug!("Last non-blank line is not a closing brace; leaving manifest untouched");
        return Ok(text.to_string());
    }

    let indent_pattern = Regex::new(r#"(?m)^([ \t]+)"[^"]+"\s*:"#)?;
    let indent = indent_pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_INDENT);

    // Loose on purpose: any line with a colon counts as a property.
    if let Some(last) = lines[..close].iter().rposition(|line| line.contains(':'))
        && !lines[last].trim().ends_with(',')
    {
        lines[last] = format!("{},", lines[last].trim_end());
    }

    lines.insert(close, format!("{indent}\"version\": \"{version}\""));
    log::debug!("Inserted version line at {}", close + 1);

    Ok(lines.join(newline))
}

fn detect_newline(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Splits on `\n`, dropping the `\r` of every `\r\n` pair.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut segments = text.split('\n').peekable();
    while let Some(segment) = segments.next() {
        let line = if segments.peek().is_some() {
            segment.strip_suffix('\r').unwrap_or(segment)
        } else {
            segment
        };
        lines.push(line.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_spacing_around_colon() {
        let input = r#"{"a":1,   "version"   :   "0.1.0"   ,"b":2}"#;
        let expected = r#"{"a":1,   "version"   :   "2.0.0"   ,"b":2}"#;

        assert_eq!(splice_version(input, "2.0.0").unwrap(), expected);
    }

    #[test]
    fn test_replace_in_multi_line_manifest() {
        let input = "{\n    \"domain\": \"demo\",\n    \"version\": \"1.0.0\",\n    \"iot_class\": \"cloud_polling\"\n}\n";
        let expected = "{\n    \"domain\": \"demo\",\n    \"version\": \"1.1.0-beta.2\",\n    \"iot_class\": \"cloud_polling\"\n}\n";

        assert_eq!(splice_version(input, "1.1.0-beta.2").unwrap(), expected);
    }

    #[test]
    fn test_replace_empty_value() {
        let input = r#"{"version": ""}"#;
        assert_eq!(
            splice_version(input, "0.0.1").unwrap(),
            r#"{"version": "0.0.1"}"#
        );
    }

    #[test]
    fn test_dollar_signs_are_inserted_literally() {
        let input = r#"{"version": "1.0.0"}"#;
        assert_eq!(
            splice_version(input, "1.0.0-$1").unwrap(),
            r#"{"version": "1.0.0-$1"}"#
        );
    }

    #[test]
    fn test_insert_into_empty_object() {
        assert_eq!(
            splice_version("{}", "1.0.0").unwrap(),
            r#"{ "version": "1.0.0"}"#
        );
        assert_eq!(
            splice_version("{ }", "1.0.0").unwrap(),
            r#"{  "version": "1.0.0"}"#
        );
    }

    #[test]
    fn test_insert_into_one_line_object_adds_comma() {
        assert_eq!(
            splice_version(r#"{"name":"demo"}"#, "1.0.0").unwrap(),
            r#"{"name":"demo", "version": "1.0.0"}"#
        );
    }

    #[test]
    fn test_insert_after_trailing_comma_adds_no_second_comma() {
        assert_eq!(
            splice_version(r#"{"name":"demo",}"#, "1.0.0").unwrap(),
            r#"{"name":"demo", "version": "1.0.0"}"#
        );
    }

    #[test]
    fn test_one_line_without_brace_is_untouched() {
        let input = r#"["not", "an", "object""#;
        assert_eq!(splice_version(input, "1.0.0").unwrap(), input);
    }

    #[test]
    fn test_insert_multi_line() {
        let input = "{\n  \"name\": \"demo\",\n  \"domain\": \"demo\"\n}";
        let expected =
            "{\n  \"name\": \"demo\",\n  \"domain\": \"demo\",\n  \"version\": \"2.1.0\"\n}";

        assert_eq!(splice_version(input, "2.1.0").unwrap(), expected);
    }

    #[test]
    fn test_insert_multi_line_keeps_trailing_newlines() {
        let input = "{\n  \"name\": \"demo\"\n}\n\n";
        let expected = "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}\n\n";

        assert_eq!(splice_version(input, "1.0.0").unwrap(), expected);
    }

    #[test]
    fn test_insert_multi_line_keeps_crlf_and_tabs() {
        let input = "{\r\n\t\"name\": \"demo\"\r\n}\r\n";
        let expected = "{\r\n\t\"name\": \"demo\",\r\n\t\"version\": \"1.0.0\"\r\n}\r\n";

        assert_eq!(splice_version(input, "1.0.0").unwrap(), expected);
    }

    #[test]
    fn test_insert_multi_line_uses_first_property_indent() {
        let input = "{\n    \"name\": \"demo\",\n  \"domain\": \"demo\"\n}\n";
        let expected =
            "{\n    \"name\": \"demo\",\n  \"domain\": \"demo\",\n    \"version\": \"3.0.0\"\n}\n";

        assert_eq!(splice_version(input, "3.0.0").unwrap(), expected);
    }

    #[test]
    fn test_insert_multi_line_trims_space_before_comma() {
        let input = "{\n  \"name\": \"demo\"   \n}";
        let expected = "{\n  \"name\": \"demo\",\n  \"version\": \"1.0.0\"\n}";

        assert_eq!(splice_version(input, "1.0.0").unwrap(), expected);
    }

    #[test]
    fn test_insert_multi_line_empty_object_uses_default_indent() {
        let input = "{\n}\n";
        let expected = "{\n  \"version\": \"1.0.0\"\n}\n";

        assert_eq!(splice_version(input, "1.0.0").unwrap(), expected);
    }

    #[test]
    fn test_multi_line_without_closing_brace_is_untouched() {
        let input = "{\n  \"name\": \"demo\",\n";
        assert_eq!(splice_version(input, "1.0.0").unwrap(), input);
    }

    #[test]
    fn test_closing_brace_sharing_a_line_is_untouched() {
        let input = "{\n  \"name\": \"demo\"}\n";
        assert_eq!(splice_version(input, "1.0.0").unwrap(), input);
    }

    #[test]
    fn test_split_lines_only_strips_paired_carriage_returns() {
        assert_eq!(split_lines("a\r\nb\nc\r"), vec!["a", "b", "c\r"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }
}
