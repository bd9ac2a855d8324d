//! Parsing of `rg --json` output
//!
//! ripgrep emits one JSON object per line: `begin` and `end` bracket each
//! file, with `match` and `context` lines in between in line order. Matches
//! are completed once enough following lines have arrived to fill their
//! after-context, or when the file ends.

use base64::Engine as _;
use serde::Deserialize;
use sift_core::RawMatch;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
enum RgMessage {
    Begin(FileData),
    Match(LineData),
    Context(LineData),
    End(FileData),
    Summary(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct FileData {
    path: Payload,
}

#[derive(Debug, Deserialize)]
struct LineData {
    path: Payload,
    lines: Payload,
    line_number: Option<u64>,
    #[serde(default)]
    submatches: Vec<Submatch>,
}

#[derive(Debug, Deserialize)]
struct Submatch {
    start: usize,
    end: usize,
}

/// Text as ripgrep reports it: UTF-8 text or base64 bytes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Payload {
    Text { text: String },
    Bytes { bytes: String },
}

impl Payload {
    fn into_string(self) -> String {
        self.decode(None).0
    }

    /// Decode to UTF-8, moving a byte span of the raw line onto the decoded text
    fn decode(self, span: Option<(usize, usize)>) -> (String, Option<(usize, usize)>) {
        match self {
            Payload::Text { text } => (text, span),
            Payload::Bytes { bytes } => {
                let raw = match base64::engine::general_purpose::STANDARD.decode(bytes.as_bytes())
                {
                    Ok(raw) => raw,
                    Err(e) => {
                        debug!("undecodable bytes payload: {}", e);
                        return (String::new(), span.map(|_| (0, 0)));
                    }
                };
                // Each invalid sequence grows to U+FFFD, so offsets shift.
                let span = span.map(|(start, end)| {
                    let end = end.min(raw.len());
                    let start = start.min(end);
                    (lossy_len(&raw[..start]), lossy_len(&raw[..end]))
                });
                (String::from_utf8_lossy(&raw).into_owned(), span)
            }
        }
    }
}

fn lossy_len(raw: &[u8]) -> usize {
    String::from_utf8_lossy(raw).len()
}

#[derive(Debug)]
struct Line {
    number: u64,
    text: String,
    span: Option<(usize, usize)>,
}

#[derive(Debug)]
struct FileBuffer {
    path: String,
    lines: Vec<Line>,
    /// Index of the first match line not yet emitted
    next: usize,
}

/// Incremental assembler turning `rg --json` lines into [`RawMatch`]es
#[derive(Debug)]
pub struct JsonStreamParser {
    context_lines: usize,
    current: Option<FileBuffer>,
}

impl JsonStreamParser {
    pub fn new(context_lines: usize) -> Self {
        Self {
            context_lines,
            current: None,
        }
    }

    /// Feed one line of engine output, appending completed matches to `out`
    pub fn push_line(&mut self, line: &str, out: &mut Vec<RawMatch>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let message: RgMessage = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                debug!("skipping unparseable engine output: {}", e);
                return;
            }
        };

        match message {
            RgMessage::Begin(data) => {
                self.flush(out);
                self.current = Some(FileBuffer {
                    path: normalize_path(data.path.into_string()),
                    lines: Vec::new(),
                    next: 0,
                });
            }
            RgMessage::Match(data) => self.push(data, true, out),
            RgMessage::Context(data) => self.push(data, false, out),
            RgMessage::End(_) => self.flush(out),
            RgMessage::Summary(_) => {}
        }
    }

    /// Emit whatever is still buffered
    pub fn finish(&mut self, out: &mut Vec<RawMatch>) {
        self.flush(out);
    }

    fn push(&mut self, data: LineData, is_match: bool, out: &mut Vec<RawMatch>) {
        let Some(number) = data.line_number else {
            return;
        };
        let path = normalize_path(data.path.into_string());
        let same_file = self.current.as_ref().is_some_and(|b| b.path == path);
        if !same_file {
            self.flush(out);
            self.current = Some(FileBuffer {
                path,
                lines: Vec::new(),
                next: 0,
            });
        }

        let raw_span = if is_match {
            Some(
                data.submatches
                    .first()
                    .map(|m| (m.start, m.end))
                    .unwrap_or((0, 0)),
            )
        } else {
            None
        };
        let (text, span) = data.lines.decode(raw_span);
        let text = strip_newline(text);
        let span = span.map(|(start, end)| clamp_span(&text, start, end));

        if let Some(buffer) = self.current.as_mut() {
            buffer.lines.push(Line { number, text, span });
        }
        self.emit_ready(out, false);
    }

    fn flush(&mut self, out: &mut Vec<RawMatch>) {
        self.emit_ready(out, true);
        self.current = None;
    }

    fn emit_ready(&mut self, out: &mut Vec<RawMatch>, at_end: bool) {
        let context = self.context_lines;
        let Some(buffer) = self.current.as_mut() else {
            return;
        };
        let last_number = match buffer.lines.last() {
            Some(line) => line.number,
            None => return,
        };

        while buffer.next < buffer.lines.len() {
            let idx = buffer.next;
            let line = &buffer.lines[idx];
            if line.span.is_none() {
                buffer.next += 1;
                continue;
            }
            if !at_end && last_number < line.number + context as u64 {
                break;
            }
            out.push(build_match(buffer, idx, context));
            buffer.next += 1;
        }
    }
}

fn build_match(buffer: &FileBuffer, idx: usize, context: usize) -> RawMatch {
    let line = &buffer.lines[idx];
    let (match_start, match_end) = line.span.unwrap_or((0, 0));

    let mut context_before = Vec::new();
    let mut expected = line.number;
    for prev in buffer.lines[..idx].iter().rev() {
        if context_before.len() == context || prev.number + 1 != expected {
            break;
        }
        context_before.push(prev.text.clone());
        expected = prev.number;
    }
    context_before.reverse();

    let mut context_after = Vec::new();
    let mut expected = line.number;
    for next in &buffer.lines[idx + 1..] {
        if context_after.len() == context || next.number != expected + 1 {
            break;
        }
        context_after.push(next.text.clone());
        expected = next.number;
    }

    RawMatch {
        file_path: buffer.path.clone(),
        line_number: line.number,
        line_content: line.text.clone(),
        match_start,
        match_end,
        context_before,
        context_after,
    }
}

/// Keep a span inside `text` and on character boundaries
fn clamp_span(text: &str, start: usize, end: usize) -> (usize, usize) {
    let end = char_floor(text, end.min(text.len()));
    (char_floor(text, start.min(end)), end)
}

fn char_floor(text: &str, mut idx: usize) -> usize {
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn strip_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

fn normalize_path(path: String) -> String {
    let path = path.replace('\\', "/");
    match path.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin(path: &str) -> String {
        format!(r#"{{"type":"begin","data":{{"path":{{"text":"{path}"}}}}}}"#)
    }

    fn end(path: &str) -> String {
        format!(
            r#"{{"type":"end","data":{{"path":{{"text":"{path}"}},"binary_offset":null,"stats":{{}}}}}}"#
        )
    }

    fn matched(path: &str, line: u64, text: &str, start: usize, end: usize) -> String {
        format!(
            r#"{{"type":"match","data":{{"path":{{"text":"{path}"}},"lines":{{"text":"{text}\n"}},"line_number":{line},"absolute_offset":0,"submatches":[{{"match":{{"text":"x"}},"start":{start},"end":{end}}}]}}}}"#
        )
    }

    fn context(path: &str, line: u64, text: &str) -> String {
        format!(
            r#"{{"type":"context","data":{{"path":{{"text":"{path}"}},"lines":{{"text":"{text}\n"}},"line_number":{line},"absolute_offset":0,"submatches":[]}}}}"#
        )
    }

    fn parse(lines: &[String], context_lines: usize) -> Vec<RawMatch> {
        let mut parser = JsonStreamParser::new(context_lines);
        let mut out = Vec::new();
        for line in lines {
            parser.push_line(line, &mut out);
        }
        parser.finish(&mut out);
        out
    }

    #[test]
    fn test_single_match_with_context() {
        let lines = vec![
            begin("./src/app.py"),
            context("./src/app.py", 8, "import os"),
            context("./src/app.py", 9, ""),
            matched("./src/app.py", 10, "def authenticate(user):", 4, 16),
            context("./src/app.py", 11, "    return user"),
            context("./src/app.py", 12, ""),
            end("./src/app.py"),
        ];
        let out = parse(&lines, 2);
        assert_eq!(out.len(), 1);
        let m = &out[0];
        assert_eq!(m.file_path, "src/app.py");
        assert_eq!(m.line_number, 10);
        assert_eq!(m.line_content, "def authenticate(user):");
        assert_eq!(m.matched_text(), Some("authenticate"));
        assert_eq!(m.context_before, vec!["import os", ""]);
        assert_eq!(m.context_after, vec!["    return user", ""]);
    }

    #[test]
    fn test_adjacent_matches_share_context() {
        let lines = vec![
            begin("a.rs"),
            matched("a.rs", 1, "// TODO one", 3, 7),
            matched("a.rs", 2, "// TODO two", 3, 7),
            context("a.rs", 3, "fn main() {}"),
            end("a.rs"),
        ];
        let out = parse(&lines, 1);
        assert_eq!(out.len(), 2);
        assert!(out[0].context_before.is_empty());
        assert_eq!(out[0].context_after, vec!["// TODO two"]);
        assert_eq!(out[1].context_before, vec!["// TODO one"]);
        assert_eq!(out[1].context_after, vec!["fn main() {}"]);
    }

    #[test]
    fn test_gap_breaks_context() {
        let lines = vec![
            begin("a.rs"),
            matched("a.rs", 1, "x", 0, 1),
            context("a.rs", 2, "y"),
            context("a.rs", 9, "w"),
            matched("a.rs", 10, "x", 0, 1),
            end("a.rs"),
        ];
        let out = parse(&lines, 1);
        assert_eq!(out[0].context_after, vec!["y"]);
        assert_eq!(out[1].context_before, vec!["w"]);
    }

    #[test]
    fn test_matches_emitted_before_file_end() {
        let mut parser = JsonStreamParser::new(0);
        let mut out = Vec::new();
        parser.push_line(&begin("a.rs"), &mut out);
        parser.push_line(&matched("a.rs", 4, "TODO", 0, 4), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_bytes_payload_decoded() {
        // "caf\xe9 TODO\n"
        let line = r#"{"type":"match","data":{"path":{"text":"latin1.txt"},"lines":{"bytes":"Y2Fm6SBUT0RPCg=="},"line_number":1,"absolute_offset":0,"submatches":[{"match":{"text":"TODO"},"start":5,"end":9}]}}"#;
        let out = parse(&[line.to_string()], 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].line_content, "caf\u{FFFD} TODO");
        assert_eq!(out[0].matched_text(), Some("TODO"));
        assert_eq!((out[0].match_start, out[0].match_end), (7, 11));
    }

    #[test]
    fn test_bytes_payload_with_several_invalid_runs() {
        // "\xff\xfe a\xc3 login() \xe9\n", match on "login" at raw 6..11
        let line = r#"{"type":"match","data":{"path":{"text":"mixed.txt"},"lines":{"bytes":"//4gYcMgbG9naW4oKSDpCg=="},"line_number":3,"absolute_offset":0,"submatches":[{"match":{"text":"login"},"start":6,"end":11}]}}"#;
        let out = parse(&[line.to_string()], 0);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].matched_text(), Some("login"));
        assert!(out[0].line_content.is_char_boundary(out[0].match_end));
    }

    #[test]
    fn test_span_never_splits_a_character() {
        assert_eq!(clamp_span("é x", 1, 3), (0, 3));
        assert_eq!(clamp_span("abc", 2, 10), (2, 3));
        assert_eq!(clamp_span("abc", 5, 1), (1, 1));
    }

    #[test]
    fn test_garbage_and_summary_ignored() {
        let lines = vec![
            "not json".to_string(),
            r#"{"type":"summary","data":{"elapsed_total":{"secs":0,"nanos":1}}}"#.to_string(),
        ];
        assert!(parse(&lines, 2).is_empty());
    }
}
