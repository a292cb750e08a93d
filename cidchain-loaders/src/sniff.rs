pub const MIME_EMPTY: &str = "application/x-empty";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_JSON: &str = "application/json";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_TEXT: &str = "text/plain";

const CSV_MIN_ROWS: usize = 3;
const CSV_SNIFF_ROWS: usize = 10;

/// Guesses a MIME type from raw content.
///
/// Binary formats are recognised by their magic bytes. Anything else must be UTF-8 and is
/// classified as JSON, CSV or plain text, in that order. CSV needs at least three
/// rows of equal width among the first ten.
pub fn detect_file_type(bytes: &[u8]) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }
    if bytes.is_empty() {
        return MIME_EMPTY.to_string();
    }
    let Ok(text) = std::str::from_utf8(bytes) else {
        return MIME_OCTET_STREAM.to_string();
    };

    if looks_like_json(text) {
        MIME_JSON.to_string()
    } else if looks_like_csv(text) {
        MIME_CSV.to_string()
    } else {
        MIME_TEXT.to_string()
    }
}

fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

fn looks_like_csv(text: &str) -> bool {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut width = None;
    let mut rows = 0;
    for record in reader.records().take(CSV_SNIFF_ROWS) {
        let Ok(record) = record else {
            return false;
        };
        match width {
            None if record.len() < 2 => return false,
            None => width = Some(record.len()),
            Some(width) if width != record.len() => return false,
            Some(_) => {}
        }
        rows += 1;
    }
    rows >= CSV_MIN_ROWS
}
