use cidchain_loaders::detect_file_type;

#[test]
fn detects_pdf_by_magic_bytes() {
    assert_eq!(detect_file_type(b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n"), "application/pdf");
}

#[test]
fn detects_png_by_magic_bytes() {
    let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    assert_eq!(detect_file_type(&png), "image/png");
}

#[test]
fn detects_json_objects_and_arrays() {
    assert_eq!(detect_file_type(br#"{"a": 1}"#), "application/json");
    assert_eq!(detect_file_type(b"  [1, 2, 3]\n"), "application/json");
}

#[test]
fn broken_json_is_plain_text() {
    assert_eq!(detect_file_type(b"{not json"), "text/plain");
}

#[test]
fn detects_csv_with_consistent_columns() {
    let csv = b"name,age\nada,36\ngrace,45\n";
    assert_eq!(detect_file_type(csv), "text/csv");
}

#[test]
fn ragged_rows_are_plain_text() {
    let text = b"name,age\nthis line has no comma\n";
    assert_eq!(detect_file_type(text), "text/plain");
}

#[test]
fn two_line_note_with_commas_is_plain_text() {
    let note = b"Hi Bob, thanks for the notes\nCheers, Ada\n";
    assert_eq!(detect_file_type(note), "text/plain");
}

#[test]
fn consistency_is_judged_on_leading_rows() {
    let mut text = String::new();
    for row in 0..10 {
        text.push_str(&format!("{row},value\n"));
    }
    text.push_str("trailing prose without separators\n");
    assert_eq!(detect_file_type(text.as_bytes()), "text/csv");
}

#[test]
fn prose_is_plain_text() {
    assert_eq!(detect_file_type(b"hello from ipfs\n"), "text/plain");
}

#[test]
fn empty_and_binary_content() {
    assert_eq!(detect_file_type(b""), "application/x-empty");
    assert_eq!(detect_file_type(&[0x00, 0x9f, 0x92, 0x96]), "application/octet-stream");
}
