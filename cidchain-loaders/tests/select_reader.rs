use cidchain_loaders::{select_reader, FileType, LoaderError};

#[test]
fn select_reader_matches_pdf_substring() {
    assert_eq!(select_reader("application/pdf").unwrap(), FileType::Pdf);
    assert_eq!(select_reader("application/x-pdf").unwrap(), FileType::Pdf);
}

#[test]
fn select_reader_prefers_csv_over_text() {
    assert_eq!(select_reader("text/csv").unwrap(), FileType::Csv);
    assert_eq!(select_reader("application/csv").unwrap(), FileType::Csv);
}

#[test]
fn select_reader_matches_json_variants() {
    assert_eq!(select_reader("application/json").unwrap(), FileType::Json);
    assert_eq!(select_reader("application/ld+json").unwrap(), FileType::Json);
}

#[test]
fn select_reader_falls_back_to_text() {
    assert_eq!(select_reader("text/plain").unwrap(), FileType::Text);
    assert_eq!(select_reader("text/html; charset=utf-8").unwrap(), FileType::Text);
    assert_eq!(select_reader("TEXT/PLAIN").unwrap(), FileType::Text);
}

#[test]
fn select_reader_rejects_unsupported_types() {
    for mime in ["image/png", "application/octet-stream", "application/x-empty", ""] {
        let err = select_reader(mime).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedFileType(ref m) if m == mime));
    }
    assert_eq!(
        select_reader("image/png").unwrap_err().to_string(),
        "Unsupported file type: image/png"
    );
}
