use crate::LoaderError;

#[cfg(feature = "pdf")]
pub(crate) fn pdf_text(bytes: &[u8]) -> Result<String, LoaderError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|err| LoaderError::Pdf(err.to_string()))
}

#[cfg(not(feature = "pdf"))]
pub(crate) fn pdf_text(_bytes: &[u8]) -> Result<String, LoaderError> {
    Err(LoaderError::FeatureDisabled("pdf"))
}

/// One `"<header>: <value>\n"` block per data row.
pub(crate) fn csv_rows(bytes: &[u8]) -> Result<Vec<String>, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut content = String::new();
        for (column, header) in headers.iter().enumerate() {
            let value = record.get(column).unwrap_or_default().trim();
            content.push_str(&format!("{header}: {value}\n"));
        }
        rows.push(content);
    }
    Ok(rows)
}

pub(crate) fn json_pretty(bytes: &[u8]) -> Result<String, LoaderError> {
    let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes);
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub(crate) fn utf8_text(bytes: &[u8]) -> Result<String, LoaderError> {
    Ok(std::str::from_utf8(bytes)?.to_string())
}
