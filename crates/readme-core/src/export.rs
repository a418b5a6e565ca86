use crate::error::Result;
use crate::io;
use std::path::Path;

pub const README_FILENAME: &str = "README.md";
pub const MARKDOWN_MIME: &str = "text/markdown";

/// `Content-Disposition` value offering `file_name` as a download.
pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{}\"", file_name.replace('"', ""))
}

/// Write a generated document, ending it with a single newline.
pub fn write_markdown(path: &Path, text: &str) -> Result<()> {
    let mut data = text.trim_end().to_string();
    data.push('\n');
    io::atomic_write(path, data.as_bytes())
}
