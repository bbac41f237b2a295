use base64::Engine;
use std::path::Path;

use crate::error::Result;

pub const DEFAULT_LINK_LABEL: &str = "Download PDF Result";

/// Inline download hyperlink carrying the whole report as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    pub file_name: String,
    pub label: String,
}

impl DownloadLink {
    pub fn to_html(&self) -> String {
        format!(
            "<a href=\"{}\" download=\"{}\">{}</a>",
            self.href,
            escape_html(&self.file_name),
            escape_html(&self.label)
        )
    }

    /// Minimal standalone page holding the link, for opening in a browser.
    pub fn write_page(&self, path: &Path) -> Result<()> {
        let page = format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(&self.label),
            self.to_html()
        );
        std::fs::write(path, page)?;
        Ok(())
    }
}

pub fn download_link(path: &Path, label: &str) -> Result<DownloadLink> {
    let bytes = std::fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(DownloadLink {
        href: format!("data:application/octet-stream;base64,{}", encoded),
        file_name,
        label: label.to_string(),
    })
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
