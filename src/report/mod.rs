//! PDF report of a prediction and its inline download link.

pub mod link;
pub mod pdf;

pub use link::{download_link, DownloadLink, DEFAULT_LINK_LABEL};
pub use pdf::{generate_report, ReportLayout};
