use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{PredictorError, Result};

pub const REPORT_TITLE: &str = "Sleep Disorder Prediction Result";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
/// Average Helvetica glyph width at 12pt, used for wrapping and centering.
const CHAR_WIDTH_MM: f32 = 2.3;

const CHARS_PER_LINE: usize = ((PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / CHAR_WIDTH_MM) as usize;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub centered: bool,
}

/// Report text split into pages of wrapped lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    pages: Vec<Vec<Line>>,
}

impl ReportLayout {
    pub fn build(name: &str, label: &str, advice: &str) -> Self {
        let mut lines = vec![
            Line {
                text: REPORT_TITLE.to_string(),
                centered: true,
            },
            Line {
                text: String::new(),
                centered: false,
            },
        ];
        let body = format!("Name: {}\nResult: {}\n\nAdvice:\n{}", name, label, advice);
        for paragraph in printable_ascii(&body).lines() {
            lines.extend(wrap(paragraph.trim_end(), CHARS_PER_LINE).into_iter().map(|text| Line {
                text,
                centered: false,
            }));
        }

        let pages = lines
            .chunks(LINES_PER_PAGE)
            .map(<[Line]>::to_vec)
            .collect();
        ReportLayout { pages }
    }

    pub fn pages(&self) -> &[Vec<Line>] {
        &self.pages
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.pages.iter().flatten()
    }

    pub fn render(&self, file: File) -> Result<()> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            REPORT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PredictorError::Report(format!("{:?}", e)))?;

        let mut first = Some((first_page, first_layer));
        for page_lines in &self.pages {
            let (page, layer) = match first.take() {
                Some(indices) => indices,
                None => doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"),
            };
            let canvas = doc.get_page(page).get_layer(layer);
            for (row, line) in page_lines.iter().enumerate() {
                let y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM * (row as f32 + 1.0);
                let x = if line.centered {
                    ((PAGE_WIDTH_MM - line.text.len() as f32 * CHAR_WIDTH_MM) / 2.0).max(MARGIN_MM)
                } else {
                    MARGIN_MM
                };
                canvas.use_text(line.text.as_str(), FONT_SIZE_PT, Mm(x), Mm(y), &font);
            }
        }

        doc.save(&mut BufWriter::new(file))
            .map_err(|e| PredictorError::Report(format!("{:?}", e)))
    }
}

/// Writes a fresh `sleep-report-*.pdf` in `dir` and returns its path.
pub fn generate_report(dir: &Path, name: &str, label: &str, advice: &str) -> Result<PathBuf> {
    let layout = ReportLayout::build(name, label, advice);

    let (file, path) = tempfile::Builder::new()
        .prefix("sleep-report-")
        .suffix(".pdf")
        .tempfile_in(dir)?
        .keep()
        .map_err(|e| e.error)?;

    if let Err(e) = layout.render(file) {
        let _ = std::fs::remove_file(&path);
        return Err(e);
    }

    let bytes = std::fs::metadata(&path)?.len();
    info!(path = %path.display(), bytes, pages = layout.pages.len(), "report written");
    Ok(path)
}

/// Keeps printable ASCII and line breaks; everything else is dropped.
pub fn printable_ascii(text: &str) -> String {
    text.chars()
        .filter(|c| *c == '\n' || (' '..='~').contains(c))
        .collect()
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split(' ') {
        let mut word = word;
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let (head, tail) = word.split_at(width);
            lines.push(head.to_string());
            word = tail;
        }
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);
    lines
}
