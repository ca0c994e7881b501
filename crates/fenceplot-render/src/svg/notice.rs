use super::{SvgRenderOptions, escape_xml, fmt};
use crate::model::Size;
use std::fmt::Write as _;

const PADDING: f64 = 16.0;
const LINE_HEIGHT: f64 = 16.0;
const CHAR_WIDTH: f64 = 7.0;

/// The inline overlay that replaces a block's drawing when its payload cannot be shown.
///
/// `title` is optional because malformed plot payloads only carry a one-line notice, while board
/// failures show a titled alert with the interpreter's raw message underneath.
pub fn render_notice_svg(
    title: Option<&str>,
    message: &str,
    size: Size,
    options: &SvgRenderOptions,
) -> String {
    let id = escape_xml(options.id());
    let width = size.width.max(PADDING * 4.0);
    let columns = ((width - PADDING * 2.0) / CHAR_WIDTH).floor().max(8.0) as usize;
    let lines = wrap_words(message, columns);
    let text_lines = lines.len() + usize::from(title.is_some());
    let height = size
        .height
        .max(PADDING * 2.0 + text_lines as f64 * LINE_HEIGHT);

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r##"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="alert" aria-roledescription="notice"><rect x="0.5" y="0.5" width="{rw}" height="{rh}" rx="6" fill="#fef2f2" stroke="#dc2626"/>"##,
        w = fmt(width),
        h = fmt(height),
        rw = fmt(width - 1.0),
        rh = fmt(height - 1.0),
    );

    let mut y = PADDING + 12.0;
    if let Some(title) = title {
        let _ = write!(
            &mut out,
            r##"<text x="{x}" y="{y}" font-size="13" font-weight="600" fill="#991b1b">{t}</text>"##,
            x = fmt(PADDING),
            y = fmt(y),
            t = escape_xml(title)
        );
        y += LINE_HEIGHT;
    }
    for line in &lines {
        let _ = write!(
            &mut out,
            r##"<text x="{x}" y="{y}" font-size="12" font-family="ui-monospace, monospace" fill="#b91c1c">{t}</text>"##,
            x = fmt(PADDING),
            y = fmt(y),
            t = escape_xml(line)
        );
        y += LINE_HEIGHT;
    }
    out.push_str("</svg>\n");
    out
}

/// Greedy word wrap; words longer than a line are hard-split.
fn wrap_words(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > columns {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                let split = word
                    .char_indices()
                    .nth(columns)
                    .map_or(word.len(), |(i, _)| i);
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > columns {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
