//! Plain-text table rendering for the terminal.

use std::io::{self, Write};

use console::Style;
use tabula_table::{MessageLevel, TableView};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cells wider than this are truncated with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 40;

/// Output styles. Plain styles print text unchanged.
#[derive(Debug, Clone)]
pub struct Styles {
    header: Style,
    rule: Style,
    footer: Style,
    warning: Style,
    error: Style,
}

impl Styles {
    pub fn new(color: bool) -> Self {
        if !color {
            return Styles::plain();
        }
        Styles {
            header: Style::new().bold().cyan().force_styling(true),
            rule: Style::new().dim().force_styling(true),
            footer: Style::new().dim().force_styling(true),
            warning: Style::new().yellow().force_styling(true),
            error: Style::new().red().bold().force_styling(true),
        }
    }

    pub fn plain() -> Self {
        Styles {
            header: Style::new(),
            rule: Style::new(),
            footer: Style::new(),
            warning: Style::new(),
            error: Style::new(),
        }
    }
}

/// Truncates to a display width, ending with `…` when shortened.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > limit {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Pads to a display width with trailing spaces.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}

/// Writes a table page: optional top controls, header, rows, bottom
/// controls, then messages.
pub fn write_table(out: &mut dyn Write, view: &TableView, styles: &Styles) -> io::Result<()> {
    let headers: Vec<String> = view
        .headers
        .iter()
        .map(|h| truncate_to_width(&h.label, MAX_CELL_WIDTH))
        .collect();
    let rows: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|c| truncate_to_width(c, MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.width())
                .fold(h.width(), usize::max)
        })
        .collect();
    let gap = " ".repeat(view.density.column_gap());

    if view.pagination_position.shows_top() {
        writeln!(out, "{}", styles.footer.apply_to(controls_line(view)))?;
    }

    let header_line = join_padded(&headers, &widths, &gap);
    writeln!(out, "{}", styles.header.apply_to(header_line.trim_end()))?;
    let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    writeln!(out, "{}", styles.rule.apply_to(rule.join(&gap)))?;

    if rows.is_empty() {
        writeln!(out, "No matching records.")?;
    }
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            for _ in 0..view.density.row_padding() {
                writeln!(out)?;
            }
        }
        writeln!(out, "{}", join_padded(row, &widths, &gap).trim_end())?;
    }

    if view.pagination_position.shows_bottom() {
        writeln!(out, "{}", styles.footer.apply_to(controls_line(view)))?;
    }

    for message in &view.messages {
        let style = match message.level {
            MessageLevel::Info => &styles.footer,
            MessageLevel::Warning => &styles.warning,
            MessageLevel::Error => &styles.error,
        };
        writeln!(out, "{}", style.apply_to(format!("{}: {}", message.level, message.text)))?;
    }
    Ok(())
}

fn join_padded(cells: &[String], widths: &[usize], gap: &str) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_to_width(cell, *width))
        .collect::<Vec<_>>()
        .join(gap)
}

fn controls_line(view: &TableView) -> String {
    let p = &view.pagination;
    let mut line = format!("Page {} of {}  {}", p.page, p.total_pages, view.summary);
    if p.has_prev {
        line.push_str("  [prev]");
    }
    if p.has_next {
        line.push_str("  [next]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_query::{ColumnDescriptor, ColumnRegistry, QueryResult, Record};
    use tabula_table::{Density, PaginationPosition, TablePresentationConfig};

    fn view(config: &TablePresentationConfig) -> TableView {
        let registry = ColumnRegistry::new([
            ColumnDescriptor::new("name", "Name"),
            ColumnDescriptor::new("city", "City"),
        ])
        .unwrap();
        let result = QueryResult {
            records: vec![
                Record::new().with("name", "Zoë").with("city", "Kraków"),
                Record::new().with("name", "Bartholomew").with("city", "東京"),
            ],
            total: 7,
            diagnostics: Vec::new(),
        };
        TableView::project(&result, config, &registry, 1)
    }

    fn render(config: &TablePresentationConfig) -> String {
        let mut out = Vec::new();
        write_table(&mut out, &view(config), &Styles::plain()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("Hello", 10), "Hello");
        assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
        assert_eq!(truncate_to_width("東京都庁", 5), "東京…");
    }

    #[test]
    fn pads_wide_characters() {
        assert_eq!(pad_to_width("東京", 6), "東京  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }

    #[test]
    fn aligns_columns() {
        let text = render(&TablePresentationConfig::default().items_per_page(2));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name         City");
        assert_eq!(lines[2], "Zoë          Kraków");
        assert_eq!(lines[3], "Bartholomew  東京");
        assert_eq!(lines[4], "Page 1 of 4  Showing 1-2 of 7  [next]");
    }

    #[test]
    fn pagination_position_and_density() {
        let config = TablePresentationConfig::default()
            .items_per_page(2)
            .pagination_position(PaginationPosition::Both)
            .density(Density::Spacious);
        let text = render(&config);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Page 1 of 4"));
        assert_eq!(lines[1], "Name           City");
        assert_eq!(lines[4], "");
        assert!(lines.last().unwrap().starts_with("Page 1 of 4"));

        let hidden = render(
            &TablePresentationConfig::default().pagination_position(PaginationPosition::None),
        );
        assert!(!hidden.contains("Page "));
    }
}
