use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::color::{Hex, Rgb};

use super::{Row, Status};

fn to_color(c: &Hex) -> Color {
    let [r, g, b] = c.rgb().channels();
    Color::Rgb(r, g, b)
}

/// Choose black or white foreground for readable text on the given background.
fn contrast_fg(c: &Hex) -> Color {
    if c.relative_luminance() > 0.4 {
        Color::Black
    } else {
        Color::White
    }
}

fn row_line(row: &Row, is_selected: bool) -> Line<'static> {
    let mut line = match row {
        Row::Section(section) => Line::from(Span::styled(
            section.name(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Row::Category {
            name,
            len,
            expanded,
            ..
        } => {
            let marker = if *expanded { "▾" } else { "▸" };
            Line::from(vec![
                Span::raw(format!("  {marker} {name} ")),
                Span::styled(format!("({len})"), Style::default().fg(Color::DarkGray)),
            ])
        }
        Row::Color { color, .. } => Line::from(vec![
            Span::raw("      "),
            Span::styled(
                "  ",
                Style::default().bg(to_color(color)).fg(contrast_fg(color)),
            ),
            Span::raw(format!(" {color}")),
        ]),
        Row::Action { label, .. } => Line::from(Span::styled(
            format!("  + {label}"),
            Style::default().fg(Color::Green),
        )),
    };
    if is_selected {
        line = line.patch_style(Style::default().add_modifier(Modifier::REVERSED));
    }
    line
}

/// The collapsible tree of both sections. Scrolls to keep the selected row
/// visible.
pub struct PanelWidget<'a> {
    rows: &'a [Row],
    selected: usize,
}

impl<'a> PanelWidget<'a> {
    pub fn new(rows: &'a [Row], selected: usize) -> Self {
        Self { rows, selected }
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Colors");
        let inner = block.inner(area);
        block.render(area, buf);

        let height = usize::from(inner.height).max(1);
        let offset = (self.selected + 1).saturating_sub(height);
        let lines: Vec<Line> = self
            .rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, row)| row_line(row, i == self.selected))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Readout for the selected color: channels, luminance, Oklch, and contrast
/// against the primary.
pub struct DetailWidget<'a> {
    color: Option<&'a Hex>,
    primary: Option<&'a Hex>,
}

impl<'a> DetailWidget<'a> {
    pub fn new(color: Option<&'a Hex>, primary: Option<&'a Hex>) -> Self {
        Self { color, primary }
    }
}

impl Widget for DetailWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered().title("Details");
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(color) = self.color else {
            Paragraph::new(Line::from(Span::styled(
                "  a add  d delete  s scan  g generate  r reset  q quit",
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf);
            return;
        };

        let rgb = color.rgb();
        let oklch = rgb.to_oklch();
        let hue: f32 = oklch.hue.into_positive_degrees();
        let mut first = vec![
            Span::styled(
                format!("  {color}  "),
                Style::default().bg(to_color(color)).fg(contrast_fg(color)),
            ),
            Span::raw(format!(
                "  rgb({}, {}, {})  luminance {:.4}",
                rgb.r,
                rgb.g,
                rgb.b,
                rgb.relative_luminance()
            )),
        ];
        if let Some(primary) = self.primary {
            let ratio = Rgb::contrast_ratio(rgb, primary.rgb());
            first.push(Span::raw(format!("  contrast vs {primary} {ratio:.1}:1")));
        }
        let second = Line::from(Span::raw(format!(
            "  oklch L {:.3}  C {:.3}  H {hue:.1}°",
            oklch.l, oklch.chroma
        )));

        Paragraph::new(vec![Line::from(first), second]).render(inner, buf);
    }
}

/// Single line with the active prompt or the last message.
pub struct StatusWidget<'a> {
    prompt: Option<String>,
    status: Option<&'a Status>,
}

impl<'a> StatusWidget<'a> {
    pub fn new(prompt: Option<String>, status: Option<&'a Status>) -> Self {
        Self { prompt, status }
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match (self.prompt, self.status) {
            (Some(prompt), _) => Line::from(Span::styled(
                prompt,
                Style::default().fg(Color::Yellow),
            )),
            (None, Some(status)) => {
                let fg = if status.is_error {
                    Color::Red
                } else {
                    Color::Cyan
                };
                Line::from(Span::styled(status.message.clone(), Style::default().fg(fg)))
            }
            (None, None) => Line::default(),
        };
        Paragraph::new(line).render(area, buf);
    }
}
