//! Generic screen renderer
//!
//! Draws any [`ScreenView`] as a centred column of controls, sized by the
//! scaled [`LayoutMetrics`], plus the status window and dialog overlays.

use super::{ControlId, ControlKind, Dialog, DialogKind, Element, ScreenView, StatusWindow};
use crate::layout::LayoutMetrics;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Everything the renderer needs besides the view itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub metrics: LayoutMetrics,
    /// Glyph drawn in front of every back button, empty for none
    pub back_glyph: &'a str,
    pub status: Option<&'a StatusWindow>,
    pub dialog: Option<&'a Dialog>,
}

/// Render the active screen and any open overlay
pub fn render_screen(f: &mut Frame, view: &ScreenView, ctx: &RenderContext) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(ctx.metrics.margin)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Controls
            Constraint::Length(3), // Help text
        ])
        .split(size);

    render_title(f, view.title(), chunks[0]);
    render_controls(f, view, ctx, chunks[1]);
    render_help(f, view, chunks[2]);

    if let Some(status) = ctx.status {
        render_status_window(f, status, &ctx.metrics, size);
    }
    if let Some(dialog) = ctx.dialog {
        render_dialog(f, dialog, &ctx.metrics, size);
    }
}

fn render_title(f: &mut Frame, title: &str, area: Rect) {
    let title = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(title, area);
}

fn render_controls(f: &mut Frame, view: &ScreenView, ctx: &RenderContext, area: Rect) {
    let mut constraints = Vec::with_capacity(view.elements().len() * 2 + 1);
    for i in 0..view.elements().len() {
        if i > 0 {
            constraints.push(Constraint::Length(ctx.metrics.spacing));
        }
        constraints.push(Constraint::Length(ctx.metrics.control_height));
    }
    constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, element) in view.elements().iter().enumerate() {
        let focused = i == view.focus_index();
        let style = if focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };

        let text = control_text(element, ctx.back_glyph, focused);
        let paragraph = Paragraph::new(text)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));

        // every second row is a spacer
        let row = rows[i * 2];
        f.render_widget(paragraph, centered_width(ctx.metrics.button_width, row));
    }
}

/// The text drawn inside a control
pub fn control_text(element: &Element, back_glyph: &str, focused: bool) -> String {
    let spec = element.spec();
    match &spec.kind {
        ControlKind::Button if spec.id == ControlId::Back && !back_glyph.is_empty() => {
            format!("{} {}", back_glyph, spec.label)
        }
        ControlKind::Button => spec.label.to_string(),
        ControlKind::Dropdown { .. } => {
            format!("{}: ◀ {} ▶", spec.label, element.value().unwrap_or_default())
        }
        ControlKind::TextInput { .. } => format!(
            "{}: {}{}",
            spec.label,
            element.value().unwrap_or_default(),
            if focused { "_" } else { "" }
        ),
    }
}

fn render_help(f: &mut Frame, view: &ScreenView, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let mut spans = Vec::new();
    if let Some(element) = view.focused() {
        spans.push(Span::styled(
            element.spec().hint,
            Style::default().fg(Color::White),
        ));
        spans.push(Span::raw("  |  "));
    }
    spans.extend([
        Span::styled("↑↓", key_style),
        Span::raw(" Выбор  "),
        Span::styled("Enter", key_style),
        Span::raw(" Нажать  "),
        Span::styled("Esc", key_style),
        Span::raw(" Назад"),
    ]);

    let help = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    f.render_widget(help, area);
}

fn render_status_window(f: &mut Frame, status: &StatusWindow, metrics: &LayoutMetrics, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            status.request().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(
        status
            .history()
            .iter()
            .map(|s| Line::from(format!("• {}", s.label()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(if status.is_cancel_requested() {
        "Отмена...".to_string()
    } else {
        format!(
            "{}  |  Esc отменить",
            humantime::format_duration(std::time::Duration::from_secs(
                status.elapsed().as_secs()
            ))
        )
    }));

    let height = lines.len() as u16 + 2;
    let popup = popup_rect(metrics.status_width, height, area);

    let window = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title("Создание файла")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(window, popup);
}

fn render_dialog(f: &mut Frame, dialog: &Dialog, metrics: &LayoutMetrics, area: Rect) {
    let color = match dialog.kind {
        DialogKind::Info => Color::Cyan,
        DialogKind::Error => Color::Red,
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            dialog.message.as_str(),
            Style::default().fg(color),
        )),
        Line::from(""),
        Line::from("Enter закрыть"),
    ];
    let popup = popup_rect(metrics.status_width, lines.len() as u16 + 2, area);

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(dialog.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
    );

    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);
}

/// Horizontally centre a column of at most `width` cells inside `r`
fn centered_width(width: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        width,
        ..r
    }
}

/// A `width` x `height` rectangle centred in `r`, clipped to it
fn popup_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionStatus, FileCreationRequest};
    use crate::app::screens::descriptor;
    use crate::app::state::Screen;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(view: &ScreenView, ctx: &RenderContext) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| render_screen(f, view, ctx)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    fn ctx<'a>() -> RenderContext<'a> {
        RenderContext {
            metrics: LayoutMetrics::default(),
            back_glyph: "",
            status: None,
            dialog: None,
        }
    }

    #[test]
    fn test_renders_every_control_label() {
        for screen in Screen::all() {
            let d = descriptor(screen);
            let view = ScreenView::build(&d, None);
            let text = draw(&view, &ctx());

            assert!(text.contains(d.title));
            for control in &d.controls {
                assert!(text.contains(control.label), "{} missing on {}", control.label, screen);
            }
        }
    }

    #[test]
    fn test_back_glyph_prefix() {
        let view = ScreenView::build(&descriptor(Screen::ComparisonOptions), None);
        let mut context = ctx();
        context.back_glyph = "<-";
        assert!(draw(&view, &context).contains("<- Назад"));
    }

    #[test]
    fn test_status_window_overlay() {
        let view = ScreenView::build(&descriptor(Screen::CreateFileOptions), None);
        let mut window = StatusWindow::open(
            1,
            FileCreationRequest::new("Версия 1", "Подверсия 1.1", "2024-01-01"),
        );
        window.push(ActionStatus::Started);
        window.push(ActionStatus::InProgress);

        let mut context = ctx();
        context.status = Some(&window);
        let text = draw(&view, &context);
        assert!(text.contains("Начато"));
        assert!(text.contains("В процессе..."));
    }

    #[test]
    fn test_dialog_overlay() {
        let view = ScreenView::build(&descriptor(Screen::MainMenu), None);
        let dialog = Dialog::error("Ошибка", "Что-то пошло не так");
        let mut context = ctx();
        context.dialog = Some(&dialog);
        assert!(draw(&view, &context).contains("Что-то пошло не так"));
    }

    #[test]
    fn test_centered_width_clips() {
        let r = Rect::new(0, 0, 10, 3);
        assert_eq!(centered_width(40, r), r);
        assert_eq!(centered_width(4, r), Rect::new(3, 0, 4, 3));
    }
}
