use crossterm::style::{ContentStyle, StyledContent};
use formbind::{
    CheckboxView, Control, ControlView, SelectItem, SelectView, SliderView, SwitchView,
    value::format_number,
};
use unicode_width::UnicodeWidthStr;

use crate::{error::TuiError, theme::Theme};

/// Represents a fully resolved frame ready to be drawn to the terminal.
#[derive(Debug, Default, Clone)]
pub struct RenderFrame {
    lines: Vec<RenderLine>,
}

impl RenderFrame {
    /// Appends an empty line and returns it for filling.
    pub fn push_line(&mut self) -> &mut RenderLine {
        self.lines.push(RenderLine::default());
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    /// Returns the set of lines recorded in this frame.
    #[must_use]
    pub fn lines(&self) -> &[RenderLine] {
        &self.lines
    }

    /// Appends every line of `other`.
    pub fn extend(&mut self, other: Self) {
        self.lines.extend(other.lines);
    }

    /// The frame's text without styling, lines joined by `\n`.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(RenderLine::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Representation of a single line in the terminal output.
#[derive(Debug, Default, Clone)]
pub struct RenderLine {
    segments: Vec<RenderSegment>,
}

impl RenderLine {
    /// Pushes a new segment onto the line.
    pub fn push(&mut self, segment: RenderSegment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    /// Returns the list of segments contained in this line.
    #[must_use]
    pub fn segments(&self) -> &[RenderSegment] {
        &self.segments
    }

    /// The line's text without styling.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(RenderSegment::content).collect()
    }
}

/// Atomic piece of content rendered on a line.
#[derive(Debug, Clone)]
pub struct RenderSegment {
    content: String,
    style: ContentStyle,
}

impl RenderSegment {
    /// Creates a plain (unstyled) segment.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, ContentStyle::new())
    }

    /// Creates a segment with custom styling.
    pub fn styled(content: impl Into<String>, style: ContentStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    /// Borrows the raw text stored in this segment.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The segment's style.
    #[must_use]
    pub const fn style(&self) -> ContentStyle {
        self.style
    }

    /// Converts this segment into a [`StyledContent`] for printing through crossterm.
    #[must_use]
    pub fn as_styled_content(&self) -> StyledContent<String> {
        self.style.apply(self.content.clone())
    }
}

const FOCUS_MARKER: &str = "› ";
const BLANK_MARKER: &str = "  ";

/// Turns rendered control views into terminal frames.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    theme: Theme,
}

impl Renderer {
    /// Creates a renderer drawing with `theme`.
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// The theme in use.
    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Renders every control, marking the one at `focus`.
    ///
    /// # Errors
    ///
    /// Returns the first control's binding error; nothing is drawn for a form
    /// with a broken control.
    pub fn render_controls(
        &self,
        controls: &[&mut dyn Control],
        focus: Option<usize>,
    ) -> Result<RenderFrame, TuiError> {
        let views = controls
            .iter()
            .map(|control| control.view())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.render_views(&views, focus))
    }

    /// Renders a list of views with aligned labels, marking the one at `focus`.
    #[must_use]
    pub fn render_views(&self, views: &[ControlView], focus: Option<usize>) -> RenderFrame {
        let width = views
            .iter()
            .filter(|view| !matches!(view, ControlView::Slider(_)))
            .map(|view| view.label().width())
            .max()
            .unwrap_or(0);
        let mut frame = RenderFrame::default();
        for (index, view) in views.iter().enumerate() {
            frame.extend(self.render_view(view, focus == Some(index), width));
        }
        frame
    }

    /// Renders a single view.
    #[must_use]
    pub fn render(&self, view: &ControlView, focused: bool) -> RenderFrame {
        self.render_view(view, focused, view.label().width())
    }

    fn render_view(&self, view: &ControlView, focused: bool, label_width: usize) -> RenderFrame {
        let mut frame = RenderFrame::default();
        let styles = Styles::new(&self.theme, focused, view.is_disabled());
        let line = frame.push_line();
        line.push(RenderSegment::styled(
            if focused { FOCUS_MARKER } else { BLANK_MARKER },
            styles.label,
        ));
        match view {
            ControlView::Checkbox(view) => Self::render_checkbox(line, &styles, view, label_width),
            ControlView::Switch(view) => Self::render_switch(line, &styles, view, label_width),
            ControlView::Select(view) => Self::render_select(line, &styles, view, label_width),
            ControlView::Slider(view) => {
                line.push(RenderSegment::styled(view.caption.clone(), styles.label));
                let track = frame.push_line();
                self.render_track(track, &styles, view);
            }
        }
        frame
    }

    fn render_checkbox(line: &mut RenderLine, styles: &Styles, view: &CheckboxView, width: usize) {
        let mark = if view.checked { "[x]" } else { "[ ]" };
        line.push(RenderSegment::styled(pad(&view.label, width), styles.label))
            .push(RenderSegment::plain(" "))
            .push(RenderSegment::styled(mark, styles.value));
    }

    fn render_switch(line: &mut RenderLine, styles: &Styles, view: &SwitchView, width: usize) {
        let mark = if view.checked { "[ ON]" } else { "[OFF]" };
        line.push(RenderSegment::styled(pad(&view.label, width), styles.label))
            .push(RenderSegment::plain(" "))
            .push(RenderSegment::styled(mark, styles.value));
    }

    fn render_select(line: &mut RenderLine, styles: &Styles, view: &SelectView, width: usize) {
        let shown = view.selected_item().map_or_else(
            || view.selected.clone(),
            |item| {
                if item.is_none {
                    SelectItem::NONE_LABEL.to_owned()
                } else {
                    item.label.clone()
                }
            },
        );
        line.push(RenderSegment::styled(pad(&view.label, width), styles.label))
            .push(RenderSegment::plain(" "))
            .push(RenderSegment::styled(format!("‹ {shown} ›"), styles.value));
    }

    fn render_track(&self, line: &mut RenderLine, styles: &Styles, view: &SliderView) {
        let cells = self.theme.track_width.max(2);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let knob = (view.fraction() * (cells - 1) as f64).round() as usize;
        let track: String = (0..cells)
            .map(|cell| match cell.cmp(&knob) {
                core::cmp::Ordering::Less => '=',
                core::cmp::Ordering::Equal => '●',
                core::cmp::Ordering::Greater => '-',
            })
            .collect();
        line.push(RenderSegment::plain(BLANK_MARKER))
            .push(RenderSegment::styled(format_number(view.min), styles.label))
            .push(RenderSegment::plain(" ["))
            .push(RenderSegment::styled(track, styles.value))
            .push(RenderSegment::plain("] "))
            .push(RenderSegment::styled(format_number(view.max), styles.label));
    }
}

/// Resolved styles for one control.
struct Styles {
    label: ContentStyle,
    value: ContentStyle,
}

impl Styles {
    fn new(theme: &Theme, focused: bool, disabled: bool) -> Self {
        let mut label = theme.label;
        let mut value = theme.value;
        if disabled {
            label = theme.disabled;
            value = theme.disabled;
        }
        if focused {
            label = overlay(label, theme.focused);
            value = overlay(value, theme.focused);
        }
        Self { label, value }
    }
}

fn overlay(base: ContentStyle, top: ContentStyle) -> ContentStyle {
    let mut style = base;
    if top.foreground_color.is_some() {
        style.foreground_color = top.foreground_color;
    }
    if top.background_color.is_some() {
        style.background_color = top.background_color;
    }
    style.attributes = base.attributes | top.attributes;
    style
}

/// Pads `label` with spaces to `width` terminal cells.
fn pad(label: &str, width: usize) -> String {
    let fill = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbind::{CheckboxControl, DropDownControl, SliderControl, SwitchControl};
    use serde_json::json;

    fn plain() -> Renderer {
        Renderer::new(Theme::plain().with_track_width(5))
    }

    #[test]
    fn renders_each_kind() {
        let controls = json!({ "muted": true, "legato": false, "wave": "saw", "gain": 5 });
        let mut checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| {});
        let mut switch = SwitchControl::new(&controls, "legato", |_: &String, _| {});
        let mut dropdown =
            DropDownControl::new(&controls, "wave", [("sine", "Sine"), ("saw", "Saw")], |_: &String, _| {});
        let mut slider = SliderControl::new(&controls, "gain", 0.0, 10.0, |_: &String, _| {});
        let form: [&mut dyn Control; 4] = [&mut checkbox, &mut switch, &mut dropdown, &mut slider];

        let frame = plain().render_controls(&form, Some(0)).unwrap();
        assert_eq!(
            frame.plain_text(),
            "› muted  [x]\n  legato [OFF]\n  wave   ‹ Saw ›\n  gain: 5\n  0 [==●--] 10"
        );
    }

    #[test]
    fn none_item_and_unmatched_selection() {
        let absent = json!({});
        let view = DropDownControl::new(&absent, "wave", [("sine", "Sine")], |_: &String, _| {})
            .none_option(true)
            .render()
            .unwrap();
        let frame = plain().render(&view.into(), false);
        assert_eq!(frame.plain_text(), "  wave ‹ None ›");

        let numeric = json!({ "wave": 3 });
        let view = DropDownControl::new(&numeric, "wave", [("sine", "Sine")], |_: &String, _| {})
            .render()
            .unwrap();
        assert_eq!(plain().render(&view.into(), false).plain_text(), "  wave ‹ 3 ›");
    }

    #[test]
    fn broken_control_fails_the_frame() {
        let controls = json!({ "muted": 1 });
        let mut checkbox = CheckboxControl::new(&controls, "muted", |_: &String, _| {});
        let form: [&mut dyn Control; 1] = [&mut checkbox];
        assert!(matches!(
            plain().render_controls(&form, None),
            Err(TuiError::Bind(_))
        ));
    }

    #[test]
    fn labels_pad_by_display_width() {
        assert_eq!(pad("音量", 6), "音量  ");
        assert_eq!(pad("gain", 2), "gain");
    }
}
