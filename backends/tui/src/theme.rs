use crossterm::style::{Attribute, Attributes, Color, ContentStyle};

/// Styles and sizes the renderer draws controls with.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Style of labels and captions.
    pub label: ContentStyle,
    /// Style of the value part of a control (box, switch, selection, track).
    pub value: ContentStyle,
    /// Style applied to the focused control's line.
    pub focused: ContentStyle,
    /// Style of disabled controls.
    pub disabled: ContentStyle,
    /// Number of cells between the brackets of a slider track.
    pub track_width: usize,
}

impl Default for Theme {
    fn default() -> Self {
        let mut value = ContentStyle::new();
        value.foreground_color = Some(Color::Cyan);

        let mut focused = ContentStyle::new();
        focused.attributes = Attributes::from(Attribute::Bold);

        let mut disabled = ContentStyle::new();
        disabled.foreground_color = Some(Color::DarkGrey);
        disabled.attributes = Attributes::from(Attribute::Dim);

        Self {
            label: ContentStyle::new(),
            value,
            focused,
            disabled,
            track_width: 24,
        }
    }
}

impl Theme {
    /// A theme without colors or attributes, for dumb terminals and tests.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            label: ContentStyle::new(),
            value: ContentStyle::new(),
            focused: ContentStyle::new(),
            disabled: ContentStyle::new(),
            track_width: 24,
        }
    }

    /// Overrides the slider track width. Values below 2 are raised to 2.
    #[must_use]
    pub fn with_track_width(mut self, width: usize) -> Self {
        self.track_width = width.max(2);
        self
    }

    /// Overrides the style of the focused control.
    #[must_use]
    pub const fn with_focused(mut self, style: ContentStyle) -> Self {
        self.focused = style;
        self
    }

    /// Overrides the style of disabled controls.
    #[must_use]
    pub const fn with_disabled(mut self, style: ContentStyle) -> Self {
        self.disabled = style;
        self
    }
}
