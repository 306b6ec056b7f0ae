use std::borrow::Cow;

/// Labels and presentation toggles for one dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOptions {
    pub title: Cow<'static, str>,
    pub confirm_label: Cow<'static, str>,
    pub dismiss_label: Cow<'static, str>,
    pub show_help: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        Self {
            title: Cow::Borrowed("Form"),
            confirm_label: Cow::Borrowed("OK"),
            dismiss_label: Cow::Borrowed("Cancel"),
            show_help: true,
        }
    }
}

impl DialogOptions {
    pub fn new(title: impl Into<Cow<'static, str>>) -> Self {
        Self::default().with_title(title)
    }

    pub fn with_title(mut self, title: impl Into<Cow<'static, str>>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_confirm_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn with_dismiss_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.dismiss_label = label.into();
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }
}
