use super::options::DialogOptions;

/// Presentation context a dialog is shown in.
///
/// Each controller owns its host, so any number of dialogs can be alive at once.
pub trait DialogHost {
    fn show(&mut self, options: &DialogOptions) {
        let _ = options;
    }

    fn set_confirm_enabled(&mut self, enabled: bool);

    /// Tears down whatever `show` put up. Called once, when the dialog closes.
    fn hide(&mut self);
}

/// Host with no output that only records what it was told. Useful for tests and for driving a
/// dialog from code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessHost {
    pub title: Option<String>,
    pub visible: bool,
    pub confirm_enabled: bool,
    pub enable_toggles: usize,
    pub hide_calls: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DialogHost for HeadlessHost {
    fn show(&mut self, options: &DialogOptions) {
        self.title = Some(options.title.to_string());
        self.visible = true;
    }

    fn set_confirm_enabled(&mut self, enabled: bool) {
        if self.confirm_enabled != enabled {
            self.enable_toggles += 1;
        }
        self.confirm_enabled = enabled;
    }

    fn hide(&mut self) {
        self.visible = false;
        self.hide_calls += 1;
    }
}

impl<H: DialogHost + ?Sized> DialogHost for &mut H {
    fn show(&mut self, options: &DialogOptions) {
        (**self).show(options)
    }

    fn set_confirm_enabled(&mut self, enabled: bool) {
        (**self).set_confirm_enabled(enabled)
    }

    fn hide(&mut self) {
        (**self).hide()
    }
}
