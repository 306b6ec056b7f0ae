use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::dialog::{DialogHost, FormDialogController, Transition};

use super::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Confirm,
    Activate,
    Cancel,
    Dismiss,
    FocusStep(i32),
}

/// What currently receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    ConfirmButton,
    DismissButton,
}

/// Keyboard routing for one terminal dialog: focus movement, text editing of the focused
/// field and the two buttons.
#[derive(Debug, Clone)]
pub struct DialogInput {
    focus: Focus,
    field_count: usize,
}

impl DialogInput {
    pub fn new(field_count: usize) -> Self {
        let focus = if field_count == 0 {
            Focus::ConfirmButton
        } else {
            Focus::Field(0)
        };
        Self { focus, field_count }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn handle_key<H: DialogHost>(
        &mut self,
        key: &KeyEvent,
        dialog: &mut FormDialogController<H>,
    ) -> Transition {
        if key.kind != KeyEventKind::Press {
            return Transition::Ignored;
        }
        if let Some(action) = keymap::classify_key(key) {
            return self.apply_action(action, dialog);
        }
        let Focus::Field(index) = self.focus else {
            return Transition::Ignored;
        };
        let Some(field) = dialog.field(index) else {
            return Transition::Ignored;
        };
        let mut buffer = field.value.to_string();
        if !edit_buffer(&mut buffer, key) {
            return Transition::Ignored;
        }
        dialog.set_value(index, buffer)
    }

    fn apply_action<H: DialogHost>(
        &mut self,
        action: KeyAction,
        dialog: &mut FormDialogController<H>,
    ) -> Transition {
        match action {
            KeyAction::Confirm => dialog.confirm(),
            KeyAction::Cancel => dialog.cancel(),
            KeyAction::Dismiss => dialog.dismiss(),
            KeyAction::Activate => match self.focus {
                Focus::DismissButton => dialog.cancel(),
                Focus::Field(_) | Focus::ConfirmButton => dialog.confirm(),
            },
            KeyAction::FocusStep(delta) => {
                self.step_focus(delta);
                Transition::Ignored
            }
        }
    }

    fn step_focus(&mut self, delta: i32) {
        let len = self.field_count as i64 + 2;
        let current = match self.focus {
            Focus::Field(index) => index as i64,
            Focus::ConfirmButton => self.field_count as i64,
            Focus::DismissButton => self.field_count as i64 + 1,
        };
        let next = (current + delta as i64).rem_euclid(len) as usize;
        self.focus = if next < self.field_count {
            Focus::Field(next)
        } else if next == self.field_count {
            Focus::ConfirmButton
        } else {
            Focus::DismissButton
        };
    }
}

/// Applies a text-editing key to `buffer`. Returns `true` when the buffer changed.
fn edit_buffer(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) => {
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                return false;
            }
            buffer.push(c);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dialog::{CloseReason, DialogOptions, HeadlessHost, result_channel},
        form::{FieldDescriptor, FieldValidator, Validity},
    };

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn typed(input: &mut DialogInput, dialog: &mut FormDialogController<HeadlessHost>, text: &str) {
        for ch in text.chars() {
            input.handle_key(&key(KeyCode::Char(ch)), dialog);
        }
    }

    fn abc_dialog() -> (
        FormDialogController<HeadlessHost>,
        crate::dialog::ResultReceiver,
    ) {
        let (sender, receiver) = result_channel();
        let dialog = FormDialogController::new(
            DialogOptions::default(),
            vec![
                FieldDescriptor::new("code")
                    .with_validator(FieldValidator::equals("abc", "only accepts 'abc'")),
                FieldDescriptor::password("secret"),
            ],
            sender,
            HeadlessHost::new(),
        );
        (dialog, receiver)
    }

    #[test]
    fn typing_revalidates_focused_field() {
        let (mut dialog, _receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        typed(&mut input, &mut dialog, "ab");
        assert!(!dialog.confirm_enabled());
        let transition = input.handle_key(&key(KeyCode::Char('c')), &mut dialog);
        assert_eq!(transition, Transition::Revalidated(Validity::Valid));
        assert_eq!(dialog.field(0).unwrap().value, "abc");
        input.handle_key(&key(KeyCode::Backspace), &mut dialog);
        assert!(!dialog.confirm_enabled());
    }

    #[test]
    fn enter_on_field_submits_only_when_valid() {
        let (mut dialog, receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        assert_eq!(
            input.handle_key(&key(KeyCode::Enter), &mut dialog),
            Transition::Ignored
        );
        typed(&mut input, &mut dialog, "abc");
        assert_eq!(
            input.handle_key(&key(KeyCode::Enter), &mut dialog),
            Transition::Closed(CloseReason::Confirmed)
        );
        assert_eq!(receiver.try_recv(), Some(true));
    }

    #[test]
    fn focus_cycles_through_fields_and_buttons() {
        let (mut dialog, _receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        let mut seen = Vec::new();
        for _ in 0..4 {
            input.handle_key(&key(KeyCode::Tab), &mut dialog);
            seen.push(input.focus());
        }
        assert_eq!(
            seen,
            vec![
                Focus::Field(1),
                Focus::ConfirmButton,
                Focus::DismissButton,
                Focus::Field(0)
            ]
        );
        input.handle_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), &mut dialog);
        assert_eq!(input.focus(), Focus::DismissButton);
    }

    #[test]
    fn enter_on_dismiss_button_cancels_invalid_form() {
        let (mut dialog, receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        input.handle_key(&key(KeyCode::Up), &mut dialog);
        assert_eq!(input.focus(), Focus::DismissButton);
        assert_eq!(
            input.handle_key(&key(KeyCode::Enter), &mut dialog),
            Transition::Closed(CloseReason::Cancelled)
        );
        assert_eq!(receiver.try_recv(), Some(false));
    }

    #[test]
    fn typing_on_buttons_edits_nothing() {
        let (mut dialog, _receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        input.handle_key(&key(KeyCode::Up), &mut dialog);
        assert_eq!(
            input.handle_key(&key(KeyCode::Char('x')), &mut dialog),
            Transition::Ignored
        );
        assert_eq!(dialog.field(0).unwrap().value, "");
    }

    #[test]
    fn only_backspace_removes_text() {
        let (mut dialog, _receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        typed(&mut input, &mut dialog, "abc");
        assert_eq!(
            input.handle_key(&key(KeyCode::Delete), &mut dialog),
            Transition::Ignored
        );
        assert_eq!(dialog.field(0).unwrap().value, "abc");
        input.handle_key(&key(KeyCode::Backspace), &mut dialog);
        assert_eq!(dialog.field(0).unwrap().value, "ab");
    }

    #[test]
    fn empty_form_starts_on_confirm_button() {
        let input = DialogInput::new(0);
        assert_eq!(input.focus(), Focus::ConfirmButton);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut dialog, _receiver) = abc_dialog();
        let mut input = DialogInput::new(2);
        let mut release = key(KeyCode::Char('a'));
        release.kind = KeyEventKind::Release;
        assert_eq!(input.handle_key(&release, &mut dialog), Transition::Ignored);
        assert_eq!(dialog.field(0).unwrap().value, "");
    }
}
