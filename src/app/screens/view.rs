//! Live element sets built from screen descriptors

use super::{ControlId, ControlKind, ControlSpec, ScreenDescriptor, ScreenParams};
use crate::app::state::Screen;

/// One interactive element on the active screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    spec: ControlSpec,
    text: String,
    selected_option: usize,
}

impl Element {
    fn build(spec: &ControlSpec, params: Option<&ScreenParams>) -> Self {
        let preset = params.and_then(|p| p.get(spec.id));
        let mut element = Self {
            spec: spec.clone(),
            text: String::new(),
            selected_option: 0,
        };

        match &spec.kind {
            ControlKind::Button => {}
            ControlKind::TextInput { default } => {
                element.text = preset.map(str::to_string).unwrap_or_else(|| default.value());
            }
            ControlKind::Dropdown { options } => {
                if let Some(value) = preset {
                    if let Some(index) = options.iter().position(|o| *o == value) {
                        element.selected_option = index;
                    }
                }
            }
        }

        element
    }

    pub fn id(&self) -> ControlId {
        self.spec.id
    }

    pub fn spec(&self) -> &ControlSpec {
        &self.spec
    }

    pub fn is_text(&self) -> bool {
        matches!(self.spec.kind, ControlKind::TextInput { .. })
    }

    /// Current value: the typed text or the selected option. Buttons
    /// have no value.
    pub fn value(&self) -> Option<&str> {
        match &self.spec.kind {
            ControlKind::Button => None,
            ControlKind::TextInput { .. } => Some(self.text.as_str()),
            ControlKind::Dropdown { options } => options.get(self.selected_option).copied(),
        }
    }
}

/// The element set of one screen plus keyboard focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView {
    screen: Screen,
    title: &'static str,
    elements: Vec<Element>,
    focus: usize,
}

impl ScreenView {
    /// Instantiate every control of `descriptor`
    pub fn build(descriptor: &ScreenDescriptor, params: Option<&ScreenParams>) -> Self {
        Self {
            screen: descriptor.screen,
            title: descriptor.title,
            elements: descriptor
                .controls
                .iter()
                .map(|spec| Element::build(spec, params))
                .collect(),
            focus: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_ids(&self) -> Vec<ControlId> {
        self.elements.iter().map(Element::id).collect()
    }

    pub fn focus_index(&self) -> usize {
        self.focus
    }

    pub fn focused(&self) -> Option<&Element> {
        self.elements.get(self.focus)
    }

    pub fn focused_is_text(&self) -> bool {
        self.focused().map(Element::is_text).unwrap_or(false)
    }

    pub fn value_of(&self, id: ControlId) -> Option<&str> {
        self.elements
            .iter()
            .find(|el| el.id() == id)
            .and_then(Element::value)
    }

    pub fn focus_on(&mut self, id: ControlId) {
        if let Some(index) = self.elements.iter().position(|el| el.id() == id) {
            self.focus = index;
        }
    }

    pub fn focus_next(&mut self) {
        if !self.elements.is_empty() {
            self.focus = (self.focus + 1) % self.elements.len();
        }
    }

    pub fn focus_previous(&mut self) {
        if !self.elements.is_empty() {
            self.focus = (self.focus + self.elements.len() - 1) % self.elements.len();
        }
    }

    /// Step the focused dropdown, wrapping around
    pub fn cycle_option(&mut self, forward: bool) {
        if let Some(el) = self.elements.get_mut(self.focus) {
            if let ControlKind::Dropdown { options } = el.spec.kind {
                let len = options.len();
                if len > 0 {
                    el.selected_option = if forward {
                        (el.selected_option + 1) % len
                    } else {
                        (el.selected_option + len - 1) % len
                    };
                }
            }
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(el) = self.elements.get_mut(self.focus) {
            if el.is_text() {
                el.text.push(c);
            }
        }
    }

    pub fn erase(&mut self) {
        if let Some(el) = self.elements.get_mut(self.focus) {
            if el.is_text() {
                el.text.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::screens::descriptor;

    fn form() -> ScreenView {
        ScreenView::build(&descriptor(Screen::CreateFileOptions), None)
    }

    #[test]
    fn test_focus_wraps() {
        let mut view = ScreenView::build(&descriptor(Screen::MainMenu), None);
        view.focus_previous();
        assert_eq!(view.focused().unwrap().id(), ControlId::Exit);
        view.focus_next();
        assert_eq!(view.focused().unwrap().id(), ControlId::StartComparison);
    }

    #[test]
    fn test_dropdown_cycles() {
        let mut view = form();
        assert_eq!(view.value_of(ControlId::Version), Some("Версия 1"));
        view.cycle_option(true);
        assert_eq!(view.value_of(ControlId::Version), Some("Версия 2"));
        view.cycle_option(false);
        view.cycle_option(false);
        assert_eq!(view.value_of(ControlId::Version), Some("Версия 3"));
    }

    #[test]
    fn test_text_editing_only_touches_text_inputs() {
        let mut view = form();
        view.input_char('x');
        assert_eq!(view.value_of(ControlId::Version), Some("Версия 1"));

        view.focus_on(ControlId::Date);
        assert!(view.focused_is_text());
        let before = view.value_of(ControlId::Date).unwrap().to_string();
        view.input_char('!');
        assert_eq!(view.value_of(ControlId::Date).unwrap(), format!("{}!", before));
        view.erase();
        assert_eq!(view.value_of(ControlId::Date).unwrap(), before);
    }

    #[test]
    fn test_params_prefill() {
        let params = ScreenParams::new()
            .with(ControlId::Version, "Версия 2")
            .with(ControlId::Subversion, "Подверсия 2.1")
            .with(ControlId::Date, "когда-нибудь");
        let view = ScreenView::build(&descriptor(Screen::CreateFileOptions), Some(&params));

        assert_eq!(view.value_of(ControlId::Version), Some("Версия 2"));
        assert_eq!(view.value_of(ControlId::Subversion), Some("Подверсия 2.1"));
        assert_eq!(view.value_of(ControlId::Date), Some("когда-нибудь"));
    }

    #[test]
    fn test_unknown_dropdown_preset_keeps_first_option() {
        let params = ScreenParams::new().with(ControlId::Version, "Версия 9");
        let view = ScreenView::build(&descriptor(Screen::CreateFileOptions), Some(&params));
        assert_eq!(view.value_of(ControlId::Version), Some("Версия 1"));
    }

    #[test]
    fn test_buttons_have_no_value() {
        let view = form();
        assert_eq!(view.value_of(ControlId::Submit), None);
        assert_eq!(view.value_of(ControlId::Exit), None);
    }
}
