//! Screen descriptors
//!
//! Each screen is a declarative list of control specs. [`ScreenView`]
//! instantiates a descriptor and [`render::render_screen`] draws any view,
//! so no screen has hand-wired layout code.

pub mod render;
pub mod status;
pub mod view;

pub use render::{render_screen, RenderContext};
pub use status::{Dialog, DialogKind, StatusWindow};
pub use view::{Element, ScreenView};

use crate::app::state::Screen;
use std::collections::HashMap;

/// Identity of a control across all screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    StartComparison,
    Export,
    Exit,
    CompareFiles,
    CreateFile,
    Back,
    Version,
    Subversion,
    Date,
    Submit,
}

/// Initial value of a text input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDefault {
    Empty,
    /// Today's local date as `YYYY-MM-DD`
    Today,
}

impl TextDefault {
    pub fn value(&self) -> String {
        match self {
            TextDefault::Empty => String::new(),
            TextDefault::Today => chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    Button,
    TextInput { default: TextDefault },
    Dropdown { options: &'static [&'static str] },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSpec {
    pub id: ControlId,
    pub kind: ControlKind,
    pub label: &'static str,
    /// One-line help shown while the control is focused
    pub hint: &'static str,
}

impl ControlSpec {
    const fn button(id: ControlId, label: &'static str, hint: &'static str) -> Self {
        Self {
            id,
            kind: ControlKind::Button,
            label,
            hint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub screen: Screen,
    pub title: &'static str,
    pub controls: Vec<ControlSpec>,
}

pub const VERSION_OPTIONS: &[&str] = &["Версия 1", "Версия 2", "Версия 3"];
pub const SUBVERSION_OPTIONS: &[&str] = &["Подверсия 1.1", "Подверсия 1.2", "Подверсия 2.1"];

/// The controls of `screen`
pub fn descriptor(screen: Screen) -> ScreenDescriptor {
    match screen {
        Screen::MainMenu => ScreenDescriptor {
            screen,
            title: "Главное меню",
            controls: vec![
                ControlSpec::button(
                    ControlId::StartComparison,
                    "Сделать сравнение",
                    "Перейти к параметрам сравнения",
                ),
                ControlSpec::button(ControlId::Export, "Сделать выгрузку", "Выгрузить данные"),
                ControlSpec::button(ControlId::Exit, "Выход", "Закрыть приложение"),
            ],
        },
        Screen::ComparisonOptions => ScreenDescriptor {
            screen,
            title: "Параметры сравнения",
            controls: vec![
                ControlSpec::button(
                    ControlId::CompareFiles,
                    "Сравнить файлы",
                    "Сравнить выбранные файлы",
                ),
                ControlSpec::button(
                    ControlId::CreateFile,
                    "Сделать файл",
                    "Создать файл для сравнения",
                ),
                ControlSpec::button(ControlId::Back, "Назад", "Вернуться в главное меню"),
            ],
        },
        Screen::CreateFileOptions => ScreenDescriptor {
            screen,
            title: "Создание файла",
            controls: vec![
                ControlSpec {
                    id: ControlId::Version,
                    kind: ControlKind::Dropdown {
                        options: VERSION_OPTIONS,
                    },
                    label: "Версия",
                    hint: "←→ выбрать версию",
                },
                ControlSpec {
                    id: ControlId::Subversion,
                    kind: ControlKind::Dropdown {
                        options: SUBVERSION_OPTIONS,
                    },
                    label: "Подверсия",
                    hint: "←→ выбрать подверсию",
                },
                ControlSpec {
                    id: ControlId::Date,
                    kind: ControlKind::TextInput {
                        default: TextDefault::Today,
                    },
                    label: "Дата",
                    hint: "Введите дату",
                },
                ControlSpec::button(ControlId::Submit, "Создать", "Создать файл"),
                ControlSpec::button(ControlId::Back, "Назад", "Вернуться в главное меню"),
            ],
        },
    }
}

/// Values used to pre-fill a screen's controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenParams {
    values: HashMap<ControlId, String>,
}

impl ScreenParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: ControlId, value: impl Into<String>) -> Self {
        self.values.insert(id, value.into());
        self
    }

    pub fn get(&self, id: ControlId) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_screen_has_controls() {
        for screen in Screen::all() {
            let d = descriptor(screen);
            assert_eq!(d.screen, screen);
            assert!(!d.controls.is_empty());

            let unique: HashSet<_> = d.controls.iter().map(|c| c.id).collect();
            assert_eq!(unique.len(), d.controls.len(), "duplicate control on {}", screen);
        }
    }

    #[test]
    fn test_create_file_form_fields() {
        let d = descriptor(Screen::CreateFileOptions);
        let ids: Vec<_> = d.controls.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                ControlId::Version,
                ControlId::Subversion,
                ControlId::Date,
                ControlId::Submit,
                ControlId::Back
            ]
        );
    }

    #[test]
    fn test_today_default_format() {
        let today = TextDefault::Today.value();
        assert!(chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
        assert!(TextDefault::Empty.value().is_empty());
    }
}
