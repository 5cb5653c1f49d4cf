/*!
 * Copy options panel
 *
 * An explicit state machine for the "configure & copy" picker. The host
 * renders [`OptionsPanel::entries`], feeds the user's choice to
 * [`OptionsPanel::select`], and carries out the returned [`PanelEffect`].
 * Toggling an option keeps the panel open with that option highlighted.
 */

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::config::{Settings, Toggle};

/// Selectable items, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum PanelItem {
    #[strum(serialize = "copy")]
    CopyAndClose,
    #[strum(serialize = "content")]
    ToggleContent,
    #[strum(serialize = "structure")]
    ToggleStructure,
    #[strum(serialize = "import")]
    ImportFromInput,
    #[strum(serialize = "export")]
    CopyImportList,
}

/// Panel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Panel closed
    Idle,
    /// Panel shown, waiting for the user
    AwaitingSelection { active: PanelItem },
}

/// What the host has to do after a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEffect {
    /// Nothing to do
    None,
    /// Store the updated settings; the panel stays open
    Persist(Settings),
    /// Copy open files with these settings; the panel is closed
    Copy(Settings),
    /// Read an Import List and open its files; the panel is closed
    Import,
    /// Copy the Import List of the open files; the panel is closed
    Export,
}

/// A rendered panel row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelEntry {
    pub item: PanelItem,
    pub label: String,
    pub description: String,
    pub active: bool,
}

/// The options panel
#[derive(Debug, Clone)]
pub struct OptionsPanel {
    state: PanelState,
    settings: Settings,
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

fn toggle_label(flag: bool, name: &str) -> (String, String) {
    let mark = if flag { "[x]" } else { "[ ]" };
    let description = if flag { "Toggle to OFF" } else { "Toggle to ON" };
    (format!("{} {}", mark, name), description.to_string())
}

impl OptionsPanel {
    /// A closed panel over the given settings
    pub fn new(settings: Settings) -> Self {
        Self {
            state: PanelState::Idle,
            settings,
        }
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Show the panel, highlighting `active` (or "Copy & Close")
    pub fn open(&mut self, active: Option<PanelItem>) {
        self.state = PanelState::AwaitingSelection {
            active: active.unwrap_or(PanelItem::CopyAndClose),
        };
    }

    /// Close the panel without doing anything
    pub fn cancel(&mut self) {
        self.state = PanelState::Idle;
    }

    /// Rows to display, reflecting the current settings
    pub fn entries(&self) -> Vec<PanelEntry> {
        let active = match self.state {
            PanelState::AwaitingSelection { active } => Some(active),
            PanelState::Idle => None,
        };

        PanelItem::iter()
            .map(|item| {
                let (label, description) = match item {
                    PanelItem::CopyAndClose => (
                        "Copy & Close".to_string(),
                        format!(
                            "Content: {}, Structure: {}",
                            on_off(self.settings.copy_content),
                            on_off(self.settings.copy_structure)
                        ),
                    ),
                    PanelItem::ToggleContent => {
                        toggle_label(self.settings.copy_content, "Copy Content")
                    }
                    PanelItem::ToggleStructure => {
                        toggle_label(self.settings.copy_structure, "Copy Structure")
                    }
                    PanelItem::ImportFromInput => (
                        "Import from Input".to_string(),
                        "Open the files of an Import List".to_string(),
                    ),
                    PanelItem::CopyImportList => (
                        "Copy Import List".to_string(),
                        "Copy the open files as an Import List".to_string(),
                    ),
                };
                PanelEntry {
                    item,
                    label,
                    description,
                    active: active == Some(item),
                }
            })
            .collect()
    }

    /// Apply a selection. Selecting while the panel is closed does nothing.
    pub fn select(&mut self, item: PanelItem) -> PanelEffect {
        if self.state == PanelState::Idle {
            return PanelEffect::None;
        }

        match item {
            PanelItem::ToggleContent | PanelItem::ToggleStructure => {
                let which = if item == PanelItem::ToggleContent {
                    Toggle::Content
                } else {
                    Toggle::Structure
                };
                self.settings.toggle(which);
                self.state = PanelState::AwaitingSelection { active: item };
                PanelEffect::Persist(self.settings)
            }
            PanelItem::CopyAndClose => {
                self.state = PanelState::Idle;
                PanelEffect::Copy(self.settings)
            }
            PanelItem::ImportFromInput => {
                self.state = PanelState::Idle;
                PanelEffect::Import
            }
            PanelItem::CopyImportList => {
                self.state = PanelState::Idle;
                PanelEffect::Export
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_defaults_to_copy() {
        let mut panel = OptionsPanel::new(Settings::default());
        assert_eq!(panel.state(), PanelState::Idle);
        panel.open(None);
        assert_eq!(
            panel.state(),
            PanelState::AwaitingSelection {
                active: PanelItem::CopyAndClose
            }
        );
        assert!(panel.entries()[0].active);
    }

    #[test]
    fn test_toggle_stays_open_and_persists() {
        let mut panel = OptionsPanel::new(Settings::default());
        panel.open(None);

        let effect = panel.select(PanelItem::ToggleContent);
        let expected = Settings {
            copy_content: false,
            copy_structure: true,
        };
        assert_eq!(effect, PanelEffect::Persist(expected));
        assert_eq!(
            panel.state(),
            PanelState::AwaitingSelection {
                active: PanelItem::ToggleContent
            }
        );

        let entries = panel.entries();
        assert_eq!(entries[0].description, "Content: OFF, Structure: ON");
        assert_eq!(entries[1].label, "[ ] Copy Content");
        assert_eq!(entries[1].description, "Toggle to ON");
        assert!(entries[1].active);
        assert_eq!(entries[2].label, "[x] Copy Structure");
    }

    #[test]
    fn test_copy_closes_with_current_settings() {
        let mut panel = OptionsPanel::new(Settings::default());
        panel.open(None);
        panel.select(PanelItem::ToggleStructure);
        let effect = panel.select(PanelItem::CopyAndClose);
        assert_eq!(
            effect,
            PanelEffect::Copy(Settings {
                copy_content: true,
                copy_structure: false
            })
        );
        assert_eq!(panel.state(), PanelState::Idle);
    }

    #[test]
    fn test_select_while_idle_is_noop() {
        let mut panel = OptionsPanel::new(Settings::default());
        assert_eq!(panel.select(PanelItem::ToggleContent), PanelEffect::None);
        assert_eq!(panel.settings(), Settings::default());
    }

    #[test]
    fn test_import_export_and_cancel_close() {
        let mut panel = OptionsPanel::new(Settings::default());
        panel.open(Some(PanelItem::CopyImportList));
        assert_eq!(panel.select(PanelItem::ImportFromInput), PanelEffect::Import);
        assert_eq!(panel.state(), PanelState::Idle);

        panel.open(None);
        assert_eq!(panel.select(PanelItem::CopyImportList), PanelEffect::Export);

        panel.open(None);
        panel.cancel();
        assert_eq!(panel.state(), PanelState::Idle);
    }

    #[test]
    fn test_item_keys() {
        assert_eq!(PanelItem::ToggleStructure.to_string(), "structure");
        assert_eq!(PanelItem::iter().count(), 5);
    }
}
