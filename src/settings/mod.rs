//! Process-wide settings loaded from a TOML or YAML preference file.

pub mod pref_file;
pub mod settings_struct;

pub use pref_file::PrefFile;
pub use settings_struct::{
    init_settings, update_settings_from_content, Settings, SettingsError, GLOBAL,
};
