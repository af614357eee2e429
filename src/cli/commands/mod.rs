pub mod contacts;
pub mod import;
pub mod preview;
pub mod settings;

pub use contacts::{ContactsCommands, handle_contacts_command};
pub use import::{ImportArgs, handle_import_command};
pub use preview::{PreviewArgs, handle_preview_command};
pub use settings::{SettingsCommands, handle_settings_command};
