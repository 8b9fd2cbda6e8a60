pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    api::{ApiClient, ListQuery},
    modal::{ModalOptions, ModalProps, ModalStore},
    notify::NotificationCenter,
    table::{Column, DataTable},
    wizard::{CallOrderWizard, WizardSession, WizardStep},
};
pub use crate::utils::error::{AdminError, Result};
