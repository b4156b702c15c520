//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use smarthome_domain::device::{DeviceKind, FieldValue};

#[derive(Parser, Debug)]
#[command(name = "smarthomectl")]
#[command(about = "Manage simulated smart-home devices grouped into homes")]
#[command(version)]
pub struct Cli {
    /// Configuration file (optional; defaults apply when missing)
    #[arg(long, default_value = "smarthome.toml")]
    pub config: PathBuf,

    /// CSV store location, overriding config and environment
    #[arg(long)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List every home with its active-device count
    List,

    /// Create an empty home
    AddHome { name: String },

    /// Delete a home and all of its devices (no-op if missing)
    RemoveHome { name: String },

    /// Show a home's devices with their indices
    Show { home: String },

    /// Add a device with default settings (plug, heater, door)
    AddDevice { home: String, kind: DeviceKind },

    /// Remove the device at an index; later devices shift down
    RemoveDevice { home: String, index: usize },

    /// Flip a device on or off
    Toggle { home: String, index: usize },

    /// Set a device field, e.g. `set Lakeview 0 consumption_rate 60`
    Set {
        home: String,
        index: usize,
        field: String,
        #[arg(allow_hyphen_values = true, value_parser = FieldValue::from_str)]
        value: FieldValue,
    },

    /// Switch every device in a home on or off
    SwitchAll { home: String, state: Switch },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

impl Command {
    /// Whether running this command can change the registry.
    #[must_use]
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::List | Self::Show { .. })
    }
}
