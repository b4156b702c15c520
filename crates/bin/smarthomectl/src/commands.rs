//! Command dispatch. Applies one [`Command`] to the registry and renders
//! the resulting view.

use std::io::Write;

use smarthome_app::ports::HomeStore;
use smarthome_app::services::registry::Registry;
use smarthome_domain::device::Device;
use smarthome_domain::error::{NotFoundError, SmartHomeError};
use smarthome_domain::home::Home;

use crate::cli::{Command, Switch};

/// Apply `command` and write the refreshed view to `out`.
///
/// # Errors
///
/// Returns the model error unchanged (so callers can downcast to
/// [`SmartHomeError`]) or an IO error from writing the output.
pub fn run<S: HomeStore>(
    registry: &mut Registry<S>,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::List => render_list(registry, out)?,
        Command::AddHome { name } => {
            registry.add_home(&name)?;
            tracing::info!(home = %name, "home added");
            render_list(registry, out)?;
        }
        Command::RemoveHome { name } => {
            if registry.remove_home(&name).is_some() {
                tracing::info!(home = %name, "home removed");
            }
            render_list(registry, out)?;
        }
        Command::Show { home } => {
            let home = registry.get(&home).ok_or_else(|| not_found(&home))?;
            render_home(home, out)?;
        }
        Command::AddDevice { home, kind } => {
            let home = registry.home_mut(&home)?;
            home.add(Device::with_defaults(kind))?;
            tracing::info!(home = %home.name(), %kind, "device added");
            render_home(home, out)?;
        }
        Command::RemoveDevice { home, index } => {
            let home = registry.home_mut(&home)?;
            let removed = home.remove(index)?;
            tracing::info!(home = %home.name(), index, device = %removed, "device removed");
            render_home(home, out)?;
        }
        Command::Toggle { home, index } => {
            let home = registry.home_mut(&home)?;
            home.toggle(index)?;
            render_home(home, out)?;
        }
        Command::Set {
            home,
            index,
            field,
            value,
        } => {
            let home = registry.home_mut(&home)?;
            home.update(index, &field, &value)?;
            tracing::info!(home = %home.name(), index, %field, %value, "device updated");
            render_home(home, out)?;
        }
        Command::SwitchAll { home, state } => {
            let home = registry.home_mut(&home)?;
            let changed = home.switch_all(state == Switch::On);
            tracing::info!(home = %home.name(), changed, "switched all devices");
            render_home(home, out)?;
        }
    }
    Ok(())
}

fn not_found(name: &str) -> SmartHomeError {
    NotFoundError {
        entity: "Home",
        id: name.to_string(),
    }
    .into()
}

fn render_list<S: HomeStore>(registry: &Registry<S>, out: &mut impl Write) -> std::io::Result<()> {
    if registry.is_empty() {
        return writeln!(out, "no homes");
    }
    for summary in registry.status_summaries() {
        writeln!(out, "{summary}")?;
    }
    Ok(())
}

fn render_home(home: &Home, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", home.status_summary())?;
    for (index, device) in home.devices().iter().enumerate() {
        writeln!(out, "  [{index}] {device}")?;
    }
    Ok(())
}
