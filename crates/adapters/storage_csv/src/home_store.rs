//! CSV implementation of [`HomeStore`].
//!
//! ```text
//! Home Name,Devices
//! Lakeview,"[{""consumption_rate"":45,""switched_on"":true,""type"":""SmartPlug""}]"
//! ```
//!
//! The devices column is decoded with `serde_json` and every record goes
//! through the domain's validating constructors, so a bad row fails the whole
//! load instead of silently dropping a home.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use smarthome_app::ports::HomeStore;
use smarthome_domain::error::SmartHomeError;
use smarthome_domain::home::{Home, HomeRecord};

use crate::error::StorageError;

/// Header row written at the top of every file.
pub const HEADER: [&str; 2] = ["Home Name", "Devices"];

/// One data row, with the devices column still as raw JSON text.
#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Home Name")]
    name: String,
    #[serde(rename = "Devices")]
    devices: String,
}

/// File-backed home store.
#[derive(Debug, Clone)]
pub struct CsvHomeStore {
    path: PathBuf,
}

impl CsvHomeStore {
    /// Create a store backed by the file at `path`. Nothing is touched until
    /// the first load or save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Home>, StorageError> {
        match File::open(&self.path) {
            Ok(file) => read_homes(file),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no store file yet, starting empty");
                Ok(Vec::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Write to a temporary sibling, then rename it over the target.
    fn write(&self, homes: &[Home]) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        write_homes(&mut tmp, homes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}

impl HomeStore for CsvHomeStore {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Home>, SmartHomeError> {
        let homes = self.read()?;
        tracing::debug!(homes = homes.len(), "store loaded");
        Ok(homes)
    }

    #[tracing::instrument(skip(self, homes), fields(path = %self.path.display(), homes = homes.len()))]
    fn save(&self, homes: &[Home]) -> Result<(), SmartHomeError> {
        self.write(homes)?;
        tracing::debug!("store written");
        Ok(())
    }
}

/// Decode every home from CSV text.
///
/// A completely empty input is an empty store; a header-only input is too.
///
/// # Errors
///
/// Returns [`StorageError::UnexpectedHeader`] for a wrong header row,
/// [`StorageError::MalformedJson`] or [`StorageError::InvalidRecord`] (with
/// the 1-based line number) for the first bad row, or [`StorageError::Csv`]
/// when the text is not valid CSV.
pub fn read_homes(input: impl io::Read) -> Result<Vec<Home>, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if headers.iter().ne(HEADER) {
        return Err(StorageError::UnexpectedHeader {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut homes = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let row: Row = record.deserialize(Some(&headers))?;
        homes.push(decode_row(row, line)?);
    }
    Ok(homes)
}

fn decode_row(row: Row, line: u64) -> Result<Home, StorageError> {
    let devices = serde_json::from_str(&row.devices)
        .map_err(|source| StorageError::MalformedJson { line, source })?;
    let record = HomeRecord {
        name: row.name,
        devices,
    };
    Home::from_record(&record).map_err(|source| StorageError::InvalidRecord { line, source })
}

/// Encode every home as CSV text, header first.
///
/// # Errors
///
/// Returns [`StorageError::Io`] or [`StorageError::Csv`] when the writer
/// fails.
pub fn write_homes(output: impl io::Write, homes: &[Home]) -> Result<(), StorageError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(HEADER)?;
    for home in homes {
        let record = home.to_record();
        let devices = serde_json::to_string(&record.devices).map_err(StorageError::Encode)?;
        writer.write_record([record.name.as_str(), devices.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smarthome_domain::device::{Device, DeviceKind, FieldValue, Heater, Plug, SmartDevice};
    use smarthome_domain::error::{CapacityError, UnknownTypeError, ValidationError};
    use tempfile::TempDir;

    fn lakeview() -> Home {
        let mut home = Home::new("Lakeview").unwrap();
        home.add(Plug::new(45).unwrap()).unwrap();
        home.add(Heater::with_setting(3).unwrap()).unwrap();
        home.add(Device::with_defaults(DeviceKind::Door)).unwrap();
        home.toggle(0).unwrap();
        home
    }

    fn store_in(dir: &TempDir) -> CsvHomeStore {
        CsvHomeStore::new(dir.path().join("smart_homes.csv"))
    }

    fn storage_error(err: &SmartHomeError) -> &StorageError {
        let SmartHomeError::Persistence(inner) = err else {
            panic!("expected persistence error, got {err:?}");
        };
        inner
            .downcast_ref::<StorageError>()
            .expect("persistence error should wrap a StorageError")
    }

    #[test]
    fn should_load_empty_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn should_load_empty_when_only_header_present() {
        let homes = read_homes("Home Name,Devices\n".as_bytes()).unwrap();
        assert!(homes.is_empty());
    }

    #[test]
    fn should_load_empty_when_file_is_blank() {
        let homes = read_homes("".as_bytes()).unwrap();
        assert!(homes.is_empty());
    }

    #[test]
    fn should_accept_header_with_space_after_comma() {
        let homes = read_homes("Home Name, Devices\nCabin,[]\n".as_bytes()).unwrap();
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].name(), "Cabin");
    }

    #[test]
    fn should_write_header_even_without_homes() {
        let mut out = Vec::new();
        write_homes(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Home Name,Devices\n");
    }

    #[test]
    fn should_quote_json_devices_column() {
        let mut home = Home::new("Cabin").unwrap();
        home.add(Device::with_defaults(DeviceKind::Door)).unwrap();

        let mut out = Vec::new();
        write_homes(&mut out, &[home]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Home Name,Devices\nCabin,\"[{"));
        assert!(text.contains(r#"""type"":""SmartDoor"""#));
        assert!(text.ends_with("}]\"\n"));
    }

    #[test]
    fn should_roundtrip_homes_through_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let homes = vec![lakeview(), Home::new("Cabin, North").unwrap()];

        store.save(&homes).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, homes);
    }

    #[test]
    fn should_overwrite_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[lakeview()]).unwrap();

        let mut updated = lakeview();
        updated.update(1, Heater::SETTING, &FieldValue::Int(5)).unwrap();
        store.save(&[updated.clone()]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, vec![updated]);
    }

    #[test]
    fn should_create_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = CsvHomeStore::new(dir.path().join("nested/deeper/homes.csv"));
        store.save(&[lakeview()]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn should_not_leave_temporary_files_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[lakeview()]).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("smart_homes.csv")]);
    }

    #[test]
    fn should_restore_switched_on_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&[lakeview()]).unwrap();

        let loaded = store.load().unwrap();
        let states: Vec<bool> = loaded[0].devices().iter().map(SmartDevice::switched_on).collect();
        assert_eq!(states, vec![true, false, false]);
    }

    #[test]
    fn should_fail_explicitly_on_unknown_device_type() {
        let input = "Home Name,Devices\n\
                     Good,[]\n\
                     Bad,\"[{\"\"type\"\":\"\"SmartToaster\"\"}]\"\n";
        let err = read_homes(input.as_bytes()).unwrap_err();
        let StorageError::InvalidRecord { line, source } = err else {
            panic!("expected invalid record");
        };
        assert_eq!(line, 3);
        assert!(matches!(
            source,
            SmartHomeError::UnknownType(UnknownTypeError { ref kind }) if kind == "SmartToaster"
        ));
    }

    #[test]
    fn should_fail_on_out_of_range_device_field() {
        let input = "Home Name,Devices\n\
                     Hot,\"[{\"\"type\"\":\"\"SmartHeater\"\",\"\"setting\"\":9}]\"\n";
        let err = read_homes(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidRecord {
                line: 2,
                source: SmartHomeError::Validation(ValidationError::OutOfRange { .. }),
            }
        ));
    }

    #[test]
    fn should_fail_on_python_literal_devices_column() {
        let input = "Home Name,Devices\n\
                     Lakeview,\"[{'type': 'SmartDoor', 'switched_on': False, 'locked': True}]\"\n";
        let err = read_homes(input.as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::MalformedJson { line: 2, .. }));
    }

    #[test]
    fn should_fail_when_home_has_more_than_ten_devices() {
        let records = vec![Device::with_defaults(DeviceKind::Plug).to_record(); 11];
        let devices = serde_json::to_string(&records).unwrap();
        let mut input = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut input);
            writer.write_record(HEADER).unwrap();
            writer.write_record(["Crowded", devices.as_str()]).unwrap();
        }

        let err = read_homes(input.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::InvalidRecord {
                source: SmartHomeError::Capacity(CapacityError { capacity: 10 }),
                ..
            }
        ));
    }

    #[test]
    fn should_reject_unexpected_header() {
        let err = read_homes("Name,Stuff\nCabin,[]\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::UnexpectedHeader { ref found } if found == "Name,Stuff"));
    }

    #[test]
    fn should_reject_row_with_wrong_column_count() {
        let err = read_homes("Home Name,Devices\nCabin\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StorageError::Csv(_)));
    }

    #[test]
    fn should_surface_malformed_file_as_persistence_error_through_port() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "Home Name,Devices\nCabin,not json\n").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(
            storage_error(&err),
            StorageError::MalformedJson { line: 2, .. }
        ));
    }
}
