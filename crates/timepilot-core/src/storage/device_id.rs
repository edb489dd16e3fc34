// Device ID sent with every backend request as X-Device-Id
// Format: "timepilot-<uuid>"

use std::fs;
use std::path::Path;
use uuid::Uuid;

use super::data_dir;
use crate::error::CoreError;

const DEVICE_ID_FILE: &str = "device_id.txt";
const DEVICE_ID_PREFIX: &str = "timepilot-";

fn is_valid(device_id: &str) -> bool {
    device_id
        .strip_prefix(DEVICE_ID_PREFIX)
        .is_some_and(|rest| Uuid::parse_str(rest).is_ok())
}

/// Get or create the device ID stored under `dir`.
///
/// A missing or unreadable-format file is replaced by a freshly generated
/// ID, so the backend always receives a well-formed header.
pub fn get_or_create_device_id_at(dir: &Path) -> Result<String, CoreError> {
    let path = dir.join(DEVICE_ID_FILE);

    if path.exists() {
        let content = fs::read_to_string(&path)?;
        let device_id = content.trim();
        if is_valid(device_id) {
            return Ok(device_id.to_string());
        }
        tracing::warn!(path = %path.display(), "discarding malformed device id");
    }

    let device_id = format!("{DEVICE_ID_PREFIX}{}", Uuid::new_v4());
    fs::create_dir_all(dir)?;
    fs::write(&path, format!("{device_id}\n"))?;
    Ok(device_id)
}

/// Get or create the device ID in the default data directory.
pub fn get_or_create_device_id() -> Result<String, CoreError> {
    get_or_create_device_id_at(&data_dir()?)
}
