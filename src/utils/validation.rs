//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::{ProcessError, ProcessResult};

/// Characters that carry meaning in the legacy definition format
static PROCESS_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s;&|!+=]+$").expect("static regex"));

/// Host and service names only need to stay clear of the separator
static OBJECT_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^;\r\n]+$").expect("static regex"));

/// Validate a process node name
pub fn validate_process_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 255 && PROCESS_NAME_REGEX.is_match(name)
}

/// Validate a host or service name
pub fn validate_object_name(name: &str) -> bool {
    !name.is_empty() && name.len() <= 255 && OBJECT_NAME_REGEX.is_match(name)
}

/// Validate a process node name, returning an error on failure
pub fn ensure_process_name(name: &str) -> ProcessResult<()> {
    if validate_process_name(name) {
        Ok(())
    } else {
        Err(ProcessError::InvalidName(name.to_string()))
    }
}

/// Validate a host or service name, returning an error on failure
pub fn ensure_object_name(name: &str) -> ProcessResult<()> {
    if validate_object_name(name) {
        Ok(())
    } else {
        Err(ProcessError::InvalidName(name.to_string()))
    }
}
