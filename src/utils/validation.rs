use crate::utils::error::{AppError, Result};
use std::cmp::Ordering;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_extensions.contains(&extension) => Ok(()),
        Some(extension) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN 之類無法比較的值也視為超出範圍
    let in_range = matches!(value.partial_cmp(&min), Some(Ordering::Greater | Ordering::Equal))
        && matches!(value.partial_cmp(&max), Some(Ordering::Less | Ordering::Equal));
    if !in_range {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("report", "./out/report.json").is_ok());
        assert!(validate_path("report", "").is_err());
        assert!(validate_path("report", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("action_count", 5, 1).is_ok());
        assert!(validate_positive_number("action_count", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("config", "lessons.toml", &["toml"]).is_ok());
        assert!(validate_file_extension("config", "lessons.yaml", &["toml"]).is_err());
        assert!(validate_file_extension("config", "lessons", &["toml"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("user_count", 5u32, 1, 1000).is_ok());
        assert!(validate_range("user_count", 0u32, 1, 1000).is_err());
        match validate_range("max_fetch_delay_ms", 70_000u64, 0, 60_000) {
            Err(AppError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "max_fetch_delay_ms")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
