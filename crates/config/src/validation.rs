//! Validation of resolved parameter values
//!
//! Nothing here stops the engine from running: malformed values already
//! fall back inside the mappers. Validation reports them so they can be
//! fixed at the source.

pub use crate::error::ValidationError;
use crate::catalog::ParamKind;
use crate::manager::ConfigManager;
use std::path::Path;

/// Path parameters that must name a directory for launches to work
const DIRECTORY_PARAMS: [&str; 3] = ["emulator_path", "rom_path", "video_path"];

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// Validates that a raw value maps without falling back
    pub fn kind(raw: &str, kind: ParamKind, field: &str) -> Result<(), ValidationError> {
        kind.check(raw)
            .map_err(|message| ValidationError::with_value(field, message, raw))
    }

    /// Validates that a numeric value is within a range
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a path is a directory
    pub fn is_directory(path: &Path, field: &str) -> Result<(), ValidationError> {
        if !path.is_dir() {
            Err(ValidationError::with_value(
                field,
                "path is not a directory",
                path.display(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validates that a string is not empty
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a value is one of the allowed options
    pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        if !allowed.contains(value) {
            let allowed_str = allowed
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(ValidationError::with_value(
                field,
                format!("must be one of: {}", allowed_str),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Collects multiple validation results into a single result
    pub fn collect_errors(
        results: Vec<Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(|r| r.err()).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl ConfigManager {
    /// Reports every parameter whose value would fall back in its mapper
    ///
    /// Compiled defaults are not reported. Fields are named `name (LEVEL)`
    /// after the level supplying the value.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results: Vec<Result<(), ValidationError>> = self
            .parameters()
            .iter()
            .filter_map(|param| {
                let entry = self.catalog().get(param.name())?;
                if param.value() == entry.default {
                    return None;
                }
                let field = format!("{} ({})", param.name(), param.current_level());
                Some(Validator::kind(param.value(), entry.kind, &field))
            })
            .collect();

        results.push(Validator::in_range(
            self.get_int("screen_res_x"),
            1,
            16384,
            "screen_res_x",
        ));
        results.push(Validator::in_range(
            self.get_int("screen_res_y"),
            1,
            16384,
            "screen_res_y",
        ));

        Validator::collect_errors(results)
    }

    /// Reports launch paths that do not name an existing directory
    ///
    /// Placeholders are expanded and relative paths are taken from the
    /// root. Unset paths are not reported.
    pub fn validate_paths(&self) -> Result<(), Vec<ValidationError>> {
        let results = DIRECTORY_PARAMS
            .iter()
            .filter(|name| Validator::not_empty(self.get_str(name), name).is_ok())
            .map(|name| {
                let expanded = self.expand_template(self.get_str(name), None);
                Validator::is_directory(&self.paths().resolve(&expanded), name)
            })
            .collect();
        Validator::collect_errors(results)
    }
}
