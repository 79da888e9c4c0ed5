//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store and
//! services. Environment variables are read by the binaries only; the helpers here parse the
//! raw values so request handling never touches process-wide state.

use crate::constants::{DEFAULT_RNG_SEED, DEFAULT_SEED_APPOINTMENTS, MAX_SEED_APPOINTMENTS};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Where the initial clinic data comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedSource {
    /// The built-in clinic with generated appointments.
    Builtin {
        rng_seed: u64,
        appointment_count: usize,
    },
    /// A YAML seed file.
    File(PathBuf),
}

impl Default for SeedSource {
    fn default() -> Self {
        SeedSource::Builtin {
            rng_seed: DEFAULT_RNG_SEED,
            appointment_count: DEFAULT_SEED_APPOINTMENTS,
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    seed_source: SeedSource,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`] if a seed file is configured but is not a
    /// regular file, or if the generated appointment count exceeds
    /// [`MAX_SEED_APPOINTMENTS`].
    pub fn new(seed_source: SeedSource) -> ClinicResult<Self> {
        match &seed_source {
            SeedSource::File(path) if !path.is_file() => {
                return Err(ClinicError::InvalidInput(format!(
                    "seed file {} does not exist or is not a file",
                    path.display()
                )));
            }
            SeedSource::Builtin {
                appointment_count, ..
            } => check_appointment_count(*appointment_count)?,
            SeedSource::File(_) => {}
        }

        Ok(Self { seed_source })
    }

    pub fn seed_source(&self) -> &SeedSource {
        &self.seed_source
    }

    pub fn seed_file(&self) -> Option<&Path> {
        match &self.seed_source {
            SeedSource::File(path) => Some(path),
            SeedSource::Builtin { .. } => None,
        }
    }
}

/// Build a [`SeedSource`] from optional raw environment values.
///
/// A non-empty `seed_file` wins over the generator settings. Empty or whitespace values are
/// treated as unset.
///
/// # Errors
///
/// Returns [`ClinicError::InvalidInput`] if the RNG seed or appointment count is not a
/// non-negative integer, or if the count exceeds [`MAX_SEED_APPOINTMENTS`].
pub fn seed_source_from_env_values(
    seed_file: Option<String>,
    rng_seed: Option<String>,
    appointment_count: Option<String>,
) -> ClinicResult<SeedSource> {
    fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    if let Some(path) = non_empty(seed_file) {
        return Ok(SeedSource::File(PathBuf::from(path)));
    }

    let rng_seed = non_empty(rng_seed)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| ClinicError::InvalidInput(format!("invalid RNG seed '{v}'")))
        })
        .transpose()?
        .unwrap_or(DEFAULT_RNG_SEED);

    let appointment_count = non_empty(appointment_count)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                ClinicError::InvalidInput(format!("invalid seed appointment count '{v}'"))
            })
        })
        .transpose()?
        .unwrap_or(DEFAULT_SEED_APPOINTMENTS);
    check_appointment_count(appointment_count)?;

    Ok(SeedSource::Builtin {
        rng_seed,
        appointment_count,
    })
}

fn check_appointment_count(count: usize) -> ClinicResult<()> {
    if count > MAX_SEED_APPOINTMENTS {
        return Err(ClinicError::InvalidInput(format!(
            "seed appointment count {count} exceeds the maximum of {MAX_SEED_APPOINTMENTS}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unset_values_fall_back_to_defaults() {
        let source = seed_source_from_env_values(None, Some("  ".into()), None).unwrap();
        assert_eq!(source, SeedSource::default());
    }

    #[test]
    fn seed_file_takes_precedence() {
        let source = seed_source_from_env_values(
            Some("/tmp/clinic.yaml".into()),
            Some("9".into()),
            Some("3".into()),
        )
        .unwrap();
        assert_eq!(source, SeedSource::File(PathBuf::from("/tmp/clinic.yaml")));
    }

    #[test]
    fn parses_generator_settings() {
        let source =
            seed_source_from_env_values(None, Some("7".into()), Some("40".into())).unwrap();
        assert_eq!(
            source,
            SeedSource::Builtin {
                rng_seed: 7,
                appointment_count: 40
            }
        );
    }

    #[test]
    fn rejects_non_numeric_settings() {
        let err = seed_source_from_env_values(None, Some("seven".into()), None)
            .expect_err("should reject");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("seven")));

        assert!(seed_source_from_env_values(None, None, Some("-1".into())).is_err());
    }

    #[test]
    fn rejects_oversized_appointment_count() {
        let err = seed_source_from_env_values(None, None, Some("10001".into()))
            .expect_err("should reject");
        assert!(matches!(err, ClinicError::InvalidInput(msg) if msg.contains("10001")));

        let huge = usize::MAX.to_string();
        assert!(seed_source_from_env_values(None, None, Some(huge)).is_err());

        let at_limit =
            seed_source_from_env_values(None, None, Some(MAX_SEED_APPOINTMENTS.to_string()));
        assert!(at_limit.is_ok());

        assert!(CoreConfig::new(SeedSource::Builtin {
            rng_seed: 1,
            appointment_count: usize::MAX,
        })
        .is_err());
    }

    #[test]
    fn config_rejects_missing_seed_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope.yaml");
        assert!(CoreConfig::new(SeedSource::File(missing)).is_err());
        assert!(CoreConfig::new(SeedSource::File(temp_dir.path().to_path_buf())).is_err());
    }
}
