use std::{
    env::current_dir,
    path::{Path, PathBuf},
};

use miette::{miette, Context, IntoDiagnostic, Result};


/// Returns the default configuration filepath, which is at
/// `{current directory}/data/configuration.toml`.
///
/// The file does not need to exist.
pub fn get_default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.toml");

    Ok(configuration_filepath)
}

/// Anchors a relative `path` to `base_directory`; absolute paths are returned as-is.
#[must_use = "function returns the resolved path"]
pub fn resolve_relative_to<P>(base_directory: &Path, path: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_directory.join(path)
    }
}



#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_are_anchored() {
        let base = Path::new("/etc/urlconf");

        assert_eq!(
            resolve_relative_to(base, "logs"),
            PathBuf::from("/etc/urlconf/logs")
        );
        assert_eq!(
            resolve_relative_to(base, "/var/log/urlconf"),
            PathBuf::from("/var/log/urlconf")
        );
    }
}
