use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AcrosticError, Result};

/// Extension of family count files.
pub(crate) const COUNTS_EXTENSION: &str = "txt";

/// Extension of family usage sidecars.
pub(crate) const USED_EXTENSION: &str = "used";

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub(crate) fn normalize_folder<P: AsRef<Path>>(input: P) -> PathBuf {
	let input = input.as_ref();
	if input == Path::new(".") || input == Path::new("./") {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		input.to_path_buf()
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}

/// Builds the file name of a family: `<n>_<initials>.<extension>`.
///
/// Example: `"lol"` + `"txt"` → `3_lol.txt`
pub(crate) fn family_file_name(initials: &str, extension: &str) -> String {
	format!("{}_{}.{}", initials.chars().count(), initials, extension)
}

/// Recovers the initials from a family file name.
///
/// # Errors
/// - `Format` if the name is not `<n>_<initials>.<extension>`
/// - `Mismatch` if `n` disagrees with the number of initials
pub(crate) fn parse_family_file_name(name: &str, extension: &str) -> Result<String> {
	let stem = name
		.strip_suffix(extension)
		.and_then(|s| s.strip_suffix('.'))
		.ok_or_else(|| AcrosticError::format(format!("'{}' has no .{} extension", name, extension)))?;
	let (numeral, initials) = stem
		.split_once('_')
		.ok_or_else(|| AcrosticError::format(format!("'{}' is not <n>_<initials>", name)))?;
	let n: usize = numeral
		.parse()
		.map_err(|_| AcrosticError::format(format!("'{}' does not start with a numeral", name)))?;
	if initials.is_empty() {
		return Err(AcrosticError::format(format!("'{}' has empty initials", name)));
	}
	let found = initials.chars().count();
	if found != n {
		return Err(AcrosticError::mismatch(
			format!("{} initials", n),
			format!("{} ({} initials)", initials, found),
		));
	}
	Ok(initials.to_owned())
}

/// Writes `path` by filling a temporary file in the same directory and renaming
/// it over the destination.
///
/// If `fill` fails, the temporary file is removed and `path` is left untouched.
pub(crate) fn replace_atomically<P, F>(path: P, fill: F) -> Result<()>
where
	P: AsRef<Path>,
	F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
	let path = path.as_ref();
	let dir = path.parent().unwrap_or_else(|| Path::new("."));
	let mut tmp = NamedTempFile::new_in(dir)?;
	{
		let mut writer = BufWriter::new(tmp.as_file_mut());
		fill(&mut writer)?;
		writer.flush()?;
	}
	tmp.as_file().sync_all()?;
	tmp.persist(path).map_err(|e| e.error)?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn family_file_names_round_trip() {
		let name = family_file_name("lol", COUNTS_EXTENSION);
		assert_eq!(name, "3_lol.txt");
		assert_eq!(parse_family_file_name(&name, COUNTS_EXTENSION).unwrap(), "lol");
	}

	#[test]
	fn malformed_family_file_names_are_rejected() {
		assert!(matches!(parse_family_file_name("lol.txt", "txt"), Err(AcrosticError::Format { .. })));
		assert!(matches!(parse_family_file_name("x_lol.txt", "txt"), Err(AcrosticError::Format { .. })));
		assert!(matches!(parse_family_file_name("3_lol.used", "txt"), Err(AcrosticError::Format { .. })));
		assert!(matches!(parse_family_file_name("2_lol.txt", "txt"), Err(AcrosticError::Mismatch { .. })));
	}

	#[test]
	fn failed_replace_keeps_original() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("1_a.txt");
		fs::write(&path, "a\t1\n").unwrap();

		let result = replace_atomically(&path, |w| {
			w.write_all(b"half written")?;
			Err(AcrosticError::format("boom"))
		});

		assert!(result.is_err());
		assert_eq!(fs::read_to_string(&path).unwrap(), "a\t1\n");
		assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
	}
}
