//! Loader for configurations split across several TOML files.
//!
//! The entry file may name other files through an `include` directive. Included
//! files may include further files; every file is loaded at most once, and each
//! top-level section must come from exactly one file.

use crate::{resolve_env_vars, Config, ConfigError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader that handles multi-file configurations with includes.
pub struct ConfigLoader {
	/// Base path for resolving relative includes
	base_path: PathBuf,
	/// Canonical paths already read, used to reject include cycles
	loaded_files: HashSet<PathBuf>,
	/// File each top-level section came from, for duplicate reporting
	section_sources: HashMap<String, PathBuf>,
}

impl ConfigLoader {
	/// Creates a new ConfigLoader with the given base path.
	pub fn new(base_path: impl AsRef<Path>) -> Self {
		Self {
			base_path: base_path.as_ref().to_path_buf(),
			loaded_files: HashSet::new(),
			section_sources: HashMap::new(),
		}
	}

	/// Loads a configuration file, merges its includes and validates the result.
	pub async fn load_config(
		&mut self,
		config_path: impl AsRef<Path>,
	) -> Result<Config, ConfigError> {
		let config_path = self.resolve_path(&self.base_path, config_path)?;
		let content = self.load_file(&config_path).await?;
		let root: toml::Value = toml::from_str(&content)?;

		if extract_includes(&root)?.is_empty() {
			return content.parse();
		}

		let mut combined = toml::Table::new();
		self.merge_file(&mut combined, root, config_path).await?;

		let combined_str = toml::to_string(&combined).map_err(|e| {
			ConfigError::Parse(format!("Failed to serialize combined config: {}", e))
		})?;
		combined_str.parse()
	}

	/// Merges `value` (read from `source`) into `combined`, then recurses into
	/// the files it includes, relative to `source`'s directory.
	async fn merge_file(
		&mut self,
		combined: &mut toml::Table,
		value: toml::Value,
		source: PathBuf,
	) -> Result<(), ConfigError> {
		let includes = extract_includes(&value)?;
		let toml::Value::Table(mut table) = value else {
			return Err(ConfigError::Parse(format!(
				"{} is not a TOML table",
				source.display()
			)));
		};
		table.remove("include");

		for (key, section) in table {
			if let Some(existing_source) = self.section_sources.get(&key) {
				return Err(ConfigError::Validation(format!(
					"Duplicate section '{}' found in {} and {}. \
					Each top-level section must be unique across all configuration files.",
					key,
					existing_source.display(),
					source.display()
				)));
			}
			self.section_sources.insert(key.clone(), source.clone());
			combined.insert(key, section);
		}

		let include_base = source
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_else(|| self.base_path.clone());

		for include in includes {
			let include_path = self.resolve_path(&include_base, &include)?;
			debug!(path = %include_path.display(), "Loading included configuration");
			let content = self.load_file(&include_path).await?;
			let included: toml::Value = toml::from_str(&content)?;
			Box::pin(self.merge_file(combined, included, include_path)).await?;
		}

		Ok(())
	}

	/// Reads a file and resolves environment variables, rejecting files that
	/// were already loaded.
	async fn load_file(&mut self, path: &Path) -> Result<String, ConfigError> {
		let canonical_path = tokio::fs::canonicalize(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Cannot resolve path {}: {}", path.display(), e),
			))
		})?;

		if !self.loaded_files.insert(canonical_path.clone()) {
			return Err(ConfigError::Validation(format!(
				"Circular include detected: {} was already loaded",
				canonical_path.display()
			)));
		}

		let content = tokio::fs::read_to_string(path).await?;
		resolve_env_vars(&content)
	}

	/// Resolves `path` against `base` unless it is absolute.
	fn resolve_path(&self, base: &Path, path: impl AsRef<Path>) -> Result<PathBuf, ConfigError> {
		let path = path.as_ref();

		let resolved = if path.is_absolute() {
			path.to_path_buf()
		} else {
			base.join(path)
		};

		if !resolved.exists() {
			return Err(ConfigError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("Configuration file not found: {}", resolved.display()),
			)));
		}

		Ok(resolved)
	}
}

/// Reads the `include` directive, which may be a single path or an array of paths.
fn extract_includes(toml: &toml::Value) -> Result<Vec<PathBuf>, ConfigError> {
	match toml.get("include") {
		None => Ok(Vec::new()),
		Some(toml::Value::String(path)) => Ok(vec![PathBuf::from(path)]),
		Some(toml::Value::Array(items)) => items
			.iter()
			.map(|item| {
				item.as_str().map(PathBuf::from).ok_or_else(|| {
					ConfigError::Validation("Include array must contain only strings".into())
				})
			})
			.collect(),
		Some(_) => Err(ConfigError::Validation(
			"Include must be a string or array of strings".into(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const INTENT: &str = r#"
[intent]
salt = "loader-test"
"#;

	const NETWORKS: &str = r#"
[networks.11155111]
intent_factory_address = "0x1111111111111111111111111111111111111111"
[[networks.11155111.tokens]]
address = "0xBF882Fc99800A93494fe4844DC0002FcbaA79A7A"
symbol = "USDT"
decimals = 2

[networks.357]
intent_factory_address = "0x2222222222222222222222222222222222222222"
"#;

	#[tokio::test]
	async fn test_single_file_config() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");
		fs::write(&config_path, format!("{}{}", INTENT, NETWORKS)).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config(&config_path).await.unwrap();

		assert_eq!(config.intent.salt, "loader-test");
		assert_eq!(config.networks.len(), 2);
	}

	#[tokio::test]
	async fn test_config_with_includes() {
		let temp_dir = TempDir::new().unwrap();
		let main_config = format!("include = [\"networks.toml\"]\n{}", INTENT);

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("networks.toml"), NETWORKS).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config("main.toml").await.unwrap();

		assert_eq!(config.intent.salt, "loader-test");
		assert_eq!(config.networks[&11155111].tokens[0].symbol, "USDT");
	}

	#[tokio::test]
	async fn test_nested_include_resolves_relative_to_includer() {
		let temp_dir = TempDir::new().unwrap();
		let nested = temp_dir.path().join("nested");
		fs::create_dir(&nested).unwrap();

		fs::write(
			temp_dir.path().join("main.toml"),
			format!("include = \"nested/intent.toml\"\n{}", NETWORKS),
		)
		.unwrap();
		fs::write(
			nested.join("intent.toml"),
			"include = [\"account.toml\"]\n[intent]\nsalt = \"nested\"\n",
		)
		.unwrap();
		fs::write(
			nested.join("account.toml"),
			"[account]\nprivate_key = \"0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\"\n",
		)
		.unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let config = loader.load_config("main.toml").await.unwrap();

		assert_eq!(config.intent.salt, "nested");
		assert!(config.account.is_some());
	}

	#[tokio::test]
	async fn test_duplicate_section_error() {
		let temp_dir = TempDir::new().unwrap();
		let main_config = format!("include = [\"duplicate.toml\"]\n{}{}", INTENT, NETWORKS);

		fs::write(temp_dir.path().join("main.toml"), main_config).unwrap();
		fs::write(temp_dir.path().join("duplicate.toml"), INTENT).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("main.toml").await;

		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.contains("Duplicate section 'intent'"));
	}

	#[tokio::test]
	async fn test_self_include_detection() {
		let temp_dir = TempDir::new().unwrap();
		let config = format!("include = [\"self.toml\"]\n{}", INTENT);
		fs::write(temp_dir.path().join("self.toml"), config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("self.toml").await;

		let error_msg = result.unwrap_err().to_string();
		assert!(error_msg.contains("already loaded"));
	}

	#[tokio::test]
	async fn test_missing_include_reported() {
		let temp_dir = TempDir::new().unwrap();
		let config = format!("include = [\"absent.toml\"]\n{}", INTENT);
		fs::write(temp_dir.path().join("main.toml"), config).unwrap();

		let mut loader = ConfigLoader::new(temp_dir.path());
		let result = loader.load_config("main.toml").await;

		assert!(matches!(result, Err(ConfigError::Io(_))));
	}

	#[tokio::test]
	async fn test_from_file_entry_point() {
		let temp_dir = TempDir::new().unwrap();
		let config_path = temp_dir.path().join("config.toml");
		fs::write(&config_path, format!("{}{}", INTENT, NETWORKS)).unwrap();

		let config = Config::from_file(config_path.to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.intent.domain_name, "SignOrder");
	}

	#[tokio::test]
	async fn test_shipped_demo_config_loads() {
		let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/demo.toml");

		let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
		assert_eq!(config.networks.len(), 2);
		assert_eq!(config.networks[&11155111].tokens.len(), 3);
		assert!(config.account.is_some());
	}
}
