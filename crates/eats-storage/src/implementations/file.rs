//! File-based storage backend implementation for the order service.
//!
//! This module provides a filesystem implementation of the StorageInterface trait,
//! giving simple persistence without requiring external dependencies.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use eats_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use std::path::PathBuf;
use tokio::fs;

/// File-based storage implementation.
///
/// Each value is stored as a JSON file under a per-namespace subdirectory,
/// so listing a namespace is a single directory scan. Writes go through a
/// temporary file followed by a rename to stay atomic.
pub struct FileStorage {
	/// Base directory path for storing files.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage instance with the specified base path.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Converts a storage key to a filesystem-safe file path.
	///
	/// Keys have the form "namespace:id". The namespace becomes a
	/// subdirectory and the id becomes the file name, both sanitized.
	fn get_file_path(&self, key: &str) -> PathBuf {
		let (namespace, id) = key.split_once(':').unwrap_or(("", key));
		let safe_id = id.replace(['/', ':'], "_");
		match namespace {
			"" => self.base_path.join(format!("{}.json", safe_id)),
			ns => {
				let safe_ns = ns.replace(['/', ':'], "_");
				self.base_path
					.join(safe_ns)
					.join(format!("{}.json", safe_id))
			},
		}
	}

	/// Converts a namespace to its directory path.
	fn get_namespace_dir(&self, namespace: &str) -> PathBuf {
		self.base_path.join(namespace.replace(['/', ':'], "_"))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);

		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		// Create parent directory if it doesn't exist
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write atomically by writing to temp file then renaming
		let temp_path = path.with_extension("tmp");
		fs::write(&temp_path, value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.get_file_path(key);

		match fs::remove_file(&path).await {
			Ok(_) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.get_file_path(key);
		Ok(path.exists())
	}

	async fn list_bytes(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let dir = self.get_namespace_dir(namespace);

		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut values = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let path = entry.path();
			// In-flight temp files are skipped by the extension filter
			if path.extension() == Some(std::ffi::OsStr::new("json")) {
				let data = fs::read(&path)
					.await
					.map_err(|e| StorageError::Backend(e.to_string()))?;
				values.push(data);
			}
		}
		Ok(values)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![], // No required fields
			vec![Field::new("storage_path", FieldType::String)],
		);

		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for file storage (default: "./data/storage")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or("./data/storage")
		.to_string();

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

/// Registry entry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_persists_across_instances() {
		let dir = tempfile::tempdir().unwrap();

		let storage = FileStorage::new(dir.path().to_path_buf());
		storage
			.set_bytes("orders:abc", b"payload".to_vec())
			.await
			.unwrap();

		// A fresh instance over the same directory sees the data
		let reopened = FileStorage::new(dir.path().to_path_buf());
		let retrieved = reopened.get_bytes("orders:abc").await.unwrap();
		assert_eq!(retrieved, b"payload".to_vec());
	}

	#[tokio::test]
	async fn test_missing_key() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		let result = storage.get_bytes("orders:missing").await;
		assert!(matches!(result, Err(StorageError::NotFound)));

		// Deleting a missing key is not an error
		storage.delete("orders:missing").await.unwrap();
	}

	#[tokio::test]
	async fn test_list_namespace() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path().to_path_buf());

		storage.set_bytes("orders:1", b"a".to_vec()).await.unwrap();
		storage.set_bytes("orders:2", b"b".to_vec()).await.unwrap();
		storage.set_bytes("dishes:1", b"c".to_vec()).await.unwrap();

		let mut listed = storage.list_bytes("orders").await.unwrap();
		listed.sort();
		assert_eq!(listed, vec![b"a".to_vec(), b"b".to_vec()]);

		// An unused namespace lists as empty rather than erroring
		assert!(storage.list_bytes("couriers").await.unwrap().is_empty());
	}
}
