//! Small JSON documents kept under the plugin's data directory.
//!
//! Nicknames, the praise list and conversation backups are all tiny documents read and written
//! whole. Operations hit the filesystem directly; callers that need caching layer it on top.

use std::{
	collections::{HashMap, HashSet},
	io::ErrorKind,
	path::PathBuf,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, error, instrument};

use crate::types::StoreError;

/// One entry of the praise list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Praise {
	pub name: String,
	pub advantages: String,
}

/// The praise list document, `praises.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Praises {
	pub like: Vec<Praise>,
}

/// Seed document written the first time the praise list is loaded.
fn praises_init_data() -> Praises {
	Praises {
		like: vec![Praise {
			name: "Asankilp".to_string(),
			advantages: "赋予了Marsho猫娘人格，在vim与vscode的加持下为Marsho写了许多代码，使Marsho更加可爱"
				.to_string(),
		}],
	}
}

/// Identifies one conversation target, either a private chat or a group.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct ConversationId {
	pub id: String,
	pub private: bool,
}

impl ConversationId {
	/// The unique string key this conversation is stored under.
	pub fn uid(&self) -> String {
		if self.private {
			format!("private_{}", self.id)
		} else {
			format!("group_{}", self.id)
		}
	}
}

/// Accessor for the JSON documents under one data directory.
#[derive(Debug, Clone)]
pub struct DocStore {
	root: PathBuf,
}

impl DocStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Load the nickname table.
	///
	/// A missing or corrupt `nickname.json` yields an empty table rather than an error.
	#[instrument(skip(self))]
	pub async fn nicknames(&self) -> HashMap<String, String> {
		match fs::read_to_string(self.root.join("nickname.json")).await {
			Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
				error!("Failed to parse nickname.json, starting from empty: {}", e);
				HashMap::new()
			}),
			Err(_) => HashMap::new(),
		}
	}

	/// Set or clear one user's nickname and persist the table.
	///
	/// An empty `name` deletes the entry. Returns the updated table.
	#[instrument(skip(self))]
	pub async fn set_nickname(
		&self,
		user_id: &str,
		name: &str,
	) -> Result<HashMap<String, String>, StoreError> {
		let mut data = self.nicknames().await;
		if name.is_empty() {
			data.remove(user_id);
		} else {
			data.insert(user_id.to_string(), name.to_string());
		}

		fs::create_dir_all(&self.root).await?;
		fs::write(self.root.join("nickname.json"), serde_json::to_vec_pretty(&data)?).await?;

		debug!("Persisted nickname table with {} entries", data.len());

		Ok(data)
	}

	/// The nickname recorded for `user_id`, or an empty string.
	pub async fn nickname_of(&self, user_id: &str) -> String {
		self.nicknames().await.get(user_id).cloned().unwrap_or_default()
	}

	/// Load the praise list, creating it with the seed entry on first use.
	#[instrument(skip(self))]
	pub async fn praises(&self) -> Result<Praises, StoreError> {
		let path = self.root.join("praises.json");
		match fs::read_to_string(&path).await {
			Ok(raw) => Ok(serde_json::from_str(&raw)?),
			Err(e) if e.kind() == ErrorKind::NotFound => {
				debug!("praises.json missing, writing seed document");
				let seed = praises_init_data();
				fs::create_dir_all(&self.root).await?;
				fs::write(&path, serde_json::to_vec_pretty(&seed)?).await?;
				Ok(seed)
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Save a conversation context under `<subdir>/<name>.json`.
	#[instrument(skip(self, context))]
	pub async fn save_context(
		&self,
		name: &str,
		context: &Value,
		subdir: &str,
	) -> Result<(), StoreError> {
		let dir = self.root.join(subdir);
		fs::create_dir_all(&dir).await?;
		fs::write(dir.join(format!("{}.json", name)), serde_json::to_vec_pretty(context)?)
			.await?;

		Ok(())
	}

	/// Load a conversation context from `<subdir>/<name>.json`.
	///
	/// A missing file yields an empty list.
	#[instrument(skip(self))]
	pub async fn load_context(&self, name: &str, subdir: &str) -> Result<Value, StoreError> {
		let path = self.root.join(subdir).join(format!("{}.json", name));
		match fs::read_to_string(&path).await {
			Ok(raw) => Ok(serde_json::from_str(&raw)?),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(Value::Array(Vec::new())),
			Err(e) => Err(e.into()),
		}
	}
}

/// Tracks which conversation backups have been restored during this process lifetime.
///
/// Owned by the session manager as an explicit set keyed by conversation identity; its lifecycle
/// is tied to the tracker instance, not to hidden module state.
#[derive(Debug, Default)]
pub struct BackupTracker {
	loaded: HashSet<String>,
}

impl BackupTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Load the backed-up context for `target` the first time it is requested.
	///
	/// Subsequent requests for the same conversation yield an empty list; the backup must not be
	/// replayed into a session twice.
	#[instrument(skip(self, store))]
	pub async fn backup_context(
		&mut self,
		store: &DocStore,
		target: &ConversationId,
	) -> Result<Value, StoreError> {
		let uid = target.uid();
		if !self.loaded.insert(uid.clone()) {
			return Ok(Value::Array(Vec::new()))
		}

		debug!("Restoring backup context for {}", uid);

		store
			.load_context(&format!("back_up_context_{}", uid), "contexts/backup")
			.await
	}
}
