//! Remote storage configuration.

/// Lifetime requested for signed URLs, in seconds.
pub const SIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Where the chord matrices live and how to reach them.
///
/// Values are baked in at build time from `SHHOR_STORAGE_URL`,
/// `SHHOR_STORAGE_KEY`, `SHHOR_PRIVATE_BUCKET` and `SHHOR_PUBLIC_BUCKET`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
	pub base_url: String,
	pub api_key: String,
	pub private_bucket: String,
	pub public_bucket: String,
	pub counts_file: String,
	pub pct_column_file: String,
	pub pct_global_file: String,
	pub signed_url_expiry_secs: u64,
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self {
			base_url: String::new(),
			api_key: String::new(),
			private_bucket: "private".into(),
			public_bucket: "public".into(),
			counts_file: "counts.json".into(),
			pct_column_file: "percentage_column.json".into(),
			pct_global_file: "percentage_global.json".into(),
			signed_url_expiry_secs: SIGNED_URL_EXPIRY_SECS,
		}
	}
}

impl StorageConfig {
	/// Build from compile-time environment, keeping defaults for unset keys.
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(url) = option_env!("SHHOR_STORAGE_URL") {
			config.base_url = url.trim_end_matches('/').to_string();
		}
		if let Some(key) = option_env!("SHHOR_STORAGE_KEY") {
			config.api_key = key.to_string();
		}
		if let Some(bucket) = option_env!("SHHOR_PRIVATE_BUCKET") {
			config.private_bucket = bucket.to_string();
		}
		if let Some(bucket) = option_env!("SHHOR_PUBLIC_BUCKET") {
			config.public_bucket = bucket.to_string();
		}
		config
	}

	/// Endpoint that issues a signed URL for a private object.
	pub fn sign_url(&self, filename: &str) -> String {
		format!(
			"{}/storage/v1/object/sign/{}/{}",
			self.base_url, self.private_bucket, filename
		)
	}

	/// Direct URL of a public object.
	pub fn public_url(&self, filename: &str) -> String {
		format!(
			"{}/storage/v1/object/public/{}/{}",
			self.base_url, self.public_bucket, filename
		)
	}

	/// Root that relative signed URLs are resolved against.
	pub fn storage_root(&self) -> String {
		format!("{}/storage/v1", self.base_url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> StorageConfig {
		StorageConfig {
			base_url: "https://store.example".into(),
			..StorageConfig::default()
		}
	}

	#[test]
	fn builds_object_urls() {
		let c = config();
		assert_eq!(
			c.sign_url("counts.json"),
			"https://store.example/storage/v1/object/sign/private/counts.json"
		);
		assert_eq!(
			c.public_url("percentage_global.json"),
			"https://store.example/storage/v1/object/public/public/percentage_global.json"
		);
		assert_eq!(c.storage_root(), "https://store.example/storage/v1");
	}

	#[test]
	fn default_expiry_is_one_hour() {
		assert_eq!(StorageConfig::default().signed_url_expiry_secs, 3600);
	}
}
