use gloo_net::http::{Request, Response};
use log::{debug, error, info};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::types::{CountsResource, PercentResource};
use super::{ChordData, FetchError};
use crate::config::StorageConfig;

#[derive(Deserialize)]
struct SignResponse {
	#[serde(rename = "signedURL")]
	signed_url: Option<String>,
}

/// Fetch the counts matrix (through a fresh signed URL) and both percentage
/// matrices, in that order.
pub async fn load_all_data(config: &StorageConfig) -> Result<ChordData, FetchError> {
	let result = fetch_all(config).await;
	match &result {
		Ok(data) => info!("Loaded chord data for {} categories", data.labels.len()),
		Err(err) => error!("Chord data load failed: {err}"),
	}
	result
}

async fn fetch_all(config: &StorageConfig) -> Result<ChordData, FetchError> {
	let counts_url = signed_url(config, &config.counts_file).await?;
	debug!("Fetching {} via signed URL", config.counts_file);
	let resp = Request::get(&counts_url)
		.send()
		.await
		.map_err(|e| FetchError::network(&config.counts_file, e))?;
	let counts: CountsResource = read_json(&config.counts_file, resp).await?;

	let pct_column: PercentResource = load_public_json(config, &config.pct_column_file).await?;
	let pct_global: PercentResource = load_public_json(config, &config.pct_global_file).await?;

	let data = ChordData {
		labels: counts.columns,
		matrix: counts.data,
		pct_col_matrix: pct_column.data,
		pct_global_matrix: pct_global.data,
	};
	data.validate()?;
	Ok(data)
}

/// Request a short-lived URL for a private object.
async fn signed_url(config: &StorageConfig, filename: &str) -> Result<String, FetchError> {
	debug!("Requesting signed URL for {filename}");
	let what = format!("signed URL for {filename}");
	let resp = Request::post(&config.sign_url(filename))
		.header("apikey", &config.api_key)
		.header("Authorization", &format!("Bearer {}", config.api_key))
		.json(&serde_json::json!({ "expiresIn": config.signed_url_expiry_secs }))
		.map_err(|e| FetchError::network(&what, e))?
		.send()
		.await
		.map_err(|e| FetchError::network(&what, e))?;

	let text = read_body(&what, resp).await?;
	parse_signed_url(config, filename, &text)
}

fn parse_signed_url(config: &StorageConfig, filename: &str, body: &str) -> Result<String, FetchError> {
	let parsed: SignResponse = serde_json::from_str(body)
		.map_err(|e| FetchError::parse(&format!("signed URL response for {filename}"), e))?;
	let signed = parsed
		.signed_url
		.filter(|s| !s.is_empty())
		.ok_or_else(|| FetchError::MissingSignedUrl(filename.to_string()))?;
	Ok(resolve_signed_url(&config.storage_root(), &signed))
}

/// Absolute signed URLs pass through; relative ones hang off the storage root.
pub fn resolve_signed_url(storage_root: &str, signed: &str) -> String {
	if signed.starts_with("http") {
		signed.to_string()
	} else {
		format!("{storage_root}{signed}")
	}
}

async fn load_public_json<T: DeserializeOwned>(
	config: &StorageConfig,
	filename: &str,
) -> Result<T, FetchError> {
	debug!("Fetching public {filename}");
	let resp = Request::get(&config.public_url(filename))
		.send()
		.await
		.map_err(|e| FetchError::network(filename, e))?;
	read_json(filename, resp).await
}

async fn read_json<T: DeserializeOwned>(what: &str, resp: Response) -> Result<T, FetchError> {
	let text = read_body(what, resp).await?;
	parse_json(what, &text)
}

/// Response body, or a status error carrying it when the response isn't OK.
async fn read_body(what: &str, resp: Response) -> Result<String, FetchError> {
	let status = resp.status();
	let ok = resp.ok();
	let text = resp.text().await.map_err(|e| FetchError::network(what, e))?;
	check_status(what, status, ok, text)
}

fn check_status(what: &str, status: u16, ok: bool, body: String) -> Result<String, FetchError> {
	if ok {
		Ok(body)
	} else {
		Err(FetchError::Status {
			what: what.to_string(),
			status,
			body,
		})
	}
}

fn parse_json<T: DeserializeOwned>(what: &str, body: &str) -> Result<T, FetchError> {
	serde_json::from_str(body).map_err(|e| FetchError::parse(what, e))
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
	fn absolute_signed_url_is_kept() {
		let url = resolve_signed_url("https://store.example/storage/v1", "https://cdn.example/x?token=1");
		assert_eq!(url, "https://cdn.example/x?token=1");
	}

	#[test]
	fn relative_signed_url_is_prefixed() {
		let url = resolve_signed_url(
			"https://store.example/storage/v1",
			"/object/sign/private/counts.json?token=abc",
		);
		assert_eq!(
			url,
			"https://store.example/storage/v1/object/sign/private/counts.json?token=abc"
		);
	}

	#[test]
	fn sign_response_is_parsed() {
		let url = parse_signed_url(&config(), "counts.json", r#"{"signedURL":"/object/sign/p/c?t=1"}"#)
			.unwrap();
		assert_eq!(url, "https://store.example/storage/v1/object/sign/p/c?t=1");
	}

	#[test]
	fn missing_signed_url_is_an_error() {
		let err = parse_signed_url(&config(), "counts.json", r#"{"error":"nope"}"#).unwrap_err();
		assert_eq!(err, FetchError::MissingSignedUrl("counts.json".into()));
	}

	#[test]
	fn forbidden_response_keeps_status_and_body() {
		let err = check_status("signed URL for counts.json", 403, false, "denied".into()).unwrap_err();
		assert_eq!(
			err,
			FetchError::Status {
				what: "signed URL for counts.json".into(),
				status: 403,
				body: "denied".into(),
			}
		);
	}

	#[test]
	fn ok_response_passes_body_through() {
		let body = check_status("pct.json", 200, true, "{}".into()).unwrap();
		assert_eq!(body, "{}");
	}

	#[test]
	fn unparsable_resource_is_a_parse_error() {
		let err = parse_json::<PercentResource>("pct.json", "{\"data\": [[1, ").unwrap_err();
		assert!(matches!(err, FetchError::Parse { ref what, .. } if what == "pct.json"));

		let counts: CountsResource =
			parse_json("counts.json", r#"{"columns":["a"],"data":[[0]]}"#).unwrap();
		assert_eq!(counts.columns, vec!["a".to_string()]);
	}

	#[test]
	fn garbage_sign_response_is_a_parse_error() {
		let err = parse_signed_url(&config(), "counts.json", "<html>").unwrap_err();
		assert!(matches!(err, FetchError::Parse { .. }));
	}
}
