//! Aliyun OSS client over reqwest, signing requests with the V1 scheme.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::Deserialize;
use sha1::Sha1;
use url::Url;
use uuid::Uuid;

use guidebook_session::token::now_secs;

use crate::config::PortalConfig;
use crate::domain::port::MediaStorage;
use crate::domain::types::{MediaObject, UploadFile};
use crate::error::PortalError;
use crate::markdown::StorageLinks;

type HmacSha1 = Hmac<Sha1>;

const CACHE_CONTROL: &str = "max-age=31536000";

/// OSS caps one multi-delete request at 1000 keys.
const DELETE_BATCH_MAX: usize = 1000;

#[derive(Debug)]
struct OssCredentials {
    access_key_id: String,
    access_key_secret: String,
    bucket: String,
    /// `{bucket}.{endpoint}`
    host: String,
}

#[derive(Clone)]
pub struct OssStorage {
    http: reqwest::Client,
    creds: Arc<OssCredentials>,
    links: StorageLinks,
}

impl OssStorage {
    pub fn new(access_key_id: &str, access_key_secret: &str, bucket: &str, endpoint: &str) -> Self {
        let endpoint = endpoint
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        let host = format!("{bucket}.{endpoint}");
        Self {
            http: reqwest::Client::new(),
            links: StorageLinks::new(&host),
            creds: Arc::new(OssCredentials {
                access_key_id: access_key_id.to_owned(),
                access_key_secret: access_key_secret.to_owned(),
                bucket: bucket.to_owned(),
                host,
            }),
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(
            &config.oss_access_key_id,
            &config.oss_access_key_secret,
            &config.oss_bucket,
            &config.oss_endpoint,
        )
    }

    /// Host that public object URLs are served from.
    pub fn public_host(&self) -> &str {
        &self.creds.host
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.creds.host, key)
    }

    /// Object key for either a full object URL or a bare key.
    pub fn object_key(url_or_path: &str) -> String {
        if url_or_path.starts_with("http://") || url_or_path.starts_with("https://") {
            if let Ok(url) = Url::parse(url_or_path) {
                return url.path().trim_start_matches('/').to_owned();
            }
        }
        url_or_path.trim_start_matches('/').to_owned()
    }

    fn hmac_base64(&self, data: &str) -> String {
        let mut mac = HmacSha1::new_from_slice(self.creds.access_key_secret.as_bytes())
            .expect("HMAC key");
        mac.update(data.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Whether `url_or_path` is a bare key or a URL on this bucket's host.
    fn is_own_object(&self, url_or_path: &str) -> bool {
        if !(url_or_path.starts_with("http://") || url_or_path.starts_with("https://")) {
            return true;
        }
        Url::parse(url_or_path)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.eq_ignore_ascii_case(&self.creds.host)))
            .unwrap_or(false)
    }

    /// Query-string signed GET URL expiring at `expires` (epoch seconds).
    ///
    /// URLs on any other host are returned unchanged.
    pub fn sign_at(&self, url_or_path: &str, expires: u64) -> String {
        if url_or_path.is_empty() {
            return String::new();
        }
        if url_or_path.contains("OSSAccessKeyId") || !self.is_own_object(url_or_path) {
            return url_or_path.to_owned();
        }
        let key = Self::object_key(url_or_path);
        let string_to_sign = format!("GET\n\n\n{expires}\n/{}/{key}", self.creds.bucket);
        let signature = self.hmac_base64(&string_to_sign);
        let Ok(mut url) = Url::parse(&self.public_url(&key)) else {
            return url_or_path.to_owned();
        };
        url.query_pairs_mut()
            .append_pair("OSSAccessKeyId", &self.creds.access_key_id)
            .append_pair("Expires", &expires.to_string())
            .append_pair("Signature", &signature);
        url.into()
    }

    /// `Authorization` header value for a header-signed request.
    ///
    /// `oss_headers` must be lowercase and sorted by name.
    pub fn authorization(
        &self,
        verb: &str,
        content_md5: &str,
        content_type: &str,
        date: &str,
        oss_headers: &[(&str, &str)],
        resource: &str,
    ) -> String {
        let canonical_headers: String = oss_headers
            .iter()
            .map(|(k, v)| format!("{k}:{v}\n"))
            .collect();
        let string_to_sign =
            format!("{verb}\n{content_md5}\n{content_type}\n{date}\n{canonical_headers}{resource}");
        format!(
            "OSS {}:{}",
            self.creds.access_key_id,
            self.hmac_base64(&string_to_sign)
        )
    }

    fn resource(&self, key: &str) -> String {
        format!("/{}/{key}", self.creds.bucket)
    }

    async fn check(resp: reqwest::Response, what: &str) -> Result<reqwest::Response, PortalError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let code = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        Err(PortalError::Storage(format!(
            "{what} failed: status={code} body={text}"
        )))
    }

    async fn list_page(
        &self,
        prefix: &str,
        marker: Option<&str>,
    ) -> Result<ListBucketResult, PortalError> {
        let mut url = Url::parse(&format!("https://{}/", self.creds.host))
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("prefix", prefix);
            query.append_pair("max-keys", "1000");
            if let Some(marker) = marker {
                query.append_pair("marker", marker);
            }
        }
        let date = http_date();
        let auth = self.authorization("GET", "", "", &date, &[], &self.resource(""));
        let resp = self
            .http
            .get(url)
            .header("Date", &date)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        let body = Self::check(resp, "list objects")
            .await?
            .text()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        parse_list_result(&body)
    }
}

fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_owned())
}

fn guess_content_type(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

fn folder_prefix(folder: &str) -> String {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        String::new()
    } else {
        format!("{folder}/")
    }
}

// ── ListBucketResult XML ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListBucketResult {
    #[serde(default)]
    is_truncated: bool,
    next_marker: Option<String>,
    #[serde(default)]
    contents: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ObjectEntry {
    key: String,
    last_modified: String,
    size: u64,
}

fn parse_list_result(xml: &str) -> Result<ListBucketResult, PortalError> {
    quick_xml::de::from_str(xml).map_err(|e| PortalError::Storage(format!("list objects: {e}")))
}

fn delete_request_body(keys: &[String]) -> String {
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?><Delete><Quiet>true</Quiet>"#,
    );
    for key in keys {
        body.push_str("<Object><Key>");
        body.push_str(&quick_xml::escape::escape(key.as_str()));
        body.push_str("</Key></Object>");
    }
    body.push_str("</Delete>");
    body
}

impl MediaStorage for OssStorage {
    async fn upload(
        &self,
        file: &UploadFile,
        folder: &str,
        private: bool,
    ) -> Result<String, PortalError> {
        let ext = extension(&file.filename);
        let key = format!("{}{}.{ext}", folder_prefix(folder), Uuid::new_v4().simple());
        let content_type = file
            .content_type
            .clone()
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| guess_content_type(&ext).to_owned());
        let acl = if private { "private" } else { "public-read" };
        let date = http_date();
        let auth = self.authorization(
            "PUT",
            "",
            &content_type,
            &date,
            &[("x-oss-object-acl", acl)],
            &self.resource(&key),
        );

        let resp = self
            .http
            .put(self.public_url(&key))
            .header("Content-Type", &content_type)
            .header("Cache-Control", CACHE_CONTROL)
            .header("Content-Disposition", "inline")
            .header("x-oss-object-acl", acl)
            .header("Date", &date)
            .header("Authorization", auth)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        Self::check(resp, "upload object").await?;

        tracing::info!(key = %key, size = file.bytes.len(), private, "uploaded object");
        if private {
            Ok(key)
        } else {
            Ok(self.public_url(&key))
        }
    }

    fn sign(&self, url_or_path: &str, ttl_secs: u64) -> String {
        self.sign_at(url_or_path, now_secs() + ttl_secs)
    }

    fn links(&self) -> &StorageLinks {
        &self.links
    }

    async fn list(&self, prefix: &str, ttl_secs: u64) -> Result<Vec<MediaObject>, PortalError> {
        let mut entries = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = self.list_page(prefix, marker.as_deref()).await?;
            entries.extend(page.contents);
            match page.next_marker {
                Some(next) if page.is_truncated && !next.is_empty() => marker = Some(next),
                _ => break,
            }
        }

        let expires = now_secs() + ttl_secs;
        let mut objects: Vec<MediaObject> = entries
            .into_iter()
            .filter(|e| !e.key.ends_with('/'))
            .map(|e| {
                let last_modified = DateTime::parse_from_rfc3339(&e.last_modified)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_default();
                MediaObject {
                    name: e.key.rsplit('/').next().unwrap_or(&e.key).to_owned(),
                    url: self.sign_at(&e.key, expires),
                    path: e.key,
                    size: e.size,
                    last_modified,
                }
            })
            .collect();
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(objects)
    }

    async fn delete(&self, path: &str) -> Result<(), PortalError> {
        let key = Self::object_key(path);
        let date = http_date();
        let auth = self.authorization("DELETE", "", "", &date, &[], &self.resource(&key));
        let resp = self
            .http
            .delete(self.public_url(&key))
            .header("Date", &date)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| PortalError::Storage(e.to_string()))?;
        Self::check(resp, "delete object").await?;
        tracing::info!(key = %key, "deleted object");
        Ok(())
    }

    async fn delete_batch(&self, paths: &[String]) -> Result<(), PortalError> {
        let keys: Vec<String> = paths.iter().map(|p| Self::object_key(p)).collect();
        for chunk in keys.chunks(DELETE_BATCH_MAX) {
            let body = delete_request_body(chunk);
            let content_md5 = STANDARD.encode(Md5::digest(body.as_bytes()));
            let content_type = "application/xml";
            let date = http_date();
            let resource = format!("/{}/?delete", self.creds.bucket);
            let auth =
                self.authorization("POST", &content_md5, content_type, &date, &[], &resource);
            let resp = self
                .http
                .post(format!("https://{}/?delete", self.creds.host))
                .header("Content-MD5", content_md5)
                .header("Content-Type", content_type)
                .header("Date", &date)
                .header("Authorization", auth)
                .body(body)
                .send()
                .await
                .map_err(|e| PortalError::Storage(e.to_string()))?;
            Self::check(resp, "delete objects").await?;
        }
        tracing::info!(count = keys.len(), "deleted objects");
        Ok(())
    }
}
