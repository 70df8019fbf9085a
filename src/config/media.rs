use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Media host (Cloudinary) settings used for clinic images.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// TOML: `media.cloud_name`.
    #[serde(default)]
    pub cloud_name: String,

    /// TOML: `media.api_key`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub api_key: String,

    /// TOML: `media.api_secret`. Never logged.
    #[serde(default)]
    pub api_secret: String,

    /// Logical folder every clinic image is uploaded under.
    /// TOML: `media.folder`. Default: `pneumoaid_clinics`.
    #[serde(default = "default_folder")]
    pub folder: String,

    /// Upload API root; the cloud name and `image/upload` are appended.
    /// TOML: `media.api_base`. Default: `https://api.cloudinary.com/v1_1`.
    #[serde(default = "default_api_base")]
    pub api_base: Url,
}

impl MediaConfig {
    pub fn has_credentials(&self) -> bool {
        [&self.cloud_name, &self.api_key, &self.api_secret]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: default_folder(),
            api_base: default_api_base(),
        }
    }
}

/// Limits applied to the clinic image upload route.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// Request body limit for `POST /api/clinics`.
    /// TOML: `upload.max_upload_bytes`. Default: 5 MiB.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Image filename extensions accepted when `enforce_extensions` is on.
    /// TOML: `upload.allowed_extensions`. Default: `png, jpg, jpeg, gif`.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Reject images with other extensions before uploading. Off by default;
    /// format checks are otherwise left to the media host.
    /// TOML: `upload.enforce_extensions`. Default: `false`.
    #[serde(default)]
    pub enforce_extensions: bool,
}

impl UploadConfig {
    /// Case-insensitive check of the text after the last `.` in `file_name`.
    pub fn is_allowed_file(&self, file_name: &str) -> bool {
        file_name.rsplit_once('.').is_some_and(|(_, ext)| {
            self.allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            enforce_extensions: false,
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for media.api_key",
        )),
    }
}

fn default_folder() -> String {
    "pneumoaid_clinics".to_string()
}

fn default_api_base() -> Url {
    Url::parse("https://api.cloudinary.com/v1_1").expect("valid default media api base")
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_file_checks_last_extension() {
        let cfg = UploadConfig::default();
        assert!(cfg.is_allowed_file("clinic.PNG"));
        assert!(cfg.is_allowed_file("front.desk.jpeg"));
        assert!(!cfg.is_allowed_file("clinic.webp"));
        assert!(!cfg.is_allowed_file("png"));
        assert!(!cfg.is_allowed_file("archive.png.exe"));
    }

    #[test]
    fn credentials_require_all_three_values() {
        let mut cfg = MediaConfig::default();
        assert!(!cfg.has_credentials());
        cfg.cloud_name = "demo".into();
        cfg.api_key = "123".into();
        assert!(!cfg.has_credentials());
        cfg.api_secret = "shh".into();
        assert!(cfg.has_credentials());
    }
}
