use crate::error::ClinicDeskError;
use crate::media::ImageUpload;
use axum::extract::Multipart;

pub const DEFAULT_STATUS: &str = "active";

/// Fields of a create-clinic submission. Everything is optional until validated.
#[derive(Debug, Default, Clone)]
pub struct ClinicForm {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A submission whose required fields are all present and non-empty.
#[derive(Debug, Clone)]
pub struct ValidClinic {
    pub name: String,
    pub identifier: String,
    pub location: String,
    pub status: String,
    pub username: String,
    pub password: String,
}

fn present(v: Option<&String>) -> bool {
    v.is_some_and(|s| !s.is_empty())
}

impl ClinicForm {
    /// Reads every part of the multipart body; unknown parts are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ClinicDeskError> {
        let mut form = ClinicForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.image = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                "name" => form.name = Some(field.text().await?),
                "identifier" => form.identifier = Some(field.text().await?),
                "location" => form.location = Some(field.text().await?),
                "status" => form.status = Some(field.text().await?),
                "username" => form.username = Some(field.text().await?),
                "password" => form.password = Some(field.text().await?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Takes the image part, rejecting a missing part or an empty filename.
    pub fn take_image(&mut self) -> Result<ImageUpload, ClinicDeskError> {
        match self.image.take() {
            None => Err(ClinicDeskError::NoImage),
            Some(image) if image.file_name.is_empty() => Err(ClinicDeskError::EmptyImageName),
            Some(image) => Ok(image),
        }
    }

    /// Required fields that are absent or empty, in the order they are checked.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("identifier", &self.identifier),
            ("location", &self.location),
            ("username", &self.username),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, v)| !present(v.as_ref()))
        .map(|(field, _)| field)
        .collect()
    }

    /// `status` falls back to `active` only when the part is absent; a blank part is kept.
    pub fn validate(self) -> Result<ValidClinic, ClinicDeskError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ClinicDeskError::MissingFields(missing));
        }

        Ok(ValidClinic {
            name: self.name.unwrap_or_default(),
            identifier: self.identifier.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_form() -> ClinicForm {
        ClinicForm {
            name: Some("Hope Clinic".into()),
            identifier: Some("HC-001".into()),
            location: Some("Lagos, NG".into()),
            status: None,
            username: Some("hope".into()),
            password: Some("s3cret".into()),
            image: Some(ImageUpload {
                file_name: "hope.png".into(),
                content_type: Some("image/png".into()),
                bytes: vec![0x89, b'P', b'N', b'G'],
            }),
        }
    }

    #[test]
    fn complete_form_validates_with_default_status() {
        let valid = full_form().validate().unwrap();
        assert_eq!(valid.status, DEFAULT_STATUS);
        assert_eq!(valid.username, "hope");
    }

    #[test]
    fn explicit_status_is_kept() {
        let mut form = full_form();
        form.status = Some("inactive".into());
        assert_eq!(form.validate().unwrap().status, "inactive");
    }

    #[test]
    fn blank_status_part_is_stored_as_sent() {
        let mut form = full_form();
        form.status = Some(String::new());
        assert_eq!(form.validate().unwrap().status, "");
    }

    #[test]
    fn missing_fields_follow_check_order() {
        let form = ClinicForm {
            name: None,
            identifier: Some(String::new()),
            location: Some("Abuja".into()),
            status: None,
            username: Some("x".into()),
            password: None,
            image: None,
        };
        assert_eq!(form.missing_fields(), ["name", "identifier", "password"]);
        match form.validate() {
            Err(ClinicDeskError::MissingFields(fields)) => {
                assert_eq!(fields, ["name", "identifier", "password"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn image_checks() {
        let mut form = full_form();
        assert!(form.take_image().is_ok());
        assert!(matches!(form.take_image(), Err(ClinicDeskError::NoImage)));

        let mut form = full_form();
        if let Some(image) = form.image.as_mut() {
            image.file_name.clear();
        }
        assert!(matches!(
            form.take_image(),
            Err(ClinicDeskError::EmptyImageName)
        ));
    }
}
