//! Multipart form decoding
//!
//! Browsers send a file part even when no file was chosen; an empty upload
//! is treated as no image.

use axum::extract::Multipart;
use tracing::debug;

use domain_sales::{ContractForm, ProposalForm};
use domain_template::InlineImage;

use crate::error::ApiError;

/// Name of the file field carrying the proposal image
pub const IMAGE_FIELD: &str = "imagem";

/// A decoded proposal submission
#[derive(Debug, Default)]
pub struct ProposalUpload {
    pub form: ProposalForm,
    pub image: Option<InlineImage>,
}

pub async fn read_proposal(mut multipart: Multipart) -> Result<ProposalUpload, ApiError> {
    let mut upload = ProposalUpload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field.bytes().await?;
            if bytes.is_empty() {
                continue;
            }
            let mut image = InlineImage::new(bytes.to_vec());
            if let Some(file_name) = file_name.filter(|f| !f.is_empty()) {
                image = image.with_file_name(file_name);
            }
            upload.image = Some(image);
            continue;
        }

        let value = field.text().await?;
        if !upload.form.set_field(&name, value) {
            debug!(field = %name, "Ignoring unknown proposal field");
        }
    }

    Ok(upload)
}

pub async fn read_contract(mut multipart: Multipart) -> Result<ContractForm, ApiError> {
    let mut form = ContractForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await?;
        if !form.set_field(&name, value)? {
            debug!(field = %name, "Ignoring unknown contract field");
        }
    }

    Ok(form)
}
