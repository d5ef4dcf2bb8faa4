use std::path::Path;

use crate::contract::model::ImageBlob;

/// Read a picture from disk, keeping its file name for the upload format.
pub async fn read_image(path: impl AsRef<Path>) -> std::io::Result<ImageBlob> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    Ok(ImageBlob { file_name, bytes })
}
