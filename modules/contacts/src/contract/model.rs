use std::fmt;

/// A stored contact as returned by the remote services.
///
/// Identifier and picture URLs are assigned server-side; they are `None` only
/// when the service omitted them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub contact_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub img_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", last) => last.to_string(),
            (first, "") => first.to_string(),
            (first, last) => format!("{first} {last}"),
        }
    }
}

/// Data for a contact that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_PHONE_LEN: usize = 25;

/// Image extensions accepted without a warning. Case-sensitive.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "gif", "jpeg"];

/// Upload format used when the file name carries no usable extension.
pub const DEFAULT_IMAGE_FORMAT: &str = "png";

const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/placeholder.png");

/// A picture picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            bytes,
        }
    }

    /// Built-in 1x1 transparent PNG sent when no picture was chosen.
    pub fn placeholder() -> Self {
        Self::new("placeholder.png", PLACEHOLDER_PNG.to_vec())
    }

    /// Suffix after the last `.` of the file name, if non-empty.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        (!ext.is_empty()).then_some(ext)
    }

    /// Value of the `format` query parameter on upload.
    pub fn upload_format(&self) -> &str {
        self.extension().unwrap_or(DEFAULT_IMAGE_FORMAT)
    }

    pub fn has_allowed_extension(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext))
    }

    pub fn mime_type(&self) -> &'static str {
        match self.extension() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}
