use std::fmt;
use std::io;
use std::path::Path;

/// The fields of the intake form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Name,
    Age,
    Role,
    Company,
    Image,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Email,
        Field::Name,
        Field::Age,
        Field::Role,
        Field::Company,
        Field::Image,
    ];

    /// Form control name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Name => "name",
            Self::Age => "age",
            Self::Role => "role",
            Self::Company => "company",
            Self::Image => "image",
        }
    }

    /// Human readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Name => "Name",
            Self::Age => "Age",
            Self::Role => "Role",
            Self::Company => "Company",
            Self::Image => "Image",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Email => 0,
            Self::Name => 1,
            Self::Age => 2,
            Self::Role => 3,
            Self::Company => 4,
            Self::Image => 5,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded image kept as raw bytes until submit time.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, mime, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// New value for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(Option<ImageFile>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<ImageFile> for FieldValue {
    fn from(value: ImageFile) -> Self {
        Self::File(Some(value))
    }
}

/// In-progress form data. `age` stays raw text until submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    pub email: String,
    pub name: String,
    pub age: String,
    pub role: String,
    pub company: String,
    pub image: Option<ImageFile>,
}

impl ProfileDraft {
    /// Raw text of a text field; `None` for the image.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Email => Some(&self.email),
            Field::Name => Some(&self.name),
            Field::Age => Some(&self.age),
            Field::Role => Some(&self.role),
            Field::Company => Some(&self.company),
            Field::Image => None,
        }
    }

    /// Store a value. Returns false when the value kind does not fit the field.
    pub fn apply(&mut self, field: Field, value: FieldValue) -> bool {
        match (field, value) {
            (Field::Image, FieldValue::File(file)) => {
                self.image = file;
                true
            }
            (field, FieldValue::Text(text)) => match self.text_mut(field) {
                Some(target) => {
                    *target = text;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::Name => Some(&mut self.name),
            Field::Age => Some(&mut self.age),
            Field::Role => Some(&mut self.role),
            Field::Company => Some(&mut self.company),
            Field::Image => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_text_to_text_field() {
        let mut draft = ProfileDraft::default();
        assert!(draft.apply(Field::Company, "Google".into()));
        assert_eq!(draft.company, "Google");
    }

    #[test]
    fn apply_rejects_mismatched_kinds() {
        let mut draft = ProfileDraft::default();
        assert!(!draft.apply(Field::Image, "not a file".into()));
        let file = ImageFile::new("a.png", "image/png", vec![1, 2, 3]);
        assert!(!draft.apply(Field::Name, file.into()));
        assert_eq!(draft, ProfileDraft::default());
    }

    #[test]
    fn image_debug_hides_bytes() {
        let file = ImageFile::new("a.png", "image/png", vec![7; 32]);
        let debug = format!("{:?}", file);
        assert!(debug.contains("size: 32"));
        assert!(!debug.contains("7, 7"));
    }

    #[test]
    fn field_index_matches_all_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }
}
