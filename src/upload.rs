use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::blocking::multipart::Part;

use crate::errors::ClientError;

pub const FALLBACK_MIME: &str = "application/octet-stream";

// what the picker's ".pdf,image/*" filter lets through
const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
];

pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    mime: &'static str,
    length: u64,
    source: Source,
}

impl SelectedFile {
    // picker: only PDF and image names get through
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SelectedFile, ClientError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for_name(&name)
            .ok_or_else(|| ClientError::UnsupportedFile { name: name.clone() })?;
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )
            .into());
        }
        Ok(SelectedFile {
            name,
            mime,
            length: metadata.len(),
            source: Source::Path(path.to_path_buf()),
        })
    }

    // drop: anything is taken
    pub fn from_reader<T: io::Read>(
        name: impl Into<String>,
        mut reader: T,
    ) -> Result<SelectedFile, ClientError> {
        let name = name.into();
        let mime = mime_for_name(&name).unwrap_or(FALLBACK_MIME);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(SelectedFile {
            name,
            mime,
            length: data.len() as u64,
            source: Source::Bytes(data.into()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn to_part(&self) -> Result<Part, ClientError> {
        let part = match &self.source {
            Source::Path(path) => {
                // re-read the length, the file may have changed since it was picked
                let file = fs::File::open(path)?;
                let length = file.metadata()?.len();
                Part::reader_with_length(file, length)
            }
            Source::Bytes(bytes) => Part::bytes(bytes.to_vec()),
        };
        Ok(part.file_name(self.name.clone()).mime_str(self.mime)?)
    }
}
