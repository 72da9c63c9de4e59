//! Uploads: how a session obtains a dataset when the default file is missing.

use log::info;
use snafu::prelude::*;

use std::fs;
use std::io::BufRead;

use crate::mbti::io_common::simplify_file_name;
use crate::mbti::{BMbtiResult, ReadingStdinSnafu, ReadingUploadSnafu};

pub const UPLOAD_MESSAGE: &str = "Upload a CSV file";

/// The content of an uploaded file. The name decides how it is parsed.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub content: Vec<u8>,
}

/// A channel through which the user may provide a file.
pub trait UploadPrompt {
    /// Asks for a file. Returns `None` if the user did not provide one (yet).
    fn request(&mut self, message: &str) -> BMbtiResult<Option<Upload>>;
}

/// Never provides a file.
pub struct NoUpload;

impl UploadPrompt for NoUpload {
    fn request(&mut self, _message: &str) -> BMbtiResult<Option<Upload>> {
        Ok(None)
    }
}

/// Asks for the path of a file to upload, one line of input per request.
/// An empty line means no upload.
pub struct PathPrompt<'a> {
    input: &'a mut dyn BufRead,
}

impl<'a> PathPrompt<'a> {
    pub fn new(input: &'a mut dyn BufRead) -> PathPrompt<'a> {
        PathPrompt { input }
    }
}

impl UploadPrompt for PathPrompt<'_> {
    fn request(&mut self, message: &str) -> BMbtiResult<Option<Upload>> {
        eprintln!("{} (path to a .csv or .xlsx file, empty to skip):", message);
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context(ReadingStdinSnafu {})?;
        let path = line.trim();
        if path.is_empty() {
            return Ok(None);
        }
        info!("Uploading {:?}", path);
        let content = fs::read(path).context(ReadingUploadSnafu { name: path })?;
        Ok(Some(Upload {
            name: simplify_file_name(path),
            content,
        }))
    }
}
