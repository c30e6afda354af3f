//! Flat-file page storage.
//!
//! A page titled `T` lives in `<pages_dir>/T.txt`. Titles are restricted to
//! ASCII letters and digits, so a title can never name a path outside the
//! pages directory.

use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use bw_core::{Error, Result};

const PAGE_EXT: &str = "txt";

/// A wiki page: a title and a raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// A page with an empty body, used to start editing a new page.
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// The body as text. Invalid UTF-8 is replaced rather than rejected.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// True when `title` is one or more ASCII letters or digits.
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Reads and writes pages in a single directory.
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, title: &str) -> Result<PathBuf> {
        if !is_valid_title(title) {
            return Err(Error::Validation(format!("invalid page title: {title:?}")));
        }
        Ok(self.dir.join(format!("{title}.{PAGE_EXT}")))
    }

    /// Write `page` to disk, replacing any previous content.
    ///
    /// New files are created owner read/write only.
    pub fn save(&self, page: &Page) -> Result<()> {
        let path = self.path_for(&page.title)?;

        let mut opts = OpenOptions::new();
        opts.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            opts.mode(0o600);
        }

        let mut file = opts.open(&path)?;
        file.write_all(&page.body)?;

        tracing::debug!(title = %page.title, bytes = page.body.len(), "Saved page");
        Ok(())
    }

    /// Read the page titled `title`.
    ///
    /// A missing file is [`Error::NotFound`]; other I/O failures are
    /// [`Error::Io`].
    pub fn load(&self, title: &str) -> Result<Page> {
        let path = self.path_for(title)?;
        match std::fs::read(&path) {
            Ok(body) => Ok(Page::new(title, body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("page", title))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Titles of every stored page, sorted.
    ///
    /// Files whose stem is not a valid title are skipped.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut titles = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(PAGE_EXT) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_title(stem) {
                    titles.push(stem.to_owned());
                }
            }
        }
        titles.sort();
        Ok(titles)
    }
}
