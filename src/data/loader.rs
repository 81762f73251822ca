//! Static impact dataset loading.
//!
//! Both datasets are read once per session and then held, unchanged, by a
//! `DatasetCache`. Views borrow slices from the cache and never mutate them.

use std::path::PathBuf;

use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::{DecileImpact, ManifestoImpact};

pub const MANIFESTO_FILE: &str = "manifesto_impact.json";
pub const DECILE_FILE: &str = "decile_impact.json";

const DATA_ENV: &str = "MANIFESTO_DATA";
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read dataset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Dataset request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Dataset request to {url} failed with status {status}.")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("Dataset '{location}' is not valid impact data: {source}")]
    Shape {
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the two dataset files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local directory holding both files.
    Dir(PathBuf),
    /// A web origin serving both files under `/data/`.
    Http { origin: String },
}

impl DataSource {
    /// `http(s)://...` is an origin; anything else is a directory.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Http {
                origin: raw.trim_end_matches('/').to_string(),
            }
        } else {
            DataSource::Dir(PathBuf::from(raw))
        }
    }

    /// Read `MANIFESTO_DATA` (after loading `.env`), defaulting to `./data`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(DATA_ENV) {
            Ok(v) if !v.trim().is_empty() => DataSource::parse(&v),
            _ => DataSource::Dir(PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// Human-readable location of one dataset file.
    pub fn location(&self, file: &str) -> String {
        match self {
            DataSource::Dir(dir) => dir.join(file).display().to_string(),
            DataSource::Http { origin } => format!("{origin}/data/{file}"),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Dir(dir) => write!(f, "{}", dir.display()),
            DataSource::Http { origin } => write!(f, "{origin}"),
        }
    }
}

/// Whether both datasets are available yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

/// Session cache for the two impact datasets.
///
/// Each dataset is fetched on first access and kept for the lifetime of the
/// cache. A failed fetch leaves the slot empty, so the next access retries.
pub struct DatasetCache {
    source: DataSource,
    client: OnceCell<Client>,
    manifesto: OnceCell<Vec<ManifestoImpact>>,
    decile: OnceCell<Vec<DecileImpact>>,
}

impl DatasetCache {
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            client: OnceCell::new(),
            manifesto: OnceCell::new(),
            decile: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Manifesto-level impacts, loaded on first call.
    pub fn manifesto(&self) -> Result<&[ManifestoImpact], LoadError> {
        self.manifesto
            .get_or_try_init(|| self.fetch(MANIFESTO_FILE))
            .map(Vec::as_slice)
    }

    /// Decile-level impacts, loaded on first call.
    pub fn decile(&self) -> Result<&[DecileImpact], LoadError> {
        self.decile
            .get_or_try_init(|| self.fetch(DECILE_FILE))
            .map(Vec::as_slice)
    }

    /// Load both datasets. The two loads are independent and run concurrently.
    pub fn load_all(&self) -> Result<(), LoadError> {
        let (manifesto, decile) = rayon::join(
            || self.manifesto().map(<[_]>::len),
            || self.decile().map(<[_]>::len),
        );
        let n_manifesto = manifesto?;
        let n_decile = decile?;
        info!(
            "loaded {n_manifesto} manifesto rows and {n_decile} decile rows from {}",
            self.source
        );
        Ok(())
    }

    /// Both datasets, if already loaded. Never triggers a fetch.
    pub fn loaded(&self) -> Option<(&[ManifestoImpact], &[DecileImpact])> {
        Some((self.manifesto.get()?.as_slice(), self.decile.get()?.as_slice()))
    }

    pub fn state(&self) -> LoadState {
        if self.manifesto.get().is_some() && self.decile.get().is_some() {
            LoadState::Ready
        } else {
            LoadState::Loading
        }
    }

    fn fetch<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, LoadError> {
        let location = self.source.location(file);
        debug!("fetching dataset {location}");

        let bytes = match &self.source {
            DataSource::Dir(dir) => {
                let path = dir.join(file);
                std::fs::read(&path).map_err(|source| LoadError::Io { path, source })?
            }
            DataSource::Http { .. } => fetch_bytes(self.client.get_or_init(Client::new), &location)?,
        };

        parse_rows(&bytes, &location).inspect_err(|e| warn!("{e}"))
    }
}

fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>, LoadError> {
    let resp = client.get(url).send().map_err(|source| LoadError::Transport {
        url: url.to_string(),
        source,
    })?;

    if !resp.status().is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let body = resp.bytes().map_err(|source| LoadError::Transport {
        url: url.to_string(),
        source,
    })?;
    Ok(body.to_vec())
}

/// Decode a JSON array of dataset rows.
pub fn parse_rows<T: DeserializeOwned>(bytes: &[u8], location: &str) -> Result<Vec<T>, LoadError> {
    serde_json::from_slice(bytes).map_err(|source| LoadError::Shape {
        location: location.to_string(),
        source,
    })
}
