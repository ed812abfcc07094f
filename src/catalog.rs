// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use serde::Deserialize;

use crate::episode::sanitize;
use crate::error::CatalogError;

/// A podcast subscription from the OPML catalog
///
/// Created once per `outline` entry and read-only afterwards. An outline
/// without a feed URL still yields a Show; fetching it later produces zero
/// episodes instead of failing the run.
#[derive(Debug, Clone)]
pub struct Show {
    pub title: String,
    pub feed_url: Option<String>,
}

impl Show {
    /// Directory name used for this show's downloads, derived
    /// deterministically from the title
    pub fn dir_name(&self) -> String {
        sanitize(&self.title)
    }
}

#[derive(Debug, Deserialize)]
struct OpmlDocument {
    #[serde(default)]
    body: OpmlBody,
}

#[derive(Debug, Default, Deserialize)]
struct OpmlBody {
    #[serde(rename = "outline", default)]
    outlines: Vec<Outline>,
}

#[derive(Debug, Deserialize)]
struct Outline {
    #[serde(rename = "@text", default)]
    text: String,
    // Some exporters write the attribute all-lowercase
    #[serde(rename = "@xmlUrl", alias = "@xmlurl")]
    xml_url: Option<String>,
}

/// Parse an OPML subscription list into Shows
///
/// Selects every `outline` element directly under `body`. A document that is
/// not valid XML is a `MalformedCatalog` error; nothing is processed in that
/// case.
pub fn parse_catalog(path: &Path) -> Result<Vec<Show>, CatalogError> {
    let xml = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let document: OpmlDocument =
        quick_xml::de::from_str(&xml).map_err(|e| CatalogError::MalformedCatalog {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(document
        .body
        .outlines
        .into_iter()
        .map(|outline| Show {
            title: outline.text,
            feed_url: outline.xml_url,
        })
        .collect())
}
