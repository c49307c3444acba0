//! Prompt defaults read from the host Cordova project.
//!
//! Only the three values the prompts need are extracted from `config.xml`:
//! the `version` attribute of the root `<widget>` and the text of its
//! `<name>` and `<description>` children.

use crate::error::{ConfigError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Defaults offered by the metadata prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDefaults {
    /// Application name
    pub name: String,
    /// Application version
    pub version: String,
    /// Application description
    pub description: String,
}

impl Default for HostDefaults {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: "1.0.0".to_string(),
            description: String::new(),
        }
    }
}

/// Read prompt defaults from a Cordova `config.xml`.
///
/// A missing file yields [`HostDefaults::default`]; values absent from the
/// file keep their default as well.
pub fn read_cordova_config(path: &Path) -> Result<HostDefaults> {
    if !path.exists() {
        log::warn!(
            "Host configuration {} not found, using built-in defaults",
            path.display()
        );
        return Ok(HostDefaults::default());
    }

    let host_error = |reason: String| ConfigError::HostConfig {
        path: path.to_path_buf(),
        reason,
    };
    let content = std::fs::read_to_string(path).map_err(|e| host_error(e.to_string()))?;
    let defaults = parse_cordova_config(&content).map_err(|e| host_error(e.to_string()))?;
    Ok(defaults)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Description,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Field::Name),
            b"description" => Some(Field::Description),
            _ => None,
        }
    }
}

/// Extract prompt defaults from `config.xml` content.
///
/// Only direct children of the root element are read, and the first
/// occurrence of each wins. Entity and character references are decoded.
pub fn parse_cordova_config(content: &str) -> std::result::Result<HostDefaults, quick_xml::Error> {
    let mut reader = Reader::from_str(content);

    let mut defaults = HostDefaults::default();
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;

    let mut depth = 0usize;
    let mut current: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if depth == 1 {
                    read_widget_version(&e, &mut defaults)?;
                } else if depth == 2 {
                    current = Field::from_tag(e.local_name().as_ref());
                    text.clear();
                }
            }
            Event::Empty(e) if depth == 0 => read_widget_version(&e, &mut defaults)?,
            Event::Text(t) if current.is_some() => text.push_str(&t.unescape()?),
            Event::CData(c) if current.is_some() => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::End(_) => {
                if depth == 2 {
                    match current.take() {
                        Some(Field::Name) if name.is_none() => name = Some(text.trim().to_string()),
                        Some(Field::Description) if description.is_none() => {
                            description = Some(text.trim().to_string());
                        }
                        _ => {}
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(name) = name {
        defaults.name = name;
    }
    if let Some(description) = description {
        defaults.description = description;
    }
    Ok(defaults)
}

fn read_widget_version(
    element: &BytesStart<'_>,
    defaults: &mut HostDefaults,
) -> std::result::Result<(), quick_xml::Error> {
    if element.local_name().as_ref() != b"widget" {
        return Ok(());
    }
    if let Some(attr) = element.try_get_attribute("version")? {
        let version = attr.unescape_value()?;
        let version = version.trim();
        if !version.is_empty() {
            defaults.version = version.to_string();
        }
    }
    Ok(())
}
