//! Layer lists stacking generated overlays on top of an adaptive icon.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};

const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";

/// Ordered drawable references, bottom layer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerManifest {
    layers: Vec<String>,
}

impl LayerManifest {
    /// Starts a manifest whose bottom layer is `base`, e.g. `@drawable/easy_ic_launcher`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            layers: vec![base.into()],
        }
    }

    pub fn push(&mut self, reference: impl Into<String>) {
        self.layers.push(reference.into());
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Serializes to a `<layer-list>` document.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);

        let mut root = BytesStart::new("layer-list");
        root.push_attribute(("xmlns:android", ANDROID_NS));

        let events = [Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)), Event::Start(root)];
        for event in events {
            writer.write_event(event).map_err(xml_error)?;
        }
        for layer in &self.layers {
            let mut item = BytesStart::new("item");
            item.push_attribute(("android:drawable", layer.as_str()));
            writer.write_event(Event::Empty(item)).map_err(xml_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("layer-list")))
            .map_err(xml_error)?;

        let mut xml = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|err| Error::Manifest(err.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Writes the document to `path`, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::Manifest(err.to_string())
}
