//! Layout and detection documents (JSON).
//!
//! Layout keys follow the planogram export (`DOLAP` / `RAFLAR` / `URUNLER`
//! with `X`, `Y`, `W`, `H`, `SINIF`); English aliases are accepted too.

use crate::error::{Error, Result};
use crate::models::{BoundingBox, CatalogItem, DetectionSet, Layout, Point, Shelf};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LayoutDocument {
    #[serde(rename = "DOLAP", alias = "cabinet")]
    cabinet: CabinetEntry,
}

#[derive(Debug, Deserialize)]
struct CabinetEntry {
    #[serde(rename = "X", alias = "x")]
    x: i64,
    #[serde(rename = "Y", alias = "y")]
    y: i64,
    #[serde(rename = "W", alias = "width")]
    width: i64,
    #[serde(rename = "H", alias = "height")]
    height: i64,
    #[serde(rename = "RAFLAR", alias = "shelves")]
    shelves: Vec<ShelfEntry>,
}

#[derive(Debug, Deserialize)]
struct ShelfEntry {
    #[serde(rename = "X", alias = "x")]
    x: i64,
    #[serde(rename = "Y", alias = "y")]
    y: i64,
    #[serde(rename = "W", alias = "width")]
    width: i64,
    #[serde(rename = "H", alias = "height")]
    height: i64,
    #[serde(rename = "URUNLER", alias = "items")]
    items: Vec<ItemEntry>,
}

#[derive(Debug, Deserialize)]
struct ItemEntry {
    #[serde(rename = "X", alias = "x")]
    x: i64,
    #[serde(rename = "Y", alias = "y")]
    y: i64,
    #[serde(rename = "W", alias = "width")]
    width: i64,
    #[serde(rename = "H", alias = "height")]
    height: i64,
    #[serde(rename = "SINIF", alias = "label")]
    label: u32,
}

#[derive(Debug, Deserialize)]
struct DetectionDocument {
    image_width: u32,
    image_height: u32,
    corner_x1: f64,
    corner_y1: f64,
    corner_x2: f64,
    corner_y2: f64,
    corner_x3: f64,
    corner_y3: f64,
    corner_x4: f64,
    corner_y4: f64,
    detections: Vec<DetectionEntry>,
}

#[derive(Debug, Deserialize)]
struct DetectionEntry {
    #[serde(rename = "class", alias = "label")]
    label: u32,
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

fn with_context<T>(what: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        Error::MalformedInput { message } => Error::malformed(format!("{what}: {message}")),
        other => other,
    })
}

impl TryFrom<LayoutDocument> for Layout {
    type Error = Error;

    fn try_from(doc: LayoutDocument) -> Result<Self> {
        let c = doc.cabinet;
        let bounds = with_context(
            "layout bounds",
            BoundingBox::from_origin_size(c.x, c.y, c.width, c.height),
        )?;
        let mut shelves = Vec::with_capacity(c.shelves.len());
        for (s_idx, s) in c.shelves.into_iter().enumerate() {
            let shelf_bounds = with_context(
                &format!("shelf {s_idx}"),
                BoundingBox::from_origin_size(s.x, s.y, s.width, s.height),
            )?;
            let mut items = Vec::with_capacity(s.items.len());
            for (i_idx, it) in s.items.into_iter().enumerate() {
                let bbox = with_context(
                    &format!("shelf {s_idx} item {i_idx}"),
                    BoundingBox::from_origin_size(it.x, it.y, it.width, it.height),
                )?;
                items.push(CatalogItem::new(it.label, bbox));
            }
            shelves.push(Shelf::new(shelf_bounds, items));
        }
        Layout::new(bounds, shelves)
    }
}

impl TryFrom<DetectionDocument> for DetectionSet {
    type Error = Error;

    fn try_from(doc: DetectionDocument) -> Result<Self> {
        let corners = [
            Point::new(doc.corner_x1, doc.corner_y1),
            Point::new(doc.corner_x2, doc.corner_y2),
            Point::new(doc.corner_x3, doc.corner_y3),
            Point::new(doc.corner_x4, doc.corner_y4),
        ];
        let mut items = Vec::with_capacity(doc.detections.len());
        for (idx, d) in doc.detections.into_iter().enumerate() {
            let bbox = with_context(
                &format!("detection {idx}"),
                BoundingBox::from_float_truncated(d.left, d.top, d.right, d.bottom),
            )?;
            items.push(CatalogItem::new(d.label, bbox));
        }
        DetectionSet::new(doc.image_width, doc.image_height, corners, items)
    }
}

fn parse_document<T: DeserializeOwned>(contents: &str, path: &Path) -> Result<T> {
    serde_json::from_str(contents).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;
    parse_document(&contents, path)
}

/// Load a layout document from disk
pub fn load_layout<P: AsRef<Path>>(path: P) -> Result<Layout> {
    read_document::<LayoutDocument>(path.as_ref())?.try_into()
}

/// Load a detection document from disk
pub fn load_detections<P: AsRef<Path>>(path: P) -> Result<DetectionSet> {
    read_document::<DetectionDocument>(path.as_ref())?.try_into()
}

/// Parse a layout document held in memory
pub fn layout_from_str(contents: &str) -> Result<Layout> {
    parse_document::<LayoutDocument>(contents, Path::new("<inline layout>"))?.try_into()
}

/// Parse a detection document held in memory
pub fn detections_from_str(contents: &str) -> Result<DetectionSet> {
    parse_document::<DetectionDocument>(contents, Path::new("<inline detections>"))?.try_into()
}
