//! Page rasters embedded in PDF documents
//!
//! Scanned documents carry one image per page. Pages are walked in order and
//! the largest image XObject reachable from each page's resources is taken
//! as that page. Vector content is not rendered.

use crate::error::TilerError;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Guards against `Parent` cycles in malformed page trees
const MAX_TREE_DEPTH: usize = 64;

/// Extract one image per page, in page order
pub fn extract_pages(doc: &Document) -> Result<Vec<DynamicImage>, TilerError> {
    let mut pages = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let streams = page_image_streams(doc, page_id);

        let mut best: Option<DynamicImage> = None;
        for (object_id, stream) in streams {
            match decode_image_stream(doc, stream) {
                Ok(img) => {
                    let area = img.width() as u64 * img.height() as u64;
                    let best_area = best
                        .as_ref()
                        .map(|b| b.width() as u64 * b.height() as u64)
                        .unwrap_or(0);
                    if area > best_area {
                        best = Some(img);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to decode image {:?} on page {}: {}",
                        object_id,
                        page_number,
                        e
                    );
                }
            }
        }

        match best {
            Some(img) => {
                tracing::debug!(
                    "Page {}: {}x{} raster",
                    page_number,
                    img.width(),
                    img.height()
                );
                pages.push(img);
            }
            None => tracing::warn!("Page {} has no decodable image, skipping", page_number),
        }
    }

    if pages.is_empty() {
        return Err(TilerError::EmptyDocument);
    }

    Ok(pages)
}

/// Follow a reference to its target, or return the object itself
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Find the page's resource dictionary, inheriting from parent page tree nodes
fn page_resources(doc: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut node = doc.get_dictionary(page_id).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let dict = node?;
        if let Some(resources) = dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve(doc, r))
            .and_then(|r| r.as_dict().ok())
        {
            return Some(resources);
        }

        node = dict
            .get(b"Parent")
            .ok()
            .and_then(|p| p.as_reference().ok())
            .and_then(|id| doc.get_dictionary(id).ok());
    }

    None
}

/// Image XObject streams referenced from a page
fn page_image_streams(doc: &Document, page_id: ObjectId) -> Vec<(ObjectId, &Stream)> {
    let Some(xobjects) = page_resources(doc, page_id)
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|x| resolve(doc, x))
        .and_then(|x| x.as_dict().ok())
    else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(_, value)| {
            let id = value.as_reference().ok()?;
            let stream = doc.get_object(id).ok()?.as_stream().ok()?;
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(|s| s.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false);
            is_image.then_some((id, stream))
        })
        .collect()
}

/// Filter names applied to a stream, outermost first
fn stream_filters(stream: &Stream) -> Vec<Vec<u8>> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_name().ok().map(|n| n.to_vec()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Decode an image XObject
fn decode_image_stream(doc: &Document, stream: &Stream) -> Result<DynamicImage, TilerError> {
    let filters = stream_filters(stream);

    if let Some(last) = filters.last() {
        match last.as_slice() {
            b"DCTDecode" if filters.len() == 1 => {
                return image::load_from_memory(&stream.content)
                    .map_err(|e| TilerError::LoadError(format!("Invalid JPEG image: {}", e)));
            }
            b"DCTDecode" | b"JPXDecode" | b"CCITTFaxDecode" | b"JBIG2Decode" => {
                return Err(TilerError::UnsupportedFormat(format!(
                    "PDF image filter {}",
                    String::from_utf8_lossy(last)
                )));
            }
            _ => {}
        }
    }

    let width = dimension(stream, b"Width")?;
    let height = dimension(stream, b"Height")?;

    let data = if filters.is_empty() {
        stream.content.clone()
    } else {
        stream
            .decompressed_content()
            .map_err(|e| TilerError::LoadError(format!("Failed to decompress image: {}", e)))?
    };

    let color_space = get_color_space(doc, stream);

    let bits_per_component = stream
        .dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|b| b.as_i64().ok())
        .unwrap_or(8);

    tracing::debug!(
        "PDF image: {}x{}, {} bits, color_space={}, data_len={}",
        width,
        height,
        bits_per_component,
        color_space,
        data.len()
    );

    if bits_per_component != 8 {
        return Err(TilerError::UnsupportedFormat(format!(
            "{} bits per component",
            bits_per_component
        )));
    }

    let pixels = width as usize * height as usize;
    match color_space.as_str() {
        "DeviceGray" => {
            let data = truncated(data, pixels, "grayscale")?;
            image::GrayImage::from_raw(width, height, data)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| TilerError::LoadError("Invalid grayscale image data".to_string()))
        }
        "DeviceRGB" => {
            let data = truncated(data, pixels * 3, "RGB")?;
            image::RgbImage::from_raw(width, height, data)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| TilerError::LoadError("Invalid RGB image data".to_string()))
        }
        "DeviceCMYK" => {
            let data = truncated(data, pixels * 4, "CMYK")?;
            let rgb: Vec<u8> = data
                .chunks_exact(4)
                .flat_map(|cmyk| {
                    let k = 1.0 - cmyk[3] as f32 / 255.0;
                    let channel = |v: u8| ((1.0 - v as f32 / 255.0) * k * 255.0) as u8;
                    [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
                })
                .collect();
            image::RgbImage::from_raw(width, height, rgb)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| TilerError::LoadError("Invalid CMYK->RGB conversion".to_string()))
        }
        other => Err(TilerError::UnsupportedFormat(format!(
            "PDF color space {}",
            other
        ))),
    }
}

fn dimension(stream: &Stream, key: &[u8]) -> Result<u32, TilerError> {
    stream
        .dict
        .get(key)
        .ok()
        .and_then(|v| v.as_i64().ok())
        .and_then(|v| u32::try_from(v).ok())
        .filter(|&v| v > 0)
        .ok_or_else(|| {
            TilerError::LoadError(format!(
                "Missing image {}",
                String::from_utf8_lossy(key).to_lowercase()
            ))
        })
}

/// Check the sample buffer is long enough and drop trailing padding
fn truncated(mut data: Vec<u8>, expected: usize, kind: &str) -> Result<Vec<u8>, TilerError> {
    if data.len() < expected {
        return Err(TilerError::LoadError(format!(
            "Short {} image data: {} bytes, expected {}",
            kind,
            data.len(),
            expected
        )));
    }
    data.truncate(expected);
    Ok(data)
}

/// Get the color space name from a PDF stream, resolving indirect references
fn get_color_space(doc: &Document, stream: &Stream) -> String {
    let Some(cs) = stream
        .dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|cs| resolve(doc, cs))
    else {
        return "DeviceRGB".to_string();
    };

    match cs {
        Object::Name(name) => String::from_utf8_lossy(name).to_string(),
        Object::Array(items) => {
            let family = items
                .first()
                .and_then(|first| first.as_name().ok())
                .map(|name| String::from_utf8_lossy(name).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            if family == "ICCBased" {
                icc_color_space(doc, items.get(1))
            } else {
                family
            }
        }
        _ => "Unknown".to_string(),
    }
}

/// Map an ICC profile stream to the device space with the same component count
fn icc_color_space(doc: &Document, profile: Option<&Object>) -> String {
    let Some(dict) = profile
        .and_then(|p| resolve(doc, p))
        .and_then(|p| p.as_stream().ok())
        .map(|p| &p.dict)
    else {
        return "ICCBased".to_string();
    };

    match dict.get(b"N").ok().and_then(|n| n.as_i64().ok()) {
        Some(1) => "DeviceGray".to_string(),
        Some(3) => "DeviceRGB".to_string(),
        Some(4) => "DeviceCMYK".to_string(),
        Some(n) => format!("ICCBased({})", n),
        None => dict
            .get(b"Alternate")
            .ok()
            .and_then(|a| resolve(doc, a))
            .and_then(|a| a.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).to_string())
            .unwrap_or_else(|| "ICCBased".to_string()),
    }
}
