use crate::error::{PrepError, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive entry holding the dotLottie manifest
const MANIFEST_PATH: &str = "manifest.json";

/// Directory holding the animations inside a dotLottie archive
const ANIMATIONS_DIR: &str = "animations/";

/// Directory holding the images inside a dotLottie archive
const IMAGES_DIR: &str = "images/";

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    animations: Vec<ManifestAnimation>,
}

#[derive(Debug, Deserialize)]
struct ManifestAnimation {
    id: String,
}

/// Extract one animation from a dotLottie archive
///
/// The animation is looked up at `animations/<id>.json`. When no id is given,
/// the first animation listed in `manifest.json` is used; archives without a
/// manifest fall back to the first `animations/*.json` entry by name.
///
/// With `inline_images`, image assets pointing at files inside the archive
/// are rewritten as base64 data URIs so the document is self-contained.
///
/// # Arguments
/// * `bytes` - Raw dotLottie archive bytes
/// * `animation_id` - Animation to extract, or `None` for the default one
/// * `inline_images` - Embed archive images into the document
///
/// # Returns
/// * `Ok(JsonValue)` - The decoded animation document
/// * `Err(PrepError)` - If the archive, manifest or animation is unreadable
///
/// # Examples
/// ```no_run
/// use lottie_prep::parser::extract_animation;
///
/// let bytes = std::fs::read("hero.lottie").unwrap();
/// let doc = extract_animation(&bytes, None, true).unwrap();
/// ```
pub fn extract_animation(
    bytes: &[u8],
    animation_id: Option<&str>,
    inline_images: bool,
) -> Result<JsonValue> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let id = match animation_id {
        Some(id) => id.to_string(),
        None => default_animation_id(&mut archive)?,
    };

    let path = format!("{}{}.json", ANIMATIONS_DIR, id);
    let data = read_entry(&mut archive, &path)?.ok_or(PrepError::AnimationNotFound(id))?;
    debug!(entry = %path, size = data.len(), "extracted animation from archive");

    let mut doc: JsonValue = serde_json::from_slice(&data)?;

    if inline_images {
        let inlined = inline_image_assets(&mut doc, &mut archive)?;
        if inlined > 0 {
            debug!(count = inlined, "inlined archive images");
        }
    }

    Ok(doc)
}

/// List the animation ids available in a dotLottie archive
///
/// Ids come from the manifest when present, otherwise from the names of the
/// `animations/*.json` entries.
pub fn list_animations(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    match read_manifest(&mut archive)? {
        Some(manifest) => Ok(manifest.animations.into_iter().map(|a| a.id).collect()),
        None => Ok(animation_entries(&archive)),
    }
}

fn default_animation_id<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let from_manifest = read_manifest(archive)?
        .and_then(|manifest| manifest.animations.into_iter().next())
        .map(|animation| animation.id);

    from_manifest
        .or_else(|| animation_entries(archive).into_iter().next())
        .ok_or(PrepError::NoAnimationInArchive)
}

fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Option<Manifest>> {
    let Some(data) = read_entry(archive, MANIFEST_PATH)? else {
        return Ok(None);
    };

    let manifest = serde_json::from_slice(&data)
        .map_err(|e| PrepError::InvalidManifest(e.to_string()))?;
    Ok(Some(manifest))
}

/// Ids of every `animations/<id>.json` entry, sorted by name
fn animation_entries<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut ids: Vec<String> = archive
        .file_names()
        .filter_map(|name| name.strip_prefix(ANIMATIONS_DIR))
        .filter_map(|name| name.strip_suffix(".json"))
        .filter(|id| !id.is_empty() && !id.contains('/'))
        .map(str::to_string)
        .collect();
    ids.sort();
    ids
}

/// Read an archive entry, `None` when it doesn't exist
fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            Ok(Some(contents))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace archive image references with base64 data URIs
///
/// An image asset carries its file name in `p` and its directory in `u`.
/// Assets already embedded (`e: 1`) or already using a data URI are left
/// alone, as are images the archive doesn't contain.
fn inline_image_assets<R: Read + Seek>(
    doc: &mut JsonValue,
    archive: &mut ZipArchive<R>,
) -> Result<usize> {
    let Some(assets) = doc.get_mut("assets").and_then(JsonValue::as_array_mut) else {
        return Ok(0);
    };

    let mut inlined = 0;
    for asset in assets.iter_mut() {
        let Some(obj) = asset.as_object_mut() else {
            continue;
        };

        let embedded = obj.get("e").and_then(JsonValue::as_u64) == Some(1);
        let Some(file_name) = obj.get("p").and_then(JsonValue::as_str) else {
            continue;
        };
        if embedded || file_name.starts_with("data:") {
            continue;
        }

        let dir = obj.get("u").and_then(JsonValue::as_str).unwrap_or("");
        let candidates = [
            format!("{}{}", dir.trim_start_matches('/'), file_name),
            format!("{}{}", IMAGES_DIR, file_name),
        ];

        let mut found = None;
        for candidate in &candidates {
            if let Some(data) = read_entry(archive, candidate)? {
                found = Some(data);
                break;
            }
        }

        let Some(data) = found else {
            warn!(image = %file_name, "image asset not found in archive, leaving reference as is");
            continue;
        };

        let uri = format!(
            "data:{};base64,{}",
            image_mime_type(file_name),
            general_purpose::STANDARD.encode(&data)
        );
        obj.insert("p".to_string(), JsonValue::String(uri));
        obj.insert("u".to_string(), JsonValue::String(String::new()));
        obj.insert("e".to_string(), JsonValue::from(1));
        inlined += 1;
    }

    Ok(inlined)
}

/// MIME type for an image file name, by extension
fn image_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn build_archive(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn animation(name: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({"nm": name, "ip": 0, "op": 60, "layers": []})).unwrap()
    }

    #[test]
    fn test_extract_manifest_default() {
        let manifest = serde_json::to_vec(&json!({
            "version": "1",
            "animations": [{"id": "wave"}, {"id": "bounce"}]
        }))
        .unwrap();
        let bytes = build_archive(&[
            ("manifest.json", manifest),
            ("animations/bounce.json", animation("bounce")),
            ("animations/wave.json", animation("wave")),
        ]);

        let doc = extract_animation(&bytes, None, true).unwrap();

        assert_eq!(doc["nm"].as_str(), Some("wave"));
    }

    #[test]
    fn test_extract_selected_animation() {
        let manifest = serde_json::to_vec(&json!({"animations": [{"id": "wave"}, {"id": "bounce"}]})).unwrap();
        let bytes = build_archive(&[
            ("manifest.json", manifest),
            ("animations/bounce.json", animation("bounce")),
            ("animations/wave.json", animation("wave")),
        ]);

        let doc = extract_animation(&bytes, Some("bounce"), true).unwrap();

        assert_eq!(doc["nm"].as_str(), Some("bounce"));
    }

    #[test]
    fn test_extract_without_manifest() {
        let bytes = build_archive(&[
            ("animations/zeta.json", animation("zeta")),
            ("animations/alpha.json", animation("alpha")),
        ]);

        let doc = extract_animation(&bytes, None, true).unwrap();

        assert_eq!(doc["nm"].as_str(), Some("alpha"));
    }

    #[test]
    fn test_extract_missing_animation() {
        let bytes = build_archive(&[("animations/wave.json", animation("wave"))]);

        let result = extract_animation(&bytes, Some("nope"), true);

        match result {
            Err(PrepError::AnimationNotFound(id)) => assert_eq!(id, "nope"),
            other => panic!("Expected AnimationNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_empty_archive() {
        let bytes = build_archive(&[("images/img_0.png", b"\x89PNG".to_vec())]);

        let result = extract_animation(&bytes, None, true);

        assert!(matches!(result, Err(PrepError::NoAnimationInArchive)));
    }

    #[test]
    fn test_extract_invalid_manifest() {
        let bytes = build_archive(&[
            ("manifest.json", b"{not json".to_vec()),
            ("animations/wave.json", animation("wave")),
        ]);

        let result = extract_animation(&bytes, None, true);

        assert!(matches!(result, Err(PrepError::InvalidManifest(_))));
    }

    #[test]
    fn test_inline_images() {
        let doc = serde_json::to_vec(&json!({
            "layers": [],
            "assets": [
                {"id": "image_0", "w": 1, "h": 1, "u": "/images/", "p": "img_0.png", "e": 0},
                {"id": "image_1", "w": 1, "h": 1, "u": "", "p": "img_1.jpg"},
                {"id": "image_2", "w": 1, "h": 1, "u": "", "p": "data:image/png;base64,AAAA", "e": 1},
                {"id": "image_3", "w": 1, "h": 1, "u": "/images/", "p": "missing.png"},
                {"id": "comp_0", "layers": []}
            ]
        }))
        .unwrap();
        let bytes = build_archive(&[
            ("animations/a.json", doc),
            ("images/img_0.png", b"png!".to_vec()),
            ("images/img_1.jpg", b"jpg!".to_vec()),
        ]);

        let doc = extract_animation(&bytes, None, true).unwrap();

        let assets = doc["assets"].as_array().unwrap();
        assert_eq!(assets[0]["p"].as_str(), Some("data:image/png;base64,cG5nIQ=="));
        assert_eq!(assets[0]["u"].as_str(), Some(""));
        assert_eq!(assets[0]["e"].as_i64(), Some(1));
        assert_eq!(assets[1]["p"].as_str(), Some("data:image/jpeg;base64,anBnIQ=="));
        assert_eq!(assets[2]["p"].as_str(), Some("data:image/png;base64,AAAA"));
        assert_eq!(assets[3]["p"].as_str(), Some("missing.png"));
        assert!(assets[4].get("p").is_none());
    }

    #[test]
    fn test_inline_images_disabled() {
        let doc = serde_json::to_vec(&json!({
            "assets": [{"id": "image_0", "u": "/images/", "p": "img_0.png"}]
        }))
        .unwrap();
        let bytes = build_archive(&[
            ("animations/a.json", doc),
            ("images/img_0.png", b"png!".to_vec()),
        ]);

        let doc = extract_animation(&bytes, None, false).unwrap();

        assert_eq!(doc["assets"][0]["p"].as_str(), Some("img_0.png"));
    }

    #[test]
    fn test_list_animations() {
        let bytes = build_archive(&[
            ("animations/b.json", animation("b")),
            ("animations/a.json", animation("a")),
            ("images/a.json", b"{}".to_vec()),
        ]);

        assert_eq!(list_animations(&bytes).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type("a.PNG"), "image/png");
        assert_eq!(image_mime_type("photo.jpeg"), "image/jpeg");
        assert_eq!(image_mime_type("icon.svg"), "image/svg+xml");
        assert_eq!(image_mime_type("noext"), "application/octet-stream");
    }
}
