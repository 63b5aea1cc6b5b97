use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::error::{CardError, CardResult};

const ART_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const PREFERRED_ART: &str = "final.png";

/// One row of card data, read-only for the duration of a build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub suit: String,
    #[serde(default)]
    pub points: u32,
    #[serde(alias = "image_path")]
    pub character_image_path: PathBuf,
    /// Overrides the suit's motif when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_image_path: Option<PathBuf>,
}

impl CardRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        suit: impl Into<String>,
        points: u32,
        character_image_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            suit: suit.into(),
            points,
            character_image_path: character_image_path.into(),
            logo_image_path: None,
        }
    }

    /// Description with doubled spaces collapsed and outer whitespace trimmed.
    pub fn normalized_description(&self) -> String {
        let mut text = self.description.trim().to_string();
        while text.contains("  ") {
            text = text.replace("  ", " ");
        }
        text
    }

    /// File-system friendly name used for output files.
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Resolve the character artwork to a concrete file.
    ///
    /// A directory resolves to its `final.png` when present, otherwise to the
    /// first image file in name order.
    pub fn resolve_character_image(&self) -> CardResult<PathBuf> {
        let path = &self.character_image_path;
        if !path.is_dir() {
            return Ok(path.clone());
        }
        let preferred = path.join(PREFERRED_ART);
        if preferred.is_file() {
            return Ok(preferred);
        }
        let entries = fs::read_dir(path).map_err(|err| CardError::io(path, err))?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_art_extension(p))
            .collect();
        candidates.sort();
        candidates.into_iter().next().ok_or_else(|| {
            CardError::missing_asset(
                path,
                image::ImageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no artwork found in directory",
                )),
            )
        })
    }
}

fn has_art_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ART_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Lowercase a card name and replace separators with underscores.
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '/', '-'], "_")
        .replace('\'', "")
}

/// Load records from a JSON array file or a `.jsonl` file (one record per line).
pub fn load_records(path: &Path) -> Result<Vec<CardRecord>> {
    let is_lines = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("jsonl"))
        .unwrap_or(false);
    if !is_lines {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read records file {}", path.display()))?;
        return parse_record_array(&raw)
            .with_context(|| format!("failed to parse records in {}", path.display()));
    }

    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("failed to open records file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (idx, raw) in reader.lines().enumerate() {
        let raw = raw?;
        if raw.trim().is_empty() {
            continue;
        }
        let record: CardRecord = serde_json::from_str(&raw).with_context(|| {
            format!(
                "failed to parse card record at line {} in {}",
                idx + 1,
                path.display()
            )
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a JSON array of records.
pub fn parse_record_array(raw: &str) -> Result<Vec<CardRecord>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_array() {
        return Err(CardError::record("expected a JSON array of card records").into());
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cardsmith-record-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn slugify_matches_file_naming() {
        assert_eq!(slugify("  Chat Noir "), "chat_noir");
        assert_eq!(slugify("L'Esprit-Follet"), "lesprit_follet");
        assert_eq!(slugify("Feu/Glace"), "feu_glace");
    }

    #[test]
    fn description_is_normalized() {
        let record = CardRecord::new("Hero", "  A   brave  cat. ", "Chat", 3, "hero.png");
        assert_eq!(record.normalized_description(), "A brave cat.");
    }

    #[test]
    fn parses_array_with_image_path_alias() {
        let raw = r#"[
            {"name": "Hero", "description": "", "suit": "Chat", "points": 4, "image_path": "art/hero.png"},
            {"name": "Lantern", "suit": "Festival", "character_image_path": "art/lantern.png",
             "logo_image_path": "logos/custom.png"}
        ]"#;
        let records = parse_record_array(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].character_image_path, PathBuf::from("art/hero.png"));
        assert_eq!(records[1].points, 0);
        assert_eq!(records[1].logo_image_path, Some(PathBuf::from("logos/custom.png")));
    }

    #[test]
    fn rejects_non_array_documents() {
        assert!(parse_record_array(r#"{"name": "Hero"}"#).is_err());
    }

    #[test]
    fn loads_json_lines_in_order() {
        let dir = scratch_dir("jsonl");
        let path = dir.join("cards.jsonl");
        fs::write(
            &path,
            "{\"name\":\"A\",\"suit\":\"Chat\",\"image_path\":\"a.png\"}\n\n{\"name\":\"B\",\"suit\":\"Lieu\",\"image_path\":\"b.png\"}\n",
        )
        .unwrap();
        let records = load_records(&path).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn directory_art_prefers_final_png() {
        let dir = scratch_dir("art");
        fs::write(dir.join("a_draft.png"), b"x").unwrap();
        fs::write(dir.join("final.png"), b"x").unwrap();
        let record = CardRecord::new("Hero", "", "Chat", 1, &dir);
        assert_eq!(record.resolve_character_image().unwrap(), dir.join("final.png"));

        fs::remove_file(dir.join("final.png")).unwrap();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        assert_eq!(record.resolve_character_image().unwrap(), dir.join("a_draft.png"));
    }

    #[test]
    fn empty_art_directory_is_missing_asset() {
        let dir = scratch_dir("empty");
        let record = CardRecord::new("Hero", "", "Chat", 1, &dir);
        assert!(matches!(
            record.resolve_character_image(),
            Err(CardError::MissingAsset { .. })
        ));
    }
}
