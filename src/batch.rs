//! Batch generation over a record set.
//!
//! A failing card is logged and skipped; the rest of the batch carries on.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{info, warn};

use crate::core::record::CardRecord;
use crate::image::assembler::{CardBuilder, card_output_path, save_card};

/// A record that could not be turned into a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFailure {
    pub name: String,
    pub reason: String,
}

/// Outcome of a batch run, in record order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<CardFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Build every record in order; failed slots hold `None`.
pub fn build_all<B: CardBuilder + ?Sized>(
    builder: &B,
    records: &[CardRecord],
) -> (Vec<Option<RgbaImage>>, Vec<CardFailure>) {
    let mut cards = Vec::with_capacity(records.len());
    let mut failed = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        info!(card = %record.name, "processing card {}/{}", idx + 1, records.len());
        match builder.build(record) {
            Ok(card) => cards.push(Some(card)),
            Err(err) => {
                warn!(card = %record.name, error = %err, "skipping card");
                failed.push(CardFailure {
                    name: record.name.clone(),
                    reason: err.to_string(),
                });
                cards.push(None);
            }
        }
    }
    (cards, failed)
}

/// Build every record and write `<out_dir>/<slug>.png` for each success.
pub fn generate_all<B: CardBuilder + ?Sized>(
    builder: &B,
    records: &[CardRecord],
    out_dir: &Path,
) -> BatchReport {
    let (cards, build_failures) = build_all(builder, records);
    let mut build_failures = build_failures.into_iter();
    let mut report = BatchReport::default();
    for (record, card) in records.iter().zip(cards) {
        let Some(card) = card else {
            report.failed.extend(build_failures.next());
            continue;
        };
        let target = card_output_path(out_dir, record);
        match save_card(&card, &target) {
            Ok(()) => report.written.push(target),
            Err(err) => {
                warn!(card = %record.name, error = %format!("{err:#}"), "failed to save card");
                report.failed.push(CardFailure {
                    name: record.name.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::CardResult;
    use crate::core::style::StyleTable;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    /// Performs the real style lookup, then paints the primary color.
    struct StubBuilder {
        styles: StyleTable,
    }

    impl CardBuilder for StubBuilder {
        fn build(&self, record: &CardRecord) -> CardResult<RgbaImage> {
            let style = self.styles.get(&record.suit)?;
            Ok(RgbaImage::from_pixel(4, 6, style.primary.to_rgba()))
        }
    }

    fn records() -> Vec<CardRecord> {
        vec![
            CardRecord::new("Chat Noir", "", "Chat", 1, "a.png"),
            CardRecord::new("Ghost", "", "Fantôme", 2, "b.png"),
            CardRecord::new("Grand Bal", "", "Festival", 3, "c.png"),
        ]
    }

    fn stub() -> StubBuilder {
        StubBuilder {
            styles: StyleTable::builtin(),
        }
    }

    #[test]
    fn unknown_suit_is_skipped_and_the_rest_are_written() {
        let out = std::env::temp_dir().join(format!("cardsmith-batch-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&out);

        let report = generate_all(&stub(), &records(), &out);

        assert_eq!(report.total(), 3);
        assert_eq!(
            report.written,
            vec![out.join("chat_noir.png"), out.join("grand_bal.png")]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "Ghost");
        assert!(report.failed[0].reason.contains("Fantôme"));
        assert!(out.join("chat_noir.png").is_file());
        assert!(!out.join("ghost.png").exists());

        let written = image::open(out.join("grand_bal.png")).unwrap().to_rgba8();
        assert_eq!(written.get_pixel(0, 0), &Rgba([0xE6, 0xA8, 0xE6, 255]));
    }

    #[test]
    fn build_all_keeps_slots_in_record_order() {
        let (cards, failed) = build_all(&stub(), &records());
        assert_eq!(cards.len(), 3);
        assert!(cards[0].is_some());
        assert!(cards[1].is_none());
        assert!(cards[2].is_some());
        assert_eq!(failed.len(), 1);
    }

    #[test]
    fn save_failures_keep_record_order() {
        // a plain file where the output directory should be
        let out = std::env::temp_dir().join(format!("cardsmith-batch-blocked-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&out);
        let _ = std::fs::remove_file(&out);
        std::fs::write(&out, b"not a directory").unwrap();

        let report = generate_all(&stub(), &records(), &out);

        assert!(report.written.is_empty());
        let names: Vec<&str> = report.failed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Chat Noir", "Ghost", "Grand Bal"]);
        assert!(report.failed[1].reason.contains("Fantôme"));
        assert!(report.failed[0].reason.contains("failed to create output directory"));
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let report = generate_all(&stub(), &[], Path::new("unused"));
        assert_eq!(report.total(), 0);
    }
}
