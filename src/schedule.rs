//! Export ordering: which picture shows on which day.
//!
//! Starting at the export start date and stepping one day at a time, each
//! day goes to the record pinned to it, or else to the next undated record
//! from a shuffled pool. The day an undated record lands on is its
//! *effective date*; it is used for the file name only and never written
//! back to the record.
//!
//! The walk runs for at most one day per record and stops at the first day
//! that has neither a pinned record nor an undated one left. Pinned records
//! whose day comes after that point are not scheduled; they are returned in
//! [`Schedule::unreached`] so the caller can report them.
//!
//! Dates are expected to be unique. If two records share one anyway (a
//! hand-edited backup), the first in record order keeps the day and the
//! other is reported as unreached.
//!
//! Shuffling uses the caller's RNG, so a seeded RNG gives a reproducible
//! order.

use crate::record::ImageRecord;
use crate::types::FrameDate;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// One scheduled picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledEntry<'a> {
    pub record: &'a ImageRecord,
    pub date: FrameDate,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule<'a> {
    /// Chronological, one entry per consecutive day from the start date.
    pub entries: Vec<ScheduledEntry<'a>>,
    /// Pinned records that were not scheduled, in record order: those the
    /// walk stopped before reaching and those whose day was already taken.
    pub unreached: Vec<&'a ImageRecord>,
}

/// Order `records` for export starting on `start`.
pub fn schedule<'a, R: Rng + ?Sized>(
    records: &'a [ImageRecord],
    start: FrameDate,
    rng: &mut R,
) -> Schedule<'a> {
    let mut dated: HashMap<FrameDate, &'a ImageRecord> = HashMap::new();
    let mut displaced: Vec<&'a ImageRecord> = Vec::new();
    let mut pool: Vec<&'a ImageRecord> = Vec::new();
    for record in records {
        match record.assigned_date() {
            Some(date) => match dated.entry(date) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                Entry::Occupied(taken) => {
                    tracing::warn!(
                        "{} is pinned to {}, which {} already holds",
                        record.file_name(),
                        date,
                        taken.get().file_name()
                    );
                    displaced.push(record);
                }
            },
            None => pool.push(record),
        }
    }
    pool.shuffle(rng);

    let mut entries = Vec::with_capacity(records.len());
    let mut day = start;
    for _ in 0..records.len() {
        let record = match dated.remove(&day) {
            Some(record) => record,
            None => match pool.pop() {
                Some(record) => record,
                None => break,
            },
        };
        entries.push(ScheduledEntry { record, date: day });
        day = day.next_day();
    }

    let left_over: Vec<&'a ImageRecord> = dated.into_values().collect();
    let is_left = |r: &ImageRecord| left_over.iter().any(|o| std::ptr::eq(*o, r));
    for record in records.iter().filter(|r| is_left(*r)) {
        tracing::warn!(
            "{} is pinned to {} but the schedule ended before that day",
            record.file_name(),
            record
                .assigned_date()
                .map(|d| d.to_string())
                .unwrap_or_default()
        );
    }
    let unreached = records
        .iter()
        .filter(|r| is_left(*r) || displaced.iter().any(|o| std::ptr::eq(*o, *r)))
        .collect();

    Schedule { entries, unreached }
}
