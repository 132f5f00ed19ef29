use crate::model::{Entry, GroupedEntries, PosGroup};

/// Bucket for entries without a part-of-speech tag.
pub const OTHER_BUCKET: &str = "other";

/// Buckets shown ahead of everything else, in this order.
const LEADING_BUCKETS: [&str; 2] = ["verb", "noun"];

/// Partition a root family by part of speech.
///
/// Leading buckets come first; the rest keep the order in which their first
/// entry (by ascending id) appears. Entries inside a bucket are ordered by id.
pub fn group_by_part_of_speech(mut entries: Vec<Entry>) -> GroupedEntries {
    entries.sort_by_key(|entry| entry.id);

    let mut groups: Vec<PosGroup> = Vec::new();
    for entry in entries {
        let label = bucket_label(&entry);
        match groups.iter_mut().find(|group| group.part_of_speech == label) {
            Some(group) => group.entries.push(entry),
            None => groups.push(PosGroup {
                part_of_speech: label,
                entries: vec![entry],
            }),
        }
    }

    // stable: non-leading buckets keep first-seen order
    groups.sort_by_key(|group| {
        LEADING_BUCKETS
            .iter()
            .position(|leading| *leading == group.part_of_speech)
            .unwrap_or(LEADING_BUCKETS.len())
    });

    GroupedEntries::new(groups)
}

fn bucket_label(entry: &Entry) -> String {
    entry
        .part_of_speech
        .as_deref()
        .map(str::trim)
        .filter(|pos| !pos.is_empty())
        .unwrap_or(OTHER_BUCKET)
        .to_string()
}
