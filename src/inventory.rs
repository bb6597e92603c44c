use crate::models::{Filament, FilamentPatch};
use chrono::Utc;
use serde_json::Number;

// Ids stay large increasing integers like the files the original tool wrote,
// but bumping past the current maximum removes the collision window between
// two creates inside the same millisecond.
pub fn allocate_id(records: &[Filament]) -> i64 {
    allocate_id_at(Utc::now().timestamp_millis(), records)
}

pub fn allocate_id_at(now_millis: i64, records: &[Filament]) -> i64 {
    let max_id = records.iter().filter_map(|f| f.id).max().unwrap_or(0);
    now_millis.max(max_id + 1)
}

pub fn apply_patch(record: &mut Filament, patch: FilamentPatch) {
    if let Some(name) = patch.name {
        record.name = Some(name);
    }
    if let Some(brand) = patch.brand {
        record.brand = Some(brand);
    }
    if let Some(material) = patch.material {
        record.material = Some(material);
    }
    if let Some(color) = patch.color {
        record.color = Some(color);
    }
    if let Some(notes) = patch.notes {
        record.notes = Some(notes);
    }
    if let Some(copies) = patch.copies {
        record.copies = Some(copies);
    }
    if let Some(start_mass) = patch.start_mass {
        record.start_mass = Number::from_f64(start_mass);
    }
    if let Some(current_mass) = patch.current_mass {
        record.current_mass = Number::from_f64(current_mass);
    }
}

pub fn is_empty(record: &Filament) -> bool {
    matches!(record.current_grams(), Some(mass) if mass <= 0.0)
}

pub fn matches_query(record: &Filament, query: &str) -> bool {
    let needle = query.to_lowercase();
    let hit = |field: Option<&str>| field.unwrap_or("").to_lowercase().contains(&needle);
    hit(record.name.as_deref()) || hit(record.brand.as_deref()) || hit(record.material.as_deref())
}

#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub available: Vec<&'a Filament>,
    pub empty: Vec<&'a Filament>,
}

pub fn partition<'a>(records: &'a [Filament], query: &str) -> Partition<'a> {
    let mut split = Partition::default();
    for record in records.iter().filter(|f| matches_query(f, query)) {
        if is_empty(record) {
            split.empty.push(record);
        } else {
            split.available.push(record);
        }
    }
    split
}

// Requested amounts that are not positive finite numbers are a no-op; the
// caller issues no update at all in that case.
pub fn spend(current_mass: f64, amount: f64) -> Option<f64> {
    if amount.is_nan() || amount <= 0.0 {
        return None;
    }
    Some((current_mass - amount).max(0.0))
}

pub fn remaining_percent(record: &Filament) -> f64 {
    let start = record.start_grams().unwrap_or(0.0);
    if start == 0.0 {
        return 0.0;
    }
    let current = record.current_grams().unwrap_or(0.0);
    (current / start * 100.0).clamp(0.0, 100.0)
}

// Empty spools render with a full gauge so the card reads as a solid swatch
// of the filament color. Display only, the record keeps its real mass.
pub fn gauge_percent(record: &Filament) -> f64 {
    if is_empty(record) {
        100.0
    } else {
        remaining_percent(record)
    }
}
