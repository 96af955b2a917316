//! Representative color extraction for photo pixel data.
//!
//! Pixels are quantised to four bits per channel and grouped into buckets.
//! Near-black and near-white samples are treated as likely background and
//! ignored, unless they make up so much of the image that ignoring them would
//! misrepresent it. The winning bucket maximises `count * (1 + saturation)` so
//! colorful clusters beat equally large gray ones.

use std::collections::BTreeMap;

use labyrinth_core::Rgb;

const LUMINANCE_MIN: f32 = 30.0;
const LUMINANCE_MAX: f32 = 240.0;
const EXCLUDED_RATIO_THRESHOLD: f64 = 0.40;

#[derive(Clone, Copy, Debug, Default)]
struct Bucket {
    count: u64,
    red: u64,
    green: u64,
    blue: u64,
}

impl Bucket {
    fn add(&mut self, color: Rgb) {
        self.count += 1;
        self.red += u64::from(color.red());
        self.green += u64::from(color.green());
        self.blue += u64::from(color.blue());
    }

    fn average(&self) -> Rgb {
        let channel = |sum: u64| u8::try_from(sum / self.count.max(1)).unwrap_or(u8::MAX);
        Rgb::from_rgb(channel(self.red), channel(self.green), channel(self.blue))
    }

    fn score(&self) -> f64 {
        self.count as f64 * (1.0 + f64::from(self.average().saturation()))
    }
}

fn bucket_key(color: Rgb) -> u16 {
    (u16::from(color.red() >> 4) << 8) | (u16::from(color.green() >> 4) << 4) | u16::from(color.blue() >> 4)
}

fn is_background(color: Rgb) -> bool {
    let luminance = color.luminance();
    luminance < LUMINANCE_MIN || luminance > LUMINANCE_MAX
}

/// Dominant color of the provided pixels, or `None` when there are none.
///
/// Ties between equally scored buckets go to the lowest quantised value.
#[must_use]
pub fn dominant_color(pixels: &[Rgb]) -> Option<Rgb> {
    if pixels.is_empty() {
        return None;
    }

    let mut all: BTreeMap<u16, Bucket> = BTreeMap::new();
    let mut filtered: BTreeMap<u16, Bucket> = BTreeMap::new();
    let mut excluded = 0_usize;

    for &pixel in pixels {
        let key = bucket_key(pixel);
        all.entry(key).or_default().add(pixel);
        if is_background(pixel) {
            excluded += 1;
        } else {
            filtered.entry(key).or_default().add(pixel);
        }
    }

    let excluded_ratio = excluded as f64 / pixels.len() as f64;
    let chosen = if filtered.is_empty() || excluded_ratio >= EXCLUDED_RATIO_THRESHOLD {
        &all
    } else {
        &filtered
    };

    let mut best: Option<(f64, &Bucket)> = None;
    for bucket in chosen.values() {
        let score = bucket.score();
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, bucket));
        }
    }

    best.map(|(_, bucket)| bucket.average())
        .or_else(|| average_color(pixels))
}

/// Plain per-channel mean of the provided pixels.
#[must_use]
pub fn average_color(pixels: &[Rgb]) -> Option<Rgb> {
    let mut total = Bucket::default();
    for &pixel in pixels {
        total.add(pixel);
    }
    (total.count > 0).then(|| total.average())
}
