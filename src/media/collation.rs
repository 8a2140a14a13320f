// Secondary-strength name ordering
// Case and accents don't change the order, base letters and their sequence do

use icu_collator::{Collator, CollatorOptions, Strength};
use std::cmp::Ordering;
use tracing::warn;

thread_local! {
    static COLLATOR: Option<Collator> = secondary_collator();
}

fn secondary_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Secondary);

    // root locale; the playlist order shouldn't depend on where the device is set
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            warn!("Collation data unavailable, names sort by code point: {}", e);
            None
        }
    }
}

fn collated(collator: Option<&Collator>, a: &str, b: &str) -> Ordering {
    collator
        .map_or(Ordering::Equal, |collator| collator.compare(a, b))
        .then_with(|| a.cmp(b))
}

/// Names equal at secondary strength fall back to code-point order so the result is total
pub fn compare_names(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collated(collator.as_ref(), a, b))
}

/// Sort in place with one collator for the whole pass
pub fn sort_by_name<T, F>(items: &mut [T], name: F)
where
    F: Fn(&T) -> &str,
{
    COLLATOR.with(|collator| {
        items.sort_by(|a, b| collated(collator.as_ref(), name(a), name(b)));
    });
}
