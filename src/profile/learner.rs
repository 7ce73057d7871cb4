//! Behavior profile learner.
//!
//! Aggregates authentic activity over a trailing window into histograms that
//! synthetic entities are drawn from. Sparse or empty inputs degrade per
//! histogram to hardcoded priors, so no consumer ever sees an empty
//! distribution or a NaN average.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime, Timelike};
use tracing::{debug, warn};

use crate::config::ProfileConfig;
use crate::data::{CITIES, traits};
use crate::domain::{ActivityRow, AverageMetrics, BehaviorProfile, Histogram, Industry};
use crate::profile::cache::ProfileCache;
use crate::store::ActivitySource;

/// Hour-of-day prior: complaints cluster after hours.
const DEFAULT_HOUR_WEIGHTS: [f64; 24] = [
    2.0, 1.0, 0.5, 0.3, 0.2, 0.2, 0.4, 1.0, 2.0, 3.0, 3.0, 3.0, //
    4.0, 3.0, 3.0, 3.5, 4.0, 5.0, 6.0, 7.0, 8.0, 8.0, 6.0, 4.0,
];

const DEFAULT_CATEGORIES: [(&str, f64); 5] = [
    ("overtime", 5.0),
    ("meeting", 3.0),
    ("deadline", 3.0),
    ("commute", 2.0),
    ("slacking", 1.0),
];

const DEFAULT_AVERAGES: AverageMetrics = AverageMetrics {
    content_length: 48.0,
    likes: 6.0,
    comments: 2.0,
    posts_per_day: 0.0,
};

impl BehaviorProfile {
    /// Profile built entirely from priors.
    pub fn fallback(now: NaiveDateTime, top_cities: usize) -> Self {
        Self {
            hour_histogram: default_hour_histogram(),
            category_histogram: default_category_histogram(),
            city_histogram: default_city_histogram(top_cities),
            industry_histogram: default_industry_histogram(),
            averages: DEFAULT_AVERAGES,
            sample_size: 0,
            computed_at: now,
            is_fallback: true,
        }
    }
}

/// Computes and caches [`BehaviorProfile`]s.
#[derive(Debug)]
pub struct BehaviorProfileLearner {
    config: ProfileConfig,
    cache: ProfileCache,
}

impl BehaviorProfileLearner {
    /// TTLs beyond what `chrono::Duration` holds saturate at `Duration::MAX`.
    pub fn new(config: ProfileConfig) -> Self {
        let ttl = i64::try_from(config.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        let cache = ProfileCache::new(ttl);
        Self { config, cache }
    }

    /// Use an externally owned cache, e.g. one shared with a warmup task.
    pub fn with_cache(config: ProfileConfig, cache: ProfileCache) -> Self {
        Self { config, cache }
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Aggregate the trailing `window_days` of authentic activity.
    ///
    /// A storage failure is treated like an empty window: it yields the
    /// fallback profile and logs a warning.
    pub fn compute_profile(
        &self,
        source: &(impl ActivitySource + ?Sized),
        now: NaiveDateTime,
        window_days: u32,
    ) -> BehaviorProfile {
        let window_days = window_days.max(1);
        let since = Duration::try_days(i64::from(window_days))
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(NaiveDateTime::MIN);
        match source.activity_since(since) {
            Ok(rows) => build_profile(&rows, now, window_days, self.config.top_cities),
            Err(err) => {
                warn!(error = %err, "activity read failed; using fallback behavior profile");
                BehaviorProfile::fallback(now, self.config.top_cities)
            }
        }
    }

    /// Cached profile, recomputed when missing or older than the TTL.
    pub fn get_profile(
        &self,
        source: &(impl ActivitySource + ?Sized),
        now: NaiveDateTime,
    ) -> Arc<BehaviorProfile> {
        if let Some((profile, false)) = self.cache.get(now) {
            debug!(computed_at = %profile.computed_at, "behavior profile cache hit");
            return profile;
        }

        let profile = Arc::new(self.compute_profile(source, now, self.config.window_days));
        debug!(
            sample_size = profile.sample_size,
            fallback = profile.is_fallback,
            "behavior profile recomputed"
        );
        self.cache.put(Arc::clone(&profile), now);
        profile
    }
}

/// Pure aggregation over already-fetched rows.
pub fn build_profile(
    rows: &[ActivityRow],
    now: NaiveDateTime,
    window_days: u32,
    top_cities: usize,
) -> BehaviorProfile {
    let authentic: Vec<&ActivityRow> = rows.iter().filter(|r| !r.is_synthetic).collect();
    if authentic.is_empty() {
        return BehaviorProfile::fallback(now, top_cities);
    }

    let mut hours = [0.0f64; 24];
    let mut categories: HashMap<&str, f64> = HashMap::new();
    let mut cities: HashMap<&str, f64> = HashMap::new();
    let mut industries: HashMap<Industry, f64> = HashMap::new();
    let (mut length_sum, mut likes_sum, mut comments_sum) = (0.0, 0.0, 0.0);

    for row in &authentic {
        hours[row.timestamp.hour() as usize] += 1.0;

        let category = row.category.trim();
        if !category.is_empty() {
            *categories.entry(category).or_default() += 1.0;
        }
        if let Some(city) = row.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            *cities.entry(city).or_default() += 1.0;
        }
        if let Some(industry) = row.industry.as_deref().filter(|i| !i.trim().is_empty()) {
            *industries.entry(Industry::from_label(industry)).or_default() += 1.0;
        }

        length_sum += row.content_length as f64;
        likes_sum += row.likes as f64;
        comments_sum += row.comments as f64;
    }

    let n = authentic.len() as f64;
    let hour_histogram = (0u32..24).zip(hours).collect();

    let category_histogram = or_default(into_ranked(categories, usize::MAX), default_category_histogram);
    let city_histogram = or_default(into_ranked(cities, top_cities), || default_city_histogram(top_cities));

    let mut industry_histogram: Histogram<Industry> = industries.into_iter().collect();
    industry_histogram.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let industry_histogram = or_default(industry_histogram, default_industry_histogram);

    BehaviorProfile {
        hour_histogram,
        category_histogram,
        city_histogram,
        industry_histogram,
        averages: AverageMetrics {
            content_length: length_sum / n,
            likes: likes_sum / n,
            comments: comments_sum / n,
            posts_per_day: n / window_days.max(1) as f64,
        },
        sample_size: authentic.len(),
        computed_at: now,
        is_fallback: false,
    }
}

/// Heaviest first, ties by key, capped at `top_n`.
fn into_ranked(counts: HashMap<&str, f64>, top_n: usize) -> Histogram<String> {
    let mut out: Histogram<String> = counts.into_iter().map(|(k, w)| (k.to_string(), w)).collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out.truncate(top_n);
    out
}

fn or_default<K>(hist: Histogram<K>, fallback: impl FnOnce() -> Histogram<K>) -> Histogram<K> {
    if hist.is_empty() { fallback() } else { hist }
}

fn default_hour_histogram() -> Histogram<u32> {
    (0u32..24).zip(DEFAULT_HOUR_WEIGHTS).collect()
}

fn default_category_histogram() -> Histogram<String> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(k, w)| (k.to_string(), *w))
        .collect()
}

fn default_city_histogram(top_cities: usize) -> Histogram<String> {
    CITIES
        .iter()
        .take(top_cities.max(1))
        .map(|c| (c.name.to_string(), c.tier.multiplier()))
        .collect()
}

fn default_industry_histogram() -> Histogram<Industry> {
    Industry::ALL
        .iter()
        .map(|i| (*i, traits(*i).default_weight))
        .collect()
}
