use crate::models::{ActivityStats, Training};
use std::collections::HashMap;

/// Sums training minutes per activity.
///
/// Groups are keyed by the raw activity string, so `Gym` and `gym` are
/// separate bars. Groups appear in the order their activity is first seen.
pub fn build_activity_stats(trainings: &[Training]) -> Vec<ActivityStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<ActivityStats> = Vec::new();

    for training in trainings {
        let activity = training.activity.as_deref().unwrap_or_default();
        let minutes = training.duration.unwrap_or(0);
        match index.get(activity) {
            Some(&slot) => {
                stats[slot].duration = stats[slot].duration.saturating_add(minutes);
            }
            None => {
                index.insert(activity, stats.len());
                stats.push(ActivityStats {
                    activity: activity.to_string(),
                    duration: minutes,
                });
            }
        }
    }

    stats
}

pub fn max_duration(stats: &[ActivityStats]) -> i64 {
    stats.iter().map(|point| point.duration).max().unwrap_or(0)
}
