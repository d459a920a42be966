//! Heuristic insight generation
//!
//! Insights are derived from an aggregate summary with fixed rules, so the
//! whole module is a pure function over its inputs and deterministic for a
//! given summary.

use crate::types::{Insight, NameBucket, TimeBucket};

/// Day-over-day change (in percent) beyond which a surge or drop is reported
pub const SURGE_THRESHOLD_PCT: f64 = 20.0;

/// How many of the most frequent event names the summary includes
pub const TOP_EVENTS_LIMIT: u64 = 5;

/// Length of the trailing trend window, in days
pub const TREND_WINDOW_DAYS: i64 = 7;

/// Percentage change between the two most recent trend days, rounded to one
/// decimal. A zero baseline yields 0 rather than infinity.
fn day_over_day_change(recent_trend: &[TimeBucket]) -> Option<f64> {
    if recent_trend.len() < 2 {
        return None;
    }

    let last = recent_trend[recent_trend.len() - 1].count as f64;
    let prev = recent_trend[recent_trend.len() - 2].count as f64;

    if prev > 0.0 {
        Some(((last - prev) / prev * 100.0 * 10.0).round() / 10.0)
    } else {
        Some(0.0)
    }
}

/// Derive insights from an aggregate event summary.
///
/// Rules are evaluated in a fixed order so output ordering is stable:
/// 1. No events at all: a single onboarding hint.
/// 2. Day-over-day surge or drop beyond [`SURGE_THRESHOLD_PCT`].
/// 3. The most popular event name.
/// 4. An overall volume summary.
pub fn generate_insights(
    total_events: i64,
    top_events: &[NameBucket],
    recent_trend: &[TimeBucket],
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if total_events == 0 {
        insights.push(Insight {
            insight_type: "info".to_string(),
            title: "Get Started".to_string(),
            description: "Start sending events to see analytics insights. Use the API to track \
                          user actions, page views, and custom events."
                .to_string(),
            priority: "high".to_string(),
        });
        return insights;
    }

    if let Some(change) = day_over_day_change(recent_trend) {
        if change > SURGE_THRESHOLD_PCT {
            insights.push(Insight {
                insight_type: "positive".to_string(),
                title: "Traffic Surge Detected".to_string(),
                description: format!(
                    "Event volume increased by {:.1}% compared to the previous day. \
                     Investigate what's driving this growth.",
                    change
                ),
                priority: "high".to_string(),
            });
        } else if change < -SURGE_THRESHOLD_PCT {
            insights.push(Insight {
                insight_type: "warning".to_string(),
                title: "Traffic Drop Alert".to_string(),
                description: format!(
                    "Event volume decreased by {:.1}% compared to the previous day. \
                     Check for potential issues.",
                    change.abs()
                ),
                priority: "high".to_string(),
            });
        }
    }

    if let Some(top) = top_events.first() {
        insights.push(Insight {
            insight_type: "info".to_string(),
            title: "Most Popular Event".to_string(),
            description: format!(
                "\"{}\" is your most tracked event with {} occurrences.",
                top.name, top.count
            ),
            priority: "medium".to_string(),
        });
    }

    insights.push(Insight {
        insight_type: "info".to_string(),
        title: "Event Volume Summary".to_string(),
        description: format!(
            "You've tracked {} total events across {} event types.",
            total_events,
            top_events.len()
        ),
        priority: "low".to_string(),
    });

    insights
}
