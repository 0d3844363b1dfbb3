//! Renders scheduler announcements: the periodic reminder, the rollover
//! summary, and the new-week announcement.
//!
//! Strings use the chat platform's Markdown dialect; the dispatcher is
//! responsible for delivery, not formatting.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;

use rota_core::progress::progress_bar;
use rota_core::CategoryTargets;

use crate::error::EngineResult;
use crate::lifecycle::EnsuredWeek;
use crate::status::{detailed_status, WeekSnapshot};

/// What the scheduler sends on a reminder slot.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderPayload {
    /// Every configured target is met; `message` is the celebration.
    pub done: bool,
    pub message: String,
}

/// RFC 7231 style, e.g. `Fri, 03 Jan 2025 12:00:00 GMT`.
fn format_deadline(deadline: DateTime<Utc>) -> String {
    deadline.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn deadline_label(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Floor division so a deadline missed by an hour already counts as a
    // full day overdue.
    let days_until = (deadline - now).num_seconds().div_euclid(86_400);
    match days_until {
        d if d < 0 => "⚠️ *OVERDUE!*".to_string(),
        0 => "⏰ *Due TODAY!*".to_string(),
        1 => "⏰ *Due TOMORROW!*".to_string(),
        d => format!("⏰ Due in *{d} days*"),
    }
}

/// Build the reminder for the open week. `no_active_week` when none is
/// open; the scheduler skips the slot in that case.
pub async fn build_reminder_payload(
    conn: &mut PgConnection,
    targets: &CategoryTargets,
    now: DateTime<Utc>,
) -> EngineResult<ReminderPayload> {
    let status = detailed_status(conn, targets).await?;

    let total = targets.overall_total();
    let remaining = total - status.completed_count;

    if remaining <= 0 {
        return Ok(ReminderPayload {
            done: true,
            message: "🎉 *All tasks completed!*\n\nGreat work everyone! Time to relax 😎🍹"
                .to_string(),
        });
    }

    let mut lines = vec![
        "📢 *Task Reminder*".to_string(),
        String::new(),
        deadline_label(status.week.deadline, now),
        format!("Deadline: {}", format_deadline(status.week.deadline)),
        String::new(),
        format!(
            "📊 Progress: {} {}/{}",
            progress_bar(status.completed_count, total),
            status.completed_count,
            total
        ),
        format!("🔴 *{remaining} tasks* still need to be done!"),
        String::new(),
    ];
    if status.not_contributed.is_empty() {
        lines.push("¡Hagámosle pues! 💪".to_string());
    } else {
        lines.push(format!(
            "💭 *Haven't contributed yet:*\n{}\n\n¡Hagámosle pues! 💪",
            status.not_contributed.join(", ")
        ));
    }

    Ok(ReminderPayload {
        done: false,
        message: lines.join("\n"),
    })
}

/// Summary of a week that just closed, sent before the new-week
/// announcement.
pub fn rollover_summary(snapshot: &WeekSnapshot) -> String {
    let mut summary = format!(
        "📅 *Week {}/{} Summary*\n\n",
        snapshot.week.week_number, snapshot.week.year
    );

    if snapshot.remaining <= 0 {
        summary.push_str("🎉 *WEEK COMPLETE!* 🎉\n\n");
        summary.push_str(&format!(
            "All {} tasks were completed! Amazing work everyone! 💪\n\n",
            snapshot.total
        ));
    } else {
        let percent = if snapshot.total > 0 {
            snapshot.completed_count * 100 / snapshot.total
        } else {
            0
        };
        summary.push_str(&format!(
            "📊 *Progress:* {}/{} tasks ({}%)\n",
            snapshot.completed_count, snapshot.total, percent
        ));
        summary.push_str(&format!(
            "⚠️ {} tasks were not completed.\n\n",
            snapshot.remaining
        ));
    }

    if !snapshot.contributions.is_empty() {
        summary.push_str("🌟 *Thank you to our contributors:*\n");
        for (name, count) in &snapshot.contributions {
            let emoji = match count {
                c if *c >= 5 => "🏆",
                c if *c >= 3 => "⭐",
                _ => "✅",
            };
            let plural = if *count == 1 { "" } else { "s" };
            summary.push_str(&format!("{emoji} *{name}* - {count} task{plural}\n"));
        }
        summary.push_str("\n_Thanks to you, the corridor is a better place!_ 🏠✨\n\n");
    }

    if !snapshot.non_contributors.is_empty() {
        summary.push_str("💭 *We missed you this week:*\n");
        summary.push_str(&format!("{}\n\n", snapshot.non_contributors.join(", ")));
        summary.push_str(
            "_We would love to see you participate next week! Is there any reason you \
             couldn't contribute to the tasks? Feel free to reach out if you need help \
             or have concerns._\n\n",
        );
    }

    summary.push_str("➡️ *New week starting now!* Let's keep our corridor clean! 🧹");
    summary
}

/// Announcement for a freshly ensured week.
pub fn new_week_announcement(ensured: &EnsuredWeek, targets: &CategoryTargets) -> String {
    format!(
        "🆕 *New Week Started!*\n\n\
         📅 Week {}/{}\n\
         ⏰ Deadline: {}\n\
         📋 Tasks to complete: {}\n\n\
         Let's make this week great! ¡Hagámosle pues! 💪",
        ensured.week.week_number,
        ensured.week.year,
        format_deadline(ensured.week.deadline),
        targets.overall_total()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rota_db::models::week::Week;

    fn week_at(deadline: DateTime<Utc>) -> Week {
        Week {
            id: 1,
            year: 2025,
            week_number: 3,
            start_at: deadline - chrono::Duration::days(4) - chrono::Duration::hours(12),
            deadline,
            closed: false,
            created_at: deadline - chrono::Duration::days(4),
        }
    }

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn deadline_label_buckets() {
        let deadline = ts(2025, 1, 17, 12, 0);
        assert_eq!(
            deadline_label(deadline, ts(2025, 1, 14, 10, 0)),
            "⏰ Due in *3 days*"
        );
        assert_eq!(
            deadline_label(deadline, ts(2025, 1, 16, 18, 0)),
            "⏰ *Due TOMORROW!*"
        );
        assert_eq!(
            deadline_label(deadline, ts(2025, 1, 17, 10, 0)),
            "⏰ *Due TODAY!*"
        );
        // One hour past the deadline already reads as overdue.
        assert_eq!(
            deadline_label(deadline, ts(2025, 1, 17, 13, 0)),
            "⚠️ *OVERDUE!*"
        );
    }

    #[test]
    fn deadline_format_is_utc_string() {
        assert_eq!(
            format_deadline(ts(2025, 1, 17, 12, 0)),
            "Fri, 17 Jan 2025 12:00:00 GMT"
        );
    }

    #[test]
    fn rollover_summary_complete_week() {
        let snapshot = WeekSnapshot {
            week: week_at(ts(2025, 1, 17, 12, 0)),
            total: 14,
            completed_count: 14,
            remaining: 0,
            contributions: vec![("Ana".to_string(), 6), ("Ben".to_string(), 8)],
            non_contributors: vec![],
        };
        let summary = rollover_summary(&snapshot);
        assert!(summary.contains("🎉 *WEEK COMPLETE!* 🎉"));
        assert!(summary.contains("All 14 tasks were completed!"));
        assert!(summary.contains("🏆 *Ana* - 6 tasks"));
        assert!(!summary.contains("We missed you"));
    }

    #[test]
    fn rollover_summary_incomplete_week_tiers_and_missed() {
        let snapshot = WeekSnapshot {
            week: week_at(ts(2025, 1, 17, 12, 0)),
            total: 14,
            completed_count: 5,
            remaining: 9,
            contributions: vec![
                ("Ana".to_string(), 3),
                ("Ben".to_string(), 1),
                ("Cleo".to_string(), 1),
            ],
            non_contributors: vec!["Dan".to_string(), "Eve".to_string()],
        };
        let summary = rollover_summary(&snapshot);
        assert!(summary.contains("📊 *Progress:* 5/14 tasks (35%)"));
        assert!(summary.contains("⚠️ 9 tasks were not completed."));
        assert!(summary.contains("⭐ *Ana* - 3 tasks"));
        assert!(summary.contains("✅ *Ben* - 1 task\n"));
        assert!(summary.contains("💭 *We missed you this week:*\nDan, Eve"));
    }

    #[test]
    fn new_week_announcement_counts_configured_targets() {
        let ensured = EnsuredWeek {
            week: week_at(ts(2025, 1, 17, 12, 0)),
            week_created: true,
            created_instances: 19,
            total_task_types: 19,
        };
        let targets = CategoryTargets::default();
        let text = new_week_announcement(&ensured, &targets);
        assert!(text.contains("📅 Week 3/2025"));
        assert!(text.contains("⏰ Deadline: Fri, 17 Jan 2025 12:00:00 GMT"));
        assert!(text.contains("📋 Tasks to complete: 14"));
    }
}
