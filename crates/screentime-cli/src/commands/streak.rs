use serde::Serialize;

use super::Output;
use crate::context::AppContext;

#[derive(Serialize)]
struct StreakStatus {
    weekly_streak: u32,
    max_streak: u32,
    completed_today: u32,
    daily_goal: u32,
    goal_met: bool,
}

pub fn run(out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = AppContext::open()?;
    let progress = ctx.manager.daily_progress();
    let status = StreakStatus {
        weekly_streak: ctx.manager.weekly_streak(),
        max_streak: ctx.manager.settings().streak.max_streak,
        completed_today: progress.completed_today,
        daily_goal: progress.daily_goal,
        goal_met: progress.goal_met(),
    };
    out.emit(&status, || {
        format!(
            "weekly streak {}/{}  today {}/{}{}",
            status.weekly_streak,
            status.max_streak,
            status.completed_today,
            status.daily_goal,
            if status.goal_met { "  goal met" } else { "" }
        )
    })
}
