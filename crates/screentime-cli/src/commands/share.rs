use super::Output;
use crate::context::AppContext;

pub fn run(task_id: &str, comment: &str, out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;
    let shared = ctx
        .manager
        .share_achievement(task_id, comment)
        .ok_or_else(|| format!("task not found: {task_id}"))?;
    ctx.save()?;
    out.emit(&shared, || {
        format!("Shared '{}' to the feed: {}", shared.goal_title, shared.id)
    })
}
