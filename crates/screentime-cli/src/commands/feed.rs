//! Achievement feed commands for CLI.

use clap::Subcommand;
use screentime_core::GoalCompletion;

use super::Output;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum FeedAction {
    /// Show the feed, most recent first
    List {
        /// Maximum number of entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Like a feed entry
    Like {
        /// Completion ID
        id: String,
    },
    /// Comment on a feed entry
    Comment {
        /// Completion ID
        id: String,
        /// Comment text
        content: String,
    },
}

fn entry_lines(entry: &GoalCompletion) -> String {
    let mut text = format!(
        "{}  {} completed '{}' ({}m, {}pt, {:?})  likes {}\n    {}",
        entry.id,
        entry.username,
        entry.goal_title,
        entry.duration,
        entry.points,
        entry.goal_type,
        entry.likes,
        entry.description
    );
    for comment in &entry.comments {
        text.push_str(&format!("\n    > {}: {}", comment.username, comment.content));
    }
    text
}

pub fn run(action: FeedAction, out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        FeedAction::List { limit } => {
            let feed = ctx.manager.feed();
            let entries = &feed[..limit.unwrap_or(feed.len()).min(feed.len())];
            out.emit(&entries, || {
                if entries.is_empty() {
                    "feed is empty".to_string()
                } else {
                    entries.iter().map(entry_lines).collect::<Vec<_>>().join("\n")
                }
            })?;
        }
        FeedAction::Like { id } => {
            let likes = ctx
                .manager
                .like_completion(&id)
                .ok_or_else(|| format!("feed entry not found: {id}"))?;
            ctx.save()?;
            out.emit(&serde_json::json!({ "id": id, "likes": likes }), || {
                format!("likes: {likes}")
            })?;
        }
        FeedAction::Comment { id, content } => {
            let comment = ctx
                .manager
                .add_comment(&id, &content)?
                .ok_or_else(|| format!("feed entry not found: {id}"))?;
            ctx.save()?;
            out.emit(&comment, || format!("Comment added: {}", comment.id))?;
        }
    }
    Ok(())
}
