//! Screen-time allowance commands for CLI.

use clap::Subcommand;
use screentime_core::timer::spawn_interval;
use serde::Serialize;

use super::{format_secs, Output};
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum LedgerAction {
    /// Show remaining and used screen time
    Status,
    /// Drain one interval from the allowance
    Tick {
        /// Seconds to drain (default: configured tick interval)
        #[arg(long)]
        secs: Option<f64>,
    },
    /// Add screen time
    Credit {
        /// Seconds to add
        secs: f64,
    },
    /// Drain the allowance live, one tick per interval, until Ctrl-C
    Watch {
        /// Stop after this many ticks
        #[arg(long)]
        count: Option<u64>,
    },
}

#[derive(Serialize)]
struct LedgerStatus {
    allowance_secs: f64,
    used_secs: f64,
    exhausted: bool,
}

fn status(ctx: &AppContext) -> LedgerStatus {
    let ledger = ctx.manager.ledger();
    LedgerStatus {
        allowance_secs: ledger.allowance_secs(),
        used_secs: ledger.used_secs(),
        exhausted: ledger.is_exhausted(),
    }
}

fn status_text(status: &LedgerStatus) -> String {
    let mut text = format!(
        "allowance {}  used {}",
        format_secs(status.allowance_secs),
        format_secs(status.used_secs)
    );
    if status.exhausted {
        text.push_str("  (out of screen time)");
    }
    text
}

pub fn run(action: LedgerAction, out: Output) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = AppContext::open()?;

    match action {
        LedgerAction::Status => {
            let s = status(&ctx);
            out.emit(&s, || status_text(&s))?;
        }
        LedgerAction::Tick { secs } => {
            let interval = secs.unwrap_or(ctx.manager.settings().tick_interval_secs as f64);
            if !interval.is_finite() || interval < 0.0 {
                return Err(format!("invalid tick interval: {interval}").into());
            }
            ctx.manager.tick(interval);
            ctx.save()?;
            let s = status(&ctx);
            out.emit(&s, || status_text(&s))?;
        }
        LedgerAction::Credit { secs } => {
            if !secs.is_finite() || secs < 0.0 {
                return Err(format!("invalid credit: {secs}").into());
            }
            ctx.manager.credit(secs);
            ctx.save()?;
            let s = status(&ctx);
            out.emit(&s, || status_text(&s))?;
        }
        LedgerAction::Watch { count } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(&mut ctx, count, out))?;
            ctx.close()?;
        }
    }
    Ok(())
}

async fn watch(
    ctx: &mut AppContext,
    count: Option<u64>,
    out: Output,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval = std::time::Duration::from_secs(ctx.manager.settings().tick_interval_secs);
    let (handle, mut signals) = spawn_interval(interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            signal = signals.recv() => {
                let Some(signal) = signal else { break };
                ctx.manager.run_due_ticks();
                ctx.save()?;
                let s = status(ctx);
                out.emit(&s, || status_text(&s))?;
                if s.exhausted || count.is_some_and(|n| signal.sequence >= n) {
                    break;
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    handle.stop();
    Ok(())
}
