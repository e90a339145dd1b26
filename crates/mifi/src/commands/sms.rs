//! SMS command handlers.

use tabled::Tabled;

use mifi_core::{Controller, SmsDirection, SmsMessage};

use crate::cli::{GlobalOpts, SmsArgs, SmsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

const PREVIEW_CHARS: usize = 48;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SmsRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "")]
    unread: String,
    #[tabled(rename = "Text")]
    text: String,
}

impl From<&SmsMessage> for SmsRow {
    fn from(m: &SmsMessage) -> Self {
        Self {
            id: m.id.clone(),
            direction: match m.direction {
                SmsDirection::Inbox => "in",
                SmsDirection::Outbox => "out",
                SmsDirection::Unknown => "?",
            }
            .into(),
            number: m.number.clone(),
            time: m
                .timestamp
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            unread: if m.is_unread() { "●" } else { "" }.into(),
            text: preview(&m.content),
        }
    }
}

/// First line of the message, cut to a fixed width.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() > PREVIEW_CHARS || line.len() < content.trim_end().len() {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        line.to_owned()
    }
}

pub async fn handle(
    controller: &Controller,
    args: SmsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SmsCommand::List {
            page,
            per_page,
            unread,
        } => {
            let mut messages = controller.list_sms(page, per_page).await?;
            if unread {
                messages.retain(SmsMessage::is_unread);
            }
            let out = output::render_list(
                &global.output,
                &messages,
                |m| SmsRow::from(m),
                |m| m.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SmsCommand::Count => {
            let count = controller.sms_count().await?;
            let out = output::render_single(
                &global.output,
                &serde_json::json!({ "count": count }),
                |_| format!("{count} messages stored"),
                |_| count.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SmsCommand::Send { number, text } => {
            controller.send_sms(&number, &text).await?;
            if !global.quiet {
                eprintln!("✓ Message sent to {number}");
            }
            Ok(())
        }

        SmsCommand::Delete { ids } => {
            let prompt = format!("Delete {} message(s)?", ids.len());
            if !util::confirm(&prompt, global.yes)? {
                return Err(CliError::NotConfirmed {
                    action: "sms delete".into(),
                });
            }
            controller.delete_sms(&ids).await?;
            if !global.quiet {
                eprintln!("✓ Deleted {} message(s)", ids.len());
            }
            Ok(())
        }
    }
}
