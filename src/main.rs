//! Chat Widget terminal host
//!
//! Hosts the widget on its built-in page and drives it from stdin: every
//! line is typed into the input and submitted with Enter.

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chat_widget::config::{Cli, WidgetConfig};
use chat_widget::dom::{Event, KEY_ENTER, KeyboardEvent};
use chat_widget::page::host_page;
use chat_widget::widget::{ConversationEntry, MessageKind};
use chat_widget::{ChatWidget, HttpBackend, WidgetOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED); stdout is reserved for the chat
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = WidgetConfig::from_cli(&cli).context("Failed to load configuration")?;
    let options = WidgetOptions::from(&config);
    let document = host_page(&options.element_ids);

    if cli.print_page {
        println!("{}", document.to_html());
        return Ok(());
    }

    info!(
        name: "widget.config.loaded",
        base_url = %config.api.base_url,
        "Widget configuration loaded"
    );

    let backend = HttpBackend::from_config(&config.api).context("Invalid backend URL")?;
    let mut widget = ChatWidget::init(document, backend, options)
        .await
        .context("Failed to bind widget to host page")?;

    println!("[{}]", widget.status_text());

    let input = widget.bindings().input;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    while let Some(line) = lines.next_line().await? {
        widget.set_input_value(&line);
        let mut event = Event::KeyDown(KeyboardEvent::new(input, KEY_ENTER));
        widget.dispatch(&mut event).await;

        for entry in &widget.entries()[shown..] {
            println!("{}", render(entry));
        }
        shown = widget.entries().len();
    }

    Ok(())
}

fn render(entry: &ConversationEntry) -> String {
    let prefix = match entry.kind {
        MessageKind::User => "you>",
        MessageKind::Bot => "bot>",
        MessageKind::Error => "error>",
    };
    format!("{prefix} {}", entry.text)
}
