//! Runs a sample sentence through both pipelines and prints the results.
//!
//!   cargo run --example walk -- "Some text to parse"
//!
//! Set `RUST_LOG=docwalk=debug` to see per-stage logging.

use anyhow::Context;
use docwalk::traversal::{self, DefaultTokenHandler};
use docwalk::{preprocess, DocumentParser, Pipeline};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXAMPLE: &str = "European authorities fined Google a record $5.1 billion on Wednesday \
    for abusing its power in the mobile phone market and ordered the company to alter its \
    practices";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docwalk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let text = std::env::args()
        .nth(1)
        .unwrap_or_else(|| EXAMPLE.to_string());

    println!("== Tagged words");
    for (word, tag) in preprocess(&text).context("tagging failed")? {
        println!("{:<16} {}", word, tag);
    }

    let doc = Pipeline::english()?
        .parse(&text)
        .context("parsing failed")?;

    println!("\n== Noun chunks (text, root head)");
    for (chunk, head) in traversal::noun_chunks(&doc) {
        println!("{:<32} {}", chunk, head);
    }

    println!("\n== Entities");
    for (ent, label) in traversal::entities(&doc) {
        println!("{:<32} {}", ent, label);
    }

    println!("\n== Tokens (text, content word, detail)");
    for report in traversal::tokens(&doc, &DefaultTokenHandler) {
        println!(
            "{:<16} {:<6} {}",
            report.text,
            report.is_content,
            report.detail.as_deref().unwrap_or("-")
        );
    }

    println!("\n== Sentences");
    for sent in traversal::sentences(&doc) {
        println!("{}", sent);
    }

    Ok(())
}
