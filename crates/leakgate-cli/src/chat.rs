//! Interactive firewall-guarded chat loop.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use leakgate::prelude::*;

use crate::Options;
use crate::ollama::OllamaRelay;

const SYSTEM_PROMPT: &str = "You are a security-focused assistant guarding a redaction \
                             firewall demo. Be precise and technical.";

/// Run the interactive chat session.
pub fn run(options: &Options) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let registry = PatternRegistry::builtin();
    let filters = Arc::new(FilterStore::open(&options.filters, &registry));
    let blocklist = Blocklist::load(&options.blocklist);
    if blocklist.is_some() {
        println!("[info] custom blocklist loaded from {}", options.blocklist.display());
    }

    let sanitizer =
        Sanitizer::new(Box::new(PatternEntityDetector::new())).with_blocklist(blocklist);
    let relay = OllamaRelay::new(&options.base_url, &options.model)?;
    let mut gateway = Gateway::new(sanitizer, Arc::clone(&filters), relay, SYSTEM_PROMPT);

    println!("leakgate secure chat — model '{}'", options.model);
    println!("type '/exit' to quit, '/status' for filter settings,");
    println!("'/toggle <name>' to flip a filter, 'clear' to reset history.\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("you > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        match input {
            "" => {}
            "/exit" | "exit" | "quit" => break,
            "/status" => println!("{}", render_status(&gateway)),
            "clear" => {
                gateway.clear();
                println!("conversation history cleared.");
            }
            _ if input.starts_with("/toggle") => handle_toggle(&filters, input),
            _ => match runtime.block_on(gateway.send(input)) {
                Ok(exchange) => report_exchange(&exchange),
                Err(err) => eprintln!("[error] {err}"),
            },
        }
    }

    Ok(())
}

fn handle_toggle(filters: &FilterStore, input: &str) {
    let mut parts = input.split_whitespace();
    let _command = parts.next();
    let (Some(name), None) = (parts.next(), parts.next()) else {
        println!("usage: /toggle <filter_name>");
        return;
    };

    match filters.toggle(name) {
        Toggle::Switched { enabled, persisted } => {
            let state = if enabled { "ON" } else { "OFF" };
            if persisted {
                println!("filter '{name}' is now {state} (saved).");
            } else {
                println!("filter '{name}' is now {state}, but saving failed; the change is lost on exit.");
            }
        }
        Toggle::Unknown => println!("no filter named '{name}' exists. see /status."),
    }
}

fn report_exchange(exchange: &Exchange) {
    if exchange.inbound_redacted {
        println!("\n[leakgate] sensitive content in your message was redacted before sending.");
    }
    if exchange.outbound_redacted {
        println!("\n{}", "!".repeat(56));
        println!("SECURITY INCIDENT PREVENTED");
        println!("the model reply contained sensitive content (PII/secrets);");
        println!("the offending fragment was redacted before display.");
        println!("{}", "!".repeat(56));
    }
    println!("model > {}\n", exchange.reply);
}

/// Render the `[ON]`/`[OFF]` listing for every detector plus the
/// blocklist state.
fn render_status<R>(gateway: &Gateway<R>) -> String
where
    R: BackendRelay,
{
    let filters = gateway.filters().snapshot();
    let mut out = String::from("\n=== FILTER STATUS ===\n");

    out.push_str("--- contextual entities ---\n");
    for category in EntityCategory::ALL {
        let name = category.config_name();
        push_flag(&mut out, name, filters.is_enabled(name));
    }

    out.push_str("\n--- technical secrets ---\n");
    for rule in gateway.sanitizer().registry().secret_patterns() {
        push_flag(&mut out, rule.name(), filters.is_enabled(rule.name()));
    }

    match gateway.sanitizer().blocklist() {
        Some(blocklist) => {
            out.push_str(&format!(
                "\n[ON]  custom_blocklist ({} terms)\n",
                blocklist.term_count()
            ));
        }
        None => out.push_str("\n[OFF] custom_blocklist (file missing or empty)\n"),
    }

    out
}

fn push_flag(out: &mut String, name: &str, enabled: bool) {
    let icon = if enabled { "[ON] " } else { "[OFF]" };
    out.push_str(&format!("{icon} {name}\n"));
}
