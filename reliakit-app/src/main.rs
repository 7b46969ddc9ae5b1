use anyhow::{bail, Result};
use reliakit_app::{config::Config, roster, seed};
use reliakit_arbiter::{Arbiter, Healer};
use reliakit_store::{LogStatus, LogStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "config" && args.get(2).map(|s| s.as_str()) == Some("reset") {
        Config::default().save()?;
        println!("✅ config.toml reset to defaults");
        return Ok(());
    }

    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };

    let config = if Config::exists() {
        let cfg = Config::load()?;
        if let Err(e) = cfg.validate() {
            eprintln!("❌ Invalid configuration: {}", e);
            eprintln!("💡 Tip: Run 'reliakit config reset' to reconfigure");
            return Err(e);
        }
        cfg
    } else {
        let cfg = Config::default();
        cfg.save()?;
        println!("ℹ️  Wrote default config.toml");
        cfg
    };

    let store = Arc::new(LogStore::open(&config.db_path)?);

    match command.as_str() {
        "run" => {
            let Some(agent) = args.get(2) else {
                bail!("Usage: reliakit run <agent> <prompt...>");
            };
            let prompt = args[3..].join(" ");
            if prompt.is_empty() {
                bail!("Usage: reliakit run <agent> <prompt...>");
            }

            let arbiter = Arbiter::new(config.build_backends(), store);
            let response = arbiter.run(agent, &prompt).await?;
            println!("{}", response);
        }
        "history" => {
            let mut status_filter = None;
            let mut as_json = false;
            let mut rest = args[2..].iter();
            while let Some(flag) = rest.next() {
                match flag.as_str() {
                    "--status" => {
                        let Some(value) = rest.next() else {
                            bail!("--status requires a value (SUCCESS|FALLBACK|ERROR|SEED)");
                        };
                        status_filter = Some(parse_status(value)?);
                    }
                    "--json" => as_json = true,
                    other => bail!("Unknown flag: {}", other),
                }
            }

            let entries = match status_filter {
                Some(status) => store.list_by_status(status)?,
                None => store.list_all()?,
            };

            if as_json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in &entries {
                    println!(
                        "[{}] {} {} via {} ({}): {}",
                        entry.id,
                        entry.timestamp,
                        entry.agent_name,
                        entry.model_used,
                        entry.status,
                        entry.response
                    );
                }
                println!("{} entries", entries.len());
            }
        }
        "status" => {
            println!("Log entries: {}", store.count()?);
            match store.get_last_used_model()? {
                Some(model) => println!("Last model used: {}", model),
                None => println!("Last model used: (none)"),
            }
        }
        "agents" => {
            let agents = roster::load_roster(&config.agents_path)?;
            for agent in &agents {
                if agent.description.is_empty() {
                    println!("{}", agent.name);
                } else {
                    println!("{} — {}", agent.name, agent.description);
                }
            }
        }
        "heal" => {
            let arbiter = Arc::new(Arbiter::new(config.build_backends(), store));
            let healed = Healer::new(arbiter).heal().await?;
            println!("🔁 Resubmitted {} failed entries", healed);
        }
        "seed" => {
            if seed::seed(&store, &config.agents_path)? {
                println!("🌱 Database seeded with initial entries.");
            } else {
                println!("🧠 Database already seeded. Skipping.");
            }
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }

    Ok(())
}

fn parse_status(s: &str) -> Result<LogStatus> {
    Ok(match s.to_uppercase().as_str() {
        "SUCCESS" => LogStatus::Success,
        "FALLBACK" => LogStatus::Fallback,
        "ERROR" => LogStatus::Error,
        "SEED" => LogStatus::Seed,
        _ => bail!("Unknown status: {} (expected SUCCESS|FALLBACK|ERROR|SEED)", s),
    })
}

fn print_usage() {
    println!("ReliaKit — resilient model arbitration");
    println!();
    println!("Usage:");
    println!("  reliakit run <agent> <prompt...>   Arbitrate a prompt across backends");
    println!("  reliakit history [--status S] [--json]");
    println!("  reliakit status                    Row count and last model used");
    println!("  reliakit agents                    List the agent roster");
    println!("  reliakit heal                      Resubmit failed entries");
    println!("  reliakit seed                      Seed the database with samples");
    println!("  reliakit config reset              Rewrite config.toml with defaults");
}
