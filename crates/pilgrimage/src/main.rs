//! `pilgrim` - CLI for the pilgrimage companion core
//!
//! Each command builds an [`AppContext`] and plays the part of a screen:
//! signing in, rendering a dashboard, or walking through the SOS flow.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context as _;
use clap::Parser;

use pilgrimage::cli::{
    BundleCommand, Cli, Command, ConfigCommand, DashboardCommand, IdentitiesCommand, SosCommand,
};
use pilgrimage::localization;
use pilgrimage::{identities, init_logging, AppContext, Config, Notification};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Identities(cmd) => handle_identities(&cmd),
        Command::Dashboard(cmd) => handle_dashboard(&config, &cmd),
        Command::Sos(cmd) => handle_sos(&config, &cmd).await,
        Command::Bundle(cmd) => {
            handle_bundle(&config, &cmd);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn context_for(config: &Config, lang: Option<&str>) -> anyhow::Result<AppContext> {
    let context = AppContext::from_config(config)?;
    if let Some(code) = lang {
        context.localization().set_language(code);
    }
    Ok(context)
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        println!(
            "  [{}] {} {}",
            notification.severity.indicator(),
            notification.id,
            notification.text
        );
    }
}

fn handle_identities(cmd: &IdentitiesCommand) -> anyhow::Result<()> {
    let actors = identities::all();
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&actors)?);
        return Ok(());
    }

    println!("{:<12} {:<10} {:<24} CONTACTS", "ID", "ROLE", "NAME");
    for actor in &actors {
        println!(
            "{:<12} {:<10} {:<24} {}",
            actor.id,
            actor.role,
            actor.display_name,
            actor.emergency_contacts.len()
        );
    }
    Ok(())
}

fn handle_dashboard(config: &Config, cmd: &DashboardCommand) -> anyhow::Result<()> {
    let context = context_for(config, cmd.lang.as_deref())?;
    context.sign_in_demo(&cmd.identity)?;

    let bundle = context.localization().bundle();
    let Some(view) = context.current_view() else {
        anyhow::bail!("no actor signed in");
    };
    let Some(actor) = context.session().current() else {
        anyhow::bail!("no actor signed in");
    };

    println!("{}", bundle.text("app.title"));
    println!(
        "{}",
        bundle.fill("header.greeting", &[("name", actor.display_name.as_str())])
    );
    println!();
    println!("== {} ({view}) ==", bundle.text(view.title_key()));
    for panel in view.panels() {
        println!("- {}", bundle.text(panel));
    }

    println!();
    println!("{}:", bundle.text("profile.emergency_contacts"));
    if actor.emergency_contacts.is_empty() {
        println!("  {}", bundle.text("profile.no_contacts"));
    }
    for contact in &actor.emergency_contacts {
        println!("  {} {}", contact.name, contact.phone);
    }

    println!("{}:", bundle.text("profile.sos_history"));
    if actor.sos_history.is_empty() {
        println!("  {}", bundle.text("profile.no_history"));
    }
    for record in &actor.sos_history {
        println!(
            "  {} {} {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.status,
            record.message.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn handle_sos(config: &Config, cmd: &SosCommand) -> anyhow::Result<()> {
    let context = context_for(config, cmd.lang.as_deref())?;
    context.sign_in_demo(&cmd.identity)?;
    let bundle = context.localization().bundle();
    let sos = context.sos();

    println!("[{}] state: {}", bundle.text("sos.button"), sos.phase());
    sos.trigger();
    println!("{}", bundle.text("sos.confirm_title"));
    println!("  {}", bundle.text("sos.confirm_body"));
    println!("  state: {}", sos.phase());

    if cmd.cancel {
        println!("> {}", bundle.text("sos.cancel"));
        context.cancel_sos();
        println!("  state: {}", sos.phase());
    } else {
        println!("> {}", bundle.text("sos.confirm"));
        context.send_sos(cmd.message.clone());
        let state = sos.state();
        println!(
            "  state: {} (active={}, awaiting_follow_up={})",
            sos.phase(),
            state.is_active,
            state.awaiting_follow_up
        );

        let contacts = sos.follow_up_contacts();
        if !contacts.is_empty() {
            println!("{}", bundle.text("sos.follow_up_title"));
            for contact in &contacts {
                println!(
                    "  {} {} <{}>",
                    bundle.text("sos.call"),
                    contact.name,
                    contact.dial_uri()
                );
            }
        }

        println!("> {}", bundle.text("sos.close"));
        sos.close_follow_up();
        println!("  state: {}", sos.phase());

        let retriggered = sos.trigger();
        println!("  re-trigger accepted: {retriggered}");
    }

    println!();
    println!("Notifications:");
    print_notifications(&context.notifications().snapshot());

    if cmd.wait {
        wait_for_notifications(&context, config).await;
    }
    Ok(())
}

async fn wait_for_notifications(context: &AppContext, config: &Config) {
    let queue = context.notifications();
    for notification in queue.snapshot() {
        queue.dismiss_after(notification.id, config.display_dismiss());
    }

    let mut rx = queue.subscribe();
    loop {
        if rx.borrow_and_update().is_empty() {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
        println!("Notifications:");
        print_notifications(&rx.borrow());
    }
    println!("All notifications dismissed.");
}

fn handle_bundle(config: &Config, cmd: &BundleCommand) {
    let code = cmd
        .lang
        .as_deref()
        .unwrap_or(config.localization.language.as_str());
    let bundle = localization::resolve(code);
    if bundle.code() != code {
        eprintln!(
            "No bundle for '{code}'; showing {} ({})",
            bundle.name(),
            bundle.code()
        );
    }

    if let Some(key) = &cmd.key {
        println!("{}", bundle.text(key));
        return;
    }

    println!("{} ({}, {:?})", bundle.name(), bundle.code(), bundle.direction());
    for key in bundle.keys() {
        println!("  {key:<28} {}", bundle.text(key));
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Notifications]");
                println!(
                    "  Auto dismiss (ms):    {}",
                    config.notifications.auto_dismiss_ms
                );
                println!(
                    "  Display dismiss (ms): {}",
                    config.notifications.display_dismiss_ms
                );
                println!();
                println!("[Localization]");
                println!("  Language:             {}", config.localization.language);
                println!();
                println!("[Session]");
                println!(
                    "  Auto sign-in:         {}",
                    config.session.auto_sign_in.as_deref().unwrap_or("(none)")
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
