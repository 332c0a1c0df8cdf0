// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use fintrack::config::Config;
use fintrack::error::AppError;
use fintrack::services::admin;
use fintrack::{cli, commands, db, logging};

fn run() -> Result<()> {
    let cfg = Config::from_env()?;
    logging::init_tracing(cfg.log_filter.as_deref());

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init(&cfg)?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            println!("Database initialized at {}", cfg.db_path.display());
            if let Some(login) = sub.get_one::<String>("grant-admin") {
                let user = admin::grant_admin(&conn, login)?;
                println!("{} is now an admin", user.email);
            }
        }
        Some(("auth", sub)) => commands::auth::handle(&conn, &cfg, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, &cfg, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, &cfg, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut conn, &cfg, sub)?,
        Some(("card", sub)) => commands::cards::handle(&conn, &cfg, sub)?,
        Some(("gold", sub)) => commands::gold::handle(&conn, &cfg, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&conn, &cfg, sub)?,
        Some(("admin", sub)) => commands::admin::handle(&conn, &cfg, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        match err.downcast_ref::<AppError>() {
            Some(app) => {
                eprintln!("error[{}]: {}", app.kind(), app);
                std::process::exit(app.exit_code());
            }
            None => {
                eprintln!("error: {:#}", err);
                std::process::exit(1);
            }
        }
    }
}
