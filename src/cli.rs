// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, arg, command, value_parser};

fn id_arg() -> Arg {
    Arg::new("id")
        .value_name("ID")
        .help("Entity id (UUID)")
        .required(true)
}

fn list_cmd(about: &'static str) -> Command {
    Command::new("list").about(about)
}

fn show_cmd(about: &'static str) -> Command {
    Command::new("show").about(about).arg(id_arg())
}

fn rm_cmd(about: &'static str) -> Command {
    Command::new("rm").about(about).arg(id_arg())
}

fn bool_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("BOOL")
        .help(help)
        .value_parser(value_parser!(bool))
}

fn auth_cmd() -> Command {
    Command::new("auth")
        .about("Register, log in, and inspect the current session")
        .subcommand_required(true)
        .subcommand(
            Command::new("register")
                .about("Create a user")
                .arg(arg!(--email <EMAIL>).required(true))
                .arg(arg!(--username <USERNAME>).required(true))
                .arg(arg!(--password <PASSWORD>).required(true))
                .arg(arg!(--"full-name" <NAME>).required(true)),
        )
        .subcommand(
            Command::new("login")
                .about("Log in with email or username and print a session token")
                .arg(arg!(--login <LOGIN> "Email or username").required(true))
                .arg(arg!(--password <PASSWORD>).required(true)),
        )
        .subcommand(Command::new("me").about("Show the logged-in user"))
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts and pockets")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an account, or a pocket with --parent")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--"type" <TYPE> "bank|wallet|cash|paylater").required(true))
                .arg(arg!(--currency <CCY> "Defaults to IDR").required(false))
                .arg(arg!(--parent <ID> "Main account to nest under").required(false)),
        )
        .subcommand(list_cmd("List main accounts with their pockets"))
        .subcommand(show_cmd("Show an account"))
        .subcommand(
            Command::new("edit")
                .about("Rename an account or change its currency")
                .arg(id_arg())
                .arg(arg!(--name <NAME>).required(false))
                .arg(arg!(--currency <CCY>).required(false)),
        )
        .subcommand(rm_cmd("Remove an account and its pockets"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and review transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a transaction against an account or a credit card")
                .arg(arg!(--account <ID>).required(false))
                .arg(arg!(--card <ID>).required(false))
                .arg(arg!(--"type" <TYPE> "income|expense|transfer").required(true))
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(arg!(--description <TEXT>).required(false))
                .arg(arg!(--date <DATE> "YYYY-MM-DD, defaults to today").required(false)),
        )
        .subcommand(
            list_cmd("List transactions, newest first")
                .arg(
                    arg!(--limit <N>)
                        .required(false)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    arg!(--offset <N>)
                        .required(false)
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(show_cmd("Show a transaction"))
        .subcommand(
            Command::new("edit")
                .about("Change a transaction; balances follow")
                .arg(id_arg())
                .arg(arg!(--account <ID> "Move to this account").required(false))
                .arg(arg!(--card <ID> "Move to this credit card").required(false))
                .arg(arg!(--"type" <TYPE>).required(false))
                .arg(arg!(--category <CATEGORY>).required(false))
                .arg(arg!(--amount <AMOUNT>).required(false))
                .arg(arg!(--description <TEXT>).required(false))
                .arg(arg!(--date <DATE>).required(false)),
        )
        .subcommand(rm_cmd("Delete a transaction and undo its balance effect"))
        .subcommand(Command::new("summary").about("Income and expense across accounts"))
        .subcommand(
            Command::new("export")
                .about("Export all transactions")
                .arg(arg!(--format <FMT> "csv|json").required(true))
                .arg(arg!(--out <PATH>).required(true)),
        )
}

fn budget_cmd() -> Command {
    let month = || arg!(--month <M>).value_parser(value_parser!(u32));
    let year = || arg!(--year <Y>).value_parser(value_parser!(i32));
    Command::new("budget")
        .about("Monthly category budgets")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Set a budget for a category and month")
                .arg(arg!(--category <CATEGORY>).required(true))
                .arg(arg!(--amount <AMOUNT>).required(true))
                .arg(month().required(true))
                .arg(year().required(true)),
        )
        .subcommand(
            list_cmd("List budgets, optionally for one month")
                .arg(month().required(false).requires("year"))
                .arg(year().required(false).requires("month")),
        )
        .subcommand(show_cmd("Show a budget"))
        .subcommand(rm_cmd("Delete a budget"))
        .subcommand(
            Command::new("copy")
                .about("Copy one month's budgets into another")
                .arg(
                    arg!(--"from-month" <M>)
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    arg!(--"from-year" <Y>)
                        .required(true)
                        .value_parser(value_parser!(i32)),
                )
                .arg(
                    arg!(--"to-month" <M>)
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    arg!(--"to-year" <Y>)
                        .required(true)
                        .value_parser(value_parser!(i32)),
                ),
        )
}

fn card_cmd() -> Command {
    Command::new("card")
        .about("Credit cards")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a credit card")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--"last-four" <DIGITS>).required(true))
                .arg(arg!(--limit <AMOUNT>).required(true))
                .arg(arg!(--balance <AMOUNT> "Opening balance, defaults to 0").required(false))
                .arg(
                    arg!(--"billing-day" <DAY>)
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    arg!(--"due-day" <DAY>)
                        .required(true)
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(list_cmd("List credit cards"))
        .subcommand(show_cmd("Show a credit card"))
        .subcommand(rm_cmd("Remove a credit card"))
}

fn gold_cmd() -> Command {
    Command::new("gold")
        .about("Gold holdings and prices")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record a gold purchase")
                .arg(arg!(--name <NAME>).required(true))
                .arg(arg!(--"type" <TYPE> "antam|ubs|galeri24|pegadaian|other").required(true))
                .arg(arg!(--weight <GRAMS>).required(true))
                .arg(arg!(--price <PER_GRAM> "Purchase price per gram").required(true))
                .arg(arg!(--date <DATE> "Purchase date, YYYY-MM-DD").required(true))
                .arg(arg!(--storage <WHERE>).required(false))
                .arg(arg!(--notes <TEXT>).required(false)),
        )
        .subcommand(list_cmd("List holdings valued at the latest price"))
        .subcommand(show_cmd("Show a holding"))
        .subcommand(rm_cmd("Remove a holding"))
        .subcommand(Command::new("summary").about("Totals across all holdings"))
        .subcommand(Command::new("price").about("Latest gold price"))
        .subcommand(
            Command::new("history").about("Recent gold prices").arg(
                arg!(--limit <N> "1 to 365, defaults to 30")
                    .required(false)
                    .value_parser(value_parser!(u32)),
            ),
        )
        .subcommand(
            Command::new("set-price")
                .about("Set today's price per gram (admin)")
                .arg(arg!(--price <PER_GRAM>).required(true))
                .arg(arg!(--source <SOURCE>).required(false)),
        )
        .subcommand(
            Command::new("fetch-price")
                .about("Fetch today's price from a configured provider (admin)")
                .arg(arg!(--api <NAME> "API configuration name").required(true)),
        )
}

fn admin_cmd() -> Command {
    Command::new("admin")
        .about("Administration")
        .subcommand_required(true)
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand_required(true)
                .subcommand(list_cmd("List users"))
                .subcommand(show_cmd("Show a user"))
                .subcommand(
                    Command::new("edit")
                        .about("Update a user")
                        .arg(id_arg())
                        .arg(arg!(--"full-name" <NAME>).required(false))
                        .arg(bool_arg("admin", "Grant or revoke admin")),
                )
                .subcommand(rm_cmd("Delete a user and all of their data")),
        )
        .subcommand(
            Command::new("api")
                .about("Manage price provider configurations")
                .subcommand_required(true)
                .subcommand(list_cmd("List API configurations"))
                .subcommand(show_cmd("Show an API configuration"))
                .subcommand(
                    Command::new("add")
                        .about("Add an API configuration")
                        .arg(arg!(--name <NAME>).required(true))
                        .arg(arg!(--"type" <TYPE>).required(true))
                        .arg(arg!(--config <JSON> "JSON object").required(false))
                        .arg(arg!(--active "Enable immediately").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("set")
                        .about("Replace config or toggle an API configuration")
                        .arg(id_arg())
                        .arg(arg!(--config <JSON> "JSON object").required(false))
                        .arg(bool_arg("active", "Enable or disable")),
                ),
        )
        .subcommand(Command::new("stats").about("System totals"))
}

pub fn build_cli() -> Command {
    command!()
        .about("Personal finance tracker: accounts, transactions, budgets, cards and gold")
        .arg(
            arg!(--token <TOKEN> "Session token (or FINTRACK_TOKEN)")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--json "Print JSON instead of tables")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database")
                .arg(arg!(--"grant-admin" <LOGIN> "Make an existing user admin").required(false)),
        )
        .subcommand(auth_cmd())
        .subcommand(account_cmd())
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(card_cmd())
        .subcommand(gold_cmd())
        .subcommand(Command::new("stats").about("Dashboard for the logged-in user"))
        .subcommand(admin_cmd())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let m = build_cli()
            .try_get_matches_from([
                "fintrack", "tx", "list", "--limit", "10", "--json", "--token", "t",
            ])
            .unwrap();
        let (_, tx) = m.subcommand().unwrap();
        let (_, list) = tx.subcommand().unwrap();
        assert!(list.get_flag("json"));
        assert_eq!(list.get_one::<u32>("limit"), Some(&10));
        assert_eq!(list.get_one::<String>("token").map(String::as_str), Some("t"));
    }

    #[test]
    fn budget_filter_needs_both_parts() {
        let res = build_cli().try_get_matches_from(["fintrack", "budget", "list", "--month", "3"]);
        assert!(res.is_err());
    }
}
