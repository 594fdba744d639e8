// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Print JSON instead of a table")
        .action(ArgAction::SetTrue)
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("Compute as of this date instead of today")
}

fn data_arg(what: &str) -> Arg {
    Arg::new("data")
        .long("data")
        .required(true)
        .value_name("JSON")
        .help(format!(
            "JSON array of {} changes; entries without an id are added",
            what
        ))
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("daylimit")
        .about("How much can I spend today? Pay-period budgeting with a chat advisor")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("status")
                .about("Daily spending limit, status and the full snapshot")
                .arg(date_arg())
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask the advisor a question")
                .args_conflicts_with_subcommands(true)
                .arg(
                    Arg::new("message")
                        .short('m')
                        .long("message")
                        .help("What to ask"),
                )
                .arg(date_arg())
                .arg(json_flag())
                .subcommand(
                    Command::new("history")
                        .about("Show recent messages")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .default_value("20")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_flag()),
                )
                .subcommand(Command::new("clear").about("Forget the conversation")),
        )
        .subcommand(
            Command::new("account")
                .about("Accounts and balances")
                .subcommand(
                    Command::new("update")
                        .about("Apply balance changes")
                        .arg(data_arg("account")),
                )
                .subcommand(
                    Command::new("set-balance")
                        .arg(id_arg())
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("debt")
                .about("Debts and promo payoff tracking")
                .subcommand(Command::new("update").arg(data_arg("debt")))
                .subcommand(Command::new("list").arg(date_arg()).arg(json_flag())),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(Command::new("update").arg(data_arg("goal")))
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(
            Command::new("onboarding")
                .about("First-run setup")
                .subcommand(
                    Command::new("accounts")
                        .about("Replace all accounts")
                        .arg(data_arg("account")),
                )
                .subcommand(Command::new("status").arg(json_flag()))
                .subcommand(Command::new("complete")),
        )
        .subcommand(
            Command::new("import")
                .about("Import transactions from a bank CSV export")
                .arg(Arg::new("path").long("path").required(true))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("tx")
                .about("Imported transactions")
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(date_arg())
                        .arg(json_flag()),
                )
                .subcommand(
                    Command::new("exclude")
                        .about("Leave a transaction out of every total")
                        .arg(id_arg())
                        .arg(
                            Arg::new("undo")
                                .long("undo")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("categorize")
                        .arg(id_arg())
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("learn")
                                .long("learn")
                                .help("Remember this merchant's category for future imports")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budget categories")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("fixed")
                                .long("fixed")
                                .help("Committed cost such as rent or a loan")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("excluded")
                                .long("excluded")
                                .help("Leave out of the operating budget")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("rules")
                .about("Standing instructions for the advisor")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("condition").long("when").required(true))
                        .arg(Arg::new("action").long("then").required(true)),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(Command::new("toggle").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("merchant")
                .about("Merchant to category mappings")
                .subcommand(
                    Command::new("learn")
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("confidence")
                                .long("confidence")
                                .default_value("0.95")
                                .value_parser(value_parser!(f64)),
                        ),
                )
                .subcommand(Command::new("list").arg(json_flag()))
                .subcommand(
                    Command::new("guess")
                        .about("Show what category a description would get")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .default_value("0")
                                .allow_hyphen_values(true),
                        )
                        .arg(json_flag()),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Name, income and sign convention")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("income").long("income").help("Net monthly income"))
                        .arg(Arg::new("pay_schedule").long("pay-schedule"))
                        .arg(
                            Arg::new("expense_sign")
                                .long("expense-sign")
                                .value_name("positive|negative")
                                .help("Which sign marks an expense in imported amounts"),
                        ),
                )
                .subcommand(Command::new("show").arg(json_flag())),
        )
}
