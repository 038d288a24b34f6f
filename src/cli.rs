// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print machine-readable JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendclip")
        .about("Personal finance ledger: accounts, transactions, budgets, recurring rules")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("init")
                .about("Create the database, the owner, and the default record set")
                .arg(Arg::new("owner").long("owner").default_value("default"))
                .arg(Arg::new("currency").long("currency").default_value("USD")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["CASH", "BANK", "CREDIT_CARD", "MOBILE_WALLET", "OTHER"])
                                .default_value("BANK"),
                        )
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(
                            Arg::new("initial-balance")
                                .long("initial-balance")
                                .default_value("0"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include archived accounts"),
                    ),
                ))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["CASH", "BANK", "CREDIT_CARD", "MOBILE_WALLET", "OTHER"]),
                        ),
                )
                .subcommand(
                    Command::new("archive")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("force").long("force").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("set-currency")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("currency").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["EXPENSE", "INCOME", "TRANSFER"])
                                .required(true),
                        ),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["EXPENSE", "INCOME"])
                                .required(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("time").long("time"))
                        .arg(
                            Arg::new("pending")
                                .long("pending")
                                .action(ArgAction::SetTrue)
                                .help("Record without applying to the balance"),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(
                            Arg::new("allow-negative")
                                .long("allow-negative")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("status")
                        .about("Request a status transition (only PENDING -> CLEARED applies)")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(
                            Arg::new("status")
                                .required(true)
                                .value_parser(["PENDING", "CLEARED"]),
                        ),
                )
                .subcommand(
                    Command::new("transfer")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("reference").long("reference"))
                        .arg(
                            Arg::new("allow-negative")
                                .long("allow-negative")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .value_parser(["PENDING", "CLEARED"]),
                        )
                        .arg(Arg::new("min-amount").long("min-amount"))
                        .arg(Arg::new("max-amount").long("max-amount"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("show")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring rules")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["EXPENSE", "INCOME"])
                                .required(true),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .value_parser(["DAILY", "WEEKLY", "MONTHLY", "YEARLY"])
                                .required(true),
                        )
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .value_parser(value_parser!(i64))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("day-of-month")
                                .long("day-of-month")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("day-of-week").long("day-of-week"))
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(json_flags(Command::new("list").arg(
                    Arg::new("active").long("active").action(ArgAction::SetTrue),
                ).arg(
                    Arg::new("inactive").long("inactive").action(ArgAction::SetTrue),
                )))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("day-of-month")
                                .long("day-of-month")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("day-of-week").long("day-of-week"))
                        .arg(Arg::new("end").long("end")),
                )
                .subcommand(
                    Command::new("activate")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("deactivate")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budgets and track consumption")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .value_parser(["MONTHLY", "WEEKLY", "YEARLY", "CUSTOM"])
                                .required(true),
                        )
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("start").long("start"))
                        .arg(Arg::new("end").long("end"))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("item-add")
                        .arg(
                            Arg::new("budget")
                                .long("budget")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(
                            Arg::new("warning")
                                .long("warning")
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("item-update")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("limit").long("limit"))
                        .arg(
                            Arg::new("warning")
                                .long("warning")
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("item-rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("items").arg(
                        Arg::new("budget")
                            .long("budget")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("progress")
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to")),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export records to CSV or JSON files")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .required(true),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("budgets")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .required(true),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Audit stored records for inconsistencies"))
}
