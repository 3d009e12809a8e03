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
            .help("Print JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue)
            .conflicts_with("json"),
    )
}

fn required(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .help(help)
        .allow_negative_numbers(true)
}

fn index_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .help(help)
        .value_parser(value_parser!(usize))
}

fn loan_args(cmd: Command) -> Command {
    cmd.arg(required("amount", "Total amount borrowed"))
        .arg(required("apr", "Annual percentage rate, e.g. 6.5"))
        .arg(
            Arg::new("term")
                .long("term")
                .default_value("indefinite")
                .allow_negative_numbers(true)
                .help("Term in months, or 'indefinite'"),
        )
        .arg(required("category", "Category label"))
        .arg(
            Arg::new("payment")
                .long("payment")
                .allow_negative_numbers(true)
                .help("Monthly payment; derived from the terms when omitted"),
        )
}

pub fn build_cli() -> Command {
    Command::new("loanbook")
        .version(clap::crate_version!())
        .about("Track expenses, loans and loan payments")
        .subcommand(Command::new("init").about("Create the database and default tables"))
        .subcommand(
            Command::new("expense")
                .about("Record and review expenses")
                .subcommand(
                    Command::new("add")
                        .arg(required("date", "Date, YYYY-MM-DD"))
                        .arg(required("amount", "Amount spent"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(required("category", "Category label")),
                )
                .subcommand(
                    Command::new("update")
                        .arg(index_arg("index", "Row index shown by 'expense list'"))
                        .arg(required("date", "Date, YYYY-MM-DD"))
                        .arg(required("amount", "Amount spent"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .default_value(""),
                        )
                        .arg(required("category", "Category label")),
                )
                .subcommand(json_flags(
                    Command::new("list").arg(
                        Arg::new("search")
                            .long("search")
                            .help("Case-insensitive match on date, description or category"),
                    ),
                ))
                .subcommand(
                    Command::new("rm").arg(index_arg("index", "Row index shown by 'expense list'")),
                )
                .subcommand(json_flags(
                    Command::new("summary").arg(Arg::new("search").long("search")),
                )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(Command::new("add").arg(required("name", "Category name")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("loan")
                .about("Manage loans")
                .subcommand(loan_args(Command::new("add")))
                .subcommand(loan_args(
                    Command::new("update").arg(index_arg("index", "Loan index")),
                ))
                .subcommand(Command::new("rm").arg(index_arg("index", "Loan index")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("payment")
                .about("Record payments against loans")
                .subcommand(
                    Command::new("add")
                        .arg(index_arg("loan", "Loan index"))
                        .arg(required("date", "Date, YYYY-MM-DD"))
                        .arg(required("amount", "Amount paid")),
                )
                .subcommand(
                    Command::new("update")
                        .arg(index_arg("index", "Payment index"))
                        .arg(index_arg("loan", "Loan index"))
                        .arg(required("date", "Date, YYYY-MM-DD"))
                        .arg(required("amount", "Amount paid")),
                )
                .subcommand(Command::new("rm").arg(index_arg("index", "Payment index")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(json_flags(
            Command::new("overview").about("Loans with their payments"),
        ))
        .subcommand(
            Command::new("import")
                .about("Import legacy loan rows")
                .subcommand(Command::new("legacy").about("From the Sheet1 table"))
                .subcommand(
                    Command::new("csv").arg(required("path", "CSV with amount,apr,term,category")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export a table to CSV or JSON")
                .arg(
                    Arg::new("table")
                        .required(true)
                        .value_parser(["expenses", "loans", "payments"]),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(required("out", "Output file")),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(required("key", "Setting name"))
                        .arg(required("value", "New value")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check loan balances against payment history"))
}
