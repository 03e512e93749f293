// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn id_arg() -> Arg {
    Arg::new("id").long("id").required(true).help("Record id")
}

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn date_filter_args() -> [Arg; 3] {
    [
        Arg::new("filter")
            .long("filter")
            .help("all | this-month | previous-month | custom"),
        Arg::new("start")
            .long("start")
            .help("Custom range start (YYYY-MM-DD)"),
        Arg::new("end")
            .long("end")
            .help("Custom range end (YYYY-MM-DD)"),
    ]
}

fn tx_command() -> Command {
    Command::new("tx")
        .about("Record and browse transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add a transaction")
                .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("expense | income | investment"),
                )
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("edit")
                .about("Change fields of a transaction")
                .arg(id_arg())
                .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(Command::new("rm").about("Delete a transaction").arg(id_arg()))
        .subcommand(
            Command::new("list")
                .about("List transactions, newest first")
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(clap::value_parser!(usize)),
                )
                .args(date_filter_args())
                .args(json_args()),
        )
}

fn report_command() -> Command {
    Command::new("report")
        .about("Totals and spending breakdowns")
        .subcommand_required(true)
        .subcommand(
            Command::new("totals")
                .about("Income, expense, investment and savings")
                .args(date_filter_args())
                .args(json_args()),
        )
        .subcommand(
            Command::new("categories")
                .about("Expense totals per category")
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .action(ArgAction::SetTrue)
                        .help("Largest first instead of first-seen order"),
                )
                .args(date_filter_args())
                .args(json_args()),
        )
}

fn purchase_command() -> Command {
    Command::new("purchase")
        .about("Shopping list")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an item")
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Rename an item")
                .arg(id_arg())
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(Command::new("rm").about("Delete an item").arg(id_arg()))
        .subcommand(Command::new("list").about("List items").args(json_args()))
}

fn expiry_command() -> Command {
    Command::new("expiry")
        .about("Track product expiry dates")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Add an item")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Expiry date (YYYY-MM-DD), defaults to today"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change an item")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").about("Delete an item").arg(id_arg()))
        .subcommand(
            Command::new("list")
                .about("List items, soonest first")
                .args(json_args()),
        )
        .subcommand(
            Command::new("summary")
                .about("Counts expiring today, this week, month and year")
                .args(json_args()),
        )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .version(crate_version!())
        .about("Offline expense, income and investment tracker with shopping and expiry lists")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable verbose logging"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .global(true)
                .help("Path to optional configuration file"),
        )
        .subcommand(Command::new("setup").about("Create default configuration"))
        .subcommand(tx_command())
        .subcommand(report_command())
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("Built-in, configured and used categories")),
        )
        .subcommand(purchase_command())
        .subcommand(expiry_command())
        .subcommand(
            Command::new("import")
                .about("Import transactions from a JSON file")
                .arg(Arg::new("path").long("path").required(true))
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .default_value("merge")
                        .help("replace | merge"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("json")
                        .help("json | csv"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output file, defaults to expenses-<date>.<format>"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }
}
