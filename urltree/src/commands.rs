use crate::CLAP_STYLING;
use clap::{arg, command};
use std::net::SocketAddr;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("urltree")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("urltree")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(arg!(-v --"verbose" "Log debug output to stderr").required(false))
        .arg(
            arg!(--"data-dir" <PATH>)
                .required(false)
                .global(true)
                .help("Directory holding the urltree database")
                .default_value("~/.config/urltree/"),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Initializes the urltree database on your filesystem")
                .arg(arg!([PATH]).help("Data directory to initialize (default: --data-dir)"))
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite any existing database in the data directory")
                        .required(false),
                ),
        )
        .subcommand(
            command!("extract")
                .about("Fetch a page and list the links found on it")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page to extract links from")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                )
                .arg(
                    arg!(--"save")
                        .required(false)
                        .help("Store the links as the link tree")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"parent" <ID>)
                        .required(false)
                        .help("Attach the links under this node of the stored tree")
                        .requires("save"),
                )
                .arg(
                    arg!(--"select" <KIND>)
                        .required(false)
                        .help("Also select the extracted links: internal, external, all")
                        .value_parser(["internal", "external", "all"]),
                ),
        )
        .subcommand(
            command!("serve")
                .about("Serve the link extraction API (POST /api/extract-urls)")
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Address to listen on")
                        .value_parser(clap::value_parser!(SocketAddr))
                        .default_value("127.0.0.1:3000"),
                ),
        )
        .subcommand(
            command!("tree")
                .about("Inspect the stored link tree")
                .subcommand_required(true)
                .subcommand(command!("show").about("Print the stored link tree"))
                .subcommand(command!("clear").about("Empty the stored link tree")),
        )
        .subcommand(
            command!("select")
                .about("Manage the selected links")
                .subcommand_required(true)
                .subcommand(selection_args(command!("add").about("Add a link to the selection")))
                .subcommand(selection_args(
                    command!("toggle").about("Add a link, or remove it if already selected"),
                ))
                .subcommand(
                    command!("remove").about("Remove a selected link").arg(
                        arg!(--"id" <ID>)
                            .required(true)
                            .help("The id of the selected link"),
                    ),
                )
                .subcommand(command!("list").about("Show the selected links as a tree"))
                .subcommand(command!("clear").about("Remove every selected link"))
                .subcommand(
                    command!("export")
                        .about("Export the selected links")
                        .arg(
                            arg!(-f --"format" <FORMAT>)
                                .required(false)
                                .help("Export format: json, csv, markdown, text")
                                .value_parser(["json", "csv", "markdown", "md", "text"])
                                .default_value("json"),
                        )
                        .arg(
                            arg!(-o --"output" <PATH>)
                                .required(false)
                                .help("Write the export to a file (default: stdout)")
                                .value_parser(clap::value_parser!(std::path::PathBuf)),
                        ),
                ),
        )
}

fn selection_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-u --"url" <URL>)
            .required(true)
            .help("The link to select")
            .value_parser(clap::value_parser!(Url)),
    )
    .arg(
        arg!(-t --"title" <TITLE>)
            .required(false)
            .help("Display title (default: label from the link tree, or the URL)"),
    )
    .arg(
        arg!(-p --"parent-url" <URL>)
            .required(false)
            .help("The selected link this one is nested under"),
    )
    .arg(
        arg!(-l --"level" <LEVEL>)
            .required(false)
            .help("Depth of the link in the tree")
            .value_parser(clap::value_parser!(u32)),
    )
    .arg(
        arg!(-d --"description" <TEXT>)
            .required(false)
            .help("Free-form note carried into exports"),
    )
}
