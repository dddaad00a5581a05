use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use tracing::Level;
use urltree::handlers::*;
use urltree_core::print_banner;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    init_tracing(&chosen_command, verbose);

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let data_dir = resolve_data_dir(
        chosen_command
            .get_one::<String>("data-dir")
            .map(String::as_str)
            .unwrap_or("~/.config/urltree/"),
    );

    let result = match chosen_command.subcommand() {
        Some(("init", primary_command)) => handle_init(primary_command, &data_dir),
        Some(("extract", primary_command)) => handle_extract(primary_command, &data_dir).await,
        Some(("serve", primary_command)) => handle_serve(primary_command).await,
        Some(("tree", primary_command)) => match primary_command.subcommand() {
            Some(("show", _)) => handle_tree_show(&data_dir),
            Some(("clear", _)) => handle_tree_clear(&data_dir),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        Some(("select", primary_command)) => match primary_command.subcommand() {
            Some(("add", secondary_command)) => {
                handle_select_add(secondary_command, &data_dir, false)
            }
            Some(("toggle", secondary_command)) => {
                handle_select_add(secondary_command, &data_dir, true)
            }
            Some(("remove", secondary_command)) => {
                handle_select_remove(secondary_command, &data_dir)
            }
            Some(("list", _)) => handle_select_list(&data_dir),
            Some(("clear", _)) => handle_select_clear(&data_dir),
            Some(("export", secondary_command)) => {
                handle_select_export(secondary_command, &data_dir)
            }
            _ => unreachable!("clap should ensure we don't get here"),
        },
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so JSON on stdout stays clean. The server logs each
/// request outcome at info; one-shot commands only surface warnings.
fn init_tracing(matches: &ArgMatches, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if matches!(matches.subcommand(), Some(("serve", _))) {
        Level::INFO
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
