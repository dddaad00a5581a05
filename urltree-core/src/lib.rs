use colored::Colorize;

pub mod data;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod store;
pub mod tree;

pub use error::StoreError;
pub use store::LinkTreeStore;

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "urltree".bright_green().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("{}", "scrape · tree · select · export".bright_black());
    eprintln!();
}
