pub mod handlers;
pub mod server;

pub use handlers::{
    apply_selection, open_store, render_selections, resolve_data_dir, save_extraction,
    select_extracted, selection_from_args,
};
pub use server::{AppState, build_router};
