pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    dim, error, header, info, muted, phase, section, status, success, summary_row, warn,
};
pub use progress::Spinner;
pub use table::{load_table, mismatch_table, stats_table, verification_table, TableBuilder};
pub use theme::{theme, Role, Theme};
