/// Lazily-compiled static regex behind an accessor fn.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
pub(crate) use re;

pub mod amount;
pub mod csv;
pub mod date;
pub mod error;
pub mod merchant;
pub mod schema;
pub mod statement;

pub use amount::{is_zero_literal, normalize_amount};
pub use csv::parse_csv;
pub use date::{normalize_date, normalize_date_with_today};
pub use error::IngestError;
pub use merchant::extract_merchant;
pub use schema::{detect_columns, normalize_header, ColumnMap};
pub use statement::parse_statement;
