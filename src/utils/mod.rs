pub mod fuzzy;
pub mod type_formatter;
