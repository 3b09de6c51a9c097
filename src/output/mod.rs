mod colors;
mod table;

pub use table::format_audit_report;
