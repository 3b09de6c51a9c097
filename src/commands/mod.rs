mod audit;

pub use audit::run_audit;
