pub mod alert;
pub mod check;
pub mod cli;
pub mod report;
pub mod retry;
pub mod scan;
pub mod severity;
pub mod tls;
