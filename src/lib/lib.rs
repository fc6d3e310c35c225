pub mod beta;
pub mod error;
pub mod plot;
pub mod record;
pub mod report;
pub mod stream;
