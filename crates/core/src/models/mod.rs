pub mod alert;
pub mod client;
pub mod deal;
pub mod fields;
pub mod kpi;
pub mod planning;
pub mod settings;
pub mod signals;
pub mod snapshot;
pub mod subscriber;
pub mod trading;
