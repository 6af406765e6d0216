pub mod forms;
pub mod rates;
pub mod submissions;
