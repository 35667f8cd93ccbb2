pub mod driver_process;
pub mod fantoccini_session;
