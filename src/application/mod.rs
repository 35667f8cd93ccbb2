pub mod order_aggregator;
pub mod run_state;
