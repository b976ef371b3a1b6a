pub mod amortization;
pub mod schemes;
