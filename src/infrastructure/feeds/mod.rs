pub mod agmarknet;
pub mod ticker_page;
