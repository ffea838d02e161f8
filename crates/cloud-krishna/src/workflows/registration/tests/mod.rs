mod common;
mod http;
