mod automation;
mod common;
